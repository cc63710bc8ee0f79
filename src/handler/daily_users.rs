use std::collections::BTreeMap;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::{
    configuration::{AppState, State},
    error::Error,
    helpers::parse_decimal,
    model::DayBalance,
    provider::BALANCES_PAGE_SIZE,
    store::{Published, Store},
    types::Investor_Balance_Type,
};

/// Number of balance pages requested per cycle. Together with
/// [`BALANCES_PAGE_SIZE`] this caps how many records one cycle can see.
pub const BALANCE_PAGES: u64 = 15;

pub async fn fetch_and_publish(app_state: AppState<State>) -> Result<(), Error> {
    let queries = (0..BALANCE_PAGES)
        .map(|page| app_state.query_api.investor_balances(page));
    let pages = try_join_all(queries)
        .await?
        .into_iter()
        .map(|data| data.daily_investor_token_balances)
        .collect::<Vec<_>>();

    publish(&app_state.store, pages).await?;

    Ok(())
}

/// Aggregates the fetched pages and publishes `daily_users`. Returns
/// `false` and leaves the store untouched when the record set was
/// truncated.
pub async fn publish(
    store: &Store,
    pages: Vec<Vec<Investor_Balance_Type>>,
) -> Result<bool, Error> {
    let days = match aggregate(pages)? {
        Some(days) => days,
        None => {
            warn!(
                "daily users: last of {} pages is full, record set truncated, skipping publish",
                BALANCE_PAGES
            );
            return Ok(false);
        },
    };

    info!("daily users: {} days published", days.len());

    store.publish(vec![Published::DailyUsers(days)]).await;

    Ok(true)
}

/// Totals senior plus junior token value per day and averages it over the
/// number of balances seen that day.
///
/// Returns `None` when the last page came back full: the page budget ran
/// out before the end of the records, so any total would be short.
pub fn aggregate(
    pages: Vec<Vec<Investor_Balance_Type>>,
) -> Result<Option<BTreeMap<String, DayBalance>>, Error> {
    if let Some(last) = pages.last() {
        if last.len() as u64 == BALANCES_PAGE_SIZE {
            return Ok(None);
        }
    }

    let mut days: BTreeMap<String, (BigDecimal, u64)> = BTreeMap::new();

    for balance in pages.into_iter().flatten() {
        let value = parse_decimal(balance.senior_token_value.as_str())?
            + parse_decimal(balance.junior_token_value.as_str())?;
        let (total, count) = days
            .entry(balance.day.id)
            .or_insert_with(|| (BigDecimal::from(0), 0));
        *total += value;
        *count += 1;
    }

    let days = days
        .into_iter()
        .map(|(day, (total, count))| {
            let average = &total / BigDecimal::from(count);
            let item = DayBalance {
                day: day.to_owned(),
                total,
                count,
                average,
            };
            (day, item)
        })
        .collect();

    Ok(Some(days))
}

pub fn start_task(
    app_state: AppState<State>,
    _timestamp: DateTime<Utc>,
) -> JoinHandle<Result<(), Error>> {
    tokio::spawn(async move { fetch_and_publish(app_state).await })
}
