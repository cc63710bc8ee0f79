use std::collections::BTreeMap;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::{
    configuration::{AppState, Config, State},
    error::Error,
    helpers::{parse_decimal, week_bucket, SECONDS_IN_WEEK},
    model::{Loan, WeekBucket},
    store::Published,
    types::Loan_Type,
};

/// First loan activity seen by the indexer.
pub const ORIGINATIONS_ANCHOR: i64 = 1_588_707_251;

/// The weekly series starts this many weeks after the anchor; earlier weeks
/// are too sparse to chart.
pub const ORIGINATIONS_OFFSET_WEEKS: i64 = 24;

#[derive(Debug)]
pub struct Originations {
    pub loans: Vec<Loan>,
    pub weekly: Vec<WeekBucket>,
    pub total_originated: BigDecimal,
}

pub fn series_start() -> i64 {
    week_bucket(ORIGINATIONS_ANCHOR + ORIGINATIONS_OFFSET_WEEKS * SECONDS_IN_WEEK)
}

pub async fn fetch_and_publish(
    app_state: AppState<State>,
    timestamp: DateTime<Utc>,
) -> Result<(), Error> {
    let data = app_state.query_api.loans().await?;
    let loans = parse_loans(data.loans, &app_state.config)?;
    let Originations {
        loans,
        weekly,
        total_originated,
    } = aggregate(loans, series_start(), week_bucket(timestamp.timestamp()));

    info!(
        "originations: {} loans over {} weeks, total originated {}",
        loans.len(),
        weekly.len(),
        total_originated
    );

    let total_loans = loans.len();
    app_state
        .store
        .publish(vec![
            Published::WeeklyOriginations(weekly),
            Published::Loans(loans),
            Published::TotalLoans(total_loans),
            Published::TotalOriginated(total_originated),
        ])
        .await;

    Ok(())
}

/// Drops loans of ignored pools and values the rest: closed loans by what
/// was repaid, open loans by what was borrowed so far.
pub fn parse_loans(
    records: Vec<Loan_Type>,
    config: &Config,
) -> Result<Vec<Loan>, Error> {
    let mut loans = Vec::with_capacity(records.len());

    for record in records {
        if config.is_ignored(&record.pool.id) {
            continue;
        }

        let amount = match record.closed {
            None => parse_decimal(record.borrows_aggregated_amount.as_str())?,
            Some(_) => parse_decimal(record.repays_aggregated_amount.as_str())?,
        };
        let opened: i64 = record.opened.as_str().parse()?;
        let date_opened = DateTime::from_timestamp(opened, 0).ok_or_else(|| {
            Error::DecodeDateTimeError(format!("loan {} opened at {}", record.id, opened))
        })?;

        loans.push(Loan {
            key: record.id,
            date_opened,
            amount,
        });
    }

    Ok(loans)
}

/// Sums every loan into `total_originated` and buckets those opened within
/// `[start, stop]` into a dense weekly series. Loans before `start` count
/// toward the total only.
pub fn aggregate(loans: Vec<Loan>, start: i64, stop: i64) -> Originations {
    let total_originated = loans
        .iter()
        .fold(BigDecimal::from(0), |total, loan| total + &loan.amount);

    let mut weeks: BTreeMap<i64, WeekBucket> = BTreeMap::new();
    let mut week = start;
    while week <= stop {
        weeks.insert(week, WeekBucket::empty(week));
        week += SECONDS_IN_WEEK;
    }

    for loan in &loans {
        let date = week_bucket(loan.date_opened.timestamp());
        if date < start {
            continue;
        }
        match weeks.get_mut(&date) {
            Some(bucket) => {
                bucket.count += 1;
                bucket.amount += &loan.amount;
            },
            None => debug!("loan {} opened after {}, not charted", loan.key, stop),
        }
    }

    Originations {
        loans,
        weekly: weeks.into_values().collect(),
        total_originated,
    }
}

pub fn start_task(
    app_state: AppState<State>,
    timestamp: DateTime<Utc>,
) -> JoinHandle<Result<(), Error>> {
    tokio::spawn(async move { fetch_and_publish(app_state, timestamp).await })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{helpers::parse_id_set, types::EntityId};

    fn record(
        id: &str,
        pool: &str,
        opened: &str,
        closed: Option<&str>,
        borrows: &str,
        repays: &str,
    ) -> Loan_Type {
        Loan_Type {
            id: id.to_owned(),
            pool: EntityId { id: pool.to_owned() },
            opened: opened.into(),
            closed: closed.map(|c| c.into()),
            borrows_aggregated_amount: borrows.into(),
            repays_aggregated_amount: repays.into(),
        }
    }

    fn config(ignore: &str) -> Config {
        Config {
            ignore_pools: parse_id_set(ignore),
            ..Config::default()
        }
    }

    #[test]
    fn test_series_start() {
        assert_eq!(series_start(), 1_602_720_000);
        assert_eq!(series_start() % SECONDS_IN_WEEK, 0);
    }

    #[test]
    fn test_open_and_closed_loans_from_week_zero() {
        let records = vec![
            record("1", "0xa", "0", None, "10", "3"),
            record("2", "0xa", "604800", Some("1"), "8", "5"),
        ];
        let loans = parse_loans(records, &config("")).unwrap();
        let result = aggregate(loans, 0, SECONDS_IN_WEEK);

        assert_eq!(result.weekly.len(), 2);
        assert_eq!(result.weekly[0].date, 0);
        assert_eq!(result.weekly[0].count, 1);
        assert_eq!(result.weekly[0].amount, BigDecimal::from(10));
        assert_eq!(result.weekly[1].date, 604_800);
        assert_eq!(result.weekly[1].count, 1);
        assert_eq!(result.weekly[1].amount, BigDecimal::from(5));
        assert_eq!(result.total_originated, BigDecimal::from(15));
        assert_eq!(result.loans.len(), 2);
    }

    #[test]
    fn test_series_is_dense() {
        let records = vec![
            record("1", "0xa", "100", None, "1", "0"),
            record("2", "0xa", "3000000", None, "2", "0"),
        ];
        let loans = parse_loans(records, &config("")).unwrap();
        let stop = 10 * SECONDS_IN_WEEK;
        let result = aggregate(loans, 0, stop);

        assert_eq!(result.weekly.len(), 11);
        for (i, bucket) in result.weekly.iter().enumerate() {
            assert_eq!(bucket.date, i as i64 * SECONDS_IN_WEEK);
        }
        let counted: u64 = result.weekly.iter().map(|b| b.count).sum();
        assert_eq!(counted, 2);
        assert_eq!(result.weekly[4].count, 1);
        assert_eq!(result.weekly[3].count, 0);
        assert_eq!(result.weekly[3].amount, BigDecimal::from(0));
    }

    #[test]
    fn test_loans_before_start_count_toward_total_only() {
        let start = 4 * SECONDS_IN_WEEK;
        let records = vec![
            record("old", "0xa", "10", None, "100", "0"),
            record("new", "0xa", &(start + 5).to_string(), None, "1.5", "0"),
        ];
        let loans = parse_loans(records, &config("")).unwrap();
        let result = aggregate(loans, start, start + SECONDS_IN_WEEK);

        assert_eq!(result.total_originated, parse_decimal("101.5").unwrap());
        let counted: u64 = result.weekly.iter().map(|b| b.count).sum();
        assert_eq!(counted, 1);
        assert_eq!(result.weekly[0].amount, parse_decimal("1.5").unwrap());
        assert_eq!(result.loans.len(), 2);
    }

    #[test]
    fn test_loans_after_stop_are_not_charted() {
        let records = vec![record("1", "0xa", "1209600", None, "4", "0")];
        let loans = parse_loans(records, &config("")).unwrap();
        let result = aggregate(loans, 0, SECONDS_IN_WEEK);

        assert_eq!(result.weekly.len(), 2);
        assert!(result.weekly.iter().all(|b| b.count == 0));
        assert_eq!(result.total_originated, BigDecimal::from(4));
    }

    #[test]
    fn test_ignored_pool_loans_are_dropped() {
        let records = vec![
            record("1", "0xa", "0", None, "10", "0"),
            record("2", "0xb", "0", None, "99", "0"),
        ];
        let loans = parse_loans(records, &config("0xb")).unwrap();
        let result = aggregate(loans, 0, 0);

        assert_eq!(result.loans.len(), 1);
        assert_eq!(result.loans[0].key, "1");
        assert_eq!(result.total_originated, BigDecimal::from(10));
        assert_eq!(result.weekly[0].count, 1);
    }

    #[test]
    fn test_only_the_relevant_side_is_parsed() {
        let records = vec![record("1", "0xa", "0", None, "10", "not-a-number")];
        let loans = parse_loans(records, &config("")).unwrap();
        assert_eq!(loans[0].amount, BigDecimal::from(10));

        let records = vec![record("1", "0xa", "0", Some("5"), "bad", "2")];
        assert!(parse_loans(records, &config("")).is_ok());

        let records = vec![record("1", "0xa", "0", None, "bad", "2")];
        assert!(parse_loans(records, &config("")).unwrap_err().is_parse());
    }

    #[test]
    fn test_bad_opened_timestamp_fails() {
        let records = vec![record("1", "0xa", "yesterday", None, "1", "0")];
        assert!(parse_loans(records, &config("")).unwrap_err().is_parse());
    }

    #[test]
    fn test_empty_range_when_stop_precedes_start() {
        let result = aggregate(vec![], SECONDS_IN_WEEK, 0);
        assert!(result.weekly.is_empty());
        assert_eq!(result.total_originated, BigDecimal::from(0));
    }
}
