use std::collections::BTreeMap;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::info;

use crate::{
    configuration::{AppState, Config, State},
    error::Error,
    helpers::parse_decimal,
    model::Pool,
    store::Published,
    types::Pool_Type,
};

#[derive(Debug)]
pub struct PoolsAggregate {
    pub pools: BTreeMap<String, Pool>,
    pub total_value_locked: BigDecimal,
}

pub async fn fetch_and_publish(app_state: AppState<State>) -> Result<(), Error> {
    let data = app_state.query_api.pools().await?;
    let PoolsAggregate {
        pools,
        total_value_locked,
    } = aggregate(data.pools, &app_state.config)?;

    info!(
        "pools: {} published, total value locked {}",
        pools.len(),
        total_value_locked
    );

    app_state
        .store
        .publish(vec![
            Published::Pools(pools),
            Published::TotalValueLocked(total_value_locked),
        ])
        .await;

    Ok(())
}

/// Drops ignored pools, parses their figures and sums the pool sizes into
/// the total value locked. One malformed figure fails the whole batch.
pub fn aggregate(
    records: Vec<Pool_Type>,
    config: &Config,
) -> Result<PoolsAggregate, Error> {
    let mut pools = BTreeMap::new();

    for record in records {
        if config.is_ignored(&record.id) {
            continue;
        }
        let pool = proceed(record)?;
        pools.insert(pool.key.to_owned(), pool);
    }

    let total_value_locked = pools
        .values()
        .fold(BigDecimal::from(0), |total, pool| total + &pool.pool_size);

    Ok(PoolsAggregate {
        pools,
        total_value_locked,
    })
}

fn proceed(record: Pool_Type) -> Result<Pool, Error> {
    let asset_value = parse_decimal(record.asset_value.as_str())?;
    let reserve = parse_decimal(record.reserve.as_str())?;
    let total_repaid =
        parse_decimal(record.total_repays_aggregated_amount.as_str())?;

    Ok(Pool::new(
        record.id,
        record.short_name.unwrap_or_default(),
        asset_value,
        reserve,
        total_repaid,
    ))
}

pub fn start_task(
    app_state: AppState<State>,
    _timestamp: DateTime<Utc>,
) -> JoinHandle<Result<(), Error>> {
    tokio::spawn(async move { fetch_and_publish(app_state).await })
}
