use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::info;

use crate::{
    configuration::{AppState, State},
    error::Error,
    helpers::days_window_start,
    store::Published,
};

/// Publishes the last 90 days of pool-wide snapshots as received.
pub async fn fetch_and_publish(
    app_state: AppState<State>,
    timestamp: DateTime<Utc>,
) -> Result<(), Error> {
    let from = days_window_start(timestamp.timestamp());
    let data = app_state.query_api.days(from).await?;

    info!("daily asset value: {} days after {}", data.days.len(), from);

    app_state
        .store
        .publish(vec![Published::DailyAssetValue(data.days)])
        .await;

    Ok(())
}

pub fn start_task(
    app_state: AppState<State>,
    timestamp: DateTime<Utc>,
) -> JoinHandle<Result<(), Error>> {
    tokio::spawn(async move { fetch_and_publish(app_state, timestamp).await })
}
