use std::time::Duration;

use chrono::Utc;
use tokio::time::interval;
use tracing::{error, info};

use crate::{
    configuration::{AppState, State},
    error::Error,
};

use super::LoaderRegistry;

/// Runs every loader once at start-up and then on each refresh interval.
/// A failed cycle is logged; whatever was published before stays in place.
pub async fn refresh_task(app_state: AppState<State>) -> Result<(), Error> {
    let registry = LoaderRegistry::default();
    let mut refresh_interval =
        interval(Duration::from_secs(app_state.config.refresh_interval));

    info!(
        "Starting refresh task with {} loaders every {}s",
        registry.len(),
        app_state.config.refresh_interval
    );

    loop {
        refresh_interval.tick().await;
        run_cycle(&app_state, &registry).await;
    }
}

pub async fn run_cycle(app_state: &AppState<State>, registry: &LoaderRegistry) {
    let timestamp = Utc::now();
    info!("Load cycle started at {}", timestamp);

    match registry.run(app_state, timestamp).await {
        Ok(()) => info!("Load cycle complete"),
        Err(e) => error!("Load cycle finished with error: {}", e),
    }
}
