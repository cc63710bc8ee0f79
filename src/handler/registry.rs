use std::fmt;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::{
    configuration::{AppState, State},
    error::Error,
};

use super::{daily_asset_value, daily_users, originations, pools};

/// Starts one loader as its own task. The loader fetches, aggregates and
/// publishes; it never reads another loader's output.
pub type Loader =
    fn(AppState<State>, DateTime<Utc>) -> JoinHandle<Result<(), Error>>;

pub struct LoaderRegistry {
    loaders: Vec<(&'static str, Loader)>,
}

impl LoaderRegistry {
    pub fn new() -> Self {
        Self {
            loaders: Vec::new(),
        }
    }

    pub fn register(mut self, name: &'static str, loader: Loader) -> Self {
        self.loaders.push((name, loader));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.loaders.iter().map(|(name, _)| *name).collect()
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    /// Starts every loader at once and waits until all of them settle.
    /// A failing loader does not stop its siblings, whatever they publish
    /// stays. The first failure in registration order is returned.
    pub async fn run(
        &self,
        app_state: &AppState<State>,
        timestamp: DateTime<Utc>,
    ) -> Result<(), Error> {
        let joins = self
            .loaders
            .iter()
            .map(|(name, loader)| (*name, loader(app_state.clone(), timestamp)))
            .collect::<Vec<_>>();

        let mut first_error = None;

        for (name, join) in joins {
            let result = match join.await {
                Ok(result) => result,
                Err(e) => Err(Error::TokioJoinError(e)),
            };

            match result {
                Ok(()) => info!("loader {} finished", name),
                Err(e) => {
                    error!("loader {} failed: {}", name, e);
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                },
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::new()
            .register("pools", pools::start_task)
            .register("daily_asset_value", daily_asset_value::start_task)
            .register("originations", originations::start_task)
            .register("daily_users", daily_users::start_task)
    }
}

impl fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderRegistry")
            .field("loaders", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::{configuration::Config, store::Published};

    fn app_state() -> AppState<State> {
        AppState::new(State::new(Config::default()).unwrap())
    }

    fn fast_ok(
        app_state: AppState<State>,
        _timestamp: DateTime<Utc>,
    ) -> JoinHandle<Result<(), Error>> {
        tokio::spawn(async move {
            app_state.store.publish(vec![Published::TotalLoans(7)]).await;
            Ok(())
        })
    }

    fn slow_ok(
        app_state: AppState<State>,
        _timestamp: DateTime<Utc>,
    ) -> JoinHandle<Result<(), Error>> {
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            app_state
                .store
                .publish(vec![Published::TotalValueLocked(BigDecimal::from(42))])
                .await;
            Ok(())
        })
    }

    fn fails(
        _app_state: AppState<State>,
        _timestamp: DateTime<Utc>,
    ) -> JoinHandle<Result<(), Error>> {
        tokio::spawn(async move { Err(Error::Query(String::from("indexer down"))) })
    }

    fn fails_later(
        _app_state: AppState<State>,
        _timestamp: DateTime<Utc>,
    ) -> JoinHandle<Result<(), Error>> {
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Err(Error::Query(String::from("second")))
        })
    }

    #[allow(unreachable_code)]
    fn panics(
        _app_state: AppState<State>,
        _timestamp: DateTime<Utc>,
    ) -> JoinHandle<Result<(), Error>> {
        tokio::spawn(async move {
            panic!("loader bug");
            Ok(())
        })
    }

    #[tokio::test]
    async fn test_all_loaders_publish() {
        let state = app_state();
        let registry = LoaderRegistry::new()
            .register("fast", fast_ok)
            .register("slow", slow_ok);

        registry.run(&state, Utc::now()).await.unwrap();

        let snapshot = state.store.snapshot().await;
        assert_eq!(snapshot.total_loans, 7);
        assert_eq!(snapshot.total_value_locked, BigDecimal::from(42));
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_siblings() {
        let state = app_state();
        let registry = LoaderRegistry::new()
            .register("fails", fails)
            .register("slow", slow_ok)
            .register("fast", fast_ok);

        let err = registry.run(&state, Utc::now()).await.unwrap_err();
        assert!(err.is_query());

        let snapshot = state.store.snapshot().await;
        assert_eq!(snapshot.total_loans, 7);
        assert_eq!(snapshot.total_value_locked, BigDecimal::from(42));
    }

    #[tokio::test]
    async fn test_first_failure_in_registration_order() {
        let state = app_state();
        let registry = LoaderRegistry::new()
            .register("fails_later", fails_later)
            .register("fails", fails);

        let err = registry.run(&state, Utc::now()).await.unwrap_err();
        assert_eq!(err.to_string(), "Query error: second");
    }

    #[tokio::test]
    async fn test_panicking_loader_is_reported() {
        let state = app_state();
        let registry = LoaderRegistry::new()
            .register("panics", panics)
            .register("fast", fast_ok);

        let err = registry.run(&state, Utc::now()).await.unwrap_err();
        assert!(matches!(err, Error::TokioJoinError(_)));
        assert_eq!(state.store.snapshot().await.total_loans, 7);
    }

    #[tokio::test]
    async fn test_rerun_replaces_values() {
        let state = app_state();
        state.store.publish(vec![Published::TotalLoans(1)]).await;

        let registry = LoaderRegistry::new().register("fast", fast_ok);
        registry.run(&state, Utc::now()).await.unwrap();
        registry.run(&state, Utc::now()).await.unwrap();

        assert_eq!(state.store.snapshot().await.total_loans, 7);
    }

    #[tokio::test]
    async fn test_empty_registry_is_ok() {
        let state = app_state();
        let registry = LoaderRegistry::new();
        assert!(registry.is_empty());
        registry.run(&state, Utc::now()).await.unwrap();
        assert!(state.store.snapshot().await.updated_at.is_none());
    }

    #[test]
    fn test_default_registry() {
        let registry = LoaderRegistry::default();
        assert_eq!(
            registry.names(),
            ["pools", "daily_asset_value", "originations", "daily_users"]
        );
        assert_eq!(registry.len(), 4);
    }
}
