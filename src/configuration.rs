use std::{collections::HashSet, env, fs, ops::Deref, path::Path, sync::Arc};

use url::Url;

use crate::{
    error::Error,
    helpers::{parse_id_set, parse_list},
    provider::QueryApi,
    store::Store,
};

#[derive(Debug)]
pub struct AppState<T>(Arc<T>);

impl<T> AppState<T> {
    pub fn new(state: T) -> AppState<T> {
        AppState(Arc::new(state))
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> AppState<T> {
        AppState(Arc::clone(&self.0))
    }
}

impl<T> Deref for AppState<T> {
    type Target = Arc<T>;

    fn deref(&self) -> &Arc<T> {
        &self.0
    }
}

#[derive(Debug)]
pub struct State {
    pub config: Config,
    pub query_api: QueryApi,
    pub store: Store,
}

impl State {
    pub fn new(config: Config) -> Result<State, Error> {
        let query_api = QueryApi::new(&config)?;
        Ok(Self {
            config,
            query_api,
            store: Store::new(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub graph_url: Url,
    pub ignore_pools: HashSet<String>,
    pub timeout: u64,
    pub refresh_interval: u64,
    pub enable_server: bool,
    pub server_host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub static_dir: String,
}

impl Config {
    pub fn is_ignored(&self, pool_id: &str) -> bool {
        self.ignore_pools.contains(pool_id)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            graph_url: Url::parse(DEFAULT_GRAPH_URL)
                .unwrap_or_else(|_| unreachable!("constant url is valid")),
            ignore_pools: HashSet::new(),
            timeout: 30,
            refresh_interval: 600,
            enable_server: true,
            server_host: String::from("127.0.0.1"),
            port: 8080,
            allowed_origins: vec![String::from("*")],
            static_dir: format!("{}/static", env!("CARGO_MANIFEST_DIR")),
        }
    }
}

pub const DEFAULT_GRAPH_URL: &str =
    "https://api.thegraph.com/subgraphs/name/jennypollack/tinlake-v3";

pub fn get_configuration() -> Result<Config, Error> {
    let graph_url = match env::var("GRAPH_URL") {
        Ok(url) => url,
        Err(env::VarError::NotPresent) => DEFAULT_GRAPH_URL.to_owned(),
        Err(e) => return Err(Error::VAR(e)),
    };
    let graph_url = Url::parse(&graph_url)?;
    if !matches!(graph_url.scheme(), "http" | "https") {
        return Err(Error::ConfigurationError(format!(
            "GRAPH_URL must be http(s), got {}",
            graph_url
        )));
    }

    let ignore_pools = parse_id_set(&env::var("IGNORE_POOLS").unwrap_or_default());
    let timeout: u64 = env::var("TIMEOUT")?.parse()?;
    let refresh_interval: u64 = env::var("REFRESH_INTERVAL")?.parse()?;
    if refresh_interval == 0 {
        return Err(Error::ConfigurationError(String::from(
            "REFRESH_INTERVAL must be positive",
        )));
    }

    let enable_server = env::var("ENABLE_SERVER")?.parse()?;
    let server_host = env::var("SERVER_HOST")?;
    let port: u16 = env::var("PORT")?.parse()?;
    let allowed_origins = parse_list(&env::var("ALLOWED_ORIGINS")?);
    let static_dir = format!(
        "{}/{}",
        env!("CARGO_MANIFEST_DIR"),
        env::var("STATIC_DIRECTORY")?
    );

    let config = Config {
        graph_url,
        ignore_pools,
        timeout,
        refresh_interval,
        enable_server,
        server_host,
        port,
        allowed_origins,
        static_dir,
    };

    Ok(config)
}

/// Exports the `KEY=value` lines of `.env` into the process environment.
/// A missing file is fine; the variables may come from the environment.
pub fn set_configuration() -> Result<(), Error> {
    let config_file: &str = ".env";

    let directory = env!("CARGO_MANIFEST_DIR");
    let path = format!("{}/{}", directory, config_file);

    if !Path::new(&path).exists() {
        return Ok(());
    }

    let config_string = fs::read_to_string(path)?;
    for (key, value) in parse_config_string(&config_string) {
        if env::var_os(key).is_none() {
            env::set_var(key, value);
        }
    }

    Ok(())
}

fn parse_config_string(config: &str) -> Vec<(&str, &str)> {
    config
        .lines()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && !s.starts_with('#'))
        .filter_map(|s| {
            let (k, v) = s.split_at(s.find('=')?);
            Some((k.trim(), &v[1..]))
        })
        .collect()
}
