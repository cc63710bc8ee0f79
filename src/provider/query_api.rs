use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::{
    configuration::Config,
    error::Error,
    helpers::{formatter, Formatter},
    types::{
        Days_Data, GraphQuery, GraphResponse, Investor_Balances_Data,
        Loans_Data, Pools_Data,
    },
};

/// Upper bound the indexer accepts for `first`.
pub const LOANS_LIMIT: u64 = 1000;
pub const BALANCES_PAGE_SIZE: u64 = 1000;

const POOLS_QUERY: &str = r#"
query {
  pools {
    id
    shortName
    assetValue
    reserve
    totalRepaysAggregatedAmount
  }
}"#;

const DAYS_QUERY: &str = r#"
query {
  days(orderBy: id, orderDirection: asc, where: {id_gt: $0}) {
    id
    reserve
    assetValue
  }
}"#;

const LOANS_QUERY: &str = r#"
query {
  loans(first: $0) {
    id
    pool {
      id
    }
    opened
    closed
    borrowsAggregatedAmount
    repaysAggregatedAmount
  }
}"#;

const INVESTOR_BALANCES_QUERY: &str = r#"
query {
  dailyInvestorTokenBalances(skip: $0, first: $1, orderBy: id, orderDirection: desc) {
    pool {
      id
    }
    account {
      id
    }
    day {
      id
    }
    seniorTokenValue
    juniorTokenValue
  }
}"#;

/// GraphQL client for the pool indexer.
#[derive(Debug)]
pub struct QueryApi {
    url: Url,
    pub http: Client,
}

impl QueryApi {
    pub fn new(config: &Config) -> Result<QueryApi, Error> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(QueryApi {
            url: config.graph_url.clone(),
            http,
        })
    }

    pub async fn pools(&self) -> Result<Pools_Data, Error> {
        self.query(POOLS_QUERY).await
    }

    /// Daily snapshots with a day id strictly greater than `from`, oldest
    /// first.
    pub async fn days(&self, from: i64) -> Result<Days_Data, Error> {
        self.query(&days_query(from)).await
    }

    pub async fn loans(&self) -> Result<Loans_Data, Error> {
        self.query(&loans_query(LOANS_LIMIT)).await
    }

    /// One page of investor token balances, newest id first.
    pub async fn investor_balances(
        &self,
        page: u64,
    ) -> Result<Investor_Balances_Data, Error> {
        self.query(&investor_balances_query(page)).await
    }

    pub async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
    ) -> Result<T, Error> {
        debug!("graph query to {}", self.url);
        let response = self
            .http
            .post(self.url.clone())
            .json(&GraphQuery { query })
            .send()
            .await?
            .error_for_status()?
            .json::<GraphResponse<T>>()
            .await?;

        decode_response(response)
    }
}

pub(crate) fn days_query(from: i64) -> String {
    formatter(
        DAYS_QUERY.to_owned(),
        &[Formatter::ParsedStr(from.to_string())],
    )
}

pub(crate) fn loans_query(first: u64) -> String {
    formatter(LOANS_QUERY.to_owned(), &[Formatter::NumberU64(first)])
}

pub(crate) fn investor_balances_query(page: u64) -> String {
    formatter(
        INVESTOR_BALANCES_QUERY.to_owned(),
        &[
            Formatter::NumberU64(page * BALANCES_PAGE_SIZE),
            Formatter::NumberU64(BALANCES_PAGE_SIZE),
        ],
    )
}

/// Unwraps a GraphQL envelope. Any reported error fails the whole query,
/// even when partial data came back with it.
pub(crate) fn decode_response<T>(response: GraphResponse<T>) -> Result<T, Error> {
    if !response.errors.is_empty() {
        let messages = response
            .errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<String>>()
            .join("; ");
        return Err(Error::Query(messages));
    }

    response
        .data
        .ok_or_else(|| Error::Query(String::from("response without data")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_shapes() {
        assert!(days_query(1_592_000_000)
            .contains(r#"where: {id_gt: "1592000000"}"#));
        assert!(loans_query(LOANS_LIMIT).contains("loans(first: 1000)"));

        let page = investor_balances_query(14);
        assert!(page.contains("skip: 14000, first: 1000"));
        assert!(investor_balances_query(0).contains("skip: 0, first: 1000"));
    }

    #[test]
    fn test_decode_pools_response() {
        let body = r#"{"data": {"pools": [{
            "id": "0xabc",
            "shortName": "NS2",
            "assetValue": "100.5",
            "reserve": 20,
            "totalRepaysAggregatedAmount": "0"
        }]}}"#;
        let response: GraphResponse<Pools_Data> =
            serde_json::from_str(body).unwrap();
        let data = decode_response(response).unwrap();

        assert_eq!(data.pools.len(), 1);
        assert_eq!(data.pools[0].short_name.as_deref(), Some("NS2"));
        assert_eq!(data.pools[0].asset_value.as_str(), "100.5");
        assert_eq!(data.pools[0].reserve.as_str(), "20");
    }

    #[test]
    fn test_decode_loans_response_with_open_loan() {
        let body = r#"{"data": {"loans": [{
            "id": "1",
            "pool": {"id": "0xabc"},
            "opened": "1600000000",
            "closed": null,
            "borrowsAggregatedAmount": "10",
            "repaysAggregatedAmount": "0"
        }]}}"#;
        let response: GraphResponse<Loans_Data> =
            serde_json::from_str(body).unwrap();
        let data = decode_response(response).unwrap();

        assert!(data.loans[0].closed.is_none());
        assert_eq!(data.loans[0].pool.id, "0xabc");
    }

    #[test]
    fn test_decode_errors_fail_query() {
        let body = r#"{"data": null, "errors": [{"message": "indexer lagging"}, {"message": "bad field"}]}"#;
        let response: GraphResponse<Days_Data> =
            serde_json::from_str(body).unwrap();
        let err = decode_response(response).unwrap_err();

        assert!(err.is_query());
        assert_eq!(err.to_string(), "Query error: indexer lagging; bad field");
    }

    #[test]
    fn test_decode_missing_data() {
        let response: GraphResponse<Days_Data> =
            serde_json::from_str("{}").unwrap();
        assert!(matches!(decode_response(response), Err(Error::Query(_))));
    }

    #[test]
    fn test_client_builds_without_network() {
        let api = QueryApi::new(&Config::default()).unwrap();
        assert_eq!(api.url.as_str(), crate::configuration::DEFAULT_GRAPH_URL);
    }
}
