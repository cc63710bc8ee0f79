use serde::{Deserialize, Serialize};

/// Body of a GraphQL request.
#[derive(Debug, Serialize)]
pub struct GraphQuery<'a> {
    pub query: &'a str,
}

/// GraphQL response envelope: `data` is absent or partial when `errors` is
/// set.
#[derive(Debug, Deserialize)]
pub struct GraphResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphError {
    pub message: String,
}
