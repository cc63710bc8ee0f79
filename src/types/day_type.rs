use serde::{Deserialize, Serialize};

use super::Numeral;

/// A daily pool-wide snapshot. Published exactly as the indexer returns it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Day_Type {
    pub id: String,
    pub reserve: Numeral,
    pub asset_value: Numeral,
}

#[derive(Debug, Deserialize)]
pub struct Days_Data {
    pub days: Vec<Day_Type>,
}
