use serde::Deserialize;

use super::Numeral;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool_Type {
    pub id: String,
    pub short_name: Option<String>,
    pub asset_value: Numeral,
    pub reserve: Numeral,
    pub total_repays_aggregated_amount: Numeral,
}

#[derive(Debug, Deserialize)]
pub struct Pools_Data {
    pub pools: Vec<Pool_Type>,
}
