use serde::Deserialize;

use super::{EntityId, Numeral};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investor_Balance_Type {
    pub pool: EntityId,
    pub account: EntityId,
    pub day: EntityId,
    pub senior_token_value: Numeral,
    pub junior_token_value: Numeral,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investor_Balances_Data {
    pub daily_investor_token_balances: Vec<Investor_Balance_Type>,
}
