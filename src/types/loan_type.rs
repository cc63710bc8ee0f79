use serde::Deserialize;

use super::{EntityId, Numeral};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan_Type {
    pub id: String,
    pub pool: EntityId,
    pub opened: Numeral,
    pub closed: Option<Numeral>,
    pub borrows_aggregated_amount: Numeral,
    pub repays_aggregated_amount: Numeral,
}

#[derive(Debug, Deserialize)]
pub struct Loans_Data {
    pub loans: Vec<Loan_Type>,
}
