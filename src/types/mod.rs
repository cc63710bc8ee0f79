pub use self::{
    day_type::{Day_Type, Days_Data},
    entity_id::EntityId,
    graph_response::{GraphError, GraphQuery, GraphResponse},
    investor_balance_type::{Investor_Balance_Type, Investor_Balances_Data},
    loan_type::{Loan_Type, Loans_Data},
    numeral::Numeral,
    pool_type::{Pool_Type, Pools_Data},
};

mod day_type;
mod entity_id;
mod graph_response;
mod investor_balance_type;
mod loan_type;
mod numeral;
mod pool_type;
