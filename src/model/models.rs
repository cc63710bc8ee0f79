//! Consolidated aggregate models
//!
//! Structs produced by the loaders, organized by domain sections.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// POOL DOMAIN
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Pool {
    pub key: String,
    pub name: String,
    pub asset_value: BigDecimal,
    pub reserve: BigDecimal,
    /// `asset_value + reserve`, fixed at construction.
    pub pool_size: BigDecimal,
    /// Repaid to date plus the outstanding asset value.
    pub total_originated: BigDecimal,
}

impl Pool {
    pub fn new(
        key: String,
        name: String,
        asset_value: BigDecimal,
        reserve: BigDecimal,
        total_repaid: BigDecimal,
    ) -> Pool {
        let pool_size = &asset_value + &reserve;
        let total_originated = total_repaid + &asset_value;
        Pool {
            key,
            name,
            asset_value,
            reserve,
            pool_size,
            total_originated,
        }
    }
}

// =============================================================================
// LOAN DOMAIN
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Loan {
    pub key: String,
    pub date_opened: DateTime<Utc>,
    /// Repaid to date for closed loans, borrowed to date for open ones.
    pub amount: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WeekBucket {
    /// Week start, unix seconds.
    pub date: i64,
    pub count: u64,
    pub amount: BigDecimal,
}

impl WeekBucket {
    pub fn empty(date: i64) -> WeekBucket {
        WeekBucket {
            date,
            count: 0,
            amount: BigDecimal::from(0),
        }
    }
}

// =============================================================================
// INVESTOR DOMAIN
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DayBalance {
    pub day: String,
    pub total: BigDecimal,
    pub count: u64,
    pub average: BigDecimal,
}
