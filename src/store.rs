use std::{collections::BTreeMap, fmt};

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{RwLock, RwLockReadGuard};

use crate::{
    model::{DayBalance, Loan, Pool, WeekBucket},
    types::Day_Type,
};

/// The published aggregate state. Every field starts empty or zero and is
/// replaced wholesale by the loader that owns it.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub pools: BTreeMap<String, Pool>,
    pub loans: Vec<Loan>,
    pub weekly_originations: Vec<WeekBucket>,
    pub daily_asset_value: Vec<Day_Type>,
    pub daily_users: BTreeMap<String, DayBalance>,
    pub total_value_locked: BigDecimal,
    pub total_originated: BigDecimal,
    pub total_loans: usize,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Snapshot {
            pools: BTreeMap::new(),
            loans: Vec::new(),
            weekly_originations: Vec::new(),
            daily_asset_value: Vec::new(),
            daily_users: BTreeMap::new(),
            total_value_locked: BigDecimal::from(0),
            total_originated: BigDecimal::from(0),
            total_loans: 0,
            updated_at: None,
        }
    }
}

impl Snapshot {
    /// Pools ordered by size, largest first.
    pub fn sorted_pools(&self) -> Vec<Pool> {
        let mut pools: Vec<Pool> = self.pools.values().cloned().collect();
        pools.sort_by(|a, b| b.pool_size.cmp(&a.pool_size));
        pools
    }

    fn apply(&mut self, value: Published) {
        match value {
            Published::Pools(v) => self.pools = v,
            Published::Loans(v) => self.loans = v,
            Published::WeeklyOriginations(v) => self.weekly_originations = v,
            Published::DailyAssetValue(v) => self.daily_asset_value = v,
            Published::DailyUsers(v) => self.daily_users = v,
            Published::TotalValueLocked(v) => self.total_value_locked = v,
            Published::TotalOriginated(v) => self.total_originated = v,
            Published::TotalLoans(v) => self.total_loans = v,
        }
    }
}

/// One keyed value a loader hands to the store.
#[derive(Debug, Clone)]
pub enum Published {
    Pools(BTreeMap<String, Pool>),
    Loans(Vec<Loan>),
    WeeklyOriginations(Vec<WeekBucket>),
    DailyAssetValue(Vec<Day_Type>),
    DailyUsers(BTreeMap<String, DayBalance>),
    TotalValueLocked(BigDecimal),
    TotalOriginated(BigDecimal),
    TotalLoans(usize),
}

impl Published {
    pub fn key(&self) -> &'static str {
        match self {
            Published::Pools(_) => "pools",
            Published::Loans(_) => "loans",
            Published::WeeklyOriginations(_) => "weeklyOriginations",
            Published::DailyAssetValue(_) => "dailyAssetValue",
            Published::DailyUsers(_) => "dailyUsers",
            Published::TotalValueLocked(_) => "totalValueLocked",
            Published::TotalOriginated(_) => "totalOriginated",
            Published::TotalLoans(_) => "totalLoans",
        }
    }
}

impl fmt::Display for Published {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Holder of the single writable [`Snapshot`].
pub struct Store {
    snapshot: RwLock<Snapshot>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(Snapshot::default()),
        }
    }

    /// Writes all `values` under one lock so readers never see a loader's
    /// result half applied.
    pub async fn publish(&self, values: Vec<Published>) {
        if values.is_empty() {
            return;
        }
        let mut snapshot = self.snapshot.write().await;
        for value in values {
            snapshot.apply(value);
        }
        snapshot.updated_at = Some(Utc::now());
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.snapshot.read().await
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.snapshot.read().await.clone()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}
