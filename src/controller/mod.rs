pub mod daily_asset_value;
pub mod daily_users;
pub mod originations;
pub mod pools;
pub mod stats;
pub mod total_value_locked;
