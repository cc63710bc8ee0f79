pub use self::registry::{Loader, LoaderRegistry};

pub mod daily_asset_value;
pub mod daily_users;
pub mod originations;
pub mod pools;
pub mod refresh;
pub mod registry;
