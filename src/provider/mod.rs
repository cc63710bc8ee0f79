pub use self::query_api::{QueryApi, BALANCES_PAGE_SIZE, LOANS_LIMIT};

mod query_api;
