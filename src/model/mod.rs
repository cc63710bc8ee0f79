//! Published aggregate models
//!
//! Everything a loader computes and hands to the store lives in models.rs.

mod models;

pub use models::*;
