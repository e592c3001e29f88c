//! Persistence layer
//!
//! SQLite-backed key/value storage and the stores built on it:
//! - Dish collection with plan gating
//! - Active plan tier
//! - Owner profile and restaurant id
//! - Sign-in token

use std::time::{SystemTime, UNIX_EPOCH};

mod auth;
mod database;
mod dishes;
mod local;
mod profile;
pub mod subscription;

pub use auth::{AuthSession, SessionError};
pub use database::Database;
pub use dishes::{AddOutcome, DishStore, DuplicateOutcome};
pub use local::LocalStorage;
pub use profile::{ProfileSaveError, ProfileStore};

/// Get current Unix timestamp in seconds
#[inline]
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
