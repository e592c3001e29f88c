//! OMQ Core - Menu management for a single restaurant
//!
//! This crate provides the functionality behind the `omq` CLI:
//! - Dish model and the add-dish form
//! - Plan tiers gating how many dishes may be created
//! - Allergen and type filtering for the diner view
//! - Local key/value persistence and the stores built on it
//! - Owner profile, sign-in state and the public menu link

pub mod config;
pub mod constants;
pub mod dish;
pub mod filter;
pub mod paths;
pub mod plan;
pub mod profile;
pub mod storage;
pub mod subscription;
pub mod table;
pub mod validation;

// Re-exports for convenience
pub use config::AppConfig;
pub use dish::{Dish, DishDraft, DishFields, DishType, Quantity};
pub use filter::{AllergenExclusions, MenuView, DEFAULT_ALLERGENS};
pub use plan::{PlanTier, UpgradePrompt};
pub use profile::{ProfileForm, UserProfile};
pub use storage::{
    AddOutcome, AuthSession, Database, DishStore, DuplicateOutcome, LocalStorage, ProfileStore,
};
pub use validation::{Credentials, ImageUpload, ValidationError};
