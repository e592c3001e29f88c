//! Active plan tier persistence

use anyhow::Result;

use super::LocalStorage;
use crate::constants::keys;
use crate::plan::PlanTier;

/// Plan tier stored under `current_plan`, lowest tier when unset or unknown
pub fn current_plan(storage: &LocalStorage) -> Result<PlanTier> {
    Ok(PlanTier::from_stored(storage.get(keys::CURRENT_PLAN)?.as_deref()))
}

/// Record a new active plan (stands in for the checkout callback)
pub fn set_current_plan(storage: &LocalStorage, plan: PlanTier) -> Result<()> {
    storage.set(keys::CURRENT_PLAN, plan.storage_name())?;
    tracing::info!("Active plan set to {}", plan);
    Ok(())
}
