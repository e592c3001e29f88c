//! Owner profile persistence and the public menu link

use anyhow::Result;

use super::LocalStorage;
use crate::constants::keys;
use crate::profile::{share_link, ProfileForm, UserProfile};
use crate::validation::ValidationError;

/// Why a profile save didn't happen
#[derive(Debug, thiserror::Error)]
pub enum ProfileSaveError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Reads and writes `user_profile`
pub struct ProfileStore<'a> {
    storage: &'a LocalStorage,
}

impl<'a> ProfileStore<'a> {
    pub fn new(storage: &'a LocalStorage) -> Self {
        Self { storage }
    }

    /// Saved profile, empty when absent or malformed
    pub fn load(&self) -> Result<UserProfile> {
        Ok(self.storage.get_json(keys::USER_PROFILE)?.unwrap_or_default())
    }

    /// Validate the form and save it over the current profile
    pub fn save_form(&self, form: &ProfileForm) -> Result<UserProfile, ProfileSaveError> {
        let profile = form.apply_to(&self.load()?)?;
        self.storage.set_json(keys::USER_PROFILE, &profile)?;
        tracing::info!("Saved profile for {}", profile.restaurant_name);
        Ok(profile)
    }

    /// Restaurant id, minted and saved on first use
    pub fn restaurant_id(&self) -> Result<String> {
        let mut profile = self.load()?;
        if let Some(id) = &profile.restaurant_id {
            return Ok(id.clone());
        }
        let id = uuid::Uuid::new_v4().to_string();
        profile.restaurant_id = Some(id.clone());
        self.storage.set_json(keys::USER_PROFILE, &profile)?;
        tracing::info!("Assigned restaurant id {}", id);
        Ok(id)
    }

    /// Public menu link for this restaurant
    pub fn share_link(&self, origin: &str) -> Result<String> {
        Ok(share_link(origin, &self.restaurant_id()?))
    }

    /// Forget the profile
    pub fn clear(&self) -> Result<()> {
        self.storage.remove(keys::USER_PROFILE)
    }
}
