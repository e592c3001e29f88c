//! Owner profile and the onboarding/settings form

use serde::{Deserialize, Serialize};

use crate::constants::{images, share};
use crate::validation::{require, FieldErrors, ImageUpload, ValidationError};

/// Profile fields saved under `user_profile`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub restaurant_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// Stable id used in the public menu link
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<String>,
}

impl UserProfile {
    /// Whether onboarding has been completed
    pub fn is_complete(&self) -> bool {
        !self.first_name.is_empty() && !self.last_name.is_empty() && !self.restaurant_name.is_empty()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Onboarding and settings form as typed by the owner
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub restaurant_name: String,
    /// Optional; empty means none
    pub restaurant_url: String,
    pub cover_image: Option<ImageUpload>,
}

impl ProfileForm {
    /// Pre-fill from a saved profile (the cover image stays as saved)
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            restaurant_name: profile.restaurant_name.clone(),
            restaurant_url: profile.restaurant_url.clone().unwrap_or_default(),
            cover_image: None,
        }
    }

    /// Check the form and merge it over `existing`, keeping its restaurant id
    /// and, when no new image was picked, its cover image.
    pub fn apply_to(&self, existing: &UserProfile) -> Result<UserProfile, ValidationError> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "firstName", &self.first_name, "First name is required");
        require(&mut errors, "lastName", &self.last_name, "Last name is required");
        require(
            &mut errors,
            "restaurantName",
            &self.restaurant_name,
            "Restaurant name is required",
        );
        let url = self.restaurant_url.trim();
        if !url.is_empty() && url::Url::parse(url).is_err() {
            errors.add("restaurantUrl", "Invalid url");
        }
        if let Some(image) = &self.cover_image {
            image.check(
                &mut errors,
                "coverImage",
                images::COVER_IMAGE_TYPES,
                "Only .jpg, .jpeg, .png and .webp formats are supported.",
            );
        }
        errors.into_result()?;

        Ok(UserProfile {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            restaurant_name: self.restaurant_name.trim().to_string(),
            restaurant_url: (!url.is_empty()).then(|| url.to_string()),
            cover_image: self
                .cover_image
                .as_ref()
                .map(|i| i.path.clone())
                .or_else(|| existing.cover_image.clone()),
            restaurant_id: existing.restaurant_id.clone(),
        })
    }
}

/// Public menu link: `<origin>/restaurant/<restaurant_id>`
pub fn share_link(origin: &str, restaurant_id: &str) -> String {
    format!(
        "{}/{}/{}",
        origin.trim_end_matches('/'),
        share::RESTAURANT_PATH,
        restaurant_id
    )
}
