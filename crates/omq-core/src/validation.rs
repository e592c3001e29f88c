//! Form validation
//!
//! Every form collects its problems per field so the caller can show them
//! inline next to the offending input. Nothing here touches storage.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::constants::images;

static RE_EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Minimum password length accepted at sign-up
pub const MIN_PASSWORD_LEN: usize = 8;

/// Ordered list of (field, message) pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<(String, String)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a problem with a field. Only the first message per field is kept.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.errors.push((field.to_string(), message.into()));
        }
    }

    /// Message for a field, if it failed
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(f, m)| (f.as_str(), m.as_str()))
    }

    /// Ok when nothing was recorded
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ValidationError(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// A form failed validation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid form ({0})")]
pub struct ValidationError(pub FieldErrors);

impl ValidationError {
    pub fn fields(&self) -> &FieldErrors {
        &self.0
    }
}

/// Record `message` when `value` is blank
pub fn require(errors: &mut FieldErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.add(field, message);
    }
}

/// An image picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Where the file lives; stored as the image reference
    pub path: String,
    pub mime_type: String,
    pub size: u64,
}

impl ImageUpload {
    /// Inspect a file on disk, deriving the MIME type from its extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("Cannot read image {}", path.display()))?;
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        Ok(Self {
            path: path.to_string_lossy().into_owned(),
            mime_type: mime_for_extension(&extension).to_string(),
            size: metadata.len(),
        })
    }

    /// Record problems with size or type
    pub fn check(&self, errors: &mut FieldErrors, field: &str, accepted: &[&str], type_message: &str) {
        if self.size > images::MAX_FILE_SIZE {
            errors.add(field, "Max file size is 3MB.");
        } else if !accepted.contains(&self.mime_type.as_str()) {
            errors.add(field, type_message);
        }
    }
}

fn mime_for_extension(extension: &str) -> &'static str {
    match extension {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Sign-up / login form
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Rules for creating an account
    pub fn validate_signup(&self) -> Result<(), ValidationError> {
        let mut errors = self.check_email();
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add(
                "password",
                format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
            );
        }
        errors.into_result()
    }

    /// Rules for signing in
    pub fn validate_login(&self) -> Result<(), ValidationError> {
        let mut errors = self.check_email();
        require(&mut errors, "password", &self.password, "Password is required");
        errors.into_result()
    }

    fn check_email(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.email.trim().is_empty() {
            errors.add("email", "Email is required");
        } else if !RE_EMAIL.is_match(self.email.trim()) {
            errors.add("email", "Invalid email address");
        }
        errors
    }
}
