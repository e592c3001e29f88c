//! Sign-in state
//!
//! There is no auth server: signing up or in validates the form and stores an
//! opaque token. Whether `auth_token` is present is the only thing the owner
//! section checks.

use anyhow::Result;
use thiserror::Error;

use super::LocalStorage;
use crate::constants::keys;
use crate::validation::{Credentials, ValidationError};

/// Auth gate and form errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// Owner pages need a token
    #[error("not signed in; run `omq login` or `omq signup` first")]
    NotSignedIn,

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Reads and writes `auth_token`
pub struct AuthSession<'a> {
    storage: &'a LocalStorage,
}

impl<'a> AuthSession<'a> {
    pub fn new(storage: &'a LocalStorage) -> Self {
        Self { storage }
    }

    pub fn is_authenticated(&self) -> Result<bool> {
        self.storage.contains(keys::AUTH_TOKEN)
    }

    /// Fail unless signed in
    pub fn require(&self) -> Result<(), SessionError> {
        if self.is_authenticated()? {
            Ok(())
        } else {
            Err(SessionError::NotSignedIn)
        }
    }

    /// Create an account and sign in
    pub fn signup(&self, credentials: &Credentials) -> Result<(), SessionError> {
        credentials.validate_signup()?;
        self.issue_token()?;
        tracing::info!("Signed up {}", credentials.email.trim());
        Ok(())
    }

    /// Sign in
    pub fn login(&self, credentials: &Credentials) -> Result<(), SessionError> {
        credentials.validate_login()?;
        self.issue_token()?;
        tracing::info!("Signed in {}", credentials.email.trim());
        Ok(())
    }

    /// Drop the token
    pub fn logout(&self) -> Result<()> {
        self.storage.remove(keys::AUTH_TOKEN)?;
        tracing::info!("Signed out");
        Ok(())
    }

    /// Drop the token and the profile. Dishes and plan stay on this device.
    pub fn delete_account(&self) -> Result<()> {
        self.storage.remove(keys::AUTH_TOKEN)?;
        self.storage.remove(keys::USER_PROFILE)?;
        tracing::info!("Account deleted");
        Ok(())
    }

    fn issue_token(&self) -> Result<()> {
        let token = uuid::Uuid::new_v4().simple().to_string();
        self.storage.set(keys::AUTH_TOKEN, &token)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn create_test_storage() -> (LocalStorage, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let storage =
            LocalStorage::open(&temp_dir.path().join("test.db")).expect("Failed to open storage");
        (storage, temp_dir)
    }

    #[test]
    fn test_signup_then_logout() {
        let (storage, _temp) = create_test_storage();
        let session = AuthSession::new(&storage);

        assert!(matches!(session.require(), Err(SessionError::NotSignedIn)));

        session
            .signup(&Credentials::new("chef@bistro.fr", "a-long-password"))
            .unwrap();
        assert!(session.is_authenticated().unwrap());
        assert!(session.require().is_ok());

        session.logout().unwrap();
        assert!(!session.is_authenticated().unwrap());
    }

    #[test]
    fn test_invalid_login_does_not_sign_in() {
        let (storage, _temp) = create_test_storage();
        let session = AuthSession::new(&storage);

        let err = session.login(&Credentials::new("nope", "")).unwrap_err();
        assert!(matches!(err, SessionError::Invalid(_)));
        assert!(!session.is_authenticated().unwrap());
    }

    #[test]
    fn test_delete_account_clears_token_and_profile() {
        let (storage, _temp) = create_test_storage();
        let session = AuthSession::new(&storage);
        session
            .login(&Credentials::new("chef@bistro.fr", "pw"))
            .unwrap();
        storage.set(keys::USER_PROFILE, "{}").unwrap();
        storage.set(keys::DISHES, "[]").unwrap();

        session.delete_account().unwrap();

        assert!(!storage.contains(keys::AUTH_TOKEN).unwrap());
        assert!(!storage.contains(keys::USER_PROFILE).unwrap());
        assert!(storage.contains(keys::DISHES).unwrap());
    }
}
