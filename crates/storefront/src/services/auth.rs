//! Authentication service.
//!
//! Email/password accounts stored in the document store `users`
//! collection. Passwords are hashed with Argon2id; the hash never leaves
//! this module. Authentication requires the store capability - without it
//! every operation fails with [`AuthError::Unavailable`].

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use cartwheel_core::{User, UserRole};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::store::{DocumentStore, FieldClause, StoreError, collections, encode};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum email length (RFC 5321).
const MAX_EMAIL_LENGTH: usize = 254;

/// Errors raised by authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong email or password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An account already exists for the email.
    #[error("an account with this email already exists")]
    UserAlreadyExists,

    /// The email address is malformed.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// The password does not meet requirements.
    #[error("{0}")]
    WeakPassword(String),

    /// Accounts require the document store, which is not configured.
    #[error("account service unavailable")]
    Unavailable,

    /// Document store operation failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Password hashing failed.
    #[error("password hash error")]
    PasswordHash,
}

/// A user document as stored in the `users` collection.
///
/// Carries the password hash alongside the profile; only [`User`] (without
/// the hash) ever leaves this module.
#[derive(Debug, Serialize, Deserialize)]
struct UserRecord {
    #[serde(default)]
    id: String,
    email: String,
    first_name: String,
    last_name: String,
    role: UserRole,
    password_hash: String,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            first_name: record.first_name,
            last_name: record.last_name,
            role: record.role,
        }
    }
}

/// Authentication service over the `users` collection.
#[derive(Clone)]
pub struct AuthService {
    store: Option<Arc<dyn DocumentStore>>,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: Option<Arc<dyn DocumentStore>>) -> Self {
        Self { store }
    }

    fn store(&self) -> Result<&dyn DocumentStore, AuthError> {
        self.store
            .as_deref()
            .ok_or(AuthError::Unavailable)
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` / `AuthError::WeakPassword` on
    /// validation failures, `AuthError::UserAlreadyExists` for duplicate
    /// emails, and `AuthError::Unavailable` without the store capability.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
        role: UserRole,
    ) -> Result<User, AuthError> {
        let store = self.store()?;

        validate_email(email)?;
        validate_password(password)?;

        let existing = store
            .query_eq(collections::USERS, &[FieldClause::new("email", email)])
            .await?;
        if !existing.is_empty() {
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = hash_password(password)?;
        let record = UserRecord {
            id: String::new(),
            email: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            role,
            password_hash,
        };

        let id = store.create(collections::USERS, encode(&record)?).await?;

        Ok(User {
            id,
            email: record.email,
            first_name: record.first_name,
            last_name: record.last_name,
            role: record.role,
        })
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` when the email is unknown or
    /// the password does not match.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let store = self.store()?;

        let documents = store
            .query_eq(collections::USERS, &[FieldClause::new("email", email)])
            .await?;

        let record: UserRecord = documents
            .into_iter()
            .next()
            .ok_or(AuthError::InvalidCredentials)?
            .decode()
            .map_err(|_| AuthError::InvalidCredentials)?;

        verify_password(password, &record.password_hash)?;

        Ok(record.into())
    }

    /// Fetch a profile by id.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unavailable` without the store capability.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn user(&self, id: &str) -> Result<Option<User>, AuthError> {
        let store = self.store()?;
        let Some(document) = store.get(collections::USERS, id).await? else {
            return Ok(None);
        };
        let record: UserRecord = document.decode()?;
        Ok(Some(record.into()))
    }
}

/// Validate basic email structure: one `@` with non-empty sides.
fn validate_email(email: &str) -> Result<(), AuthError> {
    if email.is_empty() {
        return Err(AuthError::InvalidEmail("email cannot be empty".to_string()));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(AuthError::InvalidEmail(format!(
            "email must be at most {MAX_EMAIL_LENGTH} characters"
        )));
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(AuthError::InvalidEmail(
            "email must contain an @ symbol".to_string(),
        ));
    };
    if local.is_empty() || domain.is_empty() {
        return Err(AuthError::InvalidEmail(
            "email must have a local part and a domain".to_string(),
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
