//! Identity provider contract and a development implementation.
//!
//! Credential issuance lives outside this workspace. The in-memory
//! provider maps pre-shared bearer tokens to users, which is enough to
//! exercise the authority checks locally.

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use cidade_alerta_report_models::User;
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// Verifies credentials and resolves users.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves a bearer credential to a user ID. A leading `Bearer `
    /// prefix is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unauthenticated`] if the credential is empty
    /// or unknown.
    async fn verify(&self, credential: &str) -> Result<String, StoreError>;

    /// Returns the user with the given ID.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such user exists.
    async fn user(&self, user_id: &str) -> Result<User, StoreError>;

    /// Whether the user has authority privileges.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such user exists.
    async fn is_authority(&self, user_id: &str) -> Result<bool, StoreError> {
        Ok(self.user(user_id).await?.is_authority)
    }
}

/// Verifies `credential` and checks that its user is an authority.
///
/// An unknown user is refused the same way as a non-authority.
///
/// # Errors
///
/// Returns [`StoreError::Unauthenticated`] for a bad credential and
/// [`StoreError::Forbidden`] when the user is missing or lacks authority.
pub async fn require_authority(
    identity: &dyn IdentityProvider,
    credential: &str,
) -> Result<User, StoreError> {
    let user_id = identity.verify(credential).await?;
    match identity.user(&user_id).await {
        Ok(user) if user.is_authority => Ok(user),
        Ok(_) | Err(StoreError::NotFound { .. }) => {
            log::warn!("User {user_id} attempted an authority-only action");
            Err(StoreError::Forbidden {
                message: "only authorities can access this resource".to_string(),
            })
        }
        Err(e) => Err(e),
    }
}

/// A user together with the development token that authenticates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Bearer token accepted for this user.
    pub token: String,
    /// The user record.
    #[serde(flatten)]
    pub user: User,
}

/// Token-to-user table held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityProvider {
    tokens: BTreeMap<String, String>,
    users: BTreeMap<String, User>,
}

impl InMemoryIdentityProvider {
    /// Builds the provider from a list of accounts.
    #[must_use]
    pub fn new(accounts: Vec<UserAccount>) -> Self {
        let mut tokens = BTreeMap::new();
        let mut users = BTreeMap::new();
        for UserAccount { token, user } in accounts {
            if !token.is_empty() {
                tokens.insert(token, user.id.clone());
            }
            users.insert(user.id.clone(), user);
        }
        Self { tokens, users }
    }

    /// Loads a JSON array of [`UserAccount`]s from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self, StoreError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let accounts: Vec<UserAccount> = serde_json::from_str(&raw)?;
        log::info!("Loaded {} user account(s) from {}", accounts.len(), path.display());
        Ok(Self::new(accounts))
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn verify(&self, credential: &str) -> Result<String, StoreError> {
        let token = credential.trim();
        let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
        if token.is_empty() {
            return Err(StoreError::Unauthenticated {
                message: "authentication required".to_string(),
            });
        }

        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| StoreError::Unauthenticated {
                message: "invalid or expired token".to_string(),
            })
    }

    async fn user(&self, user_id: &str) -> Result<User, StoreError> {
        self.users
            .get(user_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                kind: "user",
                id: user_id.to_string(),
            })
    }
}
