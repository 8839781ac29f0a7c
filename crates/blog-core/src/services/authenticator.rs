//! Credential verification and token resolution.

use std::sync::Arc;

use crate::domain::{AuthToken, User};
use crate::error::DomainError;
use crate::ports::{PasswordService, TokenGenerator, TokenRepository, UserRepository};

/// Result of a successful password login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: AuthToken,
    pub user: User,
}

pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenRepository>,
    passwords: Arc<dyn PasswordService>,
    keys: Arc<dyn TokenGenerator>,
}

impl Authenticator {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenRepository>,
        passwords: Arc<dyn PasswordService>,
        keys: Arc<dyn TokenGenerator>,
    ) -> Self {
        Self {
            users,
            tokens,
            passwords,
            keys,
        }
    }

    /// Verify a username/password pair and return the user's token.
    ///
    /// The token is created on first login and reused afterwards; logging in
    /// again never rotates it. The username is trimmed the same way
    /// registration trims it.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, DomainError> {
        let username = username.trim();
        let Some(user) = self.users.find_by_username(username).await? else {
            // Keep unknown usernames as slow as wrong passwords.
            let _ = self.passwords.hash(password);
            tracing::debug!("Login attempt for unknown username");
            return Err(DomainError::not_found("user", username));
        };

        if !self.passwords.verify(password, &user.password_hash)? {
            tracing::info!(user_id = %user.id, "Login rejected: wrong password");
            return Err(DomainError::InvalidCredential);
        }

        let candidate = AuthToken::new(self.keys.generate(), user.id);
        let token = self.tokens.get_or_create(candidate).await?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(LoginOutcome { token, user })
    }

    /// Resolve a presented token key to its owner.
    pub async fn authenticate_token(&self, key: &str) -> Result<User, DomainError> {
        if key.is_empty() {
            return Err(DomainError::InvalidCredential);
        }

        let token = self
            .tokens
            .find_by_key(key)
            .await?
            .ok_or(DomainError::InvalidCredential)?;

        self.users
            .find_by_id(token.user_id)
            .await?
            .ok_or(DomainError::InvalidCredential)
    }
}
