//! Authentication ports.

/// Generates opaque token keys.
pub trait TokenGenerator: Send + Sync {
    /// Produce a fresh, unguessable key.
    fn generate(&self) -> String;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password with a fresh salt.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication infrastructure errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Hashing error: {0}")]
    HashingError(String),

    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),
}
