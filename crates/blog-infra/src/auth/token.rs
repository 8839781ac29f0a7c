//! Opaque token key generation.

use std::fmt::Write;

use argon2::password_hash::rand_core::{OsRng, RngCore};

use blog_core::ports::TokenGenerator;

/// Random bytes per key; rendered as twice as many hex characters.
pub const TOKEN_KEY_BYTES: usize = 20;

/// Draws keys from the operating system's CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTokenGenerator;

impl TokenGenerator for RandomTokenGenerator {
    fn generate(&self) -> String {
        let mut bytes = [0u8; TOKEN_KEY_BYTES];
        OsRng.fill_bytes(&mut bytes);

        bytes
            .iter()
            .fold(String::with_capacity(TOKEN_KEY_BYTES * 2), |mut key, b| {
                let _ = write!(key, "{b:02x}");
                key
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_shape() {
        let key = RandomTokenGenerator.generate();

        assert_eq!(key.len(), TOKEN_KEY_BYTES * 2);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_keys_differ() {
        assert_ne!(RandomTokenGenerator.generate(), RandomTokenGenerator.generate());
    }
}
