//! Authentication implementations.

mod password;
mod token;

pub use password::{Argon2Config, Argon2PasswordService};
pub use token::{RandomTokenGenerator, TOKEN_KEY_BYTES};
