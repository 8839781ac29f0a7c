//! Application services - the use cases built on top of the ports.

mod authenticator;
mod posts;
mod registration;

#[cfg(test)]
mod testing;

pub use authenticator::{Authenticator, LoginOutcome};
pub use posts::{PostService, TITLE_MAX_CHARS};
pub use registration::{
    AcceptAnyPassword, MinimumLength, PasswordPolicy, Registration, RegistrationService,
    USERNAME_MAX_CHARS,
};
