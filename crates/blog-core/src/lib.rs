//! # Blog Core
//!
//! The domain layer of the blog API.
//! Identities, tokens and posts, the rules that decide who may do what with
//! them, and the ports that infrastructure must implement. No I/O lives here.

pub mod domain;
pub mod error;
pub mod policy;
pub mod ports;
pub mod services;
pub mod validation;

pub use error::{DomainError, RepoError};
pub use validation::{FieldError, FieldErrorKind, ValidationErrors};
