//! # Blog Shared
//!
//! Request/response types for the blog API.
//! Kept free of server dependencies so clients can reuse them.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, FieldErrors};
