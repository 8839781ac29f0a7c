//! Domain entities - the core business objects.

mod post;
mod token;
mod user;

pub use post::{Post, PostDraft, PostWithAuthor, UpdateMode};
pub use token::AuthToken;
pub use user::User;
