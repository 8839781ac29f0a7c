use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{AuthToken, Post, PostWithAuthor, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. Unique violations surface as `RepoError::Constraint`.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Credential store.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn count(&self) -> Result<u64, RepoError>;
}

/// Token store.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn find_by_key(&self, key: &str) -> Result<Option<AuthToken>, RepoError>;

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<AuthToken>, RepoError>;

    /// Store `candidate` unless its user already has a token, and return
    /// whichever token is now on record. Must be atomic: concurrent calls for
    /// one user all observe the same token.
    async fn get_or_create(&self, candidate: AuthToken) -> Result<AuthToken, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// All posts with their authors, oldest first.
    async fn list_with_authors(&self) -> Result<Vec<PostWithAuthor>, RepoError>;

    async fn find_with_author(&self, id: Uuid) -> Result<Option<PostWithAuthor>, RepoError>;
}
