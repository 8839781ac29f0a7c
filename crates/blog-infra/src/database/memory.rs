//! In-memory store - used when no database is configured.
//!
//! Mirrors the database constraints: unique username/email, one token per
//! user, posts must reference an existing author, and deleting a user
//! cascades to its token and posts. Every check-and-write runs under a single
//! write lock, so concurrent requests cannot both pass a uniqueness check.
//! Note: Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::{AuthToken, Post, PostWithAuthor, User};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, PostRepository, TokenRepository, UserRepository};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    /// Keyed by user id; at most one token per user.
    tokens: HashMap<Uuid, AuthToken>,
    posts: HashMap<Uuid, Post>,
}

impl Tables {
    fn with_author(&self, post: &Post) -> Option<PostWithAuthor> {
        self.users.get(&post.author_id).map(|author| PostWithAuthor {
            post: post.clone(),
            author: author.clone(),
        })
    }
}

/// Implements every repository port over shared in-process tables.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint("username".to_string()));
        }
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("email".to_string()));
        }

        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;

        let clash = tables
            .users
            .values()
            .find(|u| u.id != user.id && (u.username == user.username || u.email == user.email));
        if let Some(other) = clash {
            let column = if other.username == user.username { "username" } else { "email" };
            return Err(RepoError::Constraint(column.to_string()));
        }

        let slot = tables.users.get_mut(&user.id).ok_or(RepoError::NotFound)?;
        *slot = user.clone();
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;

        tables.users.remove(&id).ok_or(RepoError::NotFound)?;
        tables.tokens.remove(&id);
        tables.posts.retain(|_, p| p.author_id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.tables.read().await.users.len() as u64)
    }
}

#[async_trait]
impl TokenRepository for InMemoryStore {
    async fn find_by_key(&self, key: &str) -> Result<Option<AuthToken>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.tokens.values().find(|t| t.key == key).cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<AuthToken>, RepoError> {
        Ok(self.tables.read().await.tokens.get(&user_id).cloned())
    }

    async fn get_or_create(&self, candidate: AuthToken) -> Result<AuthToken, RepoError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&candidate.user_id) {
            return Err(RepoError::Constraint("user_id".to_string()));
        }

        let token = tables
            .tokens
            .entry(candidate.user_id)
            .or_insert(candidate)
            .clone();
        Ok(token)
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&post.author_id) {
            return Err(RepoError::Constraint("author_id".to_string()));
        }

        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;

        let slot = tables.posts.get_mut(&post.id).ok_or(RepoError::NotFound)?;
        *slot = post.clone();
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;

        tables.posts.remove(&id).ok_or(RepoError::NotFound)?;
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn list_with_authors(&self) -> Result<Vec<PostWithAuthor>, RepoError> {
        let tables = self.tables.read().await;

        let mut posts: Vec<PostWithAuthor> = tables
            .posts
            .values()
            .filter_map(|post| tables.with_author(post))
            .collect();
        posts.sort_by_key(|p| (p.post.created_at, p.post.id));
        Ok(posts)
    }

    async fn find_with_author(&self, id: Uuid) -> Result<Option<PostWithAuthor>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.get(&id).and_then(|post| tables.with_author(post)))
    }
}
