//! In-process fakes for service tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{AuthToken, Post, PostWithAuthor, User};
use crate::error::RepoError;
use crate::ports::{
    AuthError, BaseRepository, PasswordService, PostRepository, TokenGenerator, TokenRepository,
    UserRepository,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    tokens: Vec<AuthToken>,
    posts: Vec<Post>,
}

/// One store backing all three repositories.
#[derive(Default)]
pub struct FakeStore {
    tables: Mutex<Tables>,
}

impl FakeStore {
    pub fn token_count(&self) -> usize {
        self.tables.lock().unwrap().tokens.len()
    }

    pub fn user_count(&self) -> usize {
        self.tables.lock().unwrap().users.len()
    }

    /// Insert a user directly, bypassing registration.
    pub fn seed_user(&self, user: User) -> User {
        self.tables.lock().unwrap().users.push(user.clone());
        user
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for FakeStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(RepoError::Constraint("username".into()));
        }
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("email".into()));
        }
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.lock().unwrap();
        let slot = tables
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(RepoError::NotFound)?;
        *slot = user.clone();
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.lock().unwrap();
        tables.users.retain(|u| u.id != id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for FakeStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.user_count() as u64)
    }
}

#[async_trait]
impl TokenRepository for FakeStore {
    async fn find_by_key(&self, key: &str) -> Result<Option<AuthToken>, RepoError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.tokens.iter().find(|t| t.key == key).cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<AuthToken>, RepoError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.tokens.iter().find(|t| t.user_id == user_id).cloned())
    }

    async fn get_or_create(&self, candidate: AuthToken) -> Result<AuthToken, RepoError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(existing) = tables.tokens.iter().find(|t| t.user_id == candidate.user_id) {
            return Ok(existing.clone());
        }
        tables.tokens.push(candidate.clone());
        Ok(candidate)
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for FakeStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        self.tables.lock().unwrap().posts.push(post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.lock().unwrap();
        let slot = tables
            .posts
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or(RepoError::NotFound)?;
        *slot = post.clone();
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.posts.len();
        tables.posts.retain(|p| p.id != id);
        if tables.posts.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for FakeStore {
    async fn list_with_authors(&self) -> Result<Vec<PostWithAuthor>, RepoError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .posts
            .iter()
            .filter_map(|post| {
                let author = tables.users.iter().find(|u| u.id == post.author_id)?;
                Some(PostWithAuthor {
                    post: post.clone(),
                    author: author.clone(),
                })
            })
            .collect())
    }

    async fn find_with_author(&self, id: Uuid) -> Result<Option<PostWithAuthor>, RepoError> {
        let tables = self.tables.lock().unwrap();
        let Some(post) = tables.posts.iter().find(|p| p.id == id) else {
            return Ok(None);
        };
        Ok(tables
            .users
            .iter()
            .find(|u| u.id == post.author_id)
            .map(|author| PostWithAuthor {
                post: post.clone(),
                author: author.clone(),
            }))
    }
}

/// Reversible "hash" so tests stay fast.
pub struct PlainPasswords;

impl PasswordService for PlainPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("plain${password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash.strip_prefix("plain$") == Some(password))
    }
}

/// Produces `key-1`, `key-2`, ...
#[derive(Default)]
pub struct SequentialKeys {
    next: AtomicUsize,
}

impl TokenGenerator for SequentialKeys {
    fn generate(&self) -> String {
        format!("key-{}", self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }
}
