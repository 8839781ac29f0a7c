//! Application state - shared across all handlers.

use std::sync::Arc;

use blog_core::ports::{
    PasswordService, PostRepository, TokenGenerator, TokenRepository, UserRepository,
};
use blog_core::services::{
    AcceptAnyPassword, Authenticator, MinimumLength, PasswordPolicy, PostService,
    RegistrationService,
};
use blog_infra::{Argon2PasswordService, InMemoryStore, RandomTokenGenerator};

use crate::config::AppConfig;

#[cfg(feature = "postgres")]
use blog_infra::DatabaseConnections;
#[cfg(feature = "postgres")]
use blog_infra::DbErr;

/// Without the postgres feature, start-up cannot fail.
#[cfg(not(feature = "postgres"))]
type DbErr = std::convert::Infallible;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub registration: Arc<RegistrationService>,
    pub authenticator: Arc<Authenticator>,
    pub posts: Arc<PostService>,
    /// Name of the storage backend in use, reported by the health check.
    pub storage: &'static str,
}

/// The three repository ports, backed by one storage engine.
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn TokenRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub backend: &'static str,
}

impl Repositories {
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            tokens: store.clone(),
            posts: store,
            backend: "memory",
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(db: &DatabaseConnections) -> Self {
        Self {
            users: Arc::new(db.user_repository()),
            tokens: Arc::new(db.token_repository()),
            posts: Arc::new(db.post_repository()),
            backend: "postgres",
        }
    }

    /// Connect to the configured database. Without one, use the in-memory
    /// store; a configured database that cannot be reached is an error.
    #[cfg(feature = "postgres")]
    async fn connect(config: &AppConfig) -> Result<Self, DbErr> {
        match &config.database {
            Some(db_config) => {
                let connections = DatabaseConnections::init(db_config).await?;
                Ok(Self::postgres(&connections))
            }
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Ok(Self::in_memory())
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect(config: &AppConfig) -> Result<Self, DbErr> {
        if config.database.is_some() {
            tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
        }
        tracing::info!("Running without postgres feature - using in-memory store");
        Ok(Self::in_memory())
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Result<Self, DbErr> {
        let repos = Repositories::connect(config).await?;

        let passwords: Arc<dyn PasswordService> =
            match Argon2PasswordService::with_config(config.argon2) {
                Ok(service) => Arc::new(service),
                Err(e) => {
                    tracing::error!("{}. Using default Argon2 parameters.", e);
                    Arc::new(Argon2PasswordService::new())
                }
            };

        let password_policy: Arc<dyn PasswordPolicy> = match config.password_min_length {
            Some(min) => Arc::new(MinimumLength(min)),
            None => Arc::new(AcceptAnyPassword),
        };

        let state = Self::from_parts(
            repos,
            passwords,
            Arc::new(RandomTokenGenerator),
            password_policy,
        );
        tracing::info!(storage = state.storage, "Application state initialized");
        Ok(state)
    }

    pub fn from_parts(
        repos: Repositories,
        passwords: Arc<dyn PasswordService>,
        keys: Arc<dyn TokenGenerator>,
        password_policy: Arc<dyn PasswordPolicy>,
    ) -> Self {
        let registration = RegistrationService::new(repos.users.clone(), passwords.clone())
            .with_password_policy(password_policy);
        let authenticator = Authenticator::new(repos.users, repos.tokens, passwords, keys);

        Self {
            registration: Arc::new(registration),
            authenticator: Arc::new(authenticator),
            posts: Arc::new(PostService::new(repos.posts)),
            storage: repos.backend,
        }
    }

    /// In-memory state with cheap hashing, for handler tests.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        let passwords = Argon2PasswordService::with_config(blog_infra::Argon2Config {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("valid test parameters");

        Self::from_parts(
            Repositories::in_memory(),
            Arc::new(passwords),
            Arc::new(RandomTokenGenerator),
            Arc::new(AcceptAnyPassword),
        )
    }
}
