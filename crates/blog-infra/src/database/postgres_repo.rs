//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DbConn, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use blog_core::domain::{AuthToken, PostWithAuthor, User};
use blog_core::error::RepoError;
use blog_core::ports::{PostRepository, TokenRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::token::{self, Entity as TokenEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, read_error, write_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// Mask an email for logging to avoid PII in logs.
fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{first}***{domain}"),
                _ => format!("***{domain}"),
            }
        }
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(read_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(read_error)?;

        Ok(result.map(Into::into))
    }

    async fn count(&self) -> Result<u64, RepoError> {
        UserEntity::find().count(&self.db).await.map_err(read_error)
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_with_authors(&self) -> Result<Vec<PostWithAuthor>, RepoError> {
        let rows = PostEntity::find()
            .find_also_related(UserEntity)
            .order_by_asc(post::Column::CreatedAt)
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(read_error)?;

        Ok(rows.into_iter().filter_map(join_author).collect())
    }

    async fn find_with_author(&self, id: Uuid) -> Result<Option<PostWithAuthor>, RepoError> {
        let row = PostEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(&self.db)
            .await
            .map_err(read_error)?;

        Ok(row.and_then(join_author))
    }
}

/// The foreign key makes a missing author impossible; skip such rows if seen.
fn join_author((post, author): (post::Model, Option<user::Model>)) -> Option<PostWithAuthor> {
    let Some(author) = author else {
        tracing::warn!(post_id = %post.id, "Post without author row");
        return None;
    };
    Some(PostWithAuthor {
        post: post.into(),
        author: author.into(),
    })
}

/// PostgreSQL token repository.
pub struct PostgresTokenRepository {
    db: DbConn,
}

impl PostgresTokenRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TokenRepository for PostgresTokenRepository {
    async fn find_by_key(&self, key: &str) -> Result<Option<AuthToken>, RepoError> {
        let result = TokenEntity::find_by_id(key.to_string())
            .one(&self.db)
            .await
            .map_err(read_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<AuthToken>, RepoError> {
        let result = TokenEntity::find()
            .filter(token::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(read_error)?;

        Ok(result.map(Into::into))
    }

    async fn get_or_create(&self, candidate: AuthToken) -> Result<AuthToken, RepoError> {
        let user_id = candidate.user_id;
        let model: token::ActiveModel = candidate.into();

        // ON CONFLICT (user_id) DO NOTHING: the unique index arbitrates
        // concurrent logins, the follow-up read returns the winner.
        let inserted = TokenEntity::insert(model)
            .on_conflict(
                OnConflict::column(token::Column::UserId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(write_error)?;

        if inserted > 0 {
            tracing::debug!(%user_id, "Issued new auth token");
        }

        self.find_by_user(user_id).await?.ok_or(RepoError::NotFound)
    }
}
