//! Blog post use cases. Every mutation goes through the policy first.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Post, PostDraft, PostWithAuthor, UpdateMode, User};
use crate::error::{DomainError, RepoError};
use crate::policy::{self, Action};
use crate::ports::PostRepository;
use crate::validation::{FieldError, ValidationErrors};

pub const TITLE_MAX_CHARS: usize = 200;

pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    pub async fn list(&self) -> Result<Vec<PostWithAuthor>, DomainError> {
        Ok(self.posts.list_with_authors().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<PostWithAuthor, DomainError> {
        self.posts
            .find_with_author(id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", id))
    }

    /// Create a post owned by `actor`.
    pub async fn create(
        &self,
        draft: PostDraft,
        actor: Option<&User>,
    ) -> Result<PostWithAuthor, DomainError> {
        policy::authorize::<Post>(Action::Create, actor, None)?;
        let Some(author) = actor else {
            return Err(DomainError::Unauthenticated);
        };

        let draft = validate_draft(draft, UpdateMode::Replace)?;
        let post = Post::new(
            author.id,
            draft.title.unwrap_or_default(),
            draft.content.unwrap_or_default(),
        );
        let post = self.posts.insert(post).await?;

        tracing::info!(post_id = %post.id, author_id = %author.id, "Post created");
        Ok(PostWithAuthor {
            post,
            author: author.clone(),
        })
    }

    /// Apply `draft` to an existing post. Only its author may do this.
    pub async fn update(
        &self,
        id: Uuid,
        draft: PostDraft,
        mode: UpdateMode,
        actor: Option<&User>,
    ) -> Result<PostWithAuthor, DomainError> {
        let existing = self.get(id).await?;
        policy::authorize(Action::Update, actor, Some(&existing))?;

        let draft = validate_draft(draft, mode)?;
        let PostWithAuthor { mut post, author } = existing;
        post.apply(draft);

        let post = self.posts.update(post).await.map_err(|e| missing(e, id))?;

        tracing::info!(post_id = %post.id, "Post updated");
        Ok(PostWithAuthor { post, author })
    }

    /// Remove a post. Only its author may do this.
    pub async fn delete(&self, id: Uuid, actor: Option<&User>) -> Result<(), DomainError> {
        let existing = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", id))?;
        policy::authorize(Action::Delete, actor, Some(&existing))?;

        self.posts.delete(id).await.map_err(|e| missing(e, id))?;

        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }
}

/// A post that vanished between read and write is reported as not found.
fn missing(err: RepoError, id: Uuid) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::not_found("post", id),
        other => other.into(),
    }
}

fn validate_draft(draft: PostDraft, mode: UpdateMode) -> Result<PostDraft, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let required = mode == UpdateMode::Replace;

    let title = draft.title.map(|t| t.trim().to_string());
    match &title {
        None if required => errors.push(FieldError::required("title")),
        Some(t) if t.is_empty() => errors.push(FieldError::invalid(
            "title",
            "This field may not be blank.",
        )),
        Some(t) if t.chars().count() > TITLE_MAX_CHARS => errors.push(FieldError::invalid(
            "title",
            format!("Ensure this field has no more than {TITLE_MAX_CHARS} characters."),
        )),
        _ => {}
    }

    match &draft.content {
        None if required => errors.push(FieldError::required("content")),
        Some(c) if c.trim().is_empty() => errors.push(FieldError::invalid(
            "content",
            "This field may not be blank.",
        )),
        _ => {}
    }

    errors.into_result()?;
    Ok(PostDraft {
        title,
        content: draft.content,
    })
}
