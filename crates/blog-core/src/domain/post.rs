use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::User;

/// Post entity - a blog post owned by its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post.
    pub fn new(author_id: Uuid, title: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            content,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge the supplied fields and bump `updated_at`.
    ///
    /// `id`, `author_id` and `created_at` are never touched.
    pub fn apply(&mut self, draft: PostDraft) {
        if let Some(title) = draft.title {
            self.title = title;
        }
        if let Some(content) = draft.content {
            self.content = content;
        }
        self.updated_at = Utc::now().max(self.created_at);
    }
}

/// A post together with its author, as returned by reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostWithAuthor {
    pub post: Post,
    pub author: User,
}

/// The client-writable fields of a post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// How an update treats fields absent from the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// Every writable field must be supplied.
    Replace,
    /// Absent fields keep their current value.
    Partial,
}
