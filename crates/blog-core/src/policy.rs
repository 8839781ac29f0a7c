//! Object-level authorization.
//!
//! Reads are open to everyone, creation needs an identity, and only a
//! resource's owner may change or remove it. There is no role system and no
//! admin override.

use uuid::Uuid;

use crate::domain::{Post, PostWithAuthor, User};
use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

impl Action {
    /// Actions that never modify state.
    pub fn is_safe(self) -> bool {
        matches!(self, Action::Read)
    }
}

/// A resource with a single owning identity.
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

impl Owned for Post {
    fn owner_id(&self) -> Uuid {
        self.author_id
    }
}

impl Owned for PostWithAuthor {
    fn owner_id(&self) -> Uuid {
        self.post.author_id
    }
}

/// Outcome of a policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// A write was attempted without any identity.
    Unauthenticated,
    /// An identity was present but does not own the resource.
    Forbidden,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }

    pub fn into_result(self) -> Result<(), DomainError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Unauthenticated => Err(DomainError::Unauthenticated),
            Decision::Forbidden => Err(DomainError::Forbidden),
        }
    }
}

/// Decide whether `actor` may perform `action` on `resource`.
///
/// `resource` is `None` for `Create`, where nothing exists yet. An update or
/// delete without a resource is denied.
pub fn decide<R: Owned + ?Sized>(
    action: Action,
    actor: Option<&User>,
    resource: Option<&R>,
) -> Decision {
    if action.is_safe() {
        return Decision::Allow;
    }

    let Some(actor) = actor else {
        return Decision::Unauthenticated;
    };

    match action {
        Action::Read | Action::Create => Decision::Allow,
        Action::Update | Action::Delete => match resource {
            Some(resource) if resource.owner_id() == actor.id => Decision::Allow,
            _ => Decision::Forbidden,
        },
    }
}

pub fn allow<R: Owned + ?Sized>(
    action: Action,
    actor: Option<&User>,
    resource: Option<&R>,
) -> bool {
    decide(action, actor, resource).is_allowed()
}

/// Like [`decide`], mapping denials to `Unauthenticated` / `Forbidden`.
pub fn authorize<R: Owned + ?Sized>(
    action: Action,
    actor: Option<&User>,
    resource: Option<&R>,
) -> Result<(), DomainError> {
    let decision = decide(action, actor, resource);
    if !decision.is_allowed() {
        tracing::debug!(
            ?action,
            ?decision,
            actor_id = ?actor.map(|a| a.id),
            "Policy denied action"
        );
    }
    decision.into_result()
}
