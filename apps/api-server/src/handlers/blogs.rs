//! Blog post handlers. Reads are public; writes need a token and, for
//! existing posts, ownership.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blog_core::domain::{Post, PostDraft, UpdateMode};
use blog_core::policy::{self, Action};
use blog_shared::dto::{PostRequest, PostResponse};

use super::post_response;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn draft(body: web::Json<PostRequest>) -> PostDraft {
    let req = body.into_inner();
    PostDraft {
        title: req.title,
        content: req.content,
    }
}

/// GET /blogs/
pub async fn list_posts(
    _identity: OptionalIdentity,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.list().await?;
    let body: Vec<PostResponse> = posts.iter().map(post_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /blogs/
///
/// The caller is checked before the body, so an anonymous request is a 401
/// whatever it sends.
pub async fn create_post(
    identity: OptionalIdentity,
    state: web::Data<AppState>,
    body: Result<web::Json<PostRequest>, actix_web::Error>,
) -> actix_web::Result<HttpResponse> {
    policy::authorize::<Post>(Action::Create, identity.user(), None).map_err(AppError::from)?;
    let body = body?;

    let created = state
        .posts
        .create(draft(body), identity.user())
        .await
        .map_err(AppError::from)?;
    Ok(HttpResponse::Created().json(post_response(&created)))
}

/// GET /blogs/{id}/
pub async fn get_post(
    _identity: OptionalIdentity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post_response(&post)))
}

/// PUT /blogs/{id}/
pub async fn replace_post(
    identity: OptionalIdentity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    update(identity, state, path, body, UpdateMode::Replace).await
}

/// PATCH /blogs/{id}/
pub async fn patch_post(
    identity: OptionalIdentity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    update(identity, state, path, body, UpdateMode::Partial).await
}

async fn update(
    identity: OptionalIdentity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
    mode: UpdateMode,
) -> AppResult<HttpResponse> {
    let updated = state
        .posts
        .update(path.into_inner(), draft(body), mode, identity.user())
        .await?;
    Ok(HttpResponse::Ok().json(post_response(&updated)))
}

/// DELETE /blogs/{id}/
pub async fn delete_post(
    identity: OptionalIdentity,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .posts
        .delete(path.into_inner(), identity.user())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
