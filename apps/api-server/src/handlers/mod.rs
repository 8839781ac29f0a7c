//! HTTP handlers and route configuration.

mod auth;
mod blogs;
mod health;

#[cfg(test)]
mod tests;

use actix_web::web;

use blog_core::domain::{PostWithAuthor, User};
use blog_shared::dto::{PostResponse, UserResponse};

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("JSON parse error - {err}")).into()
    }))
    .app_data(
        web::PathConfig::default()
            .error_handler(|_err, _req| AppError::NotFound("Not found.".to_string()).into()),
    )
    // Public routes
    .route("/health", web::get().to(health::health_check))
    // Accounts
    .route("/register/", web::post().to(auth::register))
    .route("/login/", web::post().to(auth::login))
    .route("/user/", web::get().to(auth::current_user))
    // Posts
    .service(
        web::resource("/blogs/")
            .route(web::get().to(blogs::list_posts))
            .route(web::post().to(blogs::create_post)),
    )
    .service(
        web::resource("/blogs/{id}/")
            .route(web::get().to(blogs::get_post))
            .route(web::put().to(blogs::replace_post))
            .route(web::patch().to(blogs::patch_post))
            .route(web::delete().to(blogs::delete_post)),
    );
}

pub(crate) fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
    }
}

pub(crate) fn post_response(item: &PostWithAuthor) -> PostResponse {
    PostResponse {
        id: item.post.id,
        title: item.post.title.clone(),
        content: item.post.content.clone(),
        author: user_response(&item.author),
        created_at: item.post.created_at,
        updated_at: item.post.updated_at,
    }
}
