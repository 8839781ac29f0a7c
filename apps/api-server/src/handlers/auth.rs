//! Account handlers: registration, token login and the current user.

use actix_web::{HttpResponse, web};

use blog_core::DomainError;
use blog_core::services::Registration;
use blog_shared::FieldErrors;
use blog_shared::dto::{LoginRequest, LoginResponse, RegisterRequest};

use super::user_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const LOGIN_FAILED: &str = "Unable to log in with provided credentials.";
const REQUIRED: &str = "This field is required.";

/// POST /register/
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .registration
        .register(Registration {
            username: req.username,
            email: req.email,
            password: req.password,
            password_confirmation: req.password2,
        })
        .await?;

    Ok(HttpResponse::Created().json(user_response(&user)))
}

/// POST /login/
///
/// Returns the caller's token, creating it on first login.
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut missing = FieldErrors::default();
    let username = req.username.trim();
    // Passwords are taken verbatim; only an empty one counts as missing.
    for (field, value) in [("username", username), ("password", req.password.as_str())] {
        if value.is_empty() {
            missing.0.insert(field.to_string(), vec![REQUIRED.to_string()]);
        }
    }
    if !missing.0.is_empty() {
        return Err(AppError::Validation(missing));
    }

    let outcome = match state.authenticator.login(username, &req.password).await {
        Ok(outcome) => outcome,
        Err(DomainError::NotFound { .. } | DomainError::InvalidCredential) => {
            return Err(AppError::Validation(FieldErrors::single(
                FieldErrors::NON_FIELD,
                LOGIN_FAILED,
            )));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(HttpResponse::Ok().json(LoginResponse {
        token: outcome.token.key,
        user: user_response(&outcome.user),
    }))
}

/// GET /user/ - Protected route
pub async fn current_user(identity: Identity) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(user_response(&identity.0)))
}
