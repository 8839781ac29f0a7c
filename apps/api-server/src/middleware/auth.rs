//! Authentication extractors.
//!
//! Clients send `Authorization: Token <key>` (or `Bearer <key>`). A request
//! without the header is anonymous; a header that is malformed or names an
//! unknown key is rejected with 401 even on read-only routes.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::Future;
use std::pin::Pin;

use blog_core::DomainError;
use blog_core::domain::User;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Authenticated user identity extractor.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.0.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity(pub User);

/// Optional identity extractor - anonymous when no credentials are sent.
#[derive(Debug, Clone)]
pub struct OptionalIdentity(pub Option<User>);

impl OptionalIdentity {
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }
}

/// Extract the token key from an `Authorization` header value.
///
/// Returns `Ok(None)` when the header uses some other scheme, so it is
/// treated as if no credentials were sent.
fn parse_authorization(value: &str) -> Result<Option<&str>, AppError> {
    let mut parts = value.split_whitespace();

    let Some(keyword) = parts.next() else {
        return Ok(None);
    };
    if !keyword.eq_ignore_ascii_case("token") && !keyword.eq_ignore_ascii_case("bearer") {
        return Ok(None);
    }

    let invalid = |msg: &str| AppError::Unauthenticated(format!("Invalid token header. {msg}"));
    match (parts.next(), parts.next()) {
        (None, _) => Err(invalid("No credentials provided.")),
        (Some(key), None) => Ok(Some(key)),
        (Some(_), Some(_)) => Err(invalid("Token string should not contain spaces.")),
    }
}

async fn resolve(req: HttpRequest) -> Result<Option<User>, AppError> {
    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| {
        AppError::Unauthenticated(
            "Invalid token header. Token string should not contain invalid characters."
                .to_string(),
        )
    })?;

    let Some(key) = parse_authorization(value)? else {
        return Ok(None);
    };

    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        tracing::error!("AppState not found in app data");
        return Err(AppError::Internal("Server configuration error".to_string()));
    };

    match state.authenticator.authenticate_token(key).await {
        Ok(user) => Ok(Some(user)),
        Err(DomainError::InvalidCredential) => {
            tracing::debug!("Rejected unknown token");
            Err(AppError::Unauthenticated("Invalid token.".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

impl FromRequest for OptionalIdentity {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { resolve(req).await.map(OptionalIdentity) })
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            match resolve(req).await? {
                Some(user) => Ok(Identity(user)),
                None => Err(DomainError::Unauthenticated.into()),
            }
        })
    }
}
