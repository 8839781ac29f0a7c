//! Account registration: validate a candidate, then store a new identity.

use std::fmt;
use std::sync::Arc;

use validator::ValidateEmail;

use crate::domain::User;
use crate::error::{DomainError, RepoError};
use crate::ports::{PasswordService, UserRepository};
use crate::validation::{FieldError, ValidationErrors};

pub const USERNAME_MAX_CHARS: usize = 150;

const PASSWORD_MISMATCH: &str = "Password fields didn't match.";

/// A registration request as submitted by the client.
#[derive(Clone, Default)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Password strength rules applied after the confirmation check.
pub trait PasswordPolicy: Send + Sync {
    /// Human-readable problems with `password`; empty when acceptable.
    fn check(&self, password: &str) -> Vec<String>;
}

/// Accepts every password. No strength rules are enforced by default.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAnyPassword;

impl PasswordPolicy for AcceptAnyPassword {
    fn check(&self, _password: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Rejects passwords shorter than the configured number of characters.
#[derive(Debug, Clone, Copy)]
pub struct MinimumLength(pub usize);

impl PasswordPolicy for MinimumLength {
    fn check(&self, password: &str) -> Vec<String> {
        if password.chars().count() < self.0 {
            vec![format!(
                "This password is too short. It must contain at least {} characters.",
                self.0
            )]
        } else {
            Vec::new()
        }
    }
}

pub struct RegistrationService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    password_policy: Arc<dyn PasswordPolicy>,
}

impl RegistrationService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self {
            users,
            passwords,
            password_policy: Arc::new(AcceptAnyPassword),
        }
    }

    pub fn with_password_policy(mut self, policy: Arc<dyn PasswordPolicy>) -> Self {
        self.password_policy = policy;
        self
    }

    /// Validate `candidate` and return its normalized form.
    ///
    /// Field checks are collected together; the password confirmation and
    /// strength rules only run once every field is individually valid.
    pub async fn validate(&self, candidate: &Registration) -> Result<Registration, DomainError> {
        let username = candidate.username.trim().to_string();
        let email = normalize_email(&candidate.email);
        let mut errors = ValidationErrors::new();

        if username.is_empty() {
            errors.push(FieldError::required("username"));
        } else if let Some(problem) = username_problem(&username) {
            errors.push(FieldError::invalid("username", problem));
        } else if self.users.find_by_username(&username).await?.is_some() {
            errors.push(duplicate("username"));
        }

        if email.is_empty() {
            errors.push(FieldError::required("email"));
        } else if !email.validate_email() {
            errors.push(FieldError::invalid("email", "Enter a valid email address."));
        } else if self.users.find_by_email(&email).await?.is_some() {
            errors.push(duplicate("email"));
        }

        if candidate.password.trim().is_empty() {
            errors.push(FieldError::required("password"));
        }
        if candidate.password_confirmation.trim().is_empty() {
            errors.push(FieldError::required("password2"));
        }

        errors.into_result()?;

        if candidate.password != candidate.password_confirmation {
            return Err(FieldError::mismatch("password", PASSWORD_MISMATCH).into());
        }

        let mut errors = ValidationErrors::new();
        for problem in self.password_policy.check(&candidate.password) {
            errors.push(FieldError::invalid("password", problem));
        }
        errors.into_result()?;

        Ok(Registration {
            username,
            email,
            password: candidate.password.clone(),
            password_confirmation: candidate.password_confirmation.clone(),
        })
    }

    /// Validate, hash the password and store a new identity.
    ///
    /// No token is issued here; that happens on first login.
    pub async fn register(&self, candidate: Registration) -> Result<User, DomainError> {
        let clean = self.validate(&candidate).await?;
        let password_hash = self.passwords.hash(&clean.password)?;
        let user = User::new(clean.username, clean.email, password_hash);

        match self.users.insert(user).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, username = %user.username, "User registered");
                Ok(user)
            }
            // Lost a race against a concurrent registration.
            Err(RepoError::Constraint(column)) => match column.as_str() {
                "username" => Err(duplicate("username").into()),
                "email" => Err(duplicate("email").into()),
                _ => Err(DomainError::Internal(format!("constraint violation on {column}"))),
            },
            Err(e) => Err(e.into()),
        }
    }
}

fn duplicate(field: &'static str) -> FieldError {
    FieldError::duplicate(field, format!("A user with that {field} already exists."))
}

fn username_problem(username: &str) -> Option<String> {
    if username.chars().count() > USERNAME_MAX_CHARS {
        return Some(format!(
            "Ensure this field has no more than {USERNAME_MAX_CHARS} characters."
        ));
    }
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if !username.chars().all(allowed) {
        return Some(
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
                .to_string(),
        );
    }
    None
}

/// Trim and lower-case the domain part.
fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    }
}
