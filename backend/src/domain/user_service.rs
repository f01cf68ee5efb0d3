//! User account management: registration, login, logout, and the password
//! policy.

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use shared::{PasswordRuleViolation, PasswordValidation};
use tracing::info;

use crate::domain::commands::auth::{LoginCommand, RegisterCommand};
use crate::domain::models::{self, user::User};
use crate::domain::DomainError;
use crate::storage::traits::UserStore;
use crate::storage::StorageError;

/// Characters that satisfy the special-character password rule
const SPECIAL_CHARACTERS: &str = "!@#$%^&*()-_=+[]{};:'\",.<>/?\\|`~";

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Clone)]
pub struct UserService {
    user_store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(user_store: Arc<dyn UserStore>) -> Self {
        Self { user_store }
    }

    /// Check a candidate password against the account policy: at least 8
    /// characters, with an uppercase letter, a digit, and a special
    /// character.
    pub fn validate_password(password: &str) -> PasswordValidation {
        let mut violations = Vec::new();

        let length = password.chars().count();
        if length < MIN_PASSWORD_LENGTH {
            violations.push(PasswordRuleViolation::TooShort(length));
        }
        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            violations.push(PasswordRuleViolation::MissingUppercase);
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            violations.push(PasswordRuleViolation::MissingDigit);
        }
        if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
            violations.push(PasswordRuleViolation::MissingSpecialCharacter);
        }

        PasswordValidation {
            is_valid: violations.is_empty(),
            violations,
        }
    }

    /// Create a new account. Fails when the username is taken or the
    /// password does not satisfy the policy.
    pub async fn register(&self, command: RegisterCommand) -> Result<User> {
        let username = command.username.trim();
        if username.is_empty() {
            return Err(DomainError::Validation("Username cannot be empty".to_string()).into());
        }

        let validation = Self::validate_password(&command.password);
        if !validation.is_valid {
            return Err(DomainError::Validation(describe_violations(&validation.violations)).into());
        }

        if self
            .user_store
            .get_user_by_username(username)
            .await?
            .is_some()
        {
            return Err(StorageError::Conflict(format!(
                "Username '{}' is already taken",
                username
            ))
            .into());
        }

        let user = User {
            id: User::generate_id(models::epoch_millis()),
            username: username.to_string(),
            password: command.password,
            created_at: Utc::now(),
        };
        self.user_store.store_user(&user).await?;

        info!("Registered new user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// Attempt to log in. Returns `None` on bad credentials; a successful
    /// login makes the user the active user.
    pub async fn login(&self, command: LoginCommand) -> Result<Option<User>> {
        let username = command.username.trim();
        let user = self.user_store.get_user_by_username(username).await?;

        match user {
            Some(user) if user.password == command.password => {
                self.user_store.set_active_user(&user.id).await?;
                info!("User {} logged in", user.id);
                Ok(Some(user))
            }
            _ => {
                info!("Rejected login attempt for username '{}'", username);
                Ok(None)
            }
        }
    }

    /// Log out the active user. A no-op when nobody is logged in.
    pub async fn logout(&self) -> Result<()> {
        self.user_store.clear_active_user().await?;
        info!("Active user logged out");
        Ok(())
    }

    /// Look up a user by ID.
    pub async fn get_user(&self, user_id: &str) -> Result<User> {
        self.user_store
            .get_user(user_id)
            .await?
            .ok_or_else(|| StorageError::not_found("user", user_id).into())
    }

    /// The currently logged-in user, if any.
    pub async fn get_active_user(&self) -> Result<Option<User>> {
        match self.user_store.get_active_user().await? {
            Some(user_id) => self.user_store.get_user(&user_id).await,
            None => Ok(None),
        }
    }
}

fn describe_violations(violations: &[PasswordRuleViolation]) -> String {
    let parts: Vec<String> = violations
        .iter()
        .map(|v| match v {
            PasswordRuleViolation::TooShort(length) => format!(
                "password must be at least {} characters (got {})",
                MIN_PASSWORD_LENGTH, length
            ),
            PasswordRuleViolation::MissingUppercase => {
                "password must contain an uppercase letter".to_string()
            }
            PasswordRuleViolation::MissingDigit => "password must contain a digit".to_string(),
            PasswordRuleViolation::MissingSpecialCharacter => {
                "password must contain a special character".to_string()
            }
        })
        .collect();
    parts.join("; ")
}
