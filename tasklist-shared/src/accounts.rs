/// Account flows: registration, confirmation, login and password reset
///
/// ```text
/// register ──> Pending ──confirm_email──> Active ──login──> Session
///                 │                         │
///                 └── login: AccountInactive└── forgot_password ─> reset_password
/// ```
///
/// Emails are dispatched on a spawned task once the user record is written;
/// a delivery failure is logged and never fails the request that caused it.

use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use validator::ValidateEmail;

use crate::auth::jwt::TokenService;
use crate::auth::password::{hash_password, validate_password, verify_password};
use crate::error::{DomainError, DomainResult};
use crate::mail::{confirmation_email, password_reset_email, Email, Mailer};
use crate::models::{AccountStatus, NewUser, User};
use crate::store::UserStore;

/// Issued on successful login
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub access_token: String,
    pub token_type: &'static str,
}

/// Composes store, tokens, hashing and mail into the account flows
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn UserStore>,
    tokens: TokenService,
    mailer: Arc<dyn Mailer>,
}

impl AccountService {
    pub fn new(store: Arc<dyn UserStore>, tokens: TokenService, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            store,
            tokens,
            mailer,
        }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Creates a pending account and mails its confirmation link
    ///
    /// `base_url` is the public root of the service, e.g. `http://host:8000/`.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        base_url: &str,
    ) -> DomainResult<User> {
        if username.trim().is_empty() {
            return Err(DomainError::InvalidArgument("Username must not be empty".to_string()));
        }
        if !email.validate_email() {
            return Err(DomainError::InvalidArgument(format!("Invalid email address: {}", email)));
        }
        validate_password(password).map_err(DomainError::InvalidArgument)?;

        if self.store.find_by_username(username).await?.is_some() {
            return Err(DomainError::Conflict("Username already registered".to_string()));
        }
        if self.store.find_by_email(email).await?.is_some() {
            return Err(DomainError::Conflict("Email already registered".to_string()));
        }

        let password_hash = hash_blocking(password.to_string()).await?;

        // The store's uniqueness constraint still decides a concurrent race
        let user = self
            .store
            .create(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;

        let token = self.tokens.issue_email_confirmation(&user.email)?;
        let link = format!("{}auth/confirm?token={}", base_url, token);
        self.dispatch(confirmation_email(&user.email, &link));

        info!(user_id = %user.id, username = %user.username, "User registered, confirmation pending");
        Ok(user)
    }

    /// Activates the account named by a confirmation token
    pub async fn confirm_email(&self, token: &str) -> DomainResult<()> {
        let email = self.tokens.verify_email_confirmation(token)?;

        if self.store.find_by_email(&email).await?.is_none() {
            return Err(DomainError::NotFound("User not found".to_string()));
        }
        if !self.store.activate(&email).await? {
            return Err(DomainError::NotFound("User not found".to_string()));
        }

        info!(email = %email, "Email confirmed");
        Ok(())
    }

    /// Exchanges credentials for a session token
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<Session> {
        if password.is_empty() {
            return Err(DomainError::InvalidCredential);
        }

        let Some(user) = self.store.find_by_username(username).await? else {
            warn!(username = %username, "Login attempt for unknown user");
            return Err(DomainError::InvalidCredential);
        };

        if !verify_blocking(password.to_string(), user.password_hash.clone()).await? {
            warn!(username = %username, "Login attempt with wrong password");
            return Err(DomainError::InvalidCredential);
        }

        if user.status() != AccountStatus::Active {
            return Err(DomainError::AccountInactive);
        }

        let access_token = self.tokens.issue_session(&user.username)?;
        info!(user_id = %user.id, username = %user.username, "User logged in");

        Ok(Session {
            access_token,
            token_type: "bearer",
        })
    }

    /// Mails a password reset link
    pub async fn forgot_password(&self, email: &str, base_url: &str) -> DomainResult<()> {
        let Some(user) = self.store.find_by_email(email).await? else {
            return Err(DomainError::NotFound("User not found".to_string()));
        };

        let token = self.tokens.issue_password_reset(&user.email)?;
        let link = format!("{}auth/reset-password?token={}", base_url, token);
        self.dispatch(password_reset_email(&user.email, &link));

        info!(user_id = %user.id, "Password reset requested");
        Ok(())
    }

    /// Checks a reset token without consuming it; returns its email
    pub fn verify_reset_token(&self, token: &str) -> DomainResult<String> {
        Ok(self.tokens.verify_password_reset(token)?)
    }

    /// Replaces the password of the account named by a reset token
    pub async fn reset_password(&self, token: &str, new_password: &str) -> DomainResult<()> {
        let email = self.tokens.verify_password_reset(token)?;
        validate_password(new_password).map_err(DomainError::InvalidArgument)?;

        if self.store.find_by_email(&email).await?.is_none() {
            return Err(DomainError::NotFound("User not found".to_string()));
        }

        let password_hash = hash_blocking(new_password.to_string()).await?;
        if !self.store.update_password_hash(&email, &password_hash).await? {
            return Err(DomainError::NotFound("User not found".to_string()));
        }

        info!(email = %email, "Password reset");
        Ok(())
    }

    /// Resolves a session token to its user
    pub async fn authenticate(&self, token: &str) -> DomainResult<User> {
        let username = self.tokens.verify(token)?;

        self.store
            .find_by_username(&username)
            .await?
            .ok_or_else(|| DomainError::NotFound("User not found".to_string()))
    }

    fn dispatch(&self, email: Email) {
        let mailer = self.mailer.clone();
        tokio::spawn(async move {
            let to = email.to.clone();
            if let Err(e) = mailer.send(email).await {
                error!(to = %to, error = %e, "Email dispatch failed");
            }
        });
    }
}

async fn hash_blocking(password: String) -> DomainResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| DomainError::Store(format!("Hashing task failed: {}", e)))?
        .map_err(DomainError::from)
}

async fn verify_blocking(password: String, hash: String) -> DomainResult<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| DomainError::Store(format!("Hashing task failed: {}", e)))?
        .map_err(DomainError::from)
}
