use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::ValidationError;
use crate::domain::auth::models::fields;
use crate::domain::auth::models::AuthorizeCommand;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::LoginResult;
use crate::domain::auth::models::LogoutCommand;
use crate::domain::auth::models::Password;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::Session;
use crate::domain::auth::models::SessionSettings;
use crate::domain::auth::models::User;
use crate::domain::auth::models::Username;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::store::errors::StoreError;
use crate::domain::store::models::from_document;
use crate::domain::store::models::to_document;
use crate::domain::store::models::Collection;
use crate::domain::store::models::Filter;
use crate::domain::store::ports::DocumentStore;

/// Domain service implementing the session state machine.
///
/// Stateless: all mutable state lives in the injected store, so one instance
/// can be shared across request handlers behind an `Arc`.
pub struct AuthService<DS>
where
    DS: DocumentStore,
{
    store: Arc<DS>,
    authenticator: Arc<Authenticator>,
    settings: SessionSettings,
}

impl<DS> AuthService<DS>
where
    DS: DocumentStore,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Document store implementation
    /// * `authenticator` - Password hashing and token issuance
    /// * `settings` - Session lifetime and store call timeout
    ///
    /// # Returns
    /// Configured auth service instance
    pub fn new(store: Arc<DS>, authenticator: Authenticator, settings: SessionSettings) -> Self {
        Self {
            store,
            authenticator: Arc::new(authenticator),
            settings,
        }
    }

    /// Run one store call, racing it against cancellation and the timeout.
    async fn bounded<T, F>(&self, cancel: &CancellationToken, operation: F) -> Result<T, AuthError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AuthError::Cancelled),
            outcome = tokio::time::timeout(self.settings.operation_timeout, operation) => {
                match outcome {
                    Ok(result) => result.map_err(AuthError::from),
                    Err(_) => Err(AuthError::Cancelled),
                }
            }
        }
    }

    /// Run password hashing or verification on the blocking pool so Argon2
    /// does not stall the async workers. Only cancellation bounds it.
    async fn credential_work<T, F>(
        &self,
        cancel: &CancellationToken,
        work: F,
    ) -> Result<T, AuthError>
    where
        F: FnOnce(&Authenticator) -> T + Send + 'static,
        T: Send + 'static,
    {
        let authenticator = Arc::clone(&self.authenticator);
        let task = tokio::task::spawn_blocking(move || work(&authenticator));

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AuthError::Cancelled),
            joined = task => {
                joined.map_err(|e| AuthError::Internal(format!("Credential task failed: {}", e)))
            }
        }
    }

    async fn find_user(
        &self,
        username: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<User>, AuthError> {
        let filter = Filter::new().eq(fields::USERNAME, username);
        self.bounded(cancel, self.store.find_one(Collection::Users, &filter))
            .await?
            .map(|document| {
                from_document::<User>(document)
                    .map_err(|e| AuthError::Internal(format!("Corrupt user record: {}", e)))
            })
            .transpose()
    }
}

/// Reject empty or whitespace-only input, returning the trimmed value.
fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}

#[async_trait]
impl<DS> AuthServicePort for AuthService<DS>
where
    DS: DocumentStore,
{
    async fn register(
        &self,
        command: RegisterCommand,
        cancel: &CancellationToken,
    ) -> Result<(), AuthError> {
        let username = Username::new(command.username).map_err(ValidationError::from)?;
        let password = Password::new(command.password).map_err(ValidationError::from)?;

        // Fast-path rejection only; the store's unique index is the real guard
        let filter = Filter::new().eq(fields::USERNAME, username.as_str());
        let existing = self
            .bounded(cancel, self.store.count(Collection::Users, &filter))
            .await?;
        if existing > 0 {
            return Err(AuthError::AlreadyExists(username.to_string()));
        }

        let password_hash = self
            .credential_work(cancel, move |authenticator| {
                authenticator.hash_password(password.expose())
            })
            .await?
            .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))?;

        let user = User {
            username,
            password_hash,
        };
        let document = to_document(&user).map_err(|e| AuthError::Internal(e.to_string()))?;

        self.bounded(cancel, self.store.insert_one(Collection::Users, document))
            .await?;

        tracing::info!(username = %user.username, "User registered");

        Ok(())
    }

    async fn login(
        &self,
        command: LoginCommand,
        cancel: &CancellationToken,
    ) -> Result<LoginResult, AuthError> {
        let username = required("username", &command.username)?;
        if command.password.is_empty() {
            return Err(ValidationError::MissingField("password").into());
        }

        let filter = Filter::new().eq(fields::USERNAME, username);
        let matches = self
            .bounded(cancel, self.store.count(Collection::Users, &filter))
            .await?;

        if matches > 1 {
            return Err(AuthError::Internal(format!(
                "{} user records share username {}",
                matches, username
            )));
        }

        // Same store round trips and a full verification for unknown users
        let user = self.find_user(username, cancel).await?;
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let password = command.password;
        let tokens = self
            .credential_work(cancel, move |authenticator| {
                authenticator.authenticate(&password, stored_hash.as_deref())
            })
            .await?;

        let Some(user) = user else {
            return Err(AuthError::NotFound(username.to_string()));
        };
        let tokens = tokens?;

        let session = Session::new(
            &user.username,
            tokens,
            Utc::now(),
            self.settings.session_ttl,
        );
        let document = to_document(&session).map_err(|e| AuthError::Internal(e.to_string()))?;

        self.bounded(cancel, self.store.insert_one(Collection::Sessions, document))
            .await?;

        tracing::info!(
            username = %user.username,
            expires_at = %session.expires_at,
            "User logged in"
        );

        Ok(LoginResult {
            session_token: session.session_token,
            csrf_token: session.csrf_token,
            username: user.username,
            expires_at: session.expires_at,
        })
    }

    async fn authorize(
        &self,
        command: AuthorizeCommand,
        cancel: &CancellationToken,
    ) -> Result<(), AuthError> {
        let username = required("username", &command.username)?;
        let session_token = required("session_token", &command.session_token)?;
        let csrf_token = required("csrf_token", &command.csrf_token)?;

        self.get_user(username, cancel).await?;

        let filter = Filter::new()
            .eq(fields::USERNAME, username)
            .eq(fields::SESSION_TOKEN, session_token)
            .eq(fields::CSRF_TOKEN, csrf_token)
            .gt(fields::EXPIRES_AT, Utc::now());

        self.bounded(cancel, self.store.find_one(Collection::Sessions, &filter))
            .await?
            .map(|_| ())
            .ok_or(AuthError::Unauthorized)
    }

    async fn logout(
        &self,
        command: LogoutCommand,
        cancel: &CancellationToken,
    ) -> Result<(), AuthError> {
        let username = required("username", &command.username)?;
        let session_token = required("session_token", &command.session_token)?;

        let filter = Filter::new()
            .eq(fields::USERNAME, username)
            .eq(fields::SESSION_TOKEN, session_token);

        let deleted = self
            .bounded(cancel, self.store.delete_one(Collection::Sessions, &filter))
            .await?;

        if deleted == 0 {
            tracing::debug!(username = %username, "Logout matched no session");
        } else {
            tracing::info!(username = %username, "User logged out");
        }

        Ok(())
    }

    async fn get_user(
        &self,
        username: &str,
        cancel: &CancellationToken,
    ) -> Result<User, AuthError> {
        let username = required("username", username)?;
        self.find_user(username, cancel)
            .await?
            .ok_or_else(|| AuthError::NotFound(username.to_string()))
    }
}
