use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AuthorizeCommand;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::LoginResult;
use crate::domain::auth::models::LogoutCommand;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::User;

/// Port for authentication and session operations.
///
/// Every operation is bounded by the caller's cancellation token; once it
/// fires, in-flight store calls are dropped and `Cancelled` is returned.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user. No session is created.
    ///
    /// # Arguments
    /// * `command` - Raw username and password
    /// * `cancel` - Caller cancellation signal
    ///
    /// # Errors
    /// * `Validation` - Username or password missing or too short
    /// * `AlreadyExists` - Username is already taken
    /// * `Internal` - Password hashing failed
    /// * `Store` - Store operation failed (including a lost duplicate race)
    /// * `Cancelled` - Cancelled or timed out
    async fn register(
        &self,
        command: RegisterCommand,
        cancel: &CancellationToken,
    ) -> Result<(), AuthError>;

    /// Verify credentials and open a session.
    ///
    /// # Arguments
    /// * `command` - Raw username and password
    /// * `cancel` - Caller cancellation signal
    ///
    /// # Returns
    /// Session and CSRF tokens with the canonical username
    ///
    /// # Errors
    /// * `Validation` - Username or password missing
    /// * `NotFound` - No user with this username
    /// * `InvalidCredentials` - Password does not match
    /// * `Internal` - Duplicate users, hashing or entropy failure
    /// * `Store` - Store operation failed
    /// * `Cancelled` - Cancelled or timed out
    async fn login(
        &self,
        command: LoginCommand,
        cancel: &CancellationToken,
    ) -> Result<LoginResult, AuthError>;

    /// Check a username/session/CSRF triple against an unexpired session.
    ///
    /// Success is silent: the session is neither rotated nor renewed.
    ///
    /// # Errors
    /// * `Validation` - Any argument missing
    /// * `NotFound` - User no longer exists
    /// * `Unauthorized` - No matching unexpired session
    /// * `Store` - Store operation failed
    /// * `Cancelled` - Cancelled or timed out
    async fn authorize(
        &self,
        command: AuthorizeCommand,
        cancel: &CancellationToken,
    ) -> Result<(), AuthError>;

    /// Revoke a session. Revoking an unknown session succeeds.
    ///
    /// # Errors
    /// * `Validation` - Any argument missing
    /// * `Store` - Store operation failed
    /// * `Cancelled` - Cancelled or timed out
    async fn logout(
        &self,
        command: LogoutCommand,
        cancel: &CancellationToken,
    ) -> Result<(), AuthError>;

    /// Retrieve user by username.
    ///
    /// # Errors
    /// * `Validation` - Username missing
    /// * `NotFound` - No user with this username
    /// * `Store` - Store operation failed
    /// * `Cancelled` - Cancelled or timed out
    async fn get_user(&self, username: &str, cancel: &CancellationToken)
        -> Result<User, AuthError>;
}
