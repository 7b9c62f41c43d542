use std::fmt;
use std::time::Duration as StdDuration;

use auth::TokenPair;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::auth::errors::PasswordPolicyError;
use crate::domain::auth::errors::UsernameError;

/// Document field names shared by the `users` and `sessions` collections.
pub mod fields {
    pub const USERNAME: &str = "username";
    pub const SESSION_TOKEN: &str = "session_token";
    pub const CSRF_TOKEN: &str = "csrf_token";
    pub const EXPIRES_AT: &str = "expires_at";
}

/// Registered identity.
///
/// Created on registration and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: Username,
    pub password_hash: String,
}

/// Username value type
///
/// Any UTF-8 string of at least 8 characters once surrounding whitespace is
/// trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    pub const MIN_LENGTH: usize = 8;

    /// Create a new valid username.
    ///
    /// # Arguments
    /// * `username` - Raw username string
    ///
    /// # Returns
    /// Validated Username value object
    ///
    /// # Errors
    /// * `Empty` - Username is empty or whitespace
    /// * `TooShort` - Username shorter than 8 characters
    pub fn new(username: impl Into<String>) -> Result<Self, UsernameError> {
        let username = username.into().trim().to_string();
        let length = username.chars().count();
        if length == 0 {
            Err(UsernameError::Empty)
        } else if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(username))
        }
    }

    /// Get username as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

/// Plaintext password that satisfies the registration policy.
///
/// Never printed: `Debug` is redacted.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    pub const MIN_LENGTH: usize = 8;

    /// # Errors
    /// * `Empty` - Password is empty
    /// * `TooShort` - Password shorter than 8 characters
    pub fn new(password: impl Into<String>) -> Result<Self, PasswordPolicyError> {
        let password = password.into();
        let length = password.chars().count();
        if length == 0 {
            Err(PasswordPolicyError::Empty)
        } else if length < Self::MIN_LENGTH {
            Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(password))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Proof of an authenticated interaction.
///
/// Valid while `expires_at` is in the future; the expiry is fixed at creation.
#[derive(Clone, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub session_token: String,
    pub csrf_token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Open a session for `username` starting at `created_at` and lasting `ttl`.
    pub fn new(
        username: &Username,
        tokens: TokenPair,
        created_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            username: username.as_str().to_string(),
            session_token: tokens.session_token,
            csrf_token: tokens.csrf_token,
            created_at,
            expires_at: created_at + ttl,
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Tokens handed back to the caller on a successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub session_token: String,
    pub csrf_token: String,
    /// Username as stored, not as typed by the caller
    pub username: Username,
    pub expires_at: DateTime<Utc>,
}

/// Timing parameters for the auth service.
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    /// Lifetime of a session from its creation
    pub session_ttl: Duration,
    /// Upper bound on every individual store call
    pub operation_timeout: StdDuration,
}

impl SessionSettings {
    pub const DEFAULT_TTL_HOURS: i64 = 24;
    pub const DEFAULT_OPERATION_TIMEOUT_MS: u64 = 5_000;
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            session_ttl: Duration::hours(Self::DEFAULT_TTL_HOURS),
            operation_timeout: StdDuration::from_millis(Self::DEFAULT_OPERATION_TIMEOUT_MS),
        }
    }
}

/// Command to register a new user.
///
/// Fields are raw caller input; the service validates them.
#[derive(Clone)]
pub struct RegisterCommand {
    pub username: String,
    pub password: String,
}

impl RegisterCommand {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for RegisterCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterCommand")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Command to log a user in.
#[derive(Clone)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

impl LoginCommand {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCommand")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Token triple presented on every authorized call.
#[derive(Clone)]
pub struct AuthorizeCommand {
    pub username: String,
    pub session_token: String,
    pub csrf_token: String,
}

impl AuthorizeCommand {
    pub fn new(
        username: impl Into<String>,
        session_token: impl Into<String>,
        csrf_token: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            session_token: session_token.into(),
            csrf_token: csrf_token.into(),
        }
    }
}

impl fmt::Debug for AuthorizeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizeCommand")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Command to revoke a session.
#[derive(Clone)]
pub struct LogoutCommand {
    pub username: String,
    pub session_token: String,
}

impl LogoutCommand {
    pub fn new(username: impl Into<String>, session_token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            session_token: session_token.into(),
        }
    }
}

impl fmt::Debug for LogoutCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogoutCommand")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_trims_and_validates() {
        let username = Username::new("  alice_wonder  ").unwrap();
        assert_eq!(username.as_str(), "alice_wonder");

        assert_eq!(Username::new("   "), Err(UsernameError::Empty));
        assert_eq!(
            Username::new("ab"),
            Err(UsernameError::TooShort { min: 8, actual: 2 })
        );
        // Length counts characters, not bytes
        assert_eq!(
            Username::new("josé"),
            Err(UsernameError::TooShort { min: 8, actual: 4 })
        );
    }

    #[test]
    fn test_username_accepts_any_utf8() {
        let long = "a".repeat(300);
        for raw in [
            "josé_garcia",
            "alice wonder",
            "bob+tester",
            "名前は八文字です",
            long.as_str(),
        ] {
            assert_eq!(Username::new(raw).unwrap().as_str(), raw);
        }
    }

    #[test]
    fn test_password_policy() {
        assert_eq!(Password::new("").unwrap_err(), PasswordPolicyError::Empty);
        assert_eq!(
            Password::new("short").unwrap_err(),
            PasswordPolicyError::TooShort { min: 8, actual: 5 }
        );
        assert_eq!(Password::new("longenough1").unwrap().expose(), "longenough1");
    }

    #[test]
    fn test_secrets_are_redacted_in_debug() {
        let password = Password::new("super_secret_pw").unwrap();
        assert!(!format!("{:?}", password).contains("super_secret_pw"));

        let command = LoginCommand::new("alice_wonder", "super_secret_pw");
        assert!(!format!("{:?}", command).contains("super_secret_pw"));

        let session = Session::new(
            &Username::new("alice_wonder").unwrap(),
            TokenPair {
                session_token: "session-secret".to_string(),
                csrf_token: "csrf-secret".to_string(),
            },
            Utc::now(),
            Duration::hours(1),
        );
        assert!(!format!("{:?}", session).contains("secret"));
    }

    #[test]
    fn test_session_expiry_is_fixed_from_creation() {
        let created_at = Utc::now();
        let session = Session::new(
            &Username::new("alice_wonder").unwrap(),
            TokenPair {
                session_token: "s".to_string(),
                csrf_token: "c".to_string(),
            },
            created_at,
            Duration::hours(24),
        );

        assert_eq!(session.expires_at - session.created_at, Duration::hours(24));
    }

    #[test]
    fn test_user_deserialization_validates_username() {
        let json = serde_json::json!({ "username": "ab", "password_hash": "x" });
        assert!(serde_json::from_value::<User>(json).is_err());
    }
}
