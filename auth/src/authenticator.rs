use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::token::TokenError;
use crate::token::TokenGenerator;

/// Authentication coordinator combining password verification and session
/// token issuance.
#[derive(Debug, Clone)]
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_generator: TokenGenerator,
    token_bytes: usize,
}

/// Session/CSRF token pair issued on successful authentication.
///
/// The two tokens are independent random draws.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub session_token: String,
    pub csrf_token: String,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("session_token", &"<redacted>")
            .field("csrf_token", &"<redacted>")
            .finish()
    }
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

/// Well-formed Argon2id hash with the default cost parameters, verified in
/// place of a missing account so that an unknown username costs the same as
/// a wrong password. No password hashes to it.
const DUMMY_PASSWORD_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$dGltaW5nLWVxdWFsaXNlcg$d8tdObYYWLzDjgYBUoqkO2rFG5y8CBP/krB0L8+2vPY";

impl Authenticator {
    /// Create a new authenticator issuing tokens of
    /// [`TokenGenerator::DEFAULT_BYTE_LENGTH`] bytes.
    pub fn new() -> Self {
        Self::with_token_bytes(TokenGenerator::DEFAULT_BYTE_LENGTH)
    }

    /// Create an authenticator issuing tokens of `token_bytes` random bytes.
    pub fn with_token_bytes(token_bytes: usize) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_generator: TokenGenerator::new(),
            token_bytes,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Arguments
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// Hashed password string
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a password and issue a fresh token pair.
    ///
    /// When `stored_hash` is `None` (unknown account) the candidate is still
    /// run through a full verification against a fixed hash before failing.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash, if the account exists
    ///
    /// # Returns
    /// TokenPair with independent session and CSRF tokens
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match or account is unknown
    /// * `TokenError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: Option<&str>,
    ) -> Result<TokenPair, AuthenticationError> {
        let hash = stored_hash.unwrap_or(DUMMY_PASSWORD_HASH);
        let is_valid = self.password_hasher.verify(password, hash);

        if !is_valid || stored_hash.is_none() {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_token_pair()?)
    }

    /// Generate a session/CSRF token pair without password verification.
    ///
    /// # Errors
    /// * `TokenError` - Entropy source failed
    pub fn issue_token_pair(&self) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            session_token: self.token_generator.try_generate(self.token_bytes)?,
            csrf_token: self.token_generator.try_generate(self.token_bytes)?,
        })
    }
}

impl Default for Authenticator {
    fn default() -> Self {
        Self::new()
    }
}
