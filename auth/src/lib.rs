//! Authentication utilities library
//!
//! Provides reusable credential primitives for the session service:
//! - Password hashing (Argon2id)
//! - Opaque session/CSRF token generation (OS CSPRNG, URL-safe base64)
//! - Authentication coordination
//!
//! The library knows nothing about storage or sessions; the service owns those.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("not_my_password", &hash));
//! ```
//!
//! ## Tokens
//! ```
//! use auth::TokenGenerator;
//!
//! let token = TokenGenerator::new().generate(32);
//! assert_eq!(token.len(), 43);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::Authenticator;
//!
//! let auth = Authenticator::new();
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue a session/CSRF pair
//! let pair = auth.authenticate("password123", Some(&hash)).unwrap();
//! assert_ne!(pair.session_token, pair.csrf_token);
//! ```

pub mod authenticator;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::TokenPair;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::TokenError;
pub use token::TokenGenerator;
