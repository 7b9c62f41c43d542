use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

use super::errors::TokenError;

/// Opaque bearer token generator.
///
/// Draws from the operating system CSPRNG and encodes the bytes as URL-safe
/// base64 without padding, so tokens can travel in cookies and headers as-is.
#[derive(Debug, Clone, Copy)]
pub struct TokenGenerator;

impl TokenGenerator {
    /// Default token size in bytes (256 bits of entropy).
    pub const DEFAULT_BYTE_LENGTH: usize = 32;

    pub fn new() -> Self {
        Self
    }

    /// Generate a random token from `byte_length` random bytes.
    ///
    /// # Errors
    /// * `EmptyLength` - `byte_length` is zero
    /// * `EntropyUnavailable` - The OS random source failed
    pub fn try_generate(&self, byte_length: usize) -> Result<String, TokenError> {
        if byte_length == 0 {
            return Err(TokenError::EmptyLength);
        }

        let mut bytes = vec![0u8; byte_length];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| TokenError::EntropyUnavailable(e.to_string()))?;

        Ok(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Generate a random token, panicking only if the OS random source is broken.
    ///
    /// Prefer [`TokenGenerator::try_generate`] where the failure can be surfaced.
    pub fn generate(&self, byte_length: usize) -> String {
        let mut bytes = vec![0u8; byte_length];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}
