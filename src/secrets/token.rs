//! Retrieval token generation.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of random bytes behind each token.
pub const TOKEN_BYTES: usize = 32;

/// Length of a hex-encoded token.
pub const TOKEN_LEN: usize = TOKEN_BYTES * 2;

/// The OS entropy source could not supply random bytes.
#[derive(Debug, thiserror::Error)]
#[error("Random source unavailable: {0}")]
pub struct RandomSourceError(#[from] rand::Error);

/// Opaque identifier for a stored secret.
///
/// Generated tokens are 64 lowercase hex characters. Tokens taken from a
/// request path are wrapped as-is; a malformed one never matches an entry.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix for log lines, never the full token.
    pub fn log_prefix(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({}..)", self.log_prefix())
    }
}

/// Issues retrieval tokens from the OS CSPRNG.
///
/// There is no uniqueness check against the store: with 256 bits per token
/// a collision is treated as unreachable, and `SecretStore::put` overwrites.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenGenerator;

impl TokenGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Draw 32 bytes and hex-encode them. Not retried on failure.
    pub fn generate(&self) -> Result<Token, RandomSourceError> {
        let mut raw = [0u8; TOKEN_BYTES];
        OsRng.try_fill_bytes(&mut raw)?;
        Ok(Token(hex::encode(raw)))
    }
}

/// Checks the shape of a generated token (64 lowercase hex chars).
pub fn is_valid_token_format(token: &str) -> bool {
    token.len() == TOKEN_LEN
        && token
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_token_format() {
        let token = TokenGenerator::new().generate().unwrap();
        assert_eq!(token.as_str().len(), TOKEN_LEN);
        assert!(is_valid_token_format(token.as_str()));
    }

    #[test]
    fn test_generated_tokens_differ() {
        let generator = TokenGenerator::new();
        let tokens: HashSet<_> = (0..1000).map(|_| generator.generate().unwrap()).collect();
        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn test_is_valid_token_format() {
        assert!(is_valid_token_format(&"ab12".repeat(16)));
        assert!(!is_valid_token_format(&"AB12".repeat(16))); // uppercase
        assert!(!is_valid_token_format("deadbeef")); // too short
        assert!(!is_valid_token_format(&"ab12".repeat(17))); // too long
        assert!(!is_valid_token_format(&"zz12".repeat(16))); // not hex
    }

    #[test]
    fn test_debug_hides_full_token() {
        let token = Token::from("0123456789abcdef".repeat(4));
        let debug = format!("{:?}", token);
        assert_eq!(debug, "Token(01234567..)");
        assert_eq!(token.to_string().len(), TOKEN_LEN);
    }

    #[test]
    fn test_log_prefix_short_token() {
        assert_eq!(Token::from("abc").log_prefix(), "abc");
    }

    proptest::proptest! {
        #[test]
        fn prop_every_token_is_lowercase_hex(_seed in 0u8..32) {
            let token = TokenGenerator::new().generate().unwrap();
            proptest::prop_assert!(is_valid_token_format(token.as_str()));
        }
    }
}
