//! Random token generation
//!
//! Tokens are drawn from the 62-character alphanumeric alphabet using the
//! thread-local CSPRNG.

use rand::{distr::Alphanumeric, Rng as _};

/// Default length of a generated replacement token.
pub const DEFAULT_TOKEN_LENGTH: usize = 40;

/// Generate a random alphanumeric token of `len` characters.
#[must_use]
pub fn generate(len: usize) -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generates_configured_length() {
        assert_eq!(generate(DEFAULT_TOKEN_LENGTH).len(), 40);
        assert_eq!(generate(8).len(), 8);
        assert_eq!(generate(0).len(), 0);
    }

    #[test]
    fn tokens_are_alphanumeric() {
        let token = generate(256);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn consecutive_tokens_do_not_collide() {
        let tokens: HashSet<String> =
            (0..1000).map(|_| generate(DEFAULT_TOKEN_LENGTH)).collect();
        assert_eq!(tokens.len(), 1000);
    }
}
