//! QR payload token generation.

use rand::distr::Alphanumeric;
use rand::RngExt;

/// Token length in alphanumeric characters. 64 characters of [A-Za-z0-9]
/// carry ~380 bits of entropy, far beyond the point where guessing or
/// enumerating a valid payload is feasible.
pub const QR_TOKEN_LEN: usize = 64;

/// Generate an unguessable, URL-safe QR payload.
///
/// Pure draw from the thread RNG; uniqueness is additionally enforced by the
/// storage layer's unique index on the payload column.
pub fn generate_qr_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(QR_TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_length_and_alphabet() {
        let token = generate_qr_token();
        assert_eq!(token.len(), QR_TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_tokens_do_not_collide() {
        let tokens: HashSet<String> = (0..1000).map(|_| generate_qr_token()).collect();
        assert_eq!(tokens.len(), 1000);
    }
}
