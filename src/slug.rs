//! Short random URL-safe identifiers.
//!
//! A slug is 5 bytes of OS randomness encoded with the lowercase base-32
//! alphabet, no padding, which yields exactly 8 characters. Uniqueness is
//! the caller's job; the store re-rolls on collision.

use rand::RngCore;

const SLUG_BYTES: usize = 5;

/// Lowercase RFC 4648 base-32 alphabet.
const ALPHABET: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyz234567";

/// The OS randomness source could not be read.
///
/// Identifier and session-token generation refuse to degrade to a
/// predictable value; callers surface this as a server error.
#[derive(Debug, thiserror::Error)]
#[error("system randomness unavailable")]
pub struct RandomnessUnavailable;

/// Fill `buf` from the OS CSPRNG.
pub(crate) fn fill_random(buf: &mut [u8]) -> Result<(), RandomnessUnavailable> {
    rand::rngs::OsRng
        .try_fill_bytes(buf)
        .map_err(|_| RandomnessUnavailable)
}

/// Generate a fresh 8-character slug.
pub fn generate() -> Result<String, RandomnessUnavailable> {
    let mut buf = [0u8; SLUG_BYTES];
    fill_random(&mut buf)?;
    Ok(encode_base32(&buf))
}

/// Whether `candidate` has the shape `generate` produces: exactly
/// 8 characters, all from the slug alphabet. The store gates every
/// path lookup on this, so URL input never reaches the filesystem.
pub fn is_valid(candidate: &str) -> bool {
    candidate.len() == 8 && candidate.bytes().all(|b| ALPHABET.contains(&b))
}

fn encode_base32(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 8 / 5 + 1);
    let mut acc: u32 = 0;
    let mut bits = 0;
    for &b in bytes {
        acc = (acc << 8) | u32::from(b);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(ALPHABET[((acc >> bits) & 0x1f) as usize] as char);
        }
    }
    if bits > 0 {
        out.push(ALPHABET[((acc << (5 - bits)) & 0x1f) as usize] as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn slug_is_eight_chars_from_the_base32_alphabet() {
        let slug = generate().unwrap();
        assert_eq!(slug.len(), 8);
        assert!(slug.bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn slugs_are_distinct() {
        let slugs: HashSet<_> = (0..100).map(|_| generate().unwrap()).collect();
        assert_eq!(slugs.len(), 100);
    }

    #[test]
    fn validity_rejects_traversal_and_foreign_characters() {
        assert!(is_valid("abcde234"));
        assert!(!is_valid(""));
        assert!(!is_valid("abc"));
        assert!(!is_valid("abcde2345"));
        assert!(!is_valid("ABCDE234"));
        assert!(!is_valid("abcde23/"));
        assert!(!is_valid("../../xx"));
    }

    #[test]
    fn encoding_is_deterministic() {
        assert_eq!(encode_base32(&[0, 0, 0, 0, 0]), "aaaaaaaa");
        assert_eq!(encode_base32(&[0xff, 0xff, 0xff, 0xff, 0xff]), "77777777");
    }
}
