//! Source digests recorded next to cached annotations.
//!
//! ```text
//! SHA-256(source_bytes) as lowercase hex
//! ```

use sha2::{Digest, Sha256};

/// SHA-256 of the raw source bytes as a 64-character hex string.
pub fn source_digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_hex() {
        let a = source_digest(b"<p>text</p>");
        assert_eq!(a.len(), 64);
        assert_eq!(a, source_digest(b"<p>text</p>"));
        assert_ne!(a, source_digest(b"<p>text!</p>"));
    }

    #[test]
    fn empty_input_known_value() {
        assert_eq!(
            source_digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
