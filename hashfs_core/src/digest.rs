//! The content digest used in hashed file names (sha256, 32 bytes)

use std::fmt;

use sha2::{Digest as _, Sha256};

/// Content digest (sha256, 32 bytes)
#[derive(Clone, Copy, Hash, PartialEq, Eq)]
pub struct Digest([u8; 32]);

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Digest").field(&self.to_hex()).finish()
    }
}

impl Digest {
    /// The digest of the empty byte range (`b""`).
    pub const EMPTY: Digest = Digest::from_bytes([
        227, 176, 196, 66, 152, 252, 28, 20, 154, 251, 244, 200, 153, 111, 185, 36, 39, 174, 65,
        228, 100, 155, 147, 76, 164, 149, 153, 27, 120, 82, 184, 85,
    ]);

    /// The size of the digest in bytes.
    pub const SIZE: usize = 32;

    /// Length of the hex token embedded in file names.
    pub const HEX_LEN: usize = Self::SIZE * 2;

    /// Calculate the digest of the provided bytes.
    pub fn new(buf: impl AsRef<[u8]>) -> Self {
        Digest(Sha256::digest(buf.as_ref()).into())
    }

    /// Create a `Digest` from its raw bytes representation.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Lowercase hex token, as embedded in hashed file names.
    pub fn to_hex(&self) -> String {
        data_encoding::HEXLOWER.encode(&self.0)
    }

    /// Whether `token` is exactly this digest's hex form.
    ///
    /// Uppercase or truncated tokens never match.
    pub fn matches_hex(&self, token: &str) -> bool {
        token.len() == Self::HEX_LEN && token == self.to_hex()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_empty() {
        let digest = Digest::new(b"");
        assert_eq!(digest, Digest::EMPTY);
        assert_eq!(
            digest.to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_digest_known_value() {
        let digest = Digest::new(b"noext\n");
        let expected_hex = "d9d4e730296e72377ae86529027f7defd5feecf4602a1f15f561cd4fae3644c5";
        assert_eq!(digest.to_hex(), expected_hex);
        assert_eq!(digest.to_string(), expected_hex);
    }

    #[test]
    fn test_matches_hex() {
        let digest = Digest::new(b"base.ext\n");
        let hex = digest.to_hex();
        assert!(digest.matches_hex(&hex));
        assert!(!digest.matches_hex(&hex.to_uppercase()));
        assert!(!digest.matches_hex(&hex[..Digest::HEX_LEN - 1]));
        assert!(!digest.matches_hex(""));
    }

    #[test]
    fn test_digest_debug() {
        let digest = Digest::new(b"test");
        let debug = format!("{:?}", digest);
        assert!(debug.starts_with("Digest("));
        assert!(debug.contains(&digest.to_hex()));
    }
}
