use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use std::str::FromStr;

use crate::errors::{SearchError, SearchResult};

/// The hash algorithms a target digest may declare.
///
/// Resolution from a string identifier and digest computation both live
/// here; the enum carries no state, so values are freely shared across
/// worker threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    /// Length of this algorithm's digest as a hex string
    pub fn hex_len(&self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha1 => 40,
            Self::Sha256 => 64,
            Self::Sha512 => 128,
        }
    }

    /// Computes the lowercase hex digest of `input`
    pub fn digest_hex(&self, input: &[u8]) -> String {
        match self {
            Self::Md5 => hex::encode(Md5::digest(input)),
            Self::Sha1 => hex::encode(Sha1::digest(input)),
            Self::Sha256 => hex::encode(Sha256::digest(input)),
            Self::Sha512 => hex::encode(Sha512::digest(input)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = SearchError;

    fn from_str(s: &str) -> SearchResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            other => Err(SearchError::invalid_algorithm(other)),
        }
    }
}

/// A validated target digest: algorithm plus lowercase hex string.
///
/// Construction rejects a hex string whose length does not match the
/// algorithm or that contains non-hex characters, so a `TargetDigest`
/// handed to the search is known well-formed. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDigest {
    algorithm: HashAlgorithm,
    hex: String,
}

impl TargetDigest {
    pub fn new(algorithm: HashAlgorithm, hex: &str) -> SearchResult<Self> {
        if hex.len() != algorithm.hex_len() {
            return Err(SearchError::malformed_digest(
                algorithm.name(),
                algorithm.hex_len(),
                hex.len(),
            ));
        }
        if let Some((position, character)) = hex
            .char_indices()
            .find(|(_, c)| !c.is_ascii_hexdigit())
        {
            return Err(SearchError::non_hex_digest(character, position));
        }
        Ok(Self {
            algorithm,
            hex: hex.to_ascii_lowercase(),
        })
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn hex(&self) -> &str {
        &self.hex
    }

    /// Tests whether `candidate` is a preimage of this digest
    pub fn matches(&self, candidate: &str) -> bool {
        self.algorithm.digest_hex(candidate.as_bytes()) == self.hex
    }
}

impl fmt::Display for TargetDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MD5_HELLO: &str = "5d41402abc4b2a76b9719d911017c592";

    #[test]
    fn test_resolve_algorithm() {
        assert_eq!("md5".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Md5);
        assert_eq!(
            "SHA256".parse::<HashAlgorithm>().unwrap(),
            HashAlgorithm::Sha256
        );
        assert!(matches!(
            "crc32".parse::<HashAlgorithm>(),
            Err(SearchError::InvalidAlgorithm(_))
        ));
    }

    #[test]
    fn test_digest_hex() {
        assert_eq!(HashAlgorithm::Md5.digest_hex(b"hello"), MD5_HELLO);
        assert_eq!(
            HashAlgorithm::Sha1.digest_hex(b"hello"),
            "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"
        );
        assert_eq!(
            HashAlgorithm::Sha256.digest_hex(b"hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_eq!(
            HashAlgorithm::Sha512.digest_hex(b"hello").len(),
            HashAlgorithm::Sha512.hex_len()
        );
    }

    #[test]
    fn test_target_digest_validation() {
        let target = TargetDigest::new(HashAlgorithm::Md5, MD5_HELLO).unwrap();
        assert_eq!(target.hex(), MD5_HELLO);
        assert!(target.matches("hello"));
        assert!(!target.matches("world"));

        // Wrong length for the declared algorithm
        let err = TargetDigest::new(HashAlgorithm::Sha256, MD5_HELLO).unwrap_err();
        assert!(matches!(err, SearchError::MalformedDigest { .. }));

        // Right length, invalid characters
        let err = TargetDigest::new(HashAlgorithm::Md5, "not-hex!not-hex!not-hex!not-hex!")
            .unwrap_err();
        assert!(matches!(err, SearchError::NonHexDigest { .. }));
    }

    #[test]
    fn test_target_digest_case_insensitive() {
        let upper = MD5_HELLO.to_ascii_uppercase();
        let target = TargetDigest::new(HashAlgorithm::Md5, &upper).unwrap();
        assert!(target.matches("hello"));
    }
}
