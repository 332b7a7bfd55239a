use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur while setting up or running a preimage search
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Unknown hash algorithm: {0}")]
    InvalidAlgorithm(String),
    #[error("Malformed {algorithm} digest: expected {expected} hex characters, got {found}")]
    MalformedDigest {
        algorithm: String,
        expected: usize,
        found: usize,
    },
    #[error("Digest contains non-hexadecimal character {character:?} at position {position}")]
    NonHexDigest { character: char, position: usize },
    #[error("Search space for length {length} has {combinations} combinations, above the safety threshold")]
    OversizedSearchSpace { length: usize, combinations: u128 },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Worker pool error: {0}")]
    PoolError(String),
}

impl SearchError {
    pub fn invalid_algorithm(name: impl Into<String>) -> Self {
        Self::InvalidAlgorithm(name.into())
    }

    pub fn malformed_digest(
        algorithm: impl Into<String>,
        expected: usize,
        found: usize,
    ) -> Self {
        Self::MalformedDigest {
            algorithm: algorithm.into(),
            expected,
            found,
        }
    }

    pub fn non_hex_digest(character: char, position: usize) -> Self {
        Self::NonHexDigest {
            character,
            position,
        }
    }

    pub fn oversized_search_space(length: usize, combinations: u128) -> Self {
        Self::OversizedSearchSpace {
            length,
            combinations,
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn pool_error(msg: impl Into<String>) -> Self {
        Self::PoolError(msg.into())
    }
}
