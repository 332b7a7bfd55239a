//! Brute-force candidate generation.
//!
//! Candidates of a given length are numbered `0..charset_len^length` and
//! mapped to strings by mixed-radix decomposition, most significant
//! position first. That keeps enumeration lexicographic within a length
//! while letting the work distributor hand out index ranges without ever
//! materializing the full product, and makes progress within a length a
//! single integer.

use tracing::debug;

use crate::errors::{SearchError, SearchResult};

/// Lowercase letters and digits, used up to [`EXTENDED_LENGTH_THRESHOLD`]
pub const SIMPLE_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// The simple charset extended with uppercase letters and symbols
pub const EXTENDED_CHARSET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyz0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ!@#$%^&*()-_=+[]{};:'\",.<>?/~";

/// Candidate length at which the extended charset kicks in
pub const EXTENDED_LENGTH_THRESHOLD: usize = 5;

/// Per-length combination count above which the caller must confirm
/// before enumeration starts
pub const SPACE_THRESHOLD: u128 = 10_000_000;

/// Charset policy: the eligible characters for candidates of `length`.
///
/// The set only ever grows with length, so any string enumerable at a
/// shorter length stays enumerable at longer ones.
pub fn charset_for(length: usize) -> &'static [u8] {
    if length < EXTENDED_LENGTH_THRESHOLD {
        SIMPLE_CHARSET
    } else {
        EXTENDED_CHARSET
    }
}

/// Total combinations for `length` under the charset policy,
/// saturating at `u128::MAX`
pub fn combinations_for(length: usize) -> u128 {
    let base = charset_for(length).len() as u128;
    base.checked_pow(length as u32).unwrap_or(u128::MAX)
}

/// Applies the size-safety check for `length`.
///
/// Returns the combination count when it is below [`SPACE_THRESHOLD`];
/// otherwise surfaces [`SearchError::OversizedSearchSpace`] so the
/// orchestrator can ask the caller whether to proceed.
pub fn check_length(length: usize) -> SearchResult<u128> {
    let combinations = combinations_for(length);
    if combinations > SPACE_THRESHOLD {
        return Err(SearchError::oversized_search_space(length, combinations));
    }
    Ok(combinations)
}

/// The enumeration space for one fixed candidate length
#[derive(Debug, Clone)]
pub struct LengthSpace {
    length: usize,
    charset: &'static [u8],
    total: u128,
}

impl LengthSpace {
    pub fn new(length: usize) -> Self {
        let charset = charset_for(length);
        let total = combinations_for(length);
        debug!(
            "Length {} space: {} chars, {} combinations",
            length,
            charset.len(),
            total
        );
        Self {
            length,
            charset,
            total,
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of candidates in this space
    pub fn total(&self) -> u128 {
        self.total
    }

    /// The candidate at `index` in lexicographic order.
    ///
    /// Panics if `index >= total()`; callers hand out ranges derived
    /// from `total()` so an out-of-range index is a logic error.
    pub fn candidate_at(&self, index: u128) -> String {
        assert!(index < self.total, "candidate index out of range");
        let base = self.charset.len() as u128;
        let mut bytes = vec![0u8; self.length];
        let mut rest = index;
        for slot in bytes.iter_mut().rev() {
            *slot = self.charset[(rest % base) as usize];
            rest /= base;
        }
        // Charset bytes are ASCII, so the candidate is valid UTF-8
        String::from_utf8(bytes).unwrap_or_default()
    }

    /// Materializes the candidates in `[start, start + size)`, clipped
    /// to the end of the space
    pub fn chunk(&self, start: u128, size: usize) -> Vec<String> {
        let end = self.total.min(start + size as u128);
        (start..end).map(|i| self.candidate_at(i)).collect()
    }
}
