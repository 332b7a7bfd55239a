use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Which strategy phase produced (or was running at) an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchPhase {
    Dictionary,
    BruteForce,
}

impl fmt::Display for SearchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dictionary => f.write_str("dictionary"),
            Self::BruteForce => f.write_str("brute-force"),
        }
    }
}

/// The record a finished search returns.
///
/// Built incrementally from coordinator state and sealed exactly once
/// by the orchestrator, whether the search matched, exhausted its
/// candidate space, or was cancelled.
#[derive(Debug, Clone, Default)]
pub struct SearchOutput {
    /// Whether a preimage was found
    pub found: bool,
    /// The winning candidate, when found
    pub candidate: Option<String>,
    /// The phase that produced the match, when found
    pub matched_in: Option<SearchPhase>,
    /// Total candidates hashed across both phases
    pub attempts: u64,
    /// Attempts spent in the dictionary phase
    pub dictionary_attempts: u64,
    /// Attempts spent in the brute-force phase
    pub brute_force_attempts: u64,
    /// Wall-clock duration of the search
    pub elapsed: Duration,
    /// True when the caller aborted the search before completion
    pub cancelled: bool,
}

impl SearchOutput {
    pub fn new() -> Self {
        Default::default()
    }

    /// Attempt rate over the whole search, in candidates per second
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            self.attempts as f64
        } else {
            self.attempts as f64 / secs
        }
    }
}

impl fmt::Display for SearchOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elapsed = humantime::format_duration(Duration::from_millis(
            self.elapsed.as_millis() as u64,
        ));
        match (&self.candidate, self.cancelled) {
            (Some(candidate), _) => write!(
                f,
                "found {:?} after {} attempts in {}",
                candidate, self.attempts, elapsed
            ),
            (None, true) => write!(
                f,
                "cancelled after {} attempts in {}",
                self.attempts, elapsed
            ),
            (None, false) => write!(
                f,
                "exhausted {} attempts in {}",
                self.attempts, elapsed
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_new() {
        let output = SearchOutput::new();
        assert!(!output.found);
        assert!(output.candidate.is_none());
        assert_eq!(output.attempts, 0);
        assert!(!output.cancelled);
    }

    #[test]
    fn test_rate() {
        let output = SearchOutput {
            attempts: 1000,
            elapsed: Duration::from_secs(2),
            ..Default::default()
        };
        assert_eq!(output.rate(), 500.0);

        // Zero elapsed must not divide by zero
        let output = SearchOutput {
            attempts: 42,
            ..Default::default()
        };
        assert_eq!(output.rate(), 42.0);
    }

    #[test]
    fn test_display() {
        let output = SearchOutput {
            found: true,
            candidate: Some("hello".to_string()),
            matched_in: Some(SearchPhase::Dictionary),
            attempts: 12,
            elapsed: Duration::from_millis(30),
            ..Default::default()
        };
        assert_eq!(output.to_string(), "found \"hello\" after 12 attempts in 30ms");

        let output = SearchOutput {
            attempts: 99,
            cancelled: true,
            elapsed: Duration::from_secs(1),
            ..Default::default()
        };
        assert_eq!(output.to_string(), "cancelled after 99 attempts in 1s");
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(SearchPhase::Dictionary.to_string(), "dictionary");
        assert_eq!(SearchPhase::BruteForce.to_string(), "brute-force");
    }
}
