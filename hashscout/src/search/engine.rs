use rayon::prelude::*;
use rayon::ThreadPool;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::coordinator::{CancelToken, SearchCoordinator};
use crate::config::SearchConfig;
use crate::dictionary;
use crate::errors::{SearchError, SearchResult};
use crate::generator::{self, LengthSpace};
use crate::hasher::TargetDigest;
use crate::results::{SearchOutput, SearchPhase};

// Chunk sizing for the brute-force distributor
const CHUNK_MIN: usize = 64;
const CHUNK_MAX: usize = 65_536;
/// Chunks kept in flight per worker; bounds the work dispatched but not
/// yet checked against the termination flag
const CHUNKS_PER_WORKER: usize = 4;

/// Advisory progress cadence, in attempts
const PROGRESS_INTERVAL: u64 = 100_000;

/// Advisory snapshot handed to the progress hook
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub phase: SearchPhase,
    pub attempts: u64,
    pub elapsed: Duration,
}

/// Optional caller-supplied callbacks.
///
/// `confirm_length` is consulted when a brute-force length fails the
/// size-safety check; returning `true` enumerates the length anyway.
/// Without a hook the length is skipped. `on_progress` receives
/// advisory updates and is never required for correctness.
#[derive(Default)]
pub struct SearchHooks {
    pub confirm_length: Option<Box<dyn Fn(usize, u128) -> bool + Send + Sync>>,
    pub on_progress: Option<Box<dyn Fn(&ProgressUpdate) + Send + Sync>>,
}

impl SearchHooks {
    pub fn new() -> Self {
        Default::default()
    }
}

/// Runs a preimage search to completion
pub fn search(config: &SearchConfig, hooks: &SearchHooks) -> SearchResult<SearchOutput> {
    search_with_cancel(config, hooks, CancelToken::new())
}

/// Runs a preimage search that the caller can abort through `cancel`.
///
/// Structural errors (a malformed digest, a zero brute-force length)
/// fail before any candidate is hashed. Cancellation is not an error:
/// the sealed output carries `cancelled = true` and the partial
/// attempt and elapsed figures.
pub fn search_with_cancel(
    config: &SearchConfig,
    hooks: &SearchHooks,
    cancel: CancelToken,
) -> SearchResult<SearchOutput> {
    let target = TargetDigest::new(config.algorithm, &config.target)?;
    if config.brute_force && config.max_length == 0 {
        return Err(SearchError::config_error(
            "max_length must be positive when brute force is enabled",
        ));
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.thread_count.get())
        .build()
        .map_err(|e| SearchError::pool_error(e.to_string()))?;

    let coordinator = SearchCoordinator::new(cancel);
    let started = Instant::now();
    info!(
        "Starting search for {} with {} threads (dictionary: {}, brute force: {})",
        target,
        config.thread_count,
        config.dictionary,
        config.brute_force
    );

    let mut dictionary_attempts = 0;
    if config.dictionary && !coordinator.should_stop() {
        run_dictionary_phase(&pool, &coordinator, &target, hooks, started);
        dictionary_attempts = coordinator.attempts();
    }

    if config.brute_force && !coordinator.should_stop() {
        run_brute_force_phase(&pool, &coordinator, &target, hooks, started, config.max_length);
    }

    Ok(seal(&coordinator, dictionary_attempts, started.elapsed()))
}

/// Dictionary phase: one shared read-only wordlist, chunked across the
/// pool the way the total splits over the workers
fn run_dictionary_phase(
    pool: &ThreadPool,
    coordinator: &SearchCoordinator,
    target: &TargetDigest,
    hooks: &SearchHooks,
    started: Instant,
) {
    let words = dictionary::build_wordlist();
    let chunk_size = (words.len() / pool.current_num_threads()).clamp(16, 256);
    debug!(
        "Dictionary phase: {} candidates in chunks of {}",
        words.len(),
        chunk_size
    );

    pool.install(|| {
        words.par_chunks(chunk_size).for_each(|chunk| {
            process_chunk(
                chunk,
                target,
                coordinator,
                SearchPhase::Dictionary,
                hooks,
                started,
            );
        });
    });
}

/// Brute-force phase: lengths ascending, one size-safety check per
/// length, index ranges handed to workers in bounded rounds
fn run_brute_force_phase(
    pool: &ThreadPool,
    coordinator: &SearchCoordinator,
    target: &TargetDigest,
    hooks: &SearchHooks,
    started: Instant,
    max_length: usize,
) {
    for length in 1..=max_length {
        if coordinator.should_stop() {
            return;
        }
        match generator::check_length(length) {
            Ok(combinations) => {
                debug!("Length {} accepted: {} combinations", length, combinations);
            }
            Err(SearchError::OversizedSearchSpace {
                length,
                combinations,
            }) => {
                let proceed = hooks
                    .confirm_length
                    .as_ref()
                    .map(|confirm| confirm(length, combinations))
                    .unwrap_or(false);
                if !proceed {
                    warn!(
                        "Skipping length {}: {} combinations exceed the safety threshold",
                        length, combinations
                    );
                    continue;
                }
                info!("Caller confirmed oversized length {}", length);
            }
            // check_length only reports oversized spaces today; anything
            // else must not be mistaken for a declined length
            Err(other) => {
                warn!("Size check failed for length {}: {}", length, other);
                continue;
            }
        }
        run_length(pool, coordinator, target, hooks, started, length);
    }
}

fn run_length(
    pool: &ThreadPool,
    coordinator: &SearchCoordinator,
    target: &TargetDigest,
    hooks: &SearchHooks,
    started: Instant,
    length: usize,
) {
    let space = LengthSpace::new(length);
    let workers = pool.current_num_threads();
    let chunk_size = (space.total() / (workers as u128 * CHUNKS_PER_WORKER as u128))
        .clamp(CHUNK_MIN as u128, CHUNK_MAX as u128) as usize;
    let round_span = chunk_size as u128 * (workers * CHUNKS_PER_WORKER) as u128;
    debug!(
        "Length {}: {} candidates, chunk size {}",
        length,
        space.total(),
        chunk_size
    );

    let mut round_start = 0u128;
    while round_start < space.total() {
        // Producer-side cooperative stop, once per round of chunks
        if coordinator.should_stop() {
            return;
        }
        let round_end = space.total().min(round_start + round_span);
        let starts: Vec<u128> = std::iter::successors(Some(round_start), |s| {
            let next = s + chunk_size as u128;
            (next < round_end).then_some(next)
        })
        .collect();

        pool.install(|| {
            starts.par_iter().for_each(|&start| {
                if coordinator.should_stop() {
                    return;
                }
                let chunk = space.chunk(start, chunk_size);
                process_chunk(
                    &chunk,
                    target,
                    coordinator,
                    SearchPhase::BruteForce,
                    hooks,
                    started,
                );
            });
        });
        round_start = round_end;
    }
}

/// Hashes one chunk of candidates against the target.
///
/// The termination flag is checked before every candidate, so overshoot
/// after a match is bounded by the chunks already dispatched. A
/// candidate the hasher cannot accept is counted and skipped, never
/// fatal.
fn process_chunk(
    chunk: &[String],
    target: &TargetDigest,
    coordinator: &SearchCoordinator,
    phase: SearchPhase,
    hooks: &SearchHooks,
    started: Instant,
) {
    for candidate in chunk {
        if coordinator.should_stop() {
            return;
        }
        let attempts = coordinator.record_attempt();

        if candidate.chars().any(|c| c.is_control()) {
            warn!("Skipping unencodable dictionary entry");
            continue;
        }

        if target.matches(candidate) && coordinator.try_claim(candidate, phase) {
            info!(
                "Match found in {} phase after {} attempts: {:?}",
                phase, attempts, candidate
            );
        }

        if attempts % PROGRESS_INTERVAL == 0 {
            report_progress(hooks, phase, attempts, started);
        }
    }
}

fn report_progress(hooks: &SearchHooks, phase: SearchPhase, attempts: u64, started: Instant) {
    if let Some(on_progress) = &hooks.on_progress {
        on_progress(&ProgressUpdate {
            phase,
            attempts,
            elapsed: started.elapsed(),
        });
    }
}

/// Seals the output record from coordinator state; called exactly once
/// per search, for match, exhaustion, and cancellation alike
fn seal(
    coordinator: &SearchCoordinator,
    dictionary_attempts: u64,
    elapsed: Duration,
) -> SearchOutput {
    let mut output = SearchOutput::new();
    output.attempts = coordinator.attempts();
    output.dictionary_attempts = dictionary_attempts;
    output.brute_force_attempts = output.attempts - dictionary_attempts;
    output.elapsed = elapsed;
    output.cancelled = coordinator.is_cancelled() && !coordinator.is_found();
    if let Some((candidate, phase)) = coordinator.winner() {
        output.found = true;
        output.candidate = Some(candidate);
        output.matched_in = Some(phase);
    }
    info!("Search complete: {}", output);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::HashAlgorithm;
    use std::num::NonZeroUsize;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn config(algorithm: HashAlgorithm, target: &str) -> SearchConfig {
        SearchConfig {
            algorithm,
            target: target.to_string(),
            max_length: 2,
            thread_count: NonZeroUsize::new(2).unwrap(),
            dictionary: true,
            brute_force: true,
            log_level: "warn".to_string(),
        }
    }

    #[test]
    fn test_dictionary_match() {
        // md5("letmein")
        let mut config = config(HashAlgorithm::Md5, "0d107d09f5bbe40cade3de5c71e9e9b7");
        config.brute_force = false;

        let output = search(&config, &SearchHooks::new()).unwrap();
        assert!(output.found);
        assert_eq!(output.candidate.as_deref(), Some("letmein"));
        assert_eq!(output.matched_in, Some(SearchPhase::Dictionary));
        assert!(output.attempts <= dictionary::build_wordlist().len() as u64);
    }

    #[test]
    fn test_brute_force_match() {
        // sha256("a7"), not a dictionary entry
        let mut config = config(
            HashAlgorithm::Sha256,
            "20377cec9f51f6bf5ba1fa64649f3b1614e4eee833fd0fc5893f24f6e0accbaf",
        );
        config.dictionary = false;

        let output = search(&config, &SearchHooks::new()).unwrap();
        assert!(output.found);
        assert_eq!(output.candidate.as_deref(), Some("a7"));
        assert_eq!(output.matched_in, Some(SearchPhase::BruteForce));
        assert_eq!(output.dictionary_attempts, 0);
    }

    #[test]
    fn test_malformed_digest_rejected_before_work() {
        let config = config(HashAlgorithm::Md5, "not-hex");
        let err = search(&config, &SearchHooks::new()).unwrap_err();
        assert!(matches!(err, SearchError::MalformedDigest { .. }));
    }

    #[test]
    fn test_zero_max_length_rejected() {
        // md5("hello"), valid digest but invalid brute-force bound
        let mut config = config(HashAlgorithm::Md5, "5d41402abc4b2a76b9719d911017c592");
        config.max_length = 0;
        config.dictionary = false;
        let err = search(&config, &SearchHooks::new()).unwrap_err();
        assert!(matches!(err, SearchError::ConfigError(_)));
    }

    #[test]
    fn test_exhaustion() {
        // sha1("forgotten"), nine characters, out of reach at length <= 2
        let mut config = config(
            HashAlgorithm::Sha1,
            "b70686c582e1b6a0d8084f0b51c12df750a43ae8",
        );
        config.dictionary = false;

        let output = search(&config, &SearchHooks::new()).unwrap();
        assert!(!output.found);
        assert!(output.candidate.is_none());
        assert!(!output.cancelled);
        // Every candidate of lengths 1 and 2 was attempted
        assert_eq!(output.attempts, 36 + 36 * 36);
    }

    #[test]
    fn test_match_bounds_further_attempts() {
        // sha256("ab"): the second candidate of the length-2 space
        let mut config = config(
            HashAlgorithm::Sha256,
            "fb8e20fc2e4c3f248c60c39bd652f3c1347298bb977b8b4d5903b85055620603",
        );
        config.dictionary = false;
        config.thread_count = NonZeroUsize::new(1).unwrap();

        let output = search(&config, &SearchHooks::new()).unwrap();
        assert_eq!(output.candidate.as_deref(), Some("ab"));

        // Once the match is recorded, the overshoot is capped by the
        // chunks already dispatched: chunk_size x worker_count on top of
        // the exhausted length-1 space
        let chunk_size = (36u64 * 36 / CHUNKS_PER_WORKER as u64).max(CHUNK_MIN as u64);
        assert!(output.attempts <= 36 + chunk_size);
        assert!(output.attempts < 36 + 36 * 36);
    }

    #[test]
    fn test_unencodable_candidate_counted_and_skipped() {
        let coordinator = SearchCoordinator::new(CancelToken::new());
        // md5("hello")
        let target =
            TargetDigest::new(HashAlgorithm::Md5, "5d41402abc4b2a76b9719d911017c592").unwrap();
        let chunk = vec!["pass\u{0}word".to_string(), "hello".to_string()];

        process_chunk(
            &chunk,
            &target,
            &coordinator,
            SearchPhase::Dictionary,
            &SearchHooks::new(),
            Instant::now(),
        );

        // The malformed entry costs an attempt but is never hashed; the
        // rest of the chunk is still searched
        assert_eq!(coordinator.attempts(), 2);
        let (winner, _) = coordinator.winner().unwrap();
        assert_eq!(winner, "hello");
    }

    #[test]
    fn test_cancelled_before_start() {
        let config = config(HashAlgorithm::Md5, "5d41402abc4b2a76b9719d911017c592");
        let cancel = CancelToken::new();
        cancel.cancel();

        let output = search_with_cancel(&config, &SearchHooks::new(), cancel).unwrap();
        assert!(!output.found);
        assert!(output.cancelled);
        assert_eq!(output.attempts, 0);
    }

    #[test]
    fn test_oversized_length_skipped_by_default() {
        let mut config = config(
            HashAlgorithm::Sha1,
            "b70686c582e1b6a0d8084f0b51c12df750a43ae8",
        );
        config.dictionary = false;
        config.max_length = 5;

        let hooks = SearchHooks {
            confirm_length: Some(Box::new(|length, combinations| {
                assert_eq!(length, 5);
                assert!(combinations > generator::SPACE_THRESHOLD);
                false
            })),
            on_progress: None,
        };

        let output = search(&config, &hooks).unwrap();
        assert!(!output.found);
        // Lengths 1-4 enumerated in full, length 5 declined and skipped
        let expected: u64 = (1..=4).map(|l| generator::combinations_for(l) as u64).sum();
        assert_eq!(output.attempts, expected);
    }

    #[test]
    fn test_progress_updates_are_advisory() {
        let updates = std::sync::Arc::new(AtomicU64::new(0));
        let seen = updates.clone();
        let hooks = SearchHooks {
            confirm_length: None,
            on_progress: Some(Box::new(move |update| {
                assert!(update.attempts > 0);
                seen.fetch_add(1, Ordering::Relaxed);
            })),
        };

        // sha1("forgotten") again: exhausts lengths 1-4, more than one
        // progress interval of attempts
        let mut config = config(
            HashAlgorithm::Sha1,
            "b70686c582e1b6a0d8084f0b51c12df750a43ae8",
        );
        config.dictionary = false;
        config.max_length = 4;

        let output = search(&config, &hooks).unwrap();
        assert!(!output.found);
        assert!(updates.load(Ordering::Relaxed) >= 1);
    }
}
