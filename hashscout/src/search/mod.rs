//! Concurrent preimage search: the orchestrator, the work distributor,
//! and the shared coordination state.
//!
//! The search runs in two phases. The dictionary phase shares one
//! read-only wordlist across a rayon pool; the brute-force phase hands
//! out index ranges of each length's enumeration space so workers
//! materialize their own chunks. Both phases stop cooperatively: the
//! single shared [`coordinator::SearchCoordinator`] is checked before a
//! chunk is produced and before every candidate is hashed, so the work
//! outstanding after a match is bounded by what was already dispatched.

pub mod coordinator;
pub mod engine;

pub use coordinator::{CancelToken, SearchCoordinator};
pub use engine::{search, search_with_cancel, ProgressUpdate, SearchHooks};
