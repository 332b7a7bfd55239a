pub mod config;
pub mod dictionary;
pub mod errors;
pub mod generator;
pub mod hasher;
pub mod results;
pub mod search;

pub use config::SearchConfig;
pub use errors::{SearchError, SearchResult};
pub use hasher::{HashAlgorithm, TargetDigest};
pub use results::{SearchOutput, SearchPhase};
pub use search::coordinator::CancelToken;
pub use search::engine::{search, ProgressUpdate, SearchHooks};
