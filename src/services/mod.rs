//! Release resolution engine and its collaborators

pub mod alias_seed;
pub mod aliases;
pub mod catalog;
pub mod checkpoint;
pub mod filename_parser;
pub mod json_store;
pub mod match_scorer;
pub mod query_planner;
pub mod rate_limiter;
pub mod resolver;
pub mod review_log;
pub mod search_cache;
pub mod search_executor;
pub mod text_utils;
pub mod tpdb;

pub use aliases::{AliasOverlay, AliasStore, LearningReport, StudioLearning};
pub use catalog::{CandidateRecord, SceneSearch, SearchFailure};
pub use checkpoint::{CheckpointRecord, CheckpointState, CheckpointStore, ItemOutcome, OutcomeStatus};
pub use filename_parser::{ParsedRelease, parse_release};
pub use match_scorer::{MatchDecision, ScoredCandidate, ScoringWeights};
pub use rate_limiter::{RateLimitConfig, RateLimitedClient, RetryPolicy};
pub use resolver::{ReleaseResolver, Resolution, ResolveReport};
pub use review_log::ReviewLog;
pub use search_cache::SearchCache;
pub use search_executor::{SearchExecutor, SearchReport};
pub use tpdb::TpdbClient;
