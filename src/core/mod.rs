// Public modules
pub mod config;
pub mod discover;
pub mod error;
pub mod patch;
pub mod rewrite;
pub mod rules;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use patch::{PatchOptions, PatchResult, Reporter, RunReport};
pub use rules::{Rule, RuleTable};
