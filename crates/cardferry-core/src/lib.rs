pub mod dedup;
pub mod domain;
pub mod error;

pub use dedup::{DestinationIndex, Disposition, IndexPolicy, MatchReason, MatchRule, NormalizedKey};
pub use domain::*;
pub use error::CoreError;
