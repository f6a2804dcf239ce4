//! propsubst - `${property}` placeholder substitution

pub mod error;
pub mod limits;
pub mod placeholder;
pub mod properties;
pub mod report;
pub mod rewriter;
pub mod runner;
pub mod stream;

pub use error::{FixSuggestion, SubstError};
pub use limits::SubstitutionLimits;
pub use placeholder::{substitute, Occurrence, PlaceholderResolver, Resolution};
pub use properties::{parse_properties, PropertySource, PropertyStore};
pub use report::{ReportFormat, SubstitutionReport};
pub use rewriter::replace_submatches;
pub use runner::{RunConfig, RunSummary, Runner};
pub use stream::{StreamSubstitutor, Target, TargetOutcome};
