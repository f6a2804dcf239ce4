//! Error types with fix suggestions

use std::path::PathBuf;

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum SubstError {
    #[error("Cannot read '{}': {source}", .path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write '{}': {source}", .path.display())]
    SourceWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Property '{name}' not found")]
    PropertyNotFound { name: String },

    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    #[error("Standard input ('-') cannot be substituted in place")]
    StdinInPlace,

    #[error("Report encoding error: {0}")]
    ReportEncode(#[from] serde_json::Error),
}

impl SubstError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SubstError::SourceRead {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SubstError::SourceWrite {
            path: path.into(),
            source,
        }
    }
}

impl FixSuggestion for SubstError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            SubstError::SourceRead { .. } => Some("Check file path and permissions"),
            SubstError::SourceWrite { .. } => Some("Check the target is writable"),
            SubstError::PropertyNotFound { .. } => Some(
                "Define the property with -f/-p, add a default (${name:default}) or drop --fail-not-found",
            ),
            SubstError::Output(_) => None,
            SubstError::StdinInPlace => Some("Remove '-' from the targets or drop --in-place"),
            SubstError::ReportEncode(_) => Some("Use --report text"),
        }
    }
}
