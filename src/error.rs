//! Driver error taxonomy.
//!
//! Discovery-time read failures are not represented here: an unreadable
//! candidate file is logged and excluded from discovery results rather than
//! surfaced to the caller.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed cause attached to wrapping error variants. Collaborator traits
/// return `anyhow::Result`, so arbitrary host errors flow through unchanged.
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by driver operations.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Authentication or the underlying open call failed. The cause may be a
    /// password-provider failure or an engine-level open/keying error.
    #[error("unable to open database `{path}`")]
    UnableToOpen {
        /// Path of the database file that could not be opened.
        path: PathBuf,
        /// The underlying failure.
        #[source]
        source: BoxedCause,
    },

    /// A statement failed at execution time (syntax error, constraint
    /// violation, type mismatch). Propagated verbatim.
    #[error(transparent)]
    Execution(#[from] rusqlite::Error),

    /// A caller-supplied result handler failed while consuming a result.
    #[error("result handler failed")]
    Handler(#[source] BoxedCause),
}

impl DriverError {
    pub(crate) fn unable_to_open(path: PathBuf, source: anyhow::Error) -> Self {
        Self::UnableToOpen {
            path,
            source: source.into(),
        }
    }
}
