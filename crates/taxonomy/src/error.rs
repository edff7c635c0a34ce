use serde::Serialize;
use thiserror::Error;

use crate::types::QualifiedId;

pub type Result<T> = std::result::Result<T, LoadError>;

/// Fatal load failure. Any of these aborts the whole load; no partial
/// taxonomy is ever returned.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{source_name}: malformed definition source: {message}")]
    Parse { source_name: String, message: String },

    #[error("{source_name}: missing required field `{field}`")]
    MissingField { source_name: String, field: String },

    #[error("duplicate tactic id `{id}` declared in {first_source} and {second_source}")]
    DuplicateTactic {
        id: String,
        first_source: String,
        second_source: String,
    },

    #[error("{source_name}: duplicate technique id `{id}` within tactic `{tactic_id}`")]
    DuplicateTechnique {
        source_name: String,
        tactic_id: String,
        id: String,
    },
}

/// A `combines_well_with` entry that resolves to nothing.
///
/// Soft defect: reported alongside an otherwise-successful load rather than
/// failing it, so one bad cross-reference does not block the whole taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingReference {
    /// Technique that declared the reference.
    pub from: QualifiedId,

    /// The unresolvable target, kept verbatim (it may not even parse as a
    /// qualified id).
    pub target: String,
}

impl std::fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} references unknown technique `{}`",
            self.from, self.target
        )
    }
}
