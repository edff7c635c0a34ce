use serde::Serialize;
use thiserror::Error;

use crate::index::Taxonomy;
use crate::types::QualifiedId;

/// Why a selection was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("selection is empty")]
    Empty,

    #[error("duplicate technique in selection: {0}")]
    Duplicate(QualifiedId),

    #[error("unknown technique: {0}")]
    Unknown(QualifiedId),
}

/// An ordered, duplicate-free sequence of qualified ids, all of which resolve
/// in the taxonomy it was validated against.
///
/// Order is the caller's intended layering and is preserved everywhere
/// downstream. Duplicates and unknown ids are rejected at construction;
/// ambiguous intent is an error, never auto-resolved. An empty selection is
/// legal here (the advisor accepts it) and rejected by the composer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    ids: Vec<QualifiedId>,
}

impl Selection {
    /// Validate `ids` against the taxonomy.
    pub fn resolve(taxonomy: &Taxonomy, ids: &[QualifiedId]) -> Result<Self, SelectionError> {
        let mut seen: Vec<&QualifiedId> = Vec::with_capacity(ids.len());
        for id in ids {
            if seen.contains(&id) {
                return Err(SelectionError::Duplicate(id.clone()));
            }
            if taxonomy.technique(id).is_none() {
                return Err(SelectionError::Unknown(id.clone()));
            }
            seen.push(id);
        }
        Ok(Self { ids: ids.to_vec() })
    }

    pub fn ids(&self) -> &[QualifiedId] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &QualifiedId> {
        self.ids.iter()
    }

    pub fn contains(&self, id: &QualifiedId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
