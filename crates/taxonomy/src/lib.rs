//! # Technique Taxonomy
//!
//! Data model, loading, and indexing for the red-team technique taxonomy.
//!
//! ## Architecture
//!
//! ```text
//! Definition sources (YAML)
//!     │
//!     ├──> Loader
//!     │      ├─ Deserialize loosely-typed records
//!     │      ├─ Validate required fields (fail-fast)
//!     │      ├─ Reject duplicate ids
//!     │      └─ Collect dangling cross-references (soft defects)
//!     │
//!     └──> Taxonomy (immutable index)
//!            ├─ Tactic / technique lookup by id
//!            ├─ Declaration-order enumeration
//!            ├─ Case-insensitive free-text search
//!            └─ Strategy records (optional enrichment)
//! ```
//!
//! The taxonomy is read-only after load. A reload builds a fresh `Taxonomy`;
//! nothing is patched in place.

mod error;
mod index;
mod loader;
mod selection;
mod strategy;
mod types;

pub use error::{DanglingReference, LoadError, Result};
pub use index::Taxonomy;
pub use loader::{LoadReport, NamedSource, StrategySources, TaxonomyLoader};
pub use selection::{Selection, SelectionError};
pub use strategy::{
    AntiPattern, CombinationStrategy, ShapeStrategy, StrategyLibrary, TacticStrategy,
    TechniqueStrategy, WorkedExample,
};
pub use types::{
    ExecutionShape, ParseQualifiedIdError, QualifiedId, Tactic, TacticCategory, Technique,
};
