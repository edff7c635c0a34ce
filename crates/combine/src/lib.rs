//! # Combination Graph
//!
//! Compatibility analysis over the technique taxonomy.
//!
//! ## Architecture
//!
//! ```text
//! Taxonomy
//!     │
//!     ├──> CombinationGraph (petgraph)
//!     │      ├─ Nodes: qualified technique ids
//!     │      └─ Edges: declared combines_well_with references
//!     │
//!     └──> Advisor
//!            ├─ suggest: partners reachable from a selection,
//!            │           ranked by distinct endorsements
//!            ├─ conflicts: same-shape pairs with no declared edge
//!            └─ combination-strategy pattern matching
//! ```
//!
//! Declared edges are directed; every query treats an edge in either
//! direction as evidence of compatibility.

mod advisor;
mod graph;
mod matching;

#[cfg(test)]
mod test_fixtures;

pub use advisor::{Advisor, ConflictWarning};
pub use graph::CombinationGraph;
pub use matching::match_combinations;
