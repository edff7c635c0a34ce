//! # Instruction Composer
//!
//! Renders a validated selection of techniques plus an objective into a
//! single structured instruction document.
//!
//! ## Architecture
//!
//! ```text
//! Selection + objective + mode
//!     │
//!     ├──> Composer
//!     │      ├─ Resolve techniques in selection order
//!     │      ├─ Mode framing (single request / persistent jailbreak)
//!     │      ├─ One subsection per technique
//!     │      ├─ Combination guidance (declared pairs + matched strategies)
//!     │      └─ Mode closing
//!     │
//!     └──> StrategyResolver
//!            └─ Per-technique application guidance and worked examples,
//!               merged into the subsections when available
//! ```
//!
//! Composition is pure: identical inputs always render byte-identical text.

mod composer;
mod document;
mod error;
mod resolver;

#[cfg(test)]
mod test_fixtures;

pub use composer::Composer;
pub use document::{ComposeMode, ComposedDocument};
pub use error::{ComposeError, Result};
pub use resolver::{render_guidance, GuidanceBlock, StrategyResolver};
