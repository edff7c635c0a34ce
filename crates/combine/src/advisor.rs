use serde::Serialize;
use std::collections::HashMap;

use rtc_taxonomy::{ExecutionShape, QualifiedId, Selection, Taxonomy};

use crate::graph::CombinationGraph;

/// Heuristic redundancy signal: two selected techniques share an execution
/// shape without a declared compatibility edge. Advisory only, never
/// blocking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictWarning {
    pub first: QualifiedId,
    pub second: QualifiedId,
    pub shape: ExecutionShape,
    pub message: String,
}

/// Suggests compatible partners for a selection and flags likely-redundant
/// pairs within it.
pub struct Advisor<'a> {
    taxonomy: &'a Taxonomy,
    graph: &'a CombinationGraph,
}

impl<'a> Advisor<'a> {
    pub fn new(taxonomy: &'a Taxonomy, graph: &'a CombinationGraph) -> Self {
        Self { taxonomy, graph }
    }

    /// Candidate partners for the selection: every technique reachable via a
    /// declared edge (either direction) from a selected id, excluding the
    /// selection itself.
    ///
    /// Ranked by the number of distinct selected techniques endorsing the
    /// candidate, descending; ties broken by declaration order in the index.
    pub fn suggest(&self, selection: &Selection) -> Vec<QualifiedId> {
        let mut endorsements: HashMap<QualifiedId, usize> = HashMap::new();
        for selected in selection.iter() {
            for partner in self.graph.partners(selected) {
                if !selection.contains(&partner) {
                    *endorsements.entry(partner).or_insert(0) += 1;
                }
            }
        }

        let mut ranked: Vec<(QualifiedId, usize, usize)> = Vec::new();
        for (candidate, count) in endorsements {
            // Graph nodes come from the index, so a missing rank means the
            // two structures disagree. Report and move on.
            match self.taxonomy.declaration_rank(&candidate) {
                Some(rank) => ranked.push((candidate, count, rank)),
                None => log::warn!("suggested candidate {candidate} not in index, skipping"),
            }
        }

        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        ranked.into_iter().map(|(id, _, _)| id).collect()
    }

    /// Flag selected pairs that share an execution shape but were never
    /// declared as combining well, in selection order.
    pub fn conflicts(&self, selection: &Selection) -> Vec<ConflictWarning> {
        let ids = selection.ids();
        let mut warnings = Vec::new();

        for (i, first) in ids.iter().enumerate() {
            for second in &ids[i + 1..] {
                let (Some(a), Some(b)) =
                    (self.taxonomy.technique(first), self.taxonomy.technique(second))
                else {
                    continue;
                };
                if a.shape == b.shape && !self.graph.declared(first, second) {
                    warnings.push(ConflictWarning {
                        first: first.clone(),
                        second: second.clone(),
                        shape: a.shape,
                        message: format!(
                            "{} and {} are both {} techniques with no declared synergy; \
                             they may be redundant",
                            a.name,
                            b.name,
                            a.shape.label()
                        ),
                    });
                }
            }
        }
        warnings
    }
}
