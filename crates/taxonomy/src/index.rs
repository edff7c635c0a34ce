use std::collections::HashMap;

use crate::strategy::StrategyLibrary;
use crate::types::{QualifiedId, Tactic, Technique};

/// Read-only index over the loaded taxonomy.
///
/// Built once per load and never patched; a reload constructs a fresh
/// instance. All enumeration follows declaration order: tactics in source
/// order, techniques in the order their source declared them.
#[derive(Debug)]
pub struct Taxonomy {
    tactics: Vec<Tactic>,
    tactic_lookup: HashMap<String, usize>,
    technique_lookup: HashMap<QualifiedId, (usize, usize)>,
    /// Global declaration rank per technique, used for deterministic
    /// tie-breaks by the advisor.
    ranks: HashMap<QualifiedId, usize>,
    strategies: StrategyLibrary,
}

impl Taxonomy {
    pub(crate) fn new(tactics: Vec<Tactic>, strategies: StrategyLibrary) -> Self {
        let mut tactic_lookup = HashMap::new();
        let mut technique_lookup = HashMap::new();
        let mut ranks = HashMap::new();

        let mut rank = 0usize;
        for (ti, tactic) in tactics.iter().enumerate() {
            tactic_lookup.insert(tactic.id.clone(), ti);
            for (xi, technique) in tactic.techniques.iter().enumerate() {
                let id = technique.qualified_id();
                technique_lookup.insert(id.clone(), (ti, xi));
                ranks.insert(id, rank);
                rank += 1;
            }
        }

        Self {
            tactics,
            tactic_lookup,
            technique_lookup,
            ranks,
            strategies,
        }
    }

    /// All tactics in declaration order.
    pub fn tactics(&self) -> &[Tactic] {
        &self.tactics
    }

    pub fn tactic(&self, id: &str) -> Option<&Tactic> {
        self.tactic_lookup.get(id).map(|&i| &self.tactics[i])
    }

    pub fn technique(&self, id: &QualifiedId) -> Option<&Technique> {
        self.technique_lookup
            .get(id)
            .map(|&(ti, xi)| &self.tactics[ti].techniques[xi])
    }

    /// Techniques of a tactic in declaration order, or `None` for an unknown
    /// tactic id.
    pub fn techniques_of(&self, tactic_id: &str) -> Option<&[Technique]> {
        self.tactic(tactic_id).map(|t| t.techniques.as_slice())
    }

    /// All techniques across all tactics, in declaration order.
    pub fn techniques(&self) -> impl Iterator<Item = &Technique> {
        self.tactics.iter().flat_map(|t| t.techniques.iter())
    }

    pub fn technique_count(&self) -> usize {
        self.technique_lookup.len()
    }

    /// Global declaration rank of a technique (tactic order, then technique
    /// order within the tactic).
    pub fn declaration_rank(&self, id: &QualifiedId) -> Option<usize> {
        self.ranks.get(id).copied()
    }

    /// Case-insensitive substring search over technique id, name, and
    /// description. Results keep declaration order; there is no relevance
    /// scoring beyond substring presence. The empty query is a substring of
    /// everything and matches every technique.
    pub fn search(&self, query: &str) -> Vec<&Technique> {
        let needle = query.to_lowercase();
        self.techniques()
            .filter(|t| {
                t.id.to_lowercase().contains(&needle)
                    || t.name.to_lowercase().contains(&needle)
                    || t.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn strategies(&self) -> &StrategyLibrary {
        &self.strategies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{NamedSource, StrategySources, TaxonomyLoader};
    use pretty_assertions::assert_eq;

    fn taxonomy() -> Taxonomy {
        let sources = [
            NamedSource::new(
                "encoding.yaml",
                r#"
tactic:
  id: encoding
  name: Encoding
  description: Obfuscate the payload.
techniques:
  - id: base64
    name: Base64 Encoding
    description: Encode the sensitive span in base64.
  - id: rot13
    name: ROT13
    description: Rotate letters by thirteen places.
"#,
            ),
            NamedSource::new(
                "framing.yaml",
                r#"
tactic:
  id: framing
  name: Framing
  description: Recast the request in an innocuous frame.
techniques:
  - id: hypothetical
    name: Hypothetical Framing
    description: Pose the request as a thought experiment with encoded terms.
"#,
            ),
        ];
        TaxonomyLoader::load_from_sources(&sources, &StrategySources::default())
            .unwrap()
            .taxonomy
    }

    #[test]
    fn lookup_by_tactic_and_qualified_id() {
        let taxonomy = taxonomy();
        assert_eq!(taxonomy.tactic("encoding").unwrap().name, "Encoding");
        assert!(taxonomy.tactic("persona").is_none());

        let id: QualifiedId = "framing:hypothetical".parse().unwrap();
        assert_eq!(taxonomy.technique(&id).unwrap().name, "Hypothetical Framing");
        assert!(taxonomy
            .technique(&"framing:missing".parse().unwrap())
            .is_none());
    }

    #[test]
    fn enumeration_keeps_declaration_order() {
        let taxonomy = taxonomy();
        let ids: Vec<&str> = taxonomy
            .techniques_of("encoding")
            .unwrap()
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["base64", "rot13"]);

        let ranks: Vec<usize> = taxonomy
            .techniques()
            .map(|t| taxonomy.declaration_rank(&t.qualified_id()).unwrap())
            .collect();
        assert_eq!(ranks, vec![0, 1, 2]);
    }

    #[test]
    fn search_is_case_insensitive_and_ordered() {
        let taxonomy = taxonomy();

        let hits: Vec<&str> = taxonomy.search("ENCOD").iter().map(|t| t.id.as_str()).collect();
        // Matches base64 by name/description and hypothetical by its
        // "encoded terms" description, tactic order first.
        assert_eq!(hits, vec!["base64", "hypothetical"]);

        let by_id: Vec<&str> = taxonomy.search("rot13").iter().map(|t| t.id.as_str()).collect();
        assert_eq!(by_id, vec!["rot13"]);

        assert!(taxonomy.search("nonexistent").is_empty());
    }

    #[test]
    fn empty_query_matches_every_technique() {
        let taxonomy = taxonomy();
        assert_eq!(taxonomy.search("").len(), taxonomy.technique_count());
    }
}
