use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap};

use rtc_taxonomy::{QualifiedId, Taxonomy};

/// Adjacency over qualified technique ids, built once per load from the
/// union of declared `combines_well_with` edges.
///
/// Edges are stored as declared (directed, not forced symmetric); neighbor
/// queries look both ways.
pub struct CombinationGraph {
    graph: DiGraph<QualifiedId, ()>,
    nodes: HashMap<QualifiedId, NodeIndex>,
}

impl CombinationGraph {
    /// Build the graph from every technique in the taxonomy. Dangling
    /// references were already stripped by the loader, so every declared
    /// edge connects two known nodes.
    pub fn build(taxonomy: &Taxonomy) -> Self {
        let mut graph = DiGraph::new();
        let mut nodes = HashMap::new();

        for technique in taxonomy.techniques() {
            let id = technique.qualified_id();
            let idx = graph.add_node(id.clone());
            nodes.insert(id, idx);
        }

        for technique in taxonomy.techniques() {
            let from = nodes[&technique.qualified_id()];
            for target in &technique.combines_well_with {
                match nodes.get(target) {
                    Some(&to) => {
                        graph.add_edge(from, to, ());
                    }
                    None => {
                        log::warn!(
                            "skipping edge {} -> {target}: target not indexed",
                            technique.qualified_id()
                        );
                    }
                }
            }
        }

        Self { graph, nodes }
    }

    /// Declared partners of a technique, in either edge direction,
    /// deduplicated, in declaration order.
    pub fn partners(&self, id: &QualifiedId) -> Vec<QualifiedId> {
        let Some(&idx) = self.nodes.get(id) else {
            return Vec::new();
        };

        // Nodes were added in declaration order, so sorting by node index
        // keeps partners in declaration order too.
        let mut partners: BTreeSet<NodeIndex> = BTreeSet::new();
        for direction in [Direction::Outgoing, Direction::Incoming] {
            for neighbor in self.graph.neighbors_directed(idx, direction) {
                partners.insert(neighbor);
            }
        }
        partners.remove(&idx);
        partners
            .into_iter()
            .map(|neighbor| self.graph[neighbor].clone())
            .collect()
    }

    /// Whether a compatibility edge was declared between the two techniques,
    /// in either direction.
    pub fn declared(&self, a: &QualifiedId, b: &QualifiedId) -> bool {
        match (self.nodes.get(a), self.nodes.get(b)) {
            (Some(&ia), Some(&ib)) => {
                self.graph.find_edge(ia, ib).is_some() || self.graph.find_edge(ib, ia).is_some()
            }
            _ => false,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::taxonomy;
    use pretty_assertions::assert_eq;

    fn id(s: &str) -> QualifiedId {
        s.parse().unwrap()
    }

    #[test]
    fn builds_one_node_per_technique() {
        let taxonomy = taxonomy();
        let graph = CombinationGraph::build(&taxonomy);
        assert_eq!(graph.node_count(), taxonomy.technique_count());
    }

    #[test]
    fn partners_sees_edges_in_both_directions() {
        let taxonomy = taxonomy();
        let graph = CombinationGraph::build(&taxonomy);

        // base64 declares hypothetical; hypothetical declares nothing back.
        assert_eq!(
            graph.partners(&id("encoding:base64")),
            vec![id("framing:hypothetical")]
        );
        assert!(graph
            .partners(&id("framing:hypothetical"))
            .contains(&id("encoding:base64")));
    }

    #[test]
    fn declared_is_direction_agnostic() {
        let taxonomy = taxonomy();
        let graph = CombinationGraph::build(&taxonomy);
        assert!(graph.declared(&id("encoding:base64"), &id("framing:hypothetical")));
        assert!(graph.declared(&id("framing:hypothetical"), &id("encoding:base64")));
        assert!(!graph.declared(&id("encoding:base64"), &id("encoding:rot13")));
    }

    #[test]
    fn partners_follow_declaration_order_not_lexicographic_order() {
        use rtc_taxonomy::{NamedSource, StrategySources, TaxonomyLoader};

        // rot13 is declared before base64; both partner with hypothetical.
        let sources = [
            NamedSource::new(
                "encoding.yaml",
                r#"
tactic:
  id: encoding
  name: Encoding
  description: Obfuscate the payload.
techniques:
  - id: rot13
    name: ROT13
    description: Rotate letters by thirteen places.
    combines_well_with:
      - framing:hypothetical
  - id: base64
    name: Base64 Encoding
    description: Encode the sensitive span in base64.
    combines_well_with:
      - framing:hypothetical
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
    description: Pose the request as a thought experiment.
"#,
            ),
        ];
        let taxonomy = TaxonomyLoader::load_from_sources(&sources, &StrategySources::default())
            .unwrap()
            .taxonomy;

        let graph = CombinationGraph::build(&taxonomy);
        assert_eq!(
            graph.partners(&id("framing:hypothetical")),
            vec![id("encoding:rot13"), id("encoding:base64")]
        );
    }

    #[test]
    fn unknown_id_has_no_partners() {
        let taxonomy = taxonomy();
        let graph = CombinationGraph::build(&taxonomy);
        assert!(graph.partners(&id("persona:character")).is_empty());
    }
}
