use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A known ineffective or counterproductive approach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AntiPattern {
    pub pattern: String,
    pub why: String,
    pub instead: String,
}

/// A concrete example showing effective vs ineffective application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WorkedExample {
    #[serde(default)]
    pub scenario: String,
    #[serde(default)]
    pub effective: String,
    #[serde(default)]
    pub ineffective: String,
    #[serde(default)]
    pub why_effective_works: String,
}

/// Application guidance for one technique within a tactic strategy record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TechniqueStrategy {
    #[serde(default)]
    pub application_strategy: String,
    #[serde(default)]
    pub worked_examples: Vec<WorkedExample>,
}

/// Per-tactic strategy record. Augments techniques of the same tactic; a
/// tactic with no strategy record is fully usable, just less richly rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct TacticStrategy {
    pub tactic_id: String,
    pub name: String,
    pub general_strategy: String,
    pub techniques: HashMap<String, TechniqueStrategy>,
    pub anti_patterns: Vec<AntiPattern>,
    /// Research backing, free-form.
    pub citations: Vec<String>,
}

/// Per-execution-shape strategy record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct ShapeStrategy {
    pub shape: String,
    pub name: String,
    pub principles: Vec<String>,
    pub anti_patterns: Vec<AntiPattern>,
    pub quality_criteria: Vec<String>,
}

/// Guidance for a specific set of combined techniques.
///
/// `patterns` entries are exact qualified ids (`persona:character`) or tactic
/// wildcards (`encoding:*`); an entry applies when every pattern is satisfied
/// by at least one selected technique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct CombinationStrategy {
    pub patterns: Vec<String>,
    pub strategy: String,
    pub worked_example: Option<WorkedExample>,
}

/// All optional strategy records loaded alongside the taxonomy.
#[derive(Debug, Clone, Default)]
pub struct StrategyLibrary {
    tactics: HashMap<String, TacticStrategy>,
    shapes: HashMap<String, ShapeStrategy>,
    combinations: Vec<CombinationStrategy>,
}

impl StrategyLibrary {
    pub(crate) fn new(
        tactics: HashMap<String, TacticStrategy>,
        shapes: HashMap<String, ShapeStrategy>,
        combinations: Vec<CombinationStrategy>,
    ) -> Self {
        Self {
            tactics,
            shapes,
            combinations,
        }
    }

    pub fn tactic(&self, tactic_id: &str) -> Option<&TacticStrategy> {
        self.tactics.get(tactic_id)
    }

    pub fn shape(&self, shape: &str) -> Option<&ShapeStrategy> {
        self.shapes.get(shape)
    }

    pub fn combinations(&self) -> &[CombinationStrategy] {
        &self.combinations
    }

    pub fn is_empty(&self) -> bool {
        self.tactics.is_empty() && self.shapes.is_empty() && self.combinations.is_empty()
    }
}
