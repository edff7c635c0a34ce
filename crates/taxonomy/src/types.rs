use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Broad class of a tactic. Advisory metadata, not used in composition logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TacticCategory {
    #[default]
    PromptLevel,
    Structural,
    Infrastructure,
}

impl TacticCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            TacticCategory::PromptLevel => "prompt-level",
            TacticCategory::Structural => "structural",
            TacticCategory::Infrastructure => "infrastructure",
        }
    }
}

/// How a technique is deployed.
///
/// Ordered by escalation: when techniques with different shapes are combined,
/// the largest shape dictates the shape of the composed output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionShape {
    #[default]
    SinglePrompt,
    MultiTurn,
    Artifact,
}

impl ExecutionShape {
    pub const fn as_str(self) -> &'static str {
        match self {
            ExecutionShape::SinglePrompt => "single_prompt",
            ExecutionShape::MultiTurn => "multi_turn",
            ExecutionShape::Artifact => "artifact",
        }
    }

    /// Human-readable form for prose messages; `as_str` stays the wire form.
    pub const fn label(self) -> &'static str {
        match self {
            ExecutionShape::SinglePrompt => "single-prompt",
            ExecutionShape::MultiTurn => "multi-turn",
            ExecutionShape::Artifact => "artifact",
        }
    }
}

impl fmt::Display for ExecutionShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid qualified id `{input}` (expected `tactic_id:technique_id`)")]
pub struct ParseQualifiedIdError {
    pub input: String,
}

/// Global address of a technique: `tactic_id:technique_id`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QualifiedId {
    tactic: String,
    technique: String,
}

impl QualifiedId {
    pub fn new(tactic: impl Into<String>, technique: impl Into<String>) -> Self {
        Self {
            tactic: tactic.into(),
            technique: technique.into(),
        }
    }

    pub fn tactic(&self) -> &str {
        &self.tactic
    }

    pub fn technique(&self) -> &str {
        &self.technique
    }
}

impl FromStr for QualifiedId {
    type Err = ParseQualifiedIdError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((tactic, technique))
                if !tactic.is_empty() && !technique.is_empty() && !technique.contains(':') =>
            {
                Ok(Self::new(tactic, technique))
            }
            _ => Err(ParseQualifiedIdError {
                input: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for QualifiedId {
    type Error = ParseQualifiedIdError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QualifiedId> for String {
    fn from(id: QualifiedId) -> Self {
        id.to_string()
    }
}

impl fmt::Display for QualifiedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tactic, self.technique)
    }
}

/// A single red-team technique. Immutable after load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Technique {
    /// Identifier, unique within the owning tactic.
    pub id: String,
    pub name: String,
    pub description: String,
    pub tactic_id: String,
    pub tactic_name: String,
    pub shape: ExecutionShape,
    /// Usage example text, verbatim from the source.
    pub example: Option<String>,
    pub effectiveness_notes: Option<String>,
    /// Declared compatibility references. Stored as declared; not forced
    /// symmetric. Dangling targets are filtered out at load time and
    /// reported separately.
    pub combines_well_with: Vec<QualifiedId>,
    /// Framework-mapping annotations (e.g. external taxonomy ids). Advisory.
    pub frameworks: Vec<String>,
}

impl Technique {
    /// Global `tactic_id:technique_id` address.
    pub fn qualified_id(&self) -> QualifiedId {
        QualifiedId::new(self.tactic_id.clone(), self.id.clone())
    }
}

/// A category of techniques. Immutable after load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tactic {
    /// Unique lowercase identifier.
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: TacticCategory,
    /// Techniques in declaration order.
    pub techniques: Vec<Technique>,
}
