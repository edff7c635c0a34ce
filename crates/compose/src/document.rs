use serde::Serialize;
use std::fmt;

use rtc_taxonomy::QualifiedId;

/// What kind of document to compose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComposeMode {
    /// Instructions for one generated adversarial prompt targeting a
    /// specific objective.
    SingleRequest,

    /// Instructions for a standing system prompt meant to persist across
    /// turns. An objective is optional here.
    PersistentJailbreak,
}

impl ComposeMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ComposeMode::SingleRequest => "single_request",
            ComposeMode::PersistentJailbreak => "persistent_jailbreak",
        }
    }
}

impl fmt::Display for ComposeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rendered instruction document. Never persisted by the core; the caller
/// decides how to display or write it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedDocument {
    pub mode: ComposeMode,
    /// The techniques rendered into the document, in selection order.
    pub techniques: Vec<QualifiedId>,
    pub text: String,
}

impl fmt::Display for ComposedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
