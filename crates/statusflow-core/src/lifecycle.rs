//! Workflow lifecycle phases.

use serde::{Deserialize, Serialize};

/// The build-then-freeze lifecycle of a workflow.
///
/// ```text
/// Building ──seal()──▶ Sealed
/// ```
///
/// The transition is one-way. Rules may only be added while `Building`;
/// transitions may only be evaluated once `Sealed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    /// Rules may be added; the workflow cannot be evaluated yet.
    #[default]
    Building,
    /// The rule table is frozen and queries are available.
    Sealed,
}

impl Lifecycle {
    /// Whether the workflow has been sealed.
    pub fn is_sealed(&self) -> bool {
        matches!(self, Self::Sealed)
    }
}

impl std::fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Building => "building",
            Self::Sealed => "sealed",
        };
        f.write_str(s)
    }
}
