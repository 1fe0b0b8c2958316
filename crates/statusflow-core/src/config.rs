//! # Workflow Configuration
//!
//! Two behaviours of the engine are policy rather than mechanism, and are
//! selected per workflow through [`WorkflowConfig`]:
//!
//! - what the valid-state and valid-operation views return before the
//!   workflow is sealed ([`PreSealQueries`]);
//! - what happens when a status is constructed from a state the workflow
//!   does not recognize, or from text that names no state
//!   ([`UnrecognizedState`]).
//!
//! The defaults favour silent, deterministic degradation. Configuration is
//! plain serde data and can be embedded in YAML or JSON documents:
//!
//! ```yaml
//! pre_seal_queries: reject
//! unrecognized_state: fallback
//! ```

use serde::{Deserialize, Serialize};

/// Behaviour of `valid_operations` / `valid_statuses` before sealing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreSealQueries {
    /// Return an empty view.
    #[default]
    Empty,
    /// Fail with `InvalidLifecycleState`.
    Reject,
}

/// Behaviour of status construction with an unrecognized initial value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnrecognizedState {
    /// Substitute the workflow's first valid state.
    #[default]
    Fallback,
    /// Fail the construction.
    Reject,
}

/// Per-workflow policy settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkflowConfig {
    /// Behaviour of derived-view queries before sealing.
    pub pre_seal_queries: PreSealQueries,
    /// Behaviour of status construction with unrecognized values.
    pub unrecognized_state: UnrecognizedState,
}

impl WorkflowConfig {
    /// Reject everything the default configuration degrades silently.
    pub fn strict() -> Self {
        Self {
            pre_seal_queries: PreSealQueries::Reject,
            unrecognized_state: UnrecognizedState::Reject,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_lenient() {
        let config = WorkflowConfig::default();
        assert_eq!(config.pre_seal_queries, PreSealQueries::Empty);
        assert_eq!(config.unrecognized_state, UnrecognizedState::Fallback);
    }

    #[test]
    fn test_strict() {
        let config = WorkflowConfig::strict();
        assert_eq!(config.pre_seal_queries, PreSealQueries::Reject);
        assert_eq!(config.unrecognized_state, UnrecognizedState::Reject);
    }

    #[test]
    fn test_empty_document_yields_defaults() {
        let config: WorkflowConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, WorkflowConfig::default());
    }

    #[test]
    fn test_yaml_partial_override() {
        let config: WorkflowConfig = serde_yaml::from_str("pre_seal_queries: reject\n").unwrap();
        assert_eq!(config.pre_seal_queries, PreSealQueries::Reject);
        assert_eq!(config.unrecognized_state, UnrecognizedState::Fallback);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<WorkflowConfig, _> = serde_json::from_str(r#"{"strictness": "high"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialized_form_is_snake_case() {
        let json = serde_json::to_value(WorkflowConfig::strict()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "pre_seal_queries": "reject",
                "unrecognized_state": "reject"
            })
        );
    }
}
