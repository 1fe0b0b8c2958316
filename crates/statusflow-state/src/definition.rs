//! # Declarative Workflow Definitions
//!
//! A workflow can be described as data and loaded at startup instead of
//! being assembled in code:
//!
//! ```yaml
//! name: article-approval
//! config:
//!   unrecognized_state: reject
//! rules:
//!   - { from: Modified,  on: Submit,   to: Submitted }
//!   - { from: Submitted, on: Publish,  to: Published }
//!   - { from: Published, on: Withdraw, to: Modified }
//! ```
//!
//! Token names are matched strictly when the definition is built: a name
//! that does not belong to the target token domain is an error, unlike
//! status construction where unknown text degrades to a fallback.
//!
//! Rules are applied in file order, so the derived views of the built
//! workflow follow the order the rules are written in.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use statusflow_core::{Token, TokenError, WorkflowConfig, WorkflowError};

use crate::workflow::Workflow;

/// Errors loading or building a workflow definition.
#[derive(Error, Debug)]
pub enum DefinitionError {
    /// The YAML document could not be parsed.
    #[error("invalid workflow definition YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The JSON document could not be parsed.
    #[error("invalid workflow definition JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A rule names a token outside the target domain.
    #[error("rule {index} of workflow '{name}': {source}")]
    UnknownToken {
        /// Definition name.
        name: String,
        /// Zero-based rule position.
        index: usize,
        /// The strict-parse failure.
        source: TokenError,
    },

    /// The definition file extension is neither YAML nor JSON.
    #[error("unsupported workflow definition format for '{path}'")]
    UnsupportedFormat {
        /// Path of the rejected file.
        path: String,
    },

    /// The workflow rejected the definition.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// IO error reading a definition file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// One rule of a definition, by canonical token names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDefinition {
    /// Source state name.
    pub from: String,
    /// Operation name.
    pub on: String,
    /// Result state name.
    pub to: String,
}

/// A named, serializable description of a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkflowDefinition {
    /// Definition name, also usable as a registry owner name.
    pub name: String,
    /// Policy settings for the built workflow.
    #[serde(default)]
    pub config: WorkflowConfig,
    /// Rules in application order.
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

impl WorkflowDefinition {
    /// Parse a definition from YAML.
    pub fn from_yaml(text: &str) -> Result<Self, DefinitionError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parse a definition from JSON.
    pub fn from_json(text: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a definition from a `.yaml`, `.yml` or `.json` file.
    pub fn load(path: &Path) -> Result<Self, DefinitionError> {
        let extension = path.extension().and_then(|ext| ext.to_str());
        let parse: fn(&str) -> Result<Self, DefinitionError> = match extension {
            Some("yaml" | "yml") => Self::from_yaml,
            Some("json") => Self::from_json,
            _ => {
                return Err(DefinitionError::UnsupportedFormat {
                    path: path.display().to_string(),
                })
            }
        };
        let content = std::fs::read_to_string(path)?;
        parse(&content)
    }

    /// Render as YAML.
    pub fn to_yaml(&self) -> Result<String, DefinitionError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, DefinitionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Describe an existing workflow's rules and configuration.
    pub fn from_workflow<S: Token, O: Token>(
        name: impl Into<String>,
        workflow: &Workflow<S, O>,
    ) -> Self {
        Self {
            name: name.into(),
            config: *workflow.config(),
            rules: workflow
                .table()
                .rules()
                .iter()
                .map(|rule| RuleDefinition {
                    from: rule.from.name().to_string(),
                    on: rule.on.name().to_string(),
                    to: rule.to.name().to_string(),
                })
                .collect(),
        }
    }

    /// Build and seal a workflow over `S` and `O`.
    pub fn build<S: Token, O: Token>(&self) -> Result<Workflow<S, O>, DefinitionError> {
        let mut workflow = Workflow::with_config(self.config);
        self.apply(&mut workflow)?;
        tracing::debug!(name = %self.name, rules = self.rules.len(), "workflow definition built");
        Ok(workflow.sealed())
    }

    /// Populate an existing workflow with this definition's rules.
    ///
    /// The configuration is not applied; use this from a registry
    /// initializer, where the registry owns the configuration.
    pub fn apply<S: Token, O: Token>(
        &self,
        workflow: &mut Workflow<S, O>,
    ) -> Result<(), DefinitionError> {
        for (index, rule) in self.rules.iter().enumerate() {
            let unknown = |source| DefinitionError::UnknownToken {
                name: self.name.clone(),
                index,
                source,
            };
            workflow.add_rule(
                S::parse_strict(&rule.from).map_err(unknown)?,
                O::parse_strict(&rule.on).map_err(unknown)?,
                S::parse_strict(&rule.to).map_err(unknown)?,
            )?;
        }
        Ok(())
    }
}
