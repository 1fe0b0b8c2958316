//! # statusflow-state — Sealed Workflows and Bound Statuses
//!
//! Implements table-driven finite-state workflows over token enums from
//! `statusflow-core`. A workflow is assembled rule by rule, sealed, and then
//! shared read-only between any number of status values.
//!
//! ## Components
//!
//! - **Transition table** (`table.rs`): `state → (operation → state)`
//!   mapping with first-write-wins insertion and insertion-ordered rules.
//!
//! - **Workflow** (`workflow.rs`): `Building → Sealed` lifecycle around a
//!   table. Derived views (`valid_operations`, `valid_statuses`) are
//!   computed once after sealing, in first-seen rule order.
//!
//! - **Registry** (`registry.rs`): write-once store of sealed workflows
//!   keyed by (state type, operation type, owner). Concurrent first access
//!   builds a workflow exactly once.
//!
//! - **Status** (`status.rs`): a current state bound to a sealed workflow,
//!   with in-place and chained transitions. [`StatusKind`] gives a type its
//!   own registry-managed workflow.
//!
//! - **Behaviour** (`behavior.rs`): per-state capability sets selected by
//!   the current state.
//!
//! - **Definitions** (`definition.rs`): workflows described as YAML or
//!   JSON documents.
//!
//! ## Design
//!
//! Unknown transitions are no-ops, not errors: a status that receives an
//! operation its workflow has no rule for keeps its state. Hard errors are
//! reserved for lifecycle misuse (adding a rule after sealing, evaluating
//! before sealing) and, when configured, for unrecognized initial values.

pub mod behavior;
pub mod definition;
pub mod registry;
pub mod status;
pub mod table;
pub mod workflow;

// ─── Workflow re-exports ────────────────────────────────────────────

pub use table::{Rule, TransitionTable};
pub use workflow::Workflow;

// ─── Registry re-exports ────────────────────────────────────────────

pub use registry::{Owner, WorkflowKey, WorkflowRegistry};

// ─── Status re-exports ──────────────────────────────────────────────

pub use behavior::StateBehavior;
pub use status::{Status, StatusKind};

// ─── Definition re-exports ──────────────────────────────────────────

pub use definition::{DefinitionError, RuleDefinition, WorkflowDefinition};
