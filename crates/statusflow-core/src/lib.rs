//! # statusflow-core — Foundational Types for statusflow
//!
//! This crate is the leaf of the statusflow workspace. It defines the
//! vocabulary every workflow is written in, and depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Tokens are closed, statically declared sets.** States and operations
//!    are plain Rust enums implementing [`Token`]. The full list of values is
//!    a `const` slice ([`Token::ALL`]), so there is no runtime discovery of
//!    variants. The [`tokens!`] macro declares such an enum together with its
//!    canonical names, `Display`, `FromStr` and serde support.
//!
//! 2. **Canonical names are the only textual form.** Rendering and parsing
//!    go through [`Token::name`] and [`Token::parse`]. Parsing is an exact,
//!    case-sensitive match.
//!
//! 3. **One error hierarchy.** [`WorkflowError`] covers API-ordering
//!    mistakes and binding failures; [`TokenError`] covers text that does
//!    not name a token. Soft failures (an unknown transition, a bad initial
//!    value under the default policy) never become errors.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `statusflow-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod raw;
pub mod token;

// Re-export primary types for ergonomic imports.
pub use config::{PreSealQueries, UnrecognizedState, WorkflowConfig};
pub use error::{TokenError, WorkflowError};
pub use lifecycle::Lifecycle;
pub use raw::RawStatus;
pub use token::Token;

#[doc(hidden)]
pub mod __private {
    pub use serde;
}
