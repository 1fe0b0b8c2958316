//! Raw status values as they arrive from outside the engine.
//!
//! Records and DTOs store a status either as the state token itself or as
//! its canonical name. [`RawStatus`] lets a single constructor accept both.

use std::borrow::Cow;

use crate::token::Token;

/// A state token or its textual form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawStatus<S> {
    /// A native state value.
    State(S),
    /// The canonical name of a state, not yet parsed.
    Text(String),
}

impl<S: Token> RawStatus<S> {
    /// Resolve to a state token. Text that names no token yields `None`.
    pub fn resolve(&self) -> Option<S> {
        match self {
            Self::State(state) => Some(*state),
            Self::Text(text) => S::parse(text),
        }
    }

    /// The textual form, borrowing when the value is already text.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::State(state) => Cow::Borrowed(state.name()),
            Self::Text(text) => Cow::Borrowed(text.as_str()),
        }
    }
}

impl<S> From<&str> for RawStatus<S> {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl<S> From<String> for RawStatus<S> {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::tokens! {
        enum Door {
            Open,
            Closed,
        }
    }

    #[test]
    fn test_resolve_state() {
        assert_eq!(RawStatus::State(Door::Open).resolve(), Some(Door::Open));
    }

    #[test]
    fn test_resolve_text() {
        assert_eq!(RawStatus::<Door>::from("Closed").resolve(), Some(Door::Closed));
        assert_eq!(RawStatus::<Door>::from("ajar".to_string()).resolve(), None);
    }

    #[test]
    fn test_as_text() {
        assert_eq!(RawStatus::State(Door::Closed).as_text(), "Closed");
        assert_eq!(RawStatus::<Door>::from("ajar").as_text(), "ajar");
    }
}
