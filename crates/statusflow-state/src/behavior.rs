//! # State-Specific Behaviour
//!
//! Some callers attach different capabilities to each state: a draft
//! article accepts edits, a submitted one only remarks. [`StateBehavior`]
//! models that as a tagged union with one variant per state, built from the
//! state by a factory, each variant exposing the set of actions it allows.
//!
//! Asking a variant for an action it does not allow yields
//! [`WorkflowError::Forbidden`].

use std::fmt;

use statusflow_core::{Token, WorkflowError};

/// Per-state capability set, selected by state.
pub trait StateBehavior: Sized {
    /// State token type the behaviour is keyed on.
    type State: Token;
    /// Action vocabulary.
    type Action: Copy + Eq + fmt::Display + 'static;

    /// The variant for `state`.
    fn for_state(state: Self::State) -> Self;

    /// The state this variant was built for.
    fn state(&self) -> Self::State;

    /// Actions this variant allows.
    fn permitted(&self) -> &'static [Self::Action];

    /// Whether `action` is allowed.
    fn allows(&self, action: Self::Action) -> bool {
        self.permitted().contains(&action)
    }

    /// Fail with [`WorkflowError::Forbidden`] unless `action` is allowed.
    fn require(&self, action: Self::Action) -> Result<(), WorkflowError> {
        if self.allows(action) {
            return Ok(());
        }
        tracing::trace!(state = %self.state(), action = %action, "action forbidden");
        Err(WorkflowError::Forbidden {
            state: self.state().name().to_string(),
            action: action.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statusflow_core::tokens;

    tokens! {
        enum Stage {
            Draft,
            Review,
            Live,
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Action {
        Edit,
        Comment,
        Remark,
    }

    impl fmt::Display for Action {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let name = match self {
                Self::Edit => "edit",
                Self::Comment => "comment",
                Self::Remark => "remark",
            };
            f.write_str(name)
        }
    }

    #[derive(Debug, PartialEq, Eq)]
    enum Article {
        Draft,
        Review,
        Live,
    }

    impl StateBehavior for Article {
        type State = Stage;
        type Action = Action;

        fn for_state(state: Stage) -> Self {
            match state {
                Stage::Draft => Self::Draft,
                Stage::Review => Self::Review,
                Stage::Live => Self::Live,
            }
        }

        fn state(&self) -> Stage {
            match self {
                Self::Draft => Stage::Draft,
                Self::Review => Stage::Review,
                Self::Live => Stage::Live,
            }
        }

        fn permitted(&self) -> &'static [Action] {
            match self {
                Self::Draft => &[Action::Edit, Action::Comment],
                Self::Review => &[Action::Remark],
                Self::Live => &[Action::Comment],
            }
        }
    }

    #[test]
    fn test_factory_selects_variant() {
        assert_eq!(Article::for_state(Stage::Review), Article::Review);
        assert_eq!(Article::for_state(Stage::Live).state(), Stage::Live);
    }

    #[test]
    fn test_allows() {
        let draft = Article::for_state(Stage::Draft);
        assert!(draft.allows(Action::Edit));
        assert!(!draft.allows(Action::Remark));
    }

    #[test]
    fn test_require_permitted() {
        assert!(Article::Review.require(Action::Remark).is_ok());
    }

    #[test]
    fn test_require_forbidden() {
        let err = Article::Live.require(Action::Edit).unwrap_err();
        assert_eq!(
            err,
            WorkflowError::Forbidden {
                state: "Live".into(),
                action: "edit".into()
            }
        );
        assert_eq!(err.code(), "FORBIDDEN");
    }
}
