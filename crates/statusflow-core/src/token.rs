//! # Tokens: Enumerable States and Operations
//!
//! A token is one value from a finite, totally enumerable domain. Workflows
//! are generic over two token types: one for states and one for operations.
//! The two are structurally identical but distinct types, so a state can
//! never be passed where an operation is expected.
//!
//! ## Declaring Tokens
//!
//! ```
//! use statusflow_core::{tokens, Token};
//!
//! tokens! {
//!     /// Editorial state of an article.
//!     pub enum ArticleState {
//!         Modified,
//!         Submitted,
//!         Published => "published",
//!     }
//! }
//!
//! assert_eq!(ArticleState::ALL.len(), 3);
//! assert_eq!(ArticleState::Modified.name(), "Modified");
//! assert_eq!(ArticleState::parse("published"), Some(ArticleState::Published));
//! assert_eq!(ArticleState::parse("Published"), None);
//! ```
//!
//! A variant's canonical name defaults to its identifier; `=> "text"`
//! overrides it.

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Deserializer, Serializer};

use crate::error::TokenError;

/// A value from a finite, statically declared set.
///
/// Implementors must keep [`ALL`](Token::ALL) in declaration order and give
/// every value a distinct canonical name.
pub trait Token: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Every value of the domain, in declaration order.
    const ALL: &'static [Self];

    /// Name of the token domain, used in diagnostics (e.g., "ArticleState").
    const KIND: &'static str;

    /// The canonical textual form of this token.
    fn name(self) -> &'static str;

    /// Exact, case-sensitive lookup by canonical name.
    fn parse(text: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|token| token.name() == text)
    }

    /// Like [`parse`](Token::parse), but reports unknown text as an error.
    fn parse_strict(text: &str) -> Result<Self, TokenError> {
        Self::parse(text).ok_or_else(|| TokenError::Unparseable {
            kind: Self::KIND,
            token: text.to_string(),
        })
    }

    /// The first declared value, if the domain is non-empty.
    fn first() -> Option<Self> {
        Self::ALL.first().copied()
    }
}

/// Serialize a token as its canonical name.
pub fn serialize_token<T: Token, S: Serializer>(
    token: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(token.name())
}

/// Deserialize a token from its canonical name.
pub fn deserialize_token<'de, T: Token, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<T, D::Error> {
    let text = String::deserialize(deserializer)?;
    T::parse_strict(&text).map_err(serde::de::Error::custom)
}

/// Declare a token enum.
///
/// Generates the enum (deriving `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`,
/// `Hash`) plus [`Token`], `Display`, `FromStr`, serde `Serialize` /
/// `Deserialize` by canonical name, and `From<Enum> for RawStatus<Enum>`.
#[macro_export]
macro_rules! tokens {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident $(=> $text:literal)?
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $crate::Token for $name {
            const ALL: &'static [Self] = &[$($name::$variant,)+];
            const KIND: &'static str = stringify!($name);

            fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $crate::__token_text!($variant $(, $text)?),)+
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str($crate::Token::name(*self))
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::TokenError;

            fn from_str(text: &str) -> ::core::result::Result<Self, Self::Err> {
                <$name as $crate::Token>::parse_strict(text)
            }
        }

        impl ::core::convert::From<$name> for $crate::RawStatus<$name> {
            fn from(state: $name) -> Self {
                $crate::RawStatus::State(state)
            }
        }

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<__S>(&self, serializer: __S) -> ::core::result::Result<__S::Ok, __S::Error>
            where
                __S: $crate::__private::serde::Serializer,
            {
                $crate::token::serialize_token(self, serializer)
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<__D>(deserializer: __D) -> ::core::result::Result<Self, __D::Error>
            where
                __D: $crate::__private::serde::Deserializer<'de>,
            {
                $crate::token::deserialize_token(deserializer)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __token_text {
    ($variant:ident) => {
        stringify!($variant)
    };
    ($variant:ident, $text:literal) => {
        $text
    };
}
