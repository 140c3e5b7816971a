//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally passing a user id where a channel id is expected.

use thiserror::Error;

/// Error returned when an ID cannot be parsed from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} id: {input:?}")]
pub struct IdError {
    /// Which kind of id was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub input: String,
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`, so payloads carry bare numbers
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_i64()`
/// - `From<i64>`, `Into<i64>` and `FromStr` implementations
///
/// # Example
///
/// ```rust
/// # use ptt_admin_core::define_id;
/// define_id!(UserId, "user");
/// define_id!(ChannelId, "channel");
///
/// let user_id = UserId::new(1);
/// let channel_id: ChannelId = "7".parse().unwrap();
///
/// // These are different types, so this won't compile:
/// // let _: UserId = channel_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $kind:literal) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim()
                    .parse::<i64>()
                    .map(Self)
                    .map_err(|_| $crate::types::id::IdError {
                        kind: $kind,
                        input: s.to_owned(),
                    })
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ChannelId, "channel");
define_id!(UserId, "user");

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_as_bare_number() {
        let ids = vec![UserId::new(1), UserId::new(2), UserId::new(3)];
        assert_eq!(serde_json::to_string(&ids).unwrap(), "[1,2,3]");
    }

    #[test]
    fn test_id_parse() {
        assert_eq!("7".parse::<ChannelId>().unwrap(), ChannelId::new(7));
        assert_eq!(" 42 ".parse::<UserId>().unwrap().as_i64(), 42);
    }

    #[test]
    fn test_id_parse_rejects_text() {
        let err = "ops".parse::<ChannelId>().unwrap_err();
        assert_eq!(err.kind, "channel");
        assert_eq!(err.to_string(), "invalid channel id: \"ops\"");
    }
}
