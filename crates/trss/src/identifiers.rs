//! Newtype domain identifiers.
//!
//! Every server-side concept with an identity gets a distinct newtype so a
//! [`SkinId`] can never be passed where a [`UserId`] is expected, even though
//! both are `u64` on the wire.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::deserialize_u64_lenient;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new value, returning `None` if it is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Macro for u64-wrapped newtypes (server-assigned integers).
// Generates: struct (Copy), new(), as_u64(), Display, lenient Deserialize.
// ---------------------------------------------------------------------------
macro_rules! u64_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Creates a new identifier from a raw integer.
            pub fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the underlying integer value.
            pub fn as_u64(self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserialize_u64_lenient(deserializer).map(Self)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers — server-integer-backed
// ---------------------------------------------------------------------------

u64_id! {
    /// Identifies a registered user account.
    UserId
}

u64_id! {
    /// Identifies an uploaded skin.
    ///
    /// Also used as the `from_id` cursor of the listing actions.
    SkinId
}

// ---------------------------------------------------------------------------
// Identifiers — String-backed
// ---------------------------------------------------------------------------

string_id! {
    /// Opaque session token produced by the `login` action.
    ///
    /// Treated as a secret: the `Debug` output is redacted so tokens never
    /// end up in logs.
    Token
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

string_id! {
    /// Display name of an uploaded skin.
    SkinName
}

impl std::fmt::Debug for SkinName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SkinName").field(&self.0).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_ids_reject_empty_values() {
        assert!(Token::new("").is_none());
        assert!(SkinName::new(String::new()).is_none());
        assert_eq!(Token::new("abc").map(|t| t.as_str().to_owned()), Some("abc".into()));
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = Token::new("super-secret").unwrap();
        assert_eq!(format!("{token:?}"), "Token(<redacted>)");
        assert_eq!(token.to_string(), "super-secret");
    }

    #[test]
    fn numeric_ids_accept_numbers_and_numeric_strings() {
        let a: SkinId = serde_json::from_str("42").unwrap();
        let b: SkinId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(a, SkinId::new(42));
        assert_eq!(a, b);
        assert!(serde_json::from_str::<UserId>("\"forty\"").is_err());
        assert!(serde_json::from_str::<UserId>("-3").is_err());
    }
}
