//! Typed records returned by the TRSS actions.
//!
//! The server is a PHP application and may emit integers either as JSON
//! numbers or as quoted strings, so every numeric field goes through
//! [`deserialize_u64_lenient`].

use serde::{Deserialize, Deserializer, Serialize};

use crate::{SkinId, Token, UserId};

// ---------------------------------------------------------------------------
// Lenient integer decoding
// ---------------------------------------------------------------------------

/// Deserializes a non-negative integer from either a JSON number or a
/// string containing one.
pub(crate) fn deserialize_u64_lenient<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("expected an integer, found {s:?}"))),
    }
}

// ---------------------------------------------------------------------------
// Users endpoint
// ---------------------------------------------------------------------------

/// Public profile of a user, as returned by `get_user_by_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: UserId,
    pub login: String,
    /// The user's current skin in wire form.
    pub skin: String,
    pub primary_color: String,
    pub secondary_color: String,
}

/// Profile of the user owning a session token, as returned by
/// `get_user_by_token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfoByToken {
    pub id: UserId,
    pub login: String,
    pub skin: String,
    pub private_token: Token,
    pub primary_color: String,
    pub secondary_color: String,
}

/// The skin and colours stored after a successful `change_skin`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedSkin {
    pub skin: String,
    pub primary_color: String,
    pub secondary_color: String,
}

// ---------------------------------------------------------------------------
// Skins endpoint
// ---------------------------------------------------------------------------

/// A skin record from the public catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkinInfo {
    pub id: SkinId,
    pub author_id: UserId,
    pub skin_name: String,
    /// The skin in wire form.
    pub skin: String,
    pub primary_color: String,
    pub secondary_color: String,
    #[serde(deserialize_with = "deserialize_u64_lenient")]
    pub likes: u64,
    #[serde(deserialize_with = "deserialize_u64_lenient")]
    pub views: u64,
}

impl SkinInfo {
    /// Field names and display values in declaration order.
    ///
    /// Used by front-ends that print a record generically.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("id", self.id.to_string()),
            ("author_id", self.author_id.to_string()),
            ("skin_name", self.skin_name.clone()),
            ("skin", self.skin.clone()),
            ("primary_color", self.primary_color.clone()),
            ("secondary_color", self.secondary_color.clone()),
            ("likes", self.likes.to_string()),
            ("views", self.views.to_string()),
        ]
    }
}
