//! The action catalogue: every server-side action and the endpoint it lives on.

use serde::{Deserialize, Serialize};

/// One of the two server endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Users,
    Skins,
}

/// A server-side action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Login,
    GetUserById,
    GetUserByToken,
    ChangeSkin,
    ToggleLike,
    RegisterView,
    GetLike,
    UploadSkin,
    RemoveSkin,
    GetSkinById,
    GetSkinsById,
    GetRecentSkins,
    GetSkinsByAuthorId,
    GetSkinsByLikes,
    GetSkinsByViews,
    GetLikes,
    GetViews,
}

impl Action {
    /// The complete catalogue.
    pub const ALL: [Action; 17] = [
        Action::Login,
        Action::GetUserById,
        Action::GetUserByToken,
        Action::ChangeSkin,
        Action::ToggleLike,
        Action::RegisterView,
        Action::GetLike,
        Action::UploadSkin,
        Action::RemoveSkin,
        Action::GetSkinById,
        Action::GetSkinsById,
        Action::GetRecentSkins,
        Action::GetSkinsByAuthorId,
        Action::GetSkinsByLikes,
        Action::GetSkinsByViews,
        Action::GetLikes,
        Action::GetViews,
    ];

    /// The value of the `action` form field.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Login => "login",
            Action::GetUserById => "get_user_by_id",
            Action::GetUserByToken => "get_user_by_token",
            Action::ChangeSkin => "change_skin",
            Action::ToggleLike => "toggle_like",
            Action::RegisterView => "register_view",
            Action::GetLike => "get_like",
            Action::UploadSkin => "upload_skin",
            Action::RemoveSkin => "remove_skin",
            Action::GetSkinById => "get_skin_by_id",
            Action::GetSkinsById => "get_skins_by_id",
            Action::GetRecentSkins => "get_recent_skins",
            Action::GetSkinsByAuthorId => "get_skins_by_author_id",
            Action::GetSkinsByLikes => "get_skins_by_likes",
            Action::GetSkinsByViews => "get_skins_by_views",
            Action::GetLikes => "get_likes",
            Action::GetViews => "get_views",
        }
    }

    pub fn endpoint(self) -> Endpoint {
        match self {
            Action::Login
            | Action::GetUserById
            | Action::GetUserByToken
            | Action::ChangeSkin
            | Action::ToggleLike
            | Action::RegisterView
            | Action::GetLike => Endpoint::Users,
            _ => Endpoint::Skins,
        }
    }

    /// Whether a `{"error_code": 5, "id": n}` body from this action names a
    /// conflicting skin. Only uploads do.
    pub fn reports_conflicts(self) -> bool {
        self == Action::UploadSkin
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("unknown action {s:?}"))
    }
}
