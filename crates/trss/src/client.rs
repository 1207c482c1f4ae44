//! The action client.
//!
//! [`TrssClient`] turns each server action into a typed async method:
//! validate arguments, build the [`FormRequest`], send it through the
//! [`Transport`], [`classify`] the body and decode the payload.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::color::{ColorNormalizer, CssColorNormalizer};
use crate::config::ApiConfig;
use crate::errors::{ClientError, ValidationError};
use crate::response::{classify, Classified, Payload};
use crate::skin::EncodedSkin;
use crate::transport::{FormRequest, Transport, TransportError};
use crate::types::{ChangedSkin, SkinInfo, UserInfo, UserInfoByToken};
use crate::{Action, SkinId, SkinName, Token, UserId};

/// Async client for the TRSS users and skins endpoints.
pub struct TrssClient<T> {
    transport: T,
    config: ApiConfig,
    colors: Arc<dyn ColorNormalizer>,
}

impl<T: Transport> TrssClient<T> {
    pub fn new(transport: T, config: ApiConfig) -> Self {
        Self {
            transport,
            config,
            colors: Arc::new(CssColorNormalizer),
        }
    }

    /// Replaces the colour normaliser used for `primary_color` /
    /// `secondary_color` arguments.
    pub fn with_color_normalizer(mut self, colors: Arc<dyn ColorNormalizer>) -> Self {
        self.colors = colors;
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // -----------------------------------------------------------------------
    // users endpoint
    // -----------------------------------------------------------------------

    /// Exchanges credentials for a session token.
    pub async fn login(&self, login: &str, password: &str) -> Result<Token, ClientError> {
        let login = non_empty("login", login)?;
        let request = self
            .request(Action::Login)
            .param("login", login)
            .param("password", password);
        let text = self.call_text(Action::Login, request).await?;
        Token::new(text.trim()).ok_or_else(|| unexpected(Action::Login, "empty token"))
    }

    pub async fn get_user_by_id(&self, id: UserId) -> Result<UserInfo, ClientError> {
        let request = self.request(Action::GetUserById).param("id", id);
        self.call_json(Action::GetUserById, request).await
    }

    pub async fn get_user_by_token(&self, token: &Token) -> Result<UserInfoByToken, ClientError> {
        let request = self.request(Action::GetUserByToken).param("token", token);
        self.call_json(Action::GetUserByToken, request).await
    }

    /// Sets the skin and profile colours of the token's owner.
    ///
    /// `skin` is anything that reads as a wire string, typically an
    /// [`EncodedSkin`]; it is checked before the request is sent.
    pub async fn change_skin(
        &self,
        token: &Token,
        skin: impl AsRef<str>,
        primary_color: &str,
        secondary_color: &str,
    ) -> Result<ChangedSkin, ClientError> {
        let skin = EncodedSkin::parse(skin.as_ref())?;
        let primary = self.color("primary_color", primary_color)?;
        let secondary = self.color("secondary_color", secondary_color)?;
        let request = self
            .request(Action::ChangeSkin)
            .param("token", token)
            .param("skin", &skin)
            .param("primary_color", primary)
            .param("secondary_color", secondary);
        self.call_json(Action::ChangeSkin, request).await
    }

    /// Likes or un-likes a skin; returns the server's answer.
    pub async fn toggle_like(&self, token: &Token, skin_id: SkinId) -> Result<bool, ClientError> {
        let request = self
            .request(Action::ToggleLike)
            .param("token", token)
            .param("skin_id", skin_id);
        self.call_flag(Action::ToggleLike, request).await
    }

    pub async fn register_view(&self, token: &Token, skin_id: SkinId) -> Result<bool, ClientError> {
        let request = self
            .request(Action::RegisterView)
            .param("token", token)
            .param("skin_id", skin_id);
        self.call_flag(Action::RegisterView, request).await
    }

    /// Whether `user_id` has liked `skin_id`.
    pub async fn get_like(&self, user_id: UserId, skin_id: SkinId) -> Result<bool, ClientError> {
        let request = self
            .request(Action::GetLike)
            .param("user_id", user_id)
            .param("skin_id", skin_id);
        self.call_flag(Action::GetLike, request).await
    }

    // -----------------------------------------------------------------------
    // skins endpoint
    // -----------------------------------------------------------------------

    /// Publishes a skin. A duplicate of one of the author's existing skins
    /// fails with [`ClientError::Conflict`] naming the existing skin. An
    /// invalid `skin` fails with [`ClientError::Validation`] and sends nothing.
    pub async fn upload_skin(
        &self,
        token: &Token,
        skin: impl AsRef<str>,
        skin_name: &SkinName,
        primary_color: &str,
        secondary_color: &str,
    ) -> Result<bool, ClientError> {
        let skin = EncodedSkin::parse(skin.as_ref())?;
        let primary = self.color("primary_color", primary_color)?;
        let secondary = self.color("secondary_color", secondary_color)?;
        let request = self
            .request(Action::UploadSkin)
            .param("token", token)
            .param("skin", &skin)
            .param("skin_name", skin_name)
            .param("primary_color", primary)
            .param("secondary_color", secondary);
        self.call_flag(Action::UploadSkin, request).await
    }

    pub async fn remove_skin(&self, token: &Token, skin_id: SkinId) -> Result<bool, ClientError> {
        let request = self
            .request(Action::RemoveSkin)
            .param("token", token)
            .param("skin_id", skin_id);
        self.call_flag(Action::RemoveSkin, request).await
    }

    pub async fn get_skin_by_id(&self, skin_id: SkinId) -> Result<SkinInfo, ClientError> {
        let request = self.request(Action::GetSkinById).param("skin_id", skin_id);
        self.call_json(Action::GetSkinById, request).await
    }

    pub async fn get_skins_by_id(&self, from_id: SkinId, amount: u32) -> Result<Vec<SkinInfo>, ClientError> {
        self.list(Action::GetSkinsById, from_id, amount).await
    }

    pub async fn get_recent_skins(&self, from_id: SkinId, amount: u32) -> Result<Vec<SkinInfo>, ClientError> {
        self.list(Action::GetRecentSkins, from_id, amount).await
    }

    pub async fn get_skins_by_author_id(
        &self,
        author_id: UserId,
        from_id: SkinId,
        amount: u32,
    ) -> Result<Vec<SkinInfo>, ClientError> {
        let request = self
            .request(Action::GetSkinsByAuthorId)
            .param("author_id", author_id)
            .param("from_id", from_id)
            .param("amount", amount);
        self.call_json(Action::GetSkinsByAuthorId, request).await
    }

    pub async fn get_skins_by_likes(&self, from_id: SkinId, amount: u32) -> Result<Vec<SkinInfo>, ClientError> {
        self.list(Action::GetSkinsByLikes, from_id, amount).await
    }

    pub async fn get_skins_by_views(&self, from_id: SkinId, amount: u32) -> Result<Vec<SkinInfo>, ClientError> {
        self.list(Action::GetSkinsByViews, from_id, amount).await
    }

    /// Number of likes on a skin.
    pub async fn get_likes(&self, skin_id: SkinId) -> Result<u64, ClientError> {
        let request = self.request(Action::GetLikes).param("skin_id", skin_id);
        self.call_count(Action::GetLikes, request).await
    }

    /// Number of registered views of a skin.
    pub async fn get_views(&self, skin_id: SkinId) -> Result<u64, ClientError> {
        let request = self.request(Action::GetViews).param("skin_id", skin_id);
        self.call_count(Action::GetViews, request).await
    }

    /// Sends an arbitrary action and returns the unclassified body.
    ///
    /// Nothing is validated: the server sees exactly what is passed.
    pub async fn send_raw(&self, request: &FormRequest) -> Result<String, TransportError> {
        self.transport.send(request).await
    }

    // -----------------------------------------------------------------------
    // plumbing
    // -----------------------------------------------------------------------

    fn request(&self, action: Action) -> FormRequest {
        FormRequest::new(self.config.endpoints.url(action.endpoint()), action.as_str())
    }

    fn color(&self, field: &'static str, input: &str) -> Result<String, ValidationError> {
        self.colors
            .normalize(input)
            .ok_or_else(|| ValidationError::new(field, format!("{input:?} is not a colour")))
    }

    async fn list(&self, action: Action, from_id: SkinId, amount: u32) -> Result<Vec<SkinInfo>, ClientError> {
        let request = self
            .request(action)
            .param("from_id", from_id)
            .param("amount", amount);
        self.call_json(action, request).await
    }

    /// Sends the request and maps the classified body to a payload or error.
    #[instrument(level = "debug", skip_all, fields(action = %action, endpoint = ?action.endpoint()))]
    async fn call(&self, action: Action, request: FormRequest) -> Result<Payload, ClientError> {
        debug!(url = %request.url, "sending");
        let body = self.transport.send(&request).await?;
        match classify(&body) {
            Classified::Success(payload) => {
                debug!(json = matches!(payload, Payload::Json(_)), "success");
                Ok(payload)
            }
            Classified::ConflictFailure { id, .. } if action.reports_conflicts() => {
                debug!(%id, "conflict");
                Err(ClientError::Conflict { id })
            }
            Classified::ConflictFailure { code, .. } | Classified::DomainFailure(code) => {
                debug!(code = code.code(), "domain failure");
                Err(ClientError::Domain { action, code })
            }
        }
    }

    async fn call_json<R: DeserializeOwned>(&self, action: Action, request: FormRequest) -> Result<R, ClientError> {
        match self.call(action, request).await? {
            Payload::Json(value) => {
                serde_json::from_value(value).map_err(|e| unexpected(action, e.to_string()))
            }
            Payload::Text(text) => Err(unexpected(action, format!("expected JSON, got {text:?}"))),
        }
    }

    async fn call_text(&self, action: Action, request: FormRequest) -> Result<String, ClientError> {
        match self.call(action, request).await? {
            Payload::Text(text) => Ok(text),
            Payload::Json(value) => Err(unexpected(action, format!("expected text, got {value}"))),
        }
    }

    async fn call_flag(&self, action: Action, request: FormRequest) -> Result<bool, ClientError> {
        let text = self.call_text(action, request).await?;
        parse_flag(&text).ok_or_else(|| unexpected(action, format!("expected a boolean, got {text:?}")))
    }

    async fn call_count(&self, action: Action, request: FormRequest) -> Result<u64, ClientError> {
        let text = self.call_text(action, request).await?;
        let trimmed = text.trim().trim_matches('"');
        trimmed
            .parse()
            .map_err(|_| unexpected(action, format!("expected a count, got {text:?}")))
    }
}

impl<T> std::fmt::Debug for TrssClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrssClient").field("config", &self.config).finish_non_exhaustive()
    }
}

/// `true`/`1` and `false`/`0`, as PHP may print either.
fn parse_flag(text: &str) -> Option<bool> {
    match text.trim().trim_matches('"') {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn non_empty<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    if value.is_empty() {
        Err(ValidationError::new(field, "must not be empty"))
    } else {
        Ok(value)
    }
}

fn unexpected(action: Action, reason: impl Into<String>) -> ClientError {
    ClientError::UnexpectedResponse {
        action,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_php_spellings() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" 1\n"), Some(true));
        assert_eq!(parse_flag("false"), Some(false));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("\"true\""), Some(true));
        assert_eq!(parse_flag("yes"), None);
        assert_eq!(parse_flag(""), None);
    }

    #[test]
    fn empty_arguments_are_rejected() {
        assert!(non_empty("login", "").is_err());
        assert_eq!(non_empty("login", "bob"), Ok("bob"));
    }
}
