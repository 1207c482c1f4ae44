//! Error taxonomy and retry hints for the TRSS client.
//!
//! [`ClientError`] is the single error type returned by every
//! [`crate::TrssClient`] operation. Component-level errors (wire-format
//! failures, transport failures) are defined in their respective modules and
//! converted into it with `?`.
//!
//! [`RetryPolicy`] is advisory: the client never retries on its own, but any
//! error can tell the caller whether a retry makes sense.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::skin::DecodeError;
use crate::transport::TransportError;
use crate::{Action, SkinId};

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is safe to retry and, if so, after what delay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried.
    Retryable {
        /// Minimum back-off before the next attempt, when the server sent
        /// one. `None` means apply the caller's own schedule.
        after: Option<Duration>,
    },
    /// Retrying would produce the same failure.
    NonRetryable,
}

// ---------------------------------------------------------------------------
// Server error codes
// ---------------------------------------------------------------------------

/// Error codes reported by the TRSS server in `{"error_code": n}` bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum ErrorCode {
    Unknown,
    InvalidCredentials,
    UserNotFoundUpstream,
    TokenGenerationFailed,
    AlreadyRegistered,
    UserOrSkinNotFound,
    DuplicateSkin,
    SkinNotFound,
    AuthorMismatch,
    IncorrectValue,
}

impl ErrorCode {
    /// Every code, in wire order.
    pub const ALL: [ErrorCode; 10] = [
        ErrorCode::Unknown,
        ErrorCode::InvalidCredentials,
        ErrorCode::UserNotFoundUpstream,
        ErrorCode::TokenGenerationFailed,
        ErrorCode::AlreadyRegistered,
        ErrorCode::UserOrSkinNotFound,
        ErrorCode::DuplicateSkin,
        ErrorCode::SkinNotFound,
        ErrorCode::AuthorMismatch,
        ErrorCode::IncorrectValue,
    ];

    /// Maps a wire code to its variant. Codes outside the table map to
    /// [`ErrorCode::Unknown`].
    pub fn from_wire(code: i64) -> Self {
        Self::try_from(code).unwrap_or(ErrorCode::Unknown)
    }

    /// The integer sent by the server.
    pub fn code(self) -> i64 {
        match self {
            ErrorCode::Unknown => -1,
            ErrorCode::InvalidCredentials => 0,
            ErrorCode::UserNotFoundUpstream => 1,
            ErrorCode::TokenGenerationFailed => 2,
            ErrorCode::AlreadyRegistered => 3,
            ErrorCode::UserOrSkinNotFound => 4,
            ErrorCode::DuplicateSkin => 5,
            ErrorCode::SkinNotFound => 6,
            ErrorCode::AuthorMismatch => 7,
            ErrorCode::IncorrectValue => 8,
        }
    }

    /// Human-readable message for this code.
    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::Unknown => "Unknown error",
            ErrorCode::InvalidCredentials => "Invalid user or password",
            ErrorCode::UserNotFoundUpstream => {
                "The user could not be found in the Team Run database"
            }
            ErrorCode::TokenGenerationFailed => "Failed to generate unique token",
            ErrorCode::AlreadyRegistered => "User already registered",
            ErrorCode::UserOrSkinNotFound => "User or skin not found",
            ErrorCode::DuplicateSkin => {
                "Exactly the same skin from the same author is already in the database"
            }
            ErrorCode::SkinNotFound => "Skin not found",
            ErrorCode::AuthorMismatch => "Skin creator ID does not match user ID",
            ErrorCode::IncorrectValue => "Incorrect value",
        }
    }
}

impl TryFrom<i64> for ErrorCode {
    type Error = i64;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        ErrorCode::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or(code)
    }
}

impl From<ErrorCode> for i64 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message(), self.code())
    }
}

// ---------------------------------------------------------------------------
// Local validation
// ---------------------------------------------------------------------------

/// A caller-supplied argument was rejected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid `{field}`: {reason}")]
pub struct ValidationError {
    /// Name of the offending parameter.
    pub field: &'static str,
    /// What was wrong with it.
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Client-level errors
// ---------------------------------------------------------------------------

/// Every way a [`crate::TrssClient`] operation can fail.
#[derive(Debug, Error)]
pub enum ClientError {
    /// An argument failed local validation; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A skin in wire form could not be decoded.
    #[error("malformed skin: {0}")]
    Decode(#[from] DecodeError),

    /// The server answered with `{"error_code": n}`.
    #[error("server rejected `{action}`: {code}")]
    Domain {
        /// The action that was rejected.
        action: Action,
        /// The reported error code.
        code: ErrorCode,
    },

    /// `upload_skin` found the same skin from the same author already stored.
    #[error("{}: existing skin {id}", ErrorCode::DuplicateSkin.message())]
    Conflict {
        /// Id of the already stored skin.
        id: SkinId,
    },

    /// The request never produced a response body.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered successfully with a body of the wrong shape.
    #[error("unexpected response to `{action}`: {reason}")]
    UnexpectedResponse {
        /// The action whose response could not be interpreted.
        action: Action,
        /// What was wrong with the body.
        reason: String,
    },
}

impl ClientError {
    /// The server error code, for [`ClientError::Domain`] and
    /// [`ClientError::Conflict`].
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            ClientError::Domain { code, .. } => Some(*code),
            ClientError::Conflict { .. } => Some(ErrorCode::DuplicateSkin),
            _ => None,
        }
    }

    /// Whether the failed operation may succeed if issued again.
    ///
    /// Only transport-level failures are ever retryable; domain, validation
    /// and decode failures are deterministic.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            ClientError::Transport(e) => e.retry_policy(),
            _ => RetryPolicy::NonRetryable,
        }
    }
}
