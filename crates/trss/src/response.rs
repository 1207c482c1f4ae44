//! Classification of raw response bodies.
//!
//! The server answers every action with untyped text: a bare value (a
//! token, `true`, a counter), a JSON record or list, or a JSON error object.
//! [`classify`] decides which, without knowing the action that produced it.

use serde_json::{Map, Value};

use crate::errors::ErrorCode;
use crate::SkinId;

/// A successful response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Not a JSON object or array; the body verbatim.
    Text(String),
    /// A JSON object or array.
    Json(Value),
}

/// Outcome of [`classify`].
#[derive(Debug, Clone, PartialEq)]
pub enum Classified {
    Success(Payload),
    /// `{"error_code": n}`.
    DomainFailure(ErrorCode),
    /// `{"error_code": 5, "id": n}`: the skin already exists as `id`.
    ConflictFailure { code: ErrorCode, id: SkinId },
}

/// Classifies a raw body.
///
/// Only a JSON *object* can be an error; arrays and scalars are always
/// successes. A scalar (`true`, `12`, `"x"`) is returned as the raw text so
/// callers see exactly what the server sent.
pub fn classify(raw: &str) -> Classified {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(object)) => classify_object(object),
        Ok(array @ Value::Array(_)) => Classified::Success(Payload::Json(array)),
        Ok(_) | Err(_) => Classified::Success(Payload::Text(raw.to_owned())),
    }
}

fn classify_object(object: Map<String, Value>) -> Classified {
    let Some(raw_code) = object.get("error_code") else {
        return Classified::Success(Payload::Json(Value::Object(object)));
    };

    let code = json_integer(raw_code)
        .map(ErrorCode::from_wire)
        .unwrap_or(ErrorCode::Unknown);

    let conflicting_id = object
        .get("id")
        .and_then(json_integer)
        .and_then(|id| u64::try_from(id).ok());

    match (code, conflicting_id) {
        (ErrorCode::DuplicateSkin, Some(id)) => Classified::ConflictFailure {
            code,
            id: SkinId::new(id),
        },
        _ => Classified::DomainFailure(code),
    }
}

/// Reads an integer that may have been sent as a JSON number or as a
/// numeric string.
fn json_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
