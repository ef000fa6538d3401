//! Request validation.
//!
//! Identifier parsing and payload validation run before any store access, so
//! a bad request never costs a connection. Payloads are validated from raw
//! JSON into a typed [`ItemDraft`]; untyped maps never reach the repository.

use crate::error::{ApiError, ApiResult};
use serde_json::Value;

/// Parse a raw path segment into a positive item id.
///
/// Valid only if the whole segment parses as a base-10 integer greater than
/// zero. Anything else (non-numeric, zero, negative, empty, embedded
/// whitespace) is an [`ApiError::InvalidIdentifier`], which the handler layer
/// reports distinctly from not-found.
pub fn parse_item_id(raw: &str) -> ApiResult<i64> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::invalid_identifier(raw)),
    }
}

/// A validated create/update payload.
///
/// `name` arrives trimmed and non-empty. `description` passes through exactly
/// as sent: it is not trimmed or bounded, and an absent field is equivalent
/// to an explicit null (both persist SQL NULL).
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    pub name: String,
    pub description: Option<String>,
}

impl ItemDraft {
    /// Validate a raw JSON body into a draft.
    pub fn from_json(body: &Value) -> ApiResult<Self> {
        let name = match body.get("name") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            _ => return Err(ApiError::invalid_payload("name is required")),
        };

        let description = match body.get("description") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                return Err(ApiError::invalid_payload(
                    "description must be string or null",
                ));
            }
        };

        Ok(Self { name, description })
    }
}
