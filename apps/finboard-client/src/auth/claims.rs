// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access token claims and the unverified payload decoder.
//!
//! The identity service issues JWT-shaped bearer tokens. The client only ever
//! needs to *read* them (identity bookkeeping and local expiry checks), so the
//! decoder here never looks at the signature. The resource backend re-validates
//! every token it receives; nothing in this module is a trust boundary.

use base64ct::{Base64Unpadded, Encoding};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::scalar_string;

/// Claims embedded in an access token payload.
///
/// Every field is optional and read leniently: a claim that is missing or has
/// an unexpected JSON type becomes `None` without failing the other claims. A
/// token that lacks a usable `exp` is treated as expired by the session
/// guard, and a token without a tenant claim is rejected at login time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account identifier issued by the identity service.
    #[serde(default, deserialize_with = "identifier")]
    pub user_id: Option<String>,

    /// Standard subject claim, used when `user_id` is absent.
    #[serde(default, deserialize_with = "identifier")]
    pub sub: Option<String>,

    /// Tenant the account belongs to. A list of tenants yields the first one.
    #[serde(default, rename = "client_ids", deserialize_with = "first_identifier")]
    pub client_id: Option<String>,

    /// Issued at (Unix seconds)
    #[serde(default, deserialize_with = "timestamp")]
    pub iat: Option<i64>,

    /// Expiration (Unix seconds)
    #[serde(default, deserialize_with = "expiry")]
    pub exp: Option<i64>,
}

/// String or number, rendered as a string.
fn identifier<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(scalar_string(&Value::deserialize(deserializer)?))
}

/// Like [`identifier`], but an array contributes its first element.
fn first_identifier<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.first().and_then(scalar_string),
        other => scalar_string(&other),
    })
}

/// Integer or fractional seconds, floored.
fn timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(seconds(Value::deserialize(deserializer)?, f64::floor))
}

/// Integer or fractional seconds, rounded up: `exp > now` for a whole-second
/// `now` holds exactly when `ceil(exp) > now`.
fn expiry<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(seconds(Value::deserialize(deserializer)?, f64::ceil))
}

fn seconds(value: Value, round: fn(f64) -> f64) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| round(f) as i64)),
        _ => None,
    }
}

impl Claims {
    /// The account identifier, preferring the custom `user_id` claim over `sub`.
    pub fn subject(&self) -> Option<&str> {
        self.user_id.as_deref().or(self.sub.as_deref())
    }

    /// Whether the token is still live at `now` (Unix seconds).
    ///
    /// Strict comparison: a token whose `exp` equals `now` is already expired.
    pub fn is_live_at(&self, now: i64) -> bool {
        matches!(self.exp, Some(exp) if exp > now)
    }
}

/// Why a token payload could not be read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("token does not have three dot-separated segments")]
    MissingSegment,

    #[error("token payload is not valid base64")]
    InvalidEncoding,

    #[error("token payload is not valid UTF-8")]
    InvalidUtf8,

    #[error("token payload is not a JSON object: {0}")]
    InvalidJson(String),
}

/// Decode the claims segment of a token without verifying its signature.
///
/// Callers that only care about "can identity be established" should use
/// `decode_token(token).ok()`.
pub fn decode_token(token: &str) -> Result<Claims, DecodeError> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return Err(DecodeError::MissingSegment),
    };

    let bytes = decode_segment(payload)?;
    let text = String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)?;

    let value: Value =
        serde_json::from_str(&text).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;
    if !value.is_object() {
        return Err(DecodeError::InvalidJson("payload is not an object".to_string()));
    }

    serde_json::from_value(value).map_err(|e| DecodeError::InvalidJson(e.to_string()))
}

/// Translate the URL-safe alphabet to the standard one and decode.
///
/// Padding is optional on input; both alphabets are accepted.
fn decode_segment(segment: &str) -> Result<Vec<u8>, DecodeError> {
    let standard: String = segment
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    if standard.is_empty() {
        return Err(DecodeError::InvalidEncoding);
    }

    Base64Unpadded::decode_vec(&standard).map_err(|_| DecodeError::InvalidEncoding)
}
