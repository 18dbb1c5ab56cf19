use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::AppError;

/// Kind of resource a "likes" notification points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeableType {
    Post,
    Activity,
    /// Any resource this client does not know about.
    #[serde(other)]
    Other,
}

/// Push notification payload as produced by the backend.
///
/// Field names are part of the wire contract and must not be renamed.
/// Push data maps are stringified in transit, so every field is coerced
/// leniently: numbers may arrive as strings (or whole floats), and a value
/// that cannot be coerced becomes `None` instead of rejecting the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    #[serde(rename = "type", default, deserialize_with = "lenient_kind")]
    pub kind: String,

    #[serde(default, deserialize_with = "lenient_text")]
    pub url: Option<String>,

    #[serde(default, deserialize_with = "lenient_i64")]
    pub actor_id: Option<i64>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub actor_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub actor_username: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub actor_avatar: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub timestamp: Option<String>,

    #[serde(default, deserialize_with = "lenient_likeable_type")]
    pub likeable_type: Option<LikeableType>,

    #[serde(default, deserialize_with = "lenient_i64")]
    pub likeable_id: Option<i64>,
}

impl NotificationPayload {
    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Builds a payload from a flat, fully stringified push data map.
    pub fn from_data(data: &HashMap<String, String>) -> Result<Self, AppError> {
        let object = data
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect::<serde_json::Map<_, _>>();

        Ok(serde_json::from_value(Value::Object(object))?)
    }

    /// `url`, treating an empty or whitespace-only string as absent.
    pub fn deep_link(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn parsed_timestamp(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        let raw = self.timestamp.as_deref()?;
        chrono::DateTime::parse_from_rfc3339(raw.trim())
            .ok()
            .map(|ts| ts.with_timezone(&chrono::Utc))
    }
}

fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>().ok().or_else(|| {
                text.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            })
        }
        _ => None,
    }
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(ref text)) if text.trim().is_empty() => Ok(None),
        Some(value) => {
            let coerced = coerce_i64(&value);
            if coerced.is_none() {
                tracing::warn!(%value, "Ignoring non-numeric notification field");
            }
            Ok(coerced)
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => {
            tracing::warn!(value = %other, "Ignoring non-text notification field");
            None
        }
    })
}

fn lenient_kind<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

fn lenient_likeable_type<'de, D>(deserializer: D) -> Result<Option<LikeableType>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = lenient_text(deserializer)? else {
        return Ok(None);
    };

    let kind = match raw.trim().to_ascii_lowercase().as_str() {
        "" => return Ok(None),
        "post" => LikeableType::Post,
        "activity" => LikeableType::Activity,
        other => {
            tracing::warn!(likeable_type = other, "Unknown likeable_type in notification");
            LikeableType::Other
        }
    };
    Ok(Some(kind))
}
