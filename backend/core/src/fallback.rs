//! Fallback documents served when real extraction or analysis is unavailable.
//!
//! A fallback document is an untyped JSON object. The dynamic generator stamps
//! each document with a fresh request id and timestamp; the static source
//! replays one fixed document.

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use tracing::debug;
use uuid::Uuid;

/// Untyped mapping of field names to JSON values.
pub type FallbackData = Map<String, Value>;

/// Produces the document returned in place of a real result.
pub trait FallbackSource: Send + Sync {
    fn generate(&self) -> FallbackData;
}

/// Build a fresh fallback document.
pub fn generate_dynamic_fallback_data() -> FallbackData {
    let request_id = Uuid::new_v4().to_string();
    debug!(request_id = %request_id, "Generating fallback data");

    let mut data = Map::new();
    data.insert("status".into(), json!("fallback"));
    data.insert("source".into(), json!("fallback"));
    data.insert("service".into(), json!("poseidon"));
    data.insert("version".into(), json!(env!("CARGO_PKG_VERSION")));
    data.insert("request_id".into(), json!(request_id));
    data.insert(
        "generated_at".into(),
        json!(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    data.insert("text".into(), json!(""));
    data.insert("lines".into(), json!([]));
    data.insert("confidence".into(), json!(0.0));
    data.insert(
        "analysis".into(),
        json!({ "available": false, "summary": "analysis unavailable" }),
    );
    data
}

/// Default source: a new document per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicFallback;

impl FallbackSource for DynamicFallback {
    fn generate(&self) -> FallbackData {
        generate_dynamic_fallback_data()
    }
}

/// Replays the same document on every call.
#[derive(Debug, Clone, Default)]
pub struct StaticFallback {
    data: FallbackData,
}

impl StaticFallback {
    pub fn new(data: FallbackData) -> Self {
        Self { data }
    }

    /// Build from a JSON value. Non-object values are stored under `"value"`.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::new(map),
            other => {
                let mut map = Map::new();
                map.insert("value".into(), other);
                Self::new(map)
            }
        }
    }
}

impl FallbackSource for StaticFallback {
    fn generate(&self) -> FallbackData {
        self.data.clone()
    }
}
