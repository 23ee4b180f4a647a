//! Schema adapters.
//!
//! One module per upstream schema family, each mapping a raw payload into
//! canonical entities. Adapters substitute defaults for missing fields,
//! map placeholder sentinels (`"--"`) to 0, skip malformed records, and
//! return `AdapterError` only when the top-level shape is unrecognizable.

pub mod espn;
pub mod nba_stats;
pub mod reddit;
pub mod rss;
pub mod text;

use serde_json::Value;

use crate::types::AdapterError;
use crate::upstream::{Provider, RawPayload};

/// Markers providers use for "not recorded".
const SENTINELS: &[&str] = &["", "-", "--", "N/A", "DNP"];

/// JSON body of a payload, or `WrongFormat` for the given provider.
pub fn json_payload(provider: Provider, raw: &RawPayload) -> Result<&Value, AdapterError> {
    raw.as_json().ok_or(AdapterError::WrongFormat {
        provider: provider.name(),
        expected: "JSON",
    })
}

/// Non-negative integer stat. Missing, negative and sentinel values are 0.
pub fn stat_u32(value: &Value) -> u32 {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                u.min(u32::MAX as u64) as u32
            } else {
                n.as_f64().map(float_to_u32).unwrap_or(0)
            }
        }
        Value::String(s) => {
            let s = s.trim();
            if SENTINELS.iter().any(|m| m.eq_ignore_ascii_case(s)) {
                return 0;
            }
            s.parse::<u32>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(float_to_u32))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

fn float_to_u32(f: f64) -> u32 {
    if f.is_finite() && f > 0.0 {
        f.round().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

/// Text form of a cell; null and containers read as empty.
pub fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// String at a JSON pointer, empty when absent.
pub fn str_at(value: &Value, pointer: &str) -> String {
    value.pointer(pointer).map(text_of).unwrap_or_default()
}

/// Float that tolerates numeric strings and sentinels.
pub fn float_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_start_matches('+').parse::<f64>().ok(),
        _ => None,
    }
}
