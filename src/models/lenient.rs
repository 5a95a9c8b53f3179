//! Tolerant field decoders for collaborator payloads.
//!
//! Profile and solver records come from external systems that are not
//! validated by this service. Optional scalars that are missing, `null`,
//! blank, or of an unexpected JSON type decode to their default instead of
//! failing the whole payload.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use super::{RestBreach, ShiftAssignmentDay, StaffAnalytics};

/// Non-blank text; numbers and booleans are rendered to strings.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// A decimal given either as a JSON number or a numeric string.
pub(crate) fn decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(decimal_from_value))
}

pub(crate) fn decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(decimal(deserializer)?.unwrap_or(Decimal::ZERO))
}

/// A non-negative whole number given either as a JSON number or a string.
pub(crate) fn count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(count_from_value))
}

pub(crate) fn count_or_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(count(deserializer)?.unwrap_or(0))
}

/// A boolean that also accepts 0/1 and "true"/"false" (SQLite-backed stores
/// hand flags over as integers).
pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_i64().is_some_and(|v| v != 0),
        Some(Value::String(s)) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"),
        _ => false,
    })
}

/// A list of staff names; anything but an array is an empty list and
/// non-string entries are dropped.
pub(crate) fn names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(array(deserializer)?
        .into_iter()
        .filter_map(|entry| match entry {
            Value::String(name) => Some(name),
            _ => None,
        })
        .collect())
}

/// Turnaround breaches given as `[dayIndex, "N->D", ..]`. Trailing elements
/// are ignored and entries without a usable day and transition are dropped.
pub(crate) fn rest_breaches<'de, D>(deserializer: D) -> Result<Vec<RestBreach>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(array(deserializer)?
        .iter()
        .filter_map(|entry| match entry.as_array()?.as_slice() {
            [day, Value::String(transition), ..] => {
                Some(RestBreach(count_from_value(day)?, transition.clone()))
            }
            _ => None,
        })
        .collect())
}

/// Roster days. An entry that is not a day object becomes an empty day so
/// later days keep their index.
pub(crate) fn roster<'de, D>(deserializer: D) -> Result<Option<Vec<ShiftAssignmentDay>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(entries) = optional_array(deserializer)? else {
        return Ok(None);
    };
    Ok(Some(
        entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                ShiftAssignmentDay::deserialize(entry).unwrap_or_else(|error| {
                    warn!(index, error = %error, "Treating unreadable roster day as empty");
                    ShiftAssignmentDay::default()
                })
            })
            .collect(),
    ))
}

/// Analytics entries. Entries without a non-blank name cannot be joined to a
/// row and are dropped.
pub(crate) fn analytics<'de, D>(deserializer: D) -> Result<Option<Vec<StaffAnalytics>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(entries) = optional_array(deserializer)? else {
        return Ok(None);
    };
    Ok(Some(
        entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match StaffAnalytics::deserialize(entry) {
                Ok(analytics) if !analytics.name.trim().is_empty() => Some(analytics),
                Ok(_) => {
                    warn!(index, "Dropping analytics entry with a blank name");
                    None
                }
                Err(error) => {
                    warn!(index, error = %error, "Dropping unreadable analytics entry");
                    None
                }
            })
            .collect(),
    ))
}

pub(crate) fn default_true() -> bool {
    true
}

fn array<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_array(deserializer)?.unwrap_or_default())
}

fn optional_array<'de, D>(deserializer: D) -> Result<Option<Vec<Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(entries)) => Some(entries),
        _ => None,
    })
}

fn count_from_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        Value::Number(n) => {
            // Go through the shortest decimal rendering so 0.8 stays 0.8.
            let rendered = n.to_string();
            Decimal::from_str(&rendered)
                .or_else(|_| Decimal::from_scientific(&rendered))
                .ok()
        }
        _ => None,
    }
}
