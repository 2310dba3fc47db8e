//! Stored rule JSON <-> canonical [`RuleSet`].
//!
//! Rules written by this crate use the canonical camelCase shape
//! (`countries`, `companyIds`, `driverIds`, `vehicleIds`). Older records may
//! use singular or snake_case keys, hold JSON-encoded strings instead of
//! arrays, or mix numbers and strings for identifiers. All of that is
//! absorbed here so the evaluation engine only ever sees a `RuleSet`.

use releasegate_core::rules::RuleSet;
use serde_json::{json, Map, Value};

const COUNTRY_KEYS: &[&str] = &["countries", "country"];
const COMPANY_KEYS: &[&str] = &["companyIds", "companyId", "company_ids", "company_id"];
const DRIVER_KEYS: &[&str] = &["driverIds", "driverId", "driver_ids", "driver_id"];
const VEHICLE_KEYS: &[&str] = &["vehicleIds", "vehicleId", "vehicle_ids", "vehicle_id"];

/// Decode a stored rules value into a normalized [`RuleSet`].
///
/// Anything that is not an object (after unwrapping a JSON-encoded string)
/// decodes to an unrestricted rule set.
pub fn rules_from_json(value: &Value) -> RuleSet {
    let decoded = decode_embedded(value);
    let Some(object) = decoded.as_object() else {
        if !decoded.is_null() {
            tracing::warn!(rules = %decoded, "Stored rules are not an object, ignoring");
        }
        return RuleSet::default();
    };

    RuleSet {
        countries: values_under(object, COUNTRY_KEYS).filter_map(as_text).collect(),
        company_ids: values_under(object, COMPANY_KEYS)
            .filter_map(|item| {
                let parsed = as_integer(&item);
                if parsed.is_none() {
                    tracing::warn!(
                        value = %item,
                        "Dropping unparseable company id from stored rules"
                    );
                }
                parsed
            })
            .collect(),
        driver_ids: values_under(object, DRIVER_KEYS).filter_map(as_text).collect(),
        vehicle_ids: values_under(object, VEHICLE_KEYS).filter_map(as_text).collect(),
    }
    .normalized()
}

/// Encode a [`RuleSet`] in the canonical stored shape.
pub fn rules_to_json(rules: &RuleSet) -> Value {
    json!({
        "countries": rules.countries,
        "companyIds": rules.company_ids,
        "driverIds": rules.driver_ids,
        "vehicleIds": rules.vehicle_ids
    })
}

/// If `value` is a string holding a JSON array or object, return the parsed
/// JSON. Plain strings are left alone so identifiers never get reinterpreted
/// as numbers.
fn decode_embedded(value: &Value) -> Value {
    match value {
        Value::String(text) if looks_like_container(text) => {
            serde_json::from_str(text).unwrap_or_else(|_| value.clone())
        }
        other => other.clone(),
    }
}

fn looks_like_container(text: &str) -> bool {
    let trimmed = text.trim_start();
    trimmed.starts_with('[') || trimmed.starts_with('{')
}

/// Every scalar found under any of `keys`, flattening arrays.
fn values_under<'a>(
    object: &'a Map<String, Value>,
    keys: &'static [&'static str],
) -> impl Iterator<Item = Value> + 'a {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .flat_map(|value| match decode_embedded(value) {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            scalar => vec![scalar],
        })
}

fn as_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
