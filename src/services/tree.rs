// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tolerant field accessors over a loosely-typed payload tree.
//!
//! Fantasy payloads arrive as XML converted to [`Value`], where every
//! scalar is a string. Stats payloads are plain JSON with native numbers.
//! Two accessor families cover them:
//!
//! - string-biased: [`get_string`], [`get_int`], [`get_float`], [`get_bool`]
//! - number-biased: [`num_f64`], [`num_int`]
//!
//! Neither family fails on a missing or mistyped field. They return
//! `""`, `0`, `0.0` or `false` instead. Use the `opt_*` accessors where
//! "absent" has to be told apart from "empty".

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::time_utils::zero_date;

/// Object child by key. `None` unless `node` is an object holding `key`.
pub fn child<'a>(node: &'a Value, key: &str) -> Option<&'a Value> {
    node.as_object().and_then(|map| map.get(key))
}

/// Follow a chain of object keys.
pub fn path<'a>(node: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(node, |current, key| child(current, key))
}

/// Elements of a repeatable element.
///
/// A repeated XML element decodes to an array, but a single occurrence
/// decodes to the bare element. Both yield the same list here; an absent
/// or null node yields nothing.
pub fn repeated<'a>(node: Option<&'a Value>) -> Vec<&'a Value> {
    match node {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter(|v| !v.is_null()).collect(),
        Some(single) => vec![single],
    }
}

/// Object elements of the repeatable element `key` under `container`.
pub fn repeated_objects<'a>(container: Option<&'a Value>, key: &str) -> Vec<&'a Value> {
    repeated(container.and_then(|c| child(c, key)))
        .into_iter()
        .filter(|v| v.is_object())
        .collect()
}

/// String field, or `None` when absent or not a string.
pub fn opt_str<'a>(node: &'a Value, key: &str) -> Option<&'a str> {
    child(node, key).and_then(Value::as_str)
}

// ─── String-biased family ────────────────────────────────────────────────────

/// String field; `""` when absent or not a string.
pub fn get_string(node: &Value, key: &str) -> String {
    opt_str(node, key).unwrap_or_default().to_string()
}

/// Integer from a decimal string (or native number); `0` otherwise.
pub fn get_int(node: &Value, key: &str) -> i64 {
    match child(node, key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or_default(),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    }
}

/// Float from a decimal string; `0.0` otherwise.
pub fn get_float(node: &Value, key: &str) -> f64 {
    opt_str(node, key)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or_default()
}

/// True iff the field is the string `"1"`.
pub fn get_bool(node: &Value, key: &str) -> bool {
    opt_str(node, key) == Some("1")
}

// ─── Number-biased family ────────────────────────────────────────────────────

/// Native number as `f64`; `0.0` otherwise.
pub fn num_f64(node: &Value, key: &str) -> f64 {
    child(node, key)
        .and_then(Value::as_f64)
        .unwrap_or_default()
}

/// Native number truncated to an integer; `0` otherwise.
pub fn num_int(node: &Value, key: &str) -> i64 {
    match child(node, key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or_default(),
        _ => 0,
    }
}

/// Localized name field (`{"default": "..."}`) used by the stats API.
pub fn default_name(node: &Value, key: &str) -> String {
    child(node, key)
        .map(|n| get_string(n, "default"))
        .unwrap_or_default()
}

// ─── Dates ───────────────────────────────────────────────────────────────────

/// Parse a `YYYY-MM-DD` date at midnight UTC.
pub fn parse_date_strict(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")?;
    Ok(date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc())
}

/// Lenient [`parse_date_strict`]: a bad date becomes the zero date.
pub fn parse_date(value: &str) -> DateTime<Utc> {
    match parse_date_strict(value) {
        Ok(date) => date,
        Err(e) => {
            if !value.is_empty() {
                tracing::warn!(value, error = %e, "Unparseable date, using zero date");
            }
            zero_date()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_bool_only_literal_one() {
        let node = json!({"a": "1", "b": "0", "c": "", "d": "true", "e": 1});
        assert!(get_bool(&node, "a"));
        for key in ["b", "c", "d", "e", "missing"] {
            assert!(!get_bool(&node, key), "{key} should be false");
        }
    }

    #[test]
    fn test_get_bool_recoercion_is_stable() {
        for raw in ["1", "0", "", "yes", "01"] {
            let first = get_bool(&json!({ "k": raw }), "k");
            let encoded = if first { "1" } else { "0" };
            assert_eq!(get_bool(&json!({ "k": encoded }), "k"), first);
        }
    }

    #[test]
    fn test_string_family_zero_values() {
        let node = json!({"n": {"x": "1"}, "i": "12", "f": "2.5", "bad": "x"});
        assert_eq!(get_string(&node, "n"), "");
        assert_eq!(get_string(&node, "missing"), "");
        assert_eq!(get_int(&node, "i"), 12);
        assert_eq!(get_int(&node, "bad"), 0);
        assert_eq!(get_float(&node, "f"), 2.5);
        assert_eq!(get_float(&node, "bad"), 0.0);
    }

    #[test]
    fn test_number_family_ignores_strings() {
        let node = json!({"id": 8478402.0, "goals": 3, "s": "4"});
        assert_eq!(num_int(&node, "id"), 8478402);
        assert_eq!(num_int(&node, "goals"), 3);
        assert_eq!(num_int(&node, "s"), 0);
        assert_eq!(num_f64(&node, "s"), 0.0);
    }

    #[test]
    fn test_repeated_single_and_many_agree() {
        let one = json!({"stat": {"stat_id": "1"}});
        let many = json!({"stat": [{"stat_id": "1"}]});
        let none = json!({});
        assert_eq!(
            repeated_objects(Some(&one), "stat"),
            repeated_objects(Some(&many), "stat")
        );
        assert!(repeated_objects(Some(&none), "stat").is_empty());
        assert!(repeated_objects(None, "stat").is_empty());
    }

    #[test]
    fn test_path() {
        let node = json!({"a": {"b": {"c": "d"}}});
        assert_eq!(path(&node, &["a", "b", "c"]), Some(&json!("d")));
        assert_eq!(path(&node, &["a", "x"]), None);
    }

    #[test]
    fn test_parse_date_degrades_silently() {
        let parsed = parse_date("2024-10-04");
        assert_eq!(parsed.to_rfc3339(), "2024-10-04T00:00:00+00:00");

        // Lenient path hides the failure, strict path reports it.
        assert_eq!(parse_date("10/04/2024"), zero_date());
        assert!(parse_date_strict("10/04/2024").is_err());
    }
}
