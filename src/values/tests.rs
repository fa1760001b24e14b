// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use serde_json::json;

use super::*;

fn values(v: Value) -> FormValues {
    FormValues::try_from(v).unwrap()
}

#[test]
fn test_get_and_set_nested_paths() {
    let mut v = values(json!({
        "fwhm": "0.15",
        "redleakThresholds": {"uv": "3010", "u": "4160"},
        "geocoronalEmission": [{"flux": "Average", "id": "1"}],
    }));
    assert_eq!(v.get_str("fwhm"), Some("0.15"));
    assert_eq!(v.get_str("redleakThresholds.u"), Some("4160"));
    assert_eq!(v.get_str("geocoronalEmission.0.flux"), Some("Average"));
    assert!(v.get("geocoronalEmission.1.flux").is_none());
    assert!(v.get("nope").is_none());

    v.set("redleakThresholds.u", json!("4200")).unwrap();
    v.set("geocoronalEmission.0.flux", json!("High")).unwrap();
    assert_eq!(v.get_str("redleakThresholds.u"), Some("4200"));
    assert_eq!(v.get_str("geocoronalEmission.0.flux"), Some("High"));
}

#[test]
fn test_set_rejects_unknown_fields() {
    let mut v = values(json!({"fwhm": "0.15", "lines": [{"a": "1"}]}));
    assert!(matches!(
        v.set("fwhmm", json!("1")),
        Err(ValuesError::InvalidPath(_))
    ));
    assert!(matches!(
        v.set("fwhm.inner", json!("1")),
        Err(ValuesError::InvalidPath(_))
    ));
    assert!(matches!(
        v.set("lines.3.a", json!("1")),
        Err(ValuesError::IndexOutOfRange { index: 3, len: 1, .. })
    ));
    assert!(matches!(v.set("", json!("1")), Err(ValuesError::InvalidPath(_))));
    // Nothing was modified.
    assert_eq!(v, values(json!({"fwhm": "0.15", "lines": [{"a": "1"}]})));
}

#[test]
fn test_push_and_remove_rows() {
    let mut v = values(json!({"lines": [{"a": "1"}], "fwhm": "1"}));
    assert_eq!(v.push("lines", json!({"a": "2"})).unwrap(), 1);
    assert_eq!(v.get_str("lines.1.a"), Some("2"));
    assert_eq!(v.remove("lines", 0).unwrap(), json!({"a": "1"}));
    assert_eq!(v.get_str("lines.0.a"), Some("2"));
    assert!(matches!(
        v.remove("lines", 5),
        Err(ValuesError::IndexOutOfRange { .. })
    ));
    assert!(matches!(
        v.push("fwhm", json!({})),
        Err(ValuesError::NotAnArray(_))
    ));
}

#[test]
fn test_equality_is_deep_and_order_insensitive() {
    let a = values(json!({"a": "1", "b": {"c": "2", "d": "3"}}));
    let b = values(json!({"b": {"d": "3", "c": "2"}, "a": "1"}));
    assert_eq!(a, b);

    let mut c = b.clone();
    c.set("b.c", json!("2.0")).unwrap();
    assert_ne!(a, c);
    c.set("b.c", json!("2")).unwrap();
    assert_eq!(a, c);
}

#[test]
fn test_merge_overlays_nested_objects() {
    let mut base = values(json!({
        "slit": {"width": "0.214", "length": "1"},
        "lines": [{"a": "1"}, {"a": "2"}],
        "x": "1",
    }));
    let overlay = values(json!({
        "slit": {"width": "0.5"},
        "lines": [{"a": "9"}],
    }));
    base.merge(&overlay);
    assert_eq!(
        base,
        values(json!({
            "slit": {"width": "0.5", "length": "1"},
            "lines": [{"a": "9"}],
            "x": "1",
        }))
    );
}

#[test]
fn test_absent_values() {
    assert!(is_absent(None));
    assert!(is_absent(Some(&Value::Null)));
    assert!(is_absent(Some(&json!(""))));
    assert!(is_absent(Some(&json!("  "))));
    assert!(!is_absent(Some(&json!("0"))));
    assert!(!is_absent(Some(&json!(0))));
    assert!(!is_absent(Some(&json!(false))));
}

#[test]
fn test_coerce_input_follows_field_type() {
    assert_eq!(coerce_input(Some(&json!("0.15")), "0.2"), json!("0.2"));
    assert_eq!(coerce_input(Some(&json!(1000)), "1500"), json!(1500));
    assert_eq!(coerce_input(Some(&json!(7.06)), "7.1"), json!(7.1));
    assert_eq!(coerce_input(Some(&json!(false)), "true"), json!(true));
    assert_eq!(coerce_input(Some(&json!(1000)), "abc"), json!("abc"));
    assert_eq!(coerce_input(None, "x"), json!("x"));
}

#[test]
fn test_row_ids_are_numeric_strings() {
    let id = new_row_id();
    assert!(id.parse::<u128>().is_ok());
}

#[test]
fn test_serde_requires_an_object() {
    let v: FormValues = serde_json::from_str(r#"{"a": "1"}"#).unwrap();
    assert_eq!(v.get_str("a"), Some("1"));
    assert!(serde_json::from_str::<FormValues>("[1, 2]").is_err());
    assert_eq!(serde_json::to_value(&v).unwrap(), json!({"a": "1"}));
}
