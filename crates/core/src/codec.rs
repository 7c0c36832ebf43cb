//! Two-way transformation between a persisted JSON blob and its editable
//! flat field set.
//!
//! Decoding never fails: malformed or non-object input is treated as an
//! empty document. Encoding is pure and total; every field's text goes
//! through [`infer`] and the worst case is a string.

use serde_json::{Map, Value};

use crate::field_set::{FlatFieldSet, OVERLAY_KEY, OVERLAY_PREFIX};
use crate::infer::infer;

/// Editable text for a single value: strings verbatim, everything else in
/// its canonical JSON rendering.
pub(crate) fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Decode a raw text payload into its editable flat field set.
///
/// Top-level keys become entries in document order. The reserved key
/// `overlays`, when it holds an object, is expanded in place: one entry per
/// child at `overlays.<key>`, no recursion below that level.
pub fn flatten(raw: &str) -> FlatFieldSet {
    let doc = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };

    let mut fields = FlatFieldSet::new();
    for (key, value) in &doc {
        if key == OVERLAY_KEY {
            if let Value::Object(children) = value {
                for (child, child_value) in children {
                    fields.push(
                        format!("{OVERLAY_PREFIX}{child}"),
                        display_text(child_value),
                    );
                }
                continue;
            }
        }
        fields.push(key.clone(), display_text(value));
    }
    fields
}

/// Re-encode an edited flat field set into JSON text for persistence.
///
/// Entries with the `overlays.` prefix are collected back under a single
/// `overlays` object, attached only when non-empty. Key order is insertion
/// order; non-ASCII text is emitted literally.
pub fn reconstruct(fields: &FlatFieldSet) -> String {
    let mut doc = Map::new();
    let mut overlays = Map::new();

    for entry in fields {
        let value = infer(&entry.text);
        match entry.path.strip_prefix(OVERLAY_PREFIX) {
            Some(child) => {
                overlays.insert(child.to_string(), value);
            }
            None => {
                doc.insert(entry.path.clone(), value);
            }
        }
    }

    if !overlays.is_empty() {
        doc.insert(OVERLAY_KEY.to_string(), Value::Object(overlays));
    }
    Value::Object(doc).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paths(fields: &FlatFieldSet) -> Vec<&str> {
        fields.paths().collect()
    }

    #[test]
    fn flatten_keeps_document_order() {
        let fields = flatten(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#);
        assert_eq!(paths(&fields), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn flatten_expands_overlays_in_place() {
        let fields = flatten(
            r#"{"Beard": 0, "overlays": {"hair": {"id": 1}, "scar": 4}, "Body": 2}"#,
        );
        assert_eq!(
            paths(&fields),
            vec!["Beard", "overlays.hair", "overlays.scar", "Body"]
        );
        assert_eq!(fields.get("overlays.hair"), Some(r#"{"id":1}"#));
        assert_eq!(fields.get("overlays.scar"), Some("4"));
        assert!(!fields.contains("overlays"));
    }

    #[test]
    fn flatten_keeps_non_object_overlays_as_plain_entry() {
        let fields = flatten(r#"{"overlays": 5}"#);
        assert_eq!(fields.get("overlays"), Some("5"));
    }

    #[test]
    fn flatten_serializes_nested_values_inline() {
        let fields = flatten(r#"{"coords": {"x": 1.5, "y": -2.0}, "tags": [1, 2]}"#);
        assert_eq!(fields.get("coords"), Some(r#"{"x":1.5,"y":-2.0}"#));
        assert_eq!(fields.get("tags"), Some("[1,2]"));
    }

    #[test]
    fn flatten_fails_soft_on_malformed_input() {
        assert!(flatten("{not json").is_empty());
        assert!(flatten("").is_empty());
        assert!(flatten("[1, 2, 3]").is_empty());
        assert!(flatten("42").is_empty());
    }

    #[test]
    fn reconstruct_collects_overlay_children() {
        let mut fields = FlatFieldSet::new();
        fields.set("Beard", "0");
        fields.set("overlays.hair", r#"{"id": 1}"#);
        fields.set("overlays.scar", "4");

        let text = reconstruct(&fields);
        let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            doc,
            json!({"Beard": 0, "overlays": {"hair": {"id": 1}, "scar": 4}})
        );
    }

    #[test]
    fn reconstruct_omits_empty_overlays() {
        let mut fields = FlatFieldSet::new();
        fields.set("a", "1");
        let doc: serde_json::Value = serde_json::from_str(&reconstruct(&fields)).unwrap();
        assert_eq!(doc, json!({"a": 1}));
    }

    #[test]
    fn empty_field_set_reconstructs_to_empty_object() {
        assert_eq!(reconstruct(&FlatFieldSet::new()), "{}");
        assert_eq!(reconstruct(&flatten("")), "{}");
    }

    #[test]
    fn round_trip_preserves_document_semantics() {
        let source = r#"{
            "Beard": 0,
            "money": 12.5,
            "name": "Arthur",
            "alive": true,
            "title": null,
            "overlays": {"hair": {"id": 1, "opacity": 0.5}, "paint": "war"},
            "loadout": ["knife", "rope"]
        }"#;
        let original: serde_json::Value = serde_json::from_str(source).unwrap();
        let rebuilt: serde_json::Value =
            serde_json::from_str(&reconstruct(&flatten(source))).unwrap();
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn round_trip_preserves_non_ascii_text() {
        let source = r#"{"jmeno": "Vojtěch Dlouhý"}"#;
        let text = reconstruct(&flatten(source));
        assert!(text.contains("Vojtěch Dlouhý"));
    }

    #[test]
    fn edit_single_field_scenario() {
        let mut fields = flatten(r#"{"Beard": 0, "overlays": {"hair": {"id": 1}}}"#);
        assert_eq!(fields.get("Beard"), Some("0"));
        assert_eq!(fields.get("overlays.hair"), Some(r#"{"id":1}"#));

        fields.set("Beard", "5");
        let doc: serde_json::Value = serde_json::from_str(&reconstruct(&fields)).unwrap();
        assert_eq!(doc, json!({"Beard": 5, "overlays": {"hair": {"id": 1}}}));
    }
}
