//! Pure projection of a JSON document into a display tree, for list/tree
//! rendering. Decoupled from the codec: nothing here participates in the
//! save contract.

use serde_json::Value;

use crate::codec::display_text;

/// One node of a rendered document: scalars carry text, containers carry
/// children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayNode {
    pub label: String,
    pub text: Option<String>,
    pub children: Vec<DisplayNode>,
}

impl DisplayNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty() && self.text.is_some()
    }
}

/// Project a value into a display tree rooted at `label`. Objects and
/// arrays recurse; array elements are labelled by index.
pub fn project(label: &str, value: &Value) -> DisplayNode {
    match value {
        Value::Object(map) => DisplayNode {
            label: label.to_string(),
            text: None,
            children: map.iter().map(|(k, v)| project(k, v)).collect(),
        },
        Value::Array(items) => DisplayNode {
            label: label.to_string(),
            text: None,
            children: items
                .iter()
                .enumerate()
                .map(|(i, v)| project(&i.to_string(), v))
                .collect(),
        },
        scalar => DisplayNode {
            label: label.to_string(),
            text: Some(display_text(scalar)),
            children: Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_become_leaves() {
        let node = project("Beard", &json!(0));
        assert!(node.is_leaf());
        assert_eq!(node.text.as_deref(), Some("0"));
    }

    #[test]
    fn objects_recurse_in_key_order() {
        let doc = json!({"b": 1, "a": {"x": true}});
        let node = project("skinPlayer", &doc);
        assert_eq!(node.text, None);
        let labels: Vec<&str> = node.children.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["b", "a"]);
        assert_eq!(node.children[1].children[0].text.as_deref(), Some("true"));
    }

    #[test]
    fn arrays_are_labelled_by_index() {
        let node = project("tags", &json!(["knife", "rope"]));
        assert_eq!(node.children[0].label, "0");
        assert_eq!(node.children[1].text.as_deref(), Some("rope"));
    }
}
