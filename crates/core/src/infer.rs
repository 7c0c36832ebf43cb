use serde_json::{Number, Value};

/// Convert user-entered text back into a typed JSON value.
///
/// The fallback chain is order-sensitive and total; the rules run in this
/// exact sequence and the first match wins:
///
/// 1. valid JSON of any kind (object, array, number, string, boolean, null)
/// 2. case-insensitive `true` / `false`
/// 3. base-10 integer
/// 4. finite float
/// 5. the text itself, as a string
///
/// Rules 2-4 are only reachable for inputs JSON rejects (`TRUE`, `+5`,
/// locale-ish number forms). Non-finite floats have no JSON representation,
/// so `NaN` and `inf` fall through to rule 5. Surrounding whitespace is
/// trimmed before inference, matching how the editor reads its inputs.
pub fn infer(text: &str) -> Value {
    let text = text.trim();

    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return value;
    }
    if text.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Ok(n) = text.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Ok(f) = text.parse::<f64>() {
        if let Some(n) = Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::String(text.to_string())
}
