use serde_json::Value;

/** \brief Attached to raw-text carrier responses. */
pub const UNSTRUCTURED_NOTE: &str = "(respuesta no estructurada del modelo)";

/**
 * \brief A response schema the normalizer can fill from model output.
 *
 * Readers below default instead of failing: a missing key becomes the zero
 * value of its field and unknown keys are ignored.
 */
pub trait ToolSchema: Sized {
    /** \brief Read every field from a parsed JSON object with coercion. */
    fn from_json(v: &Value) -> Self;

    /**
     * \brief Carrier used when the model output is not a JSON object.
     *
     * One designated free-text field holds `raw` verbatim, the rest stay empty.
     */
    fn raw_text(raw: &str) -> Self;
}

/**
 * \brief Result of normalization, remembering which path produced it.
 */
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized<T> {
    Structured(T),
    RawText(T),
}

impl<T> Normalized<T> {
    pub fn into_inner(self) -> T {
        match self {
            Normalized::Structured(v) | Normalized::RawText(v) => v,
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, Normalized::Structured(_))
    }
}

/**
 * \brief Strict JSON parse of `raw` into schema `T`; non-objects fall back to the raw carrier.
 */
pub fn normalize<T: ToolSchema>(raw: &str) -> Normalized<T> {
    match serde_json::from_str::<Value>(raw.trim()) {
        Ok(v) if v.is_object() => Normalized::Structured(T::from_json(&v)),
        _ => Normalized::RawText(T::raw_text(raw)),
    }
}

fn stringify(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/**
 * \brief String field; numbers and booleans are stringified, null/missing give "".
 */
pub fn text(v: &Value, key: &str) -> String {
    v.get(key).map(stringify).unwrap_or_default()
}

/**
 * \brief List of strings; each element stringified, a bare string becomes a single item.
 */
pub fn text_list(v: &Value, key: &str) -> Vec<String> {
    match v.get(key) {
        Some(Value::Array(items)) => items.iter().map(stringify).collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

/**
 * \brief Float field, accepting numbers or numeric strings ("12.5", "12.5%").
 */
pub fn number(v: &Value, key: &str) -> f64 {
    match v.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

/**
 * \brief Integer field via truncating float cast.
 */
pub fn integer(v: &Value, key: &str) -> i64 {
    number(v, key) as i64
}

/**
 * \brief Array of nested records, each normalized by `read`; non-object items are skipped.
 */
pub fn records<T, F>(v: &Value, key: &str, read: F) -> Vec<T>
where
    F: Fn(&Value) -> T,
{
    v.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter(|i| i.is_object()).map(read).collect())
        .unwrap_or_default()
}
