// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Prediction extraction from workflow responses.
//!
//! A workflow result has no fixed schema: each step may nest its output in
//! objects or lists of arbitrary depth. [`flatten_predictions`] finds every
//! `predictions` array at any depth and returns the entries in encounter
//! order. [`Prediction`] is the typed view the overlay renderer draws from.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::utils::pluralize;

/// Key of the result object inside a workflow response.
pub const WORKFLOW_RESULT_KEY: &str = "workflowResult";

/// Key holding a list of predictions inside a step output.
pub const PREDICTIONS_KEY: &str = "predictions";

/// Label used when a prediction carries no usable `class`.
pub const DEFAULT_LABEL: &str = "detection";

/// Collect every prediction under a workflow result, depth-first.
///
/// List elements and object values are visited in order. A visited object
/// holding a `predictions` list contributes that list's entries verbatim; any
/// other list or object is searched recursively. Scalars and `null`
/// contribute nothing. The `predictions` key of `workflow_result` itself is
/// not matched.
#[must_use]
pub fn flatten_predictions(workflow_result: &Value) -> Vec<&Value> {
    let mut out = Vec::new();
    collect(workflow_result, &mut out);
    out
}

/// Flatten the `workflowResult` field of a full response.
///
/// Returns an empty list when the response is not an object or has no result.
#[must_use]
pub fn response_predictions(response: &Value) -> Vec<&Value> {
    response
        .get(WORKFLOW_RESULT_KEY)
        .map(flatten_predictions)
        .unwrap_or_default()
}

fn collect<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_child(item, out);
            }
        }
        Value::Object(map) => {
            for child in map.values() {
                collect_child(child, out);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}

/// Visit one list element or object value.
fn collect_child<'a>(child: &'a Value, out: &mut Vec<&'a Value>) {
    match child {
        Value::Object(inner) => match predictions_list(inner) {
            Some(preds) => out.extend(preds),
            None => collect(child, out),
        },
        Value::Array(_) => collect(child, out),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}

fn predictions_list(map: &Map<String, Value>) -> Option<&Vec<Value>> {
    match map.get(PREDICTIONS_KEY) {
        Some(Value::Array(preds)) => Some(preds),
        _ => None,
    }
}

/// A single detection with center-based geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Box center x in pixels.
    pub x: f64,
    /// Box center y in pixels.
    pub y: f64,
    /// Box width in pixels.
    pub width: f64,
    /// Box height in pixels.
    pub height: f64,
    /// Display label.
    pub label: String,
}

impl Prediction {
    /// Parse a prediction entry.
    ///
    /// Returns `None` if any of `x`, `y`, `width`, `height` is missing or
    /// cannot be read as a finite number.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let field = |name: &str| value.get(name).and_then(coerce_number);
        Some(Self {
            width: field("width")?,
            height: field("height")?,
            x: field("x")?,
            y: field("y")?,
            label: label_of(value),
        })
    }

    /// Top-left corner and size as `(left, top, width, height)`.
    #[must_use]
    pub fn xywh_top_left(&self) -> (f64, f64, f64, f64) {
        (
            self.x - self.width / 2.0,
            self.y - self.height / 2.0,
            self.width,
            self.height,
        )
    }

    /// Corners as `[x1, y1, x2, y2]`.
    #[must_use]
    pub fn xyxy(&self) -> [f64; 4] {
        let (left, top, w, h) = self.xywh_top_left();
        [left, top, left + w, top + h]
    }
}

/// Numeric conversion accepting numbers, numeric strings and booleans.
fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    n.is_finite().then_some(n)
}

fn label_of(value: &Value) -> String {
    match value.get("class") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Bool(true)) => "true".to_string(),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        _ => DEFAULT_LABEL.to_string(),
    }
}

/// Human-readable class count, e.g. `"2 cats, 1 dog"`.
///
/// Classes appear in order of first occurrence. Entries that do not parse as
/// predictions are counted under their label all the same.
#[must_use]
pub fn summarize(predictions: &[&Value]) -> String {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for pred in predictions {
        let label = label_of(pred);
        let count = counts.entry(label.clone()).or_insert(0);
        if *count == 0 {
            order.push(label);
        }
        *count += 1;
    }

    order
        .into_iter()
        .map(|label| {
            let n = counts[&label];
            if n == 1 {
                format!("{n} {label}")
            } else {
                format!("{n} {}", pluralize(&label))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
