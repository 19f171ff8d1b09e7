//! Display strings for evaluation results.
//!
//! Numbers use the shortest round-trip form unless fixed decimals are
//! configured; failures show as `#ERROR: <message>`.

use super::{EvalError, Value};

/// Most decimal places a fixed display format may ask for.
pub const MAX_DECIMALS: usize = 12;

/// Format a number for display.
///
/// Without `decimals` the shortest text that parses back to the same value is
/// used, so integral results show as `6` and re-reading a displayed value is
/// lossless. With `decimals` the value is printed with that many places.
pub fn format_number(n: f64, decimals: Option<usize>) -> String {
    if n.is_nan() {
        "#NAN!".to_string()
    } else if n.is_infinite() {
        "#INF!".to_string()
    } else {
        // -0.0 displays as "0".
        let n = if n == 0.0 { 0.0 } else { n };
        match decimals {
            Some(places) => format!("{:.*}", places.min(MAX_DECIMALS), n),
            None => n.to_string(),
        }
    }
}

/// Format a value for display. Text is shown exactly as stored.
pub fn format_value(value: &Value, decimals: Option<usize>) -> String {
    match value {
        Value::Scalar(n) => format_number(*n, decimals),
        Value::Text(s) => s.clone(),
    }
}

/// Cell marker for a failed evaluation.
pub fn format_error(err: &EvalError) -> String {
    format!("#ERROR: {}", err)
}

/// Display string for an evaluation outcome.
pub fn display_result(result: &Result<Value, EvalError>, decimals: Option<usize>) -> String {
    match result {
        Ok(value) => format_value(value, decimals),
        Err(err) => format_error(err),
    }
}
