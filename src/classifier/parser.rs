//! Reads a classification out of free-text model output.
//!
//! The accepted grammar is small: the first balanced `{...}`
//! span in the reply (braces inside JSON string literals are ignored) must be
//! a JSON object. Anything else is a parse failure and the caller falls back.

use serde_json::{Map, Value};

use super::ClassificationResult;
use crate::core::shared::enums::{Department, Severity};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParseError {
    #[error("no JSON object found in response")]
    NoJson,
    #[error("invalid JSON: {0}")]
    InvalidJson(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Returns the first balanced `{...}` span, or `None` when the reply never
/// opens an object or never closes the first one it opens.
pub fn extract_json_object(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in response[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&response[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

pub fn parse_classification(response: &str) -> Result<ClassificationResult, ParseError> {
    let json_str = extract_json_object(response).ok_or(ParseError::NoJson)?;
    let value: Value =
        serde_json::from_str(json_str).map_err(|e| ParseError::InvalidJson(e.to_string()))?;
    let object = value.as_object().ok_or(ParseError::NoJson)?;

    let department = match object.get("department") {
        None => Department::General,
        Some(v) => text_field(v, "department")?
            .parse::<Department>()
            .map_err(|reason| ParseError::InvalidField {
                field: "department",
                reason,
            })?,
    };

    let severity = match object.get("severity") {
        None => Severity::Medium,
        Some(v) => text_field(v, "severity")?
            .parse::<Severity>()
            .map_err(|reason| ParseError::InvalidField {
                field: "severity",
                reason,
            })?,
    };

    let confidence = match object.get("confidence") {
        None => 0.7,
        Some(v) => number_field(v, "confidence")?,
    };

    let reasoning = match object.get("reasoning") {
        None => "Automated classification".to_string(),
        Some(v) => text_field(v, "reasoning")?.to_string(),
    };

    let suggested_actions = actions_field(object)?;

    Ok(ClassificationResult {
        department,
        severity,
        confidence,
        reasoning,
        suggested_actions,
    })
}

fn text_field<'a>(value: &'a Value, field: &'static str) -> Result<&'a str, ParseError> {
    value.as_str().ok_or_else(|| ParseError::InvalidField {
        field,
        reason: format!("expected a string, got {value}"),
    })
}

/// Models sometimes quote numbers; "0.85" is accepted like 0.85.
fn number_field(value: &Value, field: &'static str) -> Result<f64, ParseError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|n| n.is_finite())
        .ok_or_else(|| ParseError::InvalidField {
            field,
            reason: format!("expected a number, got {value}"),
        })
}

fn actions_field(object: &Map<String, Value>) -> Result<Vec<String>, ParseError> {
    let Some(value) = object.get("suggested_actions") else {
        return Ok(vec!["Review required".to_string()]);
    };

    let items = value.as_array().ok_or_else(|| ParseError::InvalidField {
        field: "suggested_actions",
        reason: "expected a list of strings".to_string(),
    })?;

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| ParseError::InvalidField {
                    field: "suggested_actions",
                    reason: format!("expected a string item, got {item}"),
                })
        })
        .collect()
}
