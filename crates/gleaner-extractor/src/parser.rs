//! Parse oracle output into typed field sets
//!
//! Decoding never panics. Every structural problem becomes a [`ParseFailure`].

use crate::error::{ParseFailure, ParseFailureKind};
use gleaner_domain::{BasicFields, DetailedFields};
use serde_json::{Map, Value};

/// Parse a basic-stage response
///
/// All three keys are optional: an absent or null key decodes to `None`, and
/// the basic validator decides whether the set is usable. A key holding a
/// non-string value is a [`ParseFailureKind::WrongType`].
pub fn parse_basic_response(response: &str) -> Result<BasicFields, ParseFailure> {
    let object = parse_object(response)?;

    Ok(BasicFields {
        title: optional_string(&object, "title")?,
        short_summary: optional_string(&object, "summary")?,
        published_at: optional_string(&object, "published_date")?,
    })
}

/// Parse a first-attempt detailed response: `{"summary": ..., "keywords": [...]}`
///
/// Both keys are required. The keyword count is not checked here.
pub fn parse_detailed_response(response: &str) -> Result<DetailedFields, ParseFailure> {
    let object = parse_object(response)?;

    let long_summary = optional_string(&object, "summary")?
        .ok_or_else(|| ParseFailure::new(ParseFailureKind::MissingField("summary"), "no summary"))?;

    let keywords = match object.get("keywords") {
        None | Some(Value::Null) => {
            return Err(ParseFailure::new(
                ParseFailureKind::MissingField("keywords"),
                "no keyword list",
            ))
        }
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(|s| s.trim().to_string()).ok_or_else(|| {
                    ParseFailure::new(
                        ParseFailureKind::WrongType("keywords"),
                        format!("keyword is not a string: {}", item),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(ParseFailure::new(
                ParseFailureKind::WrongType("keywords"),
                format!("expected an array, got {}", type_name(other)),
            ))
        }
    };

    Ok(DetailedFields {
        long_summary,
        keywords,
    })
}

/// Parse a retry-attempt detailed response (plain text summary)
pub fn parse_plain_summary(response: &str) -> Result<String, ParseFailure> {
    let text = response.trim();
    if text.is_empty() {
        return Err(ParseFailure::new(ParseFailureKind::EmptyResponse, "empty summary"));
    }
    Ok(text.to_string())
}

fn parse_object(response: &str) -> Result<Map<String, Value>, ParseFailure> {
    let body = strip_code_fence(response);
    if body.is_empty() {
        return Err(ParseFailure::new(ParseFailureKind::EmptyResponse, "empty response"));
    }

    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        // Some models wrap the object in prose; fall back to the outermost braces.
        Err(e) => outermost_object(body)
            .and_then(|inner| serde_json::from_str(inner).ok())
            .ok_or_else(|| {
                ParseFailure::new(ParseFailureKind::MalformedJson, format!("JSON parse error: {}", e))
            })?,
    };

    match value {
        Value::Object(map) => Ok(map),
        other => Err(ParseFailure::new(
            ParseFailureKind::MalformedJson,
            format!("expected a JSON object, got {}", type_name(&other)),
        )),
    }
}

/// Strip a surrounding markdown code fence (```` ``` ```` or ```` ```json ````)
fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest
        .strip_prefix("json")
        .or_else(|| rest.strip_prefix("JSON"))
        .unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn optional_string(
    object: &Map<String, Value>,
    key: &'static str,
) -> Result<Option<String>, ParseFailure> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(other) => Err(ParseFailure::new(
            ParseFailureKind::WrongType(key),
            format!("expected a string, got {}", type_name(other)),
        )),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
