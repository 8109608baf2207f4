//! Completion parsing and plain-text rendering of instruction sets.

use super::InstructionError;
use serde_json::Value;

/// Parse a model completion into an instruction set.
///
/// Accepts bare JSON, JSON wrapped in a markdown code fence, or JSON surrounded
/// by prose. The first JSON value that is an object, or an array holding at
/// least one object, is the instruction set; bracketed prose such as `[1]` or
/// `[12.00-15.50]` is skipped.
pub fn parse_instruction_set(completion: &str) -> Result<Value, InstructionError> {
    let body = strip_fence(completion);

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if is_instruction_set(&value) {
            return Ok(value);
        }
    }

    let mut last_error = "no JSON object found".to_string();

    for (start, _) in body.char_indices().filter(|(_, c)| *c == '{' || *c == '[') {
        let mut values = serde_json::Deserializer::from_str(&body[start..]).into_iter::<Value>();
        match values.next() {
            Some(Ok(value)) if is_instruction_set(&value) => return Ok(value),
            Some(Ok(_)) => {}
            // Everything after an unterminated value is inside it
            Some(Err(e)) if e.is_eof() => {
                last_error = e.to_string();
                break;
            }
            Some(Err(e)) => last_error = e.to_string(),
            None => break,
        }
    }

    Err(InstructionError::Parse {
        message: last_error,
        completion: completion.to_string(),
    })
}

/// Objects, and arrays containing at least one object, are instruction sets.
fn is_instruction_set(value: &Value) -> bool {
    match value {
        Value::Object(_) => true,
        Value::Array(items) => items.iter().any(Value::is_object),
        _ => false,
    }
}

/// Return the body of the first markdown code fence, or the trimmed completion.
fn strip_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(open) = trimmed.find("```") else {
        return trimmed;
    };

    // Skip the info string (e.g. `json`) on the opening line
    let after = &trimmed[open + 3..];
    let body = match after.find('\n') {
        Some(newline) => &after[newline + 1..],
        None => after,
    };

    match body.find("```") {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}

/// Render an instruction set as indented plain text.
///
/// Keys become labels, arrays of scalars become numbered lists and nested
/// objects are indented under their label.
pub fn render_text(value: &Value) -> String {
    let mut out = String::new();
    render_value(value, 0, &mut out);
    out
}

fn render_value(value: &Value, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match value {
        Value::Object(map) => {
            for (key, item) in map {
                let label = humanize_key(key);
                if is_scalar(item) {
                    out.push_str(&format!("{}{}: {}\n", indent, label, scalar_text(item)));
                } else {
                    out.push_str(&format!("{}{}:\n", indent, label));
                    render_value(item, depth + 1, out);
                }
            }
        }
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                if is_scalar(item) {
                    out.push_str(&format!("{}{}. {}\n", indent, idx + 1, scalar_text(item)));
                } else {
                    out.push_str(&format!("{}{}.\n", indent, idx + 1));
                    render_value(item, depth + 1, out);
                }
            }
        }
        scalar => out.push_str(&format!("{}{}\n", indent, scalar_text(scalar))),
    }
}

fn is_scalar(value: &Value) -> bool {
    !(value.is_object() || value.is_array())
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// `"learning_objective"` -> `"Learning objective"`.
fn humanize_key(key: &str) -> String {
    let spaced = key.replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_bare_json() {
        let value = parse_instruction_set(r#"{"title": "Lab 1", "exercises": []}"#).unwrap();
        assert_eq!(value["title"], "Lab 1");
    }

    #[test]
    fn test_parse_fenced_json() {
        let completion = "Here is your lab:\n```json\n{\"title\": \"Git basics\"}\n```\nGood luck!";
        let value = parse_instruction_set(completion).unwrap();
        assert_eq!(value, json!({"title": "Git basics"}));
    }

    #[test]
    fn test_parse_array() {
        let value = parse_instruction_set(r#"[{"step": "clone"}]"#).unwrap();
        assert!(value.is_array());
    }

    #[test]
    fn test_parse_rejects_prose() {
        let err = parse_instruction_set("Sorry, I cannot help with that.").unwrap_err();
        match err {
            InstructionError::Parse { completion, .. } => {
                assert_eq!(completion, "Sorry, I cannot help with that.")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_skips_bracketed_prose_before_object() {
        let completion = "See section [1]:\n{\"title\": \"Git basics\"}";
        let value = parse_instruction_set(completion).unwrap();
        assert_eq!(value, json!({"title": "Git basics"}));
    }

    #[test]
    fn test_parse_skips_timestamp_before_object() {
        let completion = "Based on [12.00-15.50] of the lecture:\n{\"title\": \"Branches\"}";
        let value = parse_instruction_set(completion).unwrap();
        assert_eq!(value["title"], "Branches");
    }

    #[test]
    fn test_parse_rejects_array_without_objects() {
        assert!(matches!(
            parse_instruction_set("Sections [1] and [2] are relevant."),
            Err(InstructionError::Parse { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_truncated_object_with_complete_inner_object() {
        let completion = r#"{"title": "Lab", "exercises": [{"title": "a"}, {"title": "#;
        assert!(parse_instruction_set(completion).is_err());
    }

    #[test]
    fn test_parse_rejects_scalar() {
        assert!(matches!(
            parse_instruction_set("\"just a string\""),
            Err(InstructionError::Parse { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_truncated_json() {
        assert!(parse_instruction_set(r#"{"title": "Lab", "exercises": [{"title": "#).is_err());
    }

    #[test]
    fn test_render_text() {
        let value = json!({
            "title": "Git basics",
            "exercises": [
                {"title": "Clone", "steps": ["Open a terminal", "Run git clone"]}
            ]
        });

        let text = render_text(&value);
        assert!(text.contains("Title: Git basics\n"));
        assert!(text.contains("Exercises:\n  1.\n"));
        assert!(text.contains("    Title: Clone\n"));
        assert!(text.contains("    Steps:\n      1. Open a terminal\n      2. Run git clone\n"));
    }

    #[test]
    fn test_humanize_key() {
        assert_eq!(humanize_key("learning_objective"), "Learning objective");
        assert_eq!(humanize_key(""), "");
    }
}
