//! Response schemas and structural validation
//!
//! Schemas are sent with each request in the provider's OpenAPI subset
//! (uppercase type names). Responses are validated here independently of
//! whether the provider honoured the schema.

use serde_json::{Value, json};
use tracing::debug;

use super::OracleError;
use crate::domain::{ClarificationQuestion, Provenance, QuestionKind, RawCategory, RawItem};

/// Schema for a list of category objects
pub fn packing_list_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "category": {
                    "type": "STRING",
                    "description": "The category of packing items, e.g., \"Clothing\", \"Electronics\", \"Documents\", \"Toiletries\"."
                },
                "items": {
                    "type": "ARRAY",
                    "description": "A list of items belonging to this category.",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "name": {
                                "type": "STRING",
                                "description": "The name of the individual item to pack, e.g., \"Passport\", \"Phone charger\", \"Rain jacket\". Should be concise."
                            },
                            "source": {
                                "type": "STRING",
                                "enum": ["user", "ai"],
                                "description": "The origin of the item. 'user' for items from the user's base list, 'ai' for items suggested by the AI."
                            }
                        },
                        "required": ["name", "source"]
                    }
                }
            },
            "required": ["category", "items"]
        }
    })
}

/// Schema for a flat list of strings
pub fn string_array_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": { "type": "STRING" }
    })
}

/// Schema for clarification questions
pub fn questions_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": { "type": "STRING" },
                "question": { "type": "STRING" },
                "type": { "type": "STRING", "enum": ["yes_no", "text"] }
            },
            "required": ["id", "question", "type"]
        }
    })
}

/// Strip a surrounding Markdown code fence, if any
///
/// Some models wrap JSON in ```json fences even in JSON mode.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn parse_json(text: &str) -> Result<Value, OracleError> {
    serde_json::from_str(strip_code_fences(text)).map_err(|e| {
        debug!(error = %e, "parse_json: not JSON");
        OracleError::invalid(format!("response is not valid JSON: {}", e))
    })
}

fn expect_array(value: Value, what: &str) -> Result<Vec<Value>, OracleError> {
    match value {
        Value::Array(values) => Ok(values),
        other => Err(OracleError::invalid(format!(
            "expected a JSON array of {}, got {}",
            what,
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn string_field<'a>(value: &'a Value, field: &str, at: &str) -> Result<&'a str, OracleError> {
    value
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| OracleError::invalid(format!("{}: missing string field '{}'", at, field)))
}

/// Parse a JSON array of strings
pub fn parse_string_array(text: &str) -> Result<Vec<String>, OracleError> {
    let values = expect_array(parse_json(text)?, "strings")?;
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| match v {
            Value::String(s) => Ok(s),
            other => Err(OracleError::invalid(format!(
                "element {} is {}, expected a string",
                i,
                kind_of(&other)
            ))),
        })
        .collect()
}

/// Parse and validate a packing list
///
/// Every category needs a string `category` and an `items` array; every item
/// needs a string `name` and a `source` of "user" or "ai".
pub fn parse_packing_list(text: &str) -> Result<Vec<RawCategory>, OracleError> {
    let values = expect_array(parse_json(text)?, "categories")?;
    let mut categories = Vec::with_capacity(values.len());

    for (ci, cat) in values.iter().enumerate() {
        let at = format!("category {}", ci);
        if !cat.is_object() {
            return Err(OracleError::invalid(format!("{}: expected an object, got {}", at, kind_of(cat))));
        }
        let name = string_field(cat, "category", &at)?;
        let items = cat
            .get("items")
            .and_then(Value::as_array)
            .ok_or_else(|| OracleError::invalid(format!("{}: missing array field 'items'", at)))?;

        let mut raw_items = Vec::with_capacity(items.len());
        for (ii, item) in items.iter().enumerate() {
            let at = format!("category {} item {}", ci, ii);
            if !item.is_object() {
                return Err(OracleError::invalid(format!("{}: expected an object, got {}", at, kind_of(item))));
            }
            let item_name = string_field(item, "name", &at)?;
            let tag = string_field(item, "source", &at)?;
            let source = Provenance::from_tag(tag)
                .ok_or_else(|| OracleError::invalid(format!("{}: unknown source '{}'", at, tag)))?;
            raw_items.push(RawItem::new(item_name, source));
        }

        categories.push(RawCategory::new(name, raw_items));
    }

    debug!(categories = categories.len(), "parse_packing_list: parsed");
    Ok(categories)
}

/// Parse clarification questions
pub fn parse_questions(text: &str) -> Result<Vec<ClarificationQuestion>, OracleError> {
    let values = expect_array(parse_json(text)?, "questions")?;
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let at = format!("question {}", i);
            let id = string_field(v, "id", &at)?;
            let question = string_field(v, "question", &at)?;
            let kind = match v.get("type").and_then(Value::as_str) {
                Some("text") => QuestionKind::Text,
                Some("yes_no") | None => QuestionKind::YesNo,
                Some(other) => return Err(OracleError::invalid(format!("{}: unknown type '{}'", at, other))),
            };
            Ok(ClarificationQuestion {
                id: id.to_string(),
                question: question.to_string(),
                kind,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("[1]"), "[1]");
        assert_eq!(strip_code_fences("  ```json\n[1]\n```  "), "[1]");
        assert_eq!(strip_code_fences("```\n[\"a\"]\n```"), "[\"a\"]");
    }

    #[test]
    fn test_parse_string_array() {
        assert_eq!(
            parse_string_array(r#"["תמיד", "טיול שטח"]"#).unwrap(),
            vec!["תמיד".to_string(), "טיול שטח".to_string()]
        );
        assert!(parse_string_array(r#"{"templates": []}"#).unwrap_err().is_invalid_output());
        assert!(parse_string_array(r#"["ok", 3]"#).unwrap_err().is_invalid_output());
        assert!(parse_string_array("").unwrap_err().is_invalid_output());
    }

    #[test]
    fn test_parse_packing_list_valid() {
        let text = r#"[
            {"category": "Hiking Gear", "items": [{"name": "Headlamp", "source": "ai"}]},
            {"category": "אישי", "items": [{"name": "כובע", "source": "user"}]}
        ]"#;

        let list = parse_packing_list(text).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].items[0], RawItem::oracle("Headlamp"));
        assert_eq!(list[1].items[0], RawItem::user("כובע"));
    }

    #[test]
    fn test_parse_packing_list_rejects_bad_structure() {
        let cases = [
            r#"{"category": "x", "items": []}"#,
            r#"[{"items": []}]"#,
            r#"[{"category": 7, "items": []}]"#,
            r#"[{"category": "x"}]"#,
            r#"[{"category": "x", "items": [{"source": "ai"}]}]"#,
            r#"[{"category": "x", "items": [{"name": "y"}]}]"#,
            r#"[{"category": "x", "items": [{"name": "y", "source": "robot"}]}]"#,
            r#"["x"]"#,
            "not json",
        ];
        for case in cases {
            let err = parse_packing_list(case).unwrap_err();
            assert!(err.is_invalid_output(), "{}", case);
        }
    }

    #[test]
    fn test_parse_questions() {
        let text = r#"[
            {"id": "q1", "question": "Are you driving?", "type": "yes_no"},
            {"id": "q2", "question": "How many kids?", "type": "text"}
        ]"#;
        let questions = parse_questions(text).unwrap();
        assert_eq!(questions[0].kind, QuestionKind::YesNo);
        assert_eq!(questions[1].kind, QuestionKind::Text);

        assert!(parse_questions(r#"[{"id": "q1"}]"#).is_err());
    }

    #[test]
    fn test_schemas_use_provider_types() {
        assert_eq!(packing_list_schema()["type"], "ARRAY");
        assert_eq!(packing_list_schema()["items"]["required"][0], "category");
        assert_eq!(string_array_schema()["items"]["type"], "STRING");
        assert_eq!(questions_schema()["items"]["properties"]["type"]["enum"][0], "yes_no");
    }
}
