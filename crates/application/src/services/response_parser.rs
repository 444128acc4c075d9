//! Extracts a JSON object from raw generative output
//!
//! Model output is adversarial input: it may be wrapped in code fences,
//! surrounded by prose, contain decorative braces, or be cut off. The
//! parser never panics and always returns a classified [`ParseError`].

use serde_json::{Map, Value};

use crate::error::ParseError;

/// A JSON object that has not been checked against the record shape yet
#[derive(Debug, Clone, PartialEq)]
pub struct UnvalidatedStructure(Map<String, Value>);

impl UnvalidatedStructure {
    /// Wrap an already-parsed object
    #[must_use]
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Look up a field
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Borrow the underlying object
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for UnvalidatedStructure {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Parse raw backend text into an unvalidated object
///
/// Fence markers (```` ``` ```` and ```` ```json ````) are removed, then
/// candidate `{` positions are tried left to right. The first balanced region
/// that parses as a JSON object wins. A balanced region that fails is skipped
/// as a whole, so an object nested inside a malformed one is never returned.
/// Balanced regions that fail to parse make the result
/// [`ParseError::MalformedStructure`]; no balanced region at all is
/// [`ParseError::NoStructureFound`].
pub fn parse(raw: &str) -> Result<UnvalidatedStructure, ParseError> {
    let cleaned = strip_code_fences(raw);
    let mut first_failure: Option<String> = None;
    let mut cursor = 0;

    while let Some(offset) = cleaned[cursor..].find('{') {
        let start = cursor + offset;
        let Some(end) = balanced_end(&cleaned, start) else {
            cursor = start + 1;
            continue;
        };
        match serde_json::from_str::<Value>(&cleaned[start..end]) {
            Ok(Value::Object(fields)) => return Ok(UnvalidatedStructure(fields)),
            Ok(_) => {},
            Err(e) => {
                if first_failure.is_none() {
                    first_failure = Some(e.to_string());
                }
            },
        }
        cursor = end;
    }

    match first_failure {
        Some(reason) => Err(ParseError::MalformedStructure(reason)),
        None => Err(ParseError::NoStructureFound),
    }
}

/// Remove code fence markers, keeping the fenced content
fn strip_code_fences(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find("```") {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + 3..];
        if rest
            .get(..4)
            .is_some_and(|tag| tag.eq_ignore_ascii_case("json"))
        {
            rest = &rest[4..];
        }
    }
    out.push_str(rest);
    out
}

/// Byte index one past the `}` that closes the `{` at `start`
///
/// Braces inside JSON string literals (including escaped quotes) do not
/// count. Returns `None` if the region never closes.
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes.get(start..)?.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(start + offset + 1);
                }
            },
            _ => {},
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_answer_with_prose() {
        let raw = "Here is your answer: ```json\n{\"purpose\":\"Invoice\",\"paymentDelayed\":true}\n``` Thanks!";
        let parsed = parse(raw).unwrap();
        assert_eq!(parsed.get("purpose"), Some(&Value::from("Invoice")));
        assert_eq!(parsed.get("paymentDelayed"), Some(&Value::Bool(true)));
    }

    #[test]
    fn no_object_here() {
        assert_eq!(parse("no object here"), Err(ParseError::NoStructureFound));
    }

    #[test]
    fn unquoted_keys_are_malformed() {
        assert!(matches!(
            parse("{not: valid}"),
            Err(ParseError::MalformedStructure(_))
        ));
    }

    #[test]
    fn unbalanced_is_no_structure() {
        assert_eq!(
            parse("{\"purpose\": \"Invoice\""),
            Err(ParseError::NoStructureFound)
        );
        assert_eq!(parse("}{"), Err(ParseError::NoStructureFound));
    }

    #[test]
    fn braces_inside_strings_do_not_truncate() {
        let raw = r#"{"draftedReply":"Dear {name},\nThanks } for the \"quote\" {","purpose":"Invoice"}"#;
        let parsed = parse(raw).unwrap();
        assert_eq!(parsed.get("purpose"), Some(&Value::from("Invoice")));
        assert_eq!(
            parsed.get("draftedReply"),
            Some(&Value::from("Dear {name},\nThanks } for the \"quote\" {"))
        );
    }

    #[test]
    fn nested_objects_are_kept_whole() {
        let parsed = parse(r#"x {"a":{"b":{"c":1}},"d":2} y"#).unwrap();
        assert_eq!(parsed.get("d"), Some(&Value::from(2)));
        assert!(parsed.get("a").is_some_and(Value::is_object));
    }

    #[test]
    fn decorative_braces_before_the_object_are_skipped() {
        let raw = "Template {placeholder} below:\n{\"purpose\":\"Invoice\"}\nand a trailing } brace";
        let parsed = parse(raw).unwrap();
        assert_eq!(parsed.get("purpose"), Some(&Value::from("Invoice")));
    }

    #[test]
    fn malformed_outer_object_hides_valid_inner_object() {
        let raw = r#"{"purpose": "Invoice", "paymentDelayed": tru, "meta": {"riskLevel": "low"}}"#;
        assert!(matches!(parse(raw), Err(ParseError::MalformedStructure(_))));
    }

    #[test]
    fn valid_object_after_malformed_one_is_found() {
        let parsed = parse(r#"{"a": tru, "b": {"c": 1}} then {"n":2}"#).unwrap();
        assert_eq!(parsed.get("n"), Some(&Value::from(2)));
        assert!(parsed.get("c").is_none());
    }

    #[test]
    fn first_valid_object_wins() {
        let parsed = parse(r#"{"n":1} then {"n":2}"#).unwrap();
        assert_eq!(parsed.get("n"), Some(&Value::from(1)));
    }

    #[test]
    fn uppercase_json_fence() {
        let parsed = parse("```JSON\n{\"a\":true}\n```").unwrap();
        assert_eq!(parsed.get("a"), Some(&Value::Bool(true)));
    }

    #[test]
    fn empty_input_is_no_structure() {
        assert_eq!(parse(""), Err(ParseError::NoStructureFound));
    }

    #[test]
    fn multibyte_text_around_object() {
        let parsed = parse("Grüße 👋 {\"purpose\":\"Anfrage – allgemein\"} ✓").unwrap();
        assert_eq!(
            parsed.get("purpose"),
            Some(&Value::from("Anfrage – allgemein"))
        );
    }

    #[test]
    fn fence_marker_at_end_of_text() {
        assert_eq!(parse("```"), Err(ParseError::NoStructureFound));
        assert_eq!(parse("```js"), Err(ParseError::NoStructureFound));
    }
}
