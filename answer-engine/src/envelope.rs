//! Extraction of the structured answer from free-form model output.
//!
//! The model is an untrusted text producer. Its reply must contain a fenced
//! ```` ```json ```` block; the first such block is parsed and checked
//! against the expected shape. There is no other recovery.

use serde_json::{Map, Value};

use crate::answer::{CodeExample, StructuredAnswer};
use crate::error::ParseError;

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// Returns the text between the first ```` ```json ```` and the next ```` ``` ````.
pub fn extract_json_block(text: &str) -> Result<&str, ParseError> {
    let start = text.find(FENCE_OPEN).ok_or(ParseError::NoJsonBlock)? + FENCE_OPEN.len();
    let len = text[start..]
        .find(FENCE_CLOSE)
        .ok_or(ParseError::NoJsonBlock)?;
    Ok(text[start..start + len].trim())
}

/// Parses a model reply into a [`StructuredAnswer`].
///
/// `content` may be a string or the sectioned object the role prompt asks
/// for. `API` (alias `api`) and `code` are optional.
pub fn parse_answer(text: &str) -> Result<StructuredAnswer, ParseError> {
    let block = extract_json_block(text)?;
    let value: Value =
        serde_json::from_str(block).map_err(|e| ParseError::InvalidJson(e.to_string()))?;
    let Value::Object(obj) = value else {
        return Err(ParseError::Shape("top-level value is not an object".into()));
    };

    let content = match obj.get("content") {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Object(sections)) => render_sections(sections),
        Some(_) => return Err(ParseError::Shape("`content` must be a string or object".into())),
        None => return Err(ParseError::Shape("missing `content`".into())),
    };
    if content.is_empty() {
        return Err(ParseError::Shape("empty `content`".into()));
    }

    let api = obj
        .get("API")
        .or_else(|| obj.get("api"))
        .and_then(text_of)
        .filter(|s| !s.is_empty());

    let code = obj.get("code").and_then(code_of);

    Ok(StructuredAnswer { content, api, code })
}

const SECTIONS: [(&str, &str); 3] = [
    ("authentication", "Authentication"),
    ("limitations", "Limitations"),
    ("relatedEndpoints", "Related endpoints"),
];

/// `answer` first, then labelled paragraphs; empty sections are skipped.
fn render_sections(sections: &Map<String, Value>) -> String {
    let mut paragraphs = Vec::new();
    if let Some(answer) = sections.get("answer").and_then(text_of) {
        if !answer.is_empty() {
            paragraphs.push(answer);
        }
    }
    for (key, label) in SECTIONS {
        if let Some(body) = sections.get(key).and_then(text_of) {
            if !body.is_empty() {
                paragraphs.push(format!("{label}: {body}"));
            }
        }
    }
    paragraphs.join("\n\n")
}

fn code_of(v: &Value) -> Option<CodeExample> {
    match v {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => {
            let s = s.trim().to_string();
            Some(if s.starts_with("curl") {
                CodeExample {
                    curl: Some(s),
                    ..Default::default()
                }
            } else {
                CodeExample {
                    example: Some(s),
                    ..Default::default()
                }
            })
        }
        Value::Object(m) => {
            let field = |k: &str| m.get(k).and_then(text_of).filter(|s| !s.is_empty());
            let code = CodeExample {
                curl: field("curl"),
                example: field("example"),
                parameters: field("parameters"),
                response: field("response"),
            };
            (!code.is_empty()).then_some(code)
        }
        _ => None,
    }
}

/// Strings are trimmed; string arrays joined by ", "; anything else compact JSON.
fn text_of(v: &Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s.trim().to_string()),
        Value::Array(items) if items.iter().all(Value::is_string) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_block() {
        let text = "Sure!\n```json\n{\"content\":\"a\"}\n```\nand\n```json\n{\"content\":\"b\"}\n```";
        assert_eq!(extract_json_block(text).unwrap(), "{\"content\":\"a\"}");
    }

    #[test]
    fn missing_block_is_an_error() {
        assert_eq!(
            parse_answer("{\"content\":\"bare json\"}"),
            Err(ParseError::NoJsonBlock)
        );
        assert_eq!(
            parse_answer("```json\n{\"content\":\"unterminated\"}"),
            Err(ParseError::NoJsonBlock)
        );
    }

    #[test]
    fn invalid_json_is_an_error() {
        let err = parse_answer("```json\n{content: nope}\n```").unwrap_err();
        assert!(matches!(err, ParseError::InvalidJson(_)));
        assert!(err.to_string().starts_with("invalid JSON"));
    }

    #[test]
    fn sectioned_content_is_rendered() {
        let text = r#"```json
{
  "content": {
    "answer": "Send the token in the Authorization header.",
    "authentication": "Token $auth_token",
    "limitations": "",
    "relatedEndpoints": ["/screener/company", "/data_lab/investor_portfolio"]
  }
}
```"#;
        let a = parse_answer(text).unwrap();
        assert_eq!(
            a.content,
            "Send the token in the Authorization header.\n\n\
             Authentication: Token $auth_token\n\n\
             Related endpoints: /screener/company, /data_lab/investor_portfolio"
        );
        assert!(a.api.is_none());
        assert!(a.code.is_none());
    }

    #[test]
    fn api_alias_and_code_object() {
        let text = r#"```json
{"content":"Use GET.","api":"GET /data_lab/investor_portfolio","code":{"curl":"curl 'https://x'","parameters":{"investor_uuid":"uuid"}}}
```"#;
        let a = parse_answer(text).unwrap();
        assert_eq!(a.api.as_deref(), Some("GET /data_lab/investor_portfolio"));
        let code = a.code.unwrap();
        assert_eq!(code.curl.as_deref(), Some("curl 'https://x'"));
        assert_eq!(code.parameters.as_deref(), Some(r#"{"investor_uuid":"uuid"}"#));
        assert!(code.response.is_none());
    }

    #[test]
    fn bare_code_string_is_classified() {
        let curl = parse_answer("```json\n{\"content\":\"x\",\"code\":\"curl -X GET https://x\"}\n```").unwrap();
        assert!(curl.code.unwrap().curl.is_some());
        let other = parse_answer("```json\n{\"content\":\"x\",\"code\":\"fetch('/x')\"}\n```").unwrap();
        assert_eq!(other.code.unwrap().example.as_deref(), Some("fetch('/x')"));
    }

    #[test]
    fn bad_shapes_are_rejected() {
        for body in [r#"[1,2]"#, r#"{"API":"x"}"#, r#"{"content":42}"#, r#"{"content":"  "}"#] {
            let text = format!("```json\n{body}\n```");
            assert!(matches!(parse_answer(&text), Err(ParseError::Shape(_))), "{body}");
        }
    }
}
