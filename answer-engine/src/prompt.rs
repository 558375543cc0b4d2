//! Prompt builders: a role prompt fixing the output shape, and a task prompt
//! carrying the question plus the retrieved documentation.

use doc_store::ScoredMatch;

/// Flattens every match's `data` into one snippet list, in rank order.
pub fn flatten_snippets(matches: &[ScoredMatch]) -> Vec<String> {
    matches
        .iter()
        .filter_map(|m| m.metadata.as_ref())
        .flat_map(|md| md.data.snippets())
        .map(str::to_string)
        .collect()
}

/// Role/instruction prompt. The JSON shape depends on `code_request`.
pub fn role_prompt(code_request: bool) -> String {
    let code_fields = if code_request {
        r#",
    "API": "METHOD and full URL of the main endpoint",
    "code": {
        "curl": "Complete curl example with headers and body",
        "parameters": "Explanation of each parameter used",
        "response": "Example response format"
    }"#
    } else {
        ""
    };

    format!(
        r#"You are a specialized API documentation assistant. Your purpose is to provide accurate, detailed responses based on the provided API documentation.

Analysis Requirements:
1. Thoroughly examine ALL provided documentation sections
2. Cross-reference related endpoints and features
3. Consider authentication, rate limits, and dependencies
4. Look for specific version requirements or deprecation notices

Reply with a single JSON object inside a ```json fenced code block, with this structure:
{{
    "content": {{
        "answer": "Primary response to the question",
        "authentication": "Required auth details if applicable",
        "limitations": "Rate limits, restrictions, or prerequisites if applicable",
        "relatedEndpoints": "List of related endpoints if relevant"
    }}{code_fields}
}}"#
    )
}

/// Task prompt with the question and the documentation as a JSON array.
pub fn task_prompt(question: &str, snippets: &[String], code_request: bool) -> String {
    let docs = serde_json::to_string_pretty(snippets).unwrap_or_else(|_| "[]".into());
    let focus = if code_request {
        "Provide complete, tested code examples"
    } else {
        "Focus on functional explanation"
    };

    format!(
        r#"Context: Analyze the following API documentation to answer this question: "{question}"

Documentation to analyze:
{docs}

Response Requirements:
1. Search thoroughly through ALL documentation sections
2. Verify compatibility and version requirements
3. Include all necessary authentication details
4. {focus}
5. Mention any relevant rate limits or restrictions
6. Reference related endpoints or features that may be helpful

Format your response as a valid JSON object following the structure defined above."#,
        question = question.trim()
    )
}

#[cfg(test)]
mod tests {
    use doc_store::{DocData, DocMetadata};

    use super::*;

    fn hit(score: f32, data: DocData) -> ScoredMatch {
        ScoredMatch {
            id: String::new(),
            score,
            metadata: Some(DocMetadata { data }),
        }
    }

    #[test]
    fn flattening_keeps_rank_order() {
        let matches = vec![
            hit(0.9, DocData::Many(vec!["a".into(), "b".into()])),
            ScoredMatch {
                id: String::new(),
                score: 0.8,
                metadata: None,
            },
            hit(0.7, DocData::One("c".into())),
        ];
        assert_eq!(flatten_snippets(&matches), vec!["a", "b", "c"]);
    }

    #[test]
    fn role_prompt_schema_follows_intent() {
        assert!(role_prompt(true).contains(r#""curl""#));
        assert!(role_prompt(true).contains(r#""API""#));
        assert!(!role_prompt(false).contains(r#""code""#));
        assert!(role_prompt(false).contains("```json"));
    }

    #[test]
    fn task_prompt_embeds_question_and_docs() {
        let p = task_prompt("  How do I authenticate? ", &["Use a bearer token.".into()], false);
        assert!(p.contains(r#"question: "How do I authenticate?""#));
        assert!(p.contains(r#""Use a bearer token.""#));
        assert!(p.contains("Focus on functional explanation"));
    }
}
