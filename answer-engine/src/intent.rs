//! Code-request intent classification.
//!
//! A question counts as a code request when it mentions any of a fixed set of
//! keywords, case-insensitively. Paraphrases without those words are missed
//! and words like "rapid" match `api`; both are accepted limitations.

use std::sync::LazyLock;

use regex::Regex;

const CODE_REQUEST_PATTERN: &str =
    r"(?i)(code|example|curl|api|endpoint|reference|how to use|implementation|snippet)";

static CODE_REQUEST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(CODE_REQUEST_PATTERN).expect("code-request pattern compiles"));

/// Swappable strategy: `question -> is this a code request?`
pub trait CodeRequestClassifier: Send + Sync {
    fn is_code_request(&self, question: &str) -> bool;
}

impl<F> CodeRequestClassifier for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_code_request(&self, question: &str) -> bool {
        self(question)
    }
}

/// Keyword classifier used by default.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeywordClassifier;

impl CodeRequestClassifier for KeywordClassifier {
    fn is_code_request(&self, question: &str) -> bool {
        CODE_REQUEST.is_match(question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_match_case_insensitively() {
        let c = KeywordClassifier;
        assert!(c.is_code_request("Show me a CURL example for the portfolio endpoint"));
        assert!(c.is_code_request("How to use the search filters?"));
        assert!(c.is_code_request("Any Snippet?"));
        assert!(!c.is_code_request("How do I authenticate?"));
        assert!(!c.is_code_request("What are the rate limits?"));
    }

    #[test]
    fn closures_are_classifiers() {
        let always = |_: &str| true;
        assert!(always.is_code_request("anything"));
    }
}
