use serde::Deserialize;

/// Request payload for /api/search.
#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    /// The user's question.
    #[serde(default)]
    pub question: Option<String>,
    /// Earlier user messages, oldest first.
    #[serde(default)]
    pub prev: Option<Vec<String>>,
}

impl SearchRequest {
    /// Question with surrounding whitespace removed; `None` when missing or blank.
    pub fn question(&self) -> Option<&str> {
        self.question
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_question_counts_as_missing() {
        let req: SearchRequest = serde_json::from_str(r#"{"question":"   "}"#).unwrap();
        assert_eq!(req.question(), None);
        assert!(req.prev.is_none());
    }

    #[test]
    fn prev_is_optional() {
        let req: SearchRequest =
            serde_json::from_str(r#"{"question":" hi ","prev":["a","b"]}"#).unwrap();
        assert_eq!(req.question(), Some("hi"));
        assert_eq!(req.prev.unwrap().len(), 2);
    }
}
