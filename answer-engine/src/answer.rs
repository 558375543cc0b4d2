//! Structured answers and the composer that produces them.

use std::sync::Arc;

use doc_store::ScoredMatch;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::envelope::parse_answer;
use crate::error::EngineError;
use crate::intent::CodeRequestClassifier;
use crate::llm::Generator;
use crate::prompt::{flatten_snippets, role_prompt, task_prompt};

/// Wire shape: `{ content, API?, code? }`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredAnswer {
    pub content: String,
    #[serde(
        rename = "API",
        alias = "api",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub api: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeExample>,
}

impl StructuredAnswer {
    /// Content-only answer.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }
}

/// Code section of an answer; every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeExample {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curl: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

impl CodeExample {
    pub fn is_empty(&self) -> bool {
        self.curl.is_none()
            && self.example.is_none()
            && self.parameters.is_none()
            && self.response.is_none()
    }
}

/// Builds prompts from ranked matches, calls the generator, parses the reply.
pub struct AnswerComposer {
    generator: Arc<dyn Generator>,
    classifier: Arc<dyn CodeRequestClassifier>,
}

impl AnswerComposer {
    pub fn new(generator: Arc<dyn Generator>, classifier: Arc<dyn CodeRequestClassifier>) -> Self {
        Self {
            generator,
            classifier,
        }
    }

    /// Composes an answer for `question` grounded on `matches`.
    ///
    /// For questions that are not code requests, `API` and `code` are dropped
    /// even when the model volunteers them. A code request whose reply lacks
    /// them still yields a content-only answer.
    ///
    /// # Errors
    /// [`EngineError::Generation`] when the model call fails and
    /// [`EngineError::Parse`] when its reply has no valid JSON envelope.
    pub async fn compose(
        &self,
        matches: &[ScoredMatch],
        question: &str,
    ) -> Result<StructuredAnswer, EngineError> {
        let snippets = flatten_snippets(matches);
        let code_request = self.classifier.is_code_request(question);
        debug!(snippets = snippets.len(), code_request, "building prompts");

        let parts = vec![
            role_prompt(code_request),
            task_prompt(question, &snippets, code_request),
        ];
        let raw = self.generator.generate(&parts).await?;

        let mut answer = parse_answer(&raw).inspect_err(|e| {
            error!(error = %e, reply_len = raw.len(), "model reply rejected");
        })?;
        if !code_request {
            answer.api = None;
            answer.code = None;
        }

        info!(
            has_api = answer.api.is_some(),
            has_code = answer.code.is_some(),
            "answer composed"
        );
        Ok(answer)
    }
}
