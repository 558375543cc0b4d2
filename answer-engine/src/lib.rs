//! Retrieval-augmented answering over API documentation.
//!
//! Public entry point: [`DocsAssistant::ask`]. It embeds the question together
//! with prior turns (recency weighted), retrieves the top-K documentation
//! chunks, and, when the best match is relevant enough, asks the generative
//! model for a structured answer. Otherwise it returns a fixed fallback
//! without calling the model.
//!
//! Every collaborator (embedder, store, generator, intent classifier) is
//! injected, so the pipeline runs against fakes in tests.

pub mod answer;
pub mod cfg;
pub mod embed;
pub mod envelope;
pub mod error;
pub mod ingest;
pub mod intent;
pub mod llm;
pub mod prompt;
pub mod query;
pub mod retrieve;

use std::sync::Arc;

use doc_store::VectorStoreClient;
use tracing::{info, instrument};

pub use answer::{AnswerComposer, CodeExample, StructuredAnswer};
pub use cfg::EngineConfig;
pub use embed::{EmbeddingsProvider, EngineFuture, LlmEmbedder};
pub use error::{EngineError, ParseError};
pub use ingest::IngestionWriter;
pub use intent::{CodeRequestClassifier, KeywordClassifier};
pub use llm::{Generator, LlmGenerator};
pub use query::{Message, QueryComposer, Role};
pub use retrieve::{Retrieval, Retriever};

/// Result of [`DocsAssistant::ask`].
#[derive(Clone, Debug, PartialEq)]
pub enum AskOutcome {
    /// Grounded answer from the model.
    Answered(StructuredAnswer),
    /// Relevance gate closed; carries the fallback content.
    NoConfidentMatch(StructuredAnswer),
}

impl AskOutcome {
    pub fn into_answer(self) -> StructuredAnswer {
        match self {
            AskOutcome::Answered(a) | AskOutcome::NoConfidentMatch(a) => a,
        }
    }

    pub fn is_confident(&self) -> bool {
        matches!(self, AskOutcome::Answered(_))
    }
}

/// Query Composer → Retriever → Answer Composer.
pub struct DocsAssistant {
    query: QueryComposer,
    retriever: Retriever,
    answers: AnswerComposer,
    fallback: String,
}

impl DocsAssistant {
    /// Wires the pipeline with the keyword intent classifier.
    pub fn new(
        cfg: &EngineConfig,
        embedder: Arc<dyn EmbeddingsProvider>,
        store: Arc<dyn VectorStoreClient>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self::with_classifier(cfg, embedder, store, generator, Arc::new(KeywordClassifier))
    }

    /// Same as [`DocsAssistant::new`] with a custom intent classifier.
    pub fn with_classifier(
        cfg: &EngineConfig,
        embedder: Arc<dyn EmbeddingsProvider>,
        store: Arc<dyn VectorStoreClient>,
        generator: Arc<dyn Generator>,
        classifier: Arc<dyn CodeRequestClassifier>,
    ) -> Self {
        Self {
            query: QueryComposer::new(embedder, cfg.recency_decay, cfg.embed_concurrency),
            retriever: Retriever::new(store, cfg.namespace.clone(), cfg.top_k, cfg.min_score),
            answers: AnswerComposer::new(generator, classifier),
            fallback: cfg.fallback_message.clone(),
        }
    }

    /// Answers `question`, using `prev` (oldest first) as conversation history.
    ///
    /// # Errors
    /// Any embedding, store, generation or parse failure; none are retried.
    #[instrument(skip_all, fields(history = prev.len()))]
    pub async fn ask(&self, question: &str, prev: &[String]) -> Result<AskOutcome, EngineError> {
        let vector = self.query.compose(question, prev).await?;

        match self.retriever.retrieve(vector).await? {
            Retrieval::Ranked(matches) => {
                let answer = self.answers.compose(&matches, question).await?;
                Ok(AskOutcome::Answered(answer))
            }
            Retrieval::NoConfidentMatch => {
                info!("returning fallback answer");
                Ok(AskOutcome::NoConfidentMatch(StructuredAnswer::text(
                    self.fallback.clone(),
                )))
            }
        }
    }
}
