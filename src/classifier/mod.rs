pub mod handlers;
pub mod keyword;
pub mod parser;
pub mod prompt;

use std::sync::Arc;

use async_trait::async_trait;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::core::shared::enums::{Department, Severity};
use crate::llm::LLMProvider;

pub use handlers::configure_classifier_routes;
pub use keyword::KeywordClassifier;

pub const API_ERROR_REASONING: &str = "Classification failed due to API error";
pub const PARSE_ERROR_REASONING: &str = "Failed to parse classification response";

/// Routing verdict for one error report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub department: Department,
    pub severity: Severity,
    pub confidence: f64,
    pub reasoning: String,
    pub suggested_actions: Vec<String>,
}

impl ClassificationResult {
    pub fn fallback(reasoning: &str) -> Self {
        Self {
            department: Department::General,
            severity: Severity::Medium,
            confidence: 0.5,
            reasoning: reasoning.to_string(),
            suggested_actions: vec!["Manual review required".to_string()],
        }
    }
}

/// Infallible by contract: implementations degrade to a fallback verdict
/// instead of returning an error.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(
        &self,
        description: &str,
        error_message: Option<&str>,
        context: Option<&str>,
    ) -> ClassificationResult;
}

pub struct LlmClassifier {
    provider: Arc<dyn LLMProvider>,
}

impl LlmClassifier {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl Classifier for LlmClassifier {
    async fn classify(
        &self,
        description: &str,
        error_message: Option<&str>,
        context: Option<&str>,
    ) -> ClassificationResult {
        let user_prompt = prompt::build_classification_prompt(description, error_message, context);

        let reply = match self.provider.generate(prompt::SYSTEM_PROMPT, &user_prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("LLM classification request failed: {e}");
                return ClassificationResult::fallback(API_ERROR_REASONING);
            }
        };

        match parser::parse_classification(&reply) {
            Ok(result) => {
                info!(
                    "Classified report as {}/{} (confidence {:.2})",
                    result.department, result.severity, result.confidence
                );
                result
            }
            Err(e) => {
                warn!("Failed to parse classification response: {e}");
                ClassificationResult::fallback(PARSE_ERROR_REASONING)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shared::test_utils::MockLLMProvider;

    #[tokio::test]
    async fn test_well_formed_reply_is_used() {
        let provider = MockLLMProvider::with_response(
            r#"Analysis: {"department": "database", "severity": "high", "confidence": 0.9, "reasoning": "Connection pool exhausted", "suggested_actions": ["Raise pool size"]}"#,
        );
        let classifier = LlmClassifier::new(Arc::new(provider));

        let result = classifier
            .classify("Queries time out", Some("PoolTimeout"), None)
            .await;

        assert_eq!(result.department, Department::Database);
        assert_eq!(result.severity, Severity::High);
        assert_eq!(result.confidence, 0.9);
        assert_eq!(result.reasoning, "Connection pool exhausted");
        assert_eq!(result.suggested_actions, vec!["Raise pool size".to_string()]);
    }

    #[tokio::test]
    async fn test_provider_error_falls_back() {
        let classifier = LlmClassifier::new(Arc::new(MockLLMProvider::failing("connection refused")));

        let result = classifier.classify("anything", None, None).await;

        assert_eq!(result, ClassificationResult::fallback(API_ERROR_REASONING));
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.suggested_actions, vec!["Manual review required".to_string()]);
    }

    #[tokio::test]
    async fn test_unparseable_reply_falls_back() {
        for reply in [
            "I cannot classify this.",
            r#"{"department": "marketing"}"#,
            r#"{"department": null, "severity": "low"}"#,
            r#"{"department": "api", "severity": }"#,
        ] {
            let classifier = LlmClassifier::new(Arc::new(MockLLMProvider::with_response(reply)));
            let result = classifier.classify("anything", None, None).await;
            assert_eq!(result, ClassificationResult::fallback(PARSE_ERROR_REASONING));
        }
    }
}
