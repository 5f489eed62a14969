use std::sync::Arc;
use std::time::Duration;

use crate::classifier::{Classifier, KeywordClassifier, LlmClassifier};
use crate::core::config::AppConfig;
use crate::core::shared::error::ApiError;
use crate::core::shared::utils::DbPool;
use crate::llm::OpenAIClient;

pub const LEGACY_FORWARD_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared by every handler through axum `State`. Built once in `main`.
#[derive(Clone)]
pub struct AppState {
    pub conn: DbPool,
    pub config: AppConfig,
    /// `None` when no `GROQ_API_KEY` is configured.
    pub classifier: Option<Arc<dyn Classifier>>,
    /// Offline classifier behind the mock endpoints.
    pub mock_classifier: Arc<dyn Classifier>,
    /// Outbound client for the legacy ticket forwarder.
    pub http_client: reqwest::Client,
}

impl AppState {
    pub fn new(conn: DbPool, config: AppConfig) -> Result<Self, anyhow::Error> {
        let classifier = OpenAIClient::from_config(&config.llm)
            .map(|client| Arc::new(LlmClassifier::new(Arc::new(client))) as Arc<dyn Classifier>);

        if classifier.is_some() {
            log::info!("LLM classifier initialized with model {}", config.llm.model);
        } else {
            log::warn!("GROQ_API_KEY not set; classification endpoints are disabled");
        }

        let http_client = reqwest::Client::builder()
            .timeout(LEGACY_FORWARD_TIMEOUT)
            .build()?;

        Ok(Self {
            conn,
            config,
            classifier,
            mock_classifier: Arc::new(KeywordClassifier),
            http_client,
        })
    }

    pub fn classifier_available(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn require_classifier(&self) -> Result<Arc<dyn Classifier>, ApiError> {
        self.classifier.clone().ok_or_else(|| {
            ApiError::ClassifierUnavailable(
                "Classifier not initialized. Please check GROQ_API_KEY.".to_string(),
            )
        })
    }
}
