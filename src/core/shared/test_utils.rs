use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;

use crate::classifier::{Classifier, LlmClassifier};
use crate::core::config::AppConfig;
use crate::core::shared::state::AppState;
use crate::core::shared::utils::{create_conn, run_migrations, DbPool};
use crate::llm::LLMProvider;

#[derive(Debug)]
pub struct MockLLMProvider {
    pub response: Result<String, String>,
}

impl MockLLMProvider {
    pub fn new() -> Self {
        Self::with_response("{}")
    }

    pub fn with_response(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            response: Err(error.to_string()),
        }
    }
}

impl Default for MockLLMProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMProvider for MockLLMProvider {
    async fn generate(
        &self,
        _system: &str,
        _prompt: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.response.clone().map_err(Into::into)
    }
}

/// Migrated SQLite pool in a temp dir; keep the `TempDir` alive for the test.
pub fn test_pool() -> (TempDir, DbPool) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("tickets.db");
    let pool = create_conn(path.to_str().expect("utf-8 path"), 2).expect("pool");
    run_migrations(&pool).expect("migrations");
    (dir, pool)
}

pub fn test_config() -> AppConfig {
    AppConfig::from_map(&HashMap::new()).expect("default config")
}

/// State without an LLM classifier, as when `GROQ_API_KEY` is unset.
pub fn test_state() -> (TempDir, Arc<AppState>) {
    let (dir, pool) = test_pool();
    let state = AppState::new(pool, test_config()).expect("state");
    (dir, Arc::new(state))
}

/// State whose LLM classifier answers with `reply`.
pub fn test_state_with_llm_reply(reply: &str) -> (TempDir, Arc<AppState>) {
    let (dir, pool) = test_pool();
    let mut state = AppState::new(pool, test_config()).expect("state");
    state.classifier = Some(Arc::new(LlmClassifier::new(Arc::new(
        MockLLMProvider::with_response(reply),
    ))) as Arc<dyn Classifier>);
    (dir, Arc::new(state))
}
