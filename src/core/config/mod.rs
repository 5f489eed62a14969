use std::collections::HashMap;

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_LLM_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_TICKET_API_ENDPOINT: &str = "https://api.example.com/tickets";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub llm: LlmConfig,
    pub ticket_api_endpoint: String,
    pub log_level: String,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub debug: bool,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

/// Settings for the chat-completions endpoint used by the classifier.
/// `api_key` absent means classification is disabled.
#[derive(Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl AppConfig {
    /// Reads the process environment once; call after `dotenvy::dotenv()`.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::from_map(&std::env::vars().collect())
    }

    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, anyhow::Error> {
        let get_str = |key: &str, default: &str| -> String {
            vars.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let get_opt = |key: &str| -> Option<String> {
            vars.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let get_bool = |key: &str, default: bool| -> bool {
            vars.get(key)
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
                .unwrap_or(default)
        };

        let port = match get_opt("API_PORT") {
            Some(v) => v
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("API_PORT must be a port number, got {v:?}: {e}"))?,
            None => 8000,
        };

        let pool_size = match get_opt("DB_POOL_SIZE") {
            Some(v) => v
                .parse::<u32>()
                .map_err(|e| anyhow::anyhow!("DB_POOL_SIZE must be a positive integer: {e}"))?,
            None => 8,
        };

        let debug = get_bool("DEBUG", true);
        let log_level = get_opt("LOG_LEVEL")
            .map(|l| l.to_lowercase())
            .unwrap_or_else(|| if debug { "debug" } else { "info" }.to_string());

        Ok(AppConfig {
            server: ServerConfig {
                host: get_str("API_HOST", "0.0.0.0"),
                port,
                debug,
            },
            database: DatabaseConfig {
                url: get_str("DATABASE_URL", "ticket_assistant.db"),
                pool_size,
            },
            llm: LlmConfig {
                api_key: get_opt("GROQ_API_KEY"),
                base_url: get_str("LLM_BASE_URL", DEFAULT_LLM_BASE_URL),
                model: get_str("LLM_MODEL", DEFAULT_LLM_MODEL),
                temperature: 0.1,
                max_tokens: 1000,
            },
            ticket_api_endpoint: get_str("TICKET_API_ENDPOINT", DEFAULT_TICKET_API_ENDPOINT),
            log_level,
        })
    }
}
