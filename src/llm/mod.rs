use async_trait::async_trait;
use serde_json::Value;

use crate::core::config::LlmConfig;

#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Sends one system + user exchange and returns the first completion's text.
    async fn generate(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

/// Client for any OpenAI-compatible chat-completions API (Groq by default).
pub struct OpenAIClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAIClient {
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url
                .unwrap_or_else(|| crate::core::config::DEFAULT_LLM_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: crate::core::config::DEFAULT_LLM_MODEL.to_string(),
            temperature: 0.1,
            max_tokens: 1000,
        }
    }

    /// `None` when no API key is configured.
    pub fn from_config(config: &LlmConfig) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        let mut client = Self::new(api_key, Some(config.base_url.clone()));
        client.model = config.model.clone();
        client.temperature = config.temperature;
        client.max_tokens = config.max_tokens;
        Some(client)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LLMProvider for OpenAIClient {
    async fn generate(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&serde_json::json!({
                "model": self.model,
                "messages": [
                    {"role": "system", "content": system},
                    {"role": "user", "content": prompt}
                ],
                "temperature": self.temperature,
                "max_tokens": self.max_tokens
            }))
            .send()
            .await?
            .error_for_status()?;

        let result: Value = response.json().await?;
        let content = result["choices"][0]["message"]["content"]
            .as_str()
            .ok_or("completion response has no choices[0].message.content")?;

        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generate_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer gsk_test")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "model": "llama-3.3-70b-versatile",
                "max_tokens": 1000
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"role":"assistant","content":"{\"department\":\"api\"}"}}]}"#,
            )
            .create_async()
            .await;

        let client = OpenAIClient::new("gsk_test".to_string(), Some(server.url()));
        let text = client.generate("system", "prompt").await.unwrap();

        assert_eq!(text, r#"{"department":"api"}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_http_error_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":{"message":"invalid api key"}}"#)
            .create_async()
            .await;

        let client = OpenAIClient::new("bad".to_string(), Some(server.url()));
        assert!(client.generate("system", "prompt").await.is_err());
    }

    #[tokio::test]
    async fn test_missing_content_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let client = OpenAIClient::new("gsk_test".to_string(), Some(server.url()));
        assert!(client.generate("system", "prompt").await.is_err());
    }

    #[test]
    fn test_from_config_requires_key() {
        let mut config = crate::core::config::AppConfig::from_map(&Default::default())
            .unwrap()
            .llm;
        assert!(OpenAIClient::from_config(&config).is_none());

        config.api_key = Some("gsk_test".to_string());
        config.model = "mixtral".to_string();
        let client = OpenAIClient::from_config(&config).unwrap();
        assert_eq!(client.model(), "mixtral");
    }
}
