use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::catalog::display_name;
use super::TipError;
use crate::config::TipsConfig;

const SYSTEM_PROMPT: &str = "You are a helpful Canadian immigration expert assistant.";
const MAX_TOKENS: u32 = 300;
const TEMPERATURE: f32 = 0.7;

/// External text generator behind AI tips.
#[async_trait]
pub trait TipGenerator: Send + Sync {
    async fn generate_tip(&self, field_name: &str, context: &Value) -> Result<String, TipError>;
}

pub(crate) fn tip_prompt(field_name: &str, context: &Value) -> String {
    let context = serde_json::to_string_pretty(context).unwrap_or_else(|_| "{}".to_string());
    format!(
        "You are an expert on Canadian immigration and IRCC study permit applications.\n\n\
         Field: {}\n\
         Context: {context}\n\n\
         Provide clear, concise guidance for this field in the study permit application. Include:\n\
         1. What this field means\n\
         2. What information should be provided\n\
         3. Common mistakes to avoid\n\
         4. Any IRCC-specific requirements\n\n\
         Keep the response under 200 words and be practical and helpful.",
        display_name(field_name)
    )
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Chat-completions client for OpenAI-compatible endpoints.
pub struct OpenAiTipGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiTipGenerator {
    /// `None` when no API key is configured.
    pub fn from_config(config: &TipsConfig) -> Option<Self> {
        let api_key = config.openai_api_key.clone()?;
        Some(Self {
            client: reqwest::Client::new(),
            api_key,
            model: config.model.clone(),
            endpoint: format!(
                "{}/chat/completions",
                config.base_url.trim_end_matches('/')
            ),
        })
    }
}

#[async_trait]
impl TipGenerator for OpenAiTipGenerator {
    async fn generate_tip(&self, field_name: &str, context: &Value) -> Result<String, TipError> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": tip_prompt(field_name, context) },
            ],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TipError::Response(format!(
                "chat completion returned {status}"
            )));
        }

        let completion: ChatCompletion = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| TipError::Response("chat completion had no content".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn prompt_names_the_field_and_context() {
        let prompt = tip_prompt("studyDetails.dliNumber", &json!({ "schoolName": "UBC" }));
        assert!(prompt.contains("Field: Dli Number"));
        assert!(prompt.contains("\"schoolName\": \"UBC\""));
    }

    #[test]
    fn generator_requires_an_api_key() {
        let mut config = TipsConfig {
            openai_api_key: None,
            model: "gpt-3.5-turbo".to_string(),
            base_url: "https://api.openai.com/v1/".to_string(),
            timeout: Duration::from_secs(10),
        };
        assert!(OpenAiTipGenerator::from_config(&config).is_none());

        config.openai_api_key = Some("sk-test".to_string());
        let generator = OpenAiTipGenerator::from_config(&config).expect("configured");
        assert_eq!(
            generator.endpoint,
            "https://api.openai.com/v1/chat/completions"
        );
    }
}
