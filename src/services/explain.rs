use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AppError, AppResult};

const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 512;

/// Client for the external explanation generator.
///
/// Calls an OpenAI-compatible chat completion API with a user-profile
/// summary and a recipe summary, returning prose. Failures are surfaced to
/// the caller, never retried here.
pub struct Explainer {
    http_client: HttpClient,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl Explainer {
    pub fn new(config: &Config) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url: config.explain_api_url.clone(),
            api_key: config.explain_api_key.clone(),
            model: config.explain_model.clone(),
        }
    }

    /// Generates a dietitian-style explanation for a set of recommended
    /// recipes.
    pub async fn generate_explanation(
        &self,
        user_profile: &str,
        recipes: &str,
    ) -> AppResult<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(AppError::ExternalApi(
                "Explanation API key is not configured".to_string(),
            ));
        };

        let prompt = format!(
            "You are a registered dietitian. Based on the information below, \
             write a short explanation of the recommended meals in three lines: \
             1. calorie and macronutrient overview; \
             2. why these recipes fit the user's targets; \
             3. anything to watch out for.\n\n\
             User profile: {user_profile}\n\
             Recommended recipes: {recipes}"
        );

        let url = format!("{}/chat/completions", self.api_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Explanation API returned status {}: {}",
                status, body
            )));
        }

        let chat_response: ChatResponse = response.json().await?;

        chat_response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(|content| content.trim().to_string())
            .ok_or_else(|| {
                AppError::ExternalApi("Explanation API returned no content".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_without_key() -> Config {
        Config {
            database_url: "postgres://localhost/test".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            explain_api_url: "http://localhost:9".to_string(),
            explain_api_key: None,
            explain_model: "test-model".to_string(),
            plan_cache_capacity: 8,
            plan_cache_ttl_secs: 1800,
        }
    }

    #[tokio::test]
    async fn test_missing_api_key_is_surfaced_not_retried() {
        let explainer = Explainer::new(&config_without_key());
        let result = explainer
            .generate_explanation("calories: 2000", "Chicken bowl (600 kcal)")
            .await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }
}
