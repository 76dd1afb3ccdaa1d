use crate::config::LlmSettings;
use crate::models::{Recommendation, UserProfile};
use crate::services::spots::SpotCatalog;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when asking the LLM for a recommendation
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("LLM API returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Could not parse recommendation: {0}")]
    UnparseableAnswer(String),
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Chat-completions client used as the study-spot recommender
///
/// Talks to any OpenAI-compatible `/chat/completions` endpoint.
pub struct LlmClient {
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    campus: String,
    client: Client,
}

impl LlmClient {
    pub fn new(settings: &LlmSettings) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            campus: settings.campus.clone(),
            client,
        })
    }

    /// Build the user prompt for a profile and the spot catalog
    pub fn build_prompt(&self, profile: &UserProfile, catalog: &SpotCatalog) -> String {
        let mut shareable = profile.clone();
        shareable.created_at = None;
        shareable.updated_at = None;
        let profile_json = serde_json::to_string_pretty(&shareable)
            .unwrap_or_else(|_| profile.email.clone());

        format!(
            "Recommend one study spot at {campus} for this student.\n\n\
             Student profile:\n{profile_json}\n\n\
             Available study spots (name: tags):\n{spots}\n\n\
             Answer with a JSON object and nothing else, with two fields:\n\
             - \"spot\": the exact name of one spot from the list\n\
             - \"reason\": one short sentence on why it suits the student\n\n\
             Example: {{\"spot\": \"{example}\", \"reason\": \"Quiet, open late, individual desks\"}}",
            campus = self.campus,
            profile_json = profile_json,
            spots = catalog.knowledge_base(),
            example = catalog
                .spots()
                .first()
                .map(|spot| spot.name.as_str())
                .unwrap_or("Library"),
        )
    }

    /// Ask the model to pick a study spot for the profile
    pub async fn recommend(
        &self,
        profile: &UserProfile,
        catalog: &SpotCatalog,
    ) -> Result<Recommendation, LlmError> {
        let url = format!("{}/chat/completions", self.endpoint.trim_end_matches('/'));

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: format!("You are a study space recommender for {}.", self.campus),
                },
                ChatMessage {
                    role: "user",
                    content: self.build_prompt(profile, catalog),
                },
            ],
            temperature: self.temperature,
        };

        tracing::debug!("Requesting recommendation for {} from {}", profile.email, url);

        let mut request = self.client.post(&url).json(&body);
        if !self.api_key.is_empty() {
            request = request.bearer_auth(&self.api_key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("LLM request for {} failed: {} - {}", profile.email, status, body);
            return Err(LlmError::ApiError { status, body });
        }

        let chat: ChatResponse = response.json().await?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("Missing message content".into()))?;

        let recommendation = parse_recommendation(&content)?;
        tracing::info!("Recommended {} for {}", recommendation.spot, profile.email);

        Ok(recommendation)
    }
}

/// Extract a `{spot, reason}` object from free-form model output
///
/// Models often wrap the object in prose or code fences, so the outermost
/// brace-delimited block is parsed.
pub fn parse_recommendation(content: &str) -> Result<Recommendation, LlmError> {
    let start = content.find('{');
    let end = content.rfind('}');

    let json = match (start, end) {
        (Some(start), Some(end)) if start < end => &content[start..=end],
        _ => return Err(LlmError::UnparseableAnswer(truncate(content))),
    };

    let recommendation: Recommendation = serde_json::from_str(json)
        .map_err(|e| LlmError::UnparseableAnswer(format!("{}: {}", e, truncate(json))))?;

    if recommendation.spot.trim().is_empty() {
        return Err(LlmError::UnparseableAnswer("Empty spot name".into()));
    }

    Ok(recommendation)
}

fn truncate(text: &str) -> String {
    text.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StudySpot;

    fn create_settings(endpoint: &str) -> LlmSettings {
        LlmSettings {
            endpoint: endpoint.to_string(),
            api_key: "test_key".to_string(),
            model: "test-model".to_string(),
            temperature: 0.0,
            timeout_secs: 5,
            campus: "Purdue University".to_string(),
        }
    }

    fn create_catalog() -> SpotCatalog {
        SpotCatalog::new(vec![StudySpot {
            name: "Hicks Undergraduate Library".to_string(),
            tags: vec!["quiet".to_string()],
            lat: 40.4246,
            lng: -86.9125,
        }])
    }

    #[test]
    fn test_parse_plain_object() {
        let rec = parse_recommendation(r#"{"spot": "Hicks", "reason": "Quiet"}"#).unwrap();
        assert_eq!(rec.spot, "Hicks");
        assert_eq!(rec.reason, "Quiet");
    }

    #[test]
    fn test_parse_fenced_object() {
        let content = "Sure! Here you go:\n```json\n{\"spot\": \"WALC\", \"reason\": \"Group rooms\"}\n```";
        let rec = parse_recommendation(content).unwrap();
        assert_eq!(rec.spot, "WALC");
    }

    #[test]
    fn test_parse_rejects_prose() {
        assert!(matches!(
            parse_recommendation("Try the library."),
            Err(LlmError::UnparseableAnswer(_))
        ));
        assert!(matches!(
            parse_recommendation(r#"{"spot": "", "reason": "x"}"#),
            Err(LlmError::UnparseableAnswer(_))
        ));
    }

    #[test]
    fn test_prompt_mentions_catalog_and_profile() {
        let client = LlmClient::new(&create_settings("http://localhost")).unwrap();
        let mut profile = UserProfile::new("alice@purdue.edu");
        profile.comfort_level = Some("quiet".to_string());

        let prompt = client.build_prompt(&profile, &create_catalog());

        assert!(prompt.contains("Purdue University"));
        assert!(prompt.contains("Hicks Undergraduate Library: quiet"));
        assert!(prompt.contains("\"comfortLevel\": \"quiet\""));
    }

    #[tokio::test]
    async fn test_recommend_against_mock_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test_key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"role":"assistant","content":"{\"spot\":\"Hicks Undergraduate Library\",\"reason\":\"Quiet desks\"}"}}]}"#,
            )
            .create_async()
            .await;

        let client = LlmClient::new(&create_settings(&server.url())).unwrap();
        let rec = client
            .recommend(&UserProfile::new("alice@purdue.edu"), &create_catalog())
            .await
            .unwrap();

        assert_eq!(rec.spot, "Hicks Undergraduate Library");
        assert_eq!(rec.reason, "Quiet desks");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_recommend_reports_api_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let client = LlmClient::new(&create_settings(&server.url())).unwrap();
        let result = client
            .recommend(&UserProfile::new("alice@purdue.edu"), &create_catalog())
            .await;

        match result {
            Err(LlmError::ApiError { status, body }) => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("expected ApiError, got {:?}", other),
        }
    }
}
