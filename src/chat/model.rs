use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::UpstreamError;
use crate::config::GenerationParams;
use crate::models::{ChatMessage, ChatRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    pub role: TurnRole,
    pub parts: Vec<Part>,
}

impl Turn {
    pub fn new(role: TurnRole, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_instruction: String,
    pub contents: Vec<Turn>,
    pub params: GenerationParams,
}

pub fn build_contents(history: &[ChatMessage], message: &str, window: usize) -> Vec<Turn> {
    let start = history.len().saturating_sub(window);
    let mut contents: Vec<Turn> = history[start..]
        .iter()
        .map(|msg| {
            let role = match msg.role {
                ChatRole::User => TurnRole::User,
                ChatRole::Assistant => TurnRole::Model,
            };
            Turn::new(role, msg.content.clone())
        })
        .collect();

    contents.push(Turn::new(TurnRole::User, message));
    contents
}

#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(
        &self,
        model: &str,
        request: &GenerationRequest,
    ) -> Result<String, UpstreamError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    system_instruction: GeminiInstruction<'a>,
    contents: &'a [Turn],
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize)]
struct GeminiInstruction<'a> {
    parts: [GeminiText<'a>; 1],
}

#[derive(Serialize)]
struct GeminiText<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
    top_k: u32,
}

#[derive(Deserialize, Default)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    error: Option<GeminiError>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GeminiError {
    code: Option<u16>,
    message: Option<String>,
}

pub struct GeminiClient {
    client: Client,
    api_base: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.api_base, model)
    }
}

fn extract_text(body: GeminiResponse) -> Result<String, UpstreamError> {
    let text: String = body
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(UpstreamError::Empty);
    }
    Ok(text)
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(
        &self,
        model: &str,
        request: &GenerationRequest,
    ) -> Result<String, UpstreamError> {
        let payload = GeminiRequest {
            system_instruction: GeminiInstruction {
                parts: [GeminiText {
                    text: &request.system_instruction,
                }],
            },
            contents: &request.contents,
            generation_config: GeminiGenerationConfig {
                temperature: request.params.temperature,
                max_output_tokens: request.params.max_output_tokens,
                top_p: request.params.top_p,
                top_k: request.params.top_k,
            },
        };

        debug!(model, turns = request.contents.len(), "calling generateContent");

        let response = self
            .client
            .post(self.endpoint(model))
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        let body: GeminiResponse = serde_json::from_str(&raw).unwrap_or_default();

        if let Some(error) = body.error {
            return Err(UpstreamError::Status {
                status: error.code.unwrap_or(status.as_u16()),
                message: error.message.unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message: raw,
            });
        }

        extract_text(body)
    }
}
