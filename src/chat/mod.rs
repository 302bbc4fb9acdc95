pub mod error;
pub mod fallback;
pub mod model;
pub mod router;

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

use crate::config::{ChatSettings, API_KEY_VAR, CAREER_CONTEXT, GENERATION_PARAMS, HISTORY_WINDOW};
use crate::models::ChatMessage;
use error::ChatError;
use fallback::{ChainOutcome, FallbackChain};
use model::{build_contents, GeminiClient, GenerationRequest, GenerativeModel};

pub const CONDITIONAL_MODEL: &str = "conditional-logic";
pub const FALLBACK_MODEL: &str = "fallback";
pub const FALLBACK_REPLY: &str = "I'm experiencing some technical difficulties right now, but I can still help! Try asking about specific topics like 'career paths', 'salary information', 'interview tips', or 'skill development' for instant guidance.";
pub const FALLBACK_ERROR: &str = "AI models temporarily unavailable";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub conversation_history: Vec<ChatMessage>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ChatMessage>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ChatMessage>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl ChatReply {
    fn canned(text: &str) -> Self {
        Self {
            response: text.to_string(),
            model: CONDITIONAL_MODEL.to_string(),
            timestamp: None,
            success: None,
            error: None,
        }
    }

    fn generated(model: String, text: String) -> Self {
        Self {
            response: text,
            model,
            timestamp: Some(now_timestamp()),
            success: Some(true),
            error: None,
        }
    }

    fn fallback() -> Self {
        Self {
            response: FALLBACK_REPLY.to_string(),
            model: FALLBACK_MODEL.to_string(),
            timestamp: Some(now_timestamp()),
            success: Some(false),
            error: Some(FALLBACK_ERROR.to_string()),
        }
    }
}

pub struct ChatResponder {
    api_key: Option<String>,
    backend: Option<Arc<dyn GenerativeModel>>,
    chain: FallbackChain,
}

impl ChatResponder {
    pub fn from_settings(settings: &ChatSettings) -> Self {
        let backend = settings.api_key.as_ref().map(|key| {
            Arc::new(GeminiClient::new(settings.api_base.clone(), key.clone()))
                as Arc<dyn GenerativeModel>
        });
        Self::with_backend(settings, backend)
    }

    pub fn with_backend(settings: &ChatSettings, backend: Option<Arc<dyn GenerativeModel>>) -> Self {
        Self {
            api_key: settings.api_key.clone(),
            backend,
            chain: FallbackChain::new(
                settings.candidates.clone(),
                settings.attempt_timeout,
                settings.request_deadline,
            ),
        }
    }

    /// Fails when no API key is configured. Checked before anything else about a request.
    pub fn require_credential(&self) -> Result<&Arc<dyn GenerativeModel>, ChatError> {
        match (&self.api_key, &self.backend) {
            (Some(_), Some(backend)) => Ok(backend),
            _ => Err(ChatError::MissingCredential(API_KEY_VAR)),
        }
    }

    pub async fn respond(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        let backend = self.require_credential()?;

        if let Some(route) = router::route(&request.message) {
            info!(?route, "answered from keyword routing");
            return Ok(ChatReply::canned(route.reply()));
        }

        let generation = GenerationRequest {
            system_instruction: CAREER_CONTEXT.to_string(),
            contents: build_contents(&request.conversation_history, &request.message, HISTORY_WINDOW),
            params: GENERATION_PARAMS,
        };

        match self.chain.run(backend.as_ref(), &generation).await {
            ChainOutcome::Answered { model, text, .. } => Ok(ChatReply::generated(model, text)),
            ChainOutcome::Exhausted { attempts, skipped } => {
                warn!(
                    attempts = attempts.len(),
                    skipped, "no model answered, sending fallback reply"
                );
                Ok(ChatReply::fallback())
            }
        }
    }
}
