use std::time::Duration;

use anyhow::Context;

pub const API_KEY_VAR: &str = "GOOGLE_GENERATIVE_AI_API_KEY";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Tried in order until one answers.
pub const DEFAULT_MODEL_CANDIDATES: [&str; 5] = [
    "gemini-1.5-flash",
    "gemini-1.5-flash-latest",
    "gemini-1.5-pro-latest",
    "gemini-1.5-pro",
    "gemini-pro",
];

pub const HISTORY_WINDOW: usize = 6;

pub const CAREER_CONTEXT: &str = "You are an expert Career Guidance Counselor with deep knowledge of:
- Tech industry roles and career paths (Frontend, Backend, Full Stack, Data Science, DevOps, etc.)
- Skill requirements for different positions
- Salary expectations and market trends
- Interview preparation and tips
- Course recommendations and learning paths
- Career progression and growth opportunities
- Industry best practices and emerging technologies

Provide personalized, actionable advice based on user questions. Be encouraging and specific.
When recommending courses, mention real platforms like Coursera, Udemy, Google Cloud, AWS, etc.
Always ask clarifying questions if needed to give better recommendations.";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
    pub top_k: u32,
}

pub const GENERATION_PARAMS: GenerationParams = GenerationParams {
    temperature: 0.8,
    max_output_tokens: 800,
    top_p: 0.95,
    top_k: 40,
};

#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub api_key: Option<String>,
    pub api_base: String,
    pub candidates: Vec<String>,
    pub attempt_timeout: Duration,
    pub request_deadline: Duration,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            candidates: DEFAULT_MODEL_CANDIDATES.iter().map(|m| m.to_string()).collect(),
            attempt_timeout: Duration::from_secs(20),
            request_deadline: Duration::from_secs(60),
        }
    }
}

impl ChatSettings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut settings = Self::default();

        settings.api_key = lookup(API_KEY_VAR).filter(|key| !key.trim().is_empty());

        if let Some(base) = lookup("CAREER_MODEL_API_BASE") {
            settings.api_base = base.trim_end_matches('/').to_string();
        }

        if let Some(list) = lookup("CAREER_MODEL_CANDIDATES") {
            let candidates: Vec<String> = list
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(String::from)
                .collect();
            if !candidates.is_empty() {
                settings.candidates = candidates;
            }
        }

        if let Some(secs) = lookup("CAREER_ATTEMPT_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .context("CAREER_ATTEMPT_TIMEOUT_SECS must be a whole number of seconds")?;
            settings.attempt_timeout = Duration::from_secs(secs);
        }

        if let Some(secs) = lookup("CAREER_REQUEST_DEADLINE_SECS") {
            let secs: u64 = secs
                .parse()
                .context("CAREER_REQUEST_DEADLINE_SECS must be a whole number of seconds")?;
            settings.request_deadline = Duration::from_secs(secs);
        }

        Ok(settings)
    }
}
