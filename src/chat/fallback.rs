use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, warn};

use super::error::UpstreamError;
use super::model::{GenerationRequest, GenerativeModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    ModelUnavailable,
    QuotaExceeded,
    EmptyResponse,
    TimedOut,
    Other,
}

impl FailureKind {
    pub fn is_expected(self) -> bool {
        !matches!(self, FailureKind::Other)
    }
}

pub fn classify_failure(err: &UpstreamError) -> FailureKind {
    match err {
        UpstreamError::Empty => return FailureKind::EmptyResponse,
        UpstreamError::Timeout(_) => return FailureKind::TimedOut,
        _ => {}
    }

    if matches!(err.status(), Some(404) | Some(400)) {
        return FailureKind::ModelUnavailable;
    }

    let message = err.to_string();
    if message.contains("not found")
        || message.contains("not supported")
        || message.contains("model not available")
    {
        FailureKind::ModelUnavailable
    } else if message.contains("quota exceeded") {
        FailureKind::QuotaExceeded
    } else {
        FailureKind::Other
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub model: String,
    pub failure: FailureKind,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Answered(String),
    Continue(Attempt),
}

pub fn settle(model: &str, result: Result<String, UpstreamError>) -> Step {
    let err = match result {
        Ok(text) if !text.trim().is_empty() => return Step::Answered(text),
        Ok(_) => UpstreamError::Empty,
        Err(err) => err,
    };

    Step::Continue(Attempt {
        model: model.to_string(),
        failure: classify_failure(&err),
        detail: err.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChainOutcome {
    Answered {
        model: String,
        text: String,
        attempts: Vec<Attempt>,
    },
    Exhausted {
        attempts: Vec<Attempt>,
        skipped: usize,
    },
}

#[derive(Debug, Clone)]
pub struct FallbackChain {
    candidates: Vec<String>,
    attempt_timeout: Duration,
    request_deadline: Duration,
}

impl FallbackChain {
    pub fn new(candidates: Vec<String>, attempt_timeout: Duration, request_deadline: Duration) -> Self {
        Self {
            candidates,
            attempt_timeout,
            request_deadline,
        }
    }

    pub async fn run(
        &self,
        backend: &dyn GenerativeModel,
        request: &GenerationRequest,
    ) -> ChainOutcome {
        let started = Instant::now();
        let mut attempts = Vec::new();

        for (index, model) in self.candidates.iter().enumerate() {
            let remaining = self.request_deadline.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                let skipped = self.candidates.len() - index;
                warn!(skipped, "request deadline reached before every model was tried");
                return ChainOutcome::Exhausted { attempts, skipped };
            }

            let budget = remaining.min(self.attempt_timeout);
            let result = match tokio::time::timeout(budget, backend.generate(model, request)).await {
                Ok(result) => result,
                Err(_) => Err(UpstreamError::Timeout(budget)),
            };

            match settle(model, result) {
                Step::Answered(text) => {
                    info!(model = %model, failed = attempts.len(), "model answered");
                    return ChainOutcome::Answered {
                        model: model.clone(),
                        text,
                        attempts,
                    };
                }
                Step::Continue(attempt) => {
                    if attempt.failure.is_expected() {
                        warn!(model = %model, failure = ?attempt.failure, detail = %attempt.detail, "model failed, trying next");
                    } else {
                        warn!(model = %model, detail = %attempt.detail, "unexpected model error, trying next");
                    }
                    attempts.push(attempt);
                }
            }
        }

        ChainOutcome::Exhausted {
            attempts,
            skipped: 0,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::{CAREER_CONTEXT, GENERATION_PARAMS};
    use crate::chat::model::build_contents;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub(crate) struct ScriptedModel {
        pub(crate) script: HashMap<String, Result<String, UpstreamError>>,
        pub(crate) delay: Option<Duration>,
        pub(crate) calls: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        pub(crate) fn failing_everywhere(err: UpstreamError) -> Self {
            let script = crate::config::DEFAULT_MODEL_CANDIDATES
                .iter()
                .map(|m| (m.to_string(), Err(err.clone())))
                .collect();
            Self {
                script,
                ..Self::default()
            }
        }

        pub(crate) fn with(mut self, model: &str, result: Result<String, UpstreamError>) -> Self {
            self.script.insert(model.to_string(), result);
            self
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GenerativeModel for ScriptedModel {
        async fn generate(
            &self,
            model: &str,
            _request: &GenerationRequest,
        ) -> Result<String, UpstreamError> {
            self.calls.lock().unwrap().push(model.to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.script
                .get(model)
                .cloned()
                .unwrap_or_else(|| Err(UpstreamError::Transport("unscripted".into())))
        }
    }

    fn not_found() -> UpstreamError {
        UpstreamError::Status {
            status: 404,
            message: "models/gemini-1.5-flash is not found for API version v1beta".into(),
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            system_instruction: CAREER_CONTEXT.to_string(),
            contents: build_contents(&[], "what next?", 6),
            params: GENERATION_PARAMS,
        }
    }

    fn chain() -> FallbackChain {
        FallbackChain::new(
            crate::config::DEFAULT_MODEL_CANDIDATES
                .iter()
                .map(|m| m.to_string())
                .collect(),
            Duration::from_secs(5),
            Duration::from_secs(30),
        )
    }

    #[test]
    fn classification_covers_known_failures() {
        assert_eq!(classify_failure(&not_found()), FailureKind::ModelUnavailable);
        assert_eq!(
            classify_failure(&UpstreamError::Status {
                status: 400,
                message: "bad".into()
            }),
            FailureKind::ModelUnavailable
        );
        assert_eq!(
            classify_failure(&UpstreamError::Transport("model not available".into())),
            FailureKind::ModelUnavailable
        );
        assert_eq!(
            classify_failure(&UpstreamError::Status {
                status: 429,
                message: "quota exceeded for project".into()
            }),
            FailureKind::QuotaExceeded
        );
        assert_eq!(classify_failure(&UpstreamError::Empty), FailureKind::EmptyResponse);
        assert_eq!(
            classify_failure(&UpstreamError::Timeout(Duration::from_secs(1))),
            FailureKind::TimedOut
        );
        assert_eq!(
            classify_failure(&UpstreamError::Status {
                status: 403,
                message: "API key not valid".into()
            }),
            FailureKind::Other
        );
    }

    #[test]
    fn blank_answers_do_not_count() {
        match settle("m", Ok("  \n".into())) {
            Step::Continue(attempt) => assert_eq!(attempt.failure, FailureKind::EmptyResponse),
            other => panic!("unexpected step {other:?}"),
        }
        assert_eq!(settle("m", Ok("yes".into())), Step::Answered("yes".into()));
    }

    #[tokio::test]
    async fn first_success_wins_in_order() {
        let backend = ScriptedModel::failing_everywhere(not_found())
            .with("gemini-1.5-pro-latest", Ok("Learn Rust.".into()))
            .with("gemini-1.5-pro", Ok("never asked".into()));

        match chain().run(&backend, &request()).await {
            ChainOutcome::Answered {
                model,
                text,
                attempts,
            } => {
                assert_eq!(model, "gemini-1.5-pro-latest");
                assert_eq!(text, "Learn Rust.");
                assert_eq!(attempts.len(), 2);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(
            backend.calls(),
            vec!["gemini-1.5-flash", "gemini-1.5-flash-latest", "gemini-1.5-pro-latest"]
        );
    }

    #[tokio::test]
    async fn every_error_moves_to_the_next_candidate() {
        let backend = ScriptedModel::failing_everywhere(UpstreamError::Status {
            status: 401,
            message: "API key not valid".into(),
        });

        match chain().run(&backend, &request()).await {
            ChainOutcome::Exhausted { attempts, skipped } => {
                assert_eq!(attempts.len(), 5);
                assert_eq!(skipped, 0);
                assert!(attempts.iter().all(|a| a.failure == FailureKind::Other));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(backend.calls().len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_candidates_time_out() {
        let backend = ScriptedModel {
            delay: Some(Duration::from_secs(10)),
            ..ScriptedModel::failing_everywhere(not_found())
        }
        .with("gemini-pro", Ok("late but fine".into()));

        let chain = FallbackChain::new(
            vec!["gemini-1.5-flash".into(), "gemini-pro".into()],
            Duration::from_secs(2),
            Duration::from_secs(60),
        );
        match chain.run(&backend, &request()).await {
            ChainOutcome::Exhausted { attempts, .. } => {
                assert_eq!(attempts.len(), 2);
                assert!(attempts.iter().all(|a| a.failure == FailureKind::TimedOut));
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_skips_remaining_candidates() {
        let backend = ScriptedModel {
            delay: Some(Duration::from_secs(4)),
            ..ScriptedModel::failing_everywhere(not_found())
        };

        let chain = FallbackChain::new(
            crate::config::DEFAULT_MODEL_CANDIDATES
                .iter()
                .map(|m| m.to_string())
                .collect(),
            Duration::from_secs(10),
            Duration::from_secs(9),
        );
        match chain.run(&backend, &request()).await {
            ChainOutcome::Exhausted { attempts, skipped } => {
                // 4s + 4s + 1s (cut by the deadline)
                assert_eq!(attempts.len(), 3);
                assert_eq!(attempts[2].failure, FailureKind::TimedOut);
                assert_eq!(skipped, 2);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }
}
