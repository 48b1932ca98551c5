use std::env;
use std::sync::atomic::{AtomicBool, Ordering};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::error;
use url::Url;

use crate::error::{TutorConfigError, TutorError};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const NO_CODE_PLACEHOLDER: &str = "// User has not written any code yet.";

#[derive(Clone, Debug)]
pub struct TutorConfig {
    base_url: String,
    api_key: String,
    model: String,
}

impl TutorConfig {
    /// # Errors
    ///
    /// Returns `TutorConfigError` if the key is blank or the base URL does
    /// not parse.
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        model: Option<String>,
    ) -> Result<Self, TutorConfigError> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(TutorConfigError::EmptyApiKey);
        }
        let base_url = normalize_optional(base_url).unwrap_or_else(|| DEFAULT_BASE_URL.into());
        if Url::parse(&base_url).is_err() {
            return Err(TutorConfigError::InvalidBaseUrl(base_url));
        }
        let model = normalize_optional(model).unwrap_or_else(|| DEFAULT_MODEL.into());
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }

    /// Reads `STUDIO_AI_API_KEY`, `STUDIO_AI_BASE_URL` and `STUDIO_AI_MODEL`.
    ///
    /// Returns `Ok(None)` when no API key is set.
    ///
    /// # Errors
    ///
    /// Returns `TutorConfigError` if the base URL is invalid.
    pub fn from_env() -> Result<Option<Self>, TutorConfigError> {
        let Some(api_key) = normalize_optional(env::var("STUDIO_AI_API_KEY").ok()) else {
            return Ok(None);
        };
        Self::new(
            api_key,
            env::var("STUDIO_AI_BASE_URL").ok(),
            env::var("STUDIO_AI_MODEL").ok(),
        )
        .map(Some)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

/// The three things a learner can ask the tutor for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TutorRequest {
    AskTutor {
        topic: String,
        question: String,
    },
    ProblemHint {
        title: String,
        statement: String,
        user_code: String,
    },
    ExplainSolution {
        title: String,
        solution_code: String,
    },
}

impl TutorRequest {
    /// Message shown to the learner when this request fails.
    #[must_use]
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::AskTutor { .. } => {
                "Sorry, the AI Tutor is having trouble right now. Please try again later."
            }
            Self::ProblemHint { .. } => "Error getting hint. Please try again.",
            Self::ExplainSolution { .. } => "Error getting explanation. Please try again.",
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AskTutor { .. } => "ask_tutor",
            Self::ProblemHint { .. } => "problem_hint",
            Self::ExplainSolution { .. } => "explain_solution",
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, Self::AskTutor { question, .. } if question.trim().is_empty())
    }

    fn system_instruction(&self) -> String {
        match self {
            Self::AskTutor { topic, .. } => format!(
                "You are an expert and friendly computer science tutor named \"CS Studio Tutor\".\n\
                 You are helping a student who is studying a course on \"{topic}\".\n\
                 Your goal is to explain concepts clearly, concisely, and in a way that is easy \
                 for a beginner to understand.\n\
                 Do not start your response with an apology. Be direct and helpful.\n\
                 Use simple language and provide code examples if relevant. Format your response \
                 for readability in a plain text block."
            ),
            Self::ProblemHint { .. } => "You are an AI programming assistant providing hints for \
                 coding problems. Your goal is to help, not to solve. Keep hints short and focused."
                .to_string(),
            Self::ExplainSolution { .. } => "You are a senior software engineer explaining an \
                 optimal code solution to a student. Be clear, thorough, and pedagogical."
                .to_string(),
        }
    }

    fn contents(&self) -> String {
        match self {
            Self::AskTutor { question, .. } => question.clone(),
            Self::ProblemHint {
                title,
                statement,
                user_code,
            } => {
                let code = if user_code.trim().is_empty() {
                    NO_CODE_PLACEHOLDER
                } else {
                    user_code.as_str()
                };
                format!(
                    "Problem Title: {title}\n\
                     Problem Statement: {statement}\n\
                     User's Current Code:\n```\n{code}\n```\n\
                     Based on the user's code for the problem above, provide a single, concise, \
                     and helpful hint to guide them in the right direction. Do not give away the \
                     full solution. Focus on the next logical step or a potential misunderstanding."
                )
            }
            Self::ExplainSolution {
                title,
                solution_code,
            } => format!(
                "Problem Title: {title}\n\n\
                 Provided Solution Code:\n```\n{solution_code}\n```\n\n\
                 Explain this solution code step-by-step. Break down the logic, explain the \
                 purpose of key variables and functions, and discuss the overall strategy of the \
                 algorithm. Format the explanation for readability."
            ),
        }
    }

    fn generation_config(&self) -> GenerationConfig {
        match self {
            Self::AskTutor { .. } => GenerationConfig {
                temperature: 0.7,
                top_p: Some(0.95),
            },
            Self::ProblemHint { .. } => GenerationConfig {
                temperature: 0.5,
                top_p: None,
            },
            Self::ExplainSolution { .. } => GenerationConfig {
                temperature: 0.3,
                top_p: None,
            },
        }
    }

    fn to_payload(&self) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: self.contents(),
                }],
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: self.system_instruction(),
                }],
            },
            generation_config: self.generation_config(),
        }
    }
}

/// Client for the generative-language API behind the AI tutor.
#[derive(Clone)]
pub struct TutorService {
    client: Client,
    config: Option<TutorConfig>,
}

impl TutorService {
    #[must_use]
    pub fn new(config: Option<TutorConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Ask the tutor a question about a course topic.
    ///
    /// # Errors
    ///
    /// Returns `TutorError::EmptyQuestion` for a blank question, or any
    /// error from [`TutorService::send`].
    pub async fn ask_tutor(&self, topic: &str, question: &str) -> Result<String, TutorError> {
        self.send(&TutorRequest::AskTutor {
            topic: topic.to_string(),
            question: question.to_string(),
        })
        .await
    }

    /// Get one hint for the learner's current attempt at a problem.
    ///
    /// # Errors
    ///
    /// See [`TutorService::send`].
    pub async fn problem_hint(
        &self,
        title: &str,
        statement: &str,
        user_code: &str,
    ) -> Result<String, TutorError> {
        self.send(&TutorRequest::ProblemHint {
            title: title.to_string(),
            statement: statement.to_string(),
            user_code: user_code.to_string(),
        })
        .await
    }

    /// Explain a reference solution step by step.
    ///
    /// # Errors
    ///
    /// See [`TutorService::send`].
    pub async fn explain_solution(
        &self,
        title: &str,
        solution_code: &str,
    ) -> Result<String, TutorError> {
        self.send(&TutorRequest::ExplainSolution {
            title: title.to_string(),
            solution_code: solution_code.to_string(),
        })
        .await
    }

    /// Send one request. No retries; failures are logged and returned.
    ///
    /// # Errors
    ///
    /// Returns `TutorError::EmptyQuestion` for a blank question. Otherwise
    /// returns `TutorError` when the service is disabled, the request fails,
    /// or the response carries no text.
    pub async fn send(&self, request: &TutorRequest) -> Result<String, TutorError> {
        if request.is_blank() {
            return Err(TutorError::EmptyQuestion);
        }
        let result = self.generate(request).await;
        if let Err(err) = &result {
            error!(kind = request.kind(), error = %err, "AI tutor request failed");
        }
        result
    }

    async fn generate(&self, request: &TutorRequest) -> Result<String, TutorError> {
        let config = self.config.as_ref().ok_or(TutorError::Disabled)?;

        let response = self
            .client
            .post(config.endpoint())
            .header("x-goog-api-key", &config.api_key)
            .json(&request.to_payload())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TutorError::HttpStatus(response.status()));
        }

        let body: GenerateResponse = response.json().await?;
        body.text().ok_or(TutorError::EmptyResponse)
    }
}

/// Per-control in-flight flag: one pending request at a time.
#[derive(Debug, Default)]
pub struct RequestGate {
    in_flight: AtomicBool,
}

/// Clears the gate when dropped.
#[derive(Debug)]
pub struct GateGuard<'a> {
    gate: &'a RequestGate,
}

impl RequestGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` while another request holds the gate.
    #[must_use]
    pub fn try_begin(&self) -> Option<GateGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GateGuard { gate: self })
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.gate.in_flight.store(false, Ordering::Release);
    }
}

/// One gate per tutor control, shared by every caller of that control.
#[derive(Debug, Default)]
pub struct TutorGates {
    ask: RequestGate,
    hint: RequestGate,
    explain: RequestGate,
}

impl TutorGates {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The gate guarding the control that issues `request`.
    #[must_use]
    pub fn for_request(&self, request: &TutorRequest) -> &RequestGate {
        match request {
            TutorRequest::AskTutor { .. } => &self.ask,
            TutorRequest::ProblemHint { .. } => &self.hint,
            TutorRequest::ExplainSolution { .. } => &self.explain,
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    system_instruction: Content,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, trimmed; `None` if blank.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_applies_defaults_and_validates_url() {
        let config = TutorConfig::new(" key ", None, Some("  ".into())).unwrap();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.model(), DEFAULT_MODEL);
        assert_eq!(
            config.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );

        assert!(matches!(
            TutorConfig::new("", None, None),
            Err(TutorConfigError::EmptyApiKey)
        ));
        assert!(matches!(
            TutorConfig::new("key", Some("not a url".into()), None),
            Err(TutorConfigError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn ask_payload_carries_topic_and_sampling() {
        let request = TutorRequest::AskTutor {
            topic: "React Fundamentals".into(),
            question: "What is a hook?".into(),
        };
        let json = serde_json::to_value(request.to_payload()).unwrap();

        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "What is a hook?");
        let system = json["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap();
        assert!(system.contains("\"React Fundamentals\""));
        assert!(system.contains("CS Studio Tutor"));
        assert!(json["systemInstruction"].get("role").is_none());
        assert!((json["generationConfig"]["topP"].as_f64().unwrap() - 0.95).abs() < 1e-6);
    }

    #[test]
    fn hint_prompt_uses_placeholder_for_blank_code() {
        let request = TutorRequest::ProblemHint {
            title: "Two Sum".into(),
            statement: "Find two numbers.".into(),
            user_code: "   ".into(),
        };
        let contents = request.contents();
        assert!(contents.contains("Problem Title: Two Sum"));
        assert!(contents.contains(NO_CODE_PLACEHOLDER));

        let json = serde_json::to_value(request.to_payload()).unwrap();
        assert!(json["generationConfig"].get("topP").is_none());
    }

    #[test]
    fn failure_messages_are_fixed_per_request_kind() {
        let explain = TutorRequest::ExplainSolution {
            title: "t".into(),
            solution_code: "c".into(),
        };
        assert_eq!(
            explain.failure_message(),
            "Error getting explanation. Please try again."
        );
        assert_eq!(explain.kind(), "explain_solution");
    }

    #[test]
    fn response_text_joins_parts_of_first_candidate() {
        let body: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":" Hooks let "},{"text":"you use state. "}]}},
                              {"content":{"parts":[{"text":"ignored"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(body.text().as_deref(), Some("Hooks let you use state."));

        let empty: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(empty.text(), None);
        let blocked: GenerateResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert_eq!(blocked.text(), None);
    }

    #[tokio::test]
    async fn disabled_service_fails_without_network() {
        let service = TutorService::new(None);
        assert!(!service.enabled());
        let err = service.ask_tutor("Rust", "What is ownership?").await.unwrap_err();
        assert!(matches!(err, TutorError::Disabled));
    }

    #[tokio::test]
    async fn blank_question_is_rejected_first() {
        let service = TutorService::new(None);
        let err = service.ask_tutor("Rust", "  \n").await.unwrap_err();
        assert!(matches!(err, TutorError::EmptyQuestion));
    }

    #[test]
    fn gate_allows_one_request_at_a_time() {
        let gate = RequestGate::new();
        let guard = gate.try_begin().expect("gate open");
        assert!(gate.is_busy());
        assert!(gate.try_begin().is_none());
        drop(guard);
        assert!(!gate.is_busy());
        assert!(gate.try_begin().is_some());
    }

    #[test]
    fn each_control_has_its_own_gate() {
        let gates = TutorGates::new();
        let ask = TutorRequest::AskTutor {
            topic: "Rust".into(),
            question: "Why borrow?".into(),
        };
        let hint = TutorRequest::ProblemHint {
            title: "Two Sum".into(),
            statement: "s".into(),
            user_code: String::new(),
        };

        let _held = gates.for_request(&ask).try_begin().expect("ask gate open");
        assert!(gates.for_request(&ask).try_begin().is_none());
        assert!(gates.for_request(&hint).try_begin().is_some());
    }
}
