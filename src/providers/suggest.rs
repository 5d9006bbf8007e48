use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Literal reply that means "emit nothing this cycle"
pub const NO_SUGGESTIONS_SENTINEL: &str = "No suggestions at this time.";

/// Instruction constraining the model to short, categorized suggestions
const SYSTEM_PROMPT: &str = r#"You are an AI sales assistant helping a sales representative during a live call.

Your role is to provide SHORT, actionable suggestions based on the conversation transcript.

Guidelines:
- Keep suggestions to 1-2 sentences maximum
- Focus on sales techniques, objection handling, and relationship building
- Provide specific, actionable advice
- Use these categories:
  💡 Tip - General sales advice
  ⚠️ Reminder - Important things not to forget
  ❗ Alert - Urgent actions or red flags
  🎯 Close - Closing opportunities

Only respond with the suggestion, starting with the appropriate emoji category.
If no specific advice is needed, respond with "No suggestions at this time.""#;

const MAX_TOKENS: u32 = 100;
const TEMPERATURE: f32 = 0.7;

/// Errors from a suggestion provider call
#[derive(Debug, Error)]
pub enum SuggestionError {
    #[error("suggestion request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("suggestion service error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// Produces short categorized suggestions from recent transcript text
#[async_trait]
pub trait Advisor: Send + Sync {
    /// Returns zero or one suggestion for the given context window
    ///
    /// An empty or all-whitespace window short-circuits to an empty result
    /// without a provider call.
    async fn suggest(&self, window: &str) -> Result<Vec<String>, SuggestionError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// Groq chat-completion advisor (Llama models)
pub struct GroqAdvisor {
    client: reqwest::Client,
    api_key: String,
}

impl GroqAdvisor {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl Advisor for GroqAdvisor {
    async fn suggest(&self, window: &str) -> Result<Vec<String>, SuggestionError> {
        if window.trim().is_empty() {
            return Ok(Vec::new());
        }
        request_suggestion(
            &self.client,
            "https://api.groq.com/openai/v1/chat/completions",
            &self.api_key,
            "llama3-8b-8192",
            window,
        )
        .await
    }

    fn name(&self) -> &'static str {
        "groq"
    }
}

/// OpenAI chat-completion advisor
pub struct OpenAiAdvisor {
    client: reqwest::Client,
    api_key: String,
}

impl OpenAiAdvisor {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl Advisor for OpenAiAdvisor {
    async fn suggest(&self, window: &str) -> Result<Vec<String>, SuggestionError> {
        if window.trim().is_empty() {
            return Ok(Vec::new());
        }
        request_suggestion(
            &self.client,
            "https://api.openai.com/v1/chat/completions",
            &self.api_key,
            "gpt-4o-mini",
            window,
        )
        .await
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

/// Turn a raw model reply into zero or one suggestion
///
/// The sentinel reply and blank output both mean "nothing this cycle".
pub fn extract_suggestion(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == NO_SUGGESTIONS_SENTINEL {
        return None;
    }
    Some(trimmed.to_string())
}

async fn request_suggestion(
    client: &reqwest::Client,
    url: &str,
    api_key: &str,
    model: &str,
    window: &str,
) -> Result<Vec<String>, SuggestionError> {
    debug!(
        "Requesting suggestion from {} ({} chars of context)",
        model,
        window.len()
    );

    let request = ChatCompletionRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage {
                role: "system".to_string(),
                content: SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: format!("Recent conversation: {}", window),
            },
        ],
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
    };

    let response = client
        .post(url)
        .header("Authorization", format!("Bearer {}", api_key))
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SuggestionError::Api { status, body });
    }

    let completion: ChatCompletionResponse = response.json().await?;
    let raw = completion
        .choices
        .first()
        .and_then(|choice| choice.message.content.as_deref())
        .unwrap_or_default();

    Ok(extract_suggestion(raw).into_iter().collect())
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
