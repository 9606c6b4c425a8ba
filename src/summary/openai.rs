//! OpenAI chat-completions summarizer.

use super::{build_summary_prompt, Summarizer};
use crate::config::SummarySettings;
use crate::error::{KortError, Result};
use crate::openai::create_client;
use crate::video::VideoRecord;
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Summarizer backed by the OpenAI chat completions API.
pub struct OpenAiSummarizer {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiSummarizer {
    pub fn new(settings: &SummarySettings) -> Self {
        Self {
            client: create_client(Duration::from_secs(settings.request_timeout_secs)),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        }
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    #[instrument(skip_all, fields(count = videos.len(), model = %self.model))]
    async fn summarize(&self, videos: &[VideoRecord]) -> Result<String> {
        if videos.is_empty() {
            return Err(KortError::EmptyBatch);
        }

        let prompt = build_summary_prompt(videos);
        debug!("Built summary prompt ({} chars)", prompt.len());

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| KortError::OpenAI(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .max_completion_tokens(self.max_tokens)
            .temperature(self.temperature)
            .build()
            .map_err(|e| KortError::OpenAI(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(classify_api_error)?;

        let summary = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or(KortError::EmptySummary)?;

        info!("Generated summary for {} video(s)", videos.len());
        Ok(summary)
    }
}

/// Map a structured API error to the batch-level taxonomy.
///
/// Classification keys off the error code reported by the service, with a
/// single pass-the-message-through fallback for everything unrecognized.
fn classify_api_error(err: OpenAIError) -> KortError {
    match err {
        OpenAIError::ApiError(api) => {
            let code = api
                .code
                .as_deref()
                .or(api.r#type.as_deref())
                .unwrap_or_default();

            match code {
                "insufficient_quota" | "rate_limit_exceeded" | "rate_limit_error" => {
                    KortError::QuotaExceeded
                }
                "invalid_api_key" | "authentication_error" | "invalid_organization" => {
                    KortError::AuthFailure
                }
                "context_length_exceeded" | "string_above_max_length"
                | "invalid_request_error" => KortError::RequestRejected,
                _ => KortError::OpenAI(api.message),
            }
        }
        other => KortError::OpenAI(other.to_string()),
    }
}
