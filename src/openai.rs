//! OpenAI client construction.

use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Create an OpenAI client with a request timeout.
///
/// Generation calls are bounded so a hung API call cannot wedge a batch;
/// the timeout comes from `[summary] request_timeout_secs` in the config.
pub fn create_client(timeout: Duration) -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client");

    Client::with_config(OpenAIConfig::default()).with_http_client(http_client)
}
