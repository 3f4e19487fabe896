//! Slack Web API client
//!
//! Communicates with Slack Web API

use reqwest::Client;
use tracing::{debug, error};

use crate::error::{Result, SlackError};
use crate::types::*;

const DEFAULT_BASE_URL: &str = "https://slack.com/api";

/// Slack Web API client
#[derive(Clone)]
pub struct SlackApiClient {
    client: Client,
    bot_token: String,
    base_url: String,
}

impl SlackApiClient {
    /// Create a new Slack API client
    pub fn new(bot_token: &str) -> Result<Self> {
        if bot_token.trim().is_empty() {
            return Err(SlackError::TokenNotConfigured);
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(SlackError::HttpError)?;

        Ok(Self {
            client,
            bot_token: bot_token.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at another API root (e.g. a mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Add authorization header
    fn add_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.bearer_auth(&self.bot_token)
    }

    /// Post a message to a channel
    pub async fn post_message(&self, message: &PostMessage) -> Result<PostMessageResponse> {
        let url = format!("{}/chat.postMessage", self.base_url);

        debug!("Posting message to channel: {}", message.channel);

        let response = self
            .add_auth(self.client.post(&url).json(message))
            .send()
            .await
            .map_err(SlackError::HttpError)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Post message failed: {} - {}", status, error_text);
            return Err(SlackError::ApiError(format!("{}: {}", status, error_text)));
        }

        let result: SlackResponse<PostMessageResponse> = response
            .json()
            .await
            .map_err(|e| SlackError::ParseError(e.to_string()))?;

        if !result.ok {
            return Err(SlackError::ApiError(
                result.error.unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        result
            .data
            .ok_or_else(|| SlackError::ParseError("missing ts/channel in response".to_string()))
    }

    /// Post a markdown text message
    pub async fn send_message(&self, channel: &str, text: &str) -> Result<PostMessageResponse> {
        let message = PostMessage {
            channel: channel.to_string(),
            text: text.to_string(),
            mrkdwn: true,
        };

        self.post_message(&message).await
    }
}
