//! Slack API types

use serde::{Deserialize, Serialize};

/// Message to send
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMessage {
    pub channel: String,
    pub text: String,
    /// Render Slack markdown (`*bold*`, `_italic_`)
    pub mrkdwn: bool,
}

/// API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub data: Option<T>,
}

/// Posted message echo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackMessage {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
}

/// Post message response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMessageResponse {
    pub ts: String,
    pub channel: String,
    #[serde(default)]
    pub message: Option<SlackMessage>,
}
