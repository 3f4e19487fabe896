//! Day notifier
//!
//! Routes a Day record to its weekday channel and posts the summary once.
//! There is no retry; the caller learns about failures synchronously.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

use daylog_core::{Day, Error, SlackConfig, weekday_key};

use crate::api::SlackApiClient;
use crate::message::build_message;
use crate::router::ChannelRouter;
use crate::types::PostMessageResponse;

/// Outbound message transport
#[async_trait]
pub trait MessagePoster: Send + Sync {
    /// Post markdown text to a channel
    async fn post(&self, channel: &str, text: &str) -> crate::Result<PostMessageResponse>;
}

#[async_trait]
impl MessagePoster for SlackApiClient {
    async fn post(&self, channel: &str, text: &str) -> crate::Result<PostMessageResponse> {
        self.send_message(channel, text).await
    }
}

/// Confirmation of a posted summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchReceipt {
    pub channel: String,
    /// Slack message timestamp
    pub ts: String,
}

/// Sends Day summaries to Slack
#[derive(Clone)]
pub struct DayNotifier {
    poster: Option<Arc<dyn MessagePoster>>,
    router: ChannelRouter,
}

impl DayNotifier {
    pub fn new(poster: Option<Arc<dyn MessagePoster>>, router: ChannelRouter) -> Self {
        Self { poster, router }
    }

    /// Build the notifier from config
    ///
    /// A missing bot token is not fatal here; `send` reports it instead.
    pub fn from_config(config: &SlackConfig) -> daylog_core::Result<Self> {
        let router = ChannelRouter::from_config(config);

        let poster: Option<Arc<dyn MessagePoster>> = match config.bot_token.as_deref() {
            Some(token) => {
                let client = SlackApiClient::new(token)
                    .map_err(|e| Error::Config(format!("Failed to create Slack client: {}", e)))?;
                Some(Arc::new(client))
            }
            None => {
                warn!("SLACK_BOT_TOKEN not set, Slack notifications are disabled");
                None
            }
        };

        Ok(Self::new(poster, router))
    }

    /// Whether an outbound client is available
    pub fn is_configured(&self) -> bool {
        self.poster.is_some()
    }

    /// Post the summary of `day` to its routed channel
    pub async fn send(&self, day: &Day) -> daylog_core::Result<DispatchReceipt> {
        let poster = self
            .poster
            .as_ref()
            .ok_or_else(|| Error::Config("Missing SLACK_BOT_TOKEN".to_string()))?;

        let weekday = weekday_key(&day.date_str)?;
        let channel = self.router.resolve(weekday).ok_or_else(|| {
            Error::Config(
                "No Slack channel configured (set SLACK_CHANNEL_DEFAULT or per-day env vars)"
                    .to_string(),
            )
        })?;

        if day.is_blank() {
            debug!("Day {} has no who/lesson, sending placeholders", day.date_str);
        }

        let text = build_message(day);
        let response = poster.post(channel, &text).await.map_err(|e| {
            warn!("Slack dispatch for {} failed: {}", day.date_str, e);
            Error::from(e)
        })?;

        info!(
            "Sent {} ({}) to channel {} at {}",
            day.date_str, weekday, response.channel, response.ts
        );

        Ok(DispatchReceipt {
            channel: response.channel,
            ts: response.ts,
        })
    }
}
