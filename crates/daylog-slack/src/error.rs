//! エラー型定義 (daylog-slack)

use thiserror::Error;

/// daylog-slack のエラー型
#[derive(Error, Debug)]
pub enum SlackError {
    #[error("Slack API error: {0}")]
    ApiError(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Slack token not configured")]
    TokenNotConfigured,
}

impl From<SlackError> for daylog_core::Error {
    fn from(e: SlackError) -> Self {
        match e {
            SlackError::TokenNotConfigured => daylog_core::Error::Config(e.to_string()),
            other => daylog_core::Error::Dispatch(other.to_string()),
        }
    }
}

/// Result 型エイリアス
pub type Result<T> = std::result::Result<T, SlackError>;
