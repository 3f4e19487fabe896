//! daylog-slack: Slack notifications for Daylog
//!
//! Day レコードの要約を曜日ごとに設定された Slack チャンネルへ投稿します。

pub mod api;
pub mod error;
pub mod message;
pub mod notifier;
pub mod router;
pub mod types;

pub use api::SlackApiClient;
pub use error::{Result, SlackError};
pub use message::build_message;
pub use notifier::{DayNotifier, DispatchReceipt, MessagePoster};
pub use router::ChannelRouter;
