//! Weekday to channel routing

use std::collections::BTreeMap;

use daylog_core::{SlackConfig, WeekdayKey, weekday_key};

/// Resolves the destination channel for a weekday
///
/// A weekday override wins over the default. Blank entries count as unset.
#[derive(Debug, Clone, Default)]
pub struct ChannelRouter {
    overrides: BTreeMap<WeekdayKey, String>,
    default_channel: Option<String>,
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

impl ChannelRouter {
    pub fn new(overrides: BTreeMap<WeekdayKey, String>, default_channel: Option<String>) -> Self {
        Self {
            overrides,
            default_channel,
        }
    }

    pub fn from_config(config: &SlackConfig) -> Self {
        Self::new(config.channels.clone(), config.default_channel.clone())
    }

    /// Destination for a weekday, or `None` when nothing is configured
    pub fn resolve(&self, weekday: WeekdayKey) -> Option<&str> {
        self.overrides
            .get(&weekday)
            .and_then(|c| non_blank(c))
            .or_else(|| self.default_channel.as_deref().and_then(non_blank))
    }

    /// Destination for a date key, routed by its weekday in the reference timezone
    pub fn channel_for_date(&self, date_key: &str) -> daylog_core::Result<Option<&str>> {
        let weekday = weekday_key(date_key)?;
        Ok(self.resolve(weekday))
    }
}
