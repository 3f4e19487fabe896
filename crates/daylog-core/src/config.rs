//! Configuration management
//!
//! 設定は以下の優先順位で読み込まれます:
//! 1. 環境変数
//! 2. daylog.toml 設定ファイル
//! 3. デフォルト値
//!
//! 設定ファイル内では `${VAR_NAME}` 形式で環境変数を展開できます。
//! 空文字列の値は未設定として扱います。

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::date::WeekdayKey;
use crate::{Error, Result};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "daylog.toml";

/// Main configuration for daylog
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// HTTP API configuration
    pub api: ApiConfig,

    /// Record store configuration
    pub store: StoreConfig,

    /// Slack notification configuration
    pub slack: SlackConfig,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Port for HTTP API server
    pub port: u16,

    /// Allowed CORS origins (e.g., ["http://localhost:3000"])
    /// If unset, any origin is allowed
    pub allowed_origins: Option<Vec<String>>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: default_api_port(),
            allowed_origins: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to SQLite database file
    pub db_path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Slack credential and weekday routing table
#[derive(Clone, Default)]
pub struct SlackConfig {
    /// Bot token (xoxb-...)
    pub bot_token: Option<String>,

    /// Channel used when a weekday has no override
    pub default_channel: Option<String>,

    /// Per-weekday channel overrides
    pub channels: BTreeMap<WeekdayKey, String>,
}

impl fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackConfig")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .field("default_channel", &self.default_channel)
            .field("channels", &self.channels)
            .finish()
    }
}

impl SlackConfig {
    /// Environment variable holding the channel override for a weekday
    pub fn channel_env_var(weekday: WeekdayKey) -> String {
        format!("SLACK_CHANNEL_{}", weekday)
    }
}

fn default_api_port() -> u16 {
    3000
}

fn default_db_path() -> String {
    "data/daylog.db".to_string()
}

/// Treat blank strings as unset
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Config {
    /// `${VAR_NAME}` 形式の文字列を変数の値に置換する
    ///
    /// 変数が存在しない場合は空文字列になります。
    fn expand_vars<F>(value: &str, lookup: &F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next(); // '{' を消費

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                if let Some(value) = lookup(&var_name) {
                    result.push_str(&value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// TOML 設定ファイルから設定を読み込む
    ///
    /// 設定ファイル内の `${VAR_NAME}` は環境変数の値に置換され、
    /// その後で環境変数による上書きが適用されます。
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml_str(&content, |key| std::env::var(key).ok())
    }

    /// Parse TOML content, then apply overrides from `lookup`
    pub fn from_toml_str<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let expanded = Self::expand_vars(content, &lookup);

        let toml: TomlConfig = toml::from_str(&expanded)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;

        let mut config = Self::from_toml_config(toml)?;
        config.apply_overrides(&lookup);
        Ok(config)
    }

    /// デフォルトパスから設定を読み込む
    ///
    /// `./daylog.toml` があればそれを使い、なければ環境変数のみから読み込みます。
    pub fn load() -> Result<Self> {
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::from_toml_file(DEFAULT_CONFIG_FILE);
        }

        Ok(Self::from_env())
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from defaults plus an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.apply_overrides(&lookup);
        config
    }

    fn from_toml_config(toml: TomlConfig) -> Result<Self> {
        let api = toml.api.unwrap_or_default();
        let store = toml.store.unwrap_or_default();
        let slack = toml.slack.unwrap_or_default();

        let mut channels = BTreeMap::new();
        for (key, channel) in slack.channels.unwrap_or_default() {
            let weekday: WeekdayKey = key
                .parse()
                .map_err(|_| Error::Config(format!("Unknown weekday in [slack.channels]: {}", key)))?;
            if let Some(channel) = non_blank(Some(channel)) {
                channels.insert(weekday, channel);
            }
        }

        Ok(Config {
            api: ApiConfig {
                port: api.port.unwrap_or_else(default_api_port),
                allowed_origins: api.allowed_origins,
            },
            store: StoreConfig {
                db_path: non_blank(store.db_path).unwrap_or_else(default_db_path),
            },
            slack: SlackConfig {
                bot_token: non_blank(slack.bot_token),
                default_channel: non_blank(slack.default_channel),
                channels,
            },
        })
    }

    /// 環境変数で設定を上書きする
    fn apply_overrides<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_blank(lookup(key));

        // API 設定の上書き
        if let Some(port) = get("API_PORT") {
            match port.trim().parse() {
                Ok(p) => self.api.port = p,
                Err(_) => tracing::warn!("Ignoring invalid API_PORT: {}", port),
            }
        }
        if let Some(origins) = get("API_ALLOWED_ORIGINS") {
            self.api.allowed_origins = Some(
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            );
        }

        // Store 設定の上書き
        if let Some(path) = get("DB_PATH") {
            self.store.db_path = path;
        }

        // Slack 設定の上書き
        if let Some(token) = get("SLACK_BOT_TOKEN") {
            self.slack.bot_token = Some(token);
        }
        if let Some(channel) = get("SLACK_CHANNEL_DEFAULT") {
            self.slack.default_channel = Some(channel);
        }
        for weekday in WeekdayKey::ALL {
            if let Some(channel) = get(&SlackConfig::channel_env_var(weekday)) {
                self.slack.channels.insert(weekday, channel);
            }
        }
    }
}

// ============================================================================
// TOML 構造体定義（ファイル解析用）
// ============================================================================

/// TOML ファイル用のトップレベル構造
#[derive(Debug, Deserialize)]
struct TomlConfig {
    /// HTTP API 設定
    api: Option<TomlApiConfig>,
    /// ストア設定
    store: Option<TomlStoreConfig>,
    /// Slack 設定
    slack: Option<TomlSlackConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlApiConfig {
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    allowed_origins: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlStoreConfig {
    #[serde(default)]
    db_path: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlSlackConfig {
    #[serde(default)]
    bot_token: Option<String>,
    #[serde(default)]
    default_channel: Option<String>,
    /// 曜日 (MON..SUN) ごとのチャンネル
    #[serde(default)]
    channels: Option<BTreeMap<String, String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.api.port, 3000);
        assert!(config.api.allowed_origins.is_none());
        assert_eq!(config.store.db_path, "data/daylog.db");
        assert!(config.slack.bot_token.is_none());
        assert!(config.slack.default_channel.is_none());
        assert!(config.slack.channels.is_empty());
    }

    #[test]
    fn test_env_lookup() {
        let config = Config::from_lookup(lookup_from(&[
            ("API_PORT", "8080"),
            ("API_ALLOWED_ORIGINS", "http://a.test, http://b.test"),
            ("DB_PATH", "/tmp/days.db"),
            ("SLACK_BOT_TOKEN", "xoxb-test"),
            ("SLACK_CHANNEL_DEFAULT", "C-default"),
            ("SLACK_CHANNEL_MON", "C-mon"),
            ("SLACK_CHANNEL_SUN", "C-sun"),
        ]));

        assert_eq!(config.api.port, 8080);
        assert_eq!(
            config.api.allowed_origins,
            Some(vec!["http://a.test".to_string(), "http://b.test".to_string()])
        );
        assert_eq!(config.store.db_path, "/tmp/days.db");
        assert_eq!(config.slack.bot_token.as_deref(), Some("xoxb-test"));
        assert_eq!(config.slack.default_channel.as_deref(), Some("C-default"));
        assert_eq!(config.slack.channels.len(), 2);
        assert_eq!(config.slack.channels[&WeekdayKey::Mon], "C-mon");
        assert_eq!(config.slack.channels[&WeekdayKey::Sun], "C-sun");
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = Config::from_lookup(lookup_from(&[
            ("SLACK_BOT_TOKEN", ""),
            ("SLACK_CHANNEL_TUE", "   "),
            ("API_PORT", "not-a-port"),
        ]));

        assert!(config.slack.bot_token.is_none());
        assert!(config.slack.channels.is_empty());
        assert_eq!(config.api.port, 3000);
    }

    #[test]
    fn test_expand_vars() {
        let lookup = lookup_from(&[("DAYLOG_TEST_VAR", "test_value")]);

        let result = Config::expand_vars("prefix_${DAYLOG_TEST_VAR}_suffix", &lookup);
        assert_eq!(result, "prefix_test_value_suffix");

        // 存在しない変数
        let result = Config::expand_vars("prefix_${NONEXISTENT_VAR}_suffix", &lookup);
        assert_eq!(result, "prefix__suffix");

        assert_eq!(Config::expand_vars("no_vars_here", &lookup), "no_vars_here");
        assert_eq!(Config::expand_vars("${}_content", &lookup), "_content");
        assert_eq!(Config::expand_vars("cost: $5", &lookup), "cost: $5");
    }

    #[test]
    fn test_toml_config_parsing() {
        let toml_content = r#"
[api]
port = 8080
allowed_origins = ["http://localhost:5173"]

[store]
db_path = "/path/to/db"

[slack]
bot_token = "${DAYLOG_SLACK_TOKEN}"
default_channel = "C-default"

[slack.channels]
MON = "C-mon"
fri = "C-fri"
"#;

        let config =
            Config::from_toml_str(toml_content, lookup_from(&[("DAYLOG_SLACK_TOKEN", "xoxb-file")]))
                .unwrap();

        assert_eq!(config.api.port, 8080);
        assert_eq!(
            config.api.allowed_origins,
            Some(vec!["http://localhost:5173".to_string()])
        );
        assert_eq!(config.store.db_path, "/path/to/db");
        assert_eq!(config.slack.bot_token.as_deref(), Some("xoxb-file"));
        assert_eq!(config.slack.default_channel.as_deref(), Some("C-default"));
        assert_eq!(config.slack.channels[&WeekdayKey::Mon], "C-mon");
        assert_eq!(config.slack.channels[&WeekdayKey::Fri], "C-fri");
    }

    #[test]
    fn test_env_overrides_toml() {
        let toml_content = r#"
[slack]
default_channel = "C-file"

[slack.channels]
MON = "C-file-mon"
"#;

        let config = Config::from_toml_str(
            toml_content,
            lookup_from(&[("SLACK_CHANNEL_MON", "C-env-mon"), ("SLACK_CHANNEL_DEFAULT", "")]),
        )
        .unwrap();

        assert_eq!(config.slack.channels[&WeekdayKey::Mon], "C-env-mon");
        // 空の環境変数はファイルの値を上書きしない
        assert_eq!(config.slack.default_channel.as_deref(), Some("C-file"));
    }

    #[test]
    fn test_toml_unknown_weekday() {
        let toml_content = r#"
[slack.channels]
FUNDAY = "C-x"
"#;
        let err = Config::from_toml_str(toml_content, |_| None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_toml_unreadable_file() {
        let err = Config::from_toml_file("/nonexistent/daylog.toml").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_slack_config_debug_redacts_token() {
        let slack = SlackConfig {
            bot_token: Some("xoxb-secret".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", slack);
        assert!(!debug.contains("xoxb-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
