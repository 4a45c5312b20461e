//! Runtime configuration, read once at startup and passed by value into the
//! services.

use crate::logger::Level;
use crate::mattermost::api::MattermostClient;
use crate::mattermost::auth::BotToken;
use crate::mattermost::webhook::WebhookSender;
use std::env;
use std::fmt;
use url::Url;

/// Which transport carries log messages to Mattermost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Authenticated bot-API posts, with channel resolution.
    Bot,
    /// A fire-and-forget incoming-webhook POST.
    Webhook,
}

/// A configuration value that is missing or malformed.
#[derive(Debug)]
pub struct ConfigError(pub String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Everything the senders need. Which fields are required depends on the
/// transport; [Config::bot_client] and [Config::webhook_sender] enforce
/// that at construction time.
#[derive(Clone)]
pub struct Config {
    pub transport: Transport,
    pub webhook_url: Option<Url>,
    pub base_url: Option<String>,
    pub bot_token: Option<BotToken>,
    pub channel_prefix: String,
    pub default_channel: String,
    pub username: String,
    pub icon_url: Option<Url>,
    pub min_level: Level,
}

impl Config {
    /// Read configuration from `MATTERMOST_*` environment variables.
    pub fn from_env() -> Result<Config, ConfigError> {
        let transport = match env::var("MATTERMOST_TYPE").ok().as_deref() {
            None | Some("bot") => Transport::Bot,
            Some("webhook") => Transport::Webhook,
            Some(other) => {
                return Err(ConfigError(format!(
                    "Unsupported MATTERMOST_TYPE: {} (expected 'bot' or 'webhook')",
                    other
                )))
            }
        };

        let min_level = match env::var("MATTERMOST_LOG_LEVEL").ok() {
            None => Level::Debug,
            Some(raw) => raw.parse().map_err(ConfigError)?,
        };

        Ok(Config {
            transport,
            webhook_url: parse_url("MATTERMOST_WEBHOOK_URL")?,
            base_url: env::var("MATTERMOST_BASE_URL").ok(),
            bot_token: env::var("MATTERMOST_BOT_TOKEN").ok().map(BotToken),
            channel_prefix: env::var("MATTERMOST_CHANNEL_PREFIX").unwrap_or_default(),
            default_channel: env::var("MATTERMOST_CHANNEL")
                .unwrap_or_else(|_| "town-square".into()),
            username: env::var("MATTERMOST_USERNAME").unwrap_or_else(|_| "Herald".into()),
            icon_url: parse_url("MATTERMOST_ICON_URL")?,
            min_level,
        })
    }

    /// Build the REST client for the bot transport.
    pub fn bot_client(&self) -> Result<MattermostClient, ConfigError> {
        let base_url = self
            .base_url
            .clone()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ConfigError("MATTERMOST_BASE_URL is not set".into()))?;
        let token = self
            .bot_token
            .clone()
            .ok_or_else(|| ConfigError("MATTERMOST_BOT_TOKEN is not set".into()))?;

        Ok(MattermostClient::new(base_url, token))
    }

    /// Build the webhook sender.
    pub fn webhook_sender(&self) -> Result<WebhookSender, ConfigError> {
        let url = self
            .webhook_url
            .clone()
            .ok_or_else(|| ConfigError("MATTERMOST_WEBHOOK_URL is not set".into()))?;

        Ok(WebhookSender::new(
            url,
            self.username.clone(),
            self.icon_url.clone(),
        ))
    }
}

fn parse_url(var: &str) -> Result<Option<Url>, ConfigError> {
    match env::var(var) {
        Err(_) => Ok(None),
        Ok(raw) => Url::parse(&raw)
            .map(Some)
            .map_err(|e| ConfigError(format!("Could not parse {}: {}", var, e))),
    }
}
