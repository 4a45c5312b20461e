//! The log-facing surface: level filtering, message tagging, and dispatch
//! to whichever transport is configured.

use crate::config::{Config, ConfigError, Transport};
use crate::mattermost::message::BotSender;
use crate::mattermost::webhook::WebhookSender;
use serde_json::{Map, Value};
use std::str::FromStr;

/// Log severities, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
}

impl Level {
    /// The bracketed tag prepended to every delivered message.
    pub fn tag(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Level, String> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warning" | "warn" => Ok(Level::Warning),
            "error" => Ok(Level::Error),
            _ => Err(format!("Unknown log level: {}", s)),
        }
    }
}

enum Sender {
    Bot(BotSender),
    Webhook(WebhookSender),
}

/// Delivers tagged log lines to Mattermost.
///
/// Failed delivery is reported, never propagated: a logging path that
/// errors on its own failures tends to recurse.
pub struct Logger {
    default_channel: String,
    min_level: Level,
    sender: Sender,
}

impl Logger {
    /// Build a logger for the configured transport. Fails when the
    /// transport's required configuration is missing.
    pub fn new(config: Config) -> Result<Logger, ConfigError> {
        let sender = match config.transport {
            Transport::Bot => Sender::Bot(BotSender::new(
                config.bot_client()?,
                config.channel_prefix,
            )),
            Transport::Webhook => Sender::Webhook(config.webhook_sender()?),
        };

        Ok(Logger {
            default_channel: config.default_channel,
            min_level: config.min_level,
            sender,
        })
    }

    /// Deliver `message` at `level` to the default channel.
    pub async fn log(&self, level: Level, message: &str, context: &Map<String, Value>) -> bool {
        self.log_to(&self.default_channel, level, message, context)
            .await
    }

    /// Deliver `message` at `level` to a specific channel reference.
    ///
    /// Records below the configured minimum level are dropped and count as
    /// delivered. A string `channel` key in the context overrides the
    /// target and is stripped from the delivered context block.
    pub async fn log_to(
        &self,
        channel: &str,
        level: Level,
        message: &str,
        context: &Map<String, Value>,
    ) -> bool {
        if level < self.min_level {
            return true;
        }

        let (channel_override, context) = split_channel(context);
        let channel = channel_override.as_deref().unwrap_or(channel);
        let tagged = format!("**[{}]** {}", level.tag(), message);

        let res = match &self.sender {
            Sender::Bot(bot) => bot.send(channel, &tagged, &context).await,
            Sender::Webhook(hook) => hook.send(Some(channel), &tagged, &context).await,
        };

        match res {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Mattermost delivery failed: {}", e);
                false
            }
        }
    }

    pub async fn debug(&self, message: &str, context: &Map<String, Value>) -> bool {
        self.log(Level::Debug, message, context).await
    }

    pub async fn info(&self, message: &str, context: &Map<String, Value>) -> bool {
        self.log(Level::Info, message, context).await
    }

    pub async fn warning(&self, message: &str, context: &Map<String, Value>) -> bool {
        self.log(Level::Warning, message, context).await
    }

    pub async fn error(&self, message: &str, context: &Map<String, Value>) -> bool {
        self.log(Level::Error, message, context).await
    }
}

/// Pull a string `channel` override out of a context map. Non-string values
/// under that key are not overrides and stay in the context.
fn split_channel(context: &Map<String, Value>) -> (Option<String>, Map<String, Value>) {
    let mut rest = context.clone();

    match rest.remove("channel") {
        Some(Value::String(channel)) => (Some(channel), rest),
        Some(other) => {
            rest.insert("channel".into(), other);
            (None, rest)
        }
        None => (None, rest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[test]
    fn test_level_order() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warning);
        assert!(Level::Warning < Level::Error);
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!("debug".parse(), Ok(Level::Debug));
        assert_eq!("WARNING".parse(), Ok(Level::Warning));
        assert_eq!("warn".parse(), Ok(Level::Warning));
        assert!("loud".parse::<Level>().is_err());
    }

    #[test]
    fn test_split_channel() {
        let mut context = Map::new();
        context.insert("channel".into(), Value::from("alerts"));
        context.insert("user_id".into(), Value::from(42));

        let (channel, rest) = split_channel(&context);

        assert_eq!(channel.as_deref(), Some("alerts"));
        assert_eq!(rest.len(), 1);
        assert_eq!(rest.get("user_id"), Some(&Value::from(42)));
    }

    #[test]
    fn test_split_channel_non_string() {
        let mut context = Map::new();
        context.insert("channel".into(), Value::from(7));

        let (channel, rest) = split_channel(&context);

        assert_eq!(channel, None);
        assert_eq!(rest.get("channel"), Some(&Value::from(7)));
    }

    fn webhook_logger(base_url: &str, min_level: Level) -> Logger {
        let config = Config {
            transport: Transport::Webhook,
            webhook_url: Some(
                Url::parse(&format!("{}/hooks/h7qbpszx13dxmhx1yqf1bmk5hd", base_url)).unwrap(),
            ),
            base_url: None,
            bot_token: None,
            channel_prefix: String::new(),
            default_channel: "town-square".into(),
            username: "Herald".into(),
            icon_url: None,
            min_level,
        };

        Logger::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_log_tags_and_delivers() {
        let mut srv = mockito::Server::new_async().await;

        let hook_mock = srv
            .mock("POST", "/hooks/h7qbpszx13dxmhx1yqf1bmk5hd")
            .match_body(mockito::Matcher::JsonString(
                r#"{
                    "text": "**[ERROR]** boom",
                    "username": "Herald",
                    "channel": "town-square"
                }"#
                .into(),
            ))
            .with_body("ok")
            .create_async()
            .await;

        let delivered = webhook_logger(&srv.url(), Level::Debug)
            .error("boom", &Map::new())
            .await;

        hook_mock.assert_async().await;

        assert!(delivered);
    }

    #[tokio::test]
    async fn test_below_minimum_makes_no_request() {
        let mut srv = mockito::Server::new_async().await;

        let hook_mock = srv
            .mock("POST", "/hooks/h7qbpszx13dxmhx1yqf1bmk5hd")
            .expect(0)
            .create_async()
            .await;

        let delivered = webhook_logger(&srv.url(), Level::Warning)
            .info("routine", &Map::new())
            .await;

        hook_mock.assert_async().await;

        // Dropped on purpose, which is not a delivery failure.
        assert!(delivered);
    }

    #[tokio::test]
    async fn test_context_channel_override() {
        let mut srv = mockito::Server::new_async().await;

        let hook_mock = srv
            .mock("POST", "/hooks/h7qbpszx13dxmhx1yqf1bmk5hd")
            .match_body(mockito::Matcher::JsonString(
                r#"{
                    "text": "**[WARNING]** disk filling up",
                    "username": "Herald",
                    "channel": "ops-alerts"
                }"#
                .into(),
            ))
            .with_body("ok")
            .create_async()
            .await;

        let mut context = Map::new();
        context.insert("channel".into(), Value::from("ops-alerts"));

        let delivered = webhook_logger(&srv.url(), Level::Debug)
            .warning("disk filling up", &context)
            .await;

        hook_mock.assert_async().await;

        assert!(delivered);
    }

    #[tokio::test]
    async fn test_failed_delivery_reports_false() {
        let mut srv = mockito::Server::new_async().await;

        let hook_mock = srv
            .mock("POST", "/hooks/h7qbpszx13dxmhx1yqf1bmk5hd")
            .with_status(500)
            .create_async()
            .await;

        let delivered = webhook_logger(&srv.url(), Level::Debug)
            .error("boom", &Map::new())
            .await;

        hook_mock.assert_async().await;

        assert!(!delivered);
    }
}
