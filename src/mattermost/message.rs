//! Send formatted log messages through the bot API, resolving the target
//! channel on every call.

use crate::mattermost::api::MattermostClient;
use crate::mattermost::channel::ChannelId;
use crate::mattermost::directory::Directory;
use crate::mattermost::error::MattermostError;
use crate::mattermost::resolve::{Diagnostics, Resolver, TracingDiagnostics};
use serde_json::{Map, Value};

/// Posts messages through a bot account, resolving free-form channel
/// references each time.
pub struct BotSender {
    client: MattermostClient,
    channel_prefix: String,
    diagnostics: Box<dyn Diagnostics>,
}

impl BotSender {
    pub fn new(client: MattermostClient, channel_prefix: String) -> BotSender {
        BotSender {
            client,
            channel_prefix,
            diagnostics: Box::new(TracingDiagnostics),
        }
    }

    /// Replace the default [tracing]-backed diagnostics sink.
    pub fn with_diagnostics(mut self, diagnostics: Box<dyn Diagnostics>) -> BotSender {
        self.diagnostics = diagnostics;
        self
    }

    /// Resolve `channel` and post `message` there, appending `context` as a
    /// fenced JSON block when non-empty.
    pub async fn send(
        &self,
        channel: &str,
        message: &str,
        context: &Map<String, Value>,
    ) -> Result<(), MattermostError> {
        let resolver = Resolver::new(
            &self.client,
            &self.channel_prefix,
            self.diagnostics.as_ref(),
        );
        let channel_id = resolver.resolve(channel).await?;

        self.diagnostics
            .debug(format!("Sending payload to channel ID: {}", channel_id));
        self.post(&channel_id, &render(message, context)).await
    }

    async fn post(&self, channel: &ChannelId, text: &str) -> Result<(), MattermostError> {
        self.client.post_message(channel, text).await
    }
}

/// Append a fenced, pretty-printed JSON context block to a message, if any
/// context was given.
pub fn render(message: &str, context: &Map<String, Value>) -> String {
    if context.is_empty() {
        return message.to_owned();
    }

    let json = serde_json::to_string_pretty(context).unwrap_or_default();
    format!("{}\n```json\n{}\n```", message, json)
}
