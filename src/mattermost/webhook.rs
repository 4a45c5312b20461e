//! Deliver messages through a Mattermost incoming webhook.
//!
//! Webhooks bypass channel resolution entirely: the payload carries a raw
//! channel name (or none, for the webhook's default channel) and the server
//! does the rest.

use crate::mattermost::api::REQUEST_TIMEOUT;
use crate::mattermost::error::MattermostError;
use crate::mattermost::message::render;
use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

/// <https://developers.mattermost.com/integrate/webhooks/incoming/>
#[derive(Serialize)]
struct WebhookRequest<'a> {
    text: String,
    username: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    channel: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon_url: Option<&'a Url>,
}

/// Posts messages to a single incoming-webhook URL.
#[derive(Debug)]
pub struct WebhookSender {
    url: Url,
    username: String,
    icon_url: Option<Url>,
    http: reqwest::Client,
}

impl WebhookSender {
    pub fn new(url: Url, username: String, icon_url: Option<Url>) -> WebhookSender {
        WebhookSender {
            url,
            username,
            icon_url,
            http: reqwest::Client::new(),
        }
    }

    /// Post `message` to the webhook, appending `context` as a fenced JSON
    /// block when non-empty. `channel: None` posts to the channel the
    /// webhook was created with.
    pub async fn send(
        &self,
        channel: Option<&str>,
        message: &str,
        context: &Map<String, Value>,
    ) -> Result<(), MattermostError> {
        let res = self
            .http
            .post(self.url.clone())
            .timeout(REQUEST_TIMEOUT)
            .json(&WebhookRequest {
                text: render(message, context),
                username: &self.username,
                channel,
                icon_url: self.icon_url.as_ref(),
            })
            .send()
            .await?;

        let status = res.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(MattermostError::DeliveryFailed {
                status: status.as_u16(),
                message: res.text().await.unwrap_or_default(),
            })
        }
    }
}
