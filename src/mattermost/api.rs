//! Type definitions and helpers for the Mattermost REST API.

use crate::mattermost::auth::{to_auth_header_val, BotToken};
use crate::mattermost::error::MattermostError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// The path prefix shared by every endpoint of the v4 REST API.
const API_PREFIX: &str = "/api/v4";

/// Every remote call shares this timeout. There are no retries; a call that
/// times out simply failed.
pub(super) const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A client for a single Mattermost instance, holding a connection pool
/// internally as per [reqwest::Client].
#[derive(Debug)]
pub struct MattermostClient {
    base_url: String,
    token: BotToken,
    http: reqwest::Client,
}

impl MattermostClient {
    pub fn new(base_url: String, token: BotToken) -> MattermostClient {
        MattermostClient {
            base_url: base_url.trim_end_matches('/').to_owned(),
            token,
            http: reqwest::Client::new(),
        }
    }

    /// Create a GET request to any Mattermost API endpoint, handling
    /// authentication and the per-call timeout.
    pub(super) fn get<T: ToString>(&self, path: T) -> reqwest::RequestBuilder {
        self.http
            .get(self.base_url.to_owned() + API_PREFIX + &path.to_string())
            .header(
                reqwest::header::AUTHORIZATION,
                to_auth_header_val(&self.token),
            )
            .timeout(REQUEST_TIMEOUT)
    }

    /// Create a POST request to any Mattermost API endpoint, handling
    /// authentication and the per-call timeout.
    pub(super) fn post<T: ToString>(&self, path: T) -> reqwest::RequestBuilder {
        self.http
            .post(self.base_url.to_owned() + API_PREFIX + &path.to_string())
            .header(
                reqwest::header::AUTHORIZATION,
                to_auth_header_val(&self.token),
            )
            .timeout(REQUEST_TIMEOUT)
    }

    /// Fetch the authenticated account. Useful as a connectivity check.
    pub async fn me(&self) -> Result<Me, MattermostError> {
        read_json(self.get("/users/me").send().await?).await
    }
}

/// The bot's own account, as seen by the server.
///
/// <https://api.mattermost.com/#tag/users/operation/GetUser>
#[derive(Deserialize)]
pub struct Me {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub roles: String,
}

/// The universal error body Mattermost attaches to non-success status codes.
///
/// ```json
/// {
///     "id": "api.context.session_expired.app_error",
///     "message": "Invalid or expired session, please login again.",
///     "status_code": 401
/// }
/// ```
#[derive(Deserialize)]
pub(super) struct ErrorResponse {
    #[allow(dead_code)]
    pub id: String,
    pub message: String,
    #[allow(dead_code)]
    pub status_code: u16,
}

/// Deserialize a successful response, mapping non-success status codes onto
/// the error body Mattermost attaches to them.
// Success and failure bodies have entirely different shapes, so the status
// must be checked before deserializing.
pub(super) async fn read_json<T: DeserializeOwned>(
    res: reqwest::Response,
) -> Result<T, MattermostError> {
    let status = res.status();

    if status.is_success() {
        Ok(res.json().await?)
    } else {
        Err(MattermostError::APIResponseError {
            status: status.as_u16(),
            message: read_error_message(res).await,
        })
    }
}

/// Pull the human-readable message out of an error response, falling back to
/// the HTTP reason phrase when the body is missing or malformed.
pub(super) async fn read_error_message(res: reqwest::Response) -> String {
    let reason = res
        .status()
        .canonical_reason()
        .unwrap_or("unknown error")
        .to_owned();

    match res.json::<ErrorResponse>().await {
        Ok(body) => body.message,
        Err(_) => reason,
    }
}
