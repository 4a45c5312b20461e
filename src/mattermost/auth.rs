//! Helpers around Mattermost's use of Bearer Authentication for bot
//! accounts.

/// A newtype wrapper around Mattermost bot access tokens.
#[derive(Clone, Debug)]
pub struct BotToken(pub String);

/// Convert a bot token to a `Bearer` `Authorization` header value.
///
/// ```
/// use herald::mattermost::auth::{to_auth_header_val, BotToken};
///
/// let token = BotToken("9xuqwrwgstok5tmedlatim5rea".into());
/// assert_eq!(
///     to_auth_header_val(&token),
///     "Bearer 9xuqwrwgstok5tmedlatim5rea"
/// );
/// ```
pub fn to_auth_header_val(t: &BotToken) -> String {
    format!("Bearer {}", t.0)
}
