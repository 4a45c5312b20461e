use crate::mattermost::channel::ChannelName;
use std::fmt;

/// Sum type representing every possible unexceptional fail state.
#[derive(Debug)]
pub enum MattermostError {
    APIRequestFailed(reqwest::Error),
    APIResponseError { status: u16, message: String },
    NoTeamAccess,
    UnknownChannel { reference: ChannelName, teams: Vec<String> },
    DeliveryFailed { status: u16, message: String },
}

impl From<reqwest::Error> for MattermostError {
    fn from(e: reqwest::Error) -> Self {
        MattermostError::APIRequestFailed(e)
    }
}

impl fmt::Display for MattermostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = match self {
            MattermostError::APIRequestFailed(e) => {
                format!("Mattermost API request failed: {:?}", e)
            }
            MattermostError::APIResponseError { status, message } => {
                format!("Mattermost API returned error ({}): {}", status, message)
            }
            MattermostError::NoTeamAccess => "Bot is not a member of any team".into(),
            MattermostError::UnknownChannel { reference, teams } => format!(
                "Channel '{}' not found. Bot has access to teams: {}. \
                 Note: for private channels, bot must be explicitly added as a member",
                reference,
                teams.join(", ")
            ),
            MattermostError::DeliveryFailed { status, message } => {
                format!("Mattermost rejected the post ({}): {}", status, message)
            }
        };

        write!(f, "{}", x)
    }
}

impl std::error::Error for MattermostError {}
