//! An in-memory [Directory] for exercising resolution without a server.

use crate::mattermost::channel::{Channel, ChannelId, ChannelName, ChannelType, Team, TeamId};
use crate::mattermost::directory::Directory;
use crate::mattermost::error::MattermostError;
use crate::mattermost::resolve::Diagnostics;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Construct a team fixture.
pub fn team(id: &str, display_name: &str) -> Team {
    Team {
        id: TeamId(id.into()),
        display_name: display_name.into(),
    }
}

/// Construct a channel fixture. An empty `team_id` means no team, as on the
/// wire.
pub fn channel(
    id: &str,
    name: &str,
    display_name: &str,
    channel_type: ChannelType,
    team_id: &str,
) -> Channel {
    Channel {
        id: ChannelId(id.into()),
        name: ChannelName(name.into()),
        display_name: ChannelName(display_name.into()),
        channel_type,
        team_id: (!team_id.is_empty()).then(|| TeamId(team_id.into())),
    }
}

/// In-memory directory double. Records every call made against it so tests
/// can assert on lookup order as well as outcomes.
#[derive(Default)]
pub struct FakeDirectory {
    pub teams: Vec<Team>,
    /// The bot's own memberships, across teams.
    pub mine: Vec<Channel>,
    /// Full channel listings, keyed by team ID.
    pub listings: HashMap<String, Vec<Channel>>,
    /// Team-scoped search results, keyed by team ID.
    pub searches: HashMap<String, Vec<Channel>>,
    /// Instance-wide search results.
    pub global: Vec<Channel>,
    /// Channel IDs the bot is a member of.
    pub members: HashSet<String>,
    /// When set, the team-scoped search endpoint fails.
    pub search_unavailable: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeDirectory {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Directory for FakeDirectory {
    async fn my_teams(&self) -> Result<Vec<Team>, MattermostError> {
        self.record("my_teams".into());
        Ok(self.teams.clone())
    }

    async fn my_channels(&self, _per_page: u16) -> Result<Vec<Channel>, MattermostError> {
        self.record("my_channels".into());
        Ok(self.mine.clone())
    }

    async fn team_channels(
        &self,
        team: &TeamId,
        _per_page: u16,
    ) -> Result<Vec<Channel>, MattermostError> {
        self.record(format!("team_channels:{}", team));
        Ok(self.listings.get(&team.0).cloned().unwrap_or_default())
    }

    async fn search_team_channels(
        &self,
        team: &TeamId,
        term: &str,
    ) -> Result<Vec<Channel>, MattermostError> {
        self.record(format!("search_team_channels:{}:{}", team, term));

        if self.search_unavailable {
            return Err(MattermostError::APIResponseError {
                status: 500,
                message: "search is down".into(),
            });
        }

        Ok(self.searches.get(&team.0).cloned().unwrap_or_default())
    }

    async fn search_channels(&self, term: &str) -> Result<Vec<Channel>, MattermostError> {
        self.record(format!("search_channels:{}", term));
        Ok(self.global.clone())
    }

    async fn is_member(&self, channel: &ChannelId) -> Result<bool, MattermostError> {
        self.record(format!("is_member:{}", channel));
        Ok(self.members.contains(&channel.0))
    }

    async fn post_message(
        &self,
        channel: &ChannelId,
        _message: &str,
    ) -> Result<(), MattermostError> {
        self.record(format!("post_message:{}", channel));
        Ok(())
    }
}

/// Discards diagnostics.
pub struct Silent;

impl Diagnostics for Silent {
    fn debug(&self, _message: String) {}

    fn warn(&self, _message: String) {}
}
