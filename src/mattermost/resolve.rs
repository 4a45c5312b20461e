//! Channel resolution: turning a free-form channel reference into the
//! channel ID the posting API requires.
//!
//! References that already carry an ID short-circuit without touching the
//! network. Everything else is searched for team by team through a tiered
//! sequence of progressively broader lookups, returning the first exact
//! name or display-name match the bot can actually use. Lookups are
//! sequential, never fanned out; that bounds load on the remote API and
//! keeps the first-match-wins tie-break deterministic.

use crate::mattermost::channel::{Channel, ChannelId, ChannelName, ChannelRef, ChannelType, Team};
use crate::mattermost::directory::{Directory, PAGE_SIZE};
use crate::mattermost::error::MattermostError;

/// Sink for resolution diagnostics. Callers provide the concrete
/// implementation, keeping the resolver free of any global logging facade.
pub trait Diagnostics: Send + Sync {
    fn debug(&self, message: String);
    fn warn(&self, message: String);
}

/// Forwards diagnostics to [tracing].
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn debug(&self, message: String) {
        tracing::debug!("{}", message);
    }

    fn warn(&self, message: String) {
        tracing::warn!("{}", message);
    }
}

/// Resolves channel references against a [Directory].
///
/// Resolution is stateless: every call re-queries the directory, so
/// separate calls may observe different remote state but never each other.
pub struct Resolver<'a, D> {
    directory: &'a D,
    channel_prefix: &'a str,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a, D: Directory> Resolver<'a, D> {
    pub fn new(
        directory: &'a D,
        channel_prefix: &'a str,
        diagnostics: &'a dyn Diagnostics,
    ) -> Resolver<'a, D> {
        Resolver {
            directory,
            channel_prefix,
            diagnostics,
        }
    }

    /// Resolve a free-form channel reference to a channel ID.
    ///
    /// ID-form references are returned verbatim, unchecked. Name references
    /// are prefixed with the configured channel prefix (if any) and searched
    /// for team by team, in the order the directory lists the bot's teams:
    ///
    /// 1. the team's search endpoint, skipping non-open matches the bot is
    ///    not a member of;
    /// 2. the bot's own channel memberships;
    /// 3. the team's full channel listing.
    ///
    /// A reference no team can satisfy falls back to one instance-wide
    /// search whose first hit, if any, wins. Failure of any single lookup
    /// downgrades to "this tier found nothing", except the initial team
    /// enumeration, without which resolution cannot proceed at all.
    pub async fn resolve(&self, reference: &str) -> Result<ChannelId, MattermostError> {
        let name = match ChannelRef::parse(reference) {
            ChannelRef::Id(id) => {
                self.diagnostics
                    .debug(format!("Using channel ID verbatim: {}", id));
                return Ok(id);
            }
            ChannelRef::Name(name) => name,
        };

        let term = self.prefixed(&name);
        self.diagnostics
            .debug(format!("Resolving channel: '{}'", term));

        let teams = self.directory.my_teams().await?;
        if teams.is_empty() {
            return Err(MattermostError::NoTeamAccess);
        }
        self.diagnostics
            .debug(format!("Bot is a member of {} team(s)", teams.len()));

        for team in &teams {
            self.diagnostics.debug(format!(
                "Searching in team: {} ({})",
                team.display_name, team.id
            ));

            if let Some(id) = self.search_tier(team, &term).await {
                return Ok(id);
            }

            if let Some(id) = self.membership_tier(&term).await {
                return Ok(id);
            }

            if let Some(id) = self.listing_tier(team, &term).await {
                return Ok(id);
            }
        }

        // Lowest-confidence fallback: one instance-wide search, first hit
        // wins. No membership probe happens here; posting to an
        // inaccessible hit fails at delivery time instead.
        self.diagnostics.debug("Trying direct channel search".into());
        match self.directory.search_channels(&term.0).await {
            Ok(found) => {
                if let Some(channel) = found.first() {
                    self.diagnostics
                        .debug(format!("Found via direct search: ID = {}", channel.id));
                    return Ok(channel.id.clone());
                }
            }
            Err(e) => {
                self.diagnostics
                    .warn(format!("Direct channel search failed: {}", e));
            }
        }

        Err(MattermostError::UnknownChannel {
            reference: term,
            teams: teams.into_iter().map(|t| t.display_name).collect(),
        })
    }

    /// Apply the configured channel prefix, unless there is none or the
    /// reference already carries it.
    fn prefixed(&self, name: &ChannelName) -> ChannelName {
        if self.channel_prefix.is_empty() || name.0.starts_with(self.channel_prefix) {
            name.clone()
        } else {
            ChannelName(format!("{}{}", self.channel_prefix, name.0))
        }
    }

    /// Tier one: the team's search endpoint. Exact matches that turn out to
    /// be channels the bot cannot post in are skipped rather than fatal; a
    /// channel of the same name may exist elsewhere.
    async fn search_tier(&self, team: &Team, term: &ChannelName) -> Option<ChannelId> {
        let found = match self.directory.search_team_channels(&team.id, &term.0).await {
            Ok(found) => found,
            Err(e) => {
                self.diagnostics.warn(format!(
                    "Search API failed for team {}: {}",
                    team.display_name, e
                ));
                return None;
            }
        };
        self.diagnostics
            .debug(format!("Search API returned {} result(s)", found.len()));

        for channel in found {
            if !matches(&channel, term) {
                continue;
            }
            self.diagnostics
                .debug(format!("Exact match found: ID = {}", channel.id));

            if channel.channel_type == ChannelType::Open {
                return Some(channel.id);
            }

            match self.directory.is_member(&channel.id).await {
                Ok(true) => {
                    self.diagnostics
                        .debug("Bot is a member of this private channel".into());
                    return Some(channel.id);
                }
                Ok(false) => {
                    self.diagnostics
                        .warn(format!("Bot is NOT a member of channel '{}'", term));
                }
                Err(e) => {
                    self.diagnostics
                        .warn(format!("Membership check failed for '{}': {}", term, e));
                }
            }
        }

        None
    }

    /// Tier two: scan the bot's own memberships. A hit needs no further
    /// membership probe.
    async fn membership_tier(&self, term: &ChannelName) -> Option<ChannelId> {
        let mine = match self.directory.my_channels(PAGE_SIZE).await {
            Ok(mine) => mine,
            Err(e) => {
                self.diagnostics
                    .warn(format!("Fetching own channels failed: {}", e));
                return None;
            }
        };
        self.diagnostics
            .debug(format!("Bot is a member of {} channel(s)", mine.len()));

        let hit = mine.into_iter().find(|c| matches(c, term))?;
        self.diagnostics
            .debug(format!("Found in bot's channel list: ID = {}", hit.id));
        Some(hit.id)
    }

    /// Tier three: the team's full channel listing. Only open channels are
    /// listed, so a hit needs no membership probe either.
    async fn listing_tier(&self, team: &Team, term: &ChannelName) -> Option<ChannelId> {
        let channels = match self.directory.team_channels(&team.id, PAGE_SIZE).await {
            Ok(channels) => channels,
            Err(e) => {
                self.diagnostics.warn(format!(
                    "Listing channels failed for team {}: {}",
                    team.display_name, e
                ));
                return None;
            }
        };

        let hit = channels.into_iter().find(|c| matches(c, term))?;
        self.diagnostics
            .debug(format!("Found in team channels: ID = {}", hit.id));
        Some(hit.id)
    }
}

/// Exact match on either the URL name or the display name. No
/// normalisation, no partial matches; the first hit in directory order wins.
fn matches(channel: &Channel, term: &ChannelName) -> bool {
    channel.name == *term || channel.display_name == *term
}
