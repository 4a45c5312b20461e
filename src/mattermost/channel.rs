//! Channel and team identity types, and classification of the free-form
//! channel references callers may supply.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Channel names as are visible in the Mattermost UI, either the URL name
/// (`town-square`) or the display name (`Town Square`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelName(pub String);

/// Format without the surrounding newtype wrapper.
///
/// ```
/// use herald::mattermost::channel::ChannelName;
///
/// let x = ChannelName("town-square".into());
/// assert_eq!(format!("{}", x), "town-square");
/// ```
impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Because channel names can change, channels are ultimately referred to by
/// their underlying 26-character ID. The posting API accepts nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelId(pub String);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Teams partition the bot's visibility into channels; resolution walks them
/// in the order the server lists them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamId(pub String);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TeamId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<TeamId, Infallible> {
        Ok(TeamId(s.into()))
    }
}

/// The metadata we care about per-team within the membership listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub display_name: String,
}

/// Mattermost's single-letter channel type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ChannelType {
    #[serde(rename = "O")]
    Open,
    #[serde(rename = "P")]
    Private,
    #[serde(rename = "D")]
    Direct,
    #[serde(rename = "G")]
    Group,
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x = match self {
            ChannelType::Open => "open",
            ChannelType::Private => "private",
            ChannelType::Direct => "direct",
            ChannelType::Group => "group",
        };

        write!(f, "{}", x)
    }
}

/// The metadata we care about per-channel in listing and search responses.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    pub name: ChannelName,
    pub display_name: ChannelName,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    /// Direct and group channels carry an empty `team_id` on the wire.
    #[serde_as(as = "NoneAsEmptyString")]
    pub team_id: Option<TeamId>,
}

/// The prefix marking a reference that already carries a channel ID.
const ID_PREFIX: &str = "id__";

/// A free-form channel reference as supplied by callers: either a channel ID
/// in disguise (the `id__` prefix form, or a bare 26-character ID), or a
/// name still to be resolved against the directory.
pub enum ChannelRef {
    Id(ChannelId),
    Name(ChannelName),
}

impl ChannelRef {
    /// Classify a raw reference. ID forms are taken verbatim and never
    /// trigger a remote lookup.
    pub fn parse(raw: &str) -> ChannelRef {
        if let Some(id) = raw.strip_prefix(ID_PREFIX) {
            return ChannelRef::Id(ChannelId(id.into()));
        }

        if is_raw_id(raw) {
            return ChannelRef::Id(ChannelId(raw.into()));
        }

        ChannelRef::Name(ChannelName(raw.into()))
    }
}

/// Mattermost IDs are exactly 26 lowercase alphanumeric characters.
fn is_raw_id(s: &str) -> bool {
    Regex::new(r"^[a-z0-9]{26}$")
        .ok()
        .is_some_and(|re| re.is_match(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    fn parses_as_id(raw: &str) -> Option<String> {
        match ChannelRef::parse(raw) {
            ChannelRef::Id(ChannelId(id)) => Some(id),
            ChannelRef::Name(_) => None,
        }
    }

    #[test]
    fn test_parse_prefixed_id() {
        assert_eq!(parses_as_id("id__abc123"), Some("abc123".into()));

        // The remainder is trusted verbatim, whatever it looks like.
        assert_eq!(parses_as_id("id__"), Some("".into()));
        assert_eq!(parses_as_id("id__Weird Value"), Some("Weird Value".into()));
    }

    #[test]
    fn test_parse_raw_id() {
        let id = "abcdefghijklmnopqrstuvwxyz";
        assert_eq!(id.len(), 26);
        assert_eq!(parses_as_id(id), Some(id.into()));

        let digits = "4xp9fdt77pgi2q9hg3iywqtrsa";
        assert_eq!(parses_as_id(digits), Some(digits.into()));
    }

    #[test]
    fn test_parse_name() {
        assert_eq!(parses_as_id("town-square"), None);

        // Hyphens, uppercase, and off-by-one lengths all disqualify the raw
        // ID form.
        assert_eq!(parses_as_id("abcdefghijklmnopqrstuvwxy"), None);
        assert_eq!(parses_as_id("abcdefghijklmnopqrstuvwxyz0"), None);
        assert_eq!(parses_as_id("Abcdefghijklmnopqrstuvwxyz"), None);
        assert_eq!(parses_as_id("abcdefghijklm-opqrstuvwxyz"), None);
    }

    quickcheck! {
        fn prop_raw_id_charset(seed: Vec<u8>) -> bool {
            const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

            if seed.len() < 26 {
                return true;
            }

            let id: String = seed
                .iter()
                .take(26)
                .map(|b| CHARSET[*b as usize % CHARSET.len()] as char)
                .collect();

            parses_as_id(&id) == Some(id)
        }
    }
}
