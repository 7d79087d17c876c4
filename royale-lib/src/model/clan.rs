//! Clan and clan war models

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::Arena;
use super::Location;
use super::Model;
use super::PlayerClan;
use super::parse_api_time;
use crate::tag::Tag;

/// A clan with its member list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clan {
    pub tag: String,
    pub name: String,
    #[serde(rename = "type")]
    pub clan_type: Option<String>,
    pub description: Option<String>,
    pub badge_id: Option<i64>,
    pub clan_score: Option<u32>,
    pub clan_war_trophies: Option<u32>,
    pub location: Option<Location>,
    pub required_trophies: Option<u32>,
    pub donations_per_week: Option<u32>,
    pub members: Option<u32>,
    #[serde(default)]
    pub member_list: Vec<ClanMember>,
}

impl Clan {
    /// Returns the tags of all members.
    pub fn member_tags(&self) -> Vec<Tag> {
        self.member_list
            .iter()
            .filter_map(|member| Tag::parse(&member.tag).ok())
            .collect()
    }
}

impl Model for Clan {}

/// A clan member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanMember {
    pub tag: String,
    pub name: String,
    pub role: Option<String>,
    pub last_seen: Option<String>,
    pub exp_level: Option<u32>,
    pub trophies: Option<u32>,
    pub arena: Option<Arena>,
    pub clan_rank: Option<u32>,
    pub previous_clan_rank: Option<u32>,
    pub donations: Option<u32>,
    pub donations_received: Option<u32>,
}

impl ClanMember {
    /// Returns when the member was last online.
    pub fn last_seen_at(&self) -> Option<DateTime<Utc>> {
        self.last_seen.as_deref().and_then(|t| parse_api_time(t).ok())
    }
}

impl Model for ClanMember {}

/// A clan as listed in search results and rankings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanSummary {
    pub tag: String,
    pub name: String,
    #[serde(rename = "type")]
    pub clan_type: Option<String>,
    pub badge_id: Option<i64>,
    pub clan_score: Option<u32>,
    pub clan_war_trophies: Option<u32>,
    pub location: Option<Location>,
    pub members: Option<u32>,
    pub required_trophies: Option<u32>,
    /// Position in a ranking; absent in search results.
    pub rank: Option<u32>,
    pub previous_rank: Option<i64>,
}

impl Model for ClanSummary {}

/// A player as listed in rankings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPlayer {
    pub tag: String,
    pub name: String,
    pub exp_level: Option<u32>,
    pub trophies: Option<u32>,
    pub rank: Option<u32>,
    pub previous_rank: Option<i64>,
    pub clan: Option<PlayerClan>,
    pub arena: Option<Arena>,
}

impl Model for RankedPlayer {}

/// The current clan war.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanWar {
    /// `notInWar`, `collectionDay`, `matchMaking` or `warDay`.
    pub state: String,
    pub collection_end_time: Option<String>,
    pub war_end_time: Option<String>,
    pub clan: Option<WarClan>,
    #[serde(default)]
    pub participants: Vec<WarParticipant>,
    #[serde(default)]
    pub clans: Vec<WarClan>,
}

impl ClanWar {
    /// Returns when the current war phase ends.
    pub fn ends_at(&self) -> Option<DateTime<Utc>> {
        self.war_end_time
            .as_deref()
            .or(self.collection_end_time.as_deref())
            .and_then(|t| parse_api_time(t).ok())
    }
}

impl Model for ClanWar {}

/// A clan's standing in a war.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarClan {
    pub tag: String,
    pub name: String,
    pub badge_id: Option<i64>,
    pub clan_score: Option<u32>,
    pub participants: Option<u32>,
    pub battles_played: Option<u32>,
    pub wins: Option<u32>,
    pub crowns: Option<u32>,
}

/// A player's war participation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarParticipant {
    pub tag: String,
    pub name: String,
    pub cards_earned: Option<u32>,
    pub battles_played: Option<u32>,
    pub wins: Option<u32>,
    pub collection_day_battles_played: Option<u32>,
    pub number_of_battles: Option<u32>,
}

/// A finished war.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarLogEntry {
    pub season_id: Option<u32>,
    pub created_date: Option<String>,
    #[serde(default)]
    pub participants: Vec<WarParticipant>,
    #[serde(default)]
    pub standings: Vec<WarStanding>,
}

impl WarLogEntry {
    /// Returns when the war ended.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_date.as_deref().and_then(|t| parse_api_time(t).ok())
    }
}

impl Model for WarLogEntry {}

/// A clan's final position in a war.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarStanding {
    pub clan: WarClan,
    pub trophy_change: Option<i64>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_clan_member_tags() {
        let clan: Clan = serde_json::from_value(json!({
            "tag": "#8L9L9GL",
            "name": "Reddit Delta",
            "type": "inviteOnly",
            "memberList": [
                {"tag": "#2P0LYQ", "name": "Eric", "lastSeen": "20180718T145906.000Z"},
                {"tag": "#CCV9UY", "name": "Sam"}
            ]
        }))
        .unwrap();

        assert_eq!(clan.clan_type.as_deref(), Some("inviteOnly"));
        let tags: Vec<String> = clan.member_tags().into_iter().map(Tag::into_string).collect();
        assert_eq!(tags, vec!["2P0LYQ", "CCV9UY"]);
        assert!(clan.member_list[0].last_seen_at().is_some());
        assert!(clan.member_list[1].last_seen_at().is_none());
    }

    #[test]
    fn test_war_log_entry() {
        let entry: WarLogEntry = serde_json::from_value(json!({
            "seasonId": 12,
            "createdDate": "20180718T145906.000Z",
            "standings": [{"clan": {"tag": "#8L9L9GL", "name": "Reddit Delta"}, "trophyChange": -25}]
        }))
        .unwrap();
        assert!(entry.created_at().is_some());
        assert_eq!(entry.standings[0].trophy_change, Some(-25));
    }

    #[test]
    fn test_clan_war_not_in_war() {
        let war: ClanWar = serde_json::from_value(json!({"state": "notInWar"})).unwrap();
        assert!(war.participants.is_empty());
        assert_eq!(war.ends_at(), None);
    }
}
