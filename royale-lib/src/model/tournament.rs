//! Tournament models

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::Model;
use super::PlayerClan;
use super::parse_api_time;

/// A tournament. Search results omit the timing and member fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub tag: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub tournament_type: Option<String>,
    pub status: Option<String>,
    pub creator_tag: Option<String>,
    pub capacity: Option<u32>,
    pub max_capacity: Option<u32>,
    pub level_cap: Option<u32>,
    pub first_place_card_prize: Option<u32>,
    pub preparation_duration: Option<u64>,
    pub duration: Option<u64>,
    pub created_time: Option<String>,
    pub started_time: Option<String>,
    pub ended_time: Option<String>,
    #[serde(default)]
    pub members_list: Vec<TournamentMember>,
}

impl Tournament {
    /// Returns when the tournament was created.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_time.as_deref().and_then(|t| parse_api_time(t).ok())
    }

    /// Returns when the tournament started.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_time.as_deref().and_then(|t| parse_api_time(t).ok())
    }

    /// Returns `true` if no more players can join.
    pub fn is_full(&self) -> bool {
        matches!((self.capacity, self.max_capacity), (Some(c), Some(m)) if c >= m)
    }
}

impl Model for Tournament {}

/// A tournament participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentMember {
    pub tag: String,
    pub name: String,
    pub score: Option<u32>,
    pub rank: Option<u32>,
    pub clan: Option<PlayerClan>,
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_tournament() {
        let tournament: Tournament = serde_json::from_value(json!({
            "tag": "#2PP",
            "name": "Weekly Cup",
            "type": "open",
            "capacity": 50,
            "maxCapacity": 50,
            "createdTime": "20180718T145906.000Z",
            "membersList": [{"tag": "#2P0LYQ", "name": "Eric", "score": 12, "rank": 1}]
        }))
        .unwrap();
        assert_eq!(tournament.created_at().unwrap().year(), 2018);
        assert_eq!(tournament.started_at(), None);
        assert!(tournament.is_full());
        assert_eq!(tournament.members_list[0].rank, Some(1));
    }
}
