//! Battle log and chest cycle models

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::Arena;
use super::Card;
use super::Model;
use super::PlayerClan;
use super::parse_api_time;

/// A battle from a player's battle log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Battle {
    #[serde(rename = "type")]
    pub battle_type: String,
    pub battle_time: String,
    pub is_ladder_tournament: Option<bool>,
    pub arena: Option<Arena>,
    pub game_mode: Option<GameMode>,
    pub deck_selection: Option<String>,
    #[serde(default)]
    pub team: Vec<BattleTeam>,
    #[serde(default)]
    pub opponent: Vec<BattleTeam>,
}

impl Battle {
    /// Returns when the battle took place.
    pub fn battle_time(&self) -> Option<DateTime<Utc>> {
        parse_api_time(&self.battle_time).ok()
    }

    /// Returns the crowns won by each side, `(team, opponent)`.
    pub fn crowns(&self) -> (u32, u32) {
        let best = |side: &[BattleTeam]| side.iter().filter_map(|p| p.crowns).max().unwrap_or(0);
        (best(&self.team), best(&self.opponent))
    }
}

impl Model for Battle {}

/// A game mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMode {
    pub id: i64,
    pub name: String,
}

/// One player's side of a battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleTeam {
    pub tag: String,
    pub name: String,
    pub starting_trophies: Option<u32>,
    pub trophy_change: Option<i64>,
    pub crowns: Option<u32>,
    pub clan: Option<PlayerClan>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

/// Upcoming chests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChestCycle {
    #[serde(default)]
    pub items: Vec<Chest>,
}

impl ChestCycle {
    /// Returns how many chests away the first chest named `name` is.
    pub fn position_of(&self, name: &str) -> Option<u32> {
        self.items.iter().find(|c| c.name == name).map(|c| c.index)
    }
}

impl Model for ChestCycle {}

/// A chest in the cycle; `index` 0 is the next chest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chest {
    pub index: u32,
    pub name: String,
}
