//! Game constants
//!
//! Static game data (cards, rarities, arenas and clan badges) in the layout of the
//! RoyaleAPI `cr-api-data` `constants.json`, which the mirror serves at `/constants`.
//! [`Constants`] resolves badge and arena ids to artwork URLs and card names to ids.

use serde::Deserialize;
use serde::Serialize;

use super::Clan;
use super::DECK_LINK_BASE;
use super::Model;
use super::Player;
use crate::error::Error;

/// Badge shown for players without a clan and for records without a badge id.
pub const DEFAULT_BADGE_URL: &str = "https://i.imgur.com/Y3uXsgj.png";

/// Base URL of clan badge artwork, followed by `{badge name}.png`.
pub const BADGE_ASSET_BASE: &str = "https://royaleapi.github.io/cr-api-assets/badges/";

/// Base URL of arena artwork, followed by `arena{arena number}.png`.
pub const ARENA_ASSET_BASE: &str = "https://royaleapi.github.io/cr-api-assets/arenas/";

/// Static game data.
///
/// Lists missing from the payload (for example when fetched with a `keys` filter)
/// decode as empty.
///
/// # Example
///
/// ```
/// use royale_lib::model::Constants;
///
/// let constants = Constants::from_json(r#"{
///     "cards": [{"key": "knight", "name": "Knight", "id": 26000000, "elixir": 3, "rarity": "Common"}],
///     "alliance_badges": [{"id": 16000002, "name": "Flame_03", "category": "01_Flame"}]
/// }"#).unwrap();
///
/// assert_eq!(constants.card_info("Knight").map(|c| c.id), Some(26000000));
/// assert_eq!(
///     constants.clan_badge_url(Some(16000002)).as_deref(),
///     Some("https://royaleapi.github.io/cr-api-assets/badges/Flame_03.png"),
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constants {
    #[serde(default)]
    pub cards: Vec<CardInfo>,
    #[serde(default)]
    pub rarities: Vec<RarityInfo>,
    #[serde(default)]
    pub arenas: Vec<ArenaInfo>,
    #[serde(default, alias = "allianceBadges")]
    pub alliance_badges: Vec<AllianceBadge>,
}

impl Constants {
    /// Parses a `constants.json` document.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(|e| Error::decode(e.to_string(), None))
    }

    /// Looks up a card by its English name, e.g. `"Knight"`.
    pub fn card_info(&self, name: &str) -> Option<&CardInfo> {
        self.cards.iter().find(|card| card.name == name)
    }

    /// Looks up a rarity by name, e.g. `"Legendary"`.
    pub fn rarity_info(&self, name: &str) -> Option<&RarityInfo> {
        self.rarities.iter().find(|rarity| rarity.name == name)
    }

    /// Returns the artwork URL of a clan badge.
    ///
    /// A missing badge id gives [`DEFAULT_BADGE_URL`]; an id not in the badge list gives
    /// `None`.
    pub fn clan_badge_url(&self, badge_id: Option<i64>) -> Option<String> {
        let Some(badge_id) = badge_id else {
            return Some(DEFAULT_BADGE_URL.to_string());
        };
        self.alliance_badges
            .iter()
            .find(|badge| badge.id == badge_id)
            .map(|badge| format!("{}{}.png", BADGE_ASSET_BASE, badge.name))
    }

    /// Returns the artwork URL of an arena, given the arena id the API reports
    /// (`54000012`, not the arena number).
    pub fn arena_image_url(&self, arena_id: i64) -> Option<String> {
        self.arenas
            .iter()
            .find(|arena| arena.id == arena_id)
            .map(|arena| format!("{}arena{}.png", ARENA_ASSET_BASE, arena.arena_id))
    }

    /// Builds a deck link from card names.
    ///
    /// `None` if the list is empty or a name is unknown.
    pub fn deck_link<'a, I>(&self, names: I) -> Option<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let ids = names
            .into_iter()
            .map(|name| self.card_info(name).map(|card| card.id.to_string()))
            .collect::<Option<Vec<_>>>()?;
        if ids.is_empty() {
            return None;
        }
        Some(format!("{}{}", DECK_LINK_BASE, ids.join(";")))
    }

    /// Badge artwork of a player's clan, or the default badge if they have none.
    pub fn player_badge_url(&self, player: &Player) -> Option<String> {
        self.clan_badge_url(player.clan.as_ref().and_then(|clan| clan.badge_id))
    }

    /// Artwork of a player's current arena.
    pub fn player_arena_url(&self, player: &Player) -> Option<String> {
        player
            .arena
            .as_ref()
            .and_then(|arena| self.arena_image_url(arena.id))
    }

    /// Badge artwork of a clan.
    pub fn clan_url(&self, clan: &Clan) -> Option<String> {
        self.clan_badge_url(clan.badge_id)
    }
}

impl Model for Constants {}

/// A card in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardInfo {
    pub key: Option<String>,
    pub name: String,
    pub id: i64,
    pub elixir: Option<u32>,
    /// `Troop`, `Spell` or `Building`.
    #[serde(rename = "type")]
    pub card_type: Option<String>,
    pub rarity: Option<String>,
    /// Arena number the card unlocks in.
    pub arena: Option<u32>,
    pub description: Option<String>,
}

/// Per-rarity card progression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RarityInfo {
    pub name: String,
    #[serde(alias = "levelCount")]
    pub level_count: Option<u32>,
    #[serde(alias = "relativeLevel")]
    pub relative_level: Option<u32>,
    #[serde(alias = "donateCapacity")]
    pub donate_capacity: Option<u32>,
    #[serde(alias = "donateXp")]
    pub donate_xp: Option<u32>,
    #[serde(default, alias = "upgradeCost")]
    pub upgrade_cost: Vec<u32>,
    #[serde(default, alias = "upgradeMaterialCount")]
    pub upgrade_material_count: Vec<u32>,
}

/// An arena. `id` is the value the API reports, `arena_id` the arena number used by
/// artwork.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaInfo {
    pub id: i64,
    #[serde(alias = "arenaId")]
    pub arena_id: u32,
    pub name: String,
    pub key: Option<String>,
    pub title: Option<String>,
    #[serde(alias = "trophyLimit")]
    pub trophy_limit: Option<u32>,
}

/// A clan badge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllianceBadge {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
}
