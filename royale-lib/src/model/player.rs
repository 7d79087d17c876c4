//! Player models

use serde::Deserialize;
use serde::Serialize;

use super::Model;
use crate::tag::Tag;

/// Base URL of in-game deck links.
pub const DECK_LINK_BASE: &str = "https://link.clashroyale.com/deck/en?deck=";

/// A player profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub tag: String,
    pub name: String,
    pub exp_level: Option<u32>,
    pub trophies: Option<u32>,
    pub best_trophies: Option<u32>,
    pub wins: Option<u32>,
    pub losses: Option<u32>,
    pub battle_count: Option<u32>,
    pub three_crown_wins: Option<u32>,
    pub challenge_cards_won: Option<u32>,
    pub challenge_max_wins: Option<u32>,
    pub tournament_cards_won: Option<u32>,
    pub tournament_battle_count: Option<u32>,
    pub role: Option<String>,
    pub donations: Option<u32>,
    pub donations_received: Option<u32>,
    pub total_donations: Option<u32>,
    pub war_day_wins: Option<u32>,
    pub clan_cards_collected: Option<u32>,
    pub clan: Option<PlayerClan>,
    pub arena: Option<Arena>,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub current_deck: Vec<Card>,
    pub current_favourite_card: Option<Card>,
}

impl Player {
    /// Returns the in-game link that copies the player's current deck.
    ///
    /// `None` if the player has no current deck.
    pub fn deck_link(&self) -> Option<String> {
        deck_link(&self.current_deck)
    }

    /// Returns the tag of the player's clan, if they are in one.
    pub fn clan_tag(&self) -> Option<Tag> {
        self.clan.as_ref().and_then(|clan| Tag::parse(&clan.tag).ok())
    }
}

impl Model for Player {}

/// Builds a deck link from card ids.
///
/// # Example
///
/// ```
/// use royale_lib::model::{deck_link, Card};
///
/// let deck: Vec<Card> = serde_json::from_str(
///     r#"[{"name":"Knight","id":26000000},{"name":"Archers","id":26000001}]"#,
/// ).unwrap();
/// assert_eq!(
///     deck_link(&deck).unwrap(),
///     "https://link.clashroyale.com/deck/en?deck=26000000;26000001",
/// );
/// ```
pub fn deck_link(cards: &[Card]) -> Option<String> {
    if cards.is_empty() {
        return None;
    }
    let ids = cards
        .iter()
        .map(|card| card.id.to_string())
        .collect::<Vec<_>>()
        .join(";");
    Some(format!("{}{}", DECK_LINK_BASE, ids))
}

/// The clan a player belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerClan {
    pub tag: String,
    pub name: String,
    pub badge_id: Option<i64>,
}

/// A trophy arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arena {
    pub id: i64,
    pub name: String,
}

/// A card, either in a player's collection or in the card catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub name: String,
    pub id: i64,
    pub level: Option<u32>,
    pub max_level: Option<u32>,
    pub count: Option<u32>,
    pub icon_urls: Option<IconUrls>,
}

impl Model for Card {}

/// Card artwork.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconUrls {
    pub medium: Option<String>,
}

/// Result of checking a player's API token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenVerification {
    pub tag: String,
    pub token: String,
    pub status: String,
}

impl TokenVerification {
    /// Returns `true` if the token belongs to the player.
    pub fn is_valid(&self) -> bool {
        self.status == "ok"
    }
}

impl Model for TokenVerification {}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn player() -> Player {
        serde_json::from_value(json!({
            "tag": "#2P0LYQ",
            "name": "Eric",
            "expLevel": 13,
            "trophies": 5400,
            "clan": {"tag": "#8L9L9GL", "name": "Reddit Delta", "badgeId": 16000002},
            "arena": {"id": 54000012, "name": "Legendary Arena"},
            "currentDeck": [
                {"name": "Knight", "id": 26000000, "level": 13, "maxLevel": 13},
                {"name": "Archers", "id": 26000001, "level": 13, "maxLevel": 13}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_player_decodes_camel_case() {
        let player = player();
        assert_eq!(player.exp_level, Some(13));
        assert_eq!(player.arena.unwrap().name, "Legendary Arena");
        assert!(player.cards.is_empty());
    }

    #[test]
    fn test_deck_link() {
        assert_eq!(
            player().deck_link().unwrap(),
            "https://link.clashroyale.com/deck/en?deck=26000000;26000001"
        );
        assert_eq!(deck_link(&[]), None);
    }

    #[test]
    fn test_clan_tag() {
        assert_eq!(player().clan_tag().unwrap().as_str(), "8L9L9GL");
        let mut clanless = player();
        clanless.clan = None;
        assert_eq!(clanless.clan_tag(), None);
    }

    #[test]
    fn test_token_verification() {
        let result: TokenVerification =
            serde_json::from_value(json!({"tag": "#2P0LYQ", "token": "abc", "status": "ok"})).unwrap();
        assert!(result.is_valid());
    }
}
