//! Official API endpoints
//!
//! Each function validates its input and builds a typed [`Request`]; [`OfficialApi`]
//! runs them on a client. Tags are sent with a URL-encoded `#` as the official API
//! expects.

use serde_json::json;

use super::ApiVariant;
use super::ClanSearch;
use super::Execute;
use super::LocationId;
use super::Page;
use super::Paging;
use super::Request;
use super::RequestDescriptor;
use crate::error::Error;
use crate::model::Battle;
use crate::model::Card;
use crate::model::ChestCycle;
use crate::model::Clan;
use crate::model::ClanMember;
use crate::model::ClanSummary;
use crate::model::ClanWar;
use crate::model::Location;
use crate::model::Player;
use crate::model::RankedPlayer;
use crate::model::TokenVerification;
use crate::model::Tournament;
use crate::model::WarLogEntry;
use crate::tag::Tag;

fn get<T>(path: String) -> Request<T> {
    Request::new(RequestDescriptor::get(ApiVariant::Official, path))
}

fn paged<T>(path: String, paging: &Paging) -> Request<T> {
    Request::new(RequestDescriptor::get(ApiVariant::Official, path).with_params(paging.to_query()))
}

fn tagged(tag: &str) -> Result<String, Error> {
    Ok(Tag::parse(tag)?.encoded())
}

// =============================================================================
// Players
// =============================================================================

/// `GET /players/{tag}`
pub fn player(tag: &str) -> Result<Request<Player>, Error> {
    Ok(get(format!("/players/{}", tagged(tag)?)))
}

/// `POST /players/{tag}/verifytoken`
pub fn verify_player_token(tag: &str, token: &str) -> Result<Request<TokenVerification>, Error> {
    if token.is_empty() {
        return Err(Error::invalid_parameter("token", "must not be empty"));
    }
    Ok(Request::new(RequestDescriptor::post(
        ApiVariant::Official,
        format!("/players/{}/verifytoken", tagged(tag)?),
        json!({ "token": token }),
    )))
}

/// `GET /players/{tag}/battlelog`
pub fn player_battles(tag: &str) -> Result<Request<Vec<Battle>>, Error> {
    Ok(get(format!("/players/{}/battlelog", tagged(tag)?)))
}

/// `GET /players/{tag}/upcomingchests`
pub fn player_chests(tag: &str) -> Result<Request<ChestCycle>, Error> {
    Ok(get(format!("/players/{}/upcomingchests", tagged(tag)?)))
}

// =============================================================================
// Clans
// =============================================================================

/// `GET /clans/{tag}`
pub fn clan(tag: &str) -> Result<Request<Clan>, Error> {
    Ok(get(format!("/clans/{}", tagged(tag)?)))
}

/// `GET /clans?name=...`
pub fn search_clans(search: &ClanSearch, paging: &Paging) -> Result<Request<Page<ClanSummary>>, Error> {
    let query = search.to_query(ApiVariant::Official)?;
    Ok(Request::new(
        RequestDescriptor::get(ApiVariant::Official, "/clans")
            .with_params(query)
            .with_params(paging.to_query()),
    ))
}

/// `GET /clans/{tag}/currentwar`
pub fn clan_war(tag: &str) -> Result<Request<ClanWar>, Error> {
    Ok(get(format!("/clans/{}/currentwar", tagged(tag)?)))
}

/// `GET /clans/{tag}/members`
pub fn clan_members(tag: &str, paging: &Paging) -> Result<Request<Page<ClanMember>>, Error> {
    Ok(paged(format!("/clans/{}/members", tagged(tag)?), paging))
}

/// `GET /clans/{tag}/warlog`
pub fn clan_war_log(tag: &str, paging: &Paging) -> Result<Request<Page<WarLogEntry>>, Error> {
    Ok(paged(format!("/clans/{}/warlog", tagged(tag)?), paging))
}

// =============================================================================
// Tournaments
// =============================================================================

/// `GET /tournaments/{tag}`
pub fn tournament(tag: &str) -> Result<Request<Tournament>, Error> {
    Ok(get(format!("/tournaments/{}", tagged(tag)?)))
}

/// `GET /tournaments?name=...`
pub fn search_tournaments(name: &str, paging: &Paging) -> Result<Request<Page<Tournament>>, Error> {
    if name.trim().is_empty() {
        return Err(Error::invalid_parameter("name", "must not be empty"));
    }
    Ok(Request::new(
        RequestDescriptor::get(ApiVariant::Official, "/tournaments")
            .with_query("name", name)
            .with_params(paging.to_query()),
    ))
}

// =============================================================================
// Cards and locations
// =============================================================================

/// `GET /cards`
pub fn all_cards() -> Request<Page<Card>> {
    get("/cards".to_string())
}

/// `GET /locations`
pub fn all_locations() -> Request<Page<Location>> {
    get("/locations".to_string())
}

/// `GET /locations/{id}`
pub fn location(id: i64) -> Request<Location> {
    get(format!("/locations/{}", id))
}

/// `GET /locations/{id}/rankings/clans`
pub fn top_clans(location: LocationId, paging: &Paging) -> Request<Page<ClanSummary>> {
    paged(format!("/locations/{}/rankings/clans", location), paging)
}

/// `GET /locations/{id}/rankings/clanwars`
pub fn top_clanwar_clans(location: LocationId, paging: &Paging) -> Request<Page<ClanSummary>> {
    paged(format!("/locations/{}/rankings/clanwars", location), paging)
}

/// `GET /locations/{id}/rankings/players`
pub fn top_players(location: LocationId, paging: &Paging) -> Request<Page<RankedPlayer>> {
    paged(format!("/locations/{}/rankings/players", location), paging)
}

// =============================================================================
// Client surface
// =============================================================================

/// Official API endpoints, available on every client.
///
/// Tags may be passed with or without the leading `#`.
///
/// # Example
///
/// ```ignore
/// use royale_lib::api::OfficialApi;
///
/// let player = client.get_player("#2P0LYQ")?;
/// println!("{} has {:?} trophies", player.name, player.trophies);
/// ```
pub trait OfficialApi: Execute {
    /// Gets a player profile.
    fn get_player(&self, tag: &str) -> Self::Output<Player> {
        self.run(player(tag))
    }

    /// Checks a player's API token from their in-game settings.
    fn verify_player_token(&self, tag: &str, token: &str) -> Self::Output<TokenVerification> {
        self.run(verify_player_token(tag, token))
    }

    /// Gets a player's recent battles.
    fn get_player_battles(&self, tag: &str) -> Self::Output<Vec<Battle>> {
        self.run(player_battles(tag))
    }

    /// Gets a player's upcoming chests.
    fn get_player_chests(&self, tag: &str) -> Self::Output<ChestCycle> {
        self.run(player_chests(tag))
    }

    /// Gets a clan with its member list.
    fn get_clan(&self, tag: &str) -> Self::Output<Clan> {
        self.run(clan(tag))
    }

    /// Searches clans; at least one filter must be set.
    fn search_clans(&self, search: ClanSearch, paging: Paging) -> Self::Output<Page<ClanSummary>> {
        self.run(search_clans(&search, &paging))
    }

    /// Gets a clan's current war.
    fn get_clan_war(&self, tag: &str) -> Self::Output<ClanWar> {
        self.run(clan_war(tag))
    }

    /// Gets a page of clan members.
    fn get_clan_members(&self, tag: &str, paging: Paging) -> Self::Output<Page<ClanMember>> {
        self.run(clan_members(tag, &paging))
    }

    /// Gets a page of a clan's past wars.
    fn get_clan_war_log(&self, tag: &str, paging: Paging) -> Self::Output<Page<WarLogEntry>> {
        self.run(clan_war_log(tag, &paging))
    }

    /// Gets a tournament.
    fn get_tournament(&self, tag: &str) -> Self::Output<Tournament> {
        self.run(tournament(tag))
    }

    /// Searches tournaments by name.
    fn search_tournaments(&self, name: &str, paging: Paging) -> Self::Output<Page<Tournament>> {
        self.run(search_tournaments(name, &paging))
    }

    /// Gets every card in the game.
    fn get_all_cards(&self) -> Self::Output<Page<Card>> {
        self.execute(all_cards())
    }

    /// Gets every location rankings are kept for.
    fn get_all_locations(&self) -> Self::Output<Page<Location>> {
        self.execute(all_locations())
    }

    /// Gets a location.
    fn get_location(&self, id: i64) -> Self::Output<Location> {
        self.execute(location(id))
    }

    /// Gets the clan trophy ranking.
    fn get_top_clans(&self, location: LocationId, paging: Paging) -> Self::Output<Page<ClanSummary>> {
        self.execute(top_clans(location, &paging))
    }

    /// Gets the clan war trophy ranking.
    fn get_top_clanwar_clans(&self, location: LocationId, paging: Paging) -> Self::Output<Page<ClanSummary>> {
        self.execute(top_clanwar_clans(location, &paging))
    }

    /// Gets the player trophy ranking.
    fn get_top_players(&self, location: LocationId, paging: Paging) -> Self::Output<Page<RankedPlayer>> {
        self.execute(top_players(location, &paging))
    }
}

impl<C: Execute + ?Sized> OfficialApi for C {}
