//! RoyaleAPI mirror endpoints
//!
//! The mirror's payloads change shape with the [`MirrorFilter`] `keys`/`exclude`
//! options, so most endpoints decode into the dynamic [`Record`]. Tags are sent
//! without the `#` marker; several endpoints accept a comma-separated list of tags.

use super::ApiVariant;
use super::ClanBattleType;
use super::ClanSearch;
use super::Execute;
use super::MirrorFilter;
use super::Request;
use super::RequestDescriptor;
use super::TournamentFilter;
use crate::error::Error;
use crate::model::Constants;
use crate::model::Record;
use crate::tag::Tag;

/// Country key for worldwide rankings.
pub const ALL_COUNTRIES: &str = "all";

fn get<T>(path: String, filter: &MirrorFilter) -> Request<T> {
    Request::new(RequestDescriptor::get(ApiVariant::Mirror, path).with_params(filter.to_query()))
}

fn tagged(tag: &str) -> Result<String, Error> {
    Ok(Tag::parse(tag)?.into_string())
}

fn tag_list<I>(tags: I) -> Result<String, Error>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let tags = tags
        .into_iter()
        .map(|tag| tagged(tag.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    if tags.is_empty() {
        return Err(Error::invalid_parameter("tags", "at least one tag is required"));
    }
    Ok(tags.join(","))
}

fn country(key: &str) -> Result<&str, Error> {
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(Error::invalid_parameter("country", "must be a country key such as `all` or `US`"));
    }
    Ok(key)
}

// =============================================================================
// Meta
// =============================================================================

/// `GET /version`
pub fn version() -> Request<String> {
    get("/version".to_string(), &MirrorFilter::new())
}

/// `GET /endpoints`
pub fn endpoints() -> Request<Vec<String>> {
    get("/endpoints".to_string(), &MirrorFilter::new())
}

/// `GET /constants`
pub fn constants(filter: &MirrorFilter) -> Request<Constants> {
    get("/constants".to_string(), filter)
}

/// `GET /auth/stats`
///
/// Reports the token's quota usage and is never blocked by the rate-limit guard.
pub fn auth_stats() -> Request<Record> {
    get("/auth/stats".to_string(), &MirrorFilter::new())
}

// =============================================================================
// Players
// =============================================================================

/// `GET /player/{tag}`
pub fn player(tag: &str, filter: &MirrorFilter) -> Result<Request<Record>, Error> {
    Ok(get(format!("/player/{}", tagged(tag)?), filter))
}

/// `GET /player/{tag},{tag},...`
pub fn players<I>(tags: I, filter: &MirrorFilter) -> Result<Request<Vec<Record>>, Error>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    Ok(get(format!("/player/{}", tag_list(tags)?), filter))
}

/// `GET /player/{tag}/verify?token=...`
pub fn verify_player(tag: &str, token: &str) -> Result<Request<Record>, Error> {
    if token.is_empty() {
        return Err(Error::invalid_parameter("token", "must not be empty"));
    }
    Ok(Request::new(
        RequestDescriptor::get(ApiVariant::Mirror, format!("/player/{}/verify", tagged(tag)?))
            .with_query("token", token),
    ))
}

/// `GET /player/{tag}/battles`
pub fn player_battles(tag: &str, filter: &MirrorFilter) -> Result<Request<Vec<Record>>, Error> {
    Ok(get(format!("/player/{}/battles", tagged(tag)?), filter))
}

/// `GET /player/{tag}/chests`
pub fn player_chests(tag: &str, filter: &MirrorFilter) -> Result<Request<Record>, Error> {
    Ok(get(format!("/player/{}/chests", tagged(tag)?), filter))
}

// =============================================================================
// Clans
// =============================================================================

/// `GET /clan/{tag}`
pub fn clan(tag: &str, filter: &MirrorFilter) -> Result<Request<Record>, Error> {
    Ok(get(format!("/clan/{}", tagged(tag)?), filter))
}

/// `GET /clan/{tag},{tag},...`
pub fn clans<I>(tags: I, filter: &MirrorFilter) -> Result<Request<Vec<Record>>, Error>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    Ok(get(format!("/clan/{}", tag_list(tags)?), filter))
}

/// `GET /clan/search`
pub fn search_clans(search: &ClanSearch, filter: &MirrorFilter) -> Result<Request<Vec<Record>>, Error> {
    let query = search.to_query(ApiVariant::Mirror)?;
    Ok(Request::new(
        RequestDescriptor::get(ApiVariant::Mirror, "/clan/search")
            .with_params(query)
            .with_params(filter.to_query()),
    ))
}

/// `GET /clan/tracking`
pub fn tracking_clans(filter: &MirrorFilter) -> Request<Vec<Record>> {
    get("/clan/tracking".to_string(), filter)
}

/// `GET /clan/{tag}/tracking`
pub fn clan_tracking(tag: &str, filter: &MirrorFilter) -> Result<Request<Record>, Error> {
    Ok(get(format!("/clan/{}/tracking", tagged(tag)?), filter))
}

/// `GET /clan/{tag}/battles?type=...`
pub fn clan_battles(
    tag: &str,
    battle_type: ClanBattleType,
    filter: &MirrorFilter,
) -> Result<Request<Vec<Record>>, Error> {
    let request: Request<Vec<Record>> = get(format!("/clan/{}/battles", tagged(tag)?), filter);
    let (descriptor, _) = request.into_parts();
    Ok(Request::new(descriptor.with_query("type", battle_type.as_str())))
}

/// `GET /clan/{tag}/history`
pub fn clan_history(tag: &str, filter: &MirrorFilter) -> Result<Request<Record>, Error> {
    Ok(get(format!("/clan/{}/history", tagged(tag)?), filter))
}

/// `GET /clan/{tag}/war`
pub fn clan_war(tag: &str, filter: &MirrorFilter) -> Result<Request<Record>, Error> {
    Ok(get(format!("/clan/{}/war", tagged(tag)?), filter))
}

/// `GET /clan/{tag}/warlog`
pub fn clan_war_log(tag: &str, filter: &MirrorFilter) -> Result<Request<Vec<Record>>, Error> {
    Ok(get(format!("/clan/{}/warlog", tagged(tag)?), filter))
}

// =============================================================================
// Tournaments
// =============================================================================

/// `GET /tournaments/{tag}`
pub fn tournament(tag: &str, filter: &MirrorFilter) -> Result<Request<Record>, Error> {
    Ok(get(format!("/tournaments/{}", tagged(tag)?), filter))
}

/// `GET /tournaments/search?name=...`
pub fn search_tournaments(name: &str, filter: &MirrorFilter) -> Result<Request<Vec<Record>>, Error> {
    if name.trim().is_empty() {
        return Err(Error::invalid_parameter("name", "must not be empty"));
    }
    Ok(Request::new(
        RequestDescriptor::get(ApiVariant::Mirror, "/tournaments/search")
            .with_query("name", name)
            .with_params(filter.to_query()),
    ))
}

fn tournament_list(path: &str, filter: &TournamentFilter) -> Request<Vec<Record>> {
    Request::new(RequestDescriptor::get(ApiVariant::Mirror, path).with_params(filter.to_query()))
}

/// `GET /tournaments/known`
pub fn known_tournaments(filter: &TournamentFilter) -> Request<Vec<Record>> {
    tournament_list("/tournaments/known", filter)
}

/// `GET /tournaments/open`
pub fn open_tournaments(filter: &TournamentFilter) -> Request<Vec<Record>> {
    tournament_list("/tournaments/open", filter)
}

/// `GET /tournaments/1k`
pub fn one_k_tournaments(filter: &TournamentFilter) -> Request<Vec<Record>> {
    tournament_list("/tournaments/1k", filter)
}

/// `GET /tournaments/inprep`
pub fn prep_tournaments(filter: &TournamentFilter) -> Request<Vec<Record>> {
    tournament_list("/tournaments/inprep", filter)
}

/// `GET /tournaments/joinable`
pub fn joinable_tournaments(filter: &TournamentFilter) -> Request<Vec<Record>> {
    tournament_list("/tournaments/joinable", filter)
}

/// `GET /tournaments/full`
pub fn full_tournaments(filter: &TournamentFilter) -> Request<Vec<Record>> {
    tournament_list("/tournaments/full", filter)
}

// =============================================================================
// Rankings and popularity
// =============================================================================

/// `GET /top/clans/{country}`
pub fn top_clans(country_key: &str, filter: &MirrorFilter) -> Result<Request<Vec<Record>>, Error> {
    Ok(get(format!("/top/clans/{}", country(country_key)?), filter))
}

/// `GET /top/war/{country}`
pub fn top_war_clans(country_key: &str, filter: &MirrorFilter) -> Result<Request<Vec<Record>>, Error> {
    Ok(get(format!("/top/war/{}", country(country_key)?), filter))
}

/// `GET /top/players/{country}`
pub fn top_players(country_key: &str, filter: &MirrorFilter) -> Result<Request<Vec<Record>>, Error> {
    Ok(get(format!("/top/players/{}", country(country_key)?), filter))
}

/// `GET /popular/clans`
pub fn popular_clans(filter: &MirrorFilter) -> Request<Vec<Record>> {
    get("/popular/clans".to_string(), filter)
}

/// `GET /popular/players`
pub fn popular_players(filter: &MirrorFilter) -> Request<Vec<Record>> {
    get("/popular/players".to_string(), filter)
}

/// `GET /popular/tournament`
pub fn popular_tournaments(filter: &MirrorFilter) -> Request<Vec<Record>> {
    get("/popular/tournament".to_string(), filter)
}

/// `GET /popular/decks`
pub fn popular_decks(filter: &MirrorFilter) -> Request<Vec<Record>> {
    get("/popular/decks".to_string(), filter)
}

// =============================================================================
// Client surface
// =============================================================================

/// RoyaleAPI mirror endpoints, available on every client configured for
/// [`ApiVariant::Mirror`].
///
/// # Example
///
/// ```ignore
/// use royale_lib::api::{MirrorFilter, RoyaleApi};
///
/// let player = client.get_player("#2P0LYQ", MirrorFilter::new().keys(["name", "trophies"]))?;
/// println!("{:?}", player.get_str("name"));
/// ```
pub trait RoyaleApi: Execute {
    /// Gets the API version.
    fn get_version(&self) -> Self::Output<String> {
        self.execute(version())
    }

    /// Lists the API's endpoints.
    fn get_endpoints(&self) -> Self::Output<Vec<String>> {
        self.execute(endpoints())
    }

    /// Gets the game constants used for card, rarity, badge and arena lookups.
    fn get_constants(&self, filter: MirrorFilter) -> Self::Output<Constants> {
        self.execute(constants(&filter))
    }

    /// Gets a player.
    fn get_player(&self, tag: &str, filter: MirrorFilter) -> Self::Output<Record> {
        self.run(player(tag, &filter))
    }

    /// Gets several players in one request.
    fn get_players(&self, tags: &[&str], filter: MirrorFilter) -> Self::Output<Vec<Record>> {
        self.run(players(tags, &filter))
    }

    /// Checks a player's API token from their in-game settings.
    fn verify_player(&self, tag: &str, token: &str) -> Self::Output<Record> {
        self.run(verify_player(tag, token))
    }

    /// Gets a player's recent battles.
    fn get_player_battles(&self, tag: &str, filter: MirrorFilter) -> Self::Output<Vec<Record>> {
        self.run(player_battles(tag, &filter))
    }

    /// Gets a player's upcoming chests.
    fn get_player_chests(&self, tag: &str, filter: MirrorFilter) -> Self::Output<Record> {
        self.run(player_chests(tag, &filter))
    }

    /// Gets a clan.
    fn get_clan(&self, tag: &str, filter: MirrorFilter) -> Self::Output<Record> {
        self.run(clan(tag, &filter))
    }

    /// Gets several clans in one request.
    fn get_clans(&self, tags: &[&str], filter: MirrorFilter) -> Self::Output<Vec<Record>> {
        self.run(clans(tags, &filter))
    }

    /// Searches clans; at least one filter must be set.
    fn search_clans(&self, search: ClanSearch, filter: MirrorFilter) -> Self::Output<Vec<Record>> {
        self.run(search_clans(&search, &filter))
    }

    /// Lists clans the mirror tracks.
    fn get_tracking_clans(&self, filter: MirrorFilter) -> Self::Output<Vec<Record>> {
        self.execute(tracking_clans(&filter))
    }

    /// Gets whether the mirror tracks a clan.
    fn get_clan_tracking(&self, tag: &str, filter: MirrorFilter) -> Self::Output<Record> {
        self.run(clan_tracking(tag, &filter))
    }

    /// Gets the battles of a clan's members.
    fn get_clan_battles(
        &self,
        tag: &str,
        battle_type: ClanBattleType,
        filter: MirrorFilter,
    ) -> Self::Output<Vec<Record>> {
        self.run(clan_battles(tag, battle_type, &filter))
    }

    /// Gets a tracked clan's history.
    fn get_clan_history(&self, tag: &str, filter: MirrorFilter) -> Self::Output<Record> {
        self.run(clan_history(tag, &filter))
    }

    /// Gets a clan's current war.
    fn get_clan_war(&self, tag: &str, filter: MirrorFilter) -> Self::Output<Record> {
        self.run(clan_war(tag, &filter))
    }

    /// Gets a clan's past wars.
    fn get_clan_war_log(&self, tag: &str, filter: MirrorFilter) -> Self::Output<Vec<Record>> {
        self.run(clan_war_log(tag, &filter))
    }

    /// Gets a tournament.
    fn get_tournament(&self, tag: &str, filter: MirrorFilter) -> Self::Output<Record> {
        self.run(tournament(tag, &filter))
    }

    /// Searches tournaments by name.
    fn search_tournaments(&self, name: &str, filter: MirrorFilter) -> Self::Output<Vec<Record>> {
        self.run(search_tournaments(name, &filter))
    }

    /// Gets the clan trophy ranking of a country, or [`ALL_COUNTRIES`].
    fn get_top_clans(&self, country_key: &str, filter: MirrorFilter) -> Self::Output<Vec<Record>> {
        self.run(top_clans(country_key, &filter))
    }

    /// Gets the clan war ranking of a country, or [`ALL_COUNTRIES`].
    fn get_top_war_clans(&self, country_key: &str, filter: MirrorFilter) -> Self::Output<Vec<Record>> {
        self.run(top_war_clans(country_key, &filter))
    }

    /// Gets the player trophy ranking of a country, or [`ALL_COUNTRIES`].
    fn get_top_players(&self, country_key: &str, filter: MirrorFilter) -> Self::Output<Vec<Record>> {
        self.run(top_players(country_key, &filter))
    }

    /// Gets the most looked-up clans.
    fn get_popular_clans(&self, filter: MirrorFilter) -> Self::Output<Vec<Record>> {
        self.execute(popular_clans(&filter))
    }

    /// Gets the most looked-up players.
    fn get_popular_players(&self, filter: MirrorFilter) -> Self::Output<Vec<Record>> {
        self.execute(popular_players(&filter))
    }

    /// Gets the most looked-up tournaments.
    fn get_popular_tournaments(&self, filter: MirrorFilter) -> Self::Output<Vec<Record>> {
        self.execute(popular_tournaments(&filter))
    }

    /// Gets the most used decks.
    fn get_popular_decks(&self, filter: MirrorFilter) -> Self::Output<Vec<Record>> {
        self.execute(popular_decks(&filter))
    }

    /// Lists every tournament the mirror knows of.
    fn get_known_tournaments(&self, filter: TournamentFilter) -> Self::Output<Vec<Record>> {
        self.execute(known_tournaments(&filter))
    }

    /// Lists open tournaments.
    fn get_open_tournaments(&self, filter: TournamentFilter) -> Self::Output<Vec<Record>> {
        self.execute(open_tournaments(&filter))
    }

    /// Lists tournaments with at least 1000 max players.
    fn get_1k_tournaments(&self, filter: TournamentFilter) -> Self::Output<Vec<Record>> {
        self.execute(one_k_tournaments(&filter))
    }

    /// Lists tournaments in preparation.
    fn get_prep_tournaments(&self, filter: TournamentFilter) -> Self::Output<Vec<Record>> {
        self.execute(prep_tournaments(&filter))
    }

    /// Lists joinable tournaments.
    fn get_joinable_tournaments(&self, filter: TournamentFilter) -> Self::Output<Vec<Record>> {
        self.execute(joinable_tournaments(&filter))
    }

    /// Lists full tournaments.
    fn get_full_tournaments(&self, filter: TournamentFilter) -> Self::Output<Vec<Record>> {
        self.execute(full_tournaments(&filter))
    }

    /// Gets the token's quota usage.
    fn get_auth_stats(&self) -> Self::Output<Record> {
        self.execute(auth_stats())
    }
}

impl<C: Execute + ?Sized> RoyaleApi for C {}
