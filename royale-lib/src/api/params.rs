//! Query parameter builders

use crate::api::ApiVariant;
use crate::error::Error;

/// Cursor-based paging for official API list endpoints.
///
/// # Example
///
/// ```
/// use royale_lib::api::Paging;
///
/// let paging = Paging::new().limit(50);
/// assert_eq!(paging.to_query(), vec![("limit".to_string(), "50".to_string())]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paging {
    limit: Option<u32>,
    after: Option<String>,
    before: Option<String>,
}

impl Paging {
    /// Creates paging with no limit and no cursor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits the number of items per page.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Starts after a cursor returned by a previous page.
    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self.before = None;
        self
    }

    /// Starts before a cursor returned by a previous page.
    pub fn before(mut self, cursor: impl Into<String>) -> Self {
        self.before = Some(cursor.into());
        self.after = None;
        self
    }

    /// Returns the query parameters.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(limit) = self.limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(after) = &self.after {
            query.push(("after".to_string(), after.clone()));
        }
        if let Some(before) = &self.before {
            query.push(("before".to_string(), before.clone()));
        }
        query
    }
}

/// Clan search filters. At least one filter must be set.
///
/// The official API and the mirror accept slightly different filters: only the
/// official API filters by location, and the mirror calls the minimum score `score`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClanSearch {
    name: Option<String>,
    location_id: Option<i64>,
    min_members: Option<u32>,
    max_members: Option<u32>,
    min_score: Option<u32>,
}

impl ClanSearch {
    /// Creates an empty search.
    pub fn new() -> Self {
        Self::default()
    }

    /// Searches by clan name (at least 3 characters).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Restricts results to a location.
    pub fn location_id(mut self, id: i64) -> Self {
        self.location_id = Some(id);
        self
    }

    /// Sets the minimum member count.
    pub fn min_members(mut self, n: u32) -> Self {
        self.min_members = Some(n);
        self
    }

    /// Sets the maximum member count.
    pub fn max_members(mut self, n: u32) -> Self {
        self.max_members = Some(n);
        self
    }

    /// Sets the minimum clan score.
    pub fn min_score(mut self, score: u32) -> Self {
        self.min_score = Some(score);
        self
    }

    /// Validates the filters and returns the query parameters for an API.
    pub fn to_query(&self, variant: ApiVariant) -> Result<Vec<(String, String)>, Error> {
        if let Some(name) = &self.name {
            if name.chars().count() < 3 {
                return Err(Error::invalid_parameter("name", "must be at least 3 characters long"));
            }
        }

        let mut query = Vec::new();
        if let Some(name) = &self.name {
            query.push(("name".to_string(), name.clone()));
        }
        if let Some(id) = self.location_id {
            if variant == ApiVariant::Mirror {
                return Err(Error::invalid_parameter(
                    "locationId",
                    "not supported by the RoyaleAPI mirror",
                ));
            }
            query.push(("locationId".to_string(), id.to_string()));
        }
        if let Some(n) = self.min_members {
            query.push(("minMembers".to_string(), n.to_string()));
        }
        if let Some(n) = self.max_members {
            query.push(("maxMembers".to_string(), n.to_string()));
        }
        if let Some(score) = self.min_score {
            let key = match variant {
                ApiVariant::Official => "minScore",
                ApiVariant::Mirror => "score",
            };
            query.push((key.to_string(), score.to_string()));
        }

        if query.is_empty() {
            return Err(Error::invalid_parameter("search", "at least one filter must be set"));
        }
        Ok(query)
    }
}

/// Response shaping accepted by every mirror endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorFilter {
    keys: Vec<String>,
    exclude: Vec<String>,
    max: Option<u32>,
    page: Option<u32>,
}

impl MirrorFilter {
    /// Creates an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only include these keys in the response.
    pub fn keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Exclude these keys from the response.
    pub fn exclude<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Limit the number of items returned.
    pub fn max(mut self, max: u32) -> Self {
        self.max = Some(max);
        self
    }

    /// Zero-based page of items, used with [`max`](Self::max).
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Returns the query parameters.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if !self.keys.is_empty() {
            query.push(("keys".to_string(), self.keys.join(",")));
        }
        if !self.exclude.is_empty() {
            query.push(("exclude".to_string(), self.exclude.join(",")));
        }
        if let Some(max) = self.max {
            query.push(("max".to_string(), max.to_string()));
        }
        if let Some(page) = self.page {
            query.push(("page".to_string(), page.to_string()));
        }
        query
    }
}

/// Tournament list filters for the mirror.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TournamentFilter {
    filter: MirrorFilter,
    one_k: Option<bool>,
    open: Option<bool>,
    full: Option<bool>,
    prep: Option<bool>,
    joinable: Option<bool>,
}

impl TournamentFilter {
    /// Creates an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies generic response shaping.
    pub fn with(mut self, filter: MirrorFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Only tournaments with at least 1000 max players.
    pub fn one_k(mut self, yes: bool) -> Self {
        self.one_k = Some(yes);
        self
    }

    /// Only open tournaments.
    pub fn open(mut self, yes: bool) -> Self {
        self.open = Some(yes);
        self
    }

    /// Only full tournaments.
    pub fn full(mut self, yes: bool) -> Self {
        self.full = Some(yes);
        self
    }

    /// Only tournaments in preparation.
    pub fn prep(mut self, yes: bool) -> Self {
        self.prep = Some(yes);
        self
    }

    /// Only joinable tournaments.
    pub fn joinable(mut self, yes: bool) -> Self {
        self.joinable = Some(yes);
        self
    }

    /// Returns the query parameters.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = self.filter.to_query();
        let flags = [
            ("1k", self.one_k),
            ("open", self.open),
            ("full", self.full),
            ("inprep", self.prep),
            ("joinable", self.joinable),
        ];
        for (key, value) in flags {
            if let Some(value) = value {
                query.push((key.to_string(), if value { "1" } else { "0" }.to_string()));
            }
        }
        query
    }
}

/// Scope of an official ranking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LocationId {
    /// The worldwide ranking.
    #[default]
    Global,
    /// A region or country from [`get_all_locations`](crate::api::OfficialApi::get_all_locations).
    Id(i64),
}

impl From<i64> for LocationId {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl std::fmt::Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Id(id) => write!(f, "{}", id),
        }
    }
}

/// Which battles of a clan's members the mirror returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClanBattleType {
    /// Every battle.
    #[default]
    All,
    /// Clan war battles.
    War,
    /// Friendly battles between clan mates.
    ClanMate,
}

impl ClanBattleType {
    /// Returns the query value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::War => "war",
            Self::ClanMate => "clanMate",
        }
    }
}
