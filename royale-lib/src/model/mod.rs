//! Typed models
//!
//! Official API endpoints decode into the typed structures in this module. Mirror
//! endpoints, whose payloads vary with the `keys`/`exclude` filters, decode into the
//! dynamic [`Record`].

mod battle;
mod clan;
mod constants;
mod location;
mod player;
mod record;
mod tournament;

pub use battle::*;
pub use clan::*;
pub use constants::*;
pub use location::*;
pub use player::*;
pub use record::*;
pub use tournament::*;

use chrono::DateTime;
use chrono::NaiveDateTime;
use chrono::Utc;
use serde::de::DeserializeOwned;

/// Timestamp format used by the API, e.g. `20180718T145906.000Z`.
pub const API_TIME_FORMAT: &str = "%Y%m%dT%H%M%S%.fZ";

/// Naming convention for keys exposed by dynamic models.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum KeyStyle {
    /// `max_trophies`
    #[default]
    SnakeCase,
    /// `maxTrophies`, as the API sends it.
    CamelCase,
}

impl KeyStyle {
    /// Converts an API key into this style.
    pub fn apply(self, key: &str) -> String {
        match self {
            Self::SnakeCase => to_snake_case(key),
            Self::CamelCase => key.to_string(),
        }
    }
}

/// A value a response body decodes into.
///
/// Typed models only need [`DeserializeOwned`]; dynamic models also receive the
/// client's [`KeyStyle`] after decoding.
pub trait Model: DeserializeOwned + Send + 'static {
    /// Applies the client's key naming convention.
    fn apply_key_style(&mut self, _style: KeyStyle) {}
}

impl Model for String {}

impl Model for serde_json::Value {}

impl<T: Model> Model for Vec<T> {
    fn apply_key_style(&mut self, style: KeyStyle) {
        for item in self {
            item.apply_key_style(style);
        }
    }
}

/// Converts `camelCase` to `snake_case`.
///
/// An underscore goes between a lowercase letter or digit and the following
/// uppercase letter, and before an uppercase letter that starts a capitalized word:
/// `HTTPResponse` becomes `http_response`.
///
/// # Example
///
/// ```
/// use royale_lib::model::to_snake_case;
///
/// assert_eq!(to_snake_case("maxTrophies"), "max_trophies");
/// assert_eq!(to_snake_case("clanWarTrophies"), "clan_war_trophies");
/// ```
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (next_is_lower && prev != '_');
            if boundary {
                out.push('_');
            }
        }
        out.push(c.to_ascii_lowercase());
    }
    out
}

/// Converts `snake_case` to `camelCase`.
///
/// This does not undo [`to_snake_case`] on acronym keys: `http_response` becomes
/// `httpResponse`, not `HTTPResponse`. [`Record`] falls back to matching the
/// snake_case form of each key for those.
///
/// # Example
///
/// ```
/// use royale_lib::model::to_camel_case;
///
/// assert_eq!(to_camel_case("max_trophies"), "maxTrophies");
/// ```
pub fn to_camel_case(name: &str) -> String {
    let mut parts = name.split('_');
    let mut out = parts.next().unwrap_or_default().to_string();
    for part in parts {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out
}

/// Parses an API timestamp such as `20180718T145906.000Z`.
pub fn parse_api_time(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, API_TIME_FORMAT).map(|t| t.and_utc())
}
