//! Location model

use serde::Deserialize;
use serde::Serialize;

use super::Model;

/// A region or country used by rankings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub is_country: bool,
    pub country_code: Option<String>,
}

impl Model for Location {}
