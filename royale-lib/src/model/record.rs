//! Dynamic JSON record

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;

use super::KeyStyle;
use super::Model;
use super::to_camel_case;
use super::to_snake_case;
use crate::error::Error;
use crate::error::FieldError;
use crate::error::JsonKind;

/// A dynamic JSON object returned by the API.
///
/// Keys are accepted in the client's [`KeyStyle`]: with the default snake_case style,
/// `get_i64("max_trophies")` reads the API's `maxTrophies`. The exact API key is always
/// accepted too.
///
/// Typed getters return `Err` if the field is missing or holds another JSON type, and
/// `Ok(None)` only if the field exists and is `null`.
///
/// # Example
///
/// ```
/// use royale_lib::model::Record;
///
/// let record: Record = serde_json::from_str(r#"{"name":"Eric","maxTrophies":5724}"#).unwrap();
///
/// assert_eq!(record.get_str("name").unwrap(), Some("Eric"));
/// assert_eq!(record.get_i64("max_trophies").unwrap(), Some(5724));
/// assert_eq!(record.keys(), vec!["max_trophies", "name"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Map<String, Value>,
    style: KeyStyle,
}

impl Record {
    /// Creates a record from a JSON object.
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            style: KeyStyle::default(),
        }
    }

    /// Creates a record from a JSON value, failing if it is not an object.
    pub fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Object(fields) => Ok(Self::from_map(fields)),
            other => Err(Error::decode(
                format!("expected a JSON object, got {}", JsonKind::of(&other)),
                Some(other.to_string()),
            )),
        }
    }

    /// Returns the record with a different key style.
    pub fn with_style(mut self, style: KeyStyle) -> Self {
        self.style = style;
        self
    }

    /// Returns the key style.
    pub fn style(&self) -> KeyStyle {
        self.style
    }

    // =========================================================================
    // Raw field access
    // =========================================================================

    /// Returns the raw value of a field, if it exists.
    ///
    /// Snake_case names whose camelCase form is not an API key (acronym keys such as
    /// `HTTPResponse`, listed as `http_response`) are matched by scanning the keys.
    pub fn get(&self, field: &str) -> Option<&Value> {
        if let Some(value) = self.fields.get(field) {
            return Some(value);
        }
        match self.style {
            KeyStyle::SnakeCase => self.fields.get(&to_camel_case(field)).or_else(|| {
                self.fields
                    .iter()
                    .find(|(key, _)| to_snake_case(key) == field)
                    .map(|(_, value)| value)
            }),
            KeyStyle::CamelCase => None,
        }
    }

    /// Returns `true` if the record contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Returns the field names in the record's key style.
    pub fn keys(&self) -> Vec<String> {
        self.fields.keys().map(|k| self.style.apply(k)).collect()
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the underlying JSON object with the API's keys.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consumes the record and returns the JSON object.
    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }

    /// Decodes the record into a typed model.
    pub fn to_model<T: DeserializeOwned>(&self) -> Result<T, Error> {
        T::deserialize(Value::Object(self.fields.clone()))
            .map_err(|e| Error::decode(e.to_string(), None))
    }

    // =========================================================================
    // Typed getters
    // =========================================================================

    fn lookup(&self, field: &str) -> Result<&Value, FieldError> {
        self.get(field).ok_or_else(|| FieldError::missing(field))
    }

    /// Gets a string field value.
    pub fn get_str(&self, field: &str) -> Result<Option<&str>, FieldError> {
        match self.lookup(field)? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s.as_str())),
            other => Err(FieldError::mismatch(field, JsonKind::String, other)),
        }
    }

    /// Gets a boolean field value.
    pub fn get_bool(&self, field: &str) -> Result<Option<bool>, FieldError> {
        match self.lookup(field)? {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(*b)),
            other => Err(FieldError::mismatch(field, JsonKind::Bool, other)),
        }
    }

    /// Gets an integer field value.
    pub fn get_i64(&self, field: &str) -> Result<Option<i64>, FieldError> {
        match self.lookup(field)? {
            Value::Null => Ok(None),
            Value::Number(n) if n.is_i64() => Ok(n.as_i64()),
            other => Err(FieldError::mismatch(field, JsonKind::Integer, other)),
        }
    }

    /// Gets a non-negative integer field value.
    pub fn get_u64(&self, field: &str) -> Result<Option<u64>, FieldError> {
        match self.lookup(field)? {
            Value::Null => Ok(None),
            Value::Number(n) if n.is_u64() => Ok(n.as_u64()),
            other => Err(FieldError::mismatch(field, JsonKind::UnsignedInteger, other)),
        }
    }

    /// Gets a floating point field value. Integers are widened.
    pub fn get_f64(&self, field: &str) -> Result<Option<f64>, FieldError> {
        match self.lookup(field)? {
            Value::Null => Ok(None),
            Value::Number(n) => Ok(n.as_f64()),
            other => Err(FieldError::mismatch(field, JsonKind::Float, other)),
        }
    }

    /// Gets a nested object as a record with the same key style.
    pub fn get_record(&self, field: &str) -> Result<Option<Record>, FieldError> {
        match self.lookup(field)? {
            Value::Null => Ok(None),
            Value::Object(map) => Ok(Some(Record::from_map(map.clone()).with_style(self.style))),
            other => Err(FieldError::mismatch(field, JsonKind::Object, other)),
        }
    }

    /// Gets an array of objects as records with the same key style.
    pub fn get_records(&self, field: &str) -> Result<Option<Vec<Record>>, FieldError> {
        match self.lookup(field)? {
            Value::Null => Ok(None),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(index, item)| match item {
                    Value::Object(map) => Ok(Record::from_map(map.clone()).with_style(self.style)),
                    other => Err(FieldError::mismatch(format!("{}[{}]", field, index), JsonKind::Object, other)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            other => Err(FieldError::mismatch(field, JsonKind::Array, other)),
        }
    }
}

impl Model for Record {
    fn apply_key_style(&mut self, style: KeyStyle) {
        self.style = style;
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::deserialize(deserializer).map(Self::from_map)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn player() -> Record {
        Record::from_value(json!({
            "tag": "2P0LYQ",
            "name": "Eric",
            "stats": {"maxTrophies": 5724, "favoriteCard": {"name": "P.E.K.K.A"}},
            "clan": null,
            "winRate": 0.5,
            "games": [{"type": "ladder"}, {"type": "challenge"}],
            "verified": true
        }))
        .unwrap()
    }

    #[test]
    fn test_snake_case_lookup() {
        let record = player();
        let stats = record.get_record("stats").unwrap().unwrap();
        assert_eq!(stats.get_i64("max_trophies").unwrap(), Some(5724));
        assert_eq!(stats.get_i64("maxTrophies").unwrap(), Some(5724));
        let card = stats.get_record("favorite_card").unwrap().unwrap();
        assert_eq!(card.get_str("name").unwrap(), Some("P.E.K.K.A"));
    }

    #[test]
    fn test_acronym_keys_resolve_by_listed_name() {
        let record = Record::from_value(json!({"HTTPResponse": 200, "clanID": "8L9L9GL"})).unwrap();
        let mut keys = record.keys();
        keys.sort();
        assert_eq!(keys, ["clan_id", "http_response"]);
        assert_eq!(record.get_i64("http_response").unwrap(), Some(200));
        assert_eq!(record.get_str("clan_id").unwrap(), Some("8L9L9GL"));
        assert_eq!(record.get_i64("HTTPResponse").unwrap(), Some(200));
    }

    #[test]
    fn test_camel_case_style_only_accepts_api_keys() {
        let mut record = player();
        record.apply_key_style(KeyStyle::CamelCase);
        assert_eq!(record.get_f64("winRate").unwrap(), Some(0.5));
        assert!(matches!(record.get_f64("win_rate"), Err(FieldError::Missing { .. })));
        assert!(record.keys().contains(&"winRate".to_string()));
    }

    #[test]
    fn test_keys_follow_style() {
        let record = player();
        assert!(record.keys().contains(&"win_rate".to_string()));
        assert_eq!(record.len(), 7);
    }

    #[test]
    fn test_null_missing_and_mismatch() {
        let record = player();
        assert_eq!(record.get_record("clan").unwrap(), None);
        assert!(matches!(record.get_str("nope"), Err(FieldError::Missing { .. })));
        assert!(matches!(
            record.get_i64("name"),
            Err(FieldError::TypeMismatch {
                expected: JsonKind::Integer,
                actual: JsonKind::String,
                ..
            })
        ));
        assert_eq!(record.get_bool("verified").unwrap(), Some(true));
    }

    #[test]
    fn test_records_inherit_style() {
        let record = player().with_style(KeyStyle::CamelCase);
        let games = record.get_records("games").unwrap().unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[1].style(), KeyStyle::CamelCase);
        assert_eq!(games[1].get_str("type").unwrap(), Some("challenge"));
    }

    #[test]
    fn test_bad_array_item_names_its_index() {
        let record = Record::from_value(json!({"games": [{"type": "ladder"}, 3]})).unwrap();
        let error = record.get_records("games").unwrap_err();
        assert_eq!(error.key(), "games[1]");
        assert_eq!(error.to_string(), "`games[1]` holds integer, expected object");
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(Record::from_value(json!([1, 2])).is_err());
    }

    #[test]
    fn test_to_model() {
        #[derive(Deserialize)]
        struct Named {
            name: String,
        }
        let named: Named = player().to_model().unwrap();
        assert_eq!(named.name, "Eric");
    }
}
