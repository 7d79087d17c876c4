//! Page type for paginated list endpoints.

use serde::Deserialize;
use serde::Deserializer;

use crate::model::KeyStyle;
use crate::model::Model;

/// A page of list results with its pagination cursors.
///
/// Official list endpoints answer `{"items": [...], "paging": {"cursors": {...}}}`.
/// A page without an `after` cursor is the last one.
///
/// # Example
///
/// ```ignore
/// let page = client.get_clan_members("#8L9L9GL", Paging::new().limit(10))?.into_inner();
///
/// for member in page.items() {
///     println!("{}", member.name);
/// }
///
/// if let Some(cursor) = page.after() {
///     println!("More results available after {}", cursor);
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    items: Vec<T>,
    after: Option<String>,
    before: Option<String>,
}

impl<T> Page<T> {
    /// Creates a page with no cursors.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            after: None,
            before: None,
        }
    }

    /// Sets the cursor of the next page.
    pub fn with_after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    /// Sets the cursor of the previous page.
    pub fn with_before(mut self, cursor: impl Into<String>) -> Self {
        self.before = Some(cursor.into());
        self
    }

    /// Returns the items in this page.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consumes the page and returns the items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Returns the cursor of the next page, if there is one.
    pub fn after(&self) -> Option<&str> {
        self.after.as_deref()
    }

    /// Returns the cursor of the previous page, if there is one.
    pub fn before(&self) -> Option<&str> {
        self.before.as_deref()
    }

    /// Returns `true` if there are more pages available.
    pub fn has_more(&self) -> bool {
        self.after.is_some()
    }

    /// Returns `true` if this page has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<T: Model> Model for Page<T> {
    fn apply_key_style(&mut self, style: KeyStyle) {
        for item in &mut self.items {
            item.apply_key_style(style);
        }
    }
}

#[derive(Deserialize)]
struct RawPage<T> {
    items: Vec<T>,
    #[serde(default)]
    paging: Option<RawPaging>,
}

#[derive(Deserialize)]
struct RawPaging {
    #[serde(default)]
    cursors: RawCursors,
}

#[derive(Deserialize, Default)]
struct RawCursors {
    after: Option<String>,
    before: Option<String>,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Page<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawPage::<T>::deserialize(deserializer)?;
        let cursors = raw.paging.map(|p| p.cursors).unwrap_or_default();
        Ok(Self {
            items: raw.items,
            after: cursors.after.filter(|c| !c.is_empty()),
            before: cursors.before.filter(|c| !c.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::Location;

    #[test]
    fn test_page_with_cursors() {
        let page: Page<Location> = serde_json::from_value(json!({
            "items": [{"id": 57000000, "name": "Europe", "isCountry": false}],
            "paging": {"cursors": {"after": "eyJwb3MiOjF9"}}
        }))
        .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page.after(), Some("eyJwb3MiOjF9"));
        assert_eq!(page.before(), None);
        assert!(page.has_more());
    }

    #[test]
    fn test_page_without_paging_is_last() {
        let page: Page<Location> = serde_json::from_value(json!({
            "items": [],
            "paging": {"cursors": {}}
        }))
        .unwrap();
        assert!(page.is_empty());
        assert!(!page.has_more());

        let cards: Page<serde_json::Value> = serde_json::from_value(json!({"items": [1, 2]})).unwrap();
        assert_eq!(cards.into_items().len(), 2);
    }
}
