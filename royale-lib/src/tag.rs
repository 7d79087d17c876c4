//! Player, clan and tournament tag normalization.

use std::fmt;

use crate::error::TagError;

/// Characters the game uses in tags.
pub const TAG_ALPHABET: &str = "0289PYLQGRJCUV";

/// Minimum number of characters in a canonical tag.
pub const MIN_TAG_LEN: usize = 3;

/// A validated, canonical entity tag.
///
/// Tags are printed in-game as `#2P0LYQ`. The canonical form drops the `#`, is
/// uppercase, and only contains characters from [`TAG_ALPHABET`].
///
/// # Example
///
/// ```
/// use royale_lib::Tag;
///
/// let tag = Tag::parse("#2p0lyq").unwrap();
/// assert_eq!(tag.as_str(), "2P0LYQ");
/// assert_eq!(tag.encoded(), "%232P0LYQ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag(String);

impl Tag {
    /// Normalizes and validates a raw tag.
    pub fn parse(raw: &str) -> Result<Self, TagError> {
        normalize_tag(raw).map(Self)
    }

    /// Returns the canonical tag without the `#` marker.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the tag with a URL-encoded `#` prefix, as the official API expects in paths.
    pub fn encoded(&self) -> String {
        format!("{}{}", urlencoding::encode("#"), self.0)
    }

    /// Consumes the tag and returns the canonical string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalizes a raw tag into its canonical form.
///
/// Strips surrounding whitespace and any leading `#` (or its URL-encoded form `%23`),
/// uppercases, and replaces the letter `O` with the digit `0`. Fails if a character
/// outside [`TAG_ALPHABET`] remains or the result is shorter than [`MIN_TAG_LEN`].
pub fn normalize_tag(raw: &str) -> Result<String, TagError> {
    let mut rest = raw.trim();
    loop {
        if let Some(stripped) = rest.strip_prefix('#') {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("%23") {
            rest = stripped;
        } else {
            break;
        }
    }

    let mut tag = String::with_capacity(rest.len());
    let mut invalid = Vec::new();
    for c in rest.chars().flat_map(char::to_uppercase) {
        let c = if c == 'O' { '0' } else { c };
        if TAG_ALPHABET.contains(c) {
            tag.push(c);
        } else if !invalid.contains(&c) {
            invalid.push(c);
        }
    }

    if !invalid.is_empty() {
        return Err(TagError::InvalidCharacters {
            tag: raw.to_string(),
            invalid,
        });
    }
    if tag.len() < MIN_TAG_LEN {
        return Err(TagError::TooShort {
            tag: raw.to_string(),
            len: tag.len(),
        });
    }
    Ok(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_tag_is_unchanged() {
        assert_eq!(normalize_tag("2P0LYQ").unwrap(), "2P0LYQ");
    }

    #[test]
    fn test_marker_and_case_are_normalized() {
        assert_eq!(normalize_tag("#2p0lyq").unwrap(), "2P0LYQ");
        assert_eq!(normalize_tag("  ##2P0LYQ ").unwrap(), "2P0LYQ");
        assert_eq!(normalize_tag("%232P0LYQ").unwrap(), "2P0LYQ");
    }

    #[test]
    fn test_letter_o_becomes_zero() {
        assert_eq!(normalize_tag("#8l9l9gl").unwrap(), "8L9L9GL");
        assert_eq!(normalize_tag("2pOlyq").unwrap(), "2P0LYQ");
        assert_eq!(normalize_tag("2polyq").unwrap(), "2P0LYQ");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for raw in ["#2p0lyq", "2PoLYQ", "%23ccv9uy", "#8l9l9gl", "  #RGJ  "] {
            let once = normalize_tag(raw).unwrap();
            let twice = normalize_tag(&once).unwrap();
            assert_eq!(once, twice, "normalizing {raw:?} twice changed it");
        }
    }

    #[test]
    fn test_invalid_characters_are_reported() {
        let err = normalize_tag("293R8FV").unwrap_err();
        match err {
            TagError::InvalidCharacters { invalid, .. } => {
                assert_eq!(invalid, vec!['3', 'F']);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_short_and_empty_tags_are_rejected() {
        assert!(matches!(normalize_tag("#"), Err(TagError::TooShort { len: 0, .. })));
        assert!(matches!(normalize_tag(""), Err(TagError::TooShort { len: 0, .. })));
        assert!(matches!(normalize_tag("2P"), Err(TagError::TooShort { len: 2, .. })));
    }

    #[test]
    fn test_tag_display_and_encoding() {
        let tag = Tag::parse("2p0lyq").unwrap();
        assert_eq!(tag.to_string(), "#2P0LYQ");
        assert_eq!(tag.encoded(), "%232P0LYQ");
        assert_eq!(tag.into_string(), "2P0LYQ");
    }
}
