//! Tag validation errors

/// Errors produced when normalizing a tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagError {
    /// The tag contains characters that never appear in game tags.
    #[error("Invalid tag characters in '{tag}': {}", format_chars(.invalid))]
    InvalidCharacters {
        /// The tag as passed in.
        tag: String,
        /// Each offending character, once.
        invalid: Vec<char>,
    },

    /// The tag is shorter than any real tag.
    #[error("Tag '{tag}' too short: length {len}, expected at least 3")]
    TooShort {
        /// The tag as passed in.
        tag: String,
        /// Length after normalization.
        len: usize,
    },
}

fn format_chars(chars: &[char]) -> String {
    chars
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
