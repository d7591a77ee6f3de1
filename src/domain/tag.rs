// src/domain/tag.rs
use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::error::{DomainError, DomainResult};

/// A single tag as a value object: trimmed, lowercased, non-empty and free
/// of the `,` list delimiter. Inner whitespace is allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    value: String,
}

impl Tag {
    /// Creates a new Tag with validation
    pub fn new<S: AsRef<str>>(value: S) -> DomainResult<Self> {
        let value = value.as_ref().trim().to_lowercase();

        if value.is_empty() {
            return Err(DomainError::InvalidTag("Tag cannot be empty".to_string()));
        }

        if value.contains(',') {
            return Err(DomainError::InvalidTag(
                "Tag cannot contain commas".to_string(),
            ));
        }

        Ok(Self { value })
    }

    /// Get the tag value
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

/// An ordered, duplicate-free list of tags. The canonical storage form is
/// the comma-joined string produced by `Display`; it is never empty — an
/// empty list is represented as `None` at the call sites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagList {
    tags: Vec<Tag>,
}

impl TagList {
    /// Deduplicates keeping the first occurrence of each tag; returns None
    /// when nothing is left.
    pub fn from_tags<I: IntoIterator<Item = Tag>>(tags: I) -> Option<Self> {
        let tags: Vec<Tag> = tags.into_iter().unique().collect();
        if tags.is_empty() {
            None
        } else {
            Some(Self { tags })
        }
    }

    /// Parse a comma-separated string into a TagList, applying the same
    /// normalization as `normalize_tags`. Used to hydrate stored rows.
    pub fn parse<S: AsRef<str>>(s: S) -> Option<Self> {
        Self::from_tags(
            s.as_ref()
                .split(',')
                .filter_map(|token| Tag::new(token).ok()),
        )
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn contains(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }
}

impl fmt::Display for TagList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tags.iter().map(Tag::value).join(","))
    }
}

impl Serialize for TagList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// Caller-supplied tags: either one comma-separated string or an array of
/// strings. Array elements may themselves contain commas and are split
/// again, so every input route ends in the same canonical form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagInput {
    Text(String),
    List(Vec<String>),
}

impl From<&str> for TagInput {
    fn from(s: &str) -> Self {
        TagInput::Text(s.to_string())
    }
}

impl From<Vec<String>> for TagInput {
    fn from(list: Vec<String>) -> Self {
        TagInput::List(list)
    }
}

/// Normalize caller-supplied tags: split on commas, trim, lowercase, drop
/// empties, dedupe keeping first-seen order. `None` when no tag survives.
pub fn normalize_tags(input: Option<&TagInput>) -> Option<TagList> {
    let raw: Vec<&str> = match input? {
        TagInput::Text(s) => vec![s.as_str()],
        TagInput::List(items) => items.iter().map(String::as_str).collect(),
    };

    TagList::from_tags(
        raw.iter()
            .flat_map(|chunk| chunk.split(','))
            .filter_map(|token| Tag::new(token).ok()),
    )
}
