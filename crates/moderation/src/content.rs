//! Content model for age filtering
//!
//! A [`ContentItem`] is an open-ended JSON object with three recognized
//! fields lifted into typed slots: the `mature` and `ageRestricted` flags
//! and the nested `comments` list. Every other field lives in a generic
//! string-keyed bag and round-trips untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Wire name of the mature flag
pub const MATURE_FIELD: &str = "mature";

/// Wire name of the age-restricted flag
pub const AGE_RESTRICTED_FIELD: &str = "ageRestricted";

/// Wire name of the nested comment list
pub const COMMENTS_FIELD: &str = "comments";

/// Wire name of a comment's text
pub const TEXT_FIELD: &str = "text";

/// A piece of content shown to a viewer
///
/// Recognized fields are only lifted when they have the expected JSON
/// type: a `mature` of `"yes"` or a `comments` holding non-objects stays in
/// [`ContentItem::fields`]. Filtering still walks such a `comments` array
/// entry by entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct ContentItem {
    /// Adult-only material
    pub mature: Option<bool>,
    /// Unsuitable for the youngest viewers
    pub age_restricted: Option<bool>,
    /// Nested comments, each itself a content item
    pub comments: Option<Vec<ContentItem>>,
    /// All other fields
    pub fields: Map<String, Value>,
}

impl ContentItem {
    /// Create an empty content item
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a comment with the given text
    pub fn comment(text: impl Into<String>) -> Self {
        let text: String = text.into();
        Self::new().with_field(TEXT_FIELD, text)
    }

    /// Set a generic field
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Mark as mature
    pub fn mature(mut self) -> Self {
        self.mature = Some(true);
        self
    }

    /// Mark as age restricted
    pub fn age_restricted(mut self) -> Self {
        self.age_restricted = Some(true);
        self
    }

    /// Set comments
    pub fn with_comments(mut self, comments: Vec<ContentItem>) -> Self {
        self.comments = Some(comments);
        self
    }

    /// Check if the mature flag is set to `true`
    pub fn is_mature(&self) -> bool {
        self.mature == Some(true)
    }

    /// Check if the age-restricted flag is set to `true`
    pub fn is_age_restricted(&self) -> bool {
        self.age_restricted == Some(true)
    }

    /// Get a generic field
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Get a generic field if it holds a string
    pub fn text_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Comment text, when this item is a comment
    pub fn text(&self) -> Option<&str> {
        self.text_field(TEXT_FIELD)
    }

    /// Number of comments (zero when absent)
    pub fn comment_count(&self) -> usize {
        self.comments.as_ref().map_or(0, Vec::len)
    }

    /// Read a content item from a JSON value, if it is an object
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().cloned().map(Self::from)
    }

    /// Convert to a JSON object value
    pub fn to_value(&self) -> Value {
        Value::Object(Map::from(self.clone()))
    }
}

impl From<Map<String, Value>> for ContentItem {
    fn from(mut fields: Map<String, Value>) -> Self {
        let mature = take_bool(&mut fields, MATURE_FIELD);
        let age_restricted = take_bool(&mut fields, AGE_RESTRICTED_FIELD);
        let comments = take_comments(&mut fields);

        Self {
            mature,
            age_restricted,
            comments,
            fields,
        }
    }
}

impl From<ContentItem> for Map<String, Value> {
    fn from(item: ContentItem) -> Self {
        let mut map = item.fields;
        if let Some(mature) = item.mature {
            map.insert(MATURE_FIELD.to_string(), Value::Bool(mature));
        }
        if let Some(age_restricted) = item.age_restricted {
            map.insert(AGE_RESTRICTED_FIELD.to_string(), Value::Bool(age_restricted));
        }
        if let Some(comments) = item.comments {
            let comments = comments
                .into_iter()
                .map(|c| Value::Object(Map::from(c)))
                .collect();
            map.insert(COMMENTS_FIELD.to_string(), Value::Array(comments));
        }
        map
    }
}

fn take_bool(fields: &mut Map<String, Value>, name: &str) -> Option<bool> {
    let flag = fields.get(name).and_then(Value::as_bool)?;
    fields.remove(name);
    Some(flag)
}

fn take_comments(fields: &mut Map<String, Value>) -> Option<Vec<ContentItem>> {
    let all_objects = fields
        .get(COMMENTS_FIELD)?
        .as_array()?
        .iter()
        .all(Value::is_object);
    if !all_objects {
        return None;
    }

    match fields.remove(COMMENTS_FIELD) {
        Some(Value::Array(entries)) => Some(
            entries
                .into_iter()
                .filter_map(|entry| match entry {
                    Value::Object(map) => Some(ContentItem::from(map)),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    }
}
