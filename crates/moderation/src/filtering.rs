//! Age-based content filtering
//!
//! This module decides, per age group, whether content may be shown and
//! whether its text must have vulgar vocabulary masked. Filtering never
//! mutates its input: a new value is produced, or `None` when the content
//! is dropped.

use crate::age::AgeGroup;
use crate::content::{ContentItem, COMMENTS_FIELD};
use crate::words::VulgarWordList;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

/// Reason content was withheld
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterReason {
    /// Content is flagged mature and the viewer is not an adult
    Mature,
    /// Content is age restricted and the viewer is under 13 or of unknown age
    AgeRestricted,
    /// Text contains vulgar vocabulary and masking was not allowed
    VulgarLanguage,
}

impl FilterReason {
    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            FilterReason::Mature => "Mature content",
            FilterReason::AgeRestricted => "Age-restricted content",
            FilterReason::VulgarLanguage => "Contains vulgar language",
        }
    }
}

/// What the single-text API does with vulgar text for the youngest viewers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VulgarTextAction {
    /// Mask vulgar words and allow the text
    #[default]
    Sanitize,
    /// Refuse the text outright
    Reject,
}

/// Content rules applied for one age group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgePolicy {
    /// Drop content flagged `mature`
    pub hide_mature: bool,
    /// Drop content flagged `ageRestricted`
    pub hide_age_restricted: bool,
    /// Mask vulgar words in every string field
    pub sanitize_text: bool,
}

impl AgePolicy {
    /// Under 13, and unknown ages
    pub const YOUNGEST: AgePolicy = AgePolicy {
        hide_mature: true,
        hide_age_restricted: true,
        sanitize_text: true,
    };

    /// 13 through 17
    pub const TEEN: AgePolicy = AgePolicy {
        hide_mature: true,
        hide_age_restricted: false,
        sanitize_text: false,
    };

    /// Adults see everything unchanged
    pub const ADULT: AgePolicy = AgePolicy {
        hide_mature: false,
        hide_age_restricted: false,
        sanitize_text: false,
    };

    /// Policy for an age group
    pub fn for_group(age_group: AgeGroup) -> Self {
        match age_group {
            AgeGroup::Under13 | AgeGroup::Unknown => Self::YOUNGEST,
            AgeGroup::Teen => Self::TEEN,
            AgeGroup::Adult => Self::ADULT,
        }
    }

    /// Reason `content` must be dropped, if any
    pub fn hides(&self, content: &ContentItem) -> Option<FilterReason> {
        if self.hide_mature && content.is_mature() {
            return Some(FilterReason::Mature);
        }
        if self.hide_age_restricted && content.is_age_restricted() {
            return Some(FilterReason::AgeRestricted);
        }
        None
    }

    /// Whether this policy leaves all content untouched
    pub fn is_permissive(&self) -> bool {
        !self.hide_mature && !self.hide_age_restricted && !self.sanitize_text
    }
}

/// Outcome of filtering a single piece of text
///
/// A rejected result never carries sanitized text; an allowed one always
/// does, possibly identical to the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextFilterResult {
    allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sanitized: Option<String>,
}

impl TextFilterResult {
    /// Allow the text in its (possibly masked) form
    pub fn allow(sanitized: impl Into<String>) -> Self {
        Self {
            allowed: true,
            reason: None,
            sanitized: Some(sanitized.into()),
        }
    }

    /// Refuse the text
    pub fn reject(reason: FilterReason) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.description().to_string()),
            sanitized: None,
        }
    }

    /// Whether the text may be shown
    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    /// Why the text was refused
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Text to display, when allowed
    pub fn sanitized(&self) -> Option<&str> {
        self.sanitized.as_deref()
    }
}

/// Content filter applying age policy and vulgar-word masking
#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    /// Vocabulary to mask
    words: VulgarWordList,
    /// Single-text behaviour for the youngest viewers
    minor_vulgar_text: VulgarTextAction,
}

impl ContentFilter {
    /// Create a content filter over the given vocabulary
    pub fn new(words: VulgarWordList) -> Self {
        Self {
            words,
            minor_vulgar_text: VulgarTextAction::default(),
        }
    }

    /// The process-wide filter over the built-in vocabulary
    pub fn builtin() -> &'static ContentFilter {
        static BUILTIN: OnceLock<ContentFilter> = OnceLock::new();
        BUILTIN.get_or_init(ContentFilter::default)
    }

    /// Set what the single-text API does with vulgar text
    pub fn with_vulgar_text_action(mut self, action: VulgarTextAction) -> Self {
        self.minor_vulgar_text = action;
        self
    }

    /// Vocabulary in use
    pub fn words(&self) -> &VulgarWordList {
        &self.words
    }

    /// Single-text behaviour for the youngest viewers
    pub fn vulgar_text_action(&self) -> VulgarTextAction {
        self.minor_vulgar_text
    }

    /// Check if text contains any vulgar word
    pub fn contains_vulgar_words(&self, text: &str) -> bool {
        self.words.contains_vulgar_words(text)
    }

    /// Mask vulgar words in text
    pub fn sanitize_text(&self, text: &str) -> String {
        self.words.sanitize_text(text)
    }

    /// Filter a single piece of text for a viewer
    pub fn filter_text(&self, text: &str, age_group: AgeGroup) -> TextFilterResult {
        if !age_group.policy().sanitize_text {
            return TextFilterResult::allow(text);
        }

        if !self.contains_vulgar_words(text) {
            return TextFilterResult::allow(text);
        }

        match self.minor_vulgar_text {
            VulgarTextAction::Sanitize => TextFilterResult::allow(self.sanitize_text(text)),
            VulgarTextAction::Reject => {
                tracing::debug!("Rejecting text for {}: vulgar language", age_group);
                TextFilterResult::reject(FilterReason::VulgarLanguage)
            }
        }
    }

    /// Filter a content item for a viewer
    ///
    /// Returns `None` when the item must not be shown. Comments are filtered
    /// with the same policy; dropped comments are removed from the list.
    pub fn filter_content(&self, content: &ContentItem, age_group: AgeGroup) -> Option<ContentItem> {
        let policy = age_group.policy();
        if policy.is_permissive() {
            return Some(content.clone());
        }
        self.apply_policy(content, &policy, age_group)
    }

    /// Filter a list of content items, dropping hidden ones
    pub fn filter_content_array(
        &self,
        items: &[ContentItem],
        age_group: AgeGroup,
    ) -> Vec<ContentItem> {
        items
            .iter()
            .filter_map(|item| self.filter_content(item, age_group))
            .collect()
    }

    /// Filter a JSON value for a viewer
    ///
    /// `null` and non-object values pass through unchanged; a dropped object
    /// becomes `null`.
    pub fn filter_value(&self, value: &Value, age_group: AgeGroup) -> Value {
        match ContentItem::from_value(value) {
            Some(item) => self
                .filter_content(&item, age_group)
                .map_or(Value::Null, |filtered| filtered.to_value()),
            None => value.clone(),
        }
    }

    /// Filter a JSON array for a viewer
    ///
    /// Anything other than an array yields an empty list. Entries that end
    /// up `null` are removed.
    pub fn filter_value_array(&self, value: &Value, age_group: AgeGroup) -> Vec<Value> {
        let Some(entries) = value.as_array() else {
            return Vec::new();
        };

        entries
            .iter()
            .map(|entry| self.filter_value(entry, age_group))
            .filter(|entry| !entry.is_null())
            .collect()
    }

    fn apply_policy(
        &self,
        content: &ContentItem,
        policy: &AgePolicy,
        age_group: AgeGroup,
    ) -> Option<ContentItem> {
        if let Some(reason) = policy.hides(content) {
            tracing::debug!("Dropping content for {}: {}", age_group, reason.description());
            return None;
        }

        let fields = content
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), self.filter_field(name, value, policy, age_group)))
            .collect();

        let comments = content.comments.as_ref().map(|comments| {
            comments
                .iter()
                .filter_map(|comment| self.apply_policy(comment, policy, age_group))
                .collect()
        });

        Some(ContentItem {
            mature: content.mature,
            age_restricted: content.age_restricted,
            comments,
            fields,
        })
    }

    /// Filter one generic field.
    ///
    /// A `comments` array that could not be lifted (it holds non-objects)
    /// is still filtered entry by entry; non-object entries are dropped.
    fn filter_field(
        &self,
        name: &str,
        value: &Value,
        policy: &AgePolicy,
        age_group: AgeGroup,
    ) -> Value {
        match value {
            Value::Array(entries) if name == COMMENTS_FIELD => Value::Array(
                entries
                    .iter()
                    .filter_map(|entry| {
                        let comment = ContentItem::from_value(entry)?;
                        self.apply_policy(&comment, policy, age_group)
                            .map(|filtered| filtered.to_value())
                    })
                    .collect(),
            ),
            Value::String(text) if policy.sanitize_text => Value::String(self.sanitize_text(text)),
            other => other.clone(),
        }
    }
}

/// Filter optional content with the built-in filter
///
/// Absent content stays absent.
pub fn filter_content_for_age(
    content: Option<&ContentItem>,
    age_group: AgeGroup,
) -> Option<ContentItem> {
    content.and_then(|item| ContentFilter::builtin().filter_content(item, age_group))
}

/// Filter an optional list of content with the built-in filter
///
/// An absent list yields an empty one.
pub fn filter_content_array_for_age(
    items: Option<&[ContentItem]>,
    age_group: AgeGroup,
) -> Vec<ContentItem> {
    items
        .map(|items| ContentFilter::builtin().filter_content_array(items, age_group))
        .unwrap_or_default()
}
