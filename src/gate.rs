//! Per-request age gating
//!
//! [`AgeGate`] is built once at startup and shared by handlers. For each
//! request it classifies the viewer and hands back a [`ViewerGate`] bound
//! to that viewer's age group.

use moderation::config::{self, ModerationConfig};
use moderation::{
    compute_age_group, AgeGroup, Birthdate, ContentFilter, ContentItem, TextFilterResult,
};
use serde_json::Value;

/// Shared age gate holding the content filter
#[derive(Debug, Clone, Default)]
pub struct AgeGate {
    filter: ContentFilter,
}

impl AgeGate {
    /// Create a gate using the built-in vocabulary
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a gate around an existing filter
    pub fn with_filter(filter: ContentFilter) -> Self {
        Self { filter }
    }

    /// Create a gate from moderation configuration
    pub fn from_config(config: &ModerationConfig) -> config::Result<Self> {
        Ok(Self::with_filter(config.build_filter()?))
    }

    /// The underlying content filter
    pub fn filter(&self) -> &ContentFilter {
        &self.filter
    }

    /// Classify a viewer from their birthdate
    pub fn for_birthdate(&self, birthdate: Option<&Birthdate>) -> ViewerGate<'_> {
        let age_group = compute_age_group(birthdate);
        if birthdate.is_none() {
            tracing::debug!("No birthdate on record, treating viewer as {}", age_group);
        } else {
            tracing::debug!("Viewer classified as {}", age_group);
        }
        self.for_age_group(age_group)
    }

    /// Bind to an already known age group
    pub fn for_age_group(&self, age_group: AgeGroup) -> ViewerGate<'_> {
        ViewerGate {
            filter: &self.filter,
            age_group,
        }
    }
}

/// Age gate bound to one viewer for the duration of a request
#[derive(Debug, Clone, Copy)]
pub struct ViewerGate<'a> {
    filter: &'a ContentFilter,
    age_group: AgeGroup,
}

impl ViewerGate<'_> {
    /// The viewer's age group
    pub fn age_group(&self) -> AgeGroup {
        self.age_group
    }

    /// Filter a single piece of text
    pub fn filter_text(&self, text: &str) -> TextFilterResult {
        self.filter.filter_text(text, self.age_group)
    }

    /// Filter a content item; `None` when hidden
    pub fn filter_item(&self, item: &ContentItem) -> Option<ContentItem> {
        self.filter.filter_content(item, self.age_group)
    }

    /// Filter a list of content items
    pub fn filter_items(&self, items: &[ContentItem]) -> Vec<ContentItem> {
        self.filter.filter_content_array(items, self.age_group)
    }

    /// Filter a JSON payload; hidden objects become `null`
    pub fn filter_json(&self, value: &Value) -> Value {
        self.filter.filter_value(value, self.age_group)
    }

    /// Filter a JSON list payload; non-arrays yield an empty list
    pub fn filter_json_array(&self, value: &Value) -> Vec<Value> {
        self.filter.filter_value_array(value, self.age_group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_birthdate_is_most_restrictive() {
        let gate = AgeGate::new();
        let viewer = gate.for_birthdate(None);

        assert_eq!(viewer.age_group(), AgeGroup::Unknown);
        assert_eq!(viewer.filter_json(&json!({"ageRestricted": true})), Value::Null);
        assert_eq!(viewer.filter_text("crap").sanitized(), Some("****"));
    }

    #[test]
    fn test_adult_birthdate() {
        let gate = AgeGate::new();
        let birthdate = Birthdate::from("1990-04-01");
        let viewer = gate.for_birthdate(Some(&birthdate));

        assert_eq!(viewer.age_group(), AgeGroup::Adult);
        let payload = json!({"title": "damn", "mature": true});
        assert_eq!(viewer.filter_json(&payload), payload);
    }

    #[test]
    fn test_from_config() {
        let config = ModerationConfig::from_json_str(r#"{"extraWords": ["frak"]}"#).unwrap();
        let gate = AgeGate::from_config(&config).unwrap();
        let viewer = gate.for_age_group(AgeGroup::Under13);

        let items = vec![ContentItem::new().with_field("title", "frak")];
        let filtered = viewer.filter_items(&items);
        assert_eq!(filtered[0].text_field("title"), Some("****"));
    }
}
