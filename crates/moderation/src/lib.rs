//! Age gating and content moderation for Kindred
//!
//! This crate classifies viewers into age groups from their birthdate
//! and filters content for them: hiding mature or age-restricted items
//! and masking vulgar vocabulary for the youngest viewers.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod age;
pub mod config;
pub mod content;
pub mod filtering;
pub mod words;

pub use age::{compute_age_group, compute_age_group_on, parse_birthdate, AgeGroup, Birthdate};
pub use config::ModerationConfig;
pub use content::ContentItem;
pub use filtering::{
    filter_content_array_for_age, filter_content_for_age, AgePolicy, ContentFilter, FilterReason,
    TextFilterResult, VulgarTextAction,
};
pub use words::{contains_vulgar_words, sanitize_text, VulgarWordList};
