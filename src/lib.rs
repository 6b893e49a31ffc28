//! Kindred age gating
//!
//! Facade over the [`moderation`] crate for request handlers: classify the
//! viewer once with [`AgeGate::for_birthdate`], then run every payload for
//! that request through the returned [`ViewerGate`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod gate;
pub mod telemetry;

pub use gate::{AgeGate, ViewerGate};
pub use moderation::{
    compute_age_group, compute_age_group_on, contains_vulgar_words, filter_content_array_for_age,
    filter_content_for_age, parse_birthdate, sanitize_text, AgeGroup, AgePolicy, Birthdate,
    ContentFilter, ContentItem, FilterReason, ModerationConfig, TextFilterResult,
    VulgarTextAction, VulgarWordList,
};
