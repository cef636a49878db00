//! Keyword classification of complaint descriptions
//!
//! Inference is a plain ordered-rule walk over the lexicon tables: lowercase
//! the text, test each keyword as a substring, first hit wins.

pub mod external;

use crate::lexicon::{self, DETECTION_ORDER, HIGH_URGENCY_WORDS, MEDIUM_URGENCY_WORDS};
use crate::models::{Category, Urgency};
use serde::Serialize;

pub use external::ExternalClassifier;

/// Descriptions shorter than this are not classified
pub const MIN_DESCRIPTION_LEN: usize = 10;

/// Suggested form values for a description
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub category: Option<Category>,
    pub urgency: Option<Urgency>,
}

impl Suggestion {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.urgency.is_none()
    }
}

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

/// First category, in detection order, with a keyword inside `text`
pub fn infer_category(text: &str) -> Option<Category> {
    let lower = text.to_lowercase();
    DETECTION_ORDER
        .into_iter()
        .find(|c| contains_any(&lower, lexicon::category_keywords(*c)))
}

/// High if any high-urgency word occurs, else Medium if any medium word
/// occurs. Never infers Low.
pub fn infer_urgency(text: &str) -> Option<Urgency> {
    let lower = text.to_lowercase();
    if contains_any(&lower, HIGH_URGENCY_WORDS) {
        Some(Urgency::High)
    } else if contains_any(&lower, MEDIUM_URGENCY_WORDS) {
        Some(Urgency::Medium)
    } else {
        None
    }
}

/// Local suggestion for a description, or `None` when it is too short
pub fn suggest(text: &str) -> Option<Suggestion> {
    if text.chars().count() < MIN_DESCRIPTION_LEN {
        return None;
    }
    Some(Suggestion {
        category: infer_category(text),
        urgency: infer_urgency(text),
    })
}
