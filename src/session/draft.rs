//! Complaint form draft
//!
//! A draft holds what the user has picked so far in the complaint form. Each
//! draft carries a random token; classifier results are only ever applied to
//! the draft whose token they were requested for.

use crate::classifier::Suggestion;
use crate::models::{Category, Urgency};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplaintDraft {
    pub id: Uuid,
    pub category: Option<Category>,
    pub urgency: Option<Urgency>,
    pub is_emergency: bool,
    /// Set once a suggestion has filled in a field
    pub ai_detected: bool,
    #[serde(skip)]
    emergency_touched: bool,
}

impl ComplaintDraft {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            category: None,
            urgency: None,
            is_emergency: false,
            ai_detected: false,
            emergency_touched: false,
        }
    }

    pub fn select_category(&mut self, category: Category) {
        self.category = Some(category);
    }

    pub fn select_urgency(&mut self, urgency: Urgency) {
        self.urgency = Some(urgency);
    }

    /// Manual emergency toggle. Once the user has touched it, suggestions
    /// leave the flag alone.
    pub fn toggle_emergency(&mut self) -> bool {
        self.is_emergency = !self.is_emergency;
        self.emergency_touched = true;
        self.is_emergency
    }

    /// Fill in fields the user has not chosen yet. An applied High urgency
    /// switches the emergency flag on; nothing here ever switches it off.
    /// Returns whether the draft changed.
    pub fn apply(&mut self, suggestion: &Suggestion) -> bool {
        let mut changed = false;

        if let (Some(category), None) = (suggestion.category, self.category) {
            self.category = Some(category);
            changed = true;
        }

        if let (Some(urgency), None) = (suggestion.urgency, self.urgency) {
            self.urgency = Some(urgency);
            changed = true;
            if urgency == Urgency::High && !self.is_emergency && !self.emergency_touched {
                self.is_emergency = true;
            }
        }

        if changed {
            self.ai_detected = true;
        }
        changed
    }
}

impl Default for ComplaintDraft {
    fn default() -> Self {
        Self::new()
    }
}
