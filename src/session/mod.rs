//! Session and view state
//!
//! One signed-in user at a time, plus the filters, tabs and form draft that
//! the dashboards read. Logging out resets all of it.

pub mod draft;

use crate::models::{Category, Status, Urgency, User};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

pub use draft::ComplaintDraft;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitizenTab {
    #[default]
    Active,
    Updates,
    History,
    All,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffView {
    #[default]
    Mine,
    Other,
}

/// Deserialize a filter value where `"All"`, `""` or absence mean no constraint
fn all_or<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    use serde::de::{Error, IntoDeserializer};

    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some("All") => Ok(None),
        Some(value) => {
            let deserializer: serde::de::value::StrDeserializer<'_, serde::de::value::Error> =
                value.into_deserializer();
            T::deserialize(deserializer)
                .map(Some)
                .map_err(|e| D::Error::custom(e.to_string()))
        }
    }
}

/// Filters for the citizen community view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CitizenFilters {
    #[serde(default, deserialize_with = "all_or")]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "all_or")]
    pub dept: Option<String>,
    #[serde(default, deserialize_with = "all_or")]
    pub status: Option<Status>,
    #[serde(default, deserialize_with = "all_or")]
    pub urgency: Option<Urgency>,
    #[serde(default)]
    pub search: String,
}

/// Filters for the admin list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminFilters {
    #[serde(default, deserialize_with = "all_or")]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "all_or")]
    pub urgency: Option<Urgency>,
    #[serde(default)]
    pub search: String,
}

impl AdminFilters {
    /// Clicking a category stat selects it; clicking the selected one
    /// clears the filter back to "All".
    pub fn toggle_category(&mut self, category: Category) {
        self.category = if self.category == Some(category) {
            None
        } else {
            Some(category)
        };
    }
}

#[derive(Debug, Default)]
pub struct Session {
    user: Option<User>,
    pub citizen_tab: CitizenTab,
    pub citizen_filters: CitizenFilters,
    pub staff_view: StaffView,
    pub admin_filters: AdminFilters,
    pub open_complaint: Option<String>,
    draft: Option<ComplaintDraft>,
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn login(&mut self, user: User) {
        tracing::info!("{} signed in as {:?}", user.name, user.role);
        self.user = Some(user);
    }

    /// Back to a signed-out session with default filters and tabs
    pub fn reset(&mut self) {
        if let Some(user) = &self.user {
            tracing::info!("{} signed out", user.name);
        }
        *self = Session::default();
    }

    /// Start a fresh complaint form, abandoning any previous draft
    pub fn open_draft(&mut self) -> &ComplaintDraft {
        self.draft.insert(ComplaintDraft::new())
    }

    pub fn draft(&self) -> Option<&ComplaintDraft> {
        self.draft.as_ref()
    }

    /// The open draft, but only if `id` still names it
    pub fn draft_mut(&mut self, id: Uuid) -> Option<&mut ComplaintDraft> {
        self.draft.as_mut().filter(|d| d.id == id)
    }

    /// Remove and return the open draft if `id` names it
    pub fn take_draft(&mut self, id: Uuid) -> Option<ComplaintDraft> {
        if self.draft.as_ref().is_some_and(|d| d.id == id) {
            self.draft.take()
        } else {
            None
        }
    }

    pub fn close_draft(&mut self) {
        self.draft = None;
    }
}
