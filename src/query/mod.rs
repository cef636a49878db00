//! Filtering, sorting and aggregates over the complaint store
//!
//! Every role-specific dashboard is derived here from the store and the
//! session's filters. The same priority ordering is used by every sorted
//! view.

use crate::lexicon::{self, Department};
use crate::models::{Category, Complaint, Status, Urgency, User};
use crate::session::{AdminFilters, CitizenFilters, CitizenTab, StaffView};
use crate::store::ComplaintStore;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

pub const EMPTY_ACTIVE: &str = "No active complaints. Click above to file one.";
pub const EMPTY_TAB: &str = "Nothing here yet.";
pub const EMPTY_COMMUNITY: &str = "No complaints match your filters.";
pub const EMPTY_STAFF: &str = "No complaints in this view.";
pub const EMPTY_ADMIN: &str = "No complaints match the filters.";

/// Emergencies first, then High < Medium < Low, then newest first
pub fn priority_order(a: &Complaint, b: &Complaint) -> Ordering {
    b.is_emergency
        .cmp(&a.is_emergency)
        .then_with(|| a.urgency.rank().cmp(&b.urgency.rank()))
        .then_with(|| b.timestamp.cmp(&a.timestamp))
}

fn sorted(mut items: Vec<&Complaint>) -> Vec<&Complaint> {
    items.sort_by(|a, b| priority_order(a, b));
    items
}

/// Result of a view: the items plus the message to show when there are none
#[derive(Debug)]
pub struct Listing<'a> {
    pub items: Vec<&'a Complaint>,
    pub empty_message: Option<&'static str>,
}

impl<'a> Listing<'a> {
    fn new(items: Vec<&'a Complaint>, empty: &'static str) -> Self {
        let empty_message = items.is_empty().then_some(empty);
        Self {
            items,
            empty_message,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

fn contains_term(field: &str, term: &str) -> bool {
    field.to_lowercase().contains(term)
}

// =============================================================================
// Citizen
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CitizenCounts {
    pub active: usize,
    pub updates: usize,
    pub history: usize,
}

/// The citizen's own complaints split into tabs, each in store order
#[derive(Debug)]
pub struct CitizenTabs<'a> {
    pub active: Vec<&'a Complaint>,
    pub updates: Vec<&'a Complaint>,
    pub history: Vec<&'a Complaint>,
}

impl CitizenTabs<'_> {
    pub fn counts(&self) -> CitizenCounts {
        CitizenCounts {
            active: self.active.len(),
            updates: self.updates.len(),
            history: self.history.len(),
        }
    }
}

pub fn citizen_tabs<'a>(store: &'a ComplaintStore, user: &User) -> CitizenTabs<'a> {
    let mine = store.find_by_identity(&user.name, &user.email);
    CitizenTabs {
        active: mine
            .iter()
            .copied()
            .filter(|c| c.status != Status::Resolved)
            .collect(),
        updates: mine
            .iter()
            .copied()
            .filter(|c| !c.updates.is_empty())
            .collect(),
        history: mine
            .iter()
            .copied()
            .filter(|c| c.status == Status::Resolved)
            .collect(),
    }
}

impl CitizenFilters {
    pub fn matches(&self, c: &Complaint) -> bool {
        let search = self.search.to_lowercase();
        self.category.map_or(true, |cat| c.category == cat)
            && self.dept.as_ref().map_or(true, |d| &c.dept == d)
            && self.status.map_or(true, |s| c.status == s)
            && self.urgency.map_or(true, |u| c.urgency == u)
            && (search.is_empty()
                || contains_term(&c.title, &search)
                || contains_term(&c.description, &search)
                || contains_term(&c.address, &search)
                || contains_term(&c.citizen_name, &search))
    }
}

/// Community-wide view shown on the citizen "all" tab
pub fn citizen_all<'a>(store: &'a ComplaintStore, filters: &CitizenFilters) -> Listing<'a> {
    let items = store.all().iter().filter(|c| filters.matches(c)).collect();
    Listing::new(sorted(items), EMPTY_COMMUNITY)
}

/// Listing for the selected citizen tab
pub fn citizen_view<'a>(
    store: &'a ComplaintStore,
    user: &User,
    tab: CitizenTab,
    filters: &CitizenFilters,
) -> Listing<'a> {
    match tab {
        CitizenTab::Active => Listing::new(citizen_tabs(store, user).active, EMPTY_ACTIVE),
        CitizenTab::Updates => Listing::new(citizen_tabs(store, user).updates, EMPTY_TAB),
        CitizenTab::History => Listing::new(citizen_tabs(store, user).history, EMPTY_TAB),
        CitizenTab::All => citizen_all(store, filters),
    }
}

// =============================================================================
// Staff
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StaffStats {
    pub total: usize,
    pub high_priority: usize,
    pub pending: usize,
    pub resolved: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StaffCounts {
    pub mine: usize,
    pub other: usize,
}

/// Complaints for the staff member's department, or for every other one
pub fn staff_view<'a>(store: &'a ComplaintStore, dept: &str, view: StaffView) -> Listing<'a> {
    let items = store
        .all()
        .iter()
        .filter(|c| match view {
            StaffView::Mine => c.dept == dept,
            StaffView::Other => c.dept != dept,
        })
        .collect();
    Listing::new(sorted(items), EMPTY_STAFF)
}

pub fn staff_counts(store: &ComplaintStore, dept: &str) -> StaffCounts {
    let mine = store.all().iter().filter(|c| c.dept == dept).count();
    StaffCounts {
        mine,
        other: store.len() - mine,
    }
}

pub fn staff_stats(store: &ComplaintStore, dept: &str) -> StaffStats {
    store
        .all()
        .iter()
        .filter(|c| c.dept == dept)
        .fold(StaffStats::default(), |mut stats, c| {
            stats.total += 1;
            if c.urgency == Urgency::High {
                stats.high_priority += 1;
            }
            if c.status == Status::Resolved {
                stats.resolved += 1;
            } else {
                stats.pending += 1;
            }
            stats
        })
}

// =============================================================================
// Admin
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct CategoryStat {
    pub category: Category,
    pub department: &'static Department,
    pub total: usize,
    pub high: usize,
    pub active: bool,
}

impl AdminFilters {
    pub fn matches(&self, c: &Complaint) -> bool {
        let search = self.search.to_lowercase();
        self.category.map_or(true, |cat| c.category == cat)
            && self.urgency.map_or(true, |u| c.urgency == u)
            && (search.is_empty()
                || contains_term(&c.title, &search)
                || contains_term(&c.description, &search)
                || contains_term(&c.address, &search))
    }
}

pub fn admin_view<'a>(store: &'a ComplaintStore, filters: &AdminFilters) -> Listing<'a> {
    let items = store.all().iter().filter(|c| filters.matches(c)).collect();
    Listing::new(sorted(items), EMPTY_ADMIN)
}

/// Per-category totals for the admin stat cards, in display order
pub fn category_stats(store: &ComplaintStore, selected: Option<Category>) -> Vec<CategoryStat> {
    lexicon::departments()
        .map(|(category, department)| {
            let (total, high) = store
                .all()
                .iter()
                .filter(|c| c.category == category)
                .fold((0, 0), |(total, high), c| {
                    (total + 1, high + usize::from(c.urgency == Urgency::High))
                });
            CategoryStat {
                category,
                department,
                total,
                high,
                active: selected == Some(category),
            }
        })
        .collect()
}

// =============================================================================
// Display helpers
// =============================================================================

/// Relative age such as "5 min ago" or "2 days ago"
pub fn age_label(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - timestamp).num_seconds().max(0);
    if secs < 60 {
        return "just now".to_string();
    }
    if secs < 3600 {
        return format!("{} min ago", secs / 60);
    }
    if secs < 86_400 {
        let h = secs / 3600;
        return format!("{} hour{} ago", h, if h > 1 { "s" } else { "" });
    }
    let d = secs / 86_400;
    format!("{} day{} ago", d, if d > 1 { "s" } else { "" })
}
