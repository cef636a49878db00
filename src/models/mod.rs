//! Data models for the application

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::lexicon::Department;

// =============================================================================
// Enums
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Infrastructure,
    Sanitation,
    Safety,
    Water,
    Electricity,
}

impl Category {
    /// Display order, used for stat cards and pickers
    pub const ALL: [Category; 5] = [
        Category::Infrastructure,
        Category::Sanitation,
        Category::Safety,
        Category::Water,
        Category::Electricity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Infrastructure => "Infrastructure",
            Category::Sanitation => "Sanitation",
            Category::Safety => "Safety",
            Category::Water => "Water",
            Category::Electricity => "Electricity",
        }
    }

    /// Parse a category name case-insensitively
    pub fn parse(name: &str) -> Option<Category> {
        let name = name.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Urgency {
    High,
    Medium,
    Low,
}

impl Urgency {
    /// Sort rank: High before Medium before Low
    pub fn rank(self) -> u8 {
        match self {
            Urgency::High => 0,
            Urgency::Medium => 1,
            Urgency::Low => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Received,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl Status {
    /// Staff and admins may move a complaint between any two stages,
    /// including back from Resolved.
    pub fn transition_to(self, next: Status) -> Status {
        if self != next {
            tracing::debug!("Status transition {:?} -> {:?}", self, next);
        }
        next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Citizen,
    Staff,
    Admin,
}

impl Role {
    /// Whether this role may change status, post updates and read notes
    pub fn can_edit(self) -> bool {
        matches!(self, Role::Staff | Role::Admin)
    }
}

// =============================================================================
// Complaint
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ComplaintUpdate {
    pub text: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Complaint {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub dept: String,
    pub urgency: Urgency,
    pub status: Status,
    pub address: String,
    pub citizen_name: String,
    pub citizen_email: String,
    pub phone: String,
    pub timestamp: DateTime<Utc>,
    pub updates: Vec<ComplaintUpdate>,
    pub notes: Vec<String>,
    pub reports: u32,
    pub is_emergency: bool,
}

/// Input for filing a complaint. Category and urgency come from the form
/// draft and may still be unset.
#[derive(Debug, Clone, Default)]
pub struct NewComplaint {
    pub title: String,
    pub description: String,
    pub category: Option<Category>,
    pub urgency: Option<Urgency>,
    pub address: String,
    pub citizen_name: Option<String>,
    pub citizen_email: Option<String>,
    pub phone: Option<String>,
    pub is_emergency: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitComplaint {
    pub draft_id: Option<Uuid>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: String,
    pub citizen_name: Option<String>,
    pub citizen_email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Status,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextEntryRequest {
    #[serde(default)]
    pub text: String,
}

/// Card shown in every dashboard list
#[derive(Debug, Clone, Serialize)]
pub struct ComplaintCard {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub category: Category,
    pub department: &'static Department,
    pub urgency: Urgency,
    pub status: Status,
    pub address: String,
    pub age: String,
    pub reports: u32,
    pub is_emergency: bool,
    pub update_count: usize,
    pub latest_update: Option<String>,
}

/// Full complaint as seen in the detail view. Notes are only present for
/// roles that may edit.
#[derive(Debug, Clone, Serialize)]
pub struct ComplaintDetail {
    #[serde(flatten)]
    pub complaint: ComplaintSummary,
    pub department: &'static Department,
    pub age: String,
    pub can_edit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplaintSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub dept: String,
    pub urgency: Urgency,
    pub status: Status,
    pub address: String,
    pub citizen_name: String,
    pub citizen_email: String,
    pub phone: String,
    pub timestamp: DateTime<Utc>,
    pub updates: Vec<ComplaintUpdate>,
    pub reports: u32,
    pub is_emergency: bool,
}

impl From<&Complaint> for ComplaintSummary {
    fn from(c: &Complaint) -> Self {
        Self {
            id: c.id.clone(),
            title: c.title.clone(),
            description: c.description.clone(),
            category: c.category,
            dept: c.dept.clone(),
            urgency: c.urgency,
            status: c.status,
            address: c.address.clone(),
            citizen_name: c.citizen_name.clone(),
            citizen_email: c.citizen_email.clone(),
            phone: c.phone.clone(),
            timestamp: c.timestamp,
            updates: c.updates.clone(),
            reports: c.reports,
            is_emergency: c.is_emergency,
        }
    }
}

// =============================================================================
// Session
// =============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(max = 255))]
    pub name: String,
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    pub role: Role,
    pub dept: Option<String>,
}

impl LoginRequest {
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            role: self.role,
            dept: self
                .dept
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub dept: Option<String>,
}

impl User {
    /// Author label attached to posted updates
    pub fn update_author(&self) -> String {
        self.dept.clone().unwrap_or_else(|| "Staff".to_string())
    }
}

// =============================================================================
// Classification
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DescribeRequest {
    pub draft_id: Uuid,
    #[serde(default)]
    pub description: String,
}

// =============================================================================
// API Responses
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Successful call that produced nothing, e.g. a mutation on an unknown id
    pub fn empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!(Category::parse("water"), Some(Category::Water));
        assert_eq!(Category::parse(" Safety "), Some(Category::Safety));
        assert_eq!(Category::parse("Parks"), None);
    }

    #[test]
    fn test_status_serializes_with_display_name() {
        let json = serde_json::to_string(&Status::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        let parsed: Status = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(parsed, Status::InProgress);
    }

    #[test]
    fn test_status_transition_allows_regression() {
        assert_eq!(
            Status::Resolved.transition_to(Status::Received),
            Status::Received
        );
        assert_eq!(
            Status::Received.transition_to(Status::Resolved),
            Status::Resolved
        );
    }

    #[test]
    fn test_urgency_rank_order() {
        assert!(Urgency::High.rank() < Urgency::Medium.rank());
        assert!(Urgency::Medium.rank() < Urgency::Low.rank());
    }

    #[test]
    fn test_update_author_falls_back_to_staff() {
        let admin = User {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            role: Role::Admin,
            dept: None,
        };
        assert_eq!(admin.update_author(), "Staff");
    }
}
