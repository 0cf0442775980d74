//! Follow-up domain model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UnknownVariant;

/// Reminder lead times offered when scheduling, with their labels.
pub const REMINDER_DAY_OPTIONS: &[(u32, &str)] = &[
    (0, "On the day"),
    (1, "1 day before"),
    (2, "2 days before"),
    (3, "3 days before"),
    (7, "1 week before"),
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum FollowupStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl FollowupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FollowupStatus::Pending => "Pending",
            FollowupStatus::Completed => "Completed",
            FollowupStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for FollowupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FollowupStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(FollowupStatus::Pending),
            "completed" => Ok(FollowupStatus::Completed),
            "cancelled" => Ok(FollowupStatus::Cancelled),
            _ => Err(UnknownVariant {
                kind: "follow-up status",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(UnknownVariant {
                kind: "priority",
                value: s.to_string(),
            }),
        }
    }
}

/// A scheduled contact with a lead.
///
/// `completed_at` is `Some` exactly when `status` is
/// [`FollowupStatus::Completed`]; the store maintains this on every write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Followup {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub followup_date: NaiveDate,
    pub followup_time: Option<NaiveTime>,
    pub notes: Option<String>,
    pub status: FollowupStatus,
    pub priority: Priority,
    /// Whole days before `followup_date` that reminders start.
    pub reminder_days: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFollowup {
    pub lead_id: Uuid,
    pub followup_date: NaiveDate,
    pub followup_time: Option<NaiveTime>,
    pub notes: Option<String>,
    /// Defaults to [`Priority::Medium`].
    pub priority: Option<Priority>,
    /// Defaults to 0 (remind on the day itself).
    pub reminder_days: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateFollowup {
    pub followup_date: Option<NaiveDate>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub followup_time: Option<Option<NaiveTime>>,
    pub notes: Option<Option<String>>,
    pub status: Option<FollowupStatus>,
    pub priority: Option<Priority>,
    pub reminder_days: Option<u32>,
}

/// The owning lead's contact fields, joined onto follow-up listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadSummary {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowupWithLead {
    #[serde(flatten)]
    pub followup: Followup,
    /// `None` when the owning lead no longer exists.
    pub lead: Option<LeadSummary>,
}
