//! Lead domain model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UnknownVariant;

/// Where leads usually come from. Offered as choices, not enforced.
pub const LEAD_SOURCES: &[&str] = &[
    "Facebook",
    "Instagram",
    "WhatsApp",
    "Website",
    "Referral",
    "Walk-in",
    "Phone Call",
    "Other",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    #[serde(rename = "Follow Up")]
    FollowUp,
    Interested,
    Qualified,
    Converted,
    Lost,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 7] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::FollowUp,
        LeadStatus::Interested,
        LeadStatus::Qualified,
        LeadStatus::Converted,
        LeadStatus::Lost,
    ];

    /// The stored and displayed form.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::FollowUp => "Follow Up",
            LeadStatus::Interested => "Interested",
            LeadStatus::Qualified => "Qualified",
            LeadStatus::Converted => "Converted",
            LeadStatus::Lost => "Lost",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded = s.to_lowercase();
        LeadStatus::ALL
            .into_iter()
            .find(|status| status.as_str().to_lowercase() == folded)
            .ok_or_else(|| UnknownVariant {
                kind: "lead status",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Status text exactly as stored. Other writers share the store, so
    /// this may hold a value outside [`LeadStatus`]; see [`Lead::status`].
    pub status: Option<String>,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    /// Fold the stored status: absent or blank means `New`, otherwise a
    /// case-insensitive match. Unrecognised text is returned as the error.
    pub fn status(&self) -> Result<LeadStatus, UnknownVariant> {
        match self.status.as_deref() {
            None => Ok(LeadStatus::New),
            Some(raw) if raw.trim().is_empty() => Ok(LeadStatus::New),
            Some(raw) => raw.parse(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CreateLead {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Stored as `New` when absent.
    pub status: Option<LeadStatus>,
    pub source: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateLead {
    pub name: Option<String>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub status: Option<LeadStatus>,
    pub source: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead_with_status(status: Option<&str>) -> Lead {
        let now = Utc::now();
        Lead {
            id: Uuid::new_v4(),
            name: "Asha".into(),
            email: None,
            phone: None,
            status: status.map(str::to_string),
            source: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("follow up".parse::<LeadStatus>(), Ok(LeadStatus::FollowUp));
        assert_eq!("QUALIFIED".parse::<LeadStatus>(), Ok(LeadStatus::Qualified));
        assert_eq!("Lost".parse::<LeadStatus>(), Ok(LeadStatus::Lost));
    }

    #[test]
    fn parse_rejects_unknown_status() {
        let err = "Archived".parse::<LeadStatus>().unwrap_err();
        assert_eq!(err.value, "Archived");
        assert_eq!(err.kind, "lead status");
    }

    #[test]
    fn padded_status_is_not_matched() {
        assert!(" Qualified ".parse::<LeadStatus>().is_err());
    }

    #[test]
    fn blank_status_folds_to_new() {
        assert_eq!(lead_with_status(Some("")).status(), Ok(LeadStatus::New));
        assert_eq!(lead_with_status(Some("   ")).status(), Ok(LeadStatus::New));
    }

    #[test]
    fn missing_status_folds_to_new() {
        assert_eq!(lead_with_status(None).status(), Ok(LeadStatus::New));
        assert_eq!(
            lead_with_status(Some("contacted")).status(),
            Ok(LeadStatus::Contacted)
        );
        assert!(lead_with_status(Some("followup")).status().is_err());
    }

    #[test]
    fn serde_uses_display_names() {
        let json = serde_json::to_string(&LeadStatus::FollowUp).unwrap();
        assert_eq!(json, "\"Follow Up\"");
    }
}
