//! Domain models for Leadbook.
//!
//! These are the core types shared across all crates.

pub mod followup;
pub mod lead;

pub use followup::{
    CreateFollowup, Followup, FollowupStatus, FollowupWithLead, LeadSummary, Priority,
    REMINDER_DAY_OPTIONS, UpdateFollowup,
};
pub use lead::{CreateLead, LEAD_SOURCES, Lead, LeadStatus, UpdateLead};

/// A string that does not name any variant of a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
