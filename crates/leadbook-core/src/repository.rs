//! Repository trait definitions for the record store.
//!
//! All repository operations are async and every call is an independent
//! round-trip: nothing is cached between calls. Implementations stamp
//! `created_at`/`updated_at` themselves; callers never supply them.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::CrmResult;
use crate::models::{
    CreateFollowup, CreateLead, Followup, FollowupStatus, FollowupWithLead, Lead, LeadStatus,
    Priority, UpdateFollowup, UpdateLead,
};

/// Lead status selector where `All` disables the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(LeadStatus),
}

/// Priority selector where `All` disables the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    pub fn matches(&self, priority: Priority) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Only(p) => *p == priority,
        }
    }
}

/// Lead query. Results are ordered by `created_at` descending.
#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    pub status: StatusFilter,
    /// Case-insensitive substring match on name, email or phone.
    pub search: Option<String>,
}

/// Follow-up query. Every set field must hold; results are ordered by
/// `followup_date` ascending.
#[derive(Debug, Clone, Default)]
pub struct FollowupFilter {
    pub lead_id: Option<Uuid>,
    pub status: Option<FollowupStatus>,
    pub priority: PriorityFilter,
    /// `followup_date >= date_from`
    pub date_from: Option<NaiveDate>,
    /// `followup_date <= date_to`
    pub date_to: Option<NaiveDate>,
    /// `followup_date < date_before`
    pub date_before: Option<NaiveDate>,
}

impl FollowupFilter {
    pub fn pending() -> Self {
        Self {
            status: Some(FollowupStatus::Pending),
            ..Default::default()
        }
    }

    pub fn for_lead(lead_id: Uuid) -> Self {
        Self {
            lead_id: Some(lead_id),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Leads
// ---------------------------------------------------------------------------

pub trait LeadRepository: Send + Sync {
    fn create(&self, input: CreateLead) -> impl Future<Output = CrmResult<Lead>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CrmResult<Lead>> + Send;
    fn update(&self, id: Uuid, input: UpdateLead)
    -> impl Future<Output = CrmResult<Lead>> + Send;

    /// Delete a lead together with all of its follow-ups.
    ///
    /// Both deletes must commit together: either the lead and every
    /// follow-up are gone, or nothing changed.
    fn delete_cascade(&self, id: Uuid) -> impl Future<Output = CrmResult<()>> + Send;

    fn list(&self, filter: &LeadFilter) -> impl Future<Output = CrmResult<Vec<Lead>>> + Send;
}

// ---------------------------------------------------------------------------
// Follow-ups
// ---------------------------------------------------------------------------

pub trait FollowupRepository: Send + Sync {
    /// Create a follow-up in the `Pending` state.
    fn create(&self, input: CreateFollowup) -> impl Future<Output = CrmResult<Followup>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = CrmResult<Followup>> + Send;

    /// Generic update. Moving to `Completed` stamps `completed_at`;
    /// moving to any other status clears it.
    fn update(
        &self,
        id: Uuid,
        input: UpdateFollowup,
    ) -> impl Future<Output = CrmResult<Followup>> + Send;

    /// Mark completed, stamping `completed_at` and `updated_at` with one
    /// instant in a single write. Re-completing re-stamps.
    fn complete(&self, id: Uuid) -> impl Future<Output = CrmResult<Followup>> + Send;

    fn delete(&self, id: Uuid) -> impl Future<Output = CrmResult<()>> + Send;

    /// Delete every follow-up owned by `lead_id`.
    fn delete_by_lead(&self, lead_id: Uuid) -> impl Future<Output = CrmResult<()>> + Send;

    fn list(
        &self,
        filter: &FollowupFilter,
    ) -> impl Future<Output = CrmResult<Vec<Followup>>> + Send;

    /// Same as [`FollowupRepository::list`], with the owning lead's contact
    /// fields joined onto each row.
    fn list_with_leads(
        &self,
        filter: &FollowupFilter,
    ) -> impl Future<Output = CrmResult<Vec<FollowupWithLead>>> + Send;
}
