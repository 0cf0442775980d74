//! Lead service: CRUD pass-through, search, and status aggregation.

use leadbook_core::error::{CrmError, CrmResult};
use leadbook_core::models::{CreateLead, Lead, LeadStatus, UpdateLead};
use leadbook_core::repository::{LeadFilter, LeadRepository, StatusFilter};
use leadbook_core::schedule::LeadStatusCounts;
use tracing::{debug, warn};
use uuid::Uuid;

/// Lead service.
///
/// Generic over the repository implementation so that this layer has no
/// dependency on the database crate.
pub struct LeadService<L: LeadRepository> {
    repo: L,
}

impl<L: LeadRepository> LeadService<L> {
    pub fn new(repo: L) -> Self {
        Self { repo }
    }

    /// All leads, newest first.
    pub async fn list(&self) -> CrmResult<Vec<Lead>> {
        self.repo.list(&LeadFilter::default()).await
    }

    pub async fn get(&self, id: Uuid) -> CrmResult<Lead> {
        self.repo.get_by_id(id).await
    }

    pub async fn create(&self, input: CreateLead) -> CrmResult<Lead> {
        require_name(&input.name)?;
        self.repo.create(input).await
    }

    pub async fn update(&self, id: Uuid, input: UpdateLead) -> CrmResult<Lead> {
        if let Some(name) = &input.name {
            require_name(name)?;
        }
        self.repo.update(id, input).await
    }

    pub async fn update_status(&self, id: Uuid, status: LeadStatus) -> CrmResult<Lead> {
        self.repo
            .update(
                id,
                UpdateLead {
                    status: Some(status),
                    ..Default::default()
                },
            )
            .await
    }

    /// Delete a lead and all of its follow-ups in one store transaction.
    pub async fn delete(&self, id: Uuid) -> CrmResult<()> {
        self.repo
            .delete_cascade(id)
            .await
            .inspect_err(|e| warn!(lead_id = %id, error = %e, "Lead delete failed"))
    }

    /// Case-insensitive substring search over name, email and phone.
    pub async fn search(&self, query: &str) -> CrmResult<Vec<Lead>> {
        self.repo
            .list(&LeadFilter {
                search: Some(query.to_string()),
                ..Default::default()
            })
            .await
    }

    pub async fn filter_by_status(&self, status: StatusFilter) -> CrmResult<Vec<Lead>> {
        self.repo
            .list(&LeadFilter {
                status,
                ..Default::default()
            })
            .await
    }

    /// Count every lead by status bucket.
    ///
    /// Leads with unrecognised status text are counted in `total` only.
    pub async fn counts_by_status(&self) -> CrmResult<LeadStatusCounts> {
        let leads = self
            .repo
            .list(&LeadFilter::default())
            .await
            .inspect_err(|e| warn!(error = %e, "Lead status count failed"))?;

        let counts = LeadStatusCounts::tally(&leads);
        let unbucketed = counts.total - counts.bucket_sum();
        if unbucketed > 0 {
            debug!(unbucketed, "Leads with unrecognised status");
        }
        debug!(total = counts.total, "Lead status counts computed");
        Ok(counts)
    }
}

fn require_name(name: &str) -> CrmResult<()> {
    if name.trim().is_empty() {
        return Err(CrmError::Validation {
            message: "lead name must not be empty".into(),
        });
    }
    Ok(())
}
