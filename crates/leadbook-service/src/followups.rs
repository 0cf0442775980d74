//! Follow-up service: reminder windows, upcoming and overdue lists,
//! priority filtering, and dashboard statistics.
//!
//! Every operation reads "today" from the clock exactly once and
//! re-fetches from the store; nothing is cached between calls.

use chrono::NaiveDate;
use leadbook_core::clock::{Clock, SystemClock};
use leadbook_core::error::CrmResult;
use leadbook_core::models::{
    CreateFollowup, Followup, FollowupStatus, FollowupWithLead, UpdateFollowup,
};
use leadbook_core::repository::{FollowupFilter, FollowupRepository, PriorityFilter};
use leadbook_core::schedule::{DashboardStats, is_reminder_active, upcoming_range};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ServiceConfig;

/// Follow-up service.
///
/// Generic over the repository and the clock so that tests can pin
/// "today".
pub struct FollowupService<F: FollowupRepository, K: Clock = SystemClock> {
    repo: F,
    clock: K,
    config: ServiceConfig,
}

impl<F: FollowupRepository> FollowupService<F, SystemClock> {
    /// Service reading dates from the local system clock.
    pub fn with_system_clock(repo: F, config: ServiceConfig) -> Self {
        Self::new(repo, SystemClock, config)
    }
}

impl<F: FollowupRepository, K: Clock> FollowupService<F, K> {
    pub fn new(repo: F, clock: K, config: ServiceConfig) -> Self {
        Self {
            repo,
            clock,
            config,
        }
    }

    /// All follow-ups with their lead, earliest first.
    pub async fn list_all(&self) -> CrmResult<Vec<FollowupWithLead>> {
        self.repo.list_with_leads(&FollowupFilter::default()).await
    }

    pub async fn list_for_lead(&self, lead_id: Uuid) -> CrmResult<Vec<Followup>> {
        self.repo.list(&FollowupFilter::for_lead(lead_id)).await
    }

    pub async fn get(&self, id: Uuid) -> CrmResult<Followup> {
        self.repo.get_by_id(id).await
    }

    pub async fn create(&self, input: CreateFollowup) -> CrmResult<Followup> {
        self.repo.create(input).await
    }

    pub async fn update(&self, id: Uuid, input: UpdateFollowup) -> CrmResult<Followup> {
        self.repo.update(id, input).await
    }

    /// Mark completed. Calling again keeps the status and re-stamps
    /// `completed_at`.
    pub async fn mark_complete(&self, id: Uuid) -> CrmResult<Followup> {
        self.repo
            .complete(id)
            .await
            .inspect_err(|e| warn!(followup_id = %id, error = %e, "Complete failed"))
    }

    pub async fn cancel(&self, id: Uuid) -> CrmResult<Followup> {
        self.repo
            .update(
                id,
                UpdateFollowup {
                    status: Some(FollowupStatus::Cancelled),
                    ..Default::default()
                },
            )
            .await
            .inspect_err(|e| warn!(followup_id = %id, error = %e, "Cancel failed"))
    }

    pub async fn delete(&self, id: Uuid) -> CrmResult<()> {
        self.repo.delete(id).await
    }

    /// Pending follow-ups whose reminder window contains today.
    pub async fn todays_reminders(&self) -> CrmResult<Vec<FollowupWithLead>> {
        let today = self.clock.today();
        let pending = self
            .repo
            .list_with_leads(&FollowupFilter::pending())
            .await
            .inspect_err(|e| warn!(error = %e, "Reminder fetch failed"))?;

        let reminders: Vec<_> = pending
            .into_iter()
            .filter(|row| is_reminder_active(&row.followup, today))
            .collect();
        debug!(%today, count = reminders.len(), "Reminders computed");
        Ok(reminders)
    }

    /// Pending follow-ups due within `[today, today + days]`. `None` uses
    /// the configured window.
    pub async fn upcoming(&self, days: Option<u32>) -> CrmResult<Vec<FollowupWithLead>> {
        let days = days.unwrap_or(self.config.upcoming_window_days);
        let (from, to) = upcoming_range(self.clock.today(), days);
        debug!(%from, %to, "Fetching upcoming follow-ups");

        self.repo
            .list_with_leads(&FollowupFilter {
                date_from: Some(from),
                date_to: Some(to),
                ..FollowupFilter::pending()
            })
            .await
    }

    /// Pending follow-ups dated before today.
    pub async fn overdue(&self) -> CrmResult<Vec<FollowupWithLead>> {
        let today = self.clock.today();
        self.repo
            .list_with_leads(&FollowupFilter {
                date_before: Some(today),
                ..FollowupFilter::pending()
            })
            .await
    }

    /// Pending follow-ups, optionally restricted to one priority.
    pub async fn by_priority(&self, priority: PriorityFilter) -> CrmResult<Vec<FollowupWithLead>> {
        self.repo
            .list_with_leads(&FollowupFilter {
                priority,
                ..FollowupFilter::pending()
            })
            .await
    }

    pub async fn dashboard_stats(&self) -> CrmResult<DashboardStats> {
        let today = self.clock.today();
        let all = self
            .repo
            .list(&FollowupFilter::default())
            .await
            .inspect_err(|e| warn!(error = %e, "Dashboard fetch failed"))?;

        let stats = DashboardStats::tally(&all, today);
        debug!(
            %today,
            total = stats.total,
            pending = stats.pending,
            overdue = stats.overdue,
            "Dashboard stats computed"
        );
        Ok(stats)
    }

    /// The service's notion of today. Callers labelling several rows read
    /// it once and pass it to [`relative_day_label`].
    ///
    /// [`relative_day_label`]: leadbook_core::display::relative_day_label
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}
