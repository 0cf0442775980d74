//! Follow-up date windows and dashboard aggregation.
//!
//! Everything here is a pure function of its inputs plus a `today` the
//! caller computed once. Dates are calendar dates; time of day never
//! takes part in bucketing.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Followup, FollowupStatus, Lead, LeadStatus, Priority};

/// Inclusive `[followup_date - reminder_days, followup_date]`.
pub fn reminder_window(followup: &Followup) -> (NaiveDate, NaiveDate) {
    let start = followup
        .followup_date
        .checked_sub_days(Days::new(u64::from(followup.reminder_days)))
        .unwrap_or(NaiveDate::MIN);
    (start, followup.followup_date)
}

/// True while `today` lies anywhere inside the reminder window, not just
/// on its first day.
pub fn is_reminder_active(followup: &Followup, today: NaiveDate) -> bool {
    let (start, end) = reminder_window(followup);
    start <= today && today <= end
}

pub fn is_overdue(followup: &Followup, today: NaiveDate) -> bool {
    followup.status == FollowupStatus::Pending && followup.followup_date < today
}

/// Last date with a four-digit year. Stored dates are compared as
/// `YYYY-MM-DD` text, which stops sorting correctly past this point.
pub fn last_storable_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Inclusive `[today, today + days]`, with the end clamped to
/// [`last_storable_date`].
pub fn upcoming_range(today: NaiveDate, days: u32) -> (NaiveDate, NaiveDate) {
    let end = today
        .checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
        .min(last_storable_date());
    (today, end)
}

/// Follow-up counters for the dashboard.
///
/// `total` covers every status; the other counters only look at
/// `Pending` follow-ups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: u64,
    pub pending: u64,
    pub today_count: u64,
    pub high_priority: u64,
    pub overdue: u64,
}

impl DashboardStats {
    pub fn tally<'a>(followups: impl IntoIterator<Item = &'a Followup>, today: NaiveDate) -> Self {
        let mut stats = Self::default();
        for f in followups {
            stats.total += 1;
            if f.status != FollowupStatus::Pending {
                continue;
            }
            stats.pending += 1;
            if f.followup_date == today {
                stats.today_count += 1;
            }
            if f.followup_date < today {
                stats.overdue += 1;
            }
            if f.priority == Priority::High {
                stats.high_priority += 1;
            }
        }
        stats
    }
}

/// Lead counts per status bucket.
///
/// A lead whose stored status is not one of the seven known values is
/// counted in `total` only, so `bucket_sum()` can be less than `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadStatusCounts {
    pub total: u64,
    pub new: u64,
    pub contacted: u64,
    #[serde(rename = "follow up")]
    pub follow_up: u64,
    pub interested: u64,
    pub qualified: u64,
    pub converted: u64,
    pub lost: u64,
}

impl LeadStatusCounts {
    pub fn tally<'a>(leads: impl IntoIterator<Item = &'a Lead>) -> Self {
        let mut counts = Self::default();
        for lead in leads {
            counts.total += 1;
            if let Ok(status) = lead.status() {
                *counts.bucket_mut(status) += 1;
            }
        }
        counts
    }

    pub fn get(&self, status: LeadStatus) -> u64 {
        match status {
            LeadStatus::New => self.new,
            LeadStatus::Contacted => self.contacted,
            LeadStatus::FollowUp => self.follow_up,
            LeadStatus::Interested => self.interested,
            LeadStatus::Qualified => self.qualified,
            LeadStatus::Converted => self.converted,
            LeadStatus::Lost => self.lost,
        }
    }

    pub fn bucket_sum(&self) -> u64 {
        LeadStatus::ALL.iter().map(|s| self.get(*s)).sum()
    }

    fn bucket_mut(&mut self, status: LeadStatus) -> &mut u64 {
        match status {
            LeadStatus::New => &mut self.new,
            LeadStatus::Contacted => &mut self.contacted,
            LeadStatus::FollowUp => &mut self.follow_up,
            LeadStatus::Interested => &mut self.interested,
            LeadStatus::Qualified => &mut self.qualified,
            LeadStatus::Converted => &mut self.converted,
            LeadStatus::Lost => &mut self.lost,
        }
    }
}
