//! SurrealDB implementation of [`FollowupRepository`].
//!
//! Dates travel as `YYYY-MM-DD` strings and times as `HH:MM`, so the
//! range filters compare strings. Joined listings fetch the owning leads
//! in a second query and attach them in memory.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use leadbook_core::error::CrmResult;
use leadbook_core::models::{
    CreateFollowup, Followup, FollowupStatus, FollowupWithLead, LeadSummary, Priority,
    UpdateFollowup,
};
use leadbook_core::repository::{FollowupFilter, FollowupRepository, PriorityFilter};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;

use crate::connection::StoreHandle;
use crate::error::DbError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct FollowupRow {
    lead_id: String,
    followup_date: String,
    followup_time: Option<String>,
    notes: Option<String>,
    status: String,
    priority: String,
    reminder_days: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct FollowupRowWithId {
    record_id: String,
    lead_id: String,
    followup_date: String,
    followup_time: Option<String>,
    notes: Option<String>,
    status: String,
    priority: String,
    reminder_days: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

/// Contact fields of the owning lead.
#[derive(Debug, SurrealValue)]
struct LeadSummaryRow {
    record_id: String,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    status: Option<String>,
}

fn invalid(reason: String) -> DbError {
    DbError::InvalidRow {
        entity: "followup",
        reason,
    }
}

fn parse_uuid(s: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(s).map_err(|e| invalid(format!("invalid UUID: {e}")))
}

/// Accepts a bare date or the date prefix of a datetime string.
fn parse_date(s: &str) -> Result<NaiveDate, DbError> {
    let day = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(day, DATE_FORMAT)
        .map_err(|e| invalid(format!("invalid followup_date {s:?}: {e}")))
}

fn parse_time(s: &str) -> Result<NaiveTime, DbError> {
    NaiveTime::parse_from_str(s, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|e| invalid(format!("invalid followup_time {s:?}: {e}")))
}

fn date_text(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn time_text(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

impl FollowupRow {
    fn into_followup(self, id: Uuid) -> Result<Followup, DbError> {
        Ok(Followup {
            id,
            lead_id: parse_uuid(&self.lead_id)?,
            followup_date: parse_date(&self.followup_date)?,
            followup_time: self.followup_time.as_deref().map(parse_time).transpose()?,
            notes: self.notes,
            status: self.status.parse::<FollowupStatus>().map_err(|e| invalid(format!("{e}")))?,
            priority: self.priority.parse::<Priority>().map_err(|e| invalid(format!("{e}")))?,
            reminder_days: self.reminder_days,
            created_at: self.created_at,
            updated_at: self.updated_at,
            completed_at: self.completed_at,
        })
    }
}

impl FollowupRowWithId {
    fn try_into_followup(self) -> Result<Followup, DbError> {
        let id = parse_uuid(&self.record_id)?;
        FollowupRow {
            lead_id: self.lead_id,
            followup_date: self.followup_date,
            followup_time: self.followup_time,
            notes: self.notes,
            status: self.status,
            priority: self.priority,
            reminder_days: self.reminder_days,
            created_at: self.created_at,
            updated_at: self.updated_at,
            completed_at: self.completed_at,
        }
        .into_followup(id)
    }
}

impl LeadSummaryRow {
    fn try_into_summary(self) -> Result<LeadSummary, DbError> {
        let id = Uuid::parse_str(&self.record_id).map_err(|e| DbError::InvalidRow {
            entity: "lead",
            reason: format!("invalid UUID: {e}"),
        })?;
        Ok(LeadSummary {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            status: self.status,
        })
    }
}

/// SurrealDB implementation of the Followup repository.
#[derive(Clone)]
pub struct SurrealFollowupRepository<C: Connection> {
    store: StoreHandle<C>,
}

impl<C: Connection> SurrealFollowupRepository<C> {
    pub fn new(store: impl Into<StoreHandle<C>>) -> Self {
        Self {
            store: store.into(),
        }
    }

    async fn fetch_rows(
        db: &Surreal<C>,
        filter: &FollowupFilter,
    ) -> Result<Vec<Followup>, DbError> {
        let mut conditions = Vec::new();
        if filter.lead_id.is_some() {
            conditions.push("lead_id = $lead_id");
        }
        if filter.status.is_some() {
            conditions.push("status = $status");
        }
        if let PriorityFilter::Only(_) = filter.priority {
            conditions.push("priority = $priority");
        }
        if filter.date_from.is_some() {
            conditions.push("followup_date >= $date_from");
        }
        if filter.date_to.is_some() {
            conditions.push("followup_date <= $date_to");
        }
        if filter.date_before.is_some() {
            conditions.push("followup_date < $date_before");
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM followup {where_clause} \
             ORDER BY followup_date ASC, created_at ASC"
        );

        let mut builder = db.query(&query);
        if let Some(lead_id) = filter.lead_id {
            builder = builder.bind(("lead_id", lead_id.to_string()));
        }
        if let Some(status) = filter.status {
            builder = builder.bind(("status", status.as_str().to_string()));
        }
        if let PriorityFilter::Only(priority) = filter.priority {
            builder = builder.bind(("priority", priority.as_str().to_string()));
        }
        if let Some(date) = filter.date_from {
            builder = builder.bind(("date_from", date_text(date)));
        }
        if let Some(date) = filter.date_to {
            builder = builder.bind(("date_to", date_text(date)));
        }
        if let Some(date) = filter.date_before {
            builder = builder.bind(("date_before", date_text(date)));
        }

        let mut result = builder.await?;
        let rows: Vec<FollowupRowWithId> = result.take(0)?;
        rows.into_iter()
            .map(FollowupRowWithId::try_into_followup)
            .collect()
    }

    async fn fetch_lead_summaries(
        db: &Surreal<C>,
        lead_ids: Vec<String>,
    ) -> Result<HashMap<Uuid, LeadSummary>, DbError> {
        if lead_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut result = db
            .query(
                "SELECT meta::id(id) AS record_id, name, email, phone, status \
                 FROM lead WHERE meta::id(id) IN $ids",
            )
            .bind(("ids", lead_ids))
            .await?;
        let rows: Vec<LeadSummaryRow> = result.take(0)?;
        rows.into_iter()
            .map(|row| row.try_into_summary().map(|s| (s.id, s)))
            .collect()
    }
}

impl<C: Connection> FollowupRepository for SurrealFollowupRepository<C> {
    async fn create(&self, input: CreateFollowup) -> CrmResult<Followup> {
        let db = self.store.client()?;
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = db
            .query(
                "CREATE type::record('followup', $id) SET \
                 lead_id = $lead_id, \
                 followup_date = $followup_date, \
                 followup_time = $followup_time, \
                 notes = $notes, \
                 status = $status, \
                 priority = $priority, \
                 reminder_days = $reminder_days, \
                 created_at = $now, \
                 updated_at = $now",
            )
            .bind(("id", id_str.clone()))
            .bind(("lead_id", input.lead_id.to_string()))
            .bind(("followup_date", date_text(input.followup_date)))
            .bind(("followup_time", input.followup_time.map(time_text)))
            .bind(("notes", input.notes))
            .bind(("status", FollowupStatus::Pending.as_str().to_string()))
            .bind((
                "priority",
                input.priority.unwrap_or_default().as_str().to_string(),
            ))
            .bind(("reminder_days", input.reminder_days.unwrap_or(0)))
            .bind(("now", Utc::now()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<FollowupRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "followup".into(),
            id: id_str,
        })?;

        debug!(followup_id = %id, lead_id = %input.lead_id, "Follow-up created");
        Ok(row.into_followup(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> CrmResult<Followup> {
        let db = self.store.client()?;
        let id_str = id.to_string();

        let mut result = db
            .query("SELECT * FROM type::record('followup', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<FollowupRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "followup".into(),
            id: id_str,
        })?;

        Ok(row.into_followup(id)?)
    }

    async fn update(&self, id: Uuid, input: UpdateFollowup) -> CrmResult<Followup> {
        let db = self.store.client()?;
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.followup_date.is_some() {
            sets.push("followup_date = $followup_date");
        }
        if input.followup_time.is_some() {
            sets.push("followup_time = $followup_time");
        }
        if input.notes.is_some() {
            sets.push("notes = $notes");
        }
        if input.priority.is_some() {
            sets.push("priority = $priority");
        }
        if input.reminder_days.is_some() {
            sets.push("reminder_days = $reminder_days");
        }
        match input.status {
            Some(FollowupStatus::Completed) => {
                sets.push("status = $status");
                sets.push("completed_at = $now");
            }
            Some(_) => {
                sets.push("status = $status");
                sets.push("completed_at = NONE");
            }
            None => {}
        }
        sets.push("updated_at = $now");

        let query = format!(
            "UPDATE type::record('followup', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("now", Utc::now()));

        if let Some(date) = input.followup_date {
            builder = builder.bind(("followup_date", date_text(date)));
        }
        if let Some(time) = input.followup_time {
            builder = builder.bind(("followup_time", time.map(time_text)));
        }
        if let Some(notes) = input.notes {
            builder = builder.bind(("notes", notes));
        }
        if let Some(priority) = input.priority {
            builder = builder.bind(("priority", priority.as_str().to_string()));
        }
        if let Some(reminder_days) = input.reminder_days {
            builder = builder.bind(("reminder_days", reminder_days));
        }
        if let Some(status) = input.status {
            builder = builder.bind(("status", status.as_str().to_string()));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<FollowupRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "followup".into(),
            id: id_str,
        })?;

        Ok(row.into_followup(id)?)
    }

    async fn complete(&self, id: Uuid) -> CrmResult<Followup> {
        let db = self.store.client()?;
        let id_str = id.to_string();

        let result = db
            .query(
                "UPDATE type::record('followup', $id) SET \
                 status = $status, \
                 completed_at = $now, \
                 updated_at = $now",
            )
            .bind(("id", id_str.clone()))
            .bind(("status", FollowupStatus::Completed.as_str().to_string()))
            .bind(("now", Utc::now()))
            .await
            .map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<FollowupRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "followup".into(),
            id: id_str,
        })?;

        debug!(followup_id = %id, "Follow-up completed");
        Ok(row.into_followup(id)?)
    }

    async fn delete(&self, id: Uuid) -> CrmResult<()> {
        let db = self.store.client()?;
        db.query("DELETE type::record('followup', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(())
    }

    async fn delete_by_lead(&self, lead_id: Uuid) -> CrmResult<()> {
        let db = self.store.client()?;
        db.query("DELETE followup WHERE lead_id = $lead_id")
            .bind(("lead_id", lead_id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list(&self, filter: &FollowupFilter) -> CrmResult<Vec<Followup>> {
        let db = self.store.client()?;
        Ok(Self::fetch_rows(db, filter).await?)
    }

    async fn list_with_leads(
        &self,
        filter: &FollowupFilter,
    ) -> CrmResult<Vec<FollowupWithLead>> {
        let db = self.store.client()?;
        let followups = Self::fetch_rows(db, filter).await?;

        let mut lead_ids: Vec<String> =
            followups.iter().map(|f| f.lead_id.to_string()).collect();
        lead_ids.sort();
        lead_ids.dedup();
        let leads = Self::fetch_lead_summaries(db, lead_ids).await?;

        Ok(followups
            .into_iter()
            .map(|followup| {
                let lead = leads.get(&followup.lead_id).cloned();
                FollowupWithLead { followup, lead }
            })
            .collect())
    }
}
