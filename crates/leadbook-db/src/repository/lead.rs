//! SurrealDB implementation of [`LeadRepository`].

use chrono::{DateTime, Utc};
use leadbook_core::error::CrmResult;
use leadbook_core::models::{CreateLead, Lead, UpdateLead};
use leadbook_core::repository::{LeadFilter, LeadRepository, StatusFilter};
use surrealdb::Connection;
use surrealdb_types::SurrealValue;
use tracing::debug;
use uuid::Uuid;

use crate::connection::StoreHandle;
use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct LeadRow {
    name: String,
    email: Option<String>,
    phone: Option<String>,
    status: Option<String>,
    source: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct LeadRowWithId {
    record_id: String,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    status: Option<String>,
    source: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl LeadRow {
    fn into_lead(self, id: Uuid) -> Lead {
        Lead {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            status: self.status,
            source: self.source,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl LeadRowWithId {
    fn try_into_lead(self) -> Result<Lead, DbError> {
        let id = Uuid::parse_str(&self.record_id).map_err(|e| DbError::InvalidRow {
            entity: "lead",
            reason: format!("invalid UUID: {e}"),
        })?;
        Ok(Lead {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            status: self.status,
            source: self.source,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Lead repository.
#[derive(Clone)]
pub struct SurrealLeadRepository<C: Connection> {
    store: StoreHandle<C>,
}

impl<C: Connection> SurrealLeadRepository<C> {
    pub fn new(store: impl Into<StoreHandle<C>>) -> Self {
        Self {
            store: store.into(),
        }
    }
}

impl<C: Connection> LeadRepository for SurrealLeadRepository<C> {
    async fn create(&self, input: CreateLead) -> CrmResult<Lead> {
        let db = self.store.client()?;
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let status = input.status.unwrap_or_default();

        let result = db
            .query(
                "CREATE type::record('lead', $id) SET \
                 name = $name, \
                 email = $email, \
                 phone = $phone, \
                 status = $status, \
                 source = $source, \
                 notes = $notes, \
                 created_at = $now, \
                 updated_at = $now",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("email", input.email))
            .bind(("phone", input.phone))
            .bind(("status", status.as_str().to_string()))
            .bind(("source", input.source))
            .bind(("notes", input.notes))
            .bind(("now", Utc::now()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<LeadRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "lead".into(),
            id: id_str,
        })?;

        debug!(lead_id = %id, "Lead created");
        Ok(row.into_lead(id))
    }

    async fn get_by_id(&self, id: Uuid) -> CrmResult<Lead> {
        let db = self.store.client()?;
        let id_str = id.to_string();

        let mut result = db
            .query("SELECT * FROM type::record('lead', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LeadRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "lead".into(),
            id: id_str,
        })?;

        Ok(row.into_lead(id))
    }

    async fn update(&self, id: Uuid, input: UpdateLead) -> CrmResult<Lead> {
        let db = self.store.client()?;
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.phone.is_some() {
            sets.push("phone = $phone");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.source.is_some() {
            sets.push("source = $source");
        }
        if input.notes.is_some() {
            sets.push("notes = $notes");
        }
        sets.push("updated_at = $now");

        let query = format!(
            "UPDATE type::record('lead', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("now", Utc::now()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(phone) = input.phone {
            builder = builder.bind(("phone", phone));
        }
        if let Some(status) = input.status {
            builder = builder.bind(("status", status.as_str().to_string()));
        }
        if let Some(source) = input.source {
            builder = builder.bind(("source", source));
        }
        if let Some(notes) = input.notes {
            builder = builder.bind(("notes", notes));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<LeadRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "lead".into(),
            id: id_str,
        })?;

        Ok(row.into_lead(id))
    }

    async fn delete_cascade(&self, id: Uuid) -> CrmResult<()> {
        let db = self.store.client()?;

        // Follow-ups first, then the lead, committed as one unit.
        db.query(
            "BEGIN TRANSACTION; \
             DELETE followup WHERE lead_id = $id; \
             DELETE type::record('lead', $id); \
             COMMIT TRANSACTION;",
        )
        .bind(("id", id.to_string()))
        .await
        .map_err(DbError::from)?
        .check()
        .map_err(|e| DbError::Query(e.to_string()))?;

        debug!(lead_id = %id, "Lead and follow-ups deleted");
        Ok(())
    }

    async fn list(&self, filter: &LeadFilter) -> CrmResult<Vec<Lead>> {
        let db = self.store.client()?;

        let mut conditions = Vec::new();
        if let StatusFilter::Only(_) = filter.status {
            conditions.push("status = $status");
        }
        if filter.search.is_some() {
            conditions.push(
                "(string::lowercase(name) CONTAINS $search \
                 OR string::lowercase(email ?? '') CONTAINS $search \
                 OR string::lowercase(phone ?? '') CONTAINS $search)",
            );
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM lead {where_clause} \
             ORDER BY created_at DESC"
        );

        let mut builder = db.query(&query);
        if let StatusFilter::Only(status) = filter.status {
            builder = builder.bind(("status", status.as_str().to_string()));
        }
        if let Some(search) = &filter.search {
            builder = builder.bind(("search", search.to_lowercase()));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<LeadRowWithId> = result.take(0).map_err(DbError::from)?;

        let leads = rows
            .into_iter()
            .map(LeadRowWithId::try_into_lead)
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(leads)
    }
}
