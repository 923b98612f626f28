// ABOUTME: Lead storage layer using SQLite
// ABOUTME: Public intake plus admin triage (status, salutation, WhatsApp contact)

use chrono::{Days, NaiveDate, NaiveTime, Utc};
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::{debug, info};

use storefront_core::{generate_id, like_pattern, PaginationParams};
use storefront_storage::{StorageError, StorageResult};

use crate::types::{Lead, LeadFilter, LeadStatus, LeadSubmission, Panggilan};
use crate::validation::validate_submission;
use crate::whatsapp::{ContactLink, WhatsAppTemplate};

pub struct LeadStorage {
    pool: SqlitePool,
}

impl LeadStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Validate a public form submission and record it with status `new`
    pub async fn create_lead(&self, submission: LeadSubmission) -> StorageResult<Lead> {
        let lead = validate_submission(submission)?;
        let id = generate_id("lead");
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO leads (
                id, name, email, phone, company, panggilan, qty_range, status,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&lead.name)
        .bind(&lead.email)
        .bind(&lead.phone)
        .bind(&lead.company)
        .bind(lead.panggilan.as_str())
        .bind(lead.qty_range.as_str())
        .bind(LeadStatus::New.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        info!("New lead {} ({}, {})", id, lead.company, lead.qty_range);
        self.get_lead(&id).await
    }

    pub async fn get_lead(&self, id: &str) -> StorageResult<Lead> {
        debug!("Fetching lead: {}", id);

        let row = sqlx::query("SELECT * FROM leads WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound("Lead"))?;

        row_to_lead(&row)
    }

    pub async fn list_leads(&self, filter: &LeadFilter) -> StorageResult<Vec<Lead>> {
        let (leads, _) = self.query_leads(filter, None).await?;
        Ok(leads)
    }

    pub async fn list_leads_paginated(
        &self,
        filter: &LeadFilter,
        params: &PaginationParams,
    ) -> StorageResult<(Vec<Lead>, i64)> {
        self.query_leads(filter, Some(params)).await
    }

    async fn query_leads(
        &self,
        filter: &LeadFilter,
        page: Option<&PaginationParams>,
    ) -> StorageResult<(Vec<Lead>, i64)> {
        debug!(
            "Fetching leads (status: {:?}, search: {:?}, from: {:?}, to: {:?})",
            filter.status, filter.search, filter.from, filter.to
        );

        let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM leads");
        push_filter(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM leads");
        push_filter(&mut query, filter);
        query.push(" ORDER BY created_at DESC, rowid DESC");
        if let Some(params) = page {
            query
                .push(" LIMIT ")
                .push_bind(params.limit())
                .push(" OFFSET ")
                .push_bind(params.offset());
        }

        let rows = query.build().fetch_all(&self.pool).await?;
        let leads = rows
            .iter()
            .map(row_to_lead)
            .collect::<StorageResult<Vec<_>>>()?;

        Ok((leads, total))
    }

    /// Admins may move a lead to any status
    pub async fn update_status(&self, id: &str, status: LeadStatus) -> StorageResult<Lead> {
        info!("Setting lead {} status to {}", id, status);

        let result = sqlx::query("UPDATE leads SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Lead"));
        }

        self.get_lead(id).await
    }

    pub async fn update_panggilan(&self, id: &str, panggilan: Panggilan) -> StorageResult<Lead> {
        debug!("Setting lead {} panggilan to {}", id, panggilan);

        let result = sqlx::query("UPDATE leads SET panggilan = ?, updated_at = ? WHERE id = ?")
            .bind(panggilan.as_str())
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound("Lead"));
        }

        self.get_lead(id).await
    }

    /// Build the WhatsApp link for a lead and move it from `new` to
    /// `contacted`. Leads already past `new` keep their status.
    pub async fn contact_via_whatsapp(
        &self,
        id: &str,
        template: &WhatsAppTemplate,
    ) -> StorageResult<ContactLink> {
        let lead = self.get_lead(id).await?;
        let whatsapp_url = template.link_for(&lead);

        let result = sqlx::query(
            "UPDATE leads SET status = ?, updated_at = ? WHERE id = ? AND status = ?",
        )
        .bind(LeadStatus::Contacted.as_str())
        .bind(Utc::now())
        .bind(id)
        .bind(LeadStatus::New.as_str())
        .execute(&self.pool)
        .await?;

        let lead = if result.rows_affected() > 0 {
            info!("Lead {} marked as contacted", id);
            self.get_lead(id).await?
        } else {
            lead
        };

        Ok(ContactLink { whatsapp_url, lead })
    }

    pub async fn count_by_status(&self, status: Option<LeadStatus>) -> StorageResult<i64> {
        let filter = LeadFilter {
            status,
            ..Default::default()
        };
        let mut query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM leads");
        push_filter(&mut query, &filter);

        Ok(query.build_query_scalar().fetch_one(&self.pool).await?)
    }
}

fn start_of_day(date: NaiveDate) -> chrono::DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn push_filter(query: &mut QueryBuilder<'_, Sqlite>, filter: &LeadFilter) {
    query.push(" WHERE 1 = 1");

    if let Some(status) = filter.status {
        query.push(" AND status = ").push_bind(status.as_str());
    }

    if let Some(pattern) = filter.search.as_deref().and_then(like_pattern) {
        query
            .push(" AND (name LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR email LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR company LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }

    if let Some(from) = filter.from {
        query
            .push(" AND created_at >= ")
            .push_bind(start_of_day(from));
    }

    // Inclusive upper bound: everything before the start of the next day
    if let Some(next_day) = filter.to.and_then(|to| to.checked_add_days(Days::new(1))) {
        query
            .push(" AND created_at < ")
            .push_bind(start_of_day(next_day));
    }
}

fn row_to_lead(row: &SqliteRow) -> StorageResult<Lead> {
    let panggilan: String = row.try_get("panggilan")?;
    let qty_range: String = row.try_get("qty_range")?;
    let status: String = row.try_get("status")?;

    Ok(Lead {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        company: row.try_get("company")?,
        panggilan: panggilan.parse().map_err(StorageError::InvalidData)?,
        qty_range: qty_range.parse().map_err(StorageError::InvalidData)?,
        status: status.parse().map_err(StorageError::InvalidData)?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
