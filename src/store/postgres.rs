//! PostgreSQL store.
//!
//! # Responsibilities
//! - Own the connection pool
//! - Create the `customers` table if absent
//! - Translate each store operation into one SQL statement
//! - Push list filters down into the `WHERE` clause

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder};

use super::{CustomerStore, StoreError};
use crate::config::DatabaseConfig;
use crate::domain::{Customer, CustomerDraft, CustomerPatch, CustomerQuery};

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS customers (
    id            BIGSERIAL PRIMARY KEY,
    name          VARCHAR(63)  NOT NULL,
    address       VARCHAR(256) NOT NULL,
    email         VARCHAR(63)  NOT NULL,
    phone_number  VARCHAR(32)  NOT NULL,
    member_since  DATE         NOT NULL,
    status        VARCHAR(20)  NOT NULL DEFAULT 'active',
    created_at    TIMESTAMPTZ  NOT NULL DEFAULT now(),
    last_updated  TIMESTAMPTZ  NOT NULL DEFAULT now()
)
"#;

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i64,
    name: String,
    address: String,
    email: String,
    phone_number: String,
    member_since: NaiveDate,
    status: String,
    created_at: DateTime<Utc>,
    last_updated: DateTime<Utc>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = StoreError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let status = row.status.parse().map_err(|_| StoreError::Corrupt {
            id: row.id,
            reason: format!("unknown status '{}'", row.status),
        })?;

        Ok(Customer {
            id: row.id,
            name: row.name,
            address: row.address,
            email: row.email,
            phone_number: row.phone_number,
            member_since: row.member_since,
            status,
            created_at: row.created_at,
            last_updated: row.last_updated,
        })
    }
}

/// Store backed by a `sqlx` Postgres pool.
#[derive(Debug, Clone)]
pub struct PgCustomerStore {
    pool: PgPool,
}

impl PgCustomerStore {
    /// Open a pool and verify it with one connection.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await?;

        tracing::info!(max_connections = config.max_connections, "Database pool ready");
        Ok(Self { pool })
    }

    pub async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        tracing::debug!("customers table ensured");
        Ok(())
    }

    /// Remove every row. Used to reset state between test runs.
    pub async fn truncate(&self) -> Result<(), StoreError> {
        sqlx::query("TRUNCATE customers RESTART IDENTITY")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CustomerStore for PgCustomerStore {
    async fn create(&self, draft: CustomerDraft) -> Result<Customer, StoreError> {
        let row: CustomerRow = sqlx::query_as(
            "INSERT INTO customers (name, address, email, phone_number, member_since, status) \
             VALUES ($1, $2, $3, $4, $5, 'active') RETURNING *",
        )
        .bind(&draft.name)
        .bind(&draft.address)
        .bind(draft.email.as_str())
        .bind(draft.phone_number.as_str())
        .bind(draft.member_since)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn find(&self, id: i64) -> Result<Option<Customer>, StoreError> {
        let row: Option<CustomerRow> = sqlx::query_as("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Customer::try_from).transpose()
    }

    async fn update(&self, id: i64, patch: CustomerPatch) -> Result<Customer, StoreError> {
        let row: Option<CustomerRow> = sqlx::query_as(
            "UPDATE customers SET \
                name = COALESCE($2, name), \
                address = COALESCE($3, address), \
                email = COALESCE($4, email), \
                phone_number = COALESCE($5, phone_number), \
                member_since = COALESCE($6, member_since), \
                last_updated = now() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.address)
        .bind(patch.email.map(String::from))
        .bind(patch.phone_number.map(String::from))
        .bind(patch.member_since)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(StoreError::NotFound(id))?.try_into()
    }

    async fn list(&self, query: &CustomerQuery) -> Result<Vec<Customer>, StoreError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT * FROM customers WHERE TRUE");

        if let Some(prefix) = &query.name_prefix {
            builder.push(" AND starts_with(name, ").push_bind(prefix.clone()).push(")");
        }
        if let Some(prefix) = &query.address_prefix {
            builder.push(" AND starts_with(address, ").push_bind(prefix.clone()).push(")");
        }
        if let Some(email) = &query.email {
            builder.push(" AND email = ").push_bind(email.clone());
        }
        if let Some(phone) = &query.phone_number {
            builder.push(" AND phone_number = ").push_bind(phone.clone());
        }
        if let Some(date) = query.member_since {
            builder.push(" AND member_since = ").push_bind(date);
        }
        if let Some(status) = query.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        builder.push(" ORDER BY id");

        let rows = builder.build_query_as::<CustomerRow>().fetch_all(&self.pool).await?;
        rows.into_iter().map(Customer::try_from).collect()
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn suspend(&self, id: i64) -> Result<Customer, StoreError> {
        let row: Option<CustomerRow> = sqlx::query_as(
            "UPDATE customers SET status = 'suspended', last_updated = now() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(StoreError::NotFound(id))?.try_into()
    }
}
