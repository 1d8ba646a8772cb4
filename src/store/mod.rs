//! Persistence subsystem.
//!
//! # Data Flow
//! ```text
//! handler
//!     → CustomerStore trait (this file)
//!     → postgres.rs (sqlx pool, one statement per operation)
//!       or memory.rs (DashMap, tests and local runs)
//!     → Customer
//! ```
//!
//! # Design Decisions
//! - Every mutation is a single statement, so a failure leaves no partial write
//! - `update` and `suspend` report a missing id as `StoreError::NotFound`;
//!   `delete` reports it as `Ok(false)` because deletes are idempotent
//! - Handlers only see `Arc<dyn CustomerStore>`

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{DatabaseConfig, StoreBackend};
use crate::domain::{Customer, CustomerDraft, CustomerPatch, CustomerQuery};
use crate::resilience::{retry, BackoffPolicy};

pub use memory::MemoryCustomerStore;
pub use postgres::PgCustomerStore;

/// Shared handle used by the HTTP layer.
pub type SharedStore = Arc<dyn CustomerStore>;

/// Errors surfaced by a store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("customer {0} not found")]
    NotFound(i64),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt row for customer {id}: {reason}")]
    Corrupt { id: i64, reason: String },
}

/// Canonical owner of customer records.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Insert a new active customer and return it with its assigned id.
    async fn create(&self, draft: CustomerDraft) -> Result<Customer, StoreError>;

    async fn find(&self, id: i64) -> Result<Option<Customer>, StoreError>;

    /// Overwrite the fields present in `patch`.
    async fn update(&self, id: i64, patch: CustomerPatch) -> Result<Customer, StoreError>;

    /// Customers matching every filter in `query`, ordered by id.
    async fn list(&self, query: &CustomerQuery) -> Result<Vec<Customer>, StoreError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    async fn suspend(&self, id: i64) -> Result<Customer, StoreError>;
}

/// Open the configured backend. Postgres connections are retried with backoff
/// and the schema is created if absent.
pub async fn open(config: &DatabaseConfig) -> Result<SharedStore, StoreError> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory customer store; data is lost on restart");
            Ok(Arc::new(MemoryCustomerStore::new()))
        }
        StoreBackend::Postgres => {
            let policy = BackoffPolicy::from_config(config);
            let store = retry("connect to database", config.connect_retries, &policy, || {
                PgCustomerStore::connect(config)
            })
            .await?;
            store.init_schema().await?;
            Ok(Arc::new(store))
        }
    }
}
