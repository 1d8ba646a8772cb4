//! In-process store backed by a concurrent map.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use super::{CustomerStore, StoreError};
use crate::domain::{Customer, CustomerDraft, CustomerPatch, CustomerQuery, CustomerStatus};

/// Ids start at 1 and are never reused, matching a `BIGSERIAL` column.
#[derive(Debug)]
pub struct MemoryCustomerStore {
    rows: DashMap<i64, Customer>,
    next_id: AtomicI64,
}

impl MemoryCustomerStore {
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for MemoryCustomerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CustomerStore for MemoryCustomerStore {
    async fn create(&self, draft: CustomerDraft) -> Result<Customer, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let customer = Customer {
            id,
            name: draft.name,
            address: draft.address,
            email: draft.email.into(),
            phone_number: draft.phone_number.into(),
            member_since: draft.member_since,
            status: CustomerStatus::Active,
            created_at: now,
            last_updated: now,
        };
        self.rows.insert(id, customer.clone());
        Ok(customer)
    }

    async fn find(&self, id: i64) -> Result<Option<Customer>, StoreError> {
        Ok(self.rows.get(&id).map(|entry| entry.value().clone()))
    }

    async fn update(&self, id: i64, patch: CustomerPatch) -> Result<Customer, StoreError> {
        let mut entry = self.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        patch.apply(entry.value_mut());
        entry.last_updated = Utc::now();
        Ok(entry.value().clone())
    }

    async fn list(&self, query: &CustomerQuery) -> Result<Vec<Customer>, StoreError> {
        let mut found: Vec<Customer> = self
            .rows
            .iter()
            .filter(|entry| query.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        found.sort_by_key(|c| c.id);
        Ok(found)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.rows.remove(&id).is_some())
    }

    async fn suspend(&self, id: i64) -> Result<Customer, StoreError> {
        let mut entry = self.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        entry.status = CustomerStatus::Suspended;
        entry.last_updated = Utc::now();
        Ok(entry.value().clone())
    }
}
