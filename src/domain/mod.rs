//! Customer domain model.
//!
//! # Data Flow
//! ```text
//! JSON body
//!     → NewCustomer / CustomerChanges (raw, all fields optional)
//!     → validate() (value_objects.rs checks formats and lengths)
//!     → CustomerDraft / CustomerPatch (validated, ready for the store)
//!     → store layer persists and returns Customer
//! ```
//!
//! # Design Decisions
//! - Payloads deserialize leniently so missing fields surface as
//!   `ValidationError` with a readable message, not a serde rejection
//! - Status is never taken from a request body; only suspend changes it
//! - `id` is assigned by the store and never accepted from clients

pub mod customer;
pub mod error;
pub mod query;
pub mod value_objects;

pub use customer::{Customer, CustomerChanges, CustomerDraft, CustomerPatch, CustomerStatus, NewCustomer};
pub use error::ValidationError;
pub use query::{CustomerQuery, ListParams};
pub use value_objects::{Email, PhoneNumber};
