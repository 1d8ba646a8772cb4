//! Typed async client for the Customer Service REST API.

pub mod client;
pub mod types;

pub use client::{ClientError, CustomerClient};
pub use types::{Customer, CustomerFilter, CustomerInput};
