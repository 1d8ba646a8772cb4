//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Startup call to the database:
//!     → retries.rs (run the operation, log each failure)
//!     → backoff.rs (exponential delay with jitter between attempts)
//!     → give up after the configured attempt count
//! ```
//!
//! # Design Decisions
//! - Only startup work is retried; request handlers never retry writes
//! - Jittered backoff keeps replicas from reconnecting in lockstep
//! - Request deadlines are enforced by tower-http, not here

pub mod backoff;
pub mod retries;

pub use backoff::BackoffPolicy;
pub use retries::retry;
