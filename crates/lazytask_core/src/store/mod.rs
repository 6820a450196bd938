//! Task store and derived list views.
//!
//! # Responsibility
//! - Own the authoritative in-memory collection behind mutation APIs.
//! - Keep filter/search derivations pure and presentation-free.

pub mod query;
pub mod task_store;
