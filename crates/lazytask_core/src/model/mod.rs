//! Domain model for the task list.
//!
//! # Responsibility
//! - Define the canonical task record used by store and storage layers.
//! - Keep validation and normalization rules next to the data they guard.
//!
//! # Invariants
//! - Every task is identified by a stable opaque `TaskId`.
//! - Deletion is hard delete; there are no tombstones.

pub mod task;
