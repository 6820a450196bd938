//! Persistence boundary for the task collection.
//!
//! # Responsibility
//! - Define the raw key-value slot seam used by the adapter.
//! - Translate backend faults into advisory storage errors.
//!
//! # Invariants
//! - The store above this boundary deals only in validated `Task` values;
//!   this layer deals only in the serialized wire form.

pub mod adapter;
pub mod backend;
