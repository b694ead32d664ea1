//! # SlotSwap Core
//!
//! Domain models and rules for the SlotSwap scheduling marketplace.
//!
//! This crate is deliberately free of I/O: it defines the `Event` and
//! `SwapRequest` models, the error taxonomy shared across the workspace, and
//! the [`coordinator`] module, which holds the pure state-machine rules that
//! the persistence layer applies inside its transactions.

/// Pure state-machine rules for slot statuses and swap resolution
pub mod coordinator;
/// Error taxonomy shared across the workspace
pub mod errors;
/// Wire and domain models
pub mod models;
