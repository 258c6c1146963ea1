//! # Store Error Types
//!
//! All errors that can occur while driving a [`Store`](crate::Store).
//!
//! Every variant is a contract violation or an environment failure. None of
//! them is retried inside the crate, and no operation leaves a partially
//! applied mutation behind when it returns one of them.

use thiserror::Error;

use crate::entity::EntityId;

/// Errors that can occur in the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The entity is not held by the store (or is the reserved null id).
    #[error("entity {0} is not held by the store")]
    InvalidEntity(EntityId),

    /// The entity is already held by the store.
    #[error("entity {0} is already held by the store")]
    DuplicateEntity(EntityId),

    /// Capacity growth could not acquire memory.
    #[error("allocation failure: could not grow to {requested} records")]
    AllocationFailure {
        /// Capacity (in records) that was requested.
        requested: usize,
    },

    /// Invalid configuration file or value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
