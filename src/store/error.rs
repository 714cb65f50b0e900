//! Error types for the store facade.

use crate::model::{OrderId, ValidationError};
use crate::registry::RegistryError;
use thiserror::Error;

/// Errors that can occur during store operations.
///
/// Every variant is recoverable; the store is left exactly as it was before
/// the failed call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A registry primitive refused the change (duplicate or missing client).
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// No client owns the referenced order.
    #[error("Failed to update order: no client owns order {0}")]
    OrderOwnerNotFound(OrderId),

    /// The referenced order is not in the store.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// A displayed index does not point into the current view.
    #[error("The {kind} index provided is invalid: {index}")]
    InvalidIndex { kind: &'static str, index: usize },

    /// A field failed its validity predicate.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An error occurred while communicating with the store actor.
    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}

impl StoreError {
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            Self::Registry(RegistryError::DuplicateEntity(_) | RegistryError::DuplicateOrder(_))
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Registry(RegistryError::NotFound(_))
                | Self::OrderNotFound(_)
                | Self::InvalidIndex { .. }
        )
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
