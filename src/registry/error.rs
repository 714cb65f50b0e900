//! Error types for the client registry.

use crate::model::{ClientId, OrderId};
use thiserror::Error;

/// Errors raised by registry primitives. A failed call changes nothing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The operation would leave two clients that are the same client.
    #[error("This client already exists in the client book: {0}")]
    DuplicateEntity(String),

    /// Two clients would embed the same order.
    #[error("Order {0} is already owned by another client")]
    DuplicateOrder(OrderId),

    /// The target client is not in the registry.
    #[error("Client not found: {0}")]
    NotFound(ClientId),
}

pub type RegistryResult<T> = Result<T, RegistryError>;
