//! Actor wrapper that serializes access to the store.
//!
//! # Main Components
//!
//! - [`StoreActor`] - Owns a [`Store`](crate::store::Store) and processes requests one at a time
//! - [`StoreClient`] - Cloneable async handle used by every other task
//! - [`FrameworkError`] - Channel failures, surfaced as
//!   [`StoreError::ActorCommunication`](crate::store::StoreError::ActorCommunication)

pub mod core;

pub use core::*;
