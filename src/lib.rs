//! # Client Book
//!
//! > **An in-memory client and order store with consistent compound edits.**
//!
//! The crate tracks clients and the orders placed against them. A [`Store`](store::Store)
//! owns the canonical collections, rejects duplicate clients, keeps a
//! deadline-sorted index of every order in step with the orders embedded in
//! clients, and exposes live filtered views.
//!
//! ## Module Tour
//!
//! ### 1. The Values ([`model`])
//! Validated scalars ([`Name`](model::Name), [`Deadline`](model::Deadline), ...) and the
//! immutable [`Client`](model::Client) and [`Order`](model::Order) records.
//!
//! ### 2. The Collections ([`registry`], [`order_index`])
//! - [`ClientRegistry`](registry::ClientRegistry): insertion-ordered, identity-unique clients.
//! - [`OrderIndex`](order_index::OrderIndex): every order, sorted by deadline.
//!
//! ### 3. The Facade ([`store`])
//! Composes the two collections. Compound edits such as
//! [`set_client_and_delete_order`](store::Store::set_client_and_delete_order) either
//! apply completely or leave the store untouched.
//!
//! ### 4. The Engine ([`framework`], [`lifecycle`])
//! When several tasks share one store, [`StoreActor`](framework::StoreActor) owns it
//! and processes requests sequentially; [`StoreSystem`](lifecycle::StoreSystem)
//! starts and stops it.
//!
//! ## Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run
//! cargo test
//! ```

pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod order_index;
pub mod registry;
pub mod sample;
pub mod store;
