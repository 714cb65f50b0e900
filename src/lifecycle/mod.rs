//! Runtime orchestration and lifecycle management.
//!
//! This module contains the infrastructure for running the store as a service:
//!
//! - **Actor lifecycle management**: Starting the store actor and shutting it down
//! - **Configuration**: Channel sizing, read from the environment
//! - **Observability setup**: Initializing tracing and logging
//!
//! # Main Components
//!
//! - [`StoreSystem`] - Starts the store actor and hands out its client
//! - [`SystemConfig`] - Runtime settings
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod config;
pub mod store_system;
pub mod tracing;

pub use config::*;
pub use store_system::*;
pub use self::tracing::*;
