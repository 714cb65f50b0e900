//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered
//! by `RUST_LOG`. Module paths are hidden (`with_target(false)`); log lines
//! carry structured fields such as `client`, `order_id` and `size` instead.
//!
//! ## What Gets Traced
//!
//! - **Actor lifecycle**: start and shutdown with final collection sizes
//! - **Store operations**: `debug` on entry, `info` on success, `warn` on
//!   rejection with the error
//! - **Client requests**: one span per [`StoreClient`](crate::framework::StoreClient) call
//!
//! ```bash
//! RUST_LOG=info cargo run
//! RUST_LOG=clientbook::store=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` the demo prints lines like:
//!
//! ```text
//! INFO Actor started clients=1 orders=1
//! INFO Client added size=2 orders=2
//! WARN Rejected operation="add_client" error=This client already exists in the client book: Bob
//! ```

/// Initializes the tracing subscriber once per process.
///
/// Calling it again (for example from several tests) is a no-op.
pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .try_init();
}
