use crate::framework::{StoreActor, StoreClient};
use crate::lifecycle::SystemConfig;
use crate::store::{Store, StoreError};
use tracing::{error, info};

/// Runs a [`Store`] behind its actor.
///
/// `StoreSystem` is responsible for:
/// - **Lifecycle Management**: Spawning the actor task and joining it on shutdown
/// - **Access**: Handing out the [`StoreClient`] other tasks clone
///
/// # Example
///
/// ```ignore
/// let system = StoreSystem::new(Store::new());
/// system.client.add_client(client).await?;
/// let store = system.shutdown().await?;
/// ```
pub struct StoreSystem {
    /// Client for interacting with the store actor
    pub client: StoreClient,

    handle: tokio::task::JoinHandle<Store>,
}

impl StoreSystem {
    /// Starts the actor with the default configuration.
    pub fn new(store: Store) -> Self {
        Self::with_config(store, SystemConfig::default())
    }

    pub fn with_config(store: Store, config: SystemConfig) -> Self {
        info!(buffer_size = config.buffer_size, "Starting store system");
        let (actor, client) = StoreActor::new(config.buffer_size, store);
        let handle = tokio::spawn(actor.run());
        Self { client, handle }
    }

    /// Drops this system's client, waits for the actor to drain and returns
    /// the final store.
    ///
    /// The actor only stops once every clone of the client is gone.
    pub async fn shutdown(self) -> Result<Store, StoreError> {
        info!("Shutting down system...");
        drop(self.client);

        match self.handle.await {
            Ok(store) => {
                info!("System shutdown complete.");
                Ok(store)
            }
            Err(e) => {
                error!("Actor task failed: {:?}", e);
                Err(StoreError::ActorCommunication(format!("Actor task failed: {e}")))
            }
        }
    }
}
