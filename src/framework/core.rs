//! # Store Actor
//!
//! This module puts a [`Store`] behind a Tokio task so several tasks can share
//! it safely.
//!
//! ## Key Types
//!
//! - [`StoreActor`]: The server half. Owns the store and the receiving end of
//!   the channel.
//! - [`StoreClient`]: The cloneable async handle that sends requests.
//! - [`StoreRequest`]: One message per store operation.
//! - [`FrameworkError`]: Channel failures (actor gone, reply dropped).

use crate::model::{Client, ClientId, Order, OrderId};
use crate::store::{Predicate, Store, StoreError, StoreResult, StoreSnapshot};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument};

// =============================================================================
// 1. MESSAGES & ERRORS
// =============================================================================

/// Errors that can occur within the actor plumbing itself.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
}

/// Type alias for the one-shot response channel used by the actor.
pub type Response<T> = oneshot::Sender<StoreResult<T>>;

/// Message sent to the actor to request an operation.
///
/// Each variant maps to exactly one [`Store`] call. The actor handles one
/// message at a time, so a compound operation such as
/// [`SetClientAndDeleteOrder`](StoreRequest::SetClientAndDeleteOrder) is never
/// observed half applied by another client.
pub enum StoreRequest {
    HasClient {
        client: Client,
        respond_to: Response<bool>,
    },
    AddClient {
        client: Client,
        respond_to: Response<()>,
    },
    DeleteClient {
        client: Client,
        respond_to: Response<Client>,
    },
    SetClient {
        target: Client,
        edited: Client,
        respond_to: Response<()>,
    },
    SetClientAndAddOrder {
        target: Client,
        edited: Client,
        order: Order,
        respond_to: Response<()>,
    },
    SetClientAndDeleteOrder {
        target: Client,
        edited: Client,
        order: Order,
        respond_to: Response<()>,
    },
    SetClientAndEditOrder {
        target: Client,
        edited: Client,
        old_order: Order,
        new_order: Order,
        respond_to: Response<()>,
    },
    AddOrder {
        client_id: ClientId,
        order: Order,
        respond_to: Response<()>,
    },
    DeleteOrder {
        order_id: OrderId,
        respond_to: Response<Order>,
    },
    EditOrder {
        order_id: OrderId,
        order: Order,
        respond_to: Response<()>,
    },
    ReplaceAll {
        clients: Vec<Client>,
        respond_to: Response<()>,
    },
    Snapshot {
        respond_to: Response<StoreSnapshot>,
    },
    Orders {
        respond_to: Response<Vec<Order>>,
    },
    FilteredClients {
        respond_to: Response<Vec<Client>>,
    },
    FilteredOrders {
        respond_to: Response<Vec<Order>>,
    },
    UpdateClientFilter {
        predicate: Predicate<Client>,
        respond_to: Response<()>,
    },
    UpdateOrderFilter {
        predicate: Predicate<Order>,
        respond_to: Response<()>,
    },
    SortClientsByFirstLetter {
        respond_to: Response<()>,
    },
    ClientAt {
        index: usize,
        respond_to: Response<Client>,
    },
    OrderAt {
        index: usize,
        respond_to: Response<Order>,
    },
}

impl StoreRequest {
    fn name(&self) -> &'static str {
        match self {
            Self::HasClient { .. } => "has_client",
            Self::AddClient { .. } => "add_client",
            Self::DeleteClient { .. } => "delete_client",
            Self::SetClient { .. } => "set_client",
            Self::SetClientAndAddOrder { .. } => "set_client_and_add_order",
            Self::SetClientAndDeleteOrder { .. } => "set_client_and_delete_order",
            Self::SetClientAndEditOrder { .. } => "set_client_and_edit_order",
            Self::AddOrder { .. } => "add_order",
            Self::DeleteOrder { .. } => "delete_order",
            Self::EditOrder { .. } => "edit_order",
            Self::ReplaceAll { .. } => "replace_all",
            Self::Snapshot { .. } => "snapshot",
            Self::Orders { .. } => "orders",
            Self::FilteredClients { .. } => "filtered_clients",
            Self::FilteredOrders { .. } => "filtered_orders",
            Self::UpdateClientFilter { .. } => "update_client_filter",
            Self::UpdateOrderFilter { .. } => "update_order_filter",
            Self::SortClientsByFirstLetter { .. } => "sort_clients_by_first_letter",
            Self::ClientAt { .. } => "client_at",
            Self::OrderAt { .. } => "order_at",
        }
    }
}

// =============================================================================
// 2. THE ACTOR SERVER
// =============================================================================

/// The actor that owns a [`Store`].
///
/// **Concurrency Model**:
/// Messages are processed *sequentially* in [`run`](StoreActor::run), so the
/// store needs no `Mutex` or `RwLock`. Exclusive ownership inside the task is
/// the critical section.
pub struct StoreActor {
    receiver: mpsc::Receiver<StoreRequest>,
    store: Store,
}

impl StoreActor {
    pub fn new(buffer_size: usize, store: Store) -> (Self, StoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self { receiver, store };
        let client = StoreClient::new(sender);
        (actor, client)
    }

    /// Runs the event loop until every client is dropped, then hands the
    /// store back.
    pub async fn run(mut self) -> Store {
        info!(
            clients = self.store.clients().len(),
            orders = self.store.orders().len(),
            "Actor started"
        );

        while let Some(msg) = self.receiver.recv().await {
            debug!(request = msg.name(), "Request");
            self.handle(msg);
        }

        info!(
            clients = self.store.clients().len(),
            orders = self.store.orders().len(),
            "Shutdown"
        );
        self.store
    }

    fn handle(&mut self, msg: StoreRequest) {
        let store = &mut self.store;
        // A send error only means the caller stopped waiting.
        match msg {
            StoreRequest::HasClient { client, respond_to } => {
                let _ = respond_to.send(Ok(store.has_client(&client)));
            }
            StoreRequest::AddClient { client, respond_to } => {
                let _ = respond_to.send(store.add_client(client));
            }
            StoreRequest::DeleteClient { client, respond_to } => {
                let _ = respond_to.send(store.delete_client(&client));
            }
            StoreRequest::SetClient { target, edited, respond_to } => {
                let _ = respond_to.send(store.set_client(&target, edited));
            }
            StoreRequest::SetClientAndAddOrder { target, edited, order, respond_to } => {
                let _ = respond_to.send(store.set_client_and_add_order(&target, edited, &order));
            }
            StoreRequest::SetClientAndDeleteOrder { target, edited, order, respond_to } => {
                let _ = respond_to.send(store.set_client_and_delete_order(&target, edited, &order));
            }
            StoreRequest::SetClientAndEditOrder {
                target,
                edited,
                old_order,
                new_order,
                respond_to,
            } => {
                let _ = respond_to.send(store.set_client_and_edit_order(
                    &target,
                    edited,
                    &old_order,
                    &new_order,
                ));
            }
            StoreRequest::AddOrder { client_id, order, respond_to } => {
                let _ = respond_to.send(store.add_order(&client_id, order));
            }
            StoreRequest::DeleteOrder { order_id, respond_to } => {
                let _ = respond_to.send(store.delete_order(&order_id));
            }
            StoreRequest::EditOrder { order_id, order, respond_to } => {
                let _ = respond_to.send(store.edit_order(&order_id, order));
            }
            StoreRequest::ReplaceAll { clients, respond_to } => {
                let _ = respond_to.send(store.replace_all(clients));
            }
            StoreRequest::Snapshot { respond_to } => {
                let _ = respond_to.send(Ok(store.snapshot()));
            }
            StoreRequest::Orders { respond_to } => {
                let _ = respond_to.send(Ok(store.orders().to_vec()));
            }
            StoreRequest::FilteredClients { respond_to } => {
                let _ = respond_to.send(Ok(store.filtered_clients().to_vec()));
            }
            StoreRequest::FilteredOrders { respond_to } => {
                let _ = respond_to.send(Ok(store.filtered_orders().to_vec()));
            }
            StoreRequest::UpdateClientFilter { predicate, respond_to } => {
                store.set_client_filter(predicate);
                let _ = respond_to.send(Ok(()));
            }
            StoreRequest::UpdateOrderFilter { predicate, respond_to } => {
                store.set_order_filter(predicate);
                let _ = respond_to.send(Ok(()));
            }
            StoreRequest::SortClientsByFirstLetter { respond_to } => {
                store.sort_clients_by_first_letter();
                let _ = respond_to.send(Ok(()));
            }
            StoreRequest::ClientAt { index, respond_to } => {
                let _ = respond_to.send(store.client_at(index).cloned());
            }
            StoreRequest::OrderAt { index, respond_to } => {
                let _ = respond_to.send(store.order_at(index).cloned());
            }
        }
    }
}

// =============================================================================
// 3. THE CLIENT
// =============================================================================

/// A cloneable handle for talking to a [`StoreActor`].
///
/// Reads return owned copies of the current view, taken inside the actor's
/// critical section.
#[derive(Clone)]
pub struct StoreClient {
    sender: mpsc::Sender<StoreRequest>,
}

impl StoreClient {
    pub fn new(sender: mpsc::Sender<StoreRequest>) -> Self {
        Self { sender }
    }

    fn map_error(e: FrameworkError) -> StoreError {
        StoreError::ActorCommunication(e.to_string())
    }

    async fn request<T>(&self, make: impl FnOnce(Response<T>) -> StoreRequest) -> StoreResult<T> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(make(respond_to))
            .await
            .map_err(|_| Self::map_error(FrameworkError::ActorClosed))?;
        response
            .await
            .map_err(|_| Self::map_error(FrameworkError::ActorDropped))?
    }

    pub async fn has_client(&self, client: Client) -> StoreResult<bool> {
        self.request(|respond_to| StoreRequest::HasClient { client, respond_to })
            .await
    }

    #[instrument(skip_all, fields(client = %client.name()))]
    pub async fn add_client(&self, client: Client) -> StoreResult<()> {
        debug!("Sending request");
        self.request(|respond_to| StoreRequest::AddClient { client, respond_to })
            .await
    }

    #[instrument(skip_all, fields(client = %client.name()))]
    pub async fn delete_client(&self, client: Client) -> StoreResult<Client> {
        debug!("Sending request");
        self.request(|respond_to| StoreRequest::DeleteClient { client, respond_to })
            .await
    }

    #[instrument(skip_all, fields(client = %target.name()))]
    pub async fn set_client(&self, target: Client, edited: Client) -> StoreResult<()> {
        debug!("Sending request");
        self.request(|respond_to| StoreRequest::SetClient { target, edited, respond_to })
            .await
    }

    #[instrument(skip_all, fields(client = %target.name(), order_id = %order.id()))]
    pub async fn set_client_and_add_order(
        &self,
        target: Client,
        edited: Client,
        order: Order,
    ) -> StoreResult<()> {
        debug!("Sending request");
        self.request(|respond_to| StoreRequest::SetClientAndAddOrder {
            target,
            edited,
            order,
            respond_to,
        })
        .await
    }

    #[instrument(skip_all, fields(client = %target.name(), order_id = %order.id()))]
    pub async fn set_client_and_delete_order(
        &self,
        target: Client,
        edited: Client,
        order: Order,
    ) -> StoreResult<()> {
        debug!("Sending request");
        self.request(|respond_to| StoreRequest::SetClientAndDeleteOrder {
            target,
            edited,
            order,
            respond_to,
        })
        .await
    }

    #[instrument(skip_all, fields(client = %target.name(), order_id = %old_order.id()))]
    pub async fn set_client_and_edit_order(
        &self,
        target: Client,
        edited: Client,
        old_order: Order,
        new_order: Order,
    ) -> StoreResult<()> {
        debug!("Sending request");
        self.request(|respond_to| StoreRequest::SetClientAndEditOrder {
            target,
            edited,
            old_order,
            new_order,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self, order), fields(order_id = %order.id()))]
    pub async fn add_order(&self, client_id: ClientId, order: Order) -> StoreResult<()> {
        debug!("Sending request");
        self.request(|respond_to| StoreRequest::AddOrder {
            client_id,
            order,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_order(&self, order_id: OrderId) -> StoreResult<Order> {
        debug!("Sending request");
        self.request(|respond_to| StoreRequest::DeleteOrder { order_id, respond_to })
            .await
    }

    #[instrument(skip(self, order))]
    pub async fn edit_order(&self, order_id: OrderId, order: Order) -> StoreResult<()> {
        debug!("Sending request");
        self.request(|respond_to| StoreRequest::EditOrder {
            order_id,
            order,
            respond_to,
        })
        .await
    }

    pub async fn replace_all(&self, clients: Vec<Client>) -> StoreResult<()> {
        self.request(|respond_to| StoreRequest::ReplaceAll { clients, respond_to })
            .await
    }

    pub async fn snapshot(&self) -> StoreResult<StoreSnapshot> {
        self.request(|respond_to| StoreRequest::Snapshot { respond_to })
            .await
    }

    /// Every order, sorted by deadline.
    pub async fn orders(&self) -> StoreResult<Vec<Order>> {
        self.request(|respond_to| StoreRequest::Orders { respond_to })
            .await
    }

    pub async fn filtered_clients(&self) -> StoreResult<Vec<Client>> {
        self.request(|respond_to| StoreRequest::FilteredClients { respond_to })
            .await
    }

    pub async fn filtered_orders(&self) -> StoreResult<Vec<Order>> {
        self.request(|respond_to| StoreRequest::FilteredOrders { respond_to })
            .await
    }

    pub async fn update_client_filter(&self, predicate: Predicate<Client>) -> StoreResult<()> {
        self.request(|respond_to| StoreRequest::UpdateClientFilter { predicate, respond_to })
            .await
    }

    pub async fn update_order_filter(&self, predicate: Predicate<Order>) -> StoreResult<()> {
        self.request(|respond_to| StoreRequest::UpdateOrderFilter { predicate, respond_to })
            .await
    }

    pub async fn sort_clients_by_first_letter(&self) -> StoreResult<()> {
        self.request(|respond_to| StoreRequest::SortClientsByFirstLetter { respond_to })
            .await
    }

    pub async fn client_at(&self, index: usize) -> StoreResult<Client> {
        self.request(|respond_to| StoreRequest::ClientAt { index, respond_to })
            .await
    }

    pub async fn order_at(&self, index: usize) -> StoreResult<Order> {
        self.request(|respond_to| StoreRequest::OrderAt { index, respond_to })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Address, Amount, Deadline, Email, Name, OrderDate, Phone, Remark, Status};
    use std::sync::Arc;

    fn alice() -> Client {
        Client::new(
            Name::new("Alice").unwrap(),
            Phone::new("111").unwrap(),
            Email::new("alice@example.com").unwrap(),
            Address::new("1 Main Street").unwrap(),
            [],
            [],
        )
    }

    fn order(deadline: &str) -> Order {
        Order::new(
            OrderDate::new("01-01-2024 09:00").unwrap(),
            Deadline::new(deadline).unwrap(),
            Amount::new("5").unwrap(),
            Remark::default(),
            Status::Pending,
        )
    }

    #[tokio::test]
    async fn actor_serves_requests_and_returns_store() {
        let (actor, client) = StoreActor::new(4, Store::new());
        let handle = tokio::spawn(actor.run());

        let alice = alice();
        client.add_client(alice.clone()).await.unwrap();
        assert!(client.has_client(alice.clone()).await.unwrap());

        let err = client.add_client(alice.clone()).await.unwrap_err();
        assert!(err.is_duplicate());

        let o = order("01-03-2024 23:59");
        client.add_order(alice.id(), o.clone()).await.unwrap();
        assert_eq!(client.order_at(0).await.unwrap().id(), o.id());

        client
            .update_order_filter(Arc::new(|o: &Order| o.status() == Status::Completed))
            .await
            .unwrap();
        assert!(client.filtered_orders().await.unwrap().is_empty());

        drop(client);
        let store = handle.await.unwrap();
        assert_eq!(store.clients().len(), 1);
        assert_eq!(store.orders().len(), 1);
    }

    #[tokio::test]
    async fn closed_actor_surfaces_communication_error() {
        let (actor, client) = StoreActor::new(1, Store::new());
        drop(actor);

        let err = client.snapshot().await.unwrap_err();
        assert_eq!(err, StoreError::ActorCommunication("Actor closed".to_string()));
    }
}
