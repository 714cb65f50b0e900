//! The client/order store: the single entry point collaborators use.
//!
//! # Responsibility
//! - Compose the [`ClientRegistry`] and the [`OrderIndex`] and keep them
//!   consistent across every mutation.
//! - Run compound edits ("replace this client and drop that order") as one
//!   step: preconditions are checked with reads, then the registry half runs,
//!   then the index half. If a check or the registry half fails, nothing
//!   changed.
//! - Expose live filtered views of clients and orders.
//!
//! # Invariants
//! - The index holds exactly the union of every client's embedded orders.
//! - The index is sorted by deadline after every public call.
//! - The client display ordering, when set, only affects
//!   [`Store::filtered_clients`]; the registry keeps insertion order.

pub mod error;
pub mod view;

pub use error::*;
pub use view::*;

use crate::model::{Client, ClientId, Order, OrderId};
use crate::order_index::OrderIndex;
use crate::registry::{ClientRegistry, RegistryError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Serializable copy of the store's canonical client list.
///
/// The order index is not part of the snapshot; it is recomputed from the
/// clients on restore.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub clients: Vec<Client>,
}

#[derive(Clone)]
pub struct Store {
    registry: ClientRegistry,
    orders: OrderIndex,
    client_filter: Predicate<Client>,
    client_display: Option<Vec<ClientId>>,
    order_filter: Predicate<Order>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            registry: ClientRegistry::new(),
            orders: OrderIndex::new(),
            client_filter: show_all(),
            client_display: None,
            order_filter: show_all(),
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("registry", &self.registry)
            .field("orders", &self.orders)
            .field("client_display", &self.client_display)
            .finish_non_exhaustive()
    }
}

fn rejected(operation: &'static str, err: impl Into<StoreError>) -> StoreError {
    let err = err.into();
    warn!(operation, error = %err, "Rejected");
    err
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a saved snapshot.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> StoreResult<Self> {
        let mut store = Self::new();
        store.restore(snapshot)?;
        Ok(store)
    }

    pub fn has_client(&self, client: &Client) -> bool {
        self.registry.contains(client)
    }

    /// Adds `client` and indexes its embedded orders. The client filter is
    /// reset so the new client is visible.
    pub fn add_client(&mut self, client: Client) -> StoreResult<()> {
        debug!(client = %client.name(), orders = client.order_count(), "add_client");
        let embedded: Vec<Order> = client.orders().cloned().collect();

        self.registry
            .add(client)
            .map_err(|e| rejected("add_client", e))?;
        for order in embedded {
            self.orders.sorted_insert(order);
        }
        self.reset_client_filter();

        info!(size = self.registry.len(), orders = self.orders.len(), "Client added");
        debug_assert!(self.is_consistent());
        Ok(())
    }

    /// Removes `client` and every order it owns.
    pub fn delete_client(&mut self, client: &Client) -> StoreResult<Client> {
        debug!(client = %client.name(), "delete_client");
        let removed = self
            .registry
            .remove(client, &mut self.orders)
            .map_err(|e| rejected("delete_client", e))?;

        info!(client = %removed.name(), orders = removed.order_count(), "Client deleted");
        debug_assert!(self.is_consistent());
        Ok(removed)
    }

    /// Replaces `target` with `edited`, reconciling the index against any
    /// change in the embedded order set.
    pub fn set_client(&mut self, target: &Client, edited: Client) -> StoreResult<()> {
        debug!(client = %target.name(), "set_client");
        let previous = self
            .registry
            .replace(target, edited)
            .map_err(|e| rejected("set_client", e))?;
        self.reconcile(&previous);

        info!(client = %previous.name(), "Client updated");
        Ok(())
    }

    /// Replaces `target` with `edited`, which must own `order`, and indexes
    /// `order`.
    pub fn set_client_and_add_order(
        &mut self,
        target: &Client,
        edited: Client,
        order: &Order,
    ) -> StoreResult<()> {
        debug!(client = %target.name(), order_id = %order.id(), "set_client_and_add_order");
        if self.orders.contains(&order.id()) {
            return Err(rejected(
                "set_client_and_add_order",
                RegistryError::DuplicateOrder(order.id()),
            ));
        }
        if !edited.owns(&order.id()) {
            return Err(rejected(
                "set_client_and_add_order",
                StoreError::OrderOwnerNotFound(order.id()),
            ));
        }

        let previous = self
            .registry
            .replace(target, edited)
            .map_err(|e| rejected("set_client_and_add_order", e))?;
        if let Some(stored) = self
            .registry
            .get(&previous.id())
            .and_then(|client| client.order(&order.id()))
        {
            self.orders.sorted_insert(stored.clone());
        }
        self.reconcile(&previous);

        info!(order_id = %order.id(), size = self.orders.len(), "Order added");
        Ok(())
    }

    /// Replaces `target` with `edited` and drops `order` from the index.
    /// Fails unless `target` currently owns `order`.
    pub fn set_client_and_delete_order(
        &mut self,
        target: &Client,
        edited: Client,
        order: &Order,
    ) -> StoreResult<()> {
        debug!(client = %target.name(), order_id = %order.id(), "set_client_and_delete_order");
        if !self.is_owned_by(&order.id(), target) {
            return Err(rejected(
                "set_client_and_delete_order",
                StoreError::OrderOwnerNotFound(order.id()),
            ));
        }

        let previous = self
            .registry
            .replace(target, edited)
            .map_err(|e| rejected("set_client_and_delete_order", e))?;
        // An order still embedded in some client must stay indexed.
        if self.registry.owner_of(&order.id()).is_none() {
            self.orders.remove(order);
        }
        self.reconcile(&previous);

        info!(order_id = %order.id(), size = self.orders.len(), "Order deleted");
        Ok(())
    }

    /// Replaces `target` with `edited`, which must own `new_order`, and swaps
    /// `old_order` for `new_order` in the index. `target` must currently own
    /// `old_order`.
    pub fn set_client_and_edit_order(
        &mut self,
        target: &Client,
        edited: Client,
        old_order: &Order,
        new_order: &Order,
    ) -> StoreResult<()> {
        debug!(
            client = %target.name(),
            order_id = %old_order.id(),
            "set_client_and_edit_order"
        );
        if !self.orders.contains(&old_order.id()) {
            return Err(rejected(
                "set_client_and_edit_order",
                StoreError::OrderNotFound(old_order.id()),
            ));
        }
        if !self.is_owned_by(&old_order.id(), target) {
            return Err(rejected(
                "set_client_and_edit_order",
                StoreError::OrderOwnerNotFound(old_order.id()),
            ));
        }
        if !edited.owns(&new_order.id()) {
            return Err(rejected(
                "set_client_and_edit_order",
                StoreError::OrderOwnerNotFound(new_order.id()),
            ));
        }
        if new_order.id() != old_order.id() && self.orders.contains(&new_order.id()) {
            return Err(rejected(
                "set_client_and_edit_order",
                RegistryError::DuplicateOrder(new_order.id()),
            ));
        }

        let previous = self
            .registry
            .replace(target, edited)
            .map_err(|e| rejected("set_client_and_edit_order", e))?;
        if let Some(stored) = self
            .registry
            .get(&previous.id())
            .and_then(|client| client.order(&new_order.id()))
        {
            self.orders.replace(old_order, stored.clone());
        }
        self.reconcile(&previous);

        info!(order_id = %new_order.id(), "Order edited");
        Ok(())
    }

    /// Replaces the whole client book and rebuilds the index.
    pub fn replace_all(&mut self, clients: Vec<Client>) -> StoreResult<()> {
        debug!(size = clients.len(), "replace_all");
        self.registry
            .replace_all(clients, &mut self.orders)
            .map_err(|e| rejected("replace_all", e))?;
        self.client_display = None;

        info!(size = self.registry.len(), orders = self.orders.len(), "Client book replaced");
        debug_assert!(self.is_consistent());
        Ok(())
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            clients: self.registry.as_slice().to_vec(),
        }
    }

    pub fn restore(&mut self, snapshot: StoreSnapshot) -> StoreResult<()> {
        self.replace_all(snapshot.clients)
    }

    /// Canonical clients in insertion order.
    pub fn clients(&self) -> &[Client] {
        self.registry.as_slice()
    }

    /// Every order, sorted by deadline.
    pub fn orders(&self) -> &[Order] {
        self.orders.as_slice()
    }

    pub fn client(&self, id: &ClientId) -> Option<&Client> {
        self.registry.get(id)
    }

    pub fn order(&self, id: &OrderId) -> Option<&Order> {
        self.orders.get(id)
    }

    pub fn owner_of(&self, order_id: &OrderId) -> Option<&Client> {
        self.registry.owner_of(order_id)
    }

    pub fn filtered_clients(&self) -> FilteredView<'_, Client> {
        let items = match &self.client_display {
            None => self
                .registry
                .iter()
                .filter(|&client| (self.client_filter)(client))
                .collect(),
            Some(keys) => {
                let by_key: HashMap<ClientId, &Client> =
                    self.registry.iter().map(|client| (client.id(), client)).collect();
                keys.iter()
                    .filter_map(|id| by_key.get(id).copied())
                    .filter(|&client| (self.client_filter)(client))
                    .collect()
            }
        };
        FilteredView::new(items)
    }

    pub fn filtered_orders(&self) -> FilteredView<'_, Order> {
        FilteredView::new(
            self.orders
                .iter()
                .filter(|&order| (self.order_filter)(order))
                .collect(),
        )
    }

    /// Sets the active client filter and drops any display ordering.
    pub fn update_client_filter(
        &mut self,
        predicate: impl Fn(&Client) -> bool + Send + Sync + 'static,
    ) {
        self.set_client_filter(Arc::new(predicate));
    }

    pub fn update_order_filter(
        &mut self,
        predicate: impl Fn(&Order) -> bool + Send + Sync + 'static,
    ) {
        self.set_order_filter(Arc::new(predicate));
    }

    /// Installs an already shared client filter.
    pub fn set_client_filter(&mut self, predicate: Predicate<Client>) {
        self.client_filter = predicate;
        self.client_display = None;
    }

    pub fn set_order_filter(&mut self, predicate: Predicate<Order>) {
        self.order_filter = predicate;
    }

    pub fn reset_client_filter(&mut self) {
        self.set_client_filter(show_all());
    }

    pub fn reset_order_filter(&mut self) {
        self.set_order_filter(show_all());
    }

    pub fn filtered_clients_matching(
        &mut self,
        predicate: impl Fn(&Client) -> bool + Send + Sync + 'static,
    ) -> FilteredView<'_, Client> {
        self.update_client_filter(predicate);
        self.filtered_clients()
    }

    pub fn filtered_orders_matching(
        &mut self,
        predicate: impl Fn(&Order) -> bool + Send + Sync + 'static,
    ) -> FilteredView<'_, Order> {
        self.update_order_filter(predicate);
        self.filtered_orders()
    }

    /// Orders the visible clients by the first character of their name.
    ///
    /// Display only: the registry is untouched. The ordering is held by key,
    /// so edits stay visible and deleted clients drop out.
    pub fn sort_clients_by_first_letter(&mut self) {
        let mut visible: Vec<&Client> = self.filtered_clients().into_iter().collect();
        visible.sort_by_key(|client| client.name().first_letter());
        let keys: Vec<ClientId> = visible.into_iter().map(Client::id).collect();

        info!(size = keys.len(), "Clients sorted by first letter");
        self.client_display = Some(keys);
    }

    /// Client at a zero-based position in the current client view.
    pub fn client_at(&self, index: usize) -> StoreResult<&Client> {
        self.filtered_clients()
            .get(index)
            .ok_or(StoreError::InvalidIndex { kind: "client", index })
    }

    /// Order at a zero-based position in the current order view.
    pub fn order_at(&self, index: usize) -> StoreResult<&Order> {
        self.filtered_orders()
            .get(index)
            .ok_or(StoreError::InvalidIndex { kind: "order", index })
    }

    /// Adds `order` to the client stored under `client_id`.
    pub fn add_order(&mut self, client_id: &ClientId, order: Order) -> StoreResult<()> {
        let target = self
            .registry
            .get(client_id)
            .cloned()
            .ok_or_else(|| rejected("add_order", RegistryError::NotFound(*client_id)))?;
        let edited = target.with_added_order(order.clone());
        self.set_client_and_add_order(&target, edited, &order)?;
        self.reset_order_filter();
        Ok(())
    }

    /// Deletes the order stored under `order_id` from its owner.
    pub fn delete_order(&mut self, order_id: &OrderId) -> StoreResult<Order> {
        let order = self
            .orders
            .get(order_id)
            .cloned()
            .ok_or_else(|| rejected("delete_order", StoreError::OrderNotFound(*order_id)))?;
        let owner = self
            .registry
            .owner_of(order_id)
            .cloned()
            .ok_or_else(|| rejected("delete_order", StoreError::OrderOwnerNotFound(*order_id)))?;
        let edited = owner.without_order(order_id);
        self.set_client_and_delete_order(&owner, edited, &order)?;
        self.reset_order_filter();
        Ok(order)
    }

    /// Replaces the order stored under `order_id` with `edited_order`, keeping
    /// the owner.
    pub fn edit_order(&mut self, order_id: &OrderId, edited_order: Order) -> StoreResult<()> {
        let old = self
            .orders
            .get(order_id)
            .cloned()
            .ok_or_else(|| rejected("edit_order", StoreError::OrderNotFound(*order_id)))?;
        let owner = self
            .registry
            .owner_of(order_id)
            .cloned()
            .ok_or_else(|| rejected("edit_order", StoreError::OrderOwnerNotFound(*order_id)))?;
        let edited = owner.with_replaced_order(order_id, edited_order.clone());
        self.set_client_and_edit_order(&owner, edited, &old, &edited_order)
    }

    /// Checks the cross-collection invariants.
    pub fn is_consistent(&self) -> bool {
        let embedded: HashMap<OrderId, &Order> = self
            .registry
            .iter()
            .flat_map(|client| client.orders().map(|order| (order.id(), order)))
            .collect();
        let total: usize = self.registry.iter().map(Client::order_count).sum();

        total == embedded.len()
            && embedded.len() == self.orders.len()
            && self
                .orders
                .iter()
                .all(|order| embedded.get(&order.id()) == Some(&order))
            && self.orders.is_sorted()
    }

    fn is_owned_by(&self, order_id: &OrderId, client: &Client) -> bool {
        self.registry.owner_of(order_id).map(Client::id) == Some(client.id())
    }

    fn reconcile(&mut self, previous: &Client) {
        if let Some(installed) = self.registry.get(&previous.id()) {
            self.orders.reconcile(previous, installed);
        }
        debug_assert!(self.is_consistent());
    }
}
