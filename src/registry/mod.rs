//! The ordered, identity-unique collection of clients.
//!
//! # Responsibility
//! - Hold clients in insertion order and reject identity duplicates.
//! - Provide the primitives the [`Store`](crate::store::Store) composes.
//! - Cascade client removal and bulk replacement into the companion
//!   [`OrderIndex`].
//!
//! # Invariants
//! - No two stored clients are [the same client](Client::is_same_client).
//! - No two stored clients share a [`ClientId`].
//! - No order identifier is embedded in more than one client.
//!
//! Lookup for `replace` and `remove` goes through the client key, not value
//! equality, so a target that was edited elsewhere is still found.

pub mod error;

pub use error::*;

use crate::model::{Client, ClientId, OrderId};
use crate::order_index::OrderIndex;
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientRegistry {
    clients: Vec<Client>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if some stored client is the same client as `client`.
    pub fn contains(&self, client: &Client) -> bool {
        self.clients.iter().any(|stored| stored.is_same_client(client))
    }

    /// Appends `client`, which must not already be present.
    pub fn add(&mut self, client: Client) -> RegistryResult<()> {
        if self.contains(&client) || self.position(&client.id()).is_some() {
            return Err(RegistryError::DuplicateEntity(client.name().to_string()));
        }
        if let Some(id) = client.orders().map(|o| o.id()).find(|id| self.owner_of(id).is_some()) {
            return Err(RegistryError::DuplicateOrder(id));
        }
        self.clients.push(client);
        Ok(())
    }

    /// Swaps the client stored under `target`'s key for `replacement` and
    /// returns the previous value.
    ///
    /// The replacement takes over the slot's key, so its embedded orders keep
    /// pointing at a live owner.
    pub fn replace(&mut self, target: &Client, replacement: Client) -> RegistryResult<Client> {
        let pos = self
            .position(&target.id())
            .ok_or(RegistryError::NotFound(target.id()))?;
        let replacement = replacement.rekeyed(target.id());

        let clash = self
            .clients
            .iter()
            .enumerate()
            .any(|(i, stored)| i != pos && stored.is_same_client(&replacement));
        if clash {
            return Err(RegistryError::DuplicateEntity(replacement.name().to_string()));
        }
        let stolen = replacement.orders().map(|o| o.id()).find(|id| {
            self.owner_of(id)
                .is_some_and(|owner| owner.id() != target.id())
        });
        if let Some(id) = stolen {
            return Err(RegistryError::DuplicateOrder(id));
        }

        Ok(std::mem::replace(&mut self.clients[pos], replacement))
    }

    /// Removes the client stored under `client`'s key and every order it
    /// owned from `orders`.
    pub fn remove(&mut self, client: &Client, orders: &mut OrderIndex) -> RegistryResult<Client> {
        let pos = self
            .position(&client.id())
            .ok_or(RegistryError::NotFound(client.id()))?;
        let removed = self.clients.remove(pos);
        orders.remove_all(removed.orders());
        Ok(removed)
    }

    /// Replaces the whole collection and rebuilds `orders` from it.
    pub fn replace_all(
        &mut self,
        clients: Vec<Client>,
        orders: &mut OrderIndex,
    ) -> RegistryResult<()> {
        for (i, first) in clients.iter().enumerate() {
            if let Some(second) = clients[i + 1..]
                .iter()
                .find(|second| first.is_same_client(second) || first.id() == second.id())
            {
                return Err(RegistryError::DuplicateEntity(second.name().to_string()));
            }
        }
        let mut seen = HashSet::new();
        for client in &clients {
            if let Some(id) = client.orders().map(|o| o.id()).find(|id| !seen.insert(*id)) {
                return Err(RegistryError::DuplicateOrder(id));
            }
        }

        self.clients = clients;
        orders.rebuild(&self.clients);
        Ok(())
    }

    pub fn get(&self, id: &ClientId) -> Option<&Client> {
        self.clients.iter().find(|client| client.id() == *id)
    }

    pub fn position(&self, id: &ClientId) -> Option<usize> {
        self.clients.iter().position(|client| client.id() == *id)
    }

    /// The client whose embedded set holds `order_id`, if any.
    pub fn owner_of(&self, order_id: &OrderId) -> Option<&Client> {
        self.clients.iter().find(|client| client.owns(order_id))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Client> {
        self.clients.iter()
    }

    pub fn as_slice(&self) -> &[Client] {
        &self.clients
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl<'a> IntoIterator for &'a ClientRegistry {
    type Item = &'a Client;
    type IntoIter = std::slice::Iter<'a, Client>;

    fn into_iter(self) -> Self::IntoIter {
        self.clients.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Address, Amount, Deadline, Email, Name, Order, OrderDate, Phone, Remark, Status, Tag,
    };

    fn order(deadline: &str) -> Order {
        Order::new(
            OrderDate::new("01-01-2024 09:00").unwrap(),
            Deadline::new(deadline).unwrap(),
            Amount::new("25.50").unwrap(),
            Remark::default(),
            Status::Pending,
        )
    }

    fn client(name: &str, phone: &str) -> Client {
        Client::new(
            Name::new(name).unwrap(),
            Phone::new(phone).unwrap(),
            Email::new("someone@example.com").unwrap(),
            Address::new("1 Main Street").unwrap(),
            [Tag::new("friends").unwrap()],
            [],
        )
    }

    #[test]
    fn add_rejects_same_client() {
        let mut registry = ClientRegistry::new();
        let alice = client("Alice", "111");
        registry.add(alice.clone()).unwrap();

        let twin = Client::new(
            alice.name().clone(),
            alice.phone().clone(),
            alice.email().clone(),
            alice.address().clone(),
            [],
            [order("01-03-2024 23:59")],
        );
        assert!(registry.contains(&twin));
        assert_eq!(
            registry.add(twin),
            Err(RegistryError::DuplicateEntity("Alice".to_string()))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn add_rejects_order_owned_elsewhere() {
        let mut registry = ClientRegistry::new();
        let shared = order("01-03-2024 23:59");
        registry.add(client("Alice", "111").with_added_order(shared.clone())).unwrap();

        let bob = client("Bob", "222").with_added_order(shared.clone());
        assert_eq!(registry.add(bob), Err(RegistryError::DuplicateOrder(shared.id())));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn add_keeps_insertion_order() {
        let mut registry = ClientRegistry::new();
        for (name, phone) in [("Charlie", "333"), ("Alice", "111"), ("Bob", "222")] {
            registry.add(client(name, phone)).unwrap();
        }
        let names: Vec<&str> = registry.iter().map(|c| c.name().as_str()).collect();
        assert_eq!(names, ["Charlie", "Alice", "Bob"]);
    }

    #[test]
    fn replace_finds_target_by_key_and_adopts_it() {
        let mut registry = ClientRegistry::new();
        let alice = client("Alice", "111");
        registry.add(alice.clone()).unwrap();

        let renamed = client("Alicia", "111");
        let previous = registry.replace(&alice, renamed).unwrap();
        assert_eq!(previous, alice);
        let stored = registry.get(&alice.id()).unwrap();
        assert_eq!(stored.name().as_str(), "Alicia");
    }

    #[test]
    fn replace_rejects_missing_target_and_identity_clash() {
        let mut registry = ClientRegistry::new();
        let alice = client("Alice", "111");
        let bob = client("Bob", "222");
        registry.add(alice.clone()).unwrap();
        registry.add(bob.clone()).unwrap();

        let stranger = client("Zed", "999");
        assert_eq!(
            registry.replace(&stranger, client("Zed", "998")),
            Err(RegistryError::NotFound(stranger.id()))
        );
        assert!(matches!(
            registry.replace(&alice, client("Bob", "222")),
            Err(RegistryError::DuplicateEntity(_))
        ));
        // Replacing a client with an edited version of itself is fine.
        assert!(registry.replace(&bob, bob.with_tags([])).is_ok());
    }

    #[test]
    fn replace_rejects_order_owned_elsewhere() {
        let mut registry = ClientRegistry::new();
        let shared = order("01-03-2024 23:59");
        let alice = client("Alice", "111").with_added_order(shared.clone());
        let bob = client("Bob", "222");
        registry.add(alice).unwrap();
        registry.add(bob.clone()).unwrap();

        assert_eq!(
            registry.replace(&bob, bob.with_added_order(shared.clone())),
            Err(RegistryError::DuplicateOrder(shared.id()))
        );
    }

    #[test]
    fn remove_cascades_to_orders() {
        let mut registry = ClientRegistry::new();
        let mut orders = OrderIndex::new();
        let alice = client("Alice", "111")
            .with_orders([order("01-03-2024 23:59"), order("01-04-2024 23:59")]);
        let bob = client("Bob", "222").with_orders([order("01-02-2024 23:59")]);
        registry.replace_all(vec![alice.clone(), bob.clone()], &mut orders).unwrap();
        assert_eq!(orders.len(), 3);

        registry.remove(&alice, &mut orders).unwrap();
        assert_eq!(orders.len(), 1);
        assert!(bob.orders().all(|o| orders.contains(&o.id())));
        assert_eq!(
            registry.remove(&alice, &mut orders),
            Err(RegistryError::NotFound(alice.id()))
        );
    }

    #[test]
    fn replace_all_rejects_duplicates_without_touching_state() {
        let mut registry = ClientRegistry::new();
        let mut orders = OrderIndex::new();
        let alice = client("Alice", "111").with_orders([order("01-03-2024 23:59")]);
        registry.replace_all(vec![alice.clone()], &mut orders).unwrap();

        let result =
            registry.replace_all(vec![client("Bob", "222"), client("Bob", "222")], &mut orders);
        assert!(matches!(result, Err(RegistryError::DuplicateEntity(_))));
        assert_eq!(registry.as_slice(), [alice]);
        assert_eq!(orders.len(), 1);
    }

    #[test]
    fn replace_all_rejects_shared_order_without_touching_state() {
        let mut registry = ClientRegistry::new();
        let mut orders = OrderIndex::new();
        let alice = client("Alice", "111").with_orders([order("01-03-2024 23:59")]);
        registry.replace_all(vec![alice.clone()], &mut orders).unwrap();

        let shared = order("01-04-2024 23:59");
        let result = registry.replace_all(
            vec![
                client("Bob", "222").with_added_order(shared.clone()),
                client("Carol", "333").with_added_order(shared.clone()),
            ],
            &mut orders,
        );
        assert_eq!(result, Err(RegistryError::DuplicateOrder(shared.id())));
        assert_eq!(registry.as_slice(), [alice]);
        assert_eq!(orders.len(), 1);
    }

    #[test]
    fn owner_of_scans_embedded_sets() {
        let mut registry = ClientRegistry::new();
        let o = order("01-03-2024 23:59");
        let alice = client("Alice", "111").with_added_order(o.clone());
        registry.add(alice.clone()).unwrap();
        assert_eq!(registry.owner_of(&o.id()).map(Client::id), Some(alice.id()));
        assert!(registry.owner_of(&order("01-03-2024 23:59").id()).is_none());
    }
}
