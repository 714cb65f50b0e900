//! Flattened, deadline-sorted view of every order in the store.
//!
//! # Invariants
//! - Orders are non-decreasing by deadline after every public mutation.
//! - Sorting is stable: orders with equal deadlines keep their relative order.
//! - At most one entry per [`OrderId`].

use crate::model::{Client, Order, OrderId};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderIndex {
    orders: Vec<Order>,
}

impl OrderIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts after every order due at or before `order`.
    pub fn sorted_insert(&mut self, order: Order) {
        let at = self
            .orders
            .partition_point(|existing| existing.deadline() <= order.deadline());
        self.orders.insert(at, order);
    }

    /// Removes the entry that is the same order as `order`. Returns whether
    /// anything was removed.
    pub fn remove(&mut self, order: &Order) -> bool {
        match self.position(&order.id()) {
            Some(pos) => {
                self.orders.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Removes every listed order; returns how many were present.
    pub fn remove_all<'a>(&mut self, orders: impl IntoIterator<Item = &'a Order>) -> usize {
        let doomed: HashSet<OrderId> = orders.into_iter().map(Order::id).collect();
        let before = self.orders.len();
        self.orders.retain(|order| !doomed.contains(&order.id()));
        before - self.orders.len()
    }

    /// Puts `new` at `old`'s position and re-sorts, since the deadline may
    /// have moved. Returns `false` and leaves the index alone if `old` is
    /// absent.
    pub fn replace(&mut self, old: &Order, new: Order) -> bool {
        let Some(pos) = self.position(&old.id()) else {
            return false;
        };
        self.orders[pos] = new;
        self.sort();
        true
    }

    /// Flattens every client's orders, registry order first, then sorts.
    pub fn rebuild<'a>(&mut self, clients: impl IntoIterator<Item = &'a Client>) {
        self.orders = clients
            .into_iter()
            .flat_map(|client| client.orders().cloned())
            .collect();
        self.sort();
    }

    /// Brings the index in line with a client whose embedded set changed from
    /// `old`'s to `new`'s. Entries already matching `new` are left in place.
    pub fn reconcile(&mut self, old: &Client, new: &Client) {
        for order in old.orders() {
            if !new.owns(&order.id()) {
                self.remove(order);
            }
        }
        for order in new.orders() {
            match self.position(&order.id()) {
                Some(pos) if self.orders[pos] == *order => {}
                Some(_) => {
                    self.replace(order, order.clone());
                }
                None => self.sorted_insert(order.clone()),
            }
        }
    }

    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| order.id() == *id)
    }

    pub fn contains(&self, id: &OrderId) -> bool {
        self.position(id).is_some()
    }

    pub fn as_slice(&self) -> &[Order] {
        &self.orders
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Order> {
        self.orders.iter()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn is_sorted(&self) -> bool {
        self.orders
            .windows(2)
            .all(|pair| pair[0].deadline() <= pair[1].deadline())
    }

    fn position(&self, id: &OrderId) -> Option<usize> {
        self.orders.iter().position(|order| order.id() == *id)
    }

    fn sort(&mut self) {
        self.orders.sort_by_key(Order::deadline);
    }
}

impl<'a> IntoIterator for &'a OrderIndex {
    type Item = &'a Order;
    type IntoIter = std::slice::Iter<'a, Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.orders.iter()
    }
}
