use crate::model::{Address, Email, Name, Order, OrderId, Phone, Tag};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use uuid::Uuid;

/// Stable surrogate key for a client.
///
/// Survives every edit of the client value; registry operations locate
/// clients by this key rather than by value equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(Uuid);

impl ClientId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ClientId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "client_{}", self.0)
    }
}

/// A contact record together with the orders it owns.
///
/// Clients are immutable values: every `with_*` method returns a new client
/// with the same [`ClientId`]. Orders inside a client always carry that key
/// as their owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ClientRecord", into = "ClientRecord")]
pub struct Client {
    id: ClientId,
    name: Name,
    phone: Phone,
    email: Email,
    address: Address,
    tags: BTreeSet<Tag>,
    orders: BTreeMap<OrderId, Order>,
}

impl Client {
    /// Creates a client with a freshly generated key.
    pub fn new(
        name: Name,
        phone: Phone,
        email: Email,
        address: Address,
        tags: impl IntoIterator<Item = Tag>,
        orders: impl IntoIterator<Item = Order>,
    ) -> Self {
        Self::with_id(ClientId::new(), name, phone, email, address, tags, orders)
    }

    /// Creates a client with a caller-provided key.
    ///
    /// Orders sharing an identifier collapse to the last one given.
    pub fn with_id(
        id: ClientId,
        name: Name,
        phone: Phone,
        email: Email,
        address: Address,
        tags: impl IntoIterator<Item = Tag>,
        orders: impl IntoIterator<Item = Order>,
    ) -> Self {
        Self {
            id,
            name,
            phone,
            email,
            address,
            tags: tags.into_iter().collect(),
            orders: orders
                .into_iter()
                .map(|order| (order.id(), order.owned_by(id)))
                .collect(),
        }
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn phone(&self) -> &Phone {
        &self.phone
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    /// Embedded orders, ordered by identifier.
    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }

    pub fn order(&self, id: &OrderId) -> Option<&Order> {
        self.orders.get(id)
    }

    pub fn owns(&self, id: &OrderId) -> bool {
        self.orders.contains_key(id)
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Identity check: name, phone, email and address all match.
    ///
    /// Weaker than `==`, which also compares key, tags and orders.
    pub fn is_same_client(&self, other: &Client) -> bool {
        self.name == other.name
            && self.phone == other.phone
            && self.email == other.email
            && self.address == other.address
    }

    pub fn with_name(&self, name: Name) -> Self {
        Self { name, ..self.clone() }
    }

    pub fn with_phone(&self, phone: Phone) -> Self {
        Self { phone, ..self.clone() }
    }

    pub fn with_email(&self, email: Email) -> Self {
        Self { email, ..self.clone() }
    }

    pub fn with_address(&self, address: Address) -> Self {
        Self { address, ..self.clone() }
    }

    pub fn with_tags(&self, tags: impl IntoIterator<Item = Tag>) -> Self {
        Self {
            tags: tags.into_iter().collect(),
            ..self.clone()
        }
    }

    /// Replaces the whole order set.
    pub fn with_orders(&self, orders: impl IntoIterator<Item = Order>) -> Self {
        Self::with_id(
            self.id,
            self.name.clone(),
            self.phone.clone(),
            self.email.clone(),
            self.address.clone(),
            self.tags.iter().cloned(),
            orders,
        )
    }

    /// Adds `order`, or replaces the embedded order with the same identifier.
    pub fn with_added_order(&self, order: Order) -> Self {
        let mut next = self.clone();
        next.orders.insert(order.id(), order.owned_by(self.id));
        next
    }

    pub fn without_order(&self, id: &OrderId) -> Self {
        let mut next = self.clone();
        next.orders.remove(id);
        next
    }

    /// Swaps the order `old` for `new`; `new` may carry a different identifier.
    pub fn with_replaced_order(&self, old: &OrderId, new: Order) -> Self {
        self.without_order(old).with_added_order(new)
    }

    /// The same client under another key, with its orders restamped.
    pub(crate) fn rekeyed(self, id: ClientId) -> Self {
        if self.id == id {
            return self;
        }
        Self::with_id(
            id,
            self.name,
            self.phone,
            self.email,
            self.address,
            self.tags,
            self.orders.into_values(),
        )
    }
}

impl Display for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}; Phone: {}; Email: {}; Address: {}; Tags: ",
            self.name, self.phone, self.email, self.address
        )?;
        for tag in &self.tags {
            write!(f, "[{tag}]")?;
        }
        Ok(())
    }
}

/// Wire shape of a client. Deserializing goes through [`Client::with_id`] so
/// owner keys are restamped on the way in.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ClientRecord {
    id: ClientId,
    name: Name,
    phone: Phone,
    email: Email,
    address: Address,
    #[serde(default)]
    tags: Vec<Tag>,
    #[serde(default)]
    orders: Vec<Order>,
}

impl From<ClientRecord> for Client {
    fn from(record: ClientRecord) -> Self {
        Client::with_id(
            record.id,
            record.name,
            record.phone,
            record.email,
            record.address,
            record.tags,
            record.orders,
        )
    }
}

impl From<Client> for ClientRecord {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            name: client.name,
            phone: client.phone,
            email: client.email,
            address: client.address,
            tags: client.tags.into_iter().collect(),
            orders: client.orders.into_values().collect(),
        }
    }
}
