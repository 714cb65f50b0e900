//! Seed data used when no saved client book exists.

use crate::model::{
    Address, Amount, Client, Deadline, Email, Name, Order, OrderDate, OrderId, Phone, Remark,
    Status, Tag, ValidationError,
};
use crate::store::{Store, StoreResult};

pub fn sample_clients() -> Result<Vec<Client>, ValidationError> {
    let first_order = Order::with_id(
        "69c25c8d-9e34-4d9d-8bad-e378f203ae73".parse::<OrderId>()?,
        OrderDate::new("01-03-2024 23:59")?,
        Deadline::new("01-03-2024 23:59")?,
        Amount::new("50")?,
        Remark::new("No remark")?,
        Status::Canceled,
    );

    let alex = Client::new(
        Name::new("Alex Yeoh")?,
        Phone::new("87438807")?,
        Email::new("alexyeoh@example.com")?,
        Address::new("Blk 30 Geylang Street 29, #06-40")?,
        tags(&["friends"])?,
        [first_order],
    );

    Ok(vec![alex])
}

/// A store holding [`sample_clients`].
pub fn sample_store() -> StoreResult<Store> {
    let mut store = Store::new();
    store.replace_all(sample_clients()?)?;
    Ok(store)
}

fn tags(names: &[&str]) -> Result<Vec<Tag>, ValidationError> {
    names.iter().map(|name| Tag::new(*name)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_store_is_consistent() {
        let store = sample_store().unwrap();
        assert_eq!(store.clients().len(), 1);
        assert_eq!(store.orders().len(), 1);
        assert!(store.is_consistent());

        let order = &store.orders()[0];
        assert_eq!(order.id().to_string(), "69c25c8d-9e34-4d9d-8bad-e378f203ae73");
        assert_eq!(order.status(), Status::Canceled);
        assert_eq!(order.owner(), Some(store.clients()[0].id()));
    }
}
