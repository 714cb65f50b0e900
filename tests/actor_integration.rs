use clientbook::lifecycle::{StoreSystem, SystemConfig};
use clientbook::model::{
    Address, Amount, Client, Deadline, Email, Name, Order, OrderDate, OrderId, Phone, Remark,
    Status,
};
use clientbook::sample::sample_store;
use clientbook::store::{Store, StoreError};
use std::sync::Arc;

fn order(deadline: &str) -> Order {
    Order::new(
        OrderDate::new("01-01-2024 09:00").unwrap(),
        Deadline::new(deadline).unwrap(),
        Amount::new("10.00").unwrap(),
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
        [],
        [],
    )
}

/// Full end-to-end run of the add / duplicate / compound add / cascade flow
/// through the store actor.
#[tokio::test]
async fn test_scenario_through_actor() {
    let system = StoreSystem::new(Store::new());

    let o1 = order("01-03-2024 00:00");
    let alice = client("Alice", "111").with_added_order(o1.clone());
    system
        .client
        .add_client(alice.clone())
        .await
        .expect("Failed to add client");

    let err = system
        .client
        .add_client(client("Alice", "111"))
        .await
        .unwrap_err();
    assert!(err.is_duplicate());

    let o2 = order("01-01-2024 00:00");
    let alice_prime = alice.with_added_order(o2.clone());
    system
        .client
        .set_client_and_add_order(alice.clone(), alice_prime.clone(), o2.clone())
        .await
        .expect("Failed to add order");

    let ids: Vec<OrderId> = system
        .client
        .orders()
        .await
        .unwrap()
        .iter()
        .map(Order::id)
        .collect();
    assert_eq!(ids, [o2.id(), o1.id()]);

    system
        .client
        .delete_client(alice_prime)
        .await
        .expect("Failed to delete client");
    assert!(system.client.orders().await.unwrap().is_empty());

    let store = system.shutdown().await.unwrap();
    assert!(store.clients().is_empty());
}

/// Several tasks add and delete orders at once; every observed index is
/// consistent with the client book and the final store is intact.
#[tokio::test]
async fn test_concurrent_writers_never_see_partial_updates() {
    let system = StoreSystem::with_config(Store::new(), SystemConfig { buffer_size: 2 });
    let owners: Vec<Client> = (0..4)
        .map(|i| client(&format!("Client {i}"), &format!("55500{i}")))
        .collect();
    for owner in &owners {
        system.client.add_client(owner.clone()).await.unwrap();
    }

    let mut tasks = Vec::new();
    for (i, owner) in owners.iter().enumerate() {
        let handle = system.client.clone();
        let owner_id = owner.id();
        tasks.push(tokio::spawn(async move {
            for round in 0..10 {
                let o = order(&format!("{:02}-0{}-2024 12:00", round + 1, i + 1));
                handle.add_order(owner_id, o.clone()).await?;
                if round % 2 == 0 {
                    handle.delete_order(o.id()).await?;
                }

                let snapshot = handle.snapshot().await?;
                assert!(Store::from_snapshot(snapshot)?.is_consistent());
                let orders = handle.orders().await?;
                assert!(orders.windows(2).all(|w| w[0].deadline() <= w[1].deadline()));
            }
            Ok::<_, StoreError>(())
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let store = system.shutdown().await.unwrap();
    assert!(store.is_consistent());
    assert_eq!(store.orders().len(), 4 * 5);
    for owner in &owners {
        assert_eq!(store.client(&owner.id()).unwrap().order_count(), 5);
    }
}

#[tokio::test]
async fn test_filters_and_sort_through_actor() {
    let system = StoreSystem::new(sample_store().unwrap());
    system.client.add_client(client("bert", "222")).await.unwrap();
    system.client.add_client(client("Amy", "333")).await.unwrap();

    system.client.sort_clients_by_first_letter().await.unwrap();
    let names: Vec<String> = system
        .client
        .filtered_clients()
        .await
        .unwrap()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    assert_eq!(names, ["Alex Yeoh", "Amy", "bert"]);

    system
        .client
        .update_client_filter(Arc::new(|c: &Client| c.order_count() > 0))
        .await
        .unwrap();
    let shown = system.client.filtered_clients().await.unwrap();
    assert_eq!(shown.len(), 1);
    assert_eq!(system.client.client_at(0).await.unwrap(), shown[0]);

    let err = system.client.client_at(5).await.unwrap_err();
    assert!(err.is_not_found());

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_order_workflows_through_actor() {
    let system = StoreSystem::new(Store::new());
    let alice = client("Alice", "111");
    system.client.add_client(alice.clone()).await.unwrap();

    let o = order("01-03-2024 00:00");
    system.client.add_order(alice.id(), o.clone()).await.unwrap();
    system
        .client
        .edit_order(o.id(), o.with_status(Status::Completed))
        .await
        .unwrap();
    assert_eq!(
        system.client.order_at(0).await.unwrap().status(),
        Status::Completed
    );

    let removed = system.client.delete_order(o.id()).await.unwrap();
    assert_eq!(removed.id(), o.id());
    assert_eq!(
        system.client.delete_order(o.id()).await,
        Err(StoreError::OrderNotFound(o.id()))
    );

    let snapshot = system.client.snapshot().await.unwrap();
    assert_eq!(snapshot.clients[0].order_count(), 0);
    system.shutdown().await.unwrap();
}
