//! Demo: seeds the sample client book, runs a few compound edits through the
//! store actor and shuts down.

use clientbook::lifecycle::{setup_tracing, StoreSystem, SystemConfig};
use clientbook::model::{
    Address, Amount, Client, Deadline, Email, Name, Order, OrderDate, Phone, Remark, Status, Tag,
};
use clientbook::sample::sample_store;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let config = SystemConfig::from_env()?;
    info!(buffer_size = config.buffer_size, "Starting client book");

    let system = StoreSystem::with_config(sample_store()?, config);
    let client = system.client.clone();

    let alice = Client::new(
        Name::new("Alice Pauline")?,
        Phone::new("94351253")?,
        Email::new("alice@example.com")?,
        Address::new("123, Jurong West Ave 6, #08-111")?,
        [Tag::new("friends")?],
        [Order::new(
            OrderDate::now(),
            Deadline::new("01-03-2024 23:59")?,
            Amount::new("120.50")?,
            Remark::new("Birthday cake")?,
            Status::Pending,
        )],
    );

    let span = tracing::info_span!("client_creation");
    async {
        info!("Adding client");
        client.add_client(alice.clone()).await?;
        // A second add of the same client is rejected and changes nothing.
        if let Err(e) = client.add_client(alice.clone()).await {
            info!(error = %e, "Duplicate rejected");
        }
        Ok::<_, clientbook::store::StoreError>(())
    }
    .instrument(span)
    .await?;

    let rush = Order::new(
        OrderDate::now(),
        Deadline::new("01-01-2024 12:00")?,
        Amount::new("35")?,
        Remark::default(),
        Status::Pending,
    );

    let span = tracing::info_span!("order_processing");
    let result = async {
        client.add_order(alice.id(), rush.clone()).await?;
        client
            .edit_order(rush.id(), rush.with_status(Status::Completed))
            .await?;
        client.orders().await
    }
    .instrument(span)
    .await;

    match result {
        Ok(orders) => {
            for order in &orders {
                info!(
                    order_id = %order.id(),
                    deadline = %order.deadline(),
                    status = %order.status(),
                    "Order"
                );
            }
        }
        Err(e) => error!(error = %e, "Order processing failed"),
    }

    client.sort_clients_by_first_letter().await?;
    for shown in client.filtered_clients().await? {
        info!(client = %shown.name(), orders = shown.order_count(), "Client");
    }

    drop(client);
    let store = system.shutdown().await?;
    info!(
        clients = store.clients().len(),
        orders = store.orders().len(),
        "Application completed successfully"
    );
    Ok(())
}
