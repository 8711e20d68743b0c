use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};
use uuid::Uuid;

use super::{AppConfig, SeedData, SystemError};
use crate::actor_framework::ResourceActor;
use crate::auth::{AuthGate, JwtAuth};
use crate::clients::{OrderClient, PaymentClient, ProductClient, UserClient};
use crate::domain::{Order, Product, User};
use crate::http::AppState;
use crate::payment::{Mailer, PaymentProcessor, ReceiptNotifier};

/// The running store: one actor per record kind plus the clients wired over them.
///
/// Responsible for starting up actors, wiring them together, and handling shutdown.
pub struct StoreSystem {
    pub user_client: UserClient,
    pub product_client: ProductClient,
    pub order_client: OrderClient,
    pub payment_client: PaymentClient,
    pub gate: AuthGate,
    handles: Vec<JoinHandle<()>>,
}

impl StoreSystem {
    /// Spawns the actors, preloaded from `seed`, and wires the clients.
    ///
    /// The processor and mailer are passed in so tests can substitute fakes.
    pub fn start(
        config: &AppConfig,
        seed: SeedData,
        processor: Arc<dyn PaymentProcessor>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let buffer = config.mailbox_size;

        // 1. Users
        let (mut user_actor, user_resource_client) = ResourceActor::<User>::new("users", buffer, Uuid::new_v4);
        user_actor.seed(seed.users);
        let user_client = UserClient::new(user_resource_client);
        let user_handle = tokio::spawn(user_actor.run());

        // 2. Catalog
        let (mut product_actor, product_resource_client) =
            ResourceActor::<Product>::new("products", buffer, Uuid::new_v4);
        product_actor.seed(seed.products);
        let product_client = ProductClient::new(product_resource_client);
        let product_handle = tokio::spawn(product_actor.run());

        // 3. Orders, reserving against the catalog
        let (order_actor, order_resource_client) = ResourceActor::<Order>::new("orders", buffer, Uuid::new_v4);
        let order_client = OrderClient::new(order_resource_client, product_client.clone(), config.cart_policy);
        let order_handle = tokio::spawn(order_actor.run());

        // 4. Payments and receipts
        let notifier = ReceiptNotifier::new(
            mailer,
            user_client.clone(),
            product_client.clone(),
            config.payment.shop_name.clone(),
        );
        let payment_client = PaymentClient::new(
            order_client.clone(),
            processor,
            notifier,
            config.payment.currency.clone(),
            config.payment.shop_name.clone(),
        );

        let gate = AuthGate::new(JwtAuth::new(config.auth.jwt_secret.as_bytes()), user_client.clone());

        info!(policy = ?config.cart_policy, mailbox = buffer, "Store system started");
        Self {
            user_client,
            product_client,
            order_client,
            payment_client,
            gate,
            handles: vec![user_handle, product_handle, order_handle],
        }
    }

    /// Handler state for the HTTP router.
    pub fn state(&self) -> AppState {
        AppState::new(self.order_client.clone(), self.payment_client.clone(), self.gate.clone())
    }

    /// Drops this system's clients and waits for the actors to drain.
    ///
    /// Actors only stop once every clone of their client is gone, so the
    /// server (and its `AppState`) must be shut down first.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");
        drop(self.payment_client);
        drop(self.gate);
        drop(self.order_client);
        drop(self.product_client);
        drop(self.user_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(SystemError::ActorTask(e.to_string()));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
