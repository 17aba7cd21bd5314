#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use storefront_client::auth::User;
use storefront_client::config::ClientOptions;
use storefront_client::navigation::Navigator;
use storefront_client::storage::{MemoryStorage, TokenStorage};
use storefront_client::Storefront;
use tokio::sync::watch;
use wiremock::MockServer;

/// Navigator that remembers every requested route
#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_string());
    }
}

pub struct TestContext {
    pub storefront: Storefront,
    pub storage: Arc<MemoryStorage>,
    pub navigator: Arc<RecordingNavigator>,
}

/// Storefront pointed at `{server}/api`
pub fn setup(server: &MockServer) -> TestContext {
    setup_with_timeout(server, Duration::from_secs(5))
}

pub fn setup_with_timeout(server: &MockServer, timeout: Duration) -> TestContext {
    let options = ClientOptions::default()
        .with_base_url(&format!("{}/api", server.uri()))
        .with_request_timeout(timeout);
    let storage = Arc::new(MemoryStorage::new());
    let navigator = Arc::new(RecordingNavigator::default());

    let storefront = Storefront::new_with(
        options,
        Arc::clone(&storage) as Arc<dyn TokenStorage>,
        Arc::clone(&navigator) as Arc<dyn Navigator>,
    )
    .expect("client should build");

    TestContext {
        storefront,
        storage,
        navigator,
    }
}

pub fn user_json(id: i64) -> Value {
    json!({
        "id": id,
        "name": format!("User {}", id),
        "email": format!("user{}@example.com", id),
        "provider": "GITHUB"
    })
}

pub fn user(id: i64) -> User {
    serde_json::from_value(user_json(id)).unwrap()
}

pub fn product_json(id: i64, price: u32) -> Value {
    json!({
        "id": id,
        "name": format!("Product {}", id),
        "description": "",
        "price": price,
        "category": "Mugs",
        "brand": "Acme",
        "stockQuantity": 10
    })
}

/// Cart holding one line of product 5 at 10 per unit
pub fn cart_json(quantity: u32) -> Value {
    json!({
        "items": [{"id": 1, "product": product_json(5, 10), "quantity": quantity}],
        "totalPrice": 10 * quantity
    })
}

/// Wait until the store snapshot satisfies `pred`
pub async fn wait_for<T: Clone>(rx: &mut watch::Receiver<T>, mut pred: impl FnMut(&T) -> bool) -> T {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            {
                let state = rx.borrow_and_update();
                if pred(&state) {
                    return state.clone();
                }
            }
            rx.changed().await.expect("store dropped");
        }
    })
    .await
    .expect("timed out waiting for store state")
}
