use std::env;
use std::sync::Arc;
use std::time::Duration;

use dotenv::dotenv;
use storefront_client::auth::OAuthProvider;
use storefront_client::navigation::LogNavigator;
use storefront_client::prelude::*;
use storefront_client::storage::FileStorage;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    pretty_env_logger::init();

    let storage_path = env::var("STOREFRONT_STORAGE").unwrap_or_else(|_| ".storefront.json".to_string());
    let storage = Arc::new(FileStorage::open(&storage_path)?);

    let storefront = Storefront::new_with(ClientOptions::from_env()?, storage, Arc::new(LogNavigator))?;

    println!("Starting cart demo");

    let mut updates = storefront.cart().subscribe();
    let user = storefront.start().await;
    let Some(user) = user else {
        let url = storefront.auth().authorization_url(OAuthProvider::Github)?;
        println!("No active session. Sign in first: {}", url);
        return Ok(());
    };
    println!("Signed in as {} <{}>", user.name, user.email);

    // The session listener loads the cart once the session resolves
    let epoch = storefront.session().epoch();
    let loaded = updates.wait_for(|state| state.epoch == epoch && !state.loading);
    if tokio::time::timeout(Duration::from_secs(10), loaded).await.is_err() {
        log::warn!("Cart did not load within 10 seconds");
    }

    let store = storefront.cart();
    if let Some(error) = store.error() {
        println!("Cart could not be loaded: {}", error);
    }
    println!("Cart holds {} item(s), total {}", store.item_count(), store.cart().total_price);

    if let Some(product_id) = env::args().nth(1).and_then(|arg| arg.parse::<i64>().ok()) {
        let cart = store.add_item(product_id, 1).await?;
        println!("Added product {}; cart total is now {}", product_id, cart.total_price);

        for item in &cart.items {
            println!("  {} x {} = {}", item.quantity, item.product.name, item.subtotal());
        }
    }

    Ok(())
}
