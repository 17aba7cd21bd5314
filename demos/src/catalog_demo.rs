use dotenv::dotenv;
use storefront_client::prelude::*;
use storefront_client::products::{SortDirection, SEARCH_PAGE_SIZE};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Load STOREFRONT_API_URL and friends from .env
    dotenv().ok();
    pretty_env_logger::init();

    let storefront = Storefront::new(ClientOptions::from_env()?)?;
    let products = storefront.products();

    println!("Starting catalog demo");

    let query = ProductQuery::default().sorted_by("price", SortDirection::Desc);
    let page = products.list(&query).await?;
    println!(
        "Page {} of {} ({} products in total)",
        page.number + 1,
        page.total_pages.max(1),
        page.total_elements
    );
    for product in &page.content {
        println!("  #{} {} - {} ({} in stock)", product.id, product.name, product.price, product.stock_quantity);
    }

    let categories = products.categories().await?;
    println!("\nCategories: {}", categories.join(", "));

    if let Some(category) = categories.first() {
        let in_category = products.by_category(category).await?;
        println!("{} products in {}:", in_category.total_elements, category);
        for product in in_category.content.iter().take(5) {
            println!("  {}", product.name);
        }
    }

    let keyword = std::env::args().nth(1).unwrap_or_else(|| "shirt".to_string());
    let results = products.search(&keyword, 0, SEARCH_PAGE_SIZE).await?;
    println!("\nSearch for {:?}: {} hits", keyword, results.total_elements);

    Ok(())
}
