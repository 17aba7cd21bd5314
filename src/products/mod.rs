//! Catalog endpoints

mod types;

use crate::error::Result;
use crate::fetch::ApiClient;
use crate::pagination::{Page, PageResponse};

pub use types::*;

/// Page size used by keyword search
pub const SEARCH_PAGE_SIZE: u32 = 12;

/// Client for the `/products` resource
#[derive(Clone)]
pub struct ProductClient {
    api: ApiClient,
}

impl ProductClient {
    /// Create a new product client on top of the gateway
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// List the catalog, paged and sorted
    pub async fn list(&self, query: &ProductQuery) -> Result<Page<Product>> {
        let response: PageResponse<Product> = self
            .api
            .get("/products")
            .query("page", query.page)
            .query("size", query.size)
            .query("sortBy", &query.sort_by)
            .query("sortDir", query.sort_dir.as_str())
            .execute()
            .await?;
        Ok(response.into())
    }

    /// Fetch one product
    pub async fn get(&self, id: i64) -> Result<Product> {
        self.api.get(&format!("/products/{}", id)).execute().await
    }

    /// Keyword search
    pub async fn search(&self, keyword: &str, page: u32, size: u32) -> Result<Page<Product>> {
        let response: PageResponse<Product> = self
            .api
            .get("/products/search")
            .query("keyword", keyword)
            .query("page", page)
            .query("size", size)
            .execute()
            .await?;
        Ok(response.into())
    }

    /// Products in one category
    pub async fn by_category(&self, category: &str) -> Result<Page<Product>> {
        let path = format!("/products/category/{}", urlencoding::encode(category));
        let response: PageResponse<Product> = self.api.get(&path).execute().await?;
        Ok(response.into())
    }

    /// Products of one brand
    pub async fn by_brand(&self, brand: &str) -> Result<Page<Product>> {
        let path = format!("/products/brand/{}", urlencoding::encode(brand));
        let response: PageResponse<Product> = self.api.get(&path).execute().await?;
        Ok(response.into())
    }

    /// Products with stock left
    pub async fn available(&self) -> Result<Page<Product>> {
        let response: PageResponse<Product> =
            self.api.get("/products/available").execute().await?;
        Ok(response.into())
    }

    /// Distinct category names
    pub async fn categories(&self) -> Result<Vec<String>> {
        self.api.get("/products/categories").execute().await
    }

    /// Distinct brand names
    pub async fn brands(&self) -> Result<Vec<String>> {
        self.api.get("/products/brands").execute().await
    }

    /// Create a product (administrative)
    pub async fn create(&self, product: &ProductInput) -> Result<Product> {
        self.api.post("/products").json(product)?.execute().await
    }

    /// Replace a product (administrative)
    pub async fn update(&self, id: i64, product: &ProductInput) -> Result<Product> {
        self.api
            .put(&format!("/products/{}", id))
            .json(product)?
            .execute()
            .await
    }

    /// Delete a product (administrative)
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.api
            .delete(&format!("/products/{}", id))
            .execute_empty()
            .await
    }
}
