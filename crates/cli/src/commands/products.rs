//! Browse the catalog through the storefront API.

use emporium_core::{Product, ProductId};

use crate::client::{ApiClient, CatalogRequest};
use crate::error::CliError;

fn print_product_line(product: &Product) {
    let stock = if product.in_stock() {
        format!("{} in stock", product.stock)
    } else {
        "out of stock".to_owned()
    };
    #[allow(clippy::print_stdout)]
    {
        println!(
            "{:<36}  {:<32} {:>10}  {:<11}  {stock}",
            product.id,
            product.name,
            product.price.display(),
            product.category
        );
    }
}

/// Print one catalog page.
///
/// # Errors
///
/// Returns an error if the storefront is unreachable or rejects the query.
pub async fn list(client: &ApiClient, request: &CatalogRequest) -> Result<(), CliError> {
    let listing = client.catalog(request).await?;

    for product in &listing.products {
        print_product_line(product);
    }

    let categories: Vec<&str> = listing.categories.iter().map(|c| c.as_str()).collect();
    #[allow(clippy::print_stdout)]
    {
        if listing.products.is_empty() {
            println!("No products found");
        }
        println!(
            "Page {} of {} ({} products)",
            listing.current_page, listing.total_pages, listing.total_count
        );
        println!("Categories: {}", categories.join(", "));
    }
    Ok(())
}

/// Print a single product.
///
/// # Errors
///
/// Returns `CliError::NotFound` if the storefront does not know the id.
pub async fn show(client: &ApiClient, id: &ProductId) -> Result<(), CliError> {
    let product = client
        .product(id)
        .await?
        .ok_or_else(|| CliError::NotFound("Product not found".to_owned()))?;

    #[allow(clippy::print_stdout)]
    {
        println!("{}", product.name);
        println!("  id:          {}", product.id);
        println!("  price:       {}", product.price.display());
        println!("  category:    {}", product.category);
        println!("  stock:       {}", product.stock);
        println!("  image:       {}", product.primary_image());
        println!("  description: {}", product.description);
    }
    Ok(())
}
