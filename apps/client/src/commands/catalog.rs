//! Browsing commands.

use bookit_api::SupplierQuery;

use crate::error::ClientResult;
use crate::App;

pub async fn categories(app: &App) -> ClientResult<()> {
    let categories = app.api.categories().list().await?;
    if categories.is_empty() {
        println!("No categories");
    }
    for category in categories {
        println!("{:<16} {} ({} suppliers)", category.id, category.name, category.supplier_count);
    }
    Ok(())
}

pub async fn suppliers(
    app: &App,
    category: Option<String>,
    search: Option<String>,
    page: u32,
) -> ClientResult<()> {
    let query = SupplierQuery {
        category,
        search,
        page,
        ..SupplierQuery::default()
    };

    let suppliers = app.api.suppliers().list(&query).await?;
    app.favorites.refresh_if_stale().await;

    if suppliers.is_empty() {
        println!("No suppliers found");
    }
    for supplier in suppliers {
        let star = if app.favorites.is_favorite(&supplier.id).await { "♥" } else { " " };
        let verified = if supplier.verified { " ✓" } else { "" };
        println!(
            "{star} {:<12} {}{verified}  {:.1}★ ({} reviews)",
            supplier.id, supplier.name, supplier.rating, supplier.review_count
        );
    }
    Ok(())
}
