//! Favorites commands.

use crate::commands::require_session;
use crate::error::ClientResult;
use crate::App;

/// Lists favorited suppliers with their names.
pub async fn list(app: &App) -> ClientResult<()> {
    require_session(app).await?;
    let suppliers = app.api.favorites().list_suppliers().await?;
    if suppliers.is_empty() {
        println!("No favorites yet");
    }
    for supplier in suppliers {
        println!("♥ {:<12} {}", supplier.id, supplier.name);
    }
    Ok(())
}

pub async fn toggle(app: &App, supplier_id: &str) -> ClientResult<()> {
    require_session(app).await?;
    app.favorites.refresh_if_stale().await;

    if app.favorites.toggle(supplier_id).await? {
        println!("♥ {supplier_id} added to favorites");
    } else {
        println!("  {supplier_id} removed from favorites");
    }
    Ok(())
}
