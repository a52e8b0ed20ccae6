//! Booking commands.
//!
//! State-dependent actions load the order first and check the transition
//! locally, so an obviously invalid request never reaches the server.

use bookit_core::{CardDetails, NewOrder, Order, OrderStatus};
use chrono::{DateTime, Utc};

use crate::commands::require_session;
use crate::error::ClientResult;
use crate::App;

pub async fn list(app: &App, status: Option<OrderStatus>) -> ClientResult<()> {
    require_session(app).await?;
    let orders = app.api.orders().list(status).await?;
    if orders.is_empty() {
        println!("No orders");
    }
    for order in &orders {
        let due = order
            .amount_due()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<12} {:<12} {:<24} {due}",
            order.id, order.status, order.supplier_name
        );
    }
    Ok(())
}

pub async fn show(app: &App, id: &str) -> ClientResult<()> {
    require_session(app).await?;
    let order = app.api.orders().get(id).await?;
    print_order(&order);
    Ok(())
}

pub async fn book(
    app: &App,
    supplier_id: &str,
    description: &str,
    address: Option<String>,
    scheduled_at: Option<DateTime<Utc>>,
) -> ClientResult<()> {
    require_session(app).await?;
    let order = app
        .api
        .orders()
        .create(&NewOrder {
            supplier_id: supplier_id.to_string(),
            description: description.trim().to_string(),
            address,
            scheduled_at,
        })
        .await?;
    println!("Booked {} with {} ({})", order.id, order.supplier_name, order.status);
    Ok(())
}

pub async fn cancel(app: &App, id: &str) -> ClientResult<()> {
    require_session(app).await?;
    let orders = app.api.orders();
    orders.get(id).await?.ensure_can_cancel()?;
    let order = orders.cancel(id).await?;
    println!("Order {} is now {}", order.id, order.status);
    Ok(())
}

pub async fn decide_quote(app: &App, id: &str, accept: bool) -> ClientResult<()> {
    require_session(app).await?;
    let orders = app.api.orders();
    let current = orders.get(id).await?;
    current.ensure_awaits_quote_decision()?;
    if let Some(quote) = &current.quote {
        quote.ensure_consistent()?;
    }

    let order = if accept {
        orders.accept_quote(id).await?
    } else {
        orders.reject_quote(id).await?
    };
    println!(
        "Quote {} for order {} (order is now {})",
        if accept { "accepted" } else { "rejected" },
        order.id,
        order.status
    );
    Ok(())
}

pub async fn pay(app: &App, id: &str, card: CardDetails) -> ClientResult<()> {
    require_session(app).await?;
    let order = app.api.orders().get(id).await?;
    order.ensure_payable()?;

    let payment = app.api.payments().pay(id, &card).await?;
    println!(
        "Paid {} with {} •••• {} ({:?})",
        payment.amount(),
        payment.card_brand,
        payment.card_last4,
        payment.status
    );
    Ok(())
}

fn print_order(order: &Order) {
    println!("order     {}", order.id);
    println!("supplier  {} ({})", order.supplier_name, order.supplier_id);
    println!("status    {}", order.status);
    println!("details   {}", order.description);
    if let Some(address) = &order.address {
        println!("address   {address}");
    }
    if let Some(at) = order.scheduled_at {
        println!("when      {}", at.format("%Y-%m-%d %H:%M UTC"));
    }

    let Some(quote) = &order.quote else {
        return;
    };
    println!("quote     {:?}", quote.status);
    for item in &quote.line_items {
        println!(
            "  {:>3} × {:<28} {:>10}",
            item.quantity,
            item.description,
            item.line_total().to_string()
        );
    }
    println!("  subtotal {:>35}", quote.computed_subtotal().to_string());
    println!("  tax      {:>35}", quote.computed_tax().to_string());
    println!("  total    {:>35}", quote.total().to_string());
    if order.status == OrderStatus::Quoted {
        println!("accept or reject with `bookit orders accept-quote {}`", order.id);
    }
}
