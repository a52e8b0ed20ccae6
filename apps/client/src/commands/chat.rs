//! Messaging commands.

use bookit_core::MessageSender;

use crate::commands::require_session;
use crate::error::ClientResult;
use crate::App;

pub async fn list(app: &App) -> ClientResult<()> {
    require_session(app).await?;
    let conversations = app.api.conversations().list().await?;
    if conversations.is_empty() {
        println!("No conversations");
    }
    for conversation in conversations {
        let badge = match conversation.unread_count {
            0 => String::new(),
            n => format!(" [{n}]"),
        };
        println!(
            "{:<12} {}{badge}  {}",
            conversation.id,
            conversation.supplier_name,
            conversation.last_message.unwrap_or_default()
        );
    }
    Ok(())
}

/// Prints a thread and marks it read.
pub async fn show(app: &App, conversation_id: &str) -> ClientResult<()> {
    require_session(app).await?;
    let conversations = app.api.conversations();
    let messages = conversations.messages(conversation_id).await?;

    for message in &messages {
        let who = match message.sender {
            MessageSender::User => "you",
            MessageSender::Supplier => "them",
        };
        println!(
            "[{}] {who:>4}: {}",
            message.created_at.format("%m-%d %H:%M"),
            message.body
        );
    }

    if messages.iter().any(|m| m.sender == MessageSender::Supplier && !m.read) {
        conversations.mark_read(conversation_id).await?;
    }
    Ok(())
}

pub async fn send(app: &App, conversation_id: &str, body: &str) -> ClientResult<()> {
    require_session(app).await?;
    let message = app.api.conversations().send(conversation_id, body).await?;
    println!("sent {}", message.id);
    Ok(())
}

/// Opens (or reuses) a thread with a supplier.
pub async fn start(app: &App, supplier_id: &str) -> ClientResult<()> {
    require_session(app).await?;
    let conversation = app.api.conversations().start(supplier_id).await?;
    println!("conversation {} with {}", conversation.id, conversation.supplier_name);
    Ok(())
}

/// Prints the unread count; with `watch`, keeps printing changes until
/// Ctrl-C.
pub async fn unread(app: &App, watch: bool) -> ClientResult<()> {
    require_session(app).await?;

    if !watch {
        let count = app.api.conversations().unread_count().await?;
        println!("{count} unread");
        return Ok(());
    }

    let watcher = app.watch_unread();
    let mut rx = watcher.subscribe();
    println!("{} unread", watcher.current());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let count = *rx.borrow_and_update();
                println!("{count} unread");
            }
        }
    }

    watcher.shutdown().await;
    Ok(())
}
