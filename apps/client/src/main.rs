//! # bookit
//!
//! Command-line front end for the Bookit client. Drives the same session,
//! theme, favorites and unread state a mobile UI would.
//!
//! ## Usage
//!
//! ```bash
//! bookit login -e ada@example.com            # password from BOOKIT_PASSWORD or --password
//! bookit suppliers --category cleaning --search sparkle
//! bookit favorites toggle s-123
//! bookit orders show o-42
//! bookit orders accept-quote o-42
//! bookit card check "4242 4242 4242 4242" --expiry 12/30 --cvv 123
//! bookit chat send c-7 "On my way"
//! bookit unread --watch
//! ```
//!
//! ## Configuration
//! `client.toml` in the platform config directory, overridden by `BOOKIT_*`
//! environment variables and `--api-url`. Logs go to stderr; set `RUST_LOG`
//! to change the level.

#![cfg_attr(not(test), forbid(unsafe_code))]

use anyhow::Context;
use bookit_api::ApiConfig;
use bookit_client::commands;
use bookit_client::App;
use bookit_core::{CardDetails, OrderStatus};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "bookit")]
#[command(author, version, about = "Bookit marketplace client")]
struct Cli {
    /// Path to client.toml (defaults to the platform config directory)
    #[arg(long, global = true, env = "BOOKIT_CONFIG")]
    config: Option<PathBuf>,

    /// Backend base URL, e.g. http://localhost:3000/api
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "BOOKIT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "BOOKIT_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Change the account password
    Passwd {
        /// Current password; falls back to BOOKIT_PASSWORD like `login`
        #[arg(long, hide_env_values = true, env = "BOOKIT_PASSWORD")]
        current: String,
        /// New password; always given on the command line
        #[arg(long)]
        new: String,
        /// New password again
        #[arg(long)]
        confirm: String,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List service categories
    Categories,
    /// Browse suppliers
    Suppliers {
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Favorite suppliers
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Light, dark or system theme
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
    /// Bookings
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Check card details offline
    Card {
        #[command(subcommand)]
        action: CardAction,
    },
    /// Conversations with suppliers
    Chat {
        #[command(subcommand)]
        action: ChatAction,
    },
    /// Unread message count
    Unread {
        /// Keep polling and print every change
        #[arg(short, long)]
        watch: bool,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorite suppliers
    List,
    /// Add or remove a supplier
    Toggle { supplier_id: String },
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Show the current preference
    Get,
    /// Set the preference (light, dark, system)
    Set { preference: String },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List orders, optionally by status
    List {
        #[arg(short, long)]
        status: Option<OrderStatus>,
    },
    /// Show one order with its quote
    Show { id: String },
    /// Book a supplier
    Book {
        supplier_id: String,
        #[arg(short, long)]
        description: String,
        #[arg(short, long)]
        address: Option<String>,
        /// RFC 3339 time, e.g. 2025-07-01T09:00:00Z
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Cancel an order
    Cancel { id: String },
    /// Accept the supplier's quote
    AcceptQuote { id: String },
    /// Reject the supplier's quote
    RejectQuote { id: String },
    /// Pay a confirmed order by card
    Pay {
        id: String,
        #[arg(long)]
        number: String,
        #[arg(long)]
        expiry: String,
        #[arg(long)]
        cvv: String,
        #[arg(long)]
        holder: String,
    },
}

#[derive(Subcommand)]
enum CardAction {
    /// Luhn, brand, expiry and CVV checks
    Check {
        number: String,
        #[arg(long)]
        expiry: Option<String>,
        #[arg(long)]
        cvv: Option<String>,
    },
}

#[derive(Subcommand)]
enum ChatAction {
    /// List conversations
    List,
    /// Show a conversation and mark it read
    Show { id: String },
    /// Send a message
    Send { id: String, body: String },
    /// Start a conversation with a supplier
    Start { supplier_id: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    bookit_client::init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Offline commands need neither the store nor the network.
    if let Commands::Card {
        action: CardAction::Check { number, expiry, cvv },
    } = &cli.command
    {
        commands::card::check(number, expiry.as_deref(), cvv.as_deref())?;
        return Ok(());
    }

    let mut config = ApiConfig::load(cli.config.clone()).context("Failed to load configuration")?;
    if let Some(url) = cli.api_url {
        config.api.base_url = Some(url);
    }
    config.validate().context("Invalid configuration")?;

    let app = App::start(config).await.context("Failed to start client")?;
    let result = dispatch(&app, cli.command).await;
    app.shutdown().await;
    result?;
    Ok(())
}

async fn dispatch(app: &App, command: Commands) -> bookit_client::error::ClientResult<()> {
    match command {
        Commands::Login { email, password } => commands::auth::login(app, &email, &password).await,
        Commands::Register {
            name,
            email,
            password,
            phone,
        } => commands::auth::register(app, &name, &email, &password, phone).await,
        Commands::Passwd {
            current,
            new,
            confirm,
        } => commands::auth::change_password(app, &current, &new, &confirm).await,
        Commands::Logout => commands::auth::logout(app).await,
        Commands::Whoami => commands::auth::whoami(app).await,
        Commands::Categories => commands::catalog::categories(app).await,
        Commands::Suppliers {
            category,
            search,
            page,
        } => commands::catalog::suppliers(app, category, search, page).await,
        Commands::Favorites { action } => match action {
            FavoritesAction::List => commands::favorites::list(app).await,
            FavoritesAction::Toggle { supplier_id } => {
                commands::favorites::toggle(app, &supplier_id).await
            }
        },
        Commands::Theme { action } => match action {
            ThemeAction::Get => commands::theme::get(app).await,
            ThemeAction::Set { preference } => commands::theme::set(app, &preference).await,
        },
        Commands::Orders { action } => match action {
            OrdersAction::List { status } => commands::orders::list(app, status).await,
            OrdersAction::Show { id } => commands::orders::show(app, &id).await,
            OrdersAction::Book {
                supplier_id,
                description,
                address,
                at,
            } => commands::orders::book(app, &supplier_id, &description, address, at).await,
            OrdersAction::Cancel { id } => commands::orders::cancel(app, &id).await,
            OrdersAction::AcceptQuote { id } => commands::orders::decide_quote(app, &id, true).await,
            OrdersAction::RejectQuote { id } => commands::orders::decide_quote(app, &id, false).await,
            OrdersAction::Pay {
                id,
                number,
                expiry,
                cvv,
                holder,
            } => {
                let card = CardDetails {
                    number,
                    expiry,
                    cvv,
                    holder_name: holder,
                };
                commands::orders::pay(app, &id, card).await
            }
        },
        Commands::Card {
            action: CardAction::Check { number, expiry, cvv },
        } => commands::card::check(&number, expiry.as_deref(), cvv.as_deref()),
        Commands::Chat { action } => match action {
            ChatAction::List => commands::chat::list(app).await,
            ChatAction::Show { id } => commands::chat::show(app, &id).await,
            ChatAction::Send { id, body } => commands::chat::send(app, &id, &body).await,
            ChatAction::Start { supplier_id } => commands::chat::start(app, &supplier_id).await,
        },
        Commands::Unread { watch } => commands::chat::unread(app, watch).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_passwd_env_fallback_is_current_only() {
        let cli = Cli::command();
        let passwd = cli.find_subcommand("passwd").unwrap();
        let env_of = |id: &str| {
            passwd
                .get_arguments()
                .find(|arg| arg.get_id().as_str() == id)
                .and_then(|arg| arg.get_env())
                .map(|env| env.to_string_lossy().into_owned())
        };

        assert_eq!(env_of("current").as_deref(), Some("BOOKIT_PASSWORD"));
        assert_eq!(env_of("new"), None);
        assert_eq!(env_of("confirm"), None);

        let current = passwd
            .get_arguments()
            .find(|arg| arg.get_id().as_str() == "current")
            .unwrap();
        let help = current.get_help().unwrap().to_string();
        assert!(help.contains("BOOKIT_PASSWORD"));
    }

    #[test]
    fn test_passwd_parses_flags() {
        let cli = Cli::try_parse_from([
            "bookit", "passwd", "--current", "old-secret1", "--new", "new-secret1", "--confirm",
            "new-secret1",
        ])
        .unwrap();
        match cli.command {
            Commands::Passwd { current, new, confirm } => {
                assert_eq!(current, "old-secret1");
                assert_eq!(new, confirm);
            }
            _ => panic!("expected passwd"),
        }
    }
}
