//! Theme commands.

use bookit_core::{ColorScheme, ThemePreference};

use crate::error::ClientResult;
use crate::App;

pub async fn get(app: &App) -> ClientResult<()> {
    let pref = app.theme.preference().await;
    // A terminal has no scheme to follow; assume light.
    let scheme = app.theme.resolve(ColorScheme::Light).await;
    println!("{pref} (renders {scheme})");
    Ok(())
}

pub async fn set(app: &App, pref: &str) -> ClientResult<()> {
    let pref: ThemePreference = pref.parse()?;
    app.theme.set(pref).await?;
    println!("Theme set to {pref}");
    Ok(())
}
