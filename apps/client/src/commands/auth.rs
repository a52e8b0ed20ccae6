//! Account commands.

use bookit_core::validation::validate_password_confirmation;
use bookit_core::RegisterRequest;

use crate::commands::require_session;
use crate::error::ClientResult;
use crate::App;

pub async fn login(app: &App, email: &str, password: &str) -> ClientResult<()> {
    let user = app.session.login(email, password).await?;
    println!("Signed in as {} <{}>", user.name, user.email);
    Ok(())
}

pub async fn register(
    app: &App,
    name: &str,
    email: &str,
    password: &str,
    phone: Option<String>,
) -> ClientResult<()> {
    let request = RegisterRequest {
        name: name.trim().to_string(),
        email: email.trim().to_string(),
        password: password.to_string(),
        phone,
    };
    let user = app.session.register(&request).await?;
    println!("Welcome, {}! Your account is ready.", user.name);
    Ok(())
}

pub async fn change_password(app: &App, current: &str, new: &str, confirm: &str) -> ClientResult<()> {
    validate_password_confirmation(new, confirm)?;
    app.session.change_password(current, new).await?;
    println!("Password changed");
    Ok(())
}

pub async fn logout(app: &App) -> ClientResult<()> {
    app.session.logout().await?;
    println!("Signed out");
    Ok(())
}

pub async fn whoami(app: &App) -> ClientResult<()> {
    require_session(app).await?;
    if let Some(user) = app.session.current_user().await {
        println!("{} <{}>", user.name, user.email);
        if let Some(phone) = user.phone {
            println!("phone: {phone}");
        }
    }
    Ok(())
}
