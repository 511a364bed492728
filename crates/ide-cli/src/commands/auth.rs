use anyhow::{Context, Result};
use ide_application::IdeApp;
use ide_core::session::{Credentials, SignupProfile};
use std::io::{self, BufRead, Write};

fn read_password(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn login(app: &IdeApp, email: String, password: Option<String>) -> Result<()> {
    let credentials = Credentials {
        email,
        password: read_password(password)?,
    };
    let user = app.session().login(&credentials).await?;
    super::output::success(format!("Welcome back, {}", user.name));
    Ok(())
}

pub async fn signup(
    app: &IdeApp,
    name: String,
    email: String,
    password: Option<String>,
) -> Result<()> {
    let profile = SignupProfile {
        name,
        email,
        password: read_password(password)?,
    };
    let user = app.session().signup(&profile).await?;
    super::output::success(format!("Account created. Signed in as {}", user.name));
    Ok(())
}

pub async fn logout(app: &IdeApp) -> Result<()> {
    app.session().logout().await;
    super::output::success("Signed out");
    Ok(())
}

pub async fn whoami(app: &IdeApp) -> Result<()> {
    match app.session().current_user().await {
        Some(user) => println!("{} <{}>", user.name, user.email),
        None => println!("Not signed in"),
    }
    Ok(())
}
