use anyhow::Result;
use ide_application::IdeApp;
use ide_core::language::LANGUAGES;
use ide_core::preference::{MAX_FONT_SIZE, MIN_FONT_SIZE};
use ide_core::theme::THEMES;

fn marker(active: bool) -> &'static str {
    if active { "*" } else { " " }
}

pub async fn language(app: &IdeApp, language: Option<String>) -> Result<()> {
    match language {
        Some(id) => {
            let language = app.preferences().set_language(&id).await?;
            super::output::success(format!("Language set to {}", language.label));
        }
        None => {
            let active = app.preferences().language().await;
            for language in LANGUAGES {
                println!(
                    "{} {:<12} {:<12} {} {}",
                    marker(language.id == active.id),
                    language.id,
                    language.label,
                    language.runtime.language,
                    language.runtime.version
                );
            }
        }
    }
    Ok(())
}

pub async fn theme(app: &IdeApp, theme: Option<String>) -> Result<()> {
    match theme {
        Some(id) => {
            let theme = app.preferences().set_theme(&id).await?;
            super::output::success(format!("Theme set to {}", theme.label));
        }
        None => {
            let active = app.preferences().theme().await;
            for theme in THEMES {
                println!(
                    "{} {:<16} {:<16} {}",
                    marker(theme.id == active.id),
                    theme.id,
                    theme.label,
                    theme.color
                );
            }
        }
    }
    Ok(())
}

pub async fn font(app: &IdeApp, size: Option<i64>) -> Result<()> {
    match size {
        Some(size) => {
            let size = app.preferences().set_font_size(size).await?;
            super::output::success(format!("Font size set to {size}px"));
        }
        None => println!(
            "{}px ({}-{})",
            app.preferences().font_size().await,
            MIN_FONT_SIZE,
            MAX_FONT_SIZE
        ),
    }
    Ok(())
}

pub async fn show(app: &IdeApp) -> Result<()> {
    let preference = app.preferences().preference().await;
    println!("{}", serde_json::to_string_pretty(&preference)?);
    Ok(())
}
