use anyhow::{Context, Result};
use ide_application::IdeApp;
use std::fs;
use std::path::PathBuf;

pub async fn run(app: &IdeApp, file: Option<PathBuf>, language: Option<String>) -> Result<()> {
    if let Some(language) = language {
        app.preferences().set_language(&language).await?;
    }
    if let Some(path) = file {
        let code = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        app.editor().set_code(code).await?;
    }

    let result = app.run().await?;
    println!("{}", result.output);
    Ok(())
}

pub async fn show(app: &IdeApp) -> Result<()> {
    let language = app.editor().language().await;
    eprintln!("// {} ({})", language.label, language.id);
    println!("{}", app.editor().code().await);
    Ok(())
}

pub async fn reset(app: &IdeApp) -> Result<()> {
    app.editor().reset().await?;
    let language = app.editor().language().await;
    super::output::success(format!("Restored starter code for {}", language.label));
    Ok(())
}
