use anyhow::Result;
use ide_application::IdeApp;
use ide_core::snippet::{SnippetFilter, popular_languages};

const POPULAR_LANGUAGE_COUNT: usize = 5;

pub async fn share(app: &IdeApp, title: &str) -> Result<()> {
    let snippet = app.share(title).await?;
    super::output::success("Snippet shared successfully");
    println!("{}", snippet.id);
    Ok(())
}

pub async fn list(app: &IdeApp, query: Option<String>, language: Option<String>) -> Result<()> {
    let snippets = app.snippets().list().await?;
    let filter = SnippetFilter { query, language };
    let found = filter.apply(&snippets);

    if found.is_empty() {
        println!("No snippets found");
    }
    for snippet in &found {
        println!(
            "{:<26} {:<12} {:<32} {}",
            snippet.id, snippet.language, snippet.title, snippet.author_name
        );
    }

    let popular = popular_languages(&snippets, POPULAR_LANGUAGE_COUNT);
    if !popular.is_empty() {
        eprintln!("\nLanguages: {}", popular.join(", "));
    }
    Ok(())
}

pub async fn show(app: &IdeApp, id: &str) -> Result<()> {
    let snippet = app.snippets().get(id).await?;
    eprintln!("// {} [{}] by {}", snippet.title, snippet.language, snippet.author_name);
    if let Some(created_at) = snippet.created_at {
        eprintln!("// {}", created_at.format("%Y-%m-%d %H:%M"));
    }
    println!("{}", snippet.code);
    Ok(())
}

pub async fn delete(app: &IdeApp, id: &str) -> Result<()> {
    let snippet = app.snippets().get(id).await?;
    app.snippets().delete(&snippet).await?;
    super::output::success("Snippet deleted successfully");
    Ok(())
}
