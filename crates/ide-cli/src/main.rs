use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ide_application::IdeApp;
use ide_core::IdeError;
use ide_core::notice::Notice;
use ide_core::storage::KeyValueStore;
use ide_infrastructure::{ConfigService, JsonFileKeyValueStore, MemoryKeyValueStore};
use ide_interaction::{PistonClient, ReqwestTransport};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "ide")]
#[command(version, about = "SaaS IDE - write, run and share code from the terminal", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Keep session, preferences and buffers in memory for this invocation only
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the editor buffer, or FILE after loading it into the buffer
    Run {
        file: Option<PathBuf>,
        /// Switch to this language first
        #[arg(short, long)]
        language: Option<String>,
    },
    /// Print the editor buffer
    Code,
    /// Restore the starter code for the active language
    Reset,
    /// Show languages, or switch to LANGUAGE
    Lang { language: Option<String> },
    /// Show themes, or switch to THEME
    Theme { theme: Option<String> },
    /// Show or set the editor font size
    Font {
        #[arg(allow_negative_numbers = true)]
        size: Option<i64>,
    },
    /// Show all preferences
    Prefs,
    /// Sign in
    Login {
        email: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account and sign in
    Signup {
        name: String,
        email: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Share the editor buffer as a snippet
    Share {
        #[arg(short, long)]
        title: String,
    },
    /// List shared snippets
    Snippets {
        /// Match title, language or author
        #[arg(short, long)]
        query: Option<String>,
        #[arg(short, long)]
        language: Option<String>,
    },
    /// Print one snippet
    Show { id: String },
    /// Delete one of your snippets
    Delete { id: String },
}

fn init_tracing(cli: &Cli) {
    // HTTP internals stay at WARN even in debug mode.
    let filter = if cli.debug {
        EnvFilter::new("debug,hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn,h2=warn")
    } else if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn build_app(ephemeral: bool) -> Result<IdeApp> {
    let config = ConfigService::load().context("Failed to load configuration")?;
    let store: Arc<dyn KeyValueStore> = if ephemeral {
        Arc::new(MemoryKeyValueStore::new())
    } else {
        Arc::new(JsonFileKeyValueStore::open_default().context("Failed to open local storage")?)
    };
    let transport = ReqwestTransport::new(config.api_base_url.clone());
    let piston = PistonClient::new(config.execution_url.clone());

    let app = IdeApp::new(&config, store, Arc::new(transport), Arc::new(piston)).await?;
    Ok(app)
}

async fn dispatch(app: &IdeApp, command: Commands) -> Result<()> {
    match command {
        Commands::Run { file, language } => commands::editor::run(app, file, language).await,
        Commands::Code => commands::editor::show(app).await,
        Commands::Reset => commands::editor::reset(app).await,
        Commands::Lang { language } => commands::prefs::language(app, language).await,
        Commands::Theme { theme } => commands::prefs::theme(app, theme).await,
        Commands::Font { size } => commands::prefs::font(app, size).await,
        Commands::Prefs => commands::prefs::show(app).await,
        Commands::Login { email, password } => commands::auth::login(app, email, password).await,
        Commands::Signup {
            name,
            email,
            password,
        } => commands::auth::signup(app, name, email, password).await,
        Commands::Logout => commands::auth::logout(app).await,
        Commands::Whoami => commands::auth::whoami(app).await,
        Commands::Share { title } => commands::snippets::share(app, &title).await,
        Commands::Snippets { query, language } => {
            commands::snippets::list(app, query, language).await
        }
        Commands::Show { id } => commands::snippets::show(app, &id).await,
        Commands::Delete { id } => commands::snippets::delete(app, &id).await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let app = build_app(cli.ephemeral).await?;
    let outcome = dispatch(&app, cli.command).await;

    if let Err(e) = app.shutdown().await {
        tracing::warn!("Failed to persist editor buffer: {}", e);
    }

    if let Err(err) = outcome {
        match err.downcast_ref::<IdeError>() {
            Some(ide_err) => {
                if let Some(notice) = Notice::from_error(ide_err) {
                    commands::output::print_notice(&notice);
                }
            }
            None => eprintln!("Error: {err:#}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
