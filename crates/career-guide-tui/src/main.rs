mod app;
mod handler;
mod tui;
mod ui;

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use career_guide_core::chat::CompletionSettings;
use career_guide_core::{ChatSession, Config, EnvCredentials, GroqClient, Route};

use app::App;
use tui::EventHandler;

const DEFAULT_LOG_DIRECTIVE: &str = "career_guide=info";

#[derive(Parser)]
#[command(name = "career-guide")]
#[command(about = "Career Guide in the terminal, with an AI career assistant")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Page to open first, e.g. /ChatBot or /ProductCompanies
    #[arg(short, long, default_value = "/")]
    route: String,

    /// Model identifier sent to the completion endpoint
    #[arg(short, long)]
    model: Option<String>,

    /// Log filter directive (overrides RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the assistant a single question and print the reply
    Ask {
        /// Your question
        question: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_level.as_deref())?;
    tracing::info!("Career Guide v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {}", e);
        Config::new()
    });
    let mut settings = config.completion_settings();
    if let Some(model) = cli.model {
        settings = settings.with_model(model);
    }
    let credentials = Arc::new(EnvCredentials::new());

    match cli.command {
        Some(Commands::Ask { question }) => ask(&question, settings, credentials).await,
        None => {
            let route = Route::from_path(&cli.route).unwrap_or_else(|| {
                tracing::warn!("Unknown route {}, opening Home", cli.route);
                Route::Home
            });
            run_tui(route, settings, credentials).await
        }
    }
}

async fn ask(
    question: &str,
    settings: CompletionSettings,
    credentials: Arc<EnvCredentials>,
) -> Result<()> {
    let client = GroqClient::new(&settings.endpoint);
    let mut session = ChatSession::new(settings, credentials);

    if !session.send(question, &client).await {
        anyhow::bail!("Question is empty");
    }

    // Failures are transcript entries too; print whatever came back.
    if let Some(reply) = session.transcript().last() {
        println!("{}", reply.content);
    }
    Ok(())
}

async fn run_tui(
    route: Route,
    settings: CompletionSettings,
    credentials: Arc<EnvCredentials>,
) -> Result<()> {
    let mut events = EventHandler::new();
    let client = Arc::new(GroqClient::new(&settings.endpoint));
    let mut app = App::new(route, settings, credentials, client, events.sender());

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let result = async {
        while !app.should_quit {
            terminal.draw(|frame| ui::render(&mut app, frame))?;
            match events.next().await {
                Some(event) => handler::handle_event(&mut app, event),
                None => break,
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    tracing::info!("Career Guide exiting");
    result
}

fn log_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("career-guide").join("career-guide.log"))
}

/// Logs go to a file: the TUI owns the terminal.
fn init_logging(directive: Option<&str>) -> Result<()> {
    let filter = match directive {
        Some(directive) => EnvFilter::try_new(directive)?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE)),
    };

    let Some(path) = log_path() else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
