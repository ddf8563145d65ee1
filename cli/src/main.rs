// folio — portfolio site server
//
// Serves the built single-page app and accepts contact form submissions.

mod api;
mod config;
mod server;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use folio_core::{ContactEndpoint, MemoryMessageStore, MessageStore, NewContactMessage};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Portfolio site server with contact form backend", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the site and the contact API
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
        #[arg(long)]
        public_dir: Option<PathBuf>,
    },
    /// Send a contact form to a running server
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(short, long)]
        message: String,
        /// Server base URL (defaults to the configured local port)
        #[arg(long)]
        server: Option<String>,
    },
    /// Check whether a server is running
    Status {
        #[arg(long)]
        server: Option<String>,
    },
    /// Configure settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Run self-tests
    Test,
}

#[derive(Subcommand)]
enum ConfigAction {
    Set { key: String, value: String },
    Get { key: String },
    List,
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::Config::load()?;
    let _log_guard = init_tracing(&config)?;

    match cli.command {
        Commands::Serve { port, public_dir } => cmd_serve(config, port, public_dir).await,
        Commands::Submit {
            name,
            email,
            message,
            server,
        } => cmd_submit(&config, server, NewContactMessage::new(name, email, message)).await,
        Commands::Status { server } => cmd_status(&config, server).await,
        Commands::Config { action } => cmd_config(config, action),
        Commands::Test => cmd_test(),
    }
}

fn init_tracing(config: &config::Config) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level).context("Invalid log_level in config")?,
    };

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "folio.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(guard)
}

fn build_store(config: &config::Config) -> MemoryMessageStore {
    match config.message_limit() {
        Some(limit) => MemoryMessageStore::bounded(limit),
        None => MemoryMessageStore::new(),
    }
}

async fn cmd_serve(
    mut config: config::Config,
    port: Option<u16>,
    public_dir: Option<PathBuf>,
) -> Result<()> {
    if let Some(port) = port {
        config.listen_port = port;
    }
    let public_dir = public_dir.unwrap_or_else(|| PathBuf::from(&config.public_dir));
    let addr = config.socket_addr()?;

    if !public_dir.join("index.html").is_file() {
        tracing::warn!(
            "No index.html in {}; only the contact API will respond",
            public_dir.display()
        );
    }

    let store = Arc::new(build_store(&config));
    let ctx = Arc::new(server::WebContext {
        endpoint: ContactEndpoint::new(store.clone()),
        public_dir: public_dir.clone(),
        max_body_bytes: config.store.max_body_bytes,
    });

    println!("{}", "folio — Starting...".bold());
    println!();
    println!("  {} Site:    {}", "✓".green(), public_dir.display().to_string().bright_cyan());
    println!("  {} Contact: POST {}", "✓".green(), api::CONTACT_PATH.bright_cyan());
    println!("  {} Listen:  http://{}", "✓".green(), addr.to_string().bright_yellow());
    match store.capacity() {
        Some(limit) => println!("  {} Store:   up to {} messages", "✓".green(), limit),
        None => println!("  {} Store:   unbounded", "✓".green()),
    }
    println!();

    server::serve(addr, ctx).await?;

    tracing::info!(messages = store.len(), "Server stopped");
    Ok(())
}

async fn cmd_submit(
    config: &config::Config,
    server: Option<String>,
    payload: NewContactMessage,
) -> Result<()> {
    let server = server.unwrap_or_else(|| api::local_server_url(config.listen_port));

    let ack = api::submit_contact_via_api(&server, &payload).await?;

    if ack.is_success() {
        println!("{} {}", "✓".green(), ack.status_text());
        Ok(())
    } else {
        anyhow::bail!("{}", ack.status_text())
    }
}

async fn cmd_status(config: &config::Config, server: Option<String>) -> Result<()> {
    let server = server.unwrap_or_else(|| api::local_server_url(config.listen_port));

    println!("{}", "folio Status".bold());
    println!();

    if api::is_api_available(&server).await {
        println!("  {} Server running at {}", "✓".green(), server.bright_cyan());
    } else {
        println!("  {} No server at {}", "✗".red(), server.bright_cyan());
    }

    Ok(())
}

fn cmd_config(mut config: config::Config, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Set { key, value } => {
            config.set(&key, &value)?;
            config.save()?;
            println!("{} Set {} = {}", "✓".green(), key.bright_cyan(), value);
        }

        ConfigAction::Get { key } => match config.get(&key) {
            Some(value) => println!("{} = {}", key.bright_cyan(), value),
            None if config.list().iter().any(|(k, _)| *k == key) => {
                println!("{} is not set", key.bright_cyan())
            }
            None => anyhow::bail!("Unknown config key: {}", key),
        },

        ConfigAction::List => {
            println!("{}", "Configuration".bold());
            println!();

            for (key, value) in config.list() {
                println!("  {:<20} {}", key.bright_cyan(), value);
            }
        }

        ConfigAction::Path => {
            println!("{}", config::Config::config_file()?.display());
        }
    }

    Ok(())
}

fn cmd_test() -> Result<()> {
    println!("{}", "Running self-tests...".bold());
    println!();

    let store = Arc::new(MemoryMessageStore::new());
    let endpoint = ContactEndpoint::new(store.clone());

    let ack = endpoint.submit(NewContactMessage::new("Ana", "ana@x.com", "Hi"));
    anyhow::ensure!(ack.is_success(), "submission was not accepted");
    println!("{} Submission accepted", "✓".green());

    let listed = store.list()?;
    anyhow::ensure!(listed.len() == 1, "expected one stored message");
    let stored = &listed[0];
    anyhow::ensure!(
        store.get(&stored.id)?.as_ref() == Some(stored),
        "stored message not retrievable by id"
    );
    println!(
        "{} Message stored ({} at {})",
        "✓".green(),
        stored.id,
        stored.formatted_time()
    );

    let full = Arc::new(MemoryMessageStore::bounded(0));
    let ack = ContactEndpoint::new(full.clone())
        .submit(NewContactMessage::new("Ben", "ben@x.com", "Hello"));
    anyhow::ensure!(!ack.is_success() && full.is_empty(), "full store accepted a message");
    println!(
        "{} Store failure reported generically (capacity {})",
        "✓".green(),
        full.capacity().unwrap_or_default()
    );

    println!();
    println!("{}", "All tests passed!".green().bold());

    Ok(())
}
