//! apiprobe CLI - Main Entry Point
//!
//! Lists the built-in API descriptors, logs in to obtain a bearer token and
//! sends requests to the selected service.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use apiprobe_cli::commands::{auth, catalog, exec, Context, GlobalOptions};
use apiprobe_cli::output;

/// apiprobe - Manual REST API explorer
#[derive(Parser)]
#[command(name = "apiprobe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Service to target (search, movies, or one from --catalog)
    #[arg(short, long, global = true, env = "APIPROBE_SERVICE")]
    service: Option<String>,

    /// Override the selected service's base URL
    #[arg(long, global = true, env = "APIPROBE_BASE_URL")]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Extra descriptors to merge into the catalog (YAML)
    #[arg(long, global = true, env = "APIPROBE_CATALOG")]
    catalog: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available services
    Services,

    /// List the APIs of the selected service
    List,

    /// Show an API's endpoint, description and example payload
    Show(catalog::ShowArgs),

    /// Log in and store the bearer token
    Login(auth::LoginArgs),

    /// Forget the stored bearer token
    Logout,

    /// Print the stored bearer token
    Token(auth::TokenArgs),

    /// Send a request and print the response
    Exec(exec::ExecArgs),

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let ctx = Context::load(GlobalOptions {
        service: cli.service,
        base_url: cli.base_url,
        timeout_secs: cli.timeout,
        catalog_file: cli.catalog,
        store: None,
        format: cli.format,
    })?;

    let ok = match cli.command {
        Commands::Services => catalog::services(&ctx).map(|_| true)?,
        Commands::List => catalog::list(&ctx).map(|_| true)?,
        Commands::Show(args) => catalog::show(args, &ctx).map(|_| true)?,
        Commands::Login(args) => auth::login(args, &ctx).await?,
        Commands::Logout => auth::logout(&ctx).map(|_| true)?,
        Commands::Token(args) => auth::show_token(args, &ctx)?,
        Commands::Exec(args) => exec::execute(args, &ctx).await?,
        Commands::Version => {
            println!("apiprobe v{}", apiprobe_common::VERSION);
            println!("Manual REST API explorer");
            println!();
            println!("Services:");
            for service in &ctx.catalog.services {
                println!("  {:<8} {}", service.id, service.base_url);
            }
            true
        }
    };

    if !ok {
        std::process::exit(1);
    }

    Ok(())
}
