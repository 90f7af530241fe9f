use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use barista_gateway::api::{ApiServer, ApiState};
use barista_gateway::config::file;
use barista_gateway::prompt::build_instructions;
use barista_gateway::{Config, OrderDetails, OrderStore, OrderTools};

/// Barista - order-taking gateway for voice coffee-shop assistants
#[derive(Parser)]
#[command(name = "barista", version, about)]
struct Cli {
    /// Config file to use instead of ~/.config/barista/config.toml
    #[arg(short, long, env = "BARISTA_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Directory holding the order documents (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Finalize an order once and print the agent reply
    Finalize {
        /// Drink type (Latte, Cappuccino, ...)
        #[arg(long)]
        drink: String,
        /// Size (Small, Medium, Large)
        #[arg(long)]
        size: String,
        /// Milk preference
        #[arg(long)]
        milk: String,
        /// Extras
        #[arg(long, default_value = "None")]
        extras: String,
        /// Customer name
        #[arg(long)]
        name: String,
    },
    /// Show the latest order
    Summary,
    /// List every recorded order
    History,
    /// Print the tool definitions as JSON
    Tools,
    /// Print the agent instructions
    Instructions,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity; RUST_LOG wins when set
    let filter = match cli.verbose {
        0 => "info,barista_gateway=info",
        1 => "info,barista_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    tracing::debug!(?config, "loaded configuration");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config).await,
        Command::Finalize {
            drink,
            size,
            milk,
            extras,
            name,
        } => {
            let tools = OrderTools::new(Arc::new(config.store.open()))
                .with_ready_minutes(config.shop.ready_minutes);
            let details = OrderDetails::new(drink, size, milk, extras, name);
            println!("{}", tools.finalize_order(&details).await);
            Ok(())
        }
        Command::Summary => show_summary(&config).await,
        Command::History => show_history(&config).await,
        Command::Tools => {
            let defs = OrderTools::tool_definitions();
            println!("{}", serde_json::to_string_pretty(&defs)?);
            Ok(())
        }
        Command::Instructions => {
            println!(
                "{}",
                build_instructions(&config.shop.name, config.shop.ready_minutes)
            );
            Ok(())
        }
    }
}

/// Resolve configuration, applying command-line overrides last
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let fc = cli
        .config
        .as_deref()
        .map_or_else(file::load_config_file, file::load_config_file_from);
    let mut config = Config::resolve(fc, |key| std::env::var(key).ok())?;

    if let Some(port) = cli.port {
        config.api_server.port = port;
    }
    if let Some(dir) = &cli.data_dir {
        config.store.data_dir.clone_from(dir);
    }

    Ok(config)
}

async fn serve(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        port = config.api_server.port,
        history = %config.store.history_path().display(),
        summary = %config.store.summary_path().display(),
        shop = %config.shop.name,
        "starting barista gateway"
    );

    let server = ApiServer::new(ApiState::from_config(config), config.api_server.port);
    server.run().await?;
    Ok(())
}

async fn show_summary(config: &Config) -> anyhow::Result<()> {
    let store = config.store.open();
    match store.latest().await? {
        Some(order) => println!("{}", serde_json::to_string_pretty(&order)?),
        None => println!("no order found at {}", store.summary_path().display()),
    }
    Ok(())
}

async fn show_history(config: &Config) -> anyhow::Result<()> {
    let orders = config.store.open().history().await?;
    if orders.is_empty() {
        println!("no orders recorded");
        return Ok(());
    }

    for order in &orders {
        println!(
            "{}  {:<12} {}",
            order.timestamp,
            order.name,
            order.details()
        );
    }
    println!("---\n{} order(s)", orders.len());
    Ok(())
}
