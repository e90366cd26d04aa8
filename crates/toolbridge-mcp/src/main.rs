//! toolbridge MCP server — entry point.

use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tokio_util::sync::CancellationToken;

use toolbridge::{CapabilityProvider, CatalogToolProvider, MockToolProvider};
use toolbridge_mcp::config::{resolve_catalog_path, RunMode, ServerConfig, StopCondition};
use toolbridge_mcp::protocol::ProtocolHandler;
use toolbridge_mcp::transport::StdioTransport;
use toolbridge_mcp::types::PROTOCOL_VERSION;

const SERVER_NAME: &str = "toolbridge-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(
    name = "toolbridge-mcp",
    about = "Line-delimited JSON-RPC server exposing the toolbridge tool catalog",
    version
)]
struct Cli {
    /// Path to a JSON tool catalog (defaults to the built-in stand-in catalog).
    #[arg(short, long)]
    catalog: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve JSON-RPC over stdio (default).
    Serve {
        /// Path to a JSON tool catalog.
        #[arg(short, long)]
        catalog: Option<String>,

        /// When to stop serving.
        #[arg(long, value_enum, default_value_t = StopCondition::Eof)]
        until: StopCondition,

        /// Stop after handling this many non-blank lines.
        #[arg(long)]
        max_lines: Option<usize>,
    },

    /// Validate a JSON tool catalog.
    Validate,

    /// Print server information as JSON.
    Info,

    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

fn build_provider(config: &ServerConfig) -> Arc<dyn CapabilityProvider> {
    match &config.catalog_path {
        Some(path) => {
            let provider = CatalogToolProvider::new(path);
            tracing::info!("Tool catalog: {}", provider.path().display());
            Arc::new(provider)
        }
        None => {
            tracing::info!("No tool catalog configured, serving stand-in catalog");
            Arc::new(MockToolProvider::new())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    // stdout carries protocol traffic only.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Serve {
        catalog: None,
        until: StopCondition::Eof,
        max_lines: None,
    }) {
        Commands::Serve {
            catalog,
            until,
            max_lines,
        } => {
            let effective_catalog = catalog.or(cli.catalog);
            let config = ServerConfig::new(
                RunMode::from_args(until, max_lines),
                effective_catalog.as_deref(),
            );
            let handler = ProtocolHandler::new(build_provider(&config));
            let transport = StdioTransport::with_mode(handler, config.run_mode);

            let cancel = CancellationToken::new();
            let on_signal = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::info!("Interrupt received, shutting down");
                    on_signal.cancel();
                }
            });

            tracing::info!(
                "{SERVER_NAME} v{SERVER_VERSION} serving on stdio ({:?})",
                transport.mode()
            );
            transport.run(&cancel).await?;
        }

        Commands::Validate => {
            let Some(path) = resolve_catalog_path(cli.catalog.as_deref()) else {
                eprintln!("No tool catalog configured (use --catalog or TOOLBRIDGE_CATALOG)");
                std::process::exit(1);
            };
            let provider = CatalogToolProvider::new(path);
            match provider.load() {
                Ok(tools) => {
                    println!("Valid tool catalog: {}", provider.path().display());
                    println!("  Tools: {}", tools.len());
                    for tool in &tools {
                        println!(
                            "  - {} ({} input(s), {} output(s))",
                            tool.id,
                            tool.inputs.len(),
                            tool.outputs.len()
                        );
                    }
                }
                Err(e) => {
                    eprintln!("Invalid tool catalog {}: {e}", provider.path().display());
                    std::process::exit(1);
                }
            }
        }

        Commands::Info => {
            let config = ServerConfig::new(RunMode::default(), cli.catalog.as_deref());
            let provider = build_provider(&config);
            let handler = ProtocolHandler::new(provider.clone());
            let tool_count = provider
                .list_tools(&CancellationToken::new())
                .await
                .map(|tools| tools.len())
                .ok();
            let info = serde_json::json!({
                "server": { "name": SERVER_NAME, "version": SERVER_VERSION },
                "protocolVersion": PROTOCOL_VERSION,
                "methods": handler.registry().method_names(),
                "catalog": config.catalog_path.as_ref().map(|p| p.display().to_string()),
                "toolCount": tool_count,
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, SERVER_NAME, &mut std::io::stdout());
        }
    }

    Ok(())
}
