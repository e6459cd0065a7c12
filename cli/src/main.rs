use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use quill_core::agent::{Agent, Context};
use quill_core::config::{self, Config};
use quill_core::invoices::{self, storage};
use quill_core::{providers, server};
use std::io::{self, BufRead, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod onboard;
mod templates;

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "quill - invoice processing agent", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure the model provider
    Onboard,
    /// Run the agent over one invoice file (a sample invoice when omitted)
    Process { file: Option<PathBuf> },
    /// Talk to the invoice agent
    Chat {
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Start the REST server
    Serve {
        #[arg(long)]
        addr: Option<SocketAddr>,
    },
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_agent(config: &Config) -> Result<Agent> {
    let provider = providers::create_provider(config)?;
    let registry = invoices::invoice_tool_registry(provider.clone());
    Ok(
        invoices::create_invoice_agent(provider, registry, Context::new())
            .with_max_iterations(config.max_iterations),
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let command = cli.command.unwrap_or_else(|| {
        if !config::config_exists() {
            Commands::Onboard
        } else {
            Commands::Chat { message: None }
        }
    });

    match command {
        Commands::Onboard => {
            let onboard_config = onboard::run_onboard().map_err(|e| {
                eprintln!("❌ Onboarding failed: {}", e);
                anyhow::anyhow!("Onboarding failed: {}", e)
            })?;
            config::save_config(&onboard_config)?;
        }
        Commands::Process { file } => {
            init_tracing("warn");
            let config = Config::load_or_init()?;
            if !config::config_exists() {
                warn!("No config file found, using defaults and environment API keys");
            }
            let mut agent = build_agent(&config)?;

            let invoice_text = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read invoice from {}", path.display()))?,
                None => {
                    println!(
                        "\nUsing sample invoice (pass a file path as argument for custom input).\n"
                    );
                    templates::SAMPLE_INVOICE.to_string()
                }
            };

            println!("Processing invoice...\n");
            let response = agent
                .process(&invoices::process_prompt(&invoice_text))
                .await
                .map_err(|e| {
                    eprintln!("❌ Error: {:#}", e);
                    anyhow::anyhow!("Agent processing failed: {}", e)
                })?;
            println!("{}", response);

            let stored = storage::snapshot(agent.context())?;
            if stored.as_object().is_some_and(|s| !s.is_empty()) {
                println!("\nStored invoices:\n{:#}", stored);
            }
        }
        Commands::Chat { message } => {
            init_tracing("info");
            let config = config::load_config()?;
            let mut agent = build_agent(&config)?;

            if let Some(msg) = message {
                println!("\n🤔 Processing...\n");
                match agent.process(&msg).await {
                    Ok(response) => {
                        println!("{}", response);
                    }
                    Err(e) => {
                        eprintln!("❌ Error: {:#}", e);
                        anyhow::bail!("Agent processing failed: {}", e);
                    }
                }
            } else {
                println!("🧾 quill");
                println!("Paste an invoice or ask about stored ones (Ctrl+D to exit):\n");
                let stdin = io::stdin();

                loop {
                    print!("> ");
                    let _ = io::stdout().flush();

                    let mut input = String::new();
                    match stdin.lock().read_line(&mut input) {
                        Ok(0) | Err(_) => {
                            println!("\n👋 Goodbye!");
                            break;
                        }
                        Ok(_) => {
                            let input = input.trim();
                            if input.is_empty() {
                                continue;
                            }

                            println!("\n🤔 Processing...\n");
                            match agent.process(input).await {
                                Ok(response) => println!("{}", response),
                                Err(e) => eprintln!("❌ Error: {:#}", e),
                            }
                            println!();
                        }
                    }
                }
            }
        }
        Commands::Serve { addr } => {
            init_tracing("info");
            let config = Config::load_or_init()?;
            let addr = match addr {
                Some(addr) => addr,
                None => config
                    .bind
                    .parse()
                    .with_context(|| format!("Invalid bind address '{}'", config.bind))?,
            };

            let provider = providers::create_provider(&config)?;
            info!(
                %addr,
                provider = provider.name(),
                max_iterations = config.max_iterations,
                "Starting invoice server"
            );
            let state = server::AppState::new(provider).with_max_iterations(config.max_iterations);
            server::serve(state, addr).await?;
        }
    }

    Ok(())
}
