mod config;
mod error;
mod items;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use node::description::CREDENTIAL_NAME;
use node::{Item, StaticContext, StructuredChat, credential_description, node_description};
use serde_json::{Value, json};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use config::{API_KEY_ENV, Config};
use error::{Error, Result};

const CONFIG_FILE: &str = "structchat.toml";

#[derive(Parser)]
#[command(name = "structchat")]
#[command(about = "Structured JSON output from OpenAI via function calling", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (default: ./structchat.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log request details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the node over the input items and print the output items
    Run {
        /// JSON array of input items (default: one empty item)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Override the configured prompt
        #[arg(short, long)]
        prompt: Option<String>,
        /// Override the configured model
        #[arg(short, long)]
        model: Option<String>,
    },
    /// Print the node and credential descriptions
    Describe,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Run {
            input,
            prompt,
            model,
        }) => cmd_run(cli.config.as_deref(), input.as_deref(), prompt, model).await,
        None => cmd_run(cli.config.as_deref(), None, None, None).await,
        Some(Commands::Describe) => cmd_describe(),
    }
}

async fn cmd_run(
    config_path: Option<&Path>,
    input: Option<&Path>,
    prompt: Option<String>,
    model: Option<String>,
) -> Result<()> {
    let config = load_config(config_path)?;

    let mut parameters = config.parameters()?;
    if let Some(prompt) = prompt {
        parameters.insert("prompt".into(), Value::String(prompt));
    }
    if let Some(model) = model {
        parameters.insert("model".into(), Value::String(model));
    }

    let credentials = config.credentials(std::env::var(API_KEY_ENV).ok())?;
    let items = load_items(input)?;
    info!(items = items.len(), "running structured chat");

    let ctx = StaticContext::new(items)
        .with_parameters(parameters)
        .with_credentials(CREDENTIAL_NAME, credentials)
        .with_continue_on_fail(config.node.continue_on_fail);

    let output = StructuredChat::new().run(&ctx).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn cmd_describe() -> Result<()> {
    let descriptions = json!({
        "node": node_description(),
        "credentials": [credential_description()],
    });
    println!("{}", serde_json::to_string_pretty(&descriptions)?);
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) if !path.exists() => Err(Error::ConfigNotFound {
            path: path.to_path_buf(),
        }),
        Some(path) => Ok(Config::load(path)?),
        None if Path::new(CONFIG_FILE).exists() => {
            debug!(path = CONFIG_FILE, "loading config");
            Ok(Config::load(CONFIG_FILE)?)
        }
        None => Ok(Config::default()),
    }
}

fn load_items(path: Option<&Path>) -> Result<Vec<Item>> {
    match path {
        Some(path) => items::parse_items(&std::fs::read_to_string(path)?),
        None => Ok(vec![Item::empty()]),
    }
}
