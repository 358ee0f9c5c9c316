//! fitchat CLI: Command-line interface for the fitness chat assistant

use clap::{Args, Parser, Subcommand};
use fitchat_engine::{ChatSession, Config, HttpCompletionClient, ProviderKind};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Fitness assistant chat widget for the terminal
#[derive(Parser, Debug)]
#[command(name = "fitchat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the chat widget (default when no command specified)
    Tui {
        #[command(flatten)]
        provider: ProviderArgs,

        /// Write logs to this file (the terminal is busy drawing)
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// Ask a single question and print the reply
    Ask {
        /// Question text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        #[command(flatten)]
        provider: ProviderArgs,

        /// Output the reply message as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the resolved configuration
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Overrides for the environment configuration.
#[derive(Args, Debug, Default)]
struct ProviderArgs {
    /// Reply provider (keyword or remote)
    #[arg(long)]
    provider: Option<ProviderKind>,

    /// Model for the remote provider
    #[arg(long)]
    model: Option<String>,

    /// Delay before keyword replies, in milliseconds
    #[arg(long)]
    reply_delay_ms: Option<u64>,
}

impl ProviderArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(kind) = self.provider {
            config.provider = kind;
        }
        if let Some(model) = &self.model {
            config.model.clone_from(model);
        }
        if let Some(delay) = self.reply_delay_ms {
            config.reply_delay_ms = delay;
        }
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult {
    let mut config = Config::from_env()?;

    let command = cli.command.unwrap_or(Commands::Tui {
        provider: ProviderArgs::default(),
        log_file: None,
    });

    match command {
        Commands::Tui { provider, log_file } => {
            if let Some(path) = &log_file {
                init_file_logging(path)?;
            }
            provider.apply(&mut config);
            cmd_tui(&config)
        }
        Commands::Ask {
            text,
            provider,
            json,
        } => {
            init_stderr_logging();
            provider.apply(&mut config);
            cmd_ask(&config, &text.join(" "), json)
        }
        Commands::Doctor { json } => {
            init_stderr_logging();
            cmd_doctor(&config, json)
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn init_stderr_logging() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn init_file_logging(path: &Path) -> CliResult {
    let file = File::create(path)?;
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread().enable_all().build()
}

fn cmd_tui(config: &Config) -> CliResult {
    let provider = config.build_provider()?;
    let rt = runtime()?;
    rt.block_on(fitchat_tui::run_tui(provider))
}

fn cmd_ask(config: &Config, text: &str, json: bool) -> CliResult {
    let provider = config.build_provider()?;
    let rt = runtime()?;

    let reply = rt.block_on(async {
        let mut session = ChatSession::new(provider);
        if !session.submit(text) {
            return None;
        }
        let id = session.next_resolved().await?;
        debug!(id, "Reply resolved");
        session.state().last().cloned()
    });

    let Some(reply) = reply else {
        return Err("nothing to ask: the question is empty".into());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        println!("{}", reply.text);
    }
    Ok(())
}

fn cmd_doctor(config: &Config, json: bool) -> CliResult {
    let endpoint = HttpCompletionClient::new(&config.completion_settings())?
        .endpoint()
        .to_string();

    if json {
        let report = serde_json::json!({
            "version": fitchat_engine::engine_version(),
            "config": config,
            "api_key_set": config.api_key_set(),
            "endpoint": endpoint,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let key_status = if config.api_key_set() {
        "set"
    } else {
        "not set"
    };

    println!("fitchat {}\n", fitchat_engine::engine_version());
    println!("  Provider:        {}", config.provider);
    println!("  Model:           {}", config.model);
    println!("  Endpoint:        {endpoint}");
    println!("  API key:         {key_status}");
    println!("  Reply delay:     {} ms", config.reply_delay_ms);
    println!("  Request timeout: {} s", config.request_timeout_secs);

    if config.provider == ProviderKind::Remote && !config.api_key_set() {
        println!("\nWarning: remote provider selected but OPENAI_API_KEY is not set");
    }
    Ok(())
}
