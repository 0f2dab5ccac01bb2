//! Agora command-line entry point.
//!
//! This binary is the composition root: it loads configuration, installs
//! the logger, picks the model adapter and hands everything to the core.

mod app;
mod repl;
mod settings;


use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use agora_types::config::LlmProvider;
use agora_types::session::new_session_key;
use app::App;
use repl::{repl, Mode};
use settings::Overrides;

#[derive(Parser)]
#[command(name = "agora", version, about = "Memory-aware chat and multi-agent task solving")]
struct Cli {
    /// JSON configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// API key for the model provider
    #[arg(long, env = "AGORA_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, value_enum)]
    provider: Option<ProviderArg>,

    #[arg(long)]
    model: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive chat with session memory
    Chat {
        #[arg(long, short)]
        session: Option<String>,
    },
    /// Send one message and print the reply
    Ask {
        message: String,
        #[arg(long, short, default_value = "default")]
        session: String,
    },
    /// Run the five-step research collaboration on a task
    Solve {
        task: String,
        /// Time budget in seconds (defaults to the configured pipeline timeout)
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Interactive chat that reflects on every answer and keeps lessons
    Learn,
}

#[derive(Clone, Copy, ValueEnum)]
enum ProviderArg {
    Openai,
    Deepseek,
    Anthropic,
    Custom,
    Scripted,
}

impl From<ProviderArg> for LlmProvider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Openai => LlmProvider::OpenAI,
            ProviderArg::Deepseek => LlmProvider::DeepSeek,
            ProviderArg::Anthropic => LlmProvider::Anthropic,
            ProviderArg::Custom => LlmProvider::Custom,
            ProviderArg::Scripted => LlmProvider::Scripted,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let overrides = Overrides {
        api_key: cli.api_key.or_else(|| std::env::var("OPENAI_API_KEY").ok()),
        provider: cli.provider.map(Into::into),
        model: cli.model,
    };
    let config = match settings::load(cli.config.as_deref(), overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    log::info!("Agora starting with provider {}", config.llm.provider.label());

    let mut app = App::new(config);
    let outcome = match cli.command {
        Command::Ask { message, session } => app.ask(&session, &message).await.map(|reply| {
            println!("{}", reply);
        }),
        Command::Solve { task, timeout } => {
            let budget = timeout.map(Duration::from_secs);
            println!("{}", app.solve(&task, budget).await);
            Ok(())
        }
        Command::Chat { session } => {
            let session = session.unwrap_or_else(new_session_key);
            repl(&mut app, Mode::Chat(session), stdin(), tokio::io::stdout()).await
        }
        Command::Learn => repl(&mut app, Mode::Learn, stdin(), tokio::io::stdout()).await,
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn stdin() -> tokio::io::BufReader<tokio::io::Stdin> {
    tokio::io::BufReader::new(tokio::io::stdin())
}
