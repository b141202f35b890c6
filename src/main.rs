use std::fs::File;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;

use clap::Parser;
use log::{error, info, warn};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use pilot::api::{ChatClient, HttpChatClient, Timeouts};
use pilot::core::config::{self, CliOverrides, PilotConfig, ResolvedConfig};
use pilot::tui;

#[derive(Parser)]
#[command(name = "pilot", about = "Terminal chat client for the Geostrata research assistant")]
struct Args {
    /// Base URL of the chat backend (overrides config and PILOT_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Typewriter speed in milliseconds per character (0 shows answers at once)
    #[arg(long)]
    speed: Option<u64>,

    /// Ask one question, print the answer and exit
    #[arg(long, value_name = "QUESTION")]
    ask: Option<String>,

    /// Check that the backend is reachable and exit
    #[arg(long, conflicts_with = "ask")]
    ping: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<ExitCode> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let (file_config, config_error) = match config::load_config() {
        Ok(c) => (c, None),
        Err(e) => (PilotConfig::default(), Some(e)),
    };
    let cli = CliOverrides {
        api_url: args.api_url.clone(),
        typewriter_interval_ms: args.speed,
    };
    let resolved = config::resolve(&file_config, &cli);

    init_logger(&resolved.log_level);
    info!("Pilot starting up against {}", resolved.base_url);
    if let Some(e) = config_error {
        warn!("Ignoring config file, using defaults: {}", e);
    }

    let timeouts = Timeouts {
        connect_secs: resolved.connect_timeout_secs,
        request_secs: resolved.request_timeout_secs,
    };
    let client: Arc<dyn ChatClient> = Arc::new(
        HttpChatClient::new(resolved.base_url.clone(), timeouts)
            .map_err(|e| std::io::Error::other(e.to_string()))?,
    );

    if let Some(question) = args.ask.as_deref() {
        return Ok(ask_once(client.as_ref(), &resolved, question).await);
    }
    if args.ping {
        return Ok(ping(client.as_ref(), &resolved).await);
    }

    tui::run(resolved, client)?;
    Ok(ExitCode::SUCCESS)
}

// Writes to pilot.log in the current directory; stdout belongs to the TUI
fn init_logger(level: &str) {
    let level = LevelFilter::from_str(level).unwrap_or(LevelFilter::Debug);
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("pilot.log") {
        let _ = WriteLogger::init(level, log_config, log_file);
    }
}

async fn ask_once(client: &dyn ChatClient, config: &ResolvedConfig, question: &str) -> ExitCode {
    if question.trim().is_empty() {
        eprintln!("Question is empty");
        return ExitCode::FAILURE;
    }

    match client.ask(question).await {
        Ok(answer) => {
            let width = crossterm::terminal::size()
                .map(|(cols, _)| cols as usize)
                .unwrap_or(80);
            println!("{}", tui::markdown::to_plain(&answer, width));
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("One-shot question failed: {}", e);
            eprintln!("{}", config.error_message);
            ExitCode::FAILURE
        }
    }
}

async fn ping(client: &dyn ChatClient, config: &ResolvedConfig) -> ExitCode {
    match client.health().await {
        Ok(message) => {
            println!("{}: {}", config.base_url, message);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Health check failed: {}", e);
            eprintln!("{}: offline ({})", config.base_url, e);
            ExitCode::FAILURE
        }
    }
}
