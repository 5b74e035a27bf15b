//! `scam-shield` command-line client.

use std::io::Read;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use log::{LevelFilter, info};
use scam_shield_analyze::{SAMPLE_EMAIL, SAMPLE_SMS, SAMPLE_URL};
use scam_shield_app::{
    APP_VERSION, AppConfig, AppError, ORIGIN_ENV, analyze_once, build_client, init_logging,
    load_stats, render_history_text, render_result_text, render_trends_text,
};
use scam_shield_contract::AnalysisMode;
use scam_shield_transport::{API_URL_ENV, DEFAULT_ORIGIN};
use scam_shield_ui::{HistoryView, TrendsView};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "scam-shield", version = APP_VERSION, about = "Check suspicious emails, SMS, and URLs against the ScamShield service")]
struct Cli {
    /// Service base URL; unset means same-origin.
    #[arg(long, env = API_URL_ENV, global = true)]
    api_url: Option<String>,

    /// Origin that same-origin paths resolve against.
    #[arg(long, env = ORIGIN_ENV, default_value = DEFAULT_ORIGIN, global = true)]
    origin: String,

    /// Log level for scam-shield targets.
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    log_level: LogLevel,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Submit content for analysis. Reads stdin when neither --text nor
    /// --sample is given.
    Analyze {
        /// email, sms, or url.
        #[arg(long, default_value = "sms")]
        mode: AnalysisMode,

        /// Content to analyze.
        #[arg(long)]
        text: Option<String>,

        /// Use the built-in sample for the mode.
        #[arg(long, conflicts_with = "text")]
        sample: bool,
    },
    /// Show the most recent scans.
    History,
    /// Show risk-level and scan-type distributions.
    Trends,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(error) = init_logging(cli.log_level.into()) {
        eprintln!("scam-shield: {error}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error @ AppError::Submit(_)) => {
            eprintln!("scam-shield: {error}");
            ExitCode::from(2)
        }
        Err(error) => {
            eprintln!("scam-shield: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = AppConfig::from_values(cli.api_url.as_deref(), Some(&cli.origin))?;
    info!(
        target: "scam_shield",
        "startup version={APP_VERSION} base={:?} origin={}",
        config.service.base(),
        config.origin
    );
    let client = build_client(&config)?;

    match cli.command {
        Command::Analyze { mode, text, sample } => {
            let input = match (text, sample) {
                (Some(text), _) => text,
                (None, true) => sample_for(mode).to_string(),
                (None, false) => read_stdin()?,
            };
            let view = analyze_once(client, mode, input)?;
            emit(cli.format, &view, || render_result_text(&view))
        }
        Command::History => {
            let board = load_stats(&client)?;
            let view = HistoryView::project(&board);
            emit(cli.format, &view, || render_history_text(&view))
        }
        Command::Trends => {
            let board = load_stats(&client)?;
            let view = TrendsView::project(&board);
            emit(cli.format, &view, || render_trends_text(&view))
        }
    }
}

fn sample_for(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::Email => SAMPLE_EMAIL,
        AnalysisMode::Sms => SAMPLE_SMS,
        AnalysisMode::Url => SAMPLE_URL,
    }
}

fn read_stdin() -> Result<String, AppError> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    Ok(input)
}

fn emit<T: Serialize>(
    format: OutputFormat,
    view: &T,
    text: impl FnOnce() -> String,
) -> Result<(), AppError> {
    match format {
        OutputFormat::Text => println!("{}", text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(view)?),
    }
    Ok(())
}
