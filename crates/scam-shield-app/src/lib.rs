#![warn(missing_docs)]
//! # scam-shield-app
//!
//! ## Purpose
//! Wires configuration, logging, transport, the analyze controller, and the
//! stats boards into the `scam-shield` command-line client.
//!
//! ## Responsibilities
//! - Resolve the service base and native origin once at startup.
//! - Initialize `env_logger` with stage-tagged log lines.
//! - Run one analysis or one stats load and render it as text or JSON.
//!
//! ## Data flow
//! [`AppConfig`] -> [`build_client`] -> [`AnalyzeController`] / [`StatsBoard`]
//! -> `scam_shield_ui` views -> [`render_result_text`] and friends.
//!
//! ## Error model
//! Subsystem failures are wrapped in [`AppError`]. A failed analysis is an
//! [`AppError::AnalysisFailed`] carrying the same message the view shows.
//!
//! ## Security and privacy notes
//! Submitted content is never logged; see `scam_shield_analyze`.

use std::io::Write;
use std::sync::Arc;

use log::LevelFilter;
use scam_shield_analyze::{AnalyzeController, AnalyzeSession, RequestState, SubmitError};
use scam_shield_contract::AnalysisMode;
use scam_shield_stats::{StatsBoard, StatsError};
use scam_shield_transport::{
    ApiClient, ConfigError, DEFAULT_ORIGIN, ReqwestTransport, ServiceConfig, TransportError,
    validate_base_url,
};
use scam_shield_ui::{HistoryView, ResultView, TrendsView};
use thiserror::Error;
use url::Url;

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("SCAM_SHIELD_VERSION");

/// Environment variable holding the native origin for same-origin paths.
pub const ORIGIN_ENV: &str = "SCAM_SHIELD_ORIGIN";

/// Startup configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Service base resolution.
    pub service: ServiceConfig,
    /// Origin that same-origin paths resolve against.
    pub origin: Url,
}

impl AppConfig {
    /// Builds configuration from optional override values.
    ///
    /// # Errors
    /// Returns [`AppError::Config`] when either value is not an absolute
    /// `http`/`https` URL.
    pub fn from_values(api_url: Option<&str>, origin: Option<&str>) -> Result<Self, AppError> {
        let service = ServiceConfig::from_override(api_url)?;
        let origin = match origin.map(str::trim).filter(|value| !value.is_empty()) {
            Some(raw) => validate_base_url(raw)?,
            None => validate_base_url(DEFAULT_ORIGIN)?,
        };
        Ok(Self { service, origin })
    }

    /// Reads configuration from the process environment.
    ///
    /// # Errors
    /// Same as [`AppConfig::from_values`].
    pub fn from_env() -> Result<Self, AppError> {
        let api_url = std::env::var(scam_shield_transport::API_URL_ENV).ok();
        let origin = std::env::var(ORIGIN_ENV).ok();
        Self::from_values(api_url.as_deref(), origin.as_deref())
    }
}

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Initializes stderr logging. `RUST_LOG` is honored; `level` caps this
/// workspace's own crates.
///
/// # Errors
/// Returns [`AppError::Logging`] when a logger is already installed.
pub fn init_logging(level: LevelFilter) -> Result<(), AppError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(LevelFilter::Warn);
    builder.filter_module("reqwest", LevelFilter::Info);
    builder.filter_module("hyper", LevelFilter::Info);
    for target in ["transport", "analyze", "stats", "scam_shield_app", "scam_shield"] {
        builder.filter_module(target, level);
    }
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} {:<5} {} {}",
            buf.timestamp_millis(),
            record.level(),
            record.target(),
            record.args()
        )
    });

    builder
        .try_init()
        .map_err(|error| AppError::Logging(error.to_string()))
}

/// Builds an API client over the blocking `reqwest` transport.
///
/// # Errors
/// Returns [`AppError::Transport`] when the HTTP client cannot start.
pub fn build_client(config: &AppConfig) -> Result<ApiClient, AppError> {
    let transport = ReqwestTransport::new(config.origin.clone())?;
    Ok(ApiClient::new(config.service.clone(), Arc::new(transport)))
}

/// Submits `input` in `mode` and returns the rendered result.
///
/// # Errors
/// Returns [`AppError::Submit`] for blank input (nothing is sent) and
/// [`AppError::AnalysisFailed`] when the session ends in `Failed`.
pub fn analyze_once(
    client: ApiClient,
    mode: AnalysisMode,
    input: impl Into<String>,
) -> Result<ResultView, AppError> {
    let mut session = AnalyzeSession::new();
    session.select_mode(mode);
    session.update_input(mode, input);

    let controller = AnalyzeController::with_session(session, client);
    controller.submit()?;

    match controller.state() {
        RequestState::Success(result) => Ok(ResultView::from_result(&result)),
        RequestState::Failed(message) => Err(AppError::AnalysisFailed(message)),
        RequestState::Idle | RequestState::Loading => Err(AppError::AnalysisFailed(
            "analysis did not complete".to_string(),
        )),
    }
}

/// Loads one stats snapshot into a fresh board.
///
/// # Errors
/// Returns [`AppError::Stats`] when the snapshot cannot be loaded.
pub fn load_stats(client: &ApiClient) -> Result<StatsBoard, AppError> {
    let mut board = StatsBoard::new();
    board.refresh(client)?;
    Ok(board)
}

/// Renders a result view as plain text.
pub fn render_result_text(view: &ResultView) -> String {
    let mut lines = vec![
        format!("Risk score: {}/100 ({})", view.gauge_score, view.risk_level),
        view.subtitle.clone(),
        format!(
            "ML probability: {} (confidence {}, model {})",
            view.ml_probability, view.ml_confidence, view.model_version
        ),
        format!(
            "Shortener: {} | Reputation hit: {} | Domain age: {}",
            view.shortener, view.reputation_hit, view.domain_age
        ),
    ];
    push_section(&mut lines, "Why it was flagged", &view.reasons);
    push_section(&mut lines, "Recommended actions", &view.recommended_actions);
    push_section(&mut lines, "URLs found", &view.urls_found);
    push_section(&mut lines, "Redirects", &view.redirects);
    lines.join("\n")
}

/// Renders the history view as plain text.
pub fn render_history_text(view: &HistoryView) -> String {
    let mut lines = vec![format!("Recent scans ({})", view.subtitle)];
    if let Some(error) = &view.error {
        lines.push(format!("error: {error}"));
    }
    if let Some(empty) = view.empty_message {
        lines.push(empty.to_string());
    }
    for row in &view.rows {
        lines.push(format!(
            "{}  {:<5}  {:<14}  {}",
            row.time, row.scan_type, row.risk, row.excerpt
        ));
    }
    lines.join("\n")
}

/// Renders the trends view as plain text.
pub fn render_trends_text(view: &TrendsView) -> String {
    let mut lines = vec![format!("Risk levels ({})", view.subtitle)];
    if let Some(error) = &view.error {
        lines.push(format!("error: {error}"));
    }
    lines.extend(
        view.levels
            .iter()
            .map(|point| format!("  {:<10} {}", point.name, point.value)),
    );
    lines.push("Scan types".to_string());
    lines.extend(
        view.types
            .iter()
            .map(|point| format!("  {:<10} {}", point.name, point.value)),
    );
    lines.join("\n")
}

fn push_section(lines: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    lines.push(format!("{title}:"));
    lines.extend(items.iter().map(|item| format!("  - {item}")));
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration was invalid.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// Transport could not be built or a request failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    /// Submission rejected locally.
    #[error("{0}")]
    Submit(#[from] SubmitError),
    /// Analysis ended in `Failed`.
    #[error("analysis failed: {0}")]
    AnalysisFailed(String),
    /// Stats snapshot could not be loaded.
    #[error("stats error: {0}")]
    Stats(#[from] StatsError),
    /// Logger initialization failed.
    #[error("logging error: {0}")]
    Logging(String),
    /// Output encoding failed.
    #[error("output error: {0}")]
    Output(#[from] serde_json::Error),
    /// Reading input failed.
    #[error("input error: {0}")]
    Input(#[from] std::io::Error),
}
