#![warn(missing_docs)]
//! # scam-shield-ui
//!
//! ## Purpose
//! Projects analyze and statistics state into display-ready view models.
//!
//! ## Responsibilities
//! - Render analysis results as text fields (gauge, percentages, domain age).
//! - Derive the analyze view's button, error, and placeholder state.
//! - Build history rows and trends series from a [`StatsBoard`].
//!
//! ## Data flow
//! [`AnalyzeSession`] / [`StatsBoard`] -> `*View::project` -> renderer.
//!
//! ## Ownership and lifetimes
//! Views own their strings so a renderer can hold them across state changes.
//!
//! ## Error model
//! Projections are total; there is nothing to fail here.

use chrono::{DateTime, Utc};
use scam_shield_analyze::{AnalyzeSession, RequestState};
use scam_shield_contract::{AnalysisMode, AnalysisResult, RecentScan, RiskLevel};
use scam_shield_stats::{SeriesPoint, StatsBoard};
use serde::Serialize;

/// Placeholder shown before any result exists.
pub const NO_RESULT_TEXT: &str = "No result yet. Paste content and click Analyze.";
/// History empty-state text.
pub const NO_SCANS_TEXT: &str = "No scans yet. Go to Analyze and run one.";
/// Subtitle shown before the first snapshot arrives.
pub const LOADING_TEXT: &str = "Loading...";

/// Visual tone for a risk level badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelTone {
    /// `LOW`
    Calm,
    /// `MEDIUM`
    Caution,
    /// `HIGH`
    Warning,
    /// `CRITICAL`
    Danger,
    /// Unrecognized label.
    Neutral,
}

/// Maps a level to its badge tone.
pub fn level_tone(level: &RiskLevel) -> LevelTone {
    match level {
        RiskLevel::Low => LevelTone::Calm,
        RiskLevel::Medium => LevelTone::Caution,
        RiskLevel::High => LevelTone::Warning,
        RiskLevel::Critical => LevelTone::Danger,
        RiskLevel::Other(_) => LevelTone::Neutral,
    }
}

/// Formats a [0, 1] ratio as a one-decimal percentage.
pub fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Input placeholder for a mode.
pub fn input_placeholder(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::Email => "Paste email text here...",
        AnalysisMode::Sms => "Paste SMS here...",
        AnalysisMode::Url => "Paste URL",
    }
}

/// Input hint for a mode.
pub fn input_hint(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::Email => {
            "For better accuracy, include subject/from lines and the message body."
        }
        AnalysisMode::Sms => {
            "Tip: include the full message including any links or phone numbers."
        }
        AnalysisMode::Url => {
            "The system inspects URL structure + reputation + (optional) domain age."
        }
    }
}

/// Display model of one analysis result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultView {
    /// `Analysis ID: <id>`
    pub subtitle: String,
    /// Score bounded to the gauge range.
    pub gauge_score: u8,
    /// Level label.
    pub risk_level: String,
    /// Badge tone.
    pub tone: LevelTone,
    /// Phishing probability, e.g. `91.0%`.
    pub ml_probability: String,
    /// Model confidence, e.g. `80.0%`.
    pub ml_confidence: String,
    /// Model identifier.
    pub model_version: String,
    /// `true` / `false`
    pub shortener: String,
    /// `true` / `false`
    pub reputation_hit: String,
    /// `Unknown` or `<n> days`.
    pub domain_age: String,
    /// Reasons in service order.
    pub reasons: Vec<String>,
    /// Actions in service order.
    pub recommended_actions: Vec<String>,
    /// URLs in service order.
    pub urls_found: Vec<String>,
    /// Redirect chain in hop order.
    pub redirects: Vec<String>,
}

impl ResultView {
    /// Projects a result. The result is not modified.
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            subtitle: format!("Analysis ID: {}", result.analysis_id),
            gauge_score: result.gauge_score(),
            risk_level: result.risk_level.label().to_string(),
            tone: level_tone(&result.risk_level),
            ml_probability: percent(result.ml.prob_phish),
            ml_confidence: percent(result.ml.confidence),
            model_version: result.ml.model_version.clone(),
            shortener: result.intel.shortener.to_string(),
            reputation_hit: result.intel.reputation_hit.to_string(),
            domain_age: result.intel.domain_age().to_string(),
            reasons: result.reasons.clone(),
            recommended_actions: result.recommended_actions.clone(),
            urls_found: result.intel.urls_found.clone(),
            redirects: result.intel.redirects.clone(),
        }
    }
}

/// Display model of the analyze view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzeView {
    /// Active mode.
    pub mode: AnalysisMode,
    /// Active draft.
    pub draft: String,
    /// `Analyze` or `Analyzing...`.
    pub button_label: &'static str,
    /// `false` when the active draft is blank.
    pub submit_enabled: bool,
    /// Failure message of the latest request.
    pub error: Option<String>,
    /// Latest result.
    pub result: Option<ResultView>,
    /// Shown when there is no result.
    pub placeholder: Option<&'static str>,
}

impl AnalyzeView {
    /// Projects the session state.
    ///
    /// Submitting stays enabled while loading; a new submit supersedes the
    /// in-flight one.
    pub fn project(session: &AnalyzeSession) -> Self {
        let state = session.state();
        let result = state.result().map(ResultView::from_result);
        Self {
            mode: session.mode(),
            draft: session.active_draft().to_string(),
            button_label: if state.is_loading() {
                "Analyzing..."
            } else {
                "Analyze"
            },
            submit_enabled: session.can_submit(),
            error: state.error().map(str::to_string),
            placeholder: match state {
                RequestState::Success(_) | RequestState::Loading => None,
                RequestState::Idle | RequestState::Failed(_) => Some(NO_RESULT_TEXT),
            },
            result,
        }
    }
}

/// One row of the history table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRow {
    /// Scan id.
    pub id: String,
    /// Scan time, UTC.
    pub time: String,
    /// Uppercase scan type.
    pub scan_type: String,
    /// `LEVEL • score`
    pub risk: String,
    /// Content excerpt.
    pub excerpt: String,
}

impl HistoryRow {
    /// Projects a recent scan.
    pub fn from_scan(scan: &RecentScan) -> Self {
        Self {
            id: scan.id.clone(),
            time: format_timestamp(&scan.created_at),
            scan_type: scan.scan_type.to_uppercase(),
            risk: format!("{} • {}", scan.risk_level, scan.risk_score),
            excerpt: scan.excerpt.clone(),
        }
    }
}

/// Display model of the history view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryView {
    /// `<total> total scans` or `Loading...`.
    pub subtitle: String,
    /// Rows in server order.
    pub rows: Vec<HistoryRow>,
    /// Shown when there are no rows.
    pub empty_message: Option<&'static str>,
    /// Last refresh failure.
    pub error: Option<String>,
}

impl HistoryView {
    /// Projects a stats board.
    pub fn project(board: &StatsBoard) -> Self {
        let rows: Vec<HistoryRow> = board.recent_scans().iter().map(HistoryRow::from_scan).collect();
        Self {
            subtitle: total_subtitle(board),
            empty_message: rows.is_empty().then_some(NO_SCANS_TEXT),
            rows,
            error: board.error().map(str::to_string),
        }
    }
}

/// Display model of the trends view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendsView {
    /// `<total> total scans` or `Loading...`.
    pub subtitle: String,
    /// Risk-level distribution.
    pub levels: Vec<SeriesPoint>,
    /// Scan volume by type.
    pub types: Vec<SeriesPoint>,
    /// Last refresh failure.
    pub error: Option<String>,
}

impl TrendsView {
    /// Projects a stats board.
    pub fn project(board: &StatsBoard) -> Self {
        Self {
            subtitle: total_subtitle(board),
            levels: board.level_series(),
            types: board.type_series(),
            error: board.error().map(str::to_string),
        }
    }
}

fn total_subtitle(board: &StatsBoard) -> String {
    match board.snapshot() {
        Some(snapshot) => format!("{} total scans", snapshot.total),
        None => LOADING_TEXT.to_string(),
    }
}

fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

#[cfg(test)]
mod tests {
    //! Unit tests for view projections.

    use scam_shield_contract::analysis_result_from_value;
    use scam_shield_transport::TransportError;
    use serde_json::{Value, json};

    use super::*;

    fn result(domain_age: Option<Value>) -> AnalysisResult {
        let mut raw = json!({
            "type": "url",
            "risk_score": 137,
            "risk_level": "CRITICAL",
            "ml": {"prob_phish": 0.9134, "confidence": 0.5, "model_version": "url-v2"},
            "intel": {"urls_found": ["http://bit.ly/abc"], "shortener": true, "reputation_hit": false},
            "reasons": ["Shortened link"],
            "recommended_actions": ["Do not open"],
            "analysis_id": "id-1"
        });
        if let Some(age) = domain_age {
            raw["intel"]["domain_age_days"] = age;
        }
        analysis_result_from_value(raw).expect("fixture should parse")
    }

    #[test]
    fn result_view_formats_fields() {
        let view = ResultView::from_result(&result(Some(json!(3))));
        assert_eq!(view.subtitle, "Analysis ID: id-1");
        assert_eq!(view.gauge_score, 100);
        assert_eq!(view.tone, LevelTone::Danger);
        assert_eq!(view.ml_probability, "91.3%");
        assert_eq!(view.ml_confidence, "50.0%");
        assert_eq!(view.shortener, "true");
        assert_eq!(view.domain_age, "3 days");
    }

    #[test]
    fn absent_and_null_domain_age_render_unknown() {
        let absent = ResultView::from_result(&result(None));
        let null = ResultView::from_result(&result(Some(Value::Null)));
        assert_eq!(absent.domain_age, "Unknown");
        assert_eq!(absent, null);
    }

    #[test]
    fn analyze_view_tracks_session_state() {
        let mut session = AnalyzeSession::new();
        let idle = AnalyzeView::project(&session);
        assert!(!idle.submit_enabled);
        assert_eq!(idle.placeholder, Some(NO_RESULT_TEXT));

        session.update_input(AnalysisMode::Sms, "hello");
        let pending = session.begin_submit().unwrap();
        let loading = AnalyzeView::project(&session);
        assert_eq!(loading.button_label, "Analyzing...");
        assert!(loading.submit_enabled);
        assert_eq!(loading.placeholder, None);

        session.complete(
            &pending,
            Err(TransportError::Network("connection refused".to_string())),
        );
        let failed = AnalyzeView::project(&session);
        assert_eq!(failed.button_label, "Analyze");
        assert_eq!(failed.error.as_deref(), Some("network failure: connection refused"));
    }

    #[test]
    fn history_and_trends_project_board() {
        let mut board = StatsBoard::new();
        assert_eq!(HistoryView::project(&board).subtitle, LOADING_TEXT);
        assert_eq!(HistoryView::project(&board).empty_message, Some(NO_SCANS_TEXT));

        board
            .apply(Ok(json!({
                "total": 3,
                "by_type": {"sms": 2, "url": 1},
                "by_level": {"HIGH": 2, "LOW": 1},
                "recent": [{
                    "id": "r1",
                    "type": "sms",
                    "risk_score": 82,
                    "risk_level": "HIGH",
                    "created_at": "2024-05-01T12:30:00Z",
                    "excerpt": "M-PESA: Your account will be locked."
                }]
            })))
            .unwrap();

        let history = HistoryView::project(&board);
        assert_eq!(history.subtitle, "3 total scans");
        assert_eq!(history.rows[0].scan_type, "SMS");
        assert_eq!(history.rows[0].risk, "HIGH • 82");
        assert_eq!(history.rows[0].time, "2024-05-01 12:30:00 UTC");
        assert_eq!(history.empty_message, None);

        let trends = TrendsView::project(&board);
        assert_eq!(trends.types, vec![SeriesPoint::new("sms", 2), SeriesPoint::new("url", 1)]);
        assert_eq!(trends.levels[1], SeriesPoint::new("LOW", 1));
    }
}
