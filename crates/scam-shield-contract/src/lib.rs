#![warn(missing_docs)]
//! # scam-shield-contract
//!
//! ## Purpose
//! Defines the request shapes, analysis result contract, and statistics
//! snapshot contract shared by every `scam-shield` view.
//!
//! ## Responsibilities
//! - Map analysis modes to their request payloads and endpoints.
//! - Parse and validate analysis results before they reach presentation.
//! - Parse statistics snapshots while preserving server category order.
//! - Keep display-bounded derivations (gauge score, domain age) separate from
//!   the stored raw values.
//!
//! ## Data flow
//! Draft text -> [`AnalysisRequest::for_mode`] -> transport.
//! Raw JSON -> [`analysis_result_from_value`] / [`stats_snapshot_from_value`]
//! -> orchestrator state or aggregator.
//!
//! ## Ownership and lifetimes
//! Parsed values are owned structs so they outlive the transient response
//! buffers they were decoded from.
//!
//! ## Error model
//! Invalid JSON, missing mandatory fields, and blank identifiers return
//! [`ContractError`]. Optional informational fields (`notes`, `redirects`)
//! default to empty instead of failing.
//!
//! ## Example
//! ```rust
//! use scam_shield_contract::{AnalysisMode, AnalysisRequest};
//!
//! let request = AnalysisRequest::for_mode(AnalysisMode::Url, "http://bit.ly/x").unwrap();
//! assert_eq!(request.endpoint(), "/api/v1/analyze-url");
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Endpoint for email analysis.
pub const ANALYZE_EMAIL_PATH: &str = "/api/v1/analyze-email";
/// Endpoint for SMS analysis.
pub const ANALYZE_SMS_PATH: &str = "/api/v1/analyze-sms";
/// Endpoint for URL analysis.
pub const ANALYZE_URL_PATH: &str = "/api/v1/analyze-url";
/// Endpoint for the historical statistics snapshot.
pub const STATS_PATH: &str = "/api/v1/stats";

/// Fixed user-facing message for responses that violate the result contract.
pub const MALFORMED_RESPONSE_MESSAGE: &str = "malformed response";

/// Upper bound of the risk gauge.
pub const GAUGE_MAX: u8 = 100;

/// Kind of content submitted for analysis.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Email body, optionally with subject/from lines inlined.
    Email,
    /// SMS message text.
    #[default]
    Sms,
    /// A single URL.
    Url,
}

impl AnalysisMode {
    /// All modes in selector order.
    pub const ALL: [AnalysisMode; 3] = [AnalysisMode::Email, AnalysisMode::Sms, AnalysisMode::Url];

    /// Returns the analysis endpoint targeted by this mode.
    pub fn endpoint(self) -> &'static str {
        match self {
            AnalysisMode::Email => ANALYZE_EMAIL_PATH,
            AnalysisMode::Sms => ANALYZE_SMS_PATH,
            AnalysisMode::Url => ANALYZE_URL_PATH,
        }
    }

    /// Lowercase wire name (`email`, `sms`, `url`).
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisMode::Email => "email",
            AnalysisMode::Sms => "sms",
            AnalysisMode::Url => "url",
        }
    }

    /// Uppercase name used for chart categories and badges.
    pub fn display_name(self) -> &'static str {
        match self {
            AnalysisMode::Email => "EMAIL",
            AnalysisMode::Sms => "SMS",
            AnalysisMode::Url => "URL",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for AnalysisMode {
    type Err = ContractError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        AnalysisMode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| ContractError::UnknownMode(normalized.to_string()))
    }
}

/// Outgoing analysis payload; exactly one field, matching the mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisRequest {
    /// `{ "body": ... }` sent to the email endpoint.
    Email {
        /// Raw email text.
        body: String,
    },
    /// `{ "text": ... }` sent to the SMS endpoint.
    Sms {
        /// Raw SMS text.
        text: String,
    },
    /// `{ "url": ... }` sent to the URL endpoint.
    Url {
        /// URL to inspect.
        url: String,
    },
}

impl AnalysisRequest {
    /// Builds the request for `mode` from user input.
    ///
    /// The input is sent as typed; only the blank check trims it.
    ///
    /// # Errors
    /// Returns [`ContractError::BlankInput`] when the input is empty or
    /// whitespace-only.
    pub fn for_mode(mode: AnalysisMode, input: impl Into<String>) -> Result<Self, ContractError> {
        let input = input.into();
        if input.trim().is_empty() {
            return Err(ContractError::BlankInput { mode });
        }

        Ok(match mode {
            AnalysisMode::Email => AnalysisRequest::Email { body: input },
            AnalysisMode::Sms => AnalysisRequest::Sms { text: input },
            AnalysisMode::Url => AnalysisRequest::Url { url: input },
        })
    }

    /// Mode this payload belongs to.
    pub fn mode(&self) -> AnalysisMode {
        match self {
            AnalysisRequest::Email { .. } => AnalysisMode::Email,
            AnalysisRequest::Sms { .. } => AnalysisMode::Sms,
            AnalysisRequest::Url { .. } => AnalysisMode::Url,
        }
    }

    /// Endpoint this payload is posted to.
    pub fn endpoint(&self) -> &'static str {
        self.mode().endpoint()
    }

    /// The single populated field.
    pub fn content(&self) -> &str {
        match self {
            AnalysisRequest::Email { body } => body,
            AnalysisRequest::Sms { text } => text,
            AnalysisRequest::Url { url } => url,
        }
    }
}

/// Ordinal severity label reported by the analysis service.
///
/// Labels outside the known set are kept verbatim in [`RiskLevel::Other`] so a
/// newly introduced server level does not break the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskLevel {
    /// `LOW`
    Low,
    /// `MEDIUM`
    Medium,
    /// `HIGH`
    High,
    /// `CRITICAL`
    Critical,
    /// Unrecognized label, preserved as received.
    Other(String),
}

impl RiskLevel {
    /// Label as displayed and sent on the wire.
    pub fn label(&self) -> &str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
            RiskLevel::Other(label) => label,
        }
    }

    /// Ordinal rank, `0` for unrecognized labels.
    pub fn rank(&self) -> u8 {
        match self {
            RiskLevel::Low => 1,
            RiskLevel::Medium => 2,
            RiskLevel::High => 3,
            RiskLevel::Critical => 4,
            RiskLevel::Other(_) => 0,
        }
    }
}

impl From<String> for RiskLevel {
    fn from(label: String) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "LOW" => RiskLevel::Low,
            "MEDIUM" => RiskLevel::Medium,
            "HIGH" => RiskLevel::High,
            "CRITICAL" => RiskLevel::Critical,
            _ => RiskLevel::Other(label),
        }
    }
}

impl From<RiskLevel> for String {
    fn from(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Machine-learning verdict attached to a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlAssessment {
    /// Probability of phishing in [0.0, 1.0].
    pub prob_phish: f64,
    /// Model confidence in [0.0, 1.0].
    pub confidence: f64,
    /// Model identifier.
    pub model_version: String,
}

/// Link intelligence gathered by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkIntel {
    /// URLs extracted from the content, in service order.
    pub urls_found: Vec<String>,
    /// Whether a known URL shortener was used.
    pub shortener: bool,
    /// Domain age in days; absent and `null` both decode to `None`.
    #[serde(default)]
    pub domain_age_days: Option<i64>,
    /// Whether a reputation list matched.
    pub reputation_hit: bool,
    /// Redirect chain, in hop order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub redirects: Vec<String>,
    /// Free-form service notes.
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: Map<String, Value>,
}

impl LinkIntel {
    /// Domain age as a display-ready value.
    pub fn domain_age(&self) -> DomainAge {
        match self.domain_age_days {
            Some(days) => DomainAge::Days(days),
            None => DomainAge::Unknown,
        }
    }
}

/// Domain age with "absent" and "null" collapsed into one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainAge {
    /// No age reported.
    Unknown,
    /// Age in days.
    Days(i64),
}

impl fmt::Display for DomainAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainAge::Unknown => f.write_str("Unknown"),
            DomainAge::Days(days) => write!(f, "{days} days"),
        }
    }
}

/// Validated analysis result for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Echo of the analyzed mode (`email`, `sms`, `url`).
    #[serde(rename = "type", default)]
    pub analysis_type: String,
    /// Raw score as reported; nominally in [0, 100].
    #[serde(deserialize_with = "deserialize_score")]
    pub risk_score: i64,
    /// Severity label, trusted as given.
    pub risk_level: RiskLevel,
    /// ML verdict.
    pub ml: MlAssessment,
    /// Link intelligence.
    pub intel: LinkIntel,
    /// Human-readable reasons, display order.
    pub reasons: Vec<String>,
    /// Recommended actions, display order.
    pub recommended_actions: Vec<String>,
    /// Opaque identifier for correlation.
    pub analysis_id: String,
}

impl AnalysisResult {
    /// Score bounded to the gauge range. The stored score is not modified.
    pub fn gauge_score(&self) -> u8 {
        self.risk_score.clamp(0, i64::from(GAUGE_MAX)) as u8
    }

    /// Mode echoed by the service, when recognized.
    pub fn mode(&self) -> Option<AnalysisMode> {
        self.analysis_type.parse().ok()
    }
}

/// Parses raw JSON into a validated analysis result.
///
/// # Errors
/// Returns [`ContractError::Decode`] for invalid JSON or missing/mistyped
/// required fields, and [`ContractError::InvalidContract`] for a blank
/// `analysis_id`.
pub fn parse_analysis_result(raw: &str) -> Result<AnalysisResult, ContractError> {
    let parsed: AnalysisResult = serde_json::from_str(raw)?;
    validate_analysis_result(parsed)
}

/// Validates an already-decoded JSON value as an analysis result.
///
/// # Errors
/// Same as [`parse_analysis_result`].
pub fn analysis_result_from_value(value: Value) -> Result<AnalysisResult, ContractError> {
    let parsed: AnalysisResult = serde_json::from_value(value)?;
    validate_analysis_result(parsed)
}

fn validate_analysis_result(parsed: AnalysisResult) -> Result<AnalysisResult, ContractError> {
    if parsed.analysis_id.trim().is_empty() {
        return Err(ContractError::InvalidContract(
            "analysis_id is empty".to_string(),
        ));
    }

    Ok(parsed)
}

/// Category counts in the order the server listed them.
///
/// A category absent from the map means "no data"; a present key with a zero
/// count is a real zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCounts(Vec<(String, u64)>);

impl CategoryCounts {
    /// Iterates `(name, count)` pairs in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Count for `name`, or `None` when the category is absent.
    pub fn get(&self, name: &str) -> Option<u64> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, count)| *count)
    }

    /// Number of present categories.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when no category is present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    // A repeated key keeps its first position and takes the latest count.
    fn upsert(&mut self, name: String, count: u64) {
        match self.0.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = count,
            None => self.0.push((name, count)),
        }
    }
}

impl FromIterator<(String, u64)> for CategoryCounts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut counts = CategoryCounts::default();
        for (name, count) in iter {
            counts.upsert(name, count);
        }
        counts
    }
}

impl Serialize for CategoryCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, count) in &self.0 {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CountsVisitor;

        impl<'de> Visitor<'de> for CountsVisitor {
            type Value = CategoryCounts;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of category names to non-negative counts")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(CategoryCounts::default())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut counts = CategoryCounts::default();
                while let Some((name, count)) = access.next_entry::<String, u64>()? {
                    counts.upsert(name, count);
                }
                Ok(counts)
            }
        }

        deserializer.deserialize_any(CountsVisitor)
    }
}

/// One row of the recent-scans list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentScan {
    /// Opaque scan id.
    #[serde(deserialize_with = "deserialize_opaque_id")]
    pub id: String,
    /// Scan mode as stored by the service.
    #[serde(rename = "type")]
    pub scan_type: String,
    /// Raw score.
    #[serde(deserialize_with = "deserialize_score")]
    pub risk_score: i64,
    /// Severity label.
    pub risk_level: RiskLevel,
    /// Scan time (UTC).
    pub created_at: DateTime<Utc>,
    /// Short excerpt of the scanned content.
    #[serde(default)]
    pub excerpt: String,
}

/// Aggregate view of historical scans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Total number of scans.
    pub total: u64,
    /// Counts keyed by mode name.
    #[serde(default)]
    pub by_type: CategoryCounts,
    /// Counts keyed by risk level.
    #[serde(default)]
    pub by_level: CategoryCounts,
    /// Most-recent-first scans.
    #[serde(default, deserialize_with = "null_as_default")]
    pub recent: Vec<RecentScan>,
}

/// Parses raw JSON into a statistics snapshot.
///
/// # Errors
/// Returns [`ContractError::Decode`] for invalid JSON or a mistyped shape.
pub fn parse_stats_snapshot(raw: &str) -> Result<StatsSnapshot, ContractError> {
    Ok(serde_json::from_str(raw)?)
}

/// Validates an already-decoded JSON value as a statistics snapshot.
///
/// # Errors
/// Same as [`parse_stats_snapshot`].
pub fn stats_snapshot_from_value(value: Value) -> Result<StatsSnapshot, ContractError> {
    Ok(serde_json::from_value(value)?)
}

fn deserialize_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let number = Number::deserialize(deserializer)?;
    if let Some(score) = number.as_i64() {
        return Ok(score);
    }
    if number.as_u64().is_some() {
        return Ok(i64::MAX);
    }
    match number.as_f64() {
        Some(score) if score.is_finite() => Ok(score.round() as i64),
        _ => Err(de::Error::custom("risk_score is not a finite number")),
    }
}

fn deserialize_opaque_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(de::Error::custom(format!(
            "id must be a string or number, got {other}"
        ))),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Contract errors.
#[derive(Debug, Error)]
pub enum ContractError {
    /// JSON decode failure, including missing or mistyped required fields.
    #[error("contract decode failure: {0}")]
    Decode(#[from] serde_json::Error),
    /// Decoded payload violates contract invariants.
    #[error("contract violation: {0}")]
    InvalidContract(String),
    /// Request input was empty or whitespace-only.
    #[error("{mode} input must be non-empty")]
    BlankInput {
        /// Mode whose input was blank.
        mode: AnalysisMode,
    },
    /// Mode name not recognized.
    #[error("unknown analysis mode: {0}")]
    UnknownMode(String),
}
