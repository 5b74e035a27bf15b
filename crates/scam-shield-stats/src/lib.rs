#![warn(missing_docs)]
//! # scam-shield-stats
//!
//! ## Purpose
//! Turns statistics snapshots into chart-ready series and owns the per-view
//! snapshot loader used by the history and trends views.
//!
//! ## Responsibilities
//! - Convert category counts into ordered `{name, value}` series.
//! - Keep absent categories absent and zero counts as zero.
//! - Keep the server's category and recent-scan order.
//! - Load snapshots independently from the analyze orchestrator.
//!
//! ## Data flow
//! `GET /api/v1/stats` -> [`StatsBoard::refresh`] -> [`StatsSnapshot`] ->
//! [`level_series`] / [`type_series`] / [`recent_scans`] -> charts and table.
//!
//! ## Error model
//! Fetch failures are recorded on the board that requested them and returned
//! as [`StatsError`]; the last good snapshot stays visible.

use log::{info, warn};
use scam_shield_contract::{
    CategoryCounts, ContractError, MALFORMED_RESPONSE_MESSAGE, RecentScan, STATS_PATH,
    StatsSnapshot, stats_snapshot_from_value,
};
use scam_shield_transport::{ApiClient, TransportError};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// One chart entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    /// Category name as reported.
    pub name: String,
    /// Count for the category.
    pub value: u64,
}

impl SeriesPoint {
    /// Creates a series point.
    pub fn new(name: impl Into<String>, value: u64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Converts counts into a series in source order.
///
/// Every present key yields one point, zero counts included. Absent keys
/// yield nothing.
pub fn to_series(counts: &CategoryCounts) -> Vec<SeriesPoint> {
    counts
        .iter()
        .map(|(name, value)| SeriesPoint::new(name, value))
        .collect()
}

/// Risk-level series; empty before the first load.
pub fn level_series(snapshot: Option<&StatsSnapshot>) -> Vec<SeriesPoint> {
    snapshot.map_or_else(Vec::new, |snapshot| to_series(&snapshot.by_level))
}

/// Scan-type series; empty before the first load.
pub fn type_series(snapshot: Option<&StatsSnapshot>) -> Vec<SeriesPoint> {
    snapshot.map_or_else(Vec::new, |snapshot| to_series(&snapshot.by_type))
}

/// Recent scans in server order (most recent first).
pub fn recent_scans(snapshot: Option<&StatsSnapshot>) -> &[RecentScan] {
    snapshot
        .map(|snapshot| snapshot.recent.as_slice())
        .unwrap_or(&[])
}

/// Snapshot loader owned by one view.
#[derive(Debug, Clone, Default)]
pub struct StatsBoard {
    snapshot: Option<StatsSnapshot>,
    error: Option<String>,
}

impl StatsBoard {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last successfully loaded snapshot.
    pub fn snapshot(&self) -> Option<&StatsSnapshot> {
        self.snapshot.as_ref()
    }

    /// Message of the last failed refresh, cleared by the next success.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetches a fresh snapshot.
    ///
    /// # Errors
    /// Returns [`StatsError`] when the fetch or contract check fails; the
    /// error message is also recorded on the board.
    pub fn refresh(&mut self, client: &ApiClient) -> Result<&StatsSnapshot, StatsError> {
        let outcome = client.get_json::<Value>(STATS_PATH);
        self.apply(outcome)
    }

    /// Applies a fetched body. A success fully replaces the snapshot.
    ///
    /// # Errors
    /// Same as [`StatsBoard::refresh`].
    pub fn apply(
        &mut self,
        outcome: Result<Value, TransportError>,
    ) -> Result<&StatsSnapshot, StatsError> {
        let parsed = outcome
            .map_err(StatsError::from)
            .and_then(|value| stats_snapshot_from_value(value).map_err(StatsError::from));

        match parsed {
            Ok(snapshot) => {
                info!(
                    target: "stats",
                    "snapshot_loaded total={} recent={}",
                    snapshot.total,
                    snapshot.recent.len()
                );
                self.error = None;
                Ok(&*self.snapshot.insert(snapshot))
            }
            Err(error) => {
                warn!(target: "stats", "snapshot_failed error={error}");
                self.error = Some(error.user_message());
                Err(error)
            }
        }
    }

    /// See [`level_series`].
    pub fn level_series(&self) -> Vec<SeriesPoint> {
        level_series(self.snapshot())
    }

    /// See [`type_series`].
    pub fn type_series(&self) -> Vec<SeriesPoint> {
        type_series(self.snapshot())
    }

    /// See [`recent_scans`].
    pub fn recent_scans(&self) -> &[RecentScan] {
        recent_scans(self.snapshot())
    }
}

/// Snapshot load errors.
#[derive(Debug, Error)]
pub enum StatsError {
    /// Fetch failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Body did not match the snapshot contract.
    #[error("stats contract violation: {0}")]
    Contract(#[from] ContractError),
}

impl StatsError {
    /// Message shown by the view that requested the load.
    pub fn user_message(&self) -> String {
        match self {
            StatsError::Transport(error) => error.to_string(),
            StatsError::Contract(_) => MALFORMED_RESPONSE_MESSAGE.to_string(),
        }
    }
}
