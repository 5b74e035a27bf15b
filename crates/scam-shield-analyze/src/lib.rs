#![warn(missing_docs)]
//! # scam-shield-analyze
//!
//! ## Purpose
//! Owns the analyze view's per-mode drafts and request lifecycle.
//!
//! ## Responsibilities
//! - Keep one independent draft per [`AnalysisMode`]; switching modes never
//!   clears another mode's draft.
//! - Reject blank submissions locally, before any network call.
//! - Drive `Idle -> Loading -> Success | Failed` transitions.
//! - Discard late responses using a monotonically increasing generation.
//!
//! ## Data flow
//! [`AnalyzeSession::begin_submit`] -> [`PendingAnalysis`] -> transport ->
//! [`AnalyzeSession::complete`] -> [`RequestState`].
//! [`AnalyzeController`] runs that cycle with the session lock released
//! during the network call.
//!
//! ## Concurrency
//! A submit issued while another is loading supersedes it: the session moves
//! to a new generation and the older response is dropped when it arrives.
//! [`AnalyzeSession::detach`] does the same for navigation away.
//!
//! ## Error model
//! Blank input is a [`SubmitError`] and leaves the state untouched. Transport
//! failures and contract violations become [`RequestState::Failed`], from
//! which a new submit is always possible.
//!
//! ## Security and privacy notes
//! Draft contents are never logged. Submissions are correlated in logs with a
//! truncated SHA-256 fingerprint of the input.
//!
//! ## Example
//! ```rust
//! use scam_shield_analyze::{AnalyzeSession, RequestState};
//! use scam_shield_contract::AnalysisMode;
//!
//! let mut session = AnalyzeSession::new();
//! session.update_input(AnalysisMode::Sms, "hello");
//! session.select_mode(AnalysisMode::Url);
//! session.select_mode(AnalysisMode::Sms);
//! assert_eq!(session.draft(AnalysisMode::Sms), "hello");
//! assert_eq!(session.state(), &RequestState::Idle);
//! ```

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};
use scam_shield_contract::{
    AnalysisMode, AnalysisRequest, AnalysisResult, ContractError, MALFORMED_RESPONSE_MESSAGE,
    analysis_result_from_value,
};
use scam_shield_transport::{ApiClient, TransportError};
use serde_json::Value;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Sample SMS draft.
pub const SAMPLE_SMS: &str = "M-PESA: Your account will be locked. Verify now at http://example-login-secure.com/verify to avoid suspension.";
/// Sample email draft.
pub const SAMPLE_EMAIL: &str = "Subject: Account Verification Required\nFrom: Support <support@secure-mail.example>\n\nDear customer, your account will be suspended within 24 hours. Verify now: http://bit.ly/abc";
/// Sample URL draft.
pub const SAMPLE_URL: &str = "http://paypal.com.verify-user.security-update.xyz/login";

const FINGERPRINT_HEX_LEN: usize = 16;

/// Lifecycle of the current analysis request.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestState {
    /// Nothing submitted yet, or the view was detached.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// Latest request produced a valid result.
    Success(AnalysisResult),
    /// Latest request failed with a user-facing message.
    Failed(String),
}

impl RequestState {
    /// `true` while a request is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    /// Result, when in `Success`.
    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            RequestState::Success(result) => Some(result),
            _ => None,
        }
    }

    /// Failure message, when in `Failed`.
    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// One accepted submission awaiting its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAnalysis {
    generation: u64,
    request: AnalysisRequest,
    fingerprint: String,
}

impl PendingAnalysis {
    /// Generation stamped at submit time.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Payload to send.
    pub fn request(&self) -> &AnalysisRequest {
        &self.request
    }

    /// Endpoint for the payload's mode.
    pub fn endpoint(&self) -> &'static str {
        self.request.endpoint()
    }

    /// Log-safe fingerprint of the submitted input.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// What happened to a response handed to [`AnalyzeSession::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The response changed the session state.
    Applied,
    /// The response belonged to a superseded or detached generation.
    Discarded,
}

/// Per-session analyze state machine.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeSession {
    mode: AnalysisMode,
    drafts: BTreeMap<AnalysisMode, String>,
    state: RequestState,
    generation: u64,
}

impl AnalyzeSession {
    /// Creates an idle session in the default mode with empty drafts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an idle session with every draft pre-filled with a sample.
    pub fn with_sample_drafts() -> Self {
        let mut session = Self::new();
        session.update_input(AnalysisMode::Email, SAMPLE_EMAIL);
        session.update_input(AnalysisMode::Sms, SAMPLE_SMS);
        session.update_input(AnalysisMode::Url, SAMPLE_URL);
        session
    }

    /// Active mode.
    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    /// Switches the active mode. Drafts and any in-flight request are kept.
    pub fn select_mode(&mut self, mode: AnalysisMode) {
        if self.mode != mode {
            debug!(target: "analyze", "mode_selected from={} to={mode}", self.mode);
        }
        self.mode = mode;
    }

    /// Stores the draft for `mode` only. No validation happens here.
    pub fn update_input(&mut self, mode: AnalysisMode, value: impl Into<String>) {
        self.drafts.insert(mode, value.into());
    }

    /// Draft for `mode`; empty when never entered.
    pub fn draft(&self, mode: AnalysisMode) -> &str {
        self.drafts.get(&mode).map_or("", String::as_str)
    }

    /// Draft for the active mode.
    pub fn active_draft(&self) -> &str {
        self.draft(self.mode)
    }

    /// `true` when the active draft would pass local validation.
    pub fn can_submit(&self) -> bool {
        !self.active_draft().trim().is_empty()
    }

    /// Current request state.
    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// Current generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Validates the active draft and moves to `Loading`.
    ///
    /// Allowed from any state. A submit while `Loading` supersedes the
    /// earlier request.
    ///
    /// # Errors
    /// Returns [`SubmitError::BlankInput`] when the active draft is blank; the
    /// state is left unchanged and nothing should be sent.
    pub fn begin_submit(&mut self) -> Result<PendingAnalysis, SubmitError> {
        let request = AnalysisRequest::for_mode(self.mode, self.active_draft())
            .map_err(SubmitError::from_contract)?;

        if self.state.is_loading() {
            info!(
                target: "analyze",
                "submit_superseding generation={} mode={}",
                self.generation,
                self.mode
            );
        }

        self.generation += 1;
        self.state = RequestState::Loading;

        let fingerprint = input_fingerprint(request.content());
        info!(
            target: "analyze",
            "submit_started generation={} mode={} fingerprint={fingerprint}",
            self.generation,
            self.mode
        );

        Ok(PendingAnalysis {
            generation: self.generation,
            request,
            fingerprint,
        })
    }

    /// Applies the outcome of `pending` if it is still current.
    ///
    /// Valid results move to `Success`; contract violations move to
    /// `Failed("malformed response")`; transport failures move to
    /// `Failed(message)` with the message verbatim.
    pub fn complete(
        &mut self,
        pending: &PendingAnalysis,
        outcome: Result<Value, TransportError>,
    ) -> Completion {
        if pending.generation != self.generation || !self.state.is_loading() {
            debug!(
                target: "analyze",
                "response_discarded generation={} current={}",
                pending.generation,
                self.generation
            );
            return Completion::Discarded;
        }

        self.state = match outcome.map(analysis_result_from_value) {
            Ok(Ok(result)) => {
                info!(
                    target: "analyze",
                    "submit_succeeded generation={} analysis_id={} risk_score={} risk_level={}",
                    pending.generation,
                    result.analysis_id,
                    result.risk_score,
                    result.risk_level
                );
                RequestState::Success(result)
            }
            Ok(Err(error)) => {
                warn!(
                    target: "analyze",
                    "contract_violation generation={} error={error}",
                    pending.generation
                );
                RequestState::Failed(MALFORMED_RESPONSE_MESSAGE.to_string())
            }
            Err(error) => {
                warn!(
                    target: "analyze",
                    "submit_failed generation={} status={:?} error={error}",
                    pending.generation,
                    error.status()
                );
                RequestState::Failed(error.to_string())
            }
        };

        Completion::Applied
    }

    /// Detaches the view: any in-flight response will be discarded and the
    /// last result or error is dropped. Drafts are kept.
    pub fn detach(&mut self) {
        self.generation += 1;
        self.state = RequestState::Idle;
        debug!(target: "analyze", "detached generation={}", self.generation);
    }
}

/// Runs full submit cycles for one session against a shared client.
pub struct AnalyzeController {
    session: Mutex<AnalyzeSession>,
    client: ApiClient,
}

impl AnalyzeController {
    /// Creates a controller around a fresh session.
    pub fn new(client: ApiClient) -> Self {
        Self::with_session(AnalyzeSession::new(), client)
    }

    /// Creates a controller around an existing session.
    pub fn with_session(session: AnalyzeSession, client: ApiClient) -> Self {
        Self {
            session: Mutex::new(session),
            client,
        }
    }

    /// See [`AnalyzeSession::select_mode`].
    pub fn select_mode(&self, mode: AnalysisMode) {
        self.lock().select_mode(mode);
    }

    /// See [`AnalyzeSession::update_input`].
    pub fn update_input(&self, mode: AnalysisMode, value: impl Into<String>) {
        self.lock().update_input(mode, value);
    }

    /// See [`AnalyzeSession::detach`].
    pub fn detach(&self) {
        self.lock().detach();
    }

    /// Clone of the current state.
    pub fn state(&self) -> RequestState {
        self.lock().state().clone()
    }

    /// Runs `read` against the session.
    pub fn inspect<R>(&self, read: impl FnOnce(&AnalyzeSession) -> R) -> R {
        read(&self.lock())
    }

    /// Submits the active draft and applies the response.
    ///
    /// The session lock is not held during the network call, so another
    /// submit may supersede this one while it is in flight.
    ///
    /// # Errors
    /// Returns [`SubmitError::BlankInput`] without any network call when the
    /// active draft is blank.
    pub fn submit(&self) -> Result<Completion, SubmitError> {
        let pending = self.lock().begin_submit()?;
        let outcome = self
            .client
            .post_json::<_, Value>(pending.endpoint(), pending.request());
        Ok(self.lock().complete(&pending, outcome))
    }

    fn lock(&self) -> MutexGuard<'_, AnalyzeSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Truncated hex SHA-256 of `content`, safe to log.
pub fn input_fingerprint(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(FINGERPRINT_HEX_LEN);
    encoded
}

/// Local submission errors. None of these reach the transport.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Active draft was empty or whitespace-only.
    #[error("{mode} input is empty; nothing was sent")]
    BlankInput {
        /// Mode whose draft was blank.
        mode: AnalysisMode,
    },
    /// Request could not be built.
    #[error("request rejected: {0}")]
    Request(ContractError),
}

impl SubmitError {
    fn from_contract(error: ContractError) -> Self {
        match error {
            ContractError::BlankInput { mode } => SubmitError::BlankInput { mode },
            other => SubmitError::Request(other),
        }
    }
}
