//! Shared fixtures for app integration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use scam_shield_transport::{
    ApiClient, HttpRequest, HttpResponse, HttpTransport, ServiceConfig, TransportError,
};
use serde_json::{Value, json};

/// Transport that replays queued responses and records every request.
#[allow(dead_code)]
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_raw(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .expect("response queue lock should work")
            .push_back(Ok(HttpResponse {
                status,
                body: body.to_string(),
            }));
    }

    pub fn push_json(&self, status: u16, body: &Value) {
        self.push_raw(status, &body.to_string());
    }

    pub fn push_network_error(&self, message: &str) {
        self.responses
            .lock()
            .expect("response queue lock should work")
            .push_back(Err(TransportError::Network(message.to_string())));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .expect("request log lock should work")
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests().len()
    }
}

impl HttpTransport for ScriptedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests
            .lock()
            .expect("request log lock should work")
            .push(request.clone());
        self.responses
            .lock()
            .expect("response queue lock should work")
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted response".to_string())))
    }
}

/// Same-origin client over `transport`.
#[allow(dead_code)]
pub fn client(transport: Arc<dyn HttpTransport>) -> ApiClient {
    ApiClient::new(ServiceConfig::same_origin(), transport)
}

/// Valid analysis result body.
#[allow(dead_code)]
pub fn analysis_result(kind: &str, analysis_id: &str, score: i64, level: &str) -> Value {
    json!({
        "type": kind,
        "risk_score": score,
        "risk_level": level,
        "ml": {"prob_phish": 0.87, "confidence": 0.74, "model_version": "text-tfidf-lr-v1"},
        "intel": {
            "urls_found": ["http://example-login-secure.com/verify"],
            "shortener": false,
            "domain_age_days": null,
            "reputation_hit": true,
            "redirects": [],
            "notes": {}
        },
        "reasons": ["Urgency or threat language detected", "Link uses a look-alike login domain"],
        "recommended_actions": ["Do not click the link", "Contact the provider through official channels"],
        "analysis_id": analysis_id
    })
}

/// Body decoded from a recorded request.
#[allow(dead_code)]
pub fn request_body(request: &HttpRequest) -> Value {
    serde_json::from_slice(request.body.as_deref().expect("request should carry a body"))
        .expect("request body should be json")
}
