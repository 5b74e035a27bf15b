//! Integration tests for the superseding double-submit policy.

mod common;

use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex};
use std::thread;

use scam_shield_analyze::{AnalyzeController, Completion};
use scam_shield_contract::AnalysisMode;
use scam_shield_transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};

/// Holds the request whose body mentions "first" until released.
struct GatedTransport {
    started: Mutex<Sender<()>>,
    release: Mutex<Receiver<()>>,
}

impl HttpTransport for GatedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let body = String::from_utf8_lossy(request.body.as_deref().unwrap_or_default()).to_string();
        let analysis_id = if body.contains("first") {
            self.started
                .lock()
                .expect("started lock should work")
                .send(())
                .expect("test should be waiting");
            self.release
                .lock()
                .expect("release lock should work")
                .recv()
                .expect("test should release the first request");
            "first"
        } else {
            "second"
        };

        Ok(HttpResponse {
            status: 200,
            body: common::analysis_result("sms", analysis_id, 50, "MEDIUM").to_string(),
        })
    }
}

#[test]
fn supersede_policy_tests_keep_only_the_latest_response() {
    let (started_tx, started_rx) = channel();
    let (release_tx, release_rx) = channel();
    let transport = Arc::new(GatedTransport {
        started: Mutex::new(started_tx),
        release: Mutex::new(release_rx),
    });
    let controller = Arc::new(AnalyzeController::new(common::client(transport)));

    controller.update_input(AnalysisMode::Sms, "first message");
    let worker = {
        let controller = Arc::clone(&controller);
        thread::spawn(move || controller.submit())
    };

    started_rx.recv().expect("first request should start");
    assert!(controller.state().is_loading());

    controller.update_input(AnalysisMode::Sms, "second message");
    assert_eq!(controller.submit().expect("second submit should run"), Completion::Applied);

    release_tx.send(()).expect("worker should be waiting");
    let first = worker
        .join()
        .expect("worker should not panic")
        .expect("first submit should run");

    assert_eq!(first, Completion::Discarded);
    assert_eq!(
        controller.state().result().map(|result| result.analysis_id.clone()),
        Some("second".to_string())
    );
}

#[test]
fn supersede_policy_tests_detach_drops_late_response() {
    let (started_tx, started_rx) = channel();
    let (release_tx, release_rx) = channel();
    let transport = Arc::new(GatedTransport {
        started: Mutex::new(started_tx),
        release: Mutex::new(release_rx),
    });
    let controller = Arc::new(AnalyzeController::new(common::client(transport)));

    controller.update_input(AnalysisMode::Sms, "first message");
    let worker = {
        let controller = Arc::clone(&controller);
        thread::spawn(move || controller.submit())
    };

    started_rx.recv().expect("first request should start");
    controller.detach();
    release_tx.send(()).expect("worker should be waiting");

    let outcome = worker
        .join()
        .expect("worker should not panic")
        .expect("submit should run");
    assert_eq!(outcome, Completion::Discarded);
    assert!(controller.state().result().is_none());
}
