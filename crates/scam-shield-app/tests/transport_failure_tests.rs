//! Integration tests for transport failure surfacing.

mod common;

use scam_shield_analyze::{AnalyzeController, RequestState};
use scam_shield_contract::AnalysisMode;

fn controller_with(transport: std::sync::Arc<common::ScriptedTransport>) -> AnalyzeController {
    let controller = AnalyzeController::new(common::client(transport));
    controller.update_input(AnalysisMode::Sms, "win a prize");
    controller
}

#[test]
fn transport_failure_tests_use_body_as_message() {
    let transport = common::ScriptedTransport::new();
    transport.push_raw(503, "Service unavailable");
    let controller = controller_with(transport);

    controller.submit().expect("submit should run");
    assert_eq!(
        controller.state(),
        RequestState::Failed("Service unavailable".to_string())
    );
}

#[test]
fn transport_failure_tests_fall_back_to_status_code() {
    let transport = common::ScriptedTransport::new();
    transport.push_raw(500, "");
    let controller = controller_with(transport);

    controller.submit().expect("submit should run");
    let state = controller.state();
    let message = state.error().expect("state should be failed");
    assert!(message.contains("500"), "message was {message:?}");
}

#[test]
fn transport_failure_tests_treat_unparsable_json_as_failure() {
    let transport = common::ScriptedTransport::new();
    transport.push_raw(200, "<html>gateway</html>");
    let controller = controller_with(transport);

    controller.submit().expect("submit should run");
    assert!(matches!(controller.state(), RequestState::Failed(_)));
}

#[test]
fn transport_failure_tests_allow_resubmission() {
    let transport = common::ScriptedTransport::new();
    transport.push_network_error("connection refused");
    transport.push_json(200, &common::analysis_result("sms", "after-retry", 12, "LOW"));
    let controller = controller_with(transport.clone());

    controller.submit().expect("submit should run");
    assert!(controller.state().error().is_some());

    controller.submit().expect("resubmit should run");
    assert_eq!(
        controller.state().result().map(|result| result.analysis_id.clone()),
        Some("after-retry".to_string())
    );
    assert_eq!(transport.call_count(), 2);
}
