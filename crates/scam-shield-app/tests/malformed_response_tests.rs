//! Integration tests for contract violations in analysis responses.

mod common;

use scam_shield_analyze::{AnalyzeController, RequestState};
use scam_shield_contract::{AnalysisMode, MALFORMED_RESPONSE_MESSAGE};

#[test]
fn malformed_response_tests_missing_analysis_id_never_succeeds() {
    let mut body = common::analysis_result("url", "ignored", 64, "HIGH");
    body.as_object_mut()
        .expect("fixture should be an object")
        .remove("analysis_id");

    let transport = common::ScriptedTransport::new();
    transport.push_json(200, &body);
    let controller = AnalyzeController::new(common::client(transport));
    controller.select_mode(AnalysisMode::Url);
    controller.update_input(AnalysisMode::Url, "http://paypal.com.verify-user.example/login");

    controller.submit().expect("submit should run");
    assert_eq!(
        controller.state(),
        RequestState::Failed(MALFORMED_RESPONSE_MESSAGE.to_string())
    );
}

#[test]
fn malformed_response_tests_wrong_field_type_fails() {
    let mut body = common::analysis_result("email", "a-1", 50, "MEDIUM");
    body["reasons"] = serde_json::json!("not a list");

    let transport = common::ScriptedTransport::new();
    transport.push_json(200, &body);
    let controller = AnalyzeController::new(common::client(transport));
    controller.select_mode(AnalysisMode::Email);
    controller.update_input(AnalysisMode::Email, "Dear customer, verify your account");

    controller.submit().expect("submit should run");
    assert_eq!(controller.state().error(), Some(MALFORMED_RESPONSE_MESSAGE));
}
