//! Integration tests for text rendering of analysis results.

mod common;

use scam_shield_app::{analyze_once, render_result_text};
use scam_shield_contract::AnalysisMode;

#[test]
fn render_tests_show_unknown_domain_age_and_sections() {
    let transport = common::ScriptedTransport::new();
    transport.push_json(200, &common::analysis_result("url", "r-1", 137, "CRITICAL"));
    let view = analyze_once(
        common::client(transport),
        AnalysisMode::Url,
        "http://example-login-secure.com/verify",
    )
    .expect("analysis should succeed");

    assert_eq!(view.gauge_score, 100);
    let text = render_result_text(&view);
    assert!(text.starts_with("Risk score: 100/100 (CRITICAL)"), "{text}");
    assert!(text.contains("Domain age: Unknown"), "{text}");
    assert!(text.contains("ML probability: 87.0%"), "{text}");
    assert!(text.contains("Why it was flagged:\n  - Urgency or threat language detected"));
    assert!(!text.contains("Redirects:"));
}

#[test]
fn render_tests_failed_analysis_carries_message() {
    let transport = common::ScriptedTransport::new();
    transport.push_raw(503, "Service unavailable");
    let error = analyze_once(common::client(transport), AnalysisMode::Sms, "hello")
        .expect_err("analysis should fail");
    assert_eq!(error.to_string(), "analysis failed: Service unavailable");
}
