//! Integration tests for startup configuration.

use scam_shield_app::{AppConfig, AppError};
use scam_shield_transport::{ApiBase, DEFAULT_ORIGIN, ReqwestTransport};

#[test]
fn config_tests_unset_base_means_same_origin() {
    for api_url in [None, Some(""), Some("   ")] {
        let config = AppConfig::from_values(api_url, None).expect("config should build");
        assert_eq!(config.service.base(), &ApiBase::SameOrigin);
        assert_eq!(config.service.resolve("/api/v1/stats"), "/api/v1/stats");
        assert_eq!(config.origin.as_str(), format!("{DEFAULT_ORIGIN}/"));
    }
}

#[test]
fn config_tests_override_prefixes_paths() {
    let config = AppConfig::from_values(Some("https://shield.example.org/"), None)
        .expect("config should build");
    assert_eq!(
        config.service.resolve("/api/v1/analyze-url"),
        "https://shield.example.org/api/v1/analyze-url"
    );
}

#[test]
fn config_tests_reject_bad_urls() {
    assert!(matches!(
        AppConfig::from_values(Some("not a url"), None),
        Err(AppError::Config(_))
    ));
    assert!(matches!(
        AppConfig::from_values(None, Some("ftp://files.example")),
        Err(AppError::Config(_))
    ));
}

#[test]
fn config_tests_origin_reaches_transport() {
    let config = AppConfig::from_values(None, Some("http://127.0.0.1:9000"))
        .expect("config should build");
    let transport = ReqwestTransport::new(config.origin.clone()).expect("client should build");
    assert_eq!(transport.origin().as_str(), "http://127.0.0.1:9000/");
}
