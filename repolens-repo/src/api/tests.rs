//! Tests for API clients

use super::*;
use repolens_core::ErrorKind;
use reqwest::header::{HeaderMap, HeaderValue, LINK};

#[test]
fn test_api_client_config_creation() {
    let config = ApiClientConfig::github("test_token");
    assert_eq!(config.base_url, "https://api.github.com");
    assert_eq!(config.access_token, "test_token");
    assert_eq!(config.per_page, 100);
    assert_eq!(config.timeout_seconds, None);

    let config = config
        .with_base_url("https://ghe.example.com/api/v3")
        .with_timeout(10)
        .with_per_page(30)
        .with_header("X-Trace".to_string(), "1".to_string());
    assert_eq!(config.base_url, "https://ghe.example.com/api/v3");
    assert_eq!(config.timeout_seconds, Some(10));
    assert_eq!(config.per_page, 30);
    assert_eq!(config.headers.get("X-Trace").map(String::as_str), Some("1"));
}

#[test]
fn test_config_from_settings_requires_token() {
    let settings = GitHubConfig::default();

    let err = ApiClientConfig::from_settings(&settings, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(err.to_string(), "GITHUB_TOKEN environment variable is not set");

    assert!(ApiClientConfig::from_settings(&settings, Some("   ".to_string())).is_err());

    let config = ApiClientConfig::from_settings(&settings, Some("ghp_x".to_string())).unwrap();
    assert_eq!(config.access_token, "ghp_x");
    assert_eq!(config.base_url, settings.api_base_url);
}

#[test]
fn test_client_rejects_empty_token() {
    let err = GitHubApiClient::new(ApiClientConfig::github("")).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(err.to_string(), "GITHUB_TOKEN environment variable is not set");
}

#[test]
fn test_empty_token_error_names_configured_variable() {
    let settings = GitHubConfig {
        token_env: "GHE_TOKEN".to_string(),
        ..GitHubConfig::default()
    };
    let mut config = ApiClientConfig::from_settings(&settings, Some("ghp_x".to_string()))
        .unwrap();
    assert_eq!(config.token_env, "GHE_TOKEN");

    config.access_token = "  ".to_string();
    let err = GitHubApiClient::new(config).err().unwrap();
    assert_eq!(err.to_string(), "GHE_TOKEN environment variable is not set");

    let err = GitHubApiClient::new(ApiClientConfig::github("").with_token_env("CI_TOKEN"))
        .err()
        .unwrap();
    assert_eq!(err.to_string(), "CI_TOKEN environment variable is not set");
}

#[test]
fn test_client_rejects_bad_base_url() {
    let config = ApiClientConfig::github("token").with_base_url("not a url");
    assert!(GitHubApiClient::new(config).is_err());
}

#[test]
fn test_client_creation() {
    assert!(GitHubApiClient::new(ApiClientConfig::github("token")).is_ok());
}

#[test]
fn test_next_page_url() {
    let mut headers = HeaderMap::new();
    headers.insert(
        LINK,
        HeaderValue::from_static(
            "<https://api.github.com/repositories/1/pulls?page=2>; rel=\"next\", \
             <https://api.github.com/repositories/1/pulls?page=5>; rel=\"last\"",
        ),
    );
    assert_eq!(
        next_page_url(&headers).as_deref(),
        Some("https://api.github.com/repositories/1/pulls?page=2")
    );

    headers.insert(
        LINK,
        HeaderValue::from_static(
            "<https://api.github.com/repositories/1/pulls?page=1>; rel=\"prev\", \
             <https://api.github.com/repositories/1/pulls?page=1>; rel=\"first\"",
        ),
    );
    assert_eq!(next_page_url(&headers), None);

    assert_eq!(next_page_url(&HeaderMap::new()), None);
}

#[test]
fn test_pull_request_state_strings() {
    assert_eq!(PullRequestState::Open.as_str(), "open");
    assert_eq!(PullRequestState::Closed.as_str(), "closed");
    assert_eq!(PullRequestState::All.as_str(), "all");
}
