//! Checks against a running ATF backend.
//!
//! Enabled with `--features integration-tests`; the backend URL is read from
//! `ATF_BACKEND_URL` (default `http://localhost:8000`).

#![cfg(feature = "integration-tests")]

use atf_core::backend::{Backend, HttpBackend};
use atf_protocol::config_models::DEFAULT_BACKEND_URL;

fn backend() -> HttpBackend {
    let url = std::env::var("ATF_BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
    HttpBackend::new(url).expect("client")
}

#[tokio::test]
async fn test_live_output_path() {
    let paths = backend().output_paths().await.expect("output path");
    assert!(!paths.output_path.is_empty());
}

#[tokio::test]
async fn test_live_unknown_file_is_upstream_error() {
    let err = backend()
        .run_all_agents("definitely-not-uploaded.docx")
        .await
        .expect_err("unknown file should be rejected");
    assert!(err.to_string().contains("File not found"), "got: {err}");
}
