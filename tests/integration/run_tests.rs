//! Whole runs driven through `run_archive`

use crate::support::*;
use salsa_archiver::api::KeyFilter;
use salsa_archiver::app::run_archive;
use salsa_archiver::config::{ClientOptions, RunConfig};
use salsa_archiver::crawler::build_tasks;
use salsa_archiver::page::PageSpec;
use salsa_archiver::{ConfigError, SalsaError};
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::{Builder, NamedTempFile, TempDir};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn login_file(server: &MockServer, suffix: &str) -> NamedTempFile {
    let content = match suffix {
        ".toml" => format!(
            "host = \"{}\"\nemail = \"chuck@example.org\"\npassword = \"secret\"\n",
            host_of(server)
        ),
        _ => format!(
            "host: \"{}\"\nemail: chuck@example.org\npassword: secret\n",
            host_of(server)
        ),
    };
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn html_config(login: &NamedTempFile, html: &TempDir) -> RunConfig {
    RunConfig::html_only(Some(login.path().to_path_buf()), html.path().to_path_buf())
        .unwrap()
        .with_client(ClientOptions::plain_http())
        .unwrap()
}

#[tokio::test]
async fn test_empty_table_run_succeeds() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_batch(&server, "email_blast", 0, json!([])).await;

    let login = login_file(&server, ".yaml");
    let html = TempDir::new().unwrap();

    let report = run_archive(&html_config(&login, &html), CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(report.total_tasks, 0);
    assert_eq!(report.processed(), 0);
    assert!(report.is_success());
}

#[tokio::test]
async fn test_toml_credentials_are_accepted() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_batch(&server, "email_blast", 0, json!([])).await;

    let login = login_file(&server, ".toml");
    let html = TempDir::new().unwrap();

    let report = run_archive(&html_config(&login, &html), CancellationToken::new())
        .await
        .unwrap();
    assert!(report.is_success());
}

#[tokio::test]
async fn test_html_only_run_lists_completed_blasts() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_batch(
        &server,
        "email_blast",
        0,
        json!([
            {"email_blast_KEY": "1", "Stage": "Complete"},
            {"email_blast_KEY": "2", "Stage": "Draft"},
            {"email_blast_KEY": "3", "Stage": "Complete"}
        ]),
    )
    .await;
    // Every record read fails, so the run stops after the first task
    mount_record(&server, "email_blast", "1", json!("garbage")).await;
    mount_record(&server, "email_blast", "3", json!("garbage")).await;

    let login = login_file(&server, ".yaml");
    let html = TempDir::new().unwrap();
    let config = html_config(&login, &html).with_workers(1).unwrap();

    let report = run_archive(&config, CancellationToken::new()).await.unwrap();

    assert_eq!(report.total_tasks, 2);
    assert_eq!(report.processed(), 1);
    assert_eq!(report.not_processed(), 1);
    assert!(matches!(report.fatal, Some(SalsaError::Record { .. })));
    assert_eq!(report.failures[0].task, "email_blast/1");
}

#[tokio::test]
async fn test_pdf_run_just_blasts_skips_blog_entries() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_batch(&server, "email_blast", 0, json!([])).await;

    let login = login_file(&server, ".yaml");
    let html = TempDir::new().unwrap();
    let pdfs = TempDir::new().unwrap();
    let config = RunConfig::pdf(
        Some(login.path().to_path_buf()),
        html.path().to_path_buf(),
        pdfs.path().to_path_buf(),
        true,
    )
    .unwrap()
    .with_client(ClientOptions::plain_http())
    .unwrap();

    let report = run_archive(&config, CancellationToken::new()).await.unwrap();

    assert!(report.is_success());
    assert_eq!(count_requests(&server, "/api/getObjects.sjs", "blog_entry").await, 0);
}

#[tokio::test]
async fn test_authentication_failure_aborts_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/authenticate.sjs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "error"})))
        .mount(&server)
        .await;

    let login = login_file(&server, ".yaml");
    let html = TempDir::new().unwrap();

    let err = run_archive(&html_config(&login, &html), CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, SalsaError::Auth { .. }));
    assert_eq!(count_requests(&server, "/api/getObjects.sjs", "email_blast").await, 0);
}

#[tokio::test]
async fn test_missing_organization_aborts_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/authenticate.sjs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/getObjects.sjs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let login = login_file(&server, ".yaml");
    let html = TempDir::new().unwrap();

    let err = run_archive(&html_config(&login, &html), CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, SalsaError::OrganizationNotFound));
}

#[tokio::test]
async fn test_listing_failure_aborts_before_any_task() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_batch(&server, "email_blast", 0, json!({"oops": true})).await;

    let login = login_file(&server, ".yaml");
    let html = TempDir::new().unwrap();

    let err = run_archive(&html_config(&login, &html), CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, SalsaError::Enumeration { .. }));
    assert_eq!(count_requests(&server, "/api/getObject.sjs", "email_blast").await, 0);
}

#[tokio::test]
async fn test_unreadable_login_file_is_config_error() {
    let html = TempDir::new().unwrap();
    let config = RunConfig::html_only(
        Some(PathBuf::from("/nonexistent/login.yaml")),
        html.path().to_path_buf(),
    )
    .unwrap();

    let err = run_archive(&config, CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, SalsaError::Config(ConfigError::Io(_))));
    assert!(err.is_fatal());
}

#[test]
fn test_missing_login_flag() {
    let result = RunConfig::html_only(None, PathBuf::from("html"));
    let err = result.unwrap_err();
    assert!(matches!(err, ConfigError::MissingLogin));
    assert_eq!(err.to_string(), "--login is REQUIRED");
}

#[tokio::test]
async fn test_build_tasks_keeps_spec_order() {
    let server = MockServer::start().await;
    let session = connect(&server).await;

    let blog = PageSpec::new(
        "http://{host}/o/{organizationKey}/blog?blog_entry_KEY={key}",
        "blog_entry",
        "Title",
        "blog_entry_KEY",
        Some("Display_Date"),
    );
    mount_batch(
        &server,
        "email_blast",
        0,
        json!([{"email_blast_KEY": "1"}, {"email_blast_KEY": "2"}]),
    )
    .await;
    mount_batch(&server, "blog_entry", 0, json!([{"blog_entry_KEY": "9"}])).await;

    let specs = vec![Arc::new(blast_spec()), Arc::new(blog)];
    let tasks = build_tasks(&session, &specs, KeyFilter::All).await.unwrap();

    let labels: Vec<String> = tasks.iter().map(ToString::to_string).collect();
    assert_eq!(labels, vec!["email_blast/1", "email_blast/2", "blog_entry/9"]);
}
