//! Single-page archive pipeline against a mock Salsa host

use crate::support::*;
use async_trait::async_trait;
use salsa_archiver::archive::{PdfOptions, PdfRenderer, PdfStatus, RenderError};
use salsa_archiver::config::ArchiveVariant;
use salsa_archiver::page::Task;
use salsa_archiver::{ArchiveOutcome, PageArchiver, SalsaError};
use scraper::{Html, Selector};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BLAST_PAGE: &str = "/o/5432/t/0/blastContent.jsp";

const PAGE_HTML: &str = r#"<html><head>
<link rel="stylesheet" href="/salsa/include/style.css">
<script src="/dia/track.js"></script>
</head><body>
<a href="/o/1/x">Root relative</a>
<a href="http://salsa.democracyinaction.org/o/1/p">Legacy host</a>
<a href="https://example.com/already">Absolute</a>
<img src="cid:image001">
</body></html>"#;

async fn mount_page(server: &MockServer, key: &str, body: &str, expected: u64) {
    Mock::given(method("GET"))
        .and(path(BLAST_PAGE))
        .and(query_param("email_blast_KEY", key))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_hello_record(server: &MockServer, key: &str, subject: &str) {
    mount_record(
        server,
        "email_blast",
        key,
        json!({
            "email_blast_KEY": key,
            "Subject": subject,
            "Date_Created": "Mon Oct 09 2017 19:25:56 GMT-0400"
        }),
    )
    .await;
}

fn task(key: &str) -> Task {
    Task::new(Arc::new(blast_spec()), key)
}

fn links(html: &str, selector: &str, attr: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(selector).unwrap();
    document
        .select(&selector)
        .filter_map(|el| el.value().attr(attr).map(str::to_string))
        .collect()
}

/// Writes a stand-in PDF and remembers what it was asked to render
#[derive(Default)]
struct RecordingRenderer {
    rendered: Mutex<Vec<(PathBuf, String)>>,
}

#[async_trait]
impl PdfRenderer for RecordingRenderer {
    async fn render(
        &self,
        html: &str,
        output: &Path,
        _options: &PdfOptions,
    ) -> Result<(), RenderError> {
        tokio::fs::write(output, b"%PDF-1.4\n").await?;
        self.rendered
            .lock()
            .unwrap()
            .push((output.to_path_buf(), html.to_string()));
        Ok(())
    }
}

struct FailingRenderer;

#[async_trait]
impl PdfRenderer for FailingRenderer {
    async fn render(
        &self,
        _html: &str,
        _output: &Path,
        _options: &PdfOptions,
    ) -> Result<(), RenderError> {
        Err(RenderError::Failed {
            status: "exit status: 1".to_string(),
            stderr: "cannot render".to_string(),
        })
    }
}

#[tokio::test]
async fn test_html_only_archive_end_to_end() {
    let server = MockServer::start().await;
    let session = Arc::new(connect(&server).await);
    mount_hello_record(&server, "123", "Hello, World!").await;
    mount_page(&server, "123", PAGE_HTML, 1).await;

    let out = TempDir::new().unwrap();
    let archiver =
        PageArchiver::html_only(session, ArchiveVariant::HtmlOnly, out.path().to_path_buf());

    let outcome = archiver.archive(&task("123")).await.unwrap();

    let expected = out.path().join("email_blast/2017-10-09 123 Hello World.html");
    assert_eq!(
        outcome,
        ArchiveOutcome::Archived {
            html: expected.clone(),
            pdf: PdfStatus::NotRequested,
        }
    );

    let written = std::fs::read_to_string(&expected).unwrap();
    let host = host_of(&server);

    let anchors = links(&written, "a", "href");
    assert_eq!(anchors[0], format!("https://{}/o/1/x", host));
    assert_eq!(anchors[1], "http://org.salsalabs.com/o/1/p");
    assert_eq!(anchors[2], "https://example.com/already");

    assert_eq!(
        links(&written, "link", "href"),
        vec![format!("https://{}/salsa/include/style.css", host)]
    );
    assert_eq!(
        links(&written, "script", "src"),
        vec![format!("https://{}/dia/track.js", host)]
    );
    // "https:image001" is scheme-relative, so joining resolves it against the host
    assert_eq!(
        links(&written, "img", "src"),
        vec![format!("https://{}/image001", host)]
    );
}

#[tokio::test]
async fn test_existing_file_is_skipped_without_fetching() {
    let server = MockServer::start().await;
    let session = Arc::new(connect(&server).await);
    mount_hello_record(&server, "123", "Hello, World!").await;
    mount_page(&server, "123", PAGE_HTML, 0).await;

    let out = TempDir::new().unwrap();
    let existing = out.path().join("email_blast/2017-10-09 123 Hello World.html");
    std::fs::create_dir_all(existing.parent().unwrap()).unwrap();
    std::fs::write(&existing, "previous run").unwrap();

    let archiver =
        PageArchiver::html_only(session, ArchiveVariant::HtmlOnly, out.path().to_path_buf());
    let outcome = archiver.archive(&task("123")).await.unwrap();

    assert!(outcome.is_skipped());
    assert_eq!(std::fs::read_to_string(&existing).unwrap(), "previous run");
}

#[tokio::test]
async fn test_undated_record_filename_starts_with_key() {
    let server = MockServer::start().await;
    let session = Arc::new(connect(&server).await);
    mount_record(
        &server,
        "email_blast",
        "77",
        json!({"email_blast_KEY": "77", "Subject": "  Draft #1  ", "Date_Created": ""}),
    )
    .await;
    mount_page(&server, "77", "<p>draft</p>", 1).await;

    let out = TempDir::new().unwrap();
    let archiver =
        PageArchiver::html_only(session, ArchiveVariant::HtmlOnly, out.path().to_path_buf());
    archiver.archive(&task("77")).await.unwrap();

    // Trimmed title, no date prefix
    assert!(out.path().join("email_blast/77 Draft 1.html").exists());
}

#[tokio::test]
async fn test_bad_date_is_task_error() {
    let server = MockServer::start().await;
    let session = Arc::new(connect(&server).await);
    mount_record(
        &server,
        "email_blast",
        "9",
        json!({"email_blast_KEY": "9", "Subject": "x", "Date_Created": "yesterday"}),
    )
    .await;

    let out = TempDir::new().unwrap();
    let archiver =
        PageArchiver::html_only(session, ArchiveVariant::HtmlOnly, out.path().to_path_buf());
    let err = archiver.archive(&task("9")).await.unwrap_err();

    assert!(matches!(err, SalsaError::DateParse { .. }));
    assert!(!err.is_fatal());
}

#[tokio::test]
async fn test_error_status_page_is_still_archived() {
    let server = MockServer::start().await;
    let session = Arc::new(connect(&server).await);
    mount_hello_record(&server, "404", "Gone").await;
    Mock::given(method("GET"))
        .and(path(BLAST_PAGE))
        .respond_with(ResponseTemplate::new(404).set_body_string("<p>not here</p>"))
        .mount(&server)
        .await;

    let out = TempDir::new().unwrap();
    let archiver =
        PageArchiver::html_only(session, ArchiveVariant::HtmlOnly, out.path().to_path_buf());
    archiver.archive(&task("404")).await.unwrap();

    let written =
        std::fs::read_to_string(out.path().join("email_blast/2017-10-09 404 Gone.html")).unwrap();
    assert_eq!(written, "<p>not here</p>");
}

#[tokio::test]
async fn test_pdf_variant_renders_next_to_html() {
    let server = MockServer::start().await;
    let session = Arc::new(connect(&server).await);
    mount_hello_record(&server, "123", "Hello, World!").await;
    mount_page(&server, "123", PAGE_HTML, 1).await;

    let html_dir = TempDir::new().unwrap();
    let pdf_dir = TempDir::new().unwrap();
    let renderer = Arc::new(RecordingRenderer::default());

    let archiver = PageArchiver::html_only(
        session,
        ArchiveVariant::Pdf,
        html_dir.path().to_path_buf(),
    )
    .with_pdf(
        pdf_dir.path().to_path_buf(),
        renderer.clone(),
        PdfOptions::default(),
    );

    let outcome = archiver.archive(&task("123")).await.unwrap();

    let html_path = html_dir
        .path()
        .join("email_blast/2017-10-09 123 Hello World.html");
    let pdf_path = pdf_dir
        .path()
        .join("email_blast/2017-10-09 123 Hello World.pdf");
    assert_eq!(
        outcome,
        ArchiveOutcome::Archived {
            html: html_path.clone(),
            pdf: PdfStatus::Rendered(pdf_path.clone()),
        }
    );
    assert!(pdf_path.exists());

    // The renderer sees the rewritten document, identical to the HTML file
    let rendered = renderer.rendered.lock().unwrap();
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0].0, pdf_path);
    assert_eq!(rendered[0].1, std::fs::read_to_string(&html_path).unwrap());
}

#[tokio::test]
async fn test_pdf_variant_keeps_untrimmed_title() {
    let server = MockServer::start().await;
    let session = Arc::new(connect(&server).await);
    mount_hello_record(&server, "5", " Spaced ").await;
    mount_page(&server, "5", "<p>x</p>", 1).await;

    let html_dir = TempDir::new().unwrap();
    let pdf_dir = TempDir::new().unwrap();
    let archiver = PageArchiver::html_only(
        session,
        ArchiveVariant::Pdf,
        html_dir.path().to_path_buf(),
    )
    .with_pdf(
        pdf_dir.path().to_path_buf(),
        Arc::new(RecordingRenderer::default()),
        PdfOptions::default(),
    );

    archiver.archive(&task("5")).await.unwrap();

    assert!(html_dir
        .path()
        .join("email_blast/2017-10-09 5  Spaced .html")
        .exists());
}

#[tokio::test]
async fn test_render_failure_keeps_html() {
    let server = MockServer::start().await;
    let session = Arc::new(connect(&server).await);
    mount_hello_record(&server, "123", "Hello, World!").await;
    mount_page(&server, "123", PAGE_HTML, 1).await;

    let html_dir = TempDir::new().unwrap();
    let pdf_dir = TempDir::new().unwrap();
    let archiver = PageArchiver::html_only(
        session,
        ArchiveVariant::Pdf,
        html_dir.path().to_path_buf(),
    )
    .with_pdf(
        pdf_dir.path().to_path_buf(),
        Arc::new(FailingRenderer),
        PdfOptions::default(),
    );

    let outcome = archiver.archive(&task("123")).await.unwrap();

    match outcome {
        ArchiveOutcome::Archived {
            html,
            pdf: PdfStatus::Failed(message),
        } => {
            assert!(html.exists());
            assert!(message.contains("cannot render"));
        }
        other => panic!("expected archived with failed PDF, got {:?}", other),
    }
}

#[tokio::test]
async fn test_existing_pdf_skips_task() {
    let server = MockServer::start().await;
    let session = Arc::new(connect(&server).await);
    mount_hello_record(&server, "123", "Hello, World!").await;
    mount_page(&server, "123", PAGE_HTML, 0).await;

    let html_dir = TempDir::new().unwrap();
    let pdf_dir = TempDir::new().unwrap();
    let pdf_path = pdf_dir
        .path()
        .join("email_blast/2017-10-09 123 Hello World.pdf");
    std::fs::create_dir_all(pdf_path.parent().unwrap()).unwrap();
    std::fs::write(&pdf_path, b"%PDF-old").unwrap();

    let renderer = Arc::new(RecordingRenderer::default());
    let archiver = PageArchiver::html_only(
        session,
        ArchiveVariant::Pdf,
        html_dir.path().to_path_buf(),
    )
    .with_pdf(
        pdf_dir.path().to_path_buf(),
        renderer.clone(),
        PdfOptions::default(),
    );

    let outcome = archiver.archive(&task("123")).await.unwrap();

    assert_eq!(outcome, ArchiveOutcome::Skipped { path: pdf_path });
    assert!(renderer.rendered.lock().unwrap().is_empty());
    assert!(!html_dir.path().join("email_blast").exists());
}

#[tokio::test]
async fn test_unusable_pdf_dir_keeps_html() {
    let server = MockServer::start().await;
    let session = Arc::new(connect(&server).await);
    mount_hello_record(&server, "123", "Hello, World!").await;
    mount_page(&server, "123", PAGE_HTML, 1).await;

    let html_dir = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    // A plain file where the PDF root should be
    let pdf_root = scratch.path().join("not-a-dir");
    std::fs::write(&pdf_root, "x").unwrap();

    let renderer = Arc::new(RecordingRenderer::default());
    let archiver = PageArchiver::html_only(
        session,
        ArchiveVariant::Pdf,
        html_dir.path().to_path_buf(),
    )
    .with_pdf(pdf_root, renderer.clone(), PdfOptions::default());

    let outcome = archiver.archive(&task("123")).await.unwrap();

    match outcome {
        ArchiveOutcome::Archived {
            html,
            pdf: PdfStatus::Failed(_),
        } => assert!(html.exists()),
        other => panic!("expected archived with failed PDF, got {:?}", other),
    }
    assert!(renderer.rendered.lock().unwrap().is_empty());
}
