//! End-to-end tests against the real router
//!
//! Each test gets its own temporary template directory and a recording email
//! backend, so nothing touches the network.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Bytes;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use http::StatusCode;
use htmail::config::HtmailConfig;
use htmail::email::{Email, EmailError, EmailSender};
use htmail::state::AppState;
use serde_json::{json, Value};
use tempfile::TempDir;

/// Backend that records messages instead of sending them
#[derive(Debug, Clone, Default)]
struct RecordingSender {
    sent: Arc<Mutex<Vec<Email>>>,
    fail_with: Option<String>,
}

impl RecordingSender {
    fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    fn sent(&self) -> Vec<Email> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for RecordingSender {
    async fn send(&self, email: Email) -> Result<(), EmailError> {
        email.validate()?;
        if let Some(message) = &self.fail_with {
            return Err(EmailError::smtp(message.clone()));
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

struct TestApp {
    server: TestServer,
    sender: RecordingSender,
    dir: TempDir,
}

impl TestApp {
    fn templates_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("templates")
    }

    fn write_template(&self, name: &str, content: &str) {
        std::fs::write(self.templates_dir().join(name), content).unwrap();
    }
}

fn config_for(dir: &TempDir) -> HtmailConfig {
    let mut config = HtmailConfig::default();
    config.templates.dir = dir.path().join("templates");
    config.attachments.dir = dir.path().join("attachments");
    config.smtp.username = "mailer@example.com".to_string();
    config.server.max_upload_bytes = 1024;
    config
}

fn spawn_with(sender: RecordingSender, configure: impl FnOnce(&mut HtmailConfig)) -> TestApp {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("templates")).unwrap();
    std::fs::create_dir_all(dir.path().join("attachments")).unwrap();

    let mut config = config_for(&dir);
    configure(&mut config);

    let state = AppState::new(config, Arc::new(sender.clone()));
    let server = TestServer::new(htmail::api::router(state)).unwrap();

    TestApp { server, sender, dir }
}

fn spawn() -> TestApp {
    spawn_with(RecordingSender::default(), |_| {})
}

fn welcome_request(template_name: &str) -> Value {
    json!({
        "template_name": template_name,
        "subject": "Welcome aboard",
        "recipients": ["john@example.com"],
        "context": {"user_name": "John Doe", "company_name": "Acme"}
    })
}

#[tokio::test]
async fn root_reports_running() {
    let app = spawn();

    let response = app.server.get("/").await;
    response.assert_status_ok();
    response.assert_json(&json!({"message": "Email Generator API is running"}));
}

#[tokio::test]
async fn health_reports_template_directory() {
    let app = spawn();

    let response = app.server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["components"]["templates"]["status"], "healthy");
}

#[tokio::test]
async fn list_templates_returns_sorted_html_files() {
    let app = spawn();
    app.write_template("welcome.html", "hi");
    app.write_template("reset.html", "hi");
    app.write_template("readme.txt", "not a template");

    let response = app.server.get("/templates").await;
    response.assert_status_ok();
    response.assert_json(&json!({"templates": ["reset.html", "welcome.html"]}));
}

#[tokio::test]
async fn list_templates_with_missing_directory_is_empty() {
    let app = spawn_with(RecordingSender::default(), |config| {
        config.templates.dir = config.templates.dir.join("does-not-exist");
    });

    let response = app.server.get("/templates").await;
    response.assert_status_ok();
    response.assert_json(&json!({"templates": []}));
}

#[tokio::test]
async fn generate_renders_context() {
    let app = spawn();
    app.write_template("welcome.html", "Hello {{user_name}} from {{company_name}}");

    let response = app
        .server
        .post("/generate-email-html")
        .json(&json!({
            "template_name": "welcome.html",
            "context": {"user_name": "John Doe", "company_name": "Acme"}
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let html = body["html_content"].as_str().unwrap();
    assert!(html.contains("Hello John Doe from Acme"));
    assert!(!html.contains("{{"));
}

#[tokio::test]
async fn generate_missing_template_is_not_found() {
    let app = spawn();

    let response = app
        .server
        .post("/generate-email-html")
        .json(&json!({"template_name": "nope.html", "context": {}}))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({"detail": "Template 'nope.html' not found"}));
}

#[tokio::test]
async fn generate_missing_context_key_is_unprocessable() {
    let app = spawn();
    app.write_template("welcome.html", "Hello {{user_name}} from {{company_name}}");

    let response = app
        .server
        .post("/generate-email-html")
        .json(&json!({"template_name": "welcome.html", "context": {"user_name": "John"}}))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert!(body["detail"].as_str().unwrap().starts_with("Template rendering failed"));
}

#[tokio::test]
async fn generate_lenient_mode_renders_missing_keys_empty() {
    let app = spawn_with(RecordingSender::default(), |config| {
        config.templates.strict_undefined = false;
    });
    app.write_template("welcome.html", "Hello {{user_name}}!");

    let response = app
        .server
        .post("/generate-email-html")
        .json(&json!({"template_name": "welcome.html", "context": {}}))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({"html_content": "Hello !"}));
}

#[tokio::test]
async fn generate_escapes_html_values() {
    let app = spawn();
    app.write_template("note.html", "<p>{{ note }}</p>");

    let response = app
        .server
        .post("/generate-email-html")
        .json(&json!({"template_name": "note.html", "context": {"note": "<script>"}}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["html_content"], "<p>&lt;script&gt;</p>");
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = spawn();

    let response = app
        .server
        .post("/generate-email-html")
        .bytes(Bytes::from_static(b"{\"template_name\": "))
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn send_email_delivers_rendered_html() {
    let app = spawn();
    app.write_template("welcome.html", "Hello {{user_name}} from {{company_name}}");

    let response = app
        .server
        .post("/send-email")
        .json(&welcome_request("welcome.html"))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({"status": "success", "message": "Email sent successfully"}));

    let sent = app.sender.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["john@example.com"]);
    assert_eq!(sent[0].from.as_deref(), Some("mailer@example.com"));
    assert_eq!(sent[0].subject.as_deref(), Some("Welcome aboard"));
    assert_eq!(sent[0].html.as_deref(), Some("Hello John Doe from Acme"));
}

#[tokio::test]
async fn send_email_includes_existing_attachments() {
    let app = spawn();
    app.write_template("welcome.html", "Hello {{user_name}} from {{company_name}}");
    std::fs::write(app.dir.path().join("attachments").join("guide.pdf"), b"%PDF").unwrap();

    let mut request = welcome_request("welcome.html");
    request["attachments"] = json!(["guide.pdf", "missing.pdf"]);
    request["cc"] = json!(["boss@example.com"]);

    let response = app.server.post("/send-email").json(&request).await;
    response.assert_status_ok();

    let sent = app.sender.sent();
    assert_eq!(sent[0].cc, vec!["boss@example.com"]);
    assert_eq!(sent[0].attachments.len(), 1);
    assert_eq!(sent[0].attachments[0].filename, "guide.pdf");
    assert_eq!(sent[0].attachments[0].data, b"%PDF");
}

#[tokio::test]
async fn send_email_missing_template_sends_nothing() {
    let app = spawn();

    let response = app
        .server
        .post("/send-email")
        .json(&welcome_request("missing.html"))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert!(app.sender.sent().is_empty());
}

#[tokio::test]
async fn send_email_rejects_bad_recipients() {
    let app = spawn();
    app.write_template("welcome.html", "Hello");

    let mut request = welcome_request("welcome.html");
    request["recipients"] = json!([]);
    let response = app.server.post("/send-email").json(&request).await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    request["recipients"] = json!(["not-an-email"]);
    let response = app.server.post("/send-email").json(&request).await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert!(body["detail"].as_str().unwrap().contains("not-an-email"));

    assert!(app.sender.sent().is_empty());
}

#[tokio::test]
async fn send_email_missing_field_is_unprocessable() {
    let app = spawn();

    let response = app
        .server
        .post("/send-email")
        .json(&json!({"template_name": "welcome.html", "recipients": ["a@example.com"]}))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn send_email_smtp_failure_is_server_error() {
    let app = spawn_with(RecordingSender::failing("connection refused"), |_| {});
    app.write_template("welcome.html", "Hello {{user_name}} from {{company_name}}");

    let response = app
        .server
        .post("/send-email")
        .json(&welcome_request("welcome.html"))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({
        "detail": "Failed to send email: SMTP error: connection refused"
    }));
}

#[tokio::test]
async fn send_email_without_configured_sender_is_server_error() {
    let app = spawn_with(RecordingSender::default(), |config| {
        config.smtp = htmail::config::SmtpSettings::default();
    });
    app.write_template("welcome.html", "Hello {{user_name}} from {{company_name}}");

    let response = app
        .server
        .post("/send-email")
        .json(&welcome_request("welcome.html"))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["detail"].as_str().unwrap().contains("no sender address configured"));
    assert!(app.sender.sent().is_empty());
}

#[tokio::test]
async fn upload_template_stores_file() {
    let app = spawn();

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(b"<h1>Hi {{ name }}</h1>".as_slice())
            .file_name("greeting.html")
            .mime_type("text/html"),
    );
    let response = app.server.post("/upload-template").multipart(form).await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "status": "success",
        "message": "Template 'greeting.html' uploaded successfully",
        "filename": "greeting.html"
    }));

    let stored = std::fs::read_to_string(app.templates_dir().join("greeting.html")).unwrap();
    assert_eq!(stored, "<h1>Hi {{ name }}</h1>");

    app.server
        .get("/templates")
        .await
        .assert_json(&json!({"templates": ["greeting.html"]}));
}

#[tokio::test]
async fn upload_template_overwrites_existing() {
    let app = spawn();
    app.write_template("greeting.html", "old");

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(b"new".as_slice()).file_name("greeting.html"),
    );
    app.server
        .post("/upload-template")
        .multipart(form)
        .await
        .assert_status_ok();

    let stored = std::fs::read_to_string(app.templates_dir().join("greeting.html")).unwrap();
    assert_eq!(stored, "new");
}

#[tokio::test]
async fn upload_rejects_non_html_and_writes_nothing() {
    let app = spawn();

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(b"alert(1)".as_slice()).file_name("script.js"),
    );
    let response = app.server.post("/upload-template").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({"detail": "only html files are allowed, got 'script.js'"}));
    assert_eq!(std::fs::read_dir(app.templates_dir()).unwrap().count(), 0);
}

#[tokio::test]
async fn upload_rejects_path_components() {
    let app = spawn();

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(b"x".as_slice()).file_name("../evil.html"),
    );
    let response = app.server.post("/upload-template").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(!app.dir.path().join("evil.html").exists());
}

#[tokio::test]
async fn upload_rejects_oversized_file() {
    let app = spawn();

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(vec![b'x'; 4096]).file_name("big.html"),
    );
    let response = app.server.post("/upload-template").multipart(form).await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert!(!app.templates_dir().join("big.html").exists());
}

#[tokio::test]
async fn upload_without_file_is_bad_request() {
    let app = spawn();

    let form = MultipartForm::new().add_text("note", "no file");
    let response = app.server.post("/upload-template").multipart(form).await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
