//! End-to-end coverage of the register/verify/login flows and the
//! email-driven password recovery, with a recording mail double.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use uuid::Uuid;

use petgram_api::mailer::Mailer;
use petgram_api::{AppState, tokens};

const JWT_SECRET: &str = "test-secret";

#[derive(Debug, Clone)]
struct SentMail {
    to: String,
    subject: String,
    body: String,
}

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<SentMail>>,
    fail: AtomicBool,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> anyhow::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("smtp connection refused");
        }
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: html_body.to_string(),
        });
        Ok(())
    }
}

struct TestApp {
    server: TestServer,
    state: AppState,
    mailer: Arc<RecordingMailer>,
    _dir: tempfile::TempDir,
}

fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let db = Arc::new(petgram_db::Database::open(&dir.path().join("petgram.db")).unwrap());
    let mailer = Arc::new(RecordingMailer::default());

    let state = AppState {
        db,
        mailer: mailer.clone(),
        jwt_secret: JWT_SECRET.into(),
        api_url: "http://localhost:3000".into(),
        uploads_dir: dir.path().join("uploads"),
    };

    let server = TestServer::new(petgram_api::router(state.clone())).unwrap();
    TestApp {
        server,
        state,
        mailer,
        _dir: dir,
    }
}

impl TestApp {
    async fn register(&self, email: &str, username: &str, password: &str) -> StatusCode {
        self.server
            .post("/auth/register")
            .json(&json!({
                "email": email,
                "username": username,
                "password": password,
                "name": "Alice",
            }))
            .await
            .status_code()
    }

    /// Pull the `?xt=` token out of the most recently recorded mail.
    fn last_mail_token(&self) -> String {
        let sent = self.mailer.sent.lock().unwrap();
        let body = &sent.last().expect("no mail recorded").body;
        body.split("?xt=")
            .nth(1)
            .expect("mail carries no token link")
            .split('"')
            .next()
            .unwrap()
            .to_string()
    }

    async fn register_and_verify(&self, email: &str, username: &str, password: &str) {
        assert_eq!(self.register(email, username, password).await, StatusCode::OK);
        let token = self.last_mail_token();
        let page = self
            .server
            .get("/auth/verify-account/")
            .add_query_param("xt", &token)
            .await;
        assert_eq!(page.status_code(), StatusCode::OK);
        assert!(page.text().contains("Email Verified"));
    }

    async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        let response = self
            .server
            .post("/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .await;
        let status = response.status_code();
        (status, response.json())
    }
}

#[tokio::test]
async fn short_password_creates_no_account() {
    let app = spawn_app();
    let response = app
        .server
        .post("/auth/register")
        .json(&json!({
            "email": "a@x.com",
            "username": "alice",
            "password": "abc",
            "name": "Alice",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Password must have more than 6 characters");
    assert!(app.state.db.get_account_by_email("a@x.com").unwrap().is_none());
    assert!(app.mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn register_mails_an_activation_link() {
    let app = spawn_app();
    let response = app
        .server
        .post("/auth/register")
        .json(&json!({
            "email": "a@x.com",
            "username": "alice",
            "password": "secret1",
            "name": "Alice",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "Email has been sent to a@x.com");

    let sent = app.mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "a@x.com");
    assert_eq!(sent[0].subject, "Activate your Petgram account");
    assert!(sent[0].body.contains("/auth/verify-account/?xt="));

    let row = app.state.db.get_account_by_email("a@x.com").unwrap().unwrap();
    assert!(!row.is_verified);
}

#[tokio::test]
async fn mail_failure_keeps_the_account_row() {
    let app = spawn_app();
    app.mailer.fail.store(true, Ordering::SeqCst);

    let response = app
        .server
        .post("/auth/register")
        .json(&json!({
            "email": "a@x.com",
            "username": "alice",
            "password": "secret1",
            "name": "Alice",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Email could not be sent");

    // The insert is not rolled back, so re-registering trips UNIQUE.
    assert!(app.state.db.get_account_by_email("a@x.com").unwrap().is_some());
    app.mailer.fail.store(false, Ordering::SeqCst);
    assert_eq!(
        app.register("a@x.com", "other", "secret1").await,
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn verify_without_token_renders_failure_page() {
    let app = spawn_app();
    assert_eq!(app.register("a@x.com", "alice", "secret1").await, StatusCode::OK);

    let page = app.server.get("/auth/verify-account").await;
    assert_eq!(page.status_code(), StatusCode::OK);
    assert!(page.text().contains("Not Authorized"));

    // No token means the account was never touched.
    let row = app.state.db.get_account_by_email("a@x.com").unwrap().unwrap();
    assert!(!row.is_verified);
}

#[tokio::test]
async fn garbage_token_renders_generic_failure() {
    let app = spawn_app();
    let page = app
        .server
        .get("/auth/verify-account")
        .add_query_param("xt", "garbage")
        .await;
    assert_eq!(page.status_code(), StatusCode::OK);
    assert!(page.text().contains("contact support"));
}

#[tokio::test]
async fn verify_flips_only_the_targeted_account() {
    let app = spawn_app();
    assert_eq!(app.register("a@x.com", "alice", "secret1").await, StatusCode::OK);
    let token = app.last_mail_token();
    assert_eq!(app.register("b@x.com", "bob", "secret1").await, StatusCode::OK);

    let page = app
        .server
        .get("/auth/verify-account/")
        .add_query_param("xt", &token)
        .await;
    assert!(page.text().contains("a@x.com"));

    assert!(app.state.db.get_account_by_email("a@x.com").unwrap().unwrap().is_verified);
    assert!(!app.state.db.get_account_by_email("b@x.com").unwrap().unwrap().is_verified);
}

#[tokio::test]
async fn login_before_verification_gets_no_token() {
    let app = spawn_app();
    assert_eq!(app.register("a@x.com", "alice", "secret1").await, StatusCode::OK);

    let (status, body) = app.login("a@x.com", "secret1").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "User not verified");
    assert_eq!(body["error"], "Login not successful");
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn verified_login_issues_a_session_token() {
    let app = spawn_app();
    app.register_and_verify("a@x.com", "alice", "secret1").await;

    let (status, body) = app.login("a@x.com", "secret1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["expiration"], 10_800);
    assert_eq!(body["user"]["email"], "a@x.com");
    // The stored hash never leaves the server.
    assert!(body["user"].get("password").is_none());

    let claims = tokens::verify_session(JWT_SECRET, body["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.sub.to_string(), body["user"]["id"].as_str().unwrap());
    assert_eq!(claims.email, "a@x.com");
}

#[tokio::test]
async fn login_by_username_works_too() {
    let app = spawn_app();
    app.register_and_verify("a@x.com", "alice", "secret1").await;

    let response = app
        .server
        .post("/auth/login")
        .json(&json!({ "username": "alice", "password": "secret1" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn login_failures_keep_their_distinct_shapes() {
    let app = spawn_app();
    app.register_and_verify("a@x.com", "alice", "secret1").await;

    // Missing fields.
    let response = app.server.post("/auth/login").json(&json!({})).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Email or Password not present");

    // Unknown identifier.
    let (status, body) = app.login("ghost@x.com", "secret1").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Your credentials are incorrect");
    assert_eq!(body["error"], "Login not successful");

    // Wrong password.
    let (status, body) = app.login("a@x.com", "wrong-password").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Login not successful");
}

#[tokio::test]
async fn forgot_password_never_leaks_existence() {
    let app = spawn_app();
    app.register_and_verify("a@x.com", "alice", "secret1").await;

    let known = app.server.get("/auth/forgot-password/a@x.com").await;
    assert_eq!(known.status_code(), StatusCode::OK);
    let known_body: Value = known.json();
    assert_eq!(known_body["message"], "Email has been sent to a@x.com");

    let unknown = app.server.get("/auth/forgot-password/ghost@x.com").await;
    assert_eq!(unknown.status_code(), StatusCode::OK);
    let unknown_body: Value = unknown.json();
    assert_eq!(unknown_body["message"], "Email has been sent to ghost@x.com");

    // Only the known address got a mail.
    let sent = app.mailer.sent.lock().unwrap();
    let resets: Vec<_> = sent
        .iter()
        .filter(|m| m.subject == "Reset Password from Petgram")
        .collect();
    assert_eq!(resets.len(), 1);
    assert_eq!(resets[0].to, "a@x.com");
}

#[tokio::test]
async fn forgot_password_mail_failure_is_not_fatal() {
    let app = spawn_app();
    app.register_and_verify("a@x.com", "alice", "secret1").await;
    app.mailer.fail.store(true, Ordering::SeqCst);

    let response = app.server.get("/auth/forgot-password/a@x.com").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn reset_form_requires_a_token() {
    let app = spawn_app();
    let response = app.server.get("/auth/reset-password").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .get("/auth/reset-password/")
        .add_query_param("xt", "tok123")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("tok123"));
}

#[tokio::test]
async fn reset_password_validates_fields_in_order() {
    let app = spawn_app();

    let response = app
        .server
        .post("/auth/reset-password")
        .form(&[("new_password", "")])
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "There are empty fields");

    let response = app
        .server
        .post("/auth/reset-password")
        .form(&[("new_password", "abcdef"), ("confirm_password", "abcxyz")])
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "New Password and Confirm Password doesn't match");

    let response = app
        .server
        .post("/auth/reset-password")
        .form(&[("new_password", "abcde"), ("confirm_password", "abcde")])
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Password must have more than 6 characters");

    // Fields are fine, the token is missing.
    let response = app
        .server
        .post("/auth/reset-password")
        .form(&[("new_password", "abcdef"), ("confirm_password", "abcdef")])
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    // Fields are fine, the token is garbage.
    let response = app
        .server
        .post("/auth/reset-password")
        .add_query_param("xt", "garbage")
        .form(&[("new_password", "abcdef"), ("confirm_password", "abcdef")])
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn reset_password_end_to_end() {
    let app = spawn_app();
    app.register_and_verify("a@x.com", "alice", "secret1").await;

    app.server.get("/auth/forgot-password/a@x.com").await;
    let token = app.last_mail_token();

    let response = app
        .server
        .post("/auth/reset-password")
        .add_query_param("xt", &token)
        .form(&[("new_password", "newpass9"), ("confirm_password", "newpass9")])
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("Password Successfully Reset"));

    let (status, _) = app.login("a@x.com", "newpass9").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.login("a@x.com", "secret1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn change_and_check_password_use_headers() {
    let app = spawn_app();
    app.register_and_verify("a@x.com", "alice", "secret1").await;
    let (_, body) = app.login("a@x.com", "secret1").await;
    let bearer = format!("Bearer {}", body["token"].as_str().unwrap());
    let id = body["user"]["id"].as_str().unwrap().to_string();

    let response = app
        .server
        .put(&format!("/auth/{id}/change-password"))
        .add_header("Authorization", &bearer)
        .add_header("newpassword", "changed7")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let updated: Value = response.json();
    assert_eq!(updated["username"], "alice");
    assert!(updated.get("password").is_none());

    // Short and missing headers are both 400.
    let response = app
        .server
        .put(&format!("/auth/{id}/change-password"))
        .add_header("Authorization", &bearer)
        .add_header("newpassword", "abc")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let response = app
        .server
        .put(&format!("/auth/{id}/change-password"))
        .add_header("Authorization", &bearer)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    // Unknown account id.
    let response = app
        .server
        .put(&format!("/auth/{}/change-password", Uuid::new_v4()))
        .add_header("Authorization", &bearer)
        .add_header("newpassword", "changed7")
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .get(&format!("/auth/{id}/check-password"))
        .add_header("Authorization", &bearer)
        .add_header("password", "changed7")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), Value::Bool(true));

    let response = app
        .server
        .get(&format!("/auth/{id}/check-password"))
        .add_header("Authorization", &bearer)
        .add_header("password", "secret1")
        .await;
    assert_eq!(response.json::<Value>(), Value::Bool(false));
}

fn multipart_field(boundary: &str, name: &str, value: &str) -> String {
    format!("--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
}

#[tokio::test]
async fn edit_account_updates_profile_fields() {
    let app = spawn_app();
    app.register_and_verify("a@x.com", "alice", "secret1").await;
    let (_, body) = app.login("a@x.com", "secret1").await;
    let bearer = format!("Bearer {}", body["token"].as_str().unwrap());
    let id = body["user"]["id"].as_str().unwrap().to_string();

    let boundary = "test-boundary";
    let mut payload = String::new();
    payload.push_str(&multipart_field(boundary, "bio", "dog person"));
    payload.push_str(&multipart_field(boundary, "is_private", "true"));
    payload.push_str(&format!("--{boundary}--\r\n"));

    let response = app
        .server
        .put(&format!("/auth/{id}"))
        .add_header("Authorization", &bearer)
        .content_type(&format!("multipart/form-data; boundary={boundary}"))
        .bytes(payload.into_bytes().into())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let updated: Value = response.json();
    assert_eq!(updated["bio"], "dog person");
    assert_eq!(updated["is_private"], true);
    assert_eq!(updated["username"], "alice");
}

#[tokio::test]
async fn avatar_upload_and_removal() {
    let app = spawn_app();
    app.register_and_verify("a@x.com", "alice", "secret1").await;
    let (_, body) = app.login("a@x.com", "secret1").await;
    let bearer = format!("Bearer {}", body["token"].as_str().unwrap());
    let id = body["user"]["id"].as_str().unwrap().to_string();

    let boundary = "test-boundary";
    let payload = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"avatar\"; \
         filename=\"me.jpg\"\r\nContent-Type: image/jpeg\r\n\r\nJPEGDATA\r\n--{boundary}--\r\n"
    );
    let response = app
        .server
        .put(&format!("/auth/{id}"))
        .add_header("Authorization", &bearer)
        .content_type(&format!("multipart/form-data; boundary={boundary}"))
        .bytes(payload.into_bytes().into())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let updated: Value = response.json();
    assert_eq!(updated["profile_pic"], format!("uploads/{id}.jpg"));
    let on_disk = app.state.uploads_dir.join(format!("{id}.jpg"));
    assert_eq!(std::fs::read(&on_disk).unwrap(), b"JPEGDATA");

    // An empty profile_pic clears the column and removes the file.
    let mut payload = multipart_field(boundary, "profile_pic", "");
    payload.push_str(&format!("--{boundary}--\r\n"));
    let response = app
        .server
        .put(&format!("/auth/{id}"))
        .add_header("Authorization", &bearer)
        .content_type(&format!("multipart/form-data; boundary={boundary}"))
        .bytes(payload.into_bytes().into())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let updated: Value = response.json();
    assert_eq!(updated["profile_pic"], Value::Null);
    assert!(!on_disk.exists());
}

#[tokio::test]
async fn delete_account_cascades_but_spares_chats() {
    let app = spawn_app();
    app.register_and_verify("a@x.com", "alice", "secret1").await;
    let (_, body) = app.login("a@x.com", "secret1").await;
    let bearer = format!("Bearer {}", body["token"].as_str().unwrap());
    let id = body["user"]["id"].as_str().unwrap().to_string();

    app.state.db.insert_post("p1", &id, "[]", "mine", None).unwrap();
    app.state.db.insert_story("s1", &id, "story", None).unwrap();
    app.state.db.insert_follow("f1", &id, "someone").unwrap();
    app.state.db.create_chat("ch1", "pals", &[id.clone()]).unwrap();
    app.state
        .db
        .insert_direct_message("m1", "ch1", &id, "hey", None)
        .unwrap();

    let response = app
        .server
        .delete(&format!("/auth/{id}"))
        .add_header("Authorization", &bearer)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let deleted: Value = response.json();
    assert_eq!(deleted["username"], "alice");

    assert!(app.state.db.get_account_by_id(&id).unwrap().is_none());
    assert!(app.state.db.get_post("p1").unwrap().is_none());
    assert!(app.state.db.get_story("s1").unwrap().is_none());
    assert!(app.state.db.get_follow("f1").unwrap().is_none());
    assert!(app.state.db.get_chat("ch1").unwrap().is_some());
    assert!(app.state.db.get_direct_message("m1").unwrap().is_some());

    // Unknown id after deletion.
    let response = app
        .server
        .delete(&format!("/auth/{id}"))
        .add_header("Authorization", &bearer)
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}
