//! Router-level test harness: the full app over in-memory repositories and
//! a temporary upload directory.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::config::Config;
use crate::db::memory::MemoryStore;
use crate::routes::create_routes;
use crate::state::AppState;

const BOUNDARY: &str = "X-TICKETING-TEST-BOUNDARY";
pub const TEST_HOST: &str = "test.local";

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    router: Router,
    upload_dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let upload_dir = tempfile::tempdir().unwrap();
        let config = Config {
            upload_dir: upload_dir.path().to_path_buf(),
            bcrypt_cost: 4,
            ..Config::default()
        };
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(config, store.clone(), store.clone(), store.clone());

        Self {
            store,
            router: create_routes(state),
            upload_dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = self.send_raw(request).await;
        if bytes.is_empty() {
            return (status, Value::Null);
        }
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }

    pub async fn send_raw(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn builder(method: Method, uri: &str) -> axum::http::request::Builder {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::HOST, TEST_HOST)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Self::builder(Method::GET, uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_as(&self, uri: &str, caller: &str) -> (StatusCode, Value) {
        let request = Self::builder(Method::GET, uri)
            .header("x-user-id", caller)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Self::builder(Method::DELETE, uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.json(Method::POST, uri, body, None).await
    }

    pub async fn post_json_as(&self, uri: &str, body: Value, caller: &str) -> (StatusCode, Value) {
        self.json(Method::POST, uri, body, Some(caller)).await
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.json(Method::PUT, uri, body, None).await
    }

    async fn json(
        &self,
        method: Method,
        uri: &str,
        body: Value,
        caller: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder =
            Self::builder(method, uri).header(header::CONTENT_TYPE, "application/json");
        if let Some(caller) = caller {
            builder = builder.header("x-user-id", caller);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn multipart(&self, method: Method, uri: &str, form: MultipartForm) -> (StatusCode, Value) {
        let request = Self::builder(method, uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(form.encode()))
            .unwrap();
        self.send(request).await
    }

    pub async fn create_event(&self, form: MultipartForm) -> (StatusCode, Value) {
        self.multipart(Method::POST, "/api/events", form).await
    }

    pub async fn update_event(&self, id: &str, form: MultipartForm) -> (StatusCode, Value) {
        self.multipart(Method::PUT, &format!("/api/events/{id}"), form)
            .await
    }

    /// Register a user and return its id.
    pub async fn register(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .post_json(
                "/api/auth/register",
                serde_json::json!({"name": "Test User", "email": email, "password": password}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["user"]["user_id"].as_str().unwrap().to_string()
    }

    /// Names of the files currently in the upload directory, sorted.
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.upload_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// Multipart request body builder.
pub struct MultipartForm {
    fields: Vec<(String, String)>,
    files: Vec<(String, String, Vec<u8>)>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            files: Vec::new(),
        }
    }

    /// A form describing a valid event.
    pub fn event() -> Self {
        Self::new()
            .field("title", "Launch party")
            .field("description", "Doors at six")
            .field("date", "2025-06-01")
            .field("time", "18:30")
            .field("location", "Main hall")
            .field("created_by", "host@example.com")
    }

    pub fn field(mut self, name: &str, value: &str) -> Self {
        self.fields.retain(|(n, _)| n != name);
        self.fields.push((name.to_string(), value.to_string()));
        self
    }

    pub fn without(mut self, name: &str) -> Self {
        self.fields.retain(|(n, _)| n != name);
        self
    }

    pub fn image(self, filename: &str, bytes: &[u8]) -> Self {
        self.file("image", filename, bytes)
    }

    pub fn file(mut self, field: &str, filename: &str, bytes: &[u8]) -> Self {
        self.files
            .push((field.to_string(), filename.to_string(), bytes.to_vec()));
        self
    }

    fn encode(&self) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in &self.fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        for (name, filename, bytes) in &self.files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }
}
