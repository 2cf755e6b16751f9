//! Shared harness: full router over an in-memory database, a stub chat
//! backend and a temporary upload directory.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use ceylon_server::auth::{JwtConfig, hash_password};
use ceylon_server::db::repository::user::{self, NewUser};
use ceylon_server::services::{ChatBackend, ChatError, ImageStore};
use ceylon_server::{DbService, JwtService, ServerState, build_app};
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use shared::models::Role;
use tempfile::TempDir;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Canned chat backend
pub enum StubChat {
    Reply(&'static str),
    Fail,
}

#[async_trait]
impl ChatBackend for StubChat {
    async fn reply(&self, message: &str) -> Result<String, ChatError> {
        match self {
            StubChat::Reply(text) => Ok(format!("{text} ({message})")),
            StubChat::Fail => Err(ChatError::Upstream {
                status: 502,
                body: "bad gateway".into(),
            }),
        }
    }
}

pub struct TestApp {
    pub state: ServerState,
    pub app: Router,
    pub uploads: TempDir,
}

pub struct Response {
    pub status: StatusCode,
    pub headers: http::HeaderMap,
    pub bytes: Vec<u8>,
}

impl Response {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.bytes).unwrap_or(Value::Null)
    }
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_chat(StubChat::Reply("Try Ella")).await
    }

    pub async fn with_chat(chat: StubChat) -> Self {
        let db = DbService::in_memory().await.unwrap();
        let jwt = JwtService::with_config(JwtConfig {
            secret: TEST_SECRET.into(),
            ..JwtConfig::default()
        });
        let uploads = tempfile::tempdir().unwrap();
        let state = ServerState::new(db, jwt, Arc::new(chat), ImageStore::new(uploads.path()));
        let app = build_app(state.clone());
        Self {
            state,
            app,
            uploads,
        }
    }

    async fn insert_user(&self, email: &str, role: Role) -> (i64, String) {
        let hash = hash_password("password123").unwrap();
        let created = user::create(
            self.state.pool(),
            &NewUser {
                name: "Test User",
                email,
                password_hash: &hash,
                phone: "+94 77 000 0000",
                country: "Sri Lanka",
                role,
            },
        )
        .await
        .unwrap();
        let token = self
            .state
            .jwt_service()
            .generate_token(created.id, email, role)
            .unwrap();
        (created.id, token)
    }

    pub async fn admin_token(&self) -> String {
        self.insert_user("admin@ceylon.travel", Role::Admin).await.1
    }

    pub async fn customer(&self, email: &str) -> (i64, String) {
        self.insert_user(email, Role::Customer).await
    }

    pub async fn send(&self, req: Request<Body>) -> Response {
        let resp = self.app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes().to_vec();
        Response {
            status,
            headers,
            bytes,
        }
    }
}

fn builder(method: &str, uri: &str, token: Option<&str>) -> http::request::Builder {
    let mut b = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        b = b.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    b
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    builder("GET", uri, token).body(Body::empty()).unwrap()
}

pub fn delete(uri: &str, token: Option<&str>) -> Request<Body> {
    builder("DELETE", uri, token).body(Body::empty()).unwrap()
}

pub fn json(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    builder(method, uri, token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// One part of a multipart body
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

pub fn multipart(method: &str, uri: &str, token: Option<&str>, parts: &[Part<'_>]) -> Request<Body> {
    let boundary = "ceylon-test-boundary";
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File(name, filename, data) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    builder(method, uri, token)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// A small valid PNG; `shade` changes the content hash
pub fn png(shade: u8) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(2, 2, image::Rgb([shade, 100, 50]));
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// An ISO date `days` from today
pub fn date_in(days: i64) -> String {
    (shared::util::today() + chrono::Duration::days(days)).to_string()
}
