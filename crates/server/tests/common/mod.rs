//! Shared harness for router-level tests. Each test connects to the
//! database behind DATABASE_URL and skips itself when none is reachable.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use tower::ServiceExt;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use models::user::Role;
use server::{build_router, ServerAuthConfig, ServerState};
use service::auth::domain::AuthUser;
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::service::{AuthConfig, AuthService};
use service::invitation::mailer::LogMailer;

pub const JWT_SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub uploads_dir: String,
}

pub async fn try_app() -> Option<TestApp> {
    let db = models::db::connect().await.ok()?;
    Migrator::up(&db, None).await.ok()?;

    let uploads_dir = std::env::temp_dir()
        .join(format!("docket-test-uploads-{}", Uuid::new_v4()))
        .to_string_lossy()
        .into_owned();
    tokio::fs::create_dir_all(&uploads_dir).await.ok()?;

    let state = ServerState {
        db: db.clone(),
        auth: ServerAuthConfig { jwt_secret: JWT_SECRET.into(), token_ttl_hours: 12 },
        mailer: Arc::new(LogMailer),
        registration_base_url: "http://localhost:8080".into(),
        uploads_dir: uploads_dir.clone(),
    };
    Some(TestApp { router: build_router(CorsLayer::very_permissive(), state), db, uploads_dir })
}

impl TestApp {
    /// Create an account directly and mint a token for it.
    pub async fn user_with_token(&self, role: Role) -> (AuthUser, String) {
        let created = service::users::create(
            &self.db,
            service::users::NewUser {
                email: format!("t-{}@example.com", Uuid::new_v4()),
                username: format!("tester-{}", role.as_str()),
                password: "integration-pass".into(),
                role,
            },
        )
        .await
        .unwrap();
        let user = AuthUser {
            id: created.id,
            email: created.email,
            username: created.username,
            role: created.role,
            is_active: created.is_active,
        };
        let svc = AuthService::new(
            Arc::new(SeaOrmAuthRepository { db: self.db.clone() }),
            AuthConfig { jwt_secret: JWT_SECRET.into(), token_ttl_hours: 12 },
        );
        let token = svc.issue_token(&user).unwrap();
        (user, token)
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, json)
    }
}

pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

const BOUNDARY: &str = "test-boundary-7e58";

/// Hand-rolled multipart body: (name, filename, content) triples. Text
/// fields pass `None` for the filename.
pub fn multipart_request(
    method: &str,
    uri: &str,
    token: &str,
    parts: &[(&str, Option<&str>, &[u8])],
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, filename, content) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(f) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}
