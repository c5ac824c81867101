#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use jokka::blob::LocalBlobStore;
use jokka::config::{Config, StoreBackend};
use jokka::models::eo::{EoStatus, EventOrganizer};
use jokka::models::user::{Role, User};
use jokka::store::{collection, MemoryStore};
use jokka::utils::auth::create_jwt;
use jokka::utils::midtrans::{GatewayError, PaymentGateway, SnapRequest, SnapResponse};
use jokka::{build, Backends};
use mongodb::bson::oid::ObjectId;
use rocket::http::{ContentType, Header};
use rocket::local::asynchronous::Client;
use serde_json::Value;
use tokio::sync::Mutex;

pub const JWT_SECRET: &str = "test-secret";
pub const BASE_URL: &str = "http://localhost:8000";
pub const FRONTEND_ORIGIN: &str = "http://localhost:5173";
const BOUNDARY: &str = "X-JOKKA-TEST-BOUNDARY";

/// Gateway double that remembers every request and hands out fake tokens.
#[derive(Default)]
pub struct RecordingGateway {
    pub requests: Mutex<Vec<SnapRequest>>,
    pub fail: bool,
}

#[rocket::async_trait]
impl PaymentGateway for RecordingGateway {
    async fn create_transaction(&self, request: &SnapRequest) -> Result<SnapResponse, GatewayError> {
        self.requests.lock().await.push(request.clone());
        if self.fail {
            return Err(GatewayError::Rejected {
                status: 401,
                body: "Access denied due to unauthorized transaction".into(),
            });
        }
        Ok(SnapResponse {
            token: format!("snap-{}", request.transaction_details.order_id),
            redirect_url: String::new(),
        })
    }
}

pub struct TestApp {
    pub client: Client,
    pub store: Arc<MemoryStore>,
    pub gateway: Arc<RecordingGateway>,
    pub upload_dir: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

pub fn test_config(upload_dir: PathBuf) -> Config {
    Config {
        store_backend: StoreBackend::Memory,
        mongodb_uri: None,
        jwt_secret: JWT_SECRET.into(),
        admin_email: None,
        admin_password: None,
        midtrans_server_key: "SB-Mid-server-test".into(),
        midtrans_client_key: "SB-Mid-client-test".into(),
        midtrans_is_production: false,
        upload_dir,
        public_base_url: BASE_URL.into(),
        cors_allowed_origin: FRONTEND_ORIGIN.into(),
    }
}

pub async fn spawn() -> TestApp {
    spawn_with_gateway(RecordingGateway::default()).await
}

pub async fn spawn_with_gateway(gateway: RecordingGateway) -> TestApp {
    let upload_dir = std::env::temp_dir().join(format!("jokka-test-{}", uuid::Uuid::new_v4()));
    let store = Arc::new(MemoryStore::new());
    let gateway = Arc::new(gateway);

    let backends = Backends {
        store: store.clone(),
        blobs: Arc::new(LocalBlobStore::new(&upload_dir, BASE_URL)),
        gateway: gateway.clone(),
    };
    let rocket = build(test_config(upload_dir.clone()), backends).expect("upload dir");
    let client = Client::tracked(rocket).await.expect("valid rocket instance");

    TestApp {
        client,
        store,
        gateway,
        upload_dir,
    }
}

pub fn bearer(token: &str) -> Header<'static> {
    Header::new("Authorization", format!("Bearer {token}"))
}

/// Inserts an account directly and returns `(user id, bearer token)`.
pub async fn account(app: &TestApp, role: Role, email: &str) -> (String, String) {
    let mut user = User {
        id: None,
        name: email.split('@').next().unwrap_or("user").to_string(),
        email: email.to_string(),
        password_hash: String::new(),
        role,
        created_at: chrono::Utc::now(),
    };
    user.id = Some(collection::<User>(&*app.store).insert_one(&user).await.unwrap());
    let token = create_jwt(&user, JWT_SECRET).unwrap();
    (user.id.unwrap().to_hex(), token)
}

/// Organizer account with its profile in the given status.
pub async fn organizer(app: &TestApp, email: &str, status: EoStatus) -> (String, String, ObjectId) {
    let (user_id, token) = account(app, Role::Eo, email).await;
    let profile = EventOrganizer {
        id: None,
        user_id: user_id.clone(),
        organization_name: format!("{email} Productions"),
        contact_name: "Contact".into(),
        email: email.into(),
        phone: "0800".into(),
        address: "Jl. Malioboro 1".into(),
        documents: Default::default(),
        status,
        created_at: chrono::Utc::now(),
    };
    let eo_id = collection::<EventOrganizer>(&*app.store)
        .insert_one(&profile)
        .await
        .unwrap();
    (user_id, token, eo_id)
}

pub fn oid(value: &Value) -> String {
    value["_id"]["$oid"].as_str().expect("document id").to_string()
}

pub struct Part<'a> {
    pub name: &'a str,
    pub file: Option<(&'a str, &'a str)>,
    pub body: &'a [u8],
}

pub fn field<'a>(name: &'a str, value: &'a str) -> Part<'a> {
    Part { name, file: None, body: value.as_bytes() }
}

pub fn file<'a>(name: &'a str, file_name: &'a str, content_type: &'a str, body: &'a [u8]) -> Part<'a> {
    Part { name, file: Some((file_name, content_type)), body }
}

pub fn multipart(parts: &[Part<'_>]) -> (ContentType, Vec<u8>) {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part.file {
            Some((file_name, content_type)) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n",
                    part.name
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", part.name).as_bytes(),
            ),
        }
        body.extend_from_slice(part.body);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let content_type = ContentType::new("multipart", "form-data").with_params(("boundary", BOUNDARY));
    (content_type, body)
}
