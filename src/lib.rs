//! Jokka: a marketplace for local destinations and ticketed events.
//!
//! The HTTP surface lives in [`routes`]; handlers delegate to [`services`],
//! which talk to the outside world only through [`store::DocumentStore`],
//! [`blob::BlobStore`] and [`utils::midtrans::PaymentGateway`].

use std::sync::Arc;

use rocket::fairing::{Fairing, Info, Kind};
use rocket::fs::FileServer;
use rocket::http::Header;
use rocket::{Build, Request, Response, Rocket};

pub mod blob;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod telemetry;
pub mod utils;

use blob::{LocalBlobStore, SharedBlobs};
use config::{Config, StoreBackend};
use store::{MemoryStore, MongoStore, SharedStore};
use utils::midtrans::{MidtransGateway, SharedGateway};

/// Adds the cross-origin headers the browser front end needs.
pub struct Cors {
    allowed_origin: String,
}

impl Cors {
    pub fn new(allowed_origin: impl Into<String>) -> Self {
        Cors {
            allowed_origin: allowed_origin.into(),
        }
    }
}

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "CORS headers",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", self.allowed_origin.clone()));
        response.set_header(Header::new("Access-Control-Allow-Methods", "GET, POST, PATCH, DELETE, OPTIONS"));
        response.set_header(Header::new("Access-Control-Allow-Headers", "Authorization, Content-Type"));
        // Browsers refuse credentials with a wildcard origin.
        if self.allowed_origin != "*" {
            response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
            response.set_header(Header::new("Vary", "Origin"));
        }
    }
}

/// External collaborators the application runs against.
pub struct Backends {
    pub store: SharedStore,
    pub blobs: SharedBlobs,
    pub gateway: SharedGateway,
}

impl Backends {
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let store: SharedStore = match config.store_backend {
            StoreBackend::Mongo => Arc::new(MongoStore::connect(config).await?),
            StoreBackend::Memory => {
                tracing::warn!("using the in-memory store, data is lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Backends {
            store,
            blobs: Arc::new(LocalBlobStore::new(&config.upload_dir, &config.public_base_url)),
            gateway: Arc::new(MidtransGateway::from_config(config)),
        })
    }
}

/// Assembles the application. Creates the upload directory served at `/files`.
pub fn build(config: Config, backends: Backends) -> std::io::Result<Rocket<Build>> {
    std::fs::create_dir_all(&config.upload_dir)?;
    let files = FileServer::from(&config.upload_dir);
    let cors = Cors::new(config.cors_allowed_origin.clone());

    Ok(rocket::build()
        .manage(config)
        .manage(backends.store)
        .manage(backends.blobs)
        .manage(backends.gateway)
        .attach(cors)
        .mount("/", rocket::routes![routes::preflight])
        .mount("/api", routes::public::routes())
        .mount("/api", routes::visitor::routes())
        .mount("/api/auth", routes::auth::routes())
        .mount("/api/checkout", routes::checkout::routes())
        .mount("/api/eo", routes::eo::routes())
        .mount("/api/admin", routes::admin::routes())
        .mount("/files", files)
        .register("/", routes::catchers()))
}
