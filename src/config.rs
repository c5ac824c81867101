use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    pub mongodb_uri: Option<String>,
    pub jwt_secret: String,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    pub midtrans_server_key: String,
    pub midtrans_client_key: String,
    pub midtrans_is_production: bool,
    pub upload_dir: PathBuf,
    pub public_base_url: String,
    /// Value of `Access-Control-Allow-Origin`; `*` allows any front end.
    pub cors_allowed_origin: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let store_backend = match env::var("JOKKA_STORE").ok().as_deref() {
            None | Some("mongo") => StoreBackend::Mongo,
            Some("memory") => StoreBackend::Memory,
            Some(other) => anyhow::bail!("JOKKA_STORE must be `mongo` or `memory`, got `{other}`"),
        };

        let mongodb_uri = env::var("MONGODB_URI").ok();
        if store_backend == StoreBackend::Mongo && mongodb_uri.is_none() {
            anyhow::bail!("MONGODB_URI must be set");
        }

        let midtrans_is_production = match env::var("MIDTRANS_IS_PRODUCTION") {
            Ok(raw) => raw
                .parse::<bool>()
                .with_context(|| format!("MIDTRANS_IS_PRODUCTION is not a bool: {raw}"))?,
            Err(_) => false,
        };

        Ok(Config {
            store_backend,
            mongodb_uri,
            jwt_secret: required("JWT_SECRET")?,
            admin_email: env::var("ADMIN_EMAIL").ok(),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
            midtrans_server_key: env::var("MIDTRANS_SERVER_KEY").unwrap_or_default(),
            midtrans_client_key: env::var("MIDTRANS_CLIENT_KEY").unwrap_or_default(),
            midtrans_is_production,
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN").unwrap_or_else(|_| "*".to_string()),
        })
    }

    /// Checks what the HTTP server needs beyond what every binary needs.
    /// Checkout cannot work without the Midtrans server key, so only the
    /// in-memory development backend may start without one.
    pub fn ensure_server_ready(&self) -> Result<()> {
        if self.midtrans_server_key.trim().is_empty() && self.store_backend != StoreBackend::Memory {
            anyhow::bail!("MIDTRANS_SERVER_KEY must be set");
        }
        Ok(())
    }

    /// Database name taken from the path segment of the connection string.
    pub fn database_name(&self) -> &str {
        self.mongodb_uri
            .as_deref()
            .and_then(|uri| uri.rsplit('/').next())
            .map(|tail| tail.split('?').next().unwrap_or(tail))
            .filter(|name| !name.is_empty() && !name.contains(':'))
            .unwrap_or("jokka")
    }
}

fn required(name: &str) -> Result<String> {
    env::var(name).with_context(|| format!("{name} must be set"))
}
