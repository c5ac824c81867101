use std::sync::Arc;

use serde::{Deserialize, Serialize};
use reqwest::Client;
use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;

use crate::config::Config;

const SANDBOX_SNAP_URL: &str = "https://app.sandbox.midtrans.com/snap/v1/transactions";
const PRODUCTION_SNAP_URL: &str = "https://app.midtrans.com/snap/v1/transactions";
const SANDBOX_SNAP_JS: &str = "https://app.sandbox.midtrans.com/snap/snap.js";
const PRODUCTION_SNAP_JS: &str = "https://app.midtrans.com/snap/snap.js";

pub type SharedGateway = Arc<dyn PaymentGateway>;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("payment gateway request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("payment gateway rejected the transaction ({status}): {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SnapTransactionDetails {
    pub order_id: String,
    pub gross_amount: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SnapItemDetail {
    pub id: String,
    pub price: i64,
    pub quantity: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SnapCustomerDetails {
    pub first_name: String,
    pub email: String,
    pub phone: String,
}

/// Body of the Snap "create transaction" call.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SnapRequest {
    pub transaction_details: SnapTransactionDetails,
    pub item_details: Vec<SnapItemDetail>,
    pub customer_details: SnapCustomerDetails,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapResponse {
    pub token: String,
    #[serde(default)]
    pub redirect_url: String,
}

#[rocket::async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_transaction(&self, request: &SnapRequest) -> Result<SnapResponse, GatewayError>;
}

pub struct MidtransGateway {
    client: Client,
    server_key: String,
    endpoint: &'static str,
}

impl MidtransGateway {
    pub fn new(server_key: impl Into<String>, is_production: bool) -> Self {
        MidtransGateway {
            client: Client::new(),
            server_key: server_key.into(),
            endpoint: if is_production { PRODUCTION_SNAP_URL } else { SANDBOX_SNAP_URL },
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.midtrans_server_key.clone(), config.midtrans_is_production)
    }

    fn auth_header(&self) -> String {
        let credentials = format!("{}:", self.server_key);
        format!("Basic {}", general_purpose::STANDARD.encode(credentials))
    }
}

/// Script the front end loads to open the checkout widget.
pub fn snap_script_url(is_production: bool) -> &'static str {
    if is_production {
        PRODUCTION_SNAP_JS
    } else {
        SANDBOX_SNAP_JS
    }
}

#[rocket::async_trait]
impl PaymentGateway for MidtransGateway {
    async fn create_transaction(&self, request: &SnapRequest) -> Result<SnapResponse, GatewayError> {
        let response = self
            .client
            .post(self.endpoint)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.json::<SnapResponse>().await?)
        } else {
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            Err(GatewayError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}
