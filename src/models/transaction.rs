use serde::{Deserialize, Serialize};
use mongodb::bson::oid::ObjectId;
use chrono::{DateTime, Utc};

use crate::store::Model;

/// Gateway status of a completed payment.
pub const SETTLEMENT: &str = "settlement";
pub const PENDING: &str = "pending";

/// A purchase as recorded from the checkout widget and the gateway
/// notifications. `status` mirrors the gateway's status strings verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub order_id: String,
    pub event_id: String,
    pub event_name: String,
    pub user_id: String,
    #[serde(default)]
    pub ticket_type: Option<String>,
    #[serde(default = "one")]
    pub quantity: i64,
    pub amount: i64,
    pub status: String,
    #[serde(default)]
    pub payment_type: Option<String>,
    #[serde(default = "chrono::Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "chrono::Utc::now")]
    pub updated_at: DateTime<Utc>,
}

fn one() -> i64 {
    1
}

impl Model for Transaction {
    const COLLECTION: &'static str = "transactions";
}

impl Transaction {
    pub fn is_settled(&self) -> bool {
        self.status == SETTLEMENT
    }
}

/// Sent by the front end once the checkout widget reports a result.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordTransactionPayload {
    pub order_id: String,
    pub event_id: String,
    pub ticket_type: Option<String>,
    #[serde(default = "one")]
    pub quantity: i64,
    pub amount: i64,
    #[serde(default)]
    pub status: Option<String>,
    pub payment_type: Option<String>,
}
