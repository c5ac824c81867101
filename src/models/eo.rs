use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use mongodb::bson::oid::ObjectId;
use chrono::{DateTime, Utc};

use crate::store::Model;

/// Partner account allowed to publish events once an admin verifies it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventOrganizer {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub organization_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// Document kind (`identityCard`, `taxId`, ...) to download URL.
    #[serde(default)]
    pub documents: BTreeMap<String, String>,
    pub status: EoStatus,
    #[serde(default = "chrono::Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Model for EventOrganizer {
    const COLLECTION: &'static str = "eos";
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, rocket::FromFormField)]
#[serde(rename_all = "snake_case")]
pub enum EoStatus {
    #[field(value = "pending_verification")]
    PendingVerification,
    #[field(value = "verified")]
    Verified,
    #[field(value = "rejected")]
    Rejected,
}

impl EoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EoStatus::PendingVerification => "pending_verification",
            EoStatus::Verified => "verified",
            EoStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for EoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
pub struct EoStatusPayload {
    pub status: EoStatus,
}
