use serde::{Deserialize, Serialize};
use mongodb::bson::oid::ObjectId;
use chrono::{DateTime, Utc};

use crate::store::Model;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub rating: f64,
    pub description: String,
    pub location: String,
    #[serde(default)]
    pub price: i64,
    pub image_url: String,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "chrono::Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Model for Place {
    const COLLECTION: &'static str = "places";
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedPayload {
    pub is_featured: bool,
}
