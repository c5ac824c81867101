use serde::{Deserialize, Serialize};
use mongodb::bson::oid::ObjectId;
use chrono::{DateTime, Utc};

use crate::store::Model;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub organizer_id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub start_date: String,
    pub end_date: String,
    pub location_name: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub poster_url: String,
    #[serde(default)]
    pub ticket_types: Vec<TicketType>,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default = "chrono::Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Model for Event {
    const COLLECTION: &'static str = "events";
}

impl Event {
    /// Cheapest ticket, used as the listing price.
    pub fn min_price(&self) -> Option<i64> {
        self.ticket_types.iter().map(|ticket| ticket.price).min()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TicketType {
    pub name: String,
    pub price: i64,
    pub stock: i32,
    #[serde(default)]
    pub sold: i32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, rocket::FromFormField)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    #[field(value = "draft")]
    Draft,
    #[field(value = "pending_review")]
    PendingReview,
    #[serde(alias = "approved")]
    #[field(value = "published")]
    #[field(value = "approved")]
    Published,
    #[field(value = "rejected")]
    Rejected,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::PendingReview => "pending_review",
            EventStatus::Published => "published",
            EventStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
pub struct EventStatusPayload {
    pub status: EventStatus,
}

/// Fields an organizer may edit after creation. Absent fields stay as stored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub location_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub ticket_types: Option<Vec<TicketType>>,
}
