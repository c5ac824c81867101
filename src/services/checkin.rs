use mongodb::bson::doc;
use serde::Serialize;

use super::parse_id;
use crate::error::{ApiError, ApiResult};
use crate::models::event::Event;
use crate::models::transaction::Transaction;
use crate::store::{collection, DocumentStore};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    /// Only settled purchases admit entry.
    pub validated: bool,
    pub transaction: Transaction,
}

/// Looks up a ticket by order id for the organizer running the door.
///
/// Nothing is written: scanning the same ticket again gives the same answer.
pub async fn check_in(store: &dyn DocumentStore, organizer_id: &str, order_id: &str) -> ApiResult<CheckIn> {
    let order_id = order_id.trim();
    if order_id.is_empty() {
        return Err(ApiError::Validation("orderId is required".into()));
    }

    let transaction = collection::<Transaction>(store)
        .find_one(doc! { "orderId": order_id })
        .await?
        .ok_or(ApiError::NotFound("Ticket"))?;

    let event = collection::<Event>(store)
        .find_by_id(parse_id(&transaction.event_id, "event")?)
        .await?
        .ok_or(ApiError::NotFound("Event"))?;

    if event.organizer_id != organizer_id {
        return Err(ApiError::Forbidden("Ticket is for another organizer's event".into()));
    }

    let validated = transaction.is_settled();
    tracing::info!(order_id, event_id = %transaction.event_id, validated, "ticket checked in");
    Ok(CheckIn { validated, transaction })
}
