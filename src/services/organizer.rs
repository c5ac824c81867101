//! Event management for organizers.
//!
//! An event's `organizerId` is the organizer's user id, so ownership checks
//! compare it with the id in the caller's token.

use mongodb::bson::{self, doc, oid::ObjectId, Document};

use super::required;
use crate::blob::{blob_path, BlobStore, Upload};
use crate::error::{ApiError, ApiResult};
use crate::models::eo::{EoStatus, EventOrganizer};
use crate::models::event::{Event, EventStatus, EventUpdate, TicketType};
use crate::models::id_hex;
use crate::store::{collection, DocumentStore, StoreError};

pub async fn organizer_for_user(store: &dyn DocumentStore, user_id: &str) -> ApiResult<EventOrganizer> {
    collection::<EventOrganizer>(store)
        .find_one(doc! { "userId": user_id })
        .await?
        .ok_or(ApiError::NotFound("Organizer profile"))
}

async fn ensure_verified(store: &dyn DocumentStore, user_id: &str) -> ApiResult<EventOrganizer> {
    let organizer = organizer_for_user(store, user_id).await?;
    if organizer.status != EoStatus::Verified {
        return Err(ApiError::Forbidden(format!(
            "Organizer account is {}, events require a verified account",
            organizer.status
        )));
    }
    Ok(organizer)
}

#[derive(Debug, Clone, Default)]
pub struct NewTicketType {
    pub name: String,
    pub price: i64,
    pub stock: i32,
}

#[derive(Debug, Clone, Default)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub category: String,
    pub start_date: String,
    pub end_date: String,
    pub location_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub ticket_types: Vec<NewTicketType>,
    /// Send straight to review instead of saving a draft.
    pub submit: bool,
}

fn validate_tickets(tickets: &[TicketType]) -> ApiResult<()> {
    if tickets.is_empty() {
        return Err(ApiError::Validation("at least one ticket type is required".into()));
    }
    for ticket in tickets {
        if ticket.name.trim().is_empty() {
            return Err(ApiError::Validation("ticket type name is required".into()));
        }
        if ticket.price < 0 || ticket.stock < 0 {
            return Err(ApiError::Validation(format!(
                "ticket type `{}` has a negative price or stock",
                ticket.name
            )));
        }
    }
    Ok(())
}

pub async fn create_event(
    store: &dyn DocumentStore,
    blobs: &dyn BlobStore,
    user_id: &str,
    input: NewEvent,
    poster: Option<Upload>,
) -> ApiResult<Event> {
    let title = required(&input.title, "title")?;
    let start_date = required(&input.start_date, "startDate")?;
    let end_date = required(&input.end_date, "endDate")?;
    let location_name = required(&input.location_name, "locationName")?;
    let ticket_types: Vec<TicketType> = input
        .ticket_types
        .into_iter()
        .map(|ticket| TicketType {
            name: ticket.name.trim().to_string(),
            price: ticket.price,
            stock: ticket.stock,
            sold: 0,
        })
        .collect();
    validate_tickets(&ticket_types)?;
    let poster = poster.ok_or_else(|| ApiError::Validation("poster is required".into()))?;

    ensure_verified(store, user_id).await?;

    let poster_url = blobs.put(&blob_path("events", &poster.file_name), &poster).await?;

    let mut event = Event {
        id: None,
        organizer_id: user_id.to_string(),
        title,
        description: input.description.trim().to_string(),
        category: input.category.trim().to_string(),
        start_date,
        end_date,
        location_name,
        latitude: input.latitude,
        longitude: input.longitude,
        poster_url,
        ticket_types,
        status: if input.submit {
            EventStatus::PendingReview
        } else {
            EventStatus::Draft
        },
        created_at: chrono::Utc::now(),
    };
    event.id = Some(collection::<Event>(store).insert_one(&event).await?);

    tracing::info!(
        event_id = %id_hex(&event.id),
        organizer_id = user_id,
        status = %event.status,
        "event created"
    );
    Ok(event)
}

pub async fn list_own_events(store: &dyn DocumentStore, user_id: &str) -> ApiResult<Vec<Event>> {
    let mut events = collection::<Event>(store)
        .find(doc! { "organizerId": user_id })
        .await?;
    events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(events)
}

async fn owned_event(store: &dyn DocumentStore, user_id: &str, id: ObjectId) -> ApiResult<Event> {
    let event = collection::<Event>(store)
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Event"))?;
    if event.organizer_id != user_id {
        return Err(ApiError::Forbidden("Event belongs to another organizer".into()));
    }
    Ok(event)
}

/// Stored `sold` counts follow their ticket type by name; new types start at 0.
fn carry_sold_counts(existing: &[TicketType], updated: Vec<TicketType>) -> Vec<TicketType> {
    updated
        .into_iter()
        .map(|mut ticket| {
            ticket.sold = existing
                .iter()
                .find(|old| old.name == ticket.name)
                .map_or(0, |old| old.sold);
            ticket
        })
        .collect()
}

pub async fn update_event(
    store: &dyn DocumentStore,
    user_id: &str,
    id: ObjectId,
    update: EventUpdate,
) -> ApiResult<Event> {
    let event = owned_event(store, user_id, id).await?;

    let mut set = Document::new();
    if let Some(title) = &update.title {
        set.insert("title", required(title, "title")?);
    }
    if let Some(description) = &update.description {
        set.insert("description", description.trim());
    }
    if let Some(category) = &update.category {
        set.insert("category", category.trim());
    }
    if let Some(start_date) = &update.start_date {
        set.insert("startDate", required(start_date, "startDate")?);
    }
    if let Some(end_date) = &update.end_date {
        set.insert("endDate", required(end_date, "endDate")?);
    }
    if let Some(location_name) = &update.location_name {
        set.insert("locationName", required(location_name, "locationName")?);
    }
    if let Some(latitude) = update.latitude {
        set.insert("latitude", latitude);
    }
    if let Some(longitude) = update.longitude {
        set.insert("longitude", longitude);
    }
    if let Some(ticket_types) = update.ticket_types {
        let ticket_types = carry_sold_counts(&event.ticket_types, ticket_types);
        validate_tickets(&ticket_types)?;
        set.insert("ticketTypes", bson::to_bson(&ticket_types).map_err(StoreError::from)?);
    }

    if set.is_empty() {
        return Ok(event);
    }

    let events = collection::<Event>(store);
    events.update_by_id(id, set).await?;
    tracing::info!(event_id = %id, organizer_id = user_id, "event updated");
    events.find_by_id(id).await?.ok_or(ApiError::NotFound("Event"))
}

/// Moves a draft (or a rejected event being resubmitted) into the review queue.
pub async fn submit_event(store: &dyn DocumentStore, user_id: &str, id: ObjectId) -> ApiResult<Event> {
    let mut event = owned_event(store, user_id, id).await?;
    if !matches!(event.status, EventStatus::Draft | EventStatus::Rejected) {
        return Err(ApiError::Conflict(format!("Event is already {}", event.status)));
    }
    ensure_verified(store, user_id).await?;

    collection::<Event>(store)
        .update_by_id(id, doc! { "status": EventStatus::PendingReview.as_str() })
        .await?;
    event.status = EventStatus::PendingReview;
    tracing::info!(event_id = %id, "event submitted for review");
    Ok(event)
}

pub async fn delete_event(store: &dyn DocumentStore, user_id: &str, id: ObjectId) -> ApiResult<()> {
    owned_event(store, user_id, id).await?;
    collection::<Event>(store).delete_by_id(id).await?;
    tracing::info!(event_id = %id, organizer_id = user_id, "event deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(name: &str, sold: i32) -> TicketType {
        TicketType { name: name.into(), price: 50_000, stock: 100, sold }
    }

    #[test]
    fn sold_counts_survive_ticket_edits() {
        let existing = vec![ticket("VIP", 7), ticket("Regular", 20)];
        let updated = vec![ticket("Regular", 999), ticket("Student", 5)];

        let merged = carry_sold_counts(&existing, updated);

        assert_eq!(merged[0].sold, 20);
        assert_eq!(merged[1].sold, 0);
    }

    #[test]
    fn tickets_must_be_present_and_non_negative() {
        assert!(validate_tickets(&[]).is_err());
        assert!(validate_tickets(&[ticket(" ", 0)]).is_err());
        let mut negative = ticket("Regular", 0);
        negative.stock = -1;
        assert!(validate_tickets(&[negative]).is_err());
        assert!(validate_tickets(&[ticket("Regular", 0)]).is_ok());
    }
}
