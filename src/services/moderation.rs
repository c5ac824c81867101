//! Admin review of organizers and events.
//!
//! A status change is a plain overwrite: any status may be set from any other,
//! and the public catalog reflects it on the next read.

use mongodb::bson::{doc, oid::ObjectId, Document};

use crate::error::{ApiError, ApiResult};
use crate::models::eo::{EoStatus, EventOrganizer};
use crate::models::event::{Event, EventStatus};
use crate::store::{collection, DocumentStore, Model};

async fn flip_status<T: Model>(
    store: &dyn DocumentStore,
    id: ObjectId,
    status: &str,
    what: &'static str,
) -> ApiResult<()> {
    let matched = collection::<T>(store)
        .update_by_id(id, doc! { "status": status })
        .await?;
    if !matched {
        return Err(ApiError::NotFound(what));
    }
    tracing::info!(collection = T::COLLECTION, id = %id, status, "status changed");
    Ok(())
}

fn status_filter(status: Option<&str>) -> Document {
    match status {
        Some(status) => doc! { "status": status },
        None => doc! {},
    }
}

pub async fn list_organizers(store: &dyn DocumentStore, status: Option<EoStatus>) -> ApiResult<Vec<EventOrganizer>> {
    let mut organizers = collection::<EventOrganizer>(store)
        .find(status_filter(status.as_ref().map(EoStatus::as_str)))
        .await?;
    organizers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(organizers)
}

pub async fn set_organizer_status(store: &dyn DocumentStore, id: ObjectId, status: EoStatus) -> ApiResult<()> {
    flip_status::<EventOrganizer>(store, id, status.as_str(), "Organizer").await
}

pub async fn list_events(store: &dyn DocumentStore, status: Option<EventStatus>) -> ApiResult<Vec<Event>> {
    let mut events = collection::<Event>(store)
        .find(status_filter(status.as_ref().map(EventStatus::as_str)))
        .await?;
    events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(events)
}

pub async fn set_event_status(store: &dyn DocumentStore, id: ObjectId, status: EventStatus) -> ApiResult<()> {
    flip_status::<Event>(store, id, status.as_str(), "Event").await
}
