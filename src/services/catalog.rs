use mongodb::bson::{doc, oid::ObjectId};

use super::listing::{self, ListQuery};
use super::required;
use crate::blob::{blob_path, BlobStore, Upload};
use crate::error::{ApiError, ApiResult};
use crate::models::event::{Event, EventStatus};
use crate::models::id_hex;
use crate::models::place::Place;
use crate::store::{collection, DocumentStore};

pub async fn list_places(
    store: &dyn DocumentStore,
    featured: Option<bool>,
    query: &ListQuery,
) -> ApiResult<Vec<Place>> {
    let filter = match featured {
        Some(featured) => doc! { "isFeatured": featured },
        None => doc! {},
    };
    let places = collection::<Place>(store).find(filter).await?;
    Ok(listing::apply(places, query))
}

pub async fn get_place(store: &dyn DocumentStore, id: ObjectId) -> ApiResult<Place> {
    collection::<Place>(store)
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("Place"))
}

pub async fn list_published_events(store: &dyn DocumentStore, query: &ListQuery) -> ApiResult<Vec<Event>> {
    let events = collection::<Event>(store)
        .find(doc! { "status": EventStatus::Published.as_str() })
        .await?;
    Ok(listing::apply(events, query))
}

/// Events that are not published are invisible to the public, so they
/// report as not found.
pub async fn get_published_event(store: &dyn DocumentStore, id: ObjectId) -> ApiResult<Event> {
    collection::<Event>(store)
        .find_one(doc! { "_id": id, "status": EventStatus::Published.as_str() })
        .await?
        .ok_or(ApiError::NotFound("Event"))
}

#[derive(Debug, Clone, Default)]
pub struct NewPlace {
    pub name: String,
    pub category: String,
    pub rating: f64,
    pub description: String,
    pub location: String,
    pub price: i64,
    pub is_featured: bool,
}

pub async fn create_place(
    store: &dyn DocumentStore,
    blobs: &dyn BlobStore,
    input: NewPlace,
    image: Option<Upload>,
) -> ApiResult<Place> {
    let name = required(&input.name, "name")?;
    let category = required(&input.category, "category")?;
    let location = required(&input.location, "location")?;
    if !(0.0..=5.0).contains(&input.rating) {
        return Err(ApiError::Validation("rating must be between 0 and 5".into()));
    }
    if input.price < 0 {
        return Err(ApiError::Validation("price must not be negative".into()));
    }
    let image = image.ok_or_else(|| ApiError::Validation("image is required".into()))?;

    let image_url = blobs.put(&blob_path("places", &image.file_name), &image).await?;

    let mut place = Place {
        id: None,
        name,
        category,
        rating: input.rating,
        description: input.description.trim().to_string(),
        location,
        price: input.price,
        image_url,
        is_featured: input.is_featured,
        created_at: chrono::Utc::now(),
    };
    place.id = Some(collection::<Place>(store).insert_one(&place).await?);

    tracing::info!(place_id = %id_hex(&place.id), name = %place.name, "place created");
    Ok(place)
}

pub async fn set_place_featured(store: &dyn DocumentStore, id: ObjectId, is_featured: bool) -> ApiResult<()> {
    let matched = collection::<Place>(store)
        .update_by_id(id, doc! { "isFeatured": is_featured })
        .await?;
    if matched {
        Ok(())
    } else {
        Err(ApiError::NotFound("Place"))
    }
}

pub async fn delete_place(store: &dyn DocumentStore, id: ObjectId) -> ApiResult<()> {
    if collection::<Place>(store).delete_by_id(id).await? {
        tracing::info!(place_id = %id, "place deleted");
        Ok(())
    } else {
        Err(ApiError::NotFound("Place"))
    }
}
