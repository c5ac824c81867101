use mongodb::bson::doc;

use super::required;
use crate::error::ApiResult;
use crate::models::wishlist::{ToggleWishlistPayload, WishlistEntry};
use crate::store::{collection, DocumentStore};

/// Adds the item to the user's wishlist, or removes it if already saved.
/// Returns whether the item is saved afterwards.
pub async fn toggle(store: &dyn DocumentStore, user_id: &str, payload: ToggleWishlistPayload) -> ApiResult<bool> {
    let item_id = required(&payload.item_id, "itemId")?;
    let entries = collection::<WishlistEntry>(store);

    let existing = entries
        .find_one(doc! { "userId": user_id, "itemId": item_id.as_str() })
        .await?;

    if let Some(id) = existing.and_then(|entry| entry.id) {
        entries.delete_by_id(id).await?;
        tracing::debug!(user_id, item_id = %item_id, "wishlist entry removed");
        return Ok(false);
    }

    let entry = WishlistEntry {
        id: None,
        user_id: user_id.to_string(),
        item_id,
        item_type: payload.item_type,
        name: payload.name,
        image_url: payload.image_url,
        location: payload.location,
        created_at: chrono::Utc::now(),
    };
    entries.insert_one(&entry).await?;
    tracing::debug!(user_id, item_id = %entry.item_id, "wishlist entry added");
    Ok(true)
}

pub async fn list(store: &dyn DocumentStore, user_id: &str) -> ApiResult<Vec<WishlistEntry>> {
    let mut entries = collection::<WishlistEntry>(store)
        .find(doc! { "userId": user_id })
        .await?;
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(entries)
}
