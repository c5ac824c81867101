pub mod eo;
pub mod event;
pub mod place;
pub mod transaction;
pub mod user;
pub mod wishlist;

use mongodb::bson::oid::ObjectId;

/// Hex form of a stored document id; empty for documents not yet inserted.
pub fn id_hex(id: &Option<ObjectId>) -> String {
    id.map(|id| id.to_hex()).unwrap_or_default()
}
