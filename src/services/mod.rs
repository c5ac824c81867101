pub mod accounts;
pub mod bookings;
pub mod catalog;
pub mod checkin;
pub mod checkout;
pub mod listing;
pub mod moderation;
pub mod organizer;
pub mod sales;
pub mod wishlist;

use mongodb::bson::oid::ObjectId;

use crate::error::{ApiError, ApiResult};

pub fn parse_id(raw: &str, what: &str) -> ApiResult<ObjectId> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid {what} ID")))
}

/// Trimmed value of a required text field.
pub(crate) fn required(value: &str, field: &str) -> ApiResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ApiError::Validation(format!("{field} is required")))
    } else {
        Ok(trimmed.to_string())
    }
}
