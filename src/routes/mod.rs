pub mod admin;
pub mod auth;
pub mod checkout;
pub mod eo;
pub mod public;
pub mod visitor;

use rocket::fs::TempFile;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::{catch, catchers, options, Catcher, Request};
use serde_json::{json, Value};

use crate::blob::{BlobError, Upload};

/// Buffers an optional multipart file field.
pub(crate) async fn buffered(file: &Option<TempFile<'_>>, fallback_name: &str) -> Result<Option<Upload>, BlobError> {
    match file {
        Some(file) => Upload::from_temp_file(file, fallback_name).await,
        None => Ok(None),
    }
}

#[options("/<_..>")]
pub fn preflight() -> Status {
    Status::NoContent
}

#[catch(default)]
fn json_error(status: Status, _request: &Request<'_>) -> Custom<Json<Value>> {
    let message = match status.code {
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not found",
        422 => "Invalid request body",
        _ => status.reason().unwrap_or("Request failed"),
    };
    Custom(status, Json(json!({ "error": message })))
}

pub fn catchers() -> Vec<Catcher> {
    catchers![json_error]
}
