use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::{delete, get, patch, post, routes, FromForm, State};
use serde_json::{json, Value};

use super::buffered;
use crate::blob::SharedBlobs;
use crate::error::ApiResult;
use crate::models::eo::{EoStatus, EoStatusPayload, EventOrganizer};
use crate::models::event::{Event, EventStatus, EventStatusPayload};
use crate::models::place::{FeaturedPayload, Place};
use crate::models::transaction::Transaction;
use crate::services::catalog::{self, NewPlace};
use crate::services::{bookings, moderation, parse_id};
use crate::store::SharedStore;
use crate::utils::auth::AdminAuth;

// --- Organizer verification ---
#[get("/eos?<status>")]
pub async fn list_eos(
    store: &State<SharedStore>,
    _admin: AdminAuth,
    status: Option<EoStatus>,
) -> ApiResult<Json<Vec<EventOrganizer>>> {
    Ok(Json(moderation::list_organizers(store.inner().as_ref(), status).await?))
}

#[patch("/eos/<id>/status", data = "<payload>")]
pub async fn set_eo_status(
    store: &State<SharedStore>,
    _admin: AdminAuth,
    id: &str,
    payload: Json<EoStatusPayload>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(id, "organizer")?;
    moderation::set_organizer_status(store.inner().as_ref(), id, payload.status).await?;
    Ok(Json(json!({ "status": payload.status })))
}

// --- Event review ---
#[get("/events?<status>")]
pub async fn list_events(
    store: &State<SharedStore>,
    _admin: AdminAuth,
    status: Option<EventStatus>,
) -> ApiResult<Json<Vec<Event>>> {
    Ok(Json(moderation::list_events(store.inner().as_ref(), status).await?))
}

#[patch("/events/<id>/status", data = "<payload>")]
pub async fn set_event_status(
    store: &State<SharedStore>,
    _admin: AdminAuth,
    id: &str,
    payload: Json<EventStatusPayload>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(id, "event")?;
    moderation::set_event_status(store.inner().as_ref(), id, payload.status).await?;
    Ok(Json(json!({ "status": payload.status })))
}

// --- Places ---
#[derive(FromForm)]
pub struct PlaceForm<'r> {
    name: String,
    category: String,
    rating: Option<f64>,
    description: Option<String>,
    location: String,
    price: Option<i64>,
    #[field(name = "isFeatured")]
    is_featured: Option<bool>,
    image: Option<TempFile<'r>>,
}

#[post("/places", data = "<form>")]
pub async fn create_place(
    store: &State<SharedStore>,
    blobs: &State<SharedBlobs>,
    _admin: AdminAuth,
    form: Form<PlaceForm<'_>>,
) -> ApiResult<Custom<Json<Place>>> {
    let image = buffered(&form.image, "image").await?;
    let form = form.into_inner();
    let input = NewPlace {
        name: form.name,
        category: form.category,
        rating: form.rating.unwrap_or(0.0),
        description: form.description.unwrap_or_default(),
        location: form.location,
        price: form.price.unwrap_or(0),
        is_featured: form.is_featured.unwrap_or(false),
    };
    let place = catalog::create_place(store.inner().as_ref(), blobs.inner().as_ref(), input, image).await?;
    Ok(Custom(Status::Created, Json(place)))
}

#[patch("/places/<id>/featured", data = "<payload>")]
pub async fn set_featured(
    store: &State<SharedStore>,
    _admin: AdminAuth,
    id: &str,
    payload: Json<FeaturedPayload>,
) -> ApiResult<Json<Value>> {
    let id = parse_id(id, "place")?;
    catalog::set_place_featured(store.inner().as_ref(), id, payload.is_featured).await?;
    Ok(Json(json!({ "isFeatured": payload.is_featured })))
}

#[delete("/places/<id>")]
pub async fn delete_place(store: &State<SharedStore>, _admin: AdminAuth, id: &str) -> ApiResult<Json<Value>> {
    let id = parse_id(id, "place")?;
    catalog::delete_place(store.inner().as_ref(), id).await?;
    Ok(Json(json!({ "message": "Place deleted" })))
}

// --- Transactions ---
#[get("/transactions")]
pub async fn list_transactions(
    store: &State<SharedStore>,
    _admin: AdminAuth,
) -> ApiResult<Json<Vec<Transaction>>> {
    Ok(Json(bookings::list_all_transactions(store.inner().as_ref()).await?))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        list_eos,
        set_eo_status,
        list_events,
        set_event_status,
        create_place,
        set_featured,
        delete_place,
        list_transactions
    ]
}
