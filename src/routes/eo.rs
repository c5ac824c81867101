use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::serde::Deserialize;
use rocket::{delete, get, patch, post, routes, FromForm, State};
use serde_json::{json, Value};

use super::buffered;
use crate::blob::SharedBlobs;
use crate::error::ApiResult;
use crate::models::eo::EventOrganizer;
use crate::models::event::{Event, EventUpdate};
use crate::services::accounts::{self, EoRegistration, IDENTITY_CARD};
use crate::services::checkin::{self, CheckIn};
use crate::services::organizer::{self, NewEvent, NewTicketType};
use crate::services::{parse_id, sales};
use crate::store::SharedStore;
use crate::utils::auth::EoAuth;

#[derive(FromForm)]
pub struct EoRegisterForm<'r> {
    #[field(name = "contactName")]
    contact_name: String,
    email: String,
    password: String,
    #[field(name = "organizationName")]
    organization_name: String,
    phone: String,
    address: String,
    #[field(name = "identityCard")]
    identity_card: Option<TempFile<'r>>,
    #[field(name = "taxId")]
    tax_id: Option<TempFile<'r>>,
    #[field(name = "businessLicense")]
    business_license: Option<TempFile<'r>>,
}

#[post("/register", data = "<form>")]
pub async fn register(
    store: &State<SharedStore>,
    blobs: &State<SharedBlobs>,
    form: Form<EoRegisterForm<'_>>,
) -> ApiResult<Custom<Json<EventOrganizer>>> {
    let mut documents = Vec::new();
    for (kind, file) in [
        (IDENTITY_CARD, &form.identity_card),
        ("taxId", &form.tax_id),
        ("businessLicense", &form.business_license),
    ] {
        if let Some(upload) = buffered(file, kind).await? {
            documents.push((kind, upload));
        }
    }

    let registration = EoRegistration {
        contact_name: form.contact_name.clone(),
        email: form.email.clone(),
        password: form.password.clone(),
        organization_name: form.organization_name.clone(),
        phone: form.phone.clone(),
        address: form.address.clone(),
    };
    let organizer =
        accounts::register_eo(store.inner().as_ref(), blobs.inner().as_ref(), registration, documents).await?;
    Ok(Custom(Status::Created, Json(organizer)))
}

#[get("/profile")]
pub async fn profile(store: &State<SharedStore>, eo: EoAuth) -> ApiResult<Json<EventOrganizer>> {
    Ok(Json(organizer::organizer_for_user(store.inner().as_ref(), &eo.0.id).await?))
}

#[get("/events")]
pub async fn my_events(store: &State<SharedStore>, eo: EoAuth) -> ApiResult<Json<Vec<Event>>> {
    Ok(Json(organizer::list_own_events(store.inner().as_ref(), &eo.0.id).await?))
}

#[derive(FromForm)]
pub struct TicketForm {
    name: String,
    price: i64,
    stock: i32,
}

#[derive(FromForm)]
pub struct EventForm<'r> {
    title: String,
    description: Option<String>,
    category: Option<String>,
    #[field(name = "startDate")]
    start_date: String,
    #[field(name = "endDate")]
    end_date: String,
    #[field(name = "locationName")]
    location_name: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    tickets: Vec<TicketForm>,
    submit: Option<bool>,
    poster: Option<TempFile<'r>>,
}

#[post("/events", data = "<form>")]
pub async fn create_event(
    store: &State<SharedStore>,
    blobs: &State<SharedBlobs>,
    eo: EoAuth,
    form: Form<EventForm<'_>>,
) -> ApiResult<Custom<Json<Event>>> {
    let poster = buffered(&form.poster, "poster").await?;
    let form = form.into_inner();
    let input = NewEvent {
        title: form.title,
        description: form.description.unwrap_or_default(),
        category: form.category.unwrap_or_default(),
        start_date: form.start_date,
        end_date: form.end_date,
        location_name: form.location_name,
        latitude: form.latitude,
        longitude: form.longitude,
        ticket_types: form
            .tickets
            .into_iter()
            .map(|ticket| NewTicketType {
                name: ticket.name,
                price: ticket.price,
                stock: ticket.stock,
            })
            .collect(),
        submit: form.submit.unwrap_or(false),
    };

    let event =
        organizer::create_event(store.inner().as_ref(), blobs.inner().as_ref(), &eo.0.id, input, poster).await?;
    Ok(Custom(Status::Created, Json(event)))
}

#[patch("/events/<id>", data = "<payload>")]
pub async fn update_event(
    store: &State<SharedStore>,
    eo: EoAuth,
    id: &str,
    payload: Json<EventUpdate>,
) -> ApiResult<Json<Event>> {
    let id = parse_id(id, "event")?;
    let event = organizer::update_event(store.inner().as_ref(), &eo.0.id, id, payload.into_inner()).await?;
    Ok(Json(event))
}

#[post("/events/<id>/submit")]
pub async fn submit_event(store: &State<SharedStore>, eo: EoAuth, id: &str) -> ApiResult<Json<Event>> {
    let id = parse_id(id, "event")?;
    Ok(Json(organizer::submit_event(store.inner().as_ref(), &eo.0.id, id).await?))
}

#[delete("/events/<id>")]
pub async fn delete_event(store: &State<SharedStore>, eo: EoAuth, id: &str) -> ApiResult<Json<Value>> {
    let id = parse_id(id, "event")?;
    organizer::delete_event(store.inner().as_ref(), &eo.0.id, id).await?;
    Ok(Json(json!({ "message": "Event deleted" })))
}

#[get("/sales")]
pub async fn sales_report(store: &State<SharedStore>, eo: EoAuth) -> Json<sales::SalesReport> {
    Json(sales::sales_report(store.inner().as_ref(), &eo.0.id).await)
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct CheckInPayload {
    order_id: String,
}

#[post("/checkin", data = "<payload>")]
pub async fn check_in(
    store: &State<SharedStore>,
    eo: EoAuth,
    payload: Json<CheckInPayload>,
) -> ApiResult<Json<CheckIn>> {
    Ok(Json(checkin::check_in(store.inner().as_ref(), &eo.0.id, &payload.order_id).await?))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        register,
        profile,
        my_events,
        create_event,
        update_event,
        submit_event,
        delete_event,
        sales_report,
        check_in
    ]
}
