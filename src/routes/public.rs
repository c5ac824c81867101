use rocket::serde::json::Json;
use rocket::{get, routes, State};

use crate::error::ApiResult;
use crate::models::{event::Event, place::Place};
use crate::services::{catalog, listing::ListQuery, parse_id};
use crate::store::SharedStore;

#[get("/places?<featured>&<query..>")]
pub async fn get_places(
    store: &State<SharedStore>,
    featured: Option<bool>,
    query: ListQuery,
) -> ApiResult<Json<Vec<Place>>> {
    let places = catalog::list_places(store.inner().as_ref(), featured, &query).await?;
    Ok(Json(places))
}

#[get("/places/<id>")]
pub async fn get_place(store: &State<SharedStore>, id: &str) -> ApiResult<Json<Place>> {
    let place = catalog::get_place(store.inner().as_ref(), parse_id(id, "place")?).await?;
    Ok(Json(place))
}

#[get("/events?<query..>")]
pub async fn get_events(store: &State<SharedStore>, query: ListQuery) -> ApiResult<Json<Vec<Event>>> {
    let events = catalog::list_published_events(store.inner().as_ref(), &query).await?;
    Ok(Json(events))
}

#[get("/events/<id>")]
pub async fn get_event(store: &State<SharedStore>, id: &str) -> ApiResult<Json<Event>> {
    let event = catalog::get_published_event(store.inner().as_ref(), parse_id(id, "event")?).await?;
    Ok(Json(event))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![get_places, get_place, get_events, get_event]
}
