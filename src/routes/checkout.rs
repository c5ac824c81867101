use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{get, post, routes, State};
use serde_json::{json, Value};

use crate::config::Config;
use crate::error::ApiResult;
use crate::services::bookings::{self, GatewayNotification};
use crate::services::checkout::{self, CheckoutOrder};
use crate::store::SharedStore;
use crate::utils::midtrans::{snap_script_url, SharedGateway};

#[post("/", data = "<payload>")]
pub async fn create_checkout(
    gateway: &State<SharedGateway>,
    payload: Json<CheckoutOrder>,
) -> ApiResult<Json<Value>> {
    let response = checkout::create_checkout(gateway.inner().as_ref(), &payload).await?;
    Ok(Json(json!({ "token": response.token })))
}

/// Gateway notification webhook. Unknown orders are acknowledged so the
/// gateway stops retrying.
#[post("/notify", data = "<payload>")]
pub async fn notify(store: &State<SharedStore>, payload: Json<GatewayNotification>) -> ApiResult<Status> {
    tracing::info!(
        order_id = %payload.order_id,
        transaction_status = %payload.transaction_status,
        "payment notification received"
    );
    bookings::apply_notification(store.inner().as_ref(), &payload).await?;
    Ok(Status::Ok)
}

#[get("/config")]
pub fn client_config(config: &State<Config>) -> Json<Value> {
    Json(json!({
        "clientKey": config.midtrans_client_key,
        "snapUrl": snap_script_url(config.midtrans_is_production),
    }))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![create_checkout, notify, client_config]
}
