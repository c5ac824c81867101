use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::{get, post, routes, State};
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::models::transaction::{RecordTransactionPayload, Transaction};
use crate::models::wishlist::{ToggleWishlistPayload, WishlistEntry};
use crate::services::{bookings, wishlist};
use crate::store::SharedStore;
use crate::utils::auth::AuthUser;

#[post("/wishlist/toggle", data = "<payload>")]
pub async fn toggle_wishlist(
    store: &State<SharedStore>,
    user: AuthUser,
    payload: Json<ToggleWishlistPayload>,
) -> ApiResult<Json<Value>> {
    let wishlisted = wishlist::toggle(store.inner().as_ref(), &user.id, payload.into_inner()).await?;
    Ok(Json(json!({ "wishlisted": wishlisted })))
}

#[get("/wishlist")]
pub async fn get_wishlist(store: &State<SharedStore>, user: AuthUser) -> ApiResult<Json<Vec<WishlistEntry>>> {
    Ok(Json(wishlist::list(store.inner().as_ref(), &user.id).await?))
}

#[post("/transactions", data = "<payload>")]
pub async fn record_transaction(
    store: &State<SharedStore>,
    user: AuthUser,
    payload: Json<RecordTransactionPayload>,
) -> ApiResult<Custom<Json<Transaction>>> {
    let transaction = bookings::record_transaction(store.inner().as_ref(), &user.id, payload.into_inner()).await?;
    Ok(Custom(Status::Created, Json(transaction)))
}

#[get("/transactions")]
pub async fn my_transactions(store: &State<SharedStore>, user: AuthUser) -> ApiResult<Json<Vec<Transaction>>> {
    Ok(Json(bookings::list_user_transactions(store.inner().as_ref(), &user.id).await?))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![toggle_wishlist, get_wishlist, record_transaction, my_transactions]
}
