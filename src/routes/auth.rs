use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::{get, post, routes, State};
use serde_json::{json, Value};

use crate::config::Config;
use crate::error::ApiResult;
use crate::models::user::{LoginPayload, RegisterPayload, UserProfile};
use crate::services::accounts;
use crate::store::SharedStore;
use crate::utils::auth::AuthUser;

#[post("/register", data = "<payload>")]
pub async fn register(
    store: &State<SharedStore>,
    payload: Json<RegisterPayload>,
) -> ApiResult<Custom<Json<UserProfile>>> {
    let user = accounts::register_visitor(store.inner().as_ref(), &payload).await?;
    Ok(Custom(Status::Created, Json(UserProfile::from(&user))))
}

#[post("/login", data = "<payload>")]
pub async fn login(
    store: &State<SharedStore>,
    config: &State<Config>,
    payload: Json<LoginPayload>,
) -> ApiResult<Json<Value>> {
    let (token, user) = accounts::login(store.inner().as_ref(), &config.jwt_secret, &payload).await?;
    Ok(Json(json!({ "token": token, "user": UserProfile::from(&user) })))
}

#[get("/me")]
pub async fn me(store: &State<SharedStore>, user: AuthUser) -> ApiResult<Json<UserProfile>> {
    let user = accounts::profile(store.inner().as_ref(), &user.id).await?;
    Ok(Json(UserProfile::from(&user)))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![register, login, me]
}
