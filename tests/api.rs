mod common;

use common::{
    account, bearer, field, file, multipart, oid, organizer, spawn, spawn_with_gateway, RecordingGateway, TestApp,
    BASE_URL, FRONTEND_ORIGIN,
};
use jokka::models::eo::EoStatus;
use jokka::models::user::{Role, User};
use jokka::store::collection;
use mongodb::bson::doc;
use rocket::http::{ContentType, Status};
use serde_json::{json, Value};

const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

async fn post_json(app: &TestApp, uri: &str, token: Option<&str>, body: Value) -> (Status, Value) {
    let mut request = app
        .client
        .post(uri.to_string())
        .header(ContentType::JSON)
        .body(body.to_string());
    if let Some(token) = token {
        request = request.header(bearer(token));
    }
    let response = request.dispatch().await;
    let status = response.status();
    (status, response.into_json::<Value>().await.unwrap_or(Value::Null))
}

async fn patch_json(app: &TestApp, uri: &str, token: &str, body: Value) -> (Status, Value) {
    let response = app
        .client
        .patch(uri.to_string())
        .header(ContentType::JSON)
        .header(bearer(token))
        .body(body.to_string())
        .dispatch()
        .await;
    let status = response.status();
    (status, response.into_json::<Value>().await.unwrap_or(Value::Null))
}

async fn get_json(app: &TestApp, uri: &str, token: Option<&str>) -> (Status, Value) {
    let mut request = app.client.get(uri.to_string());
    if let Some(token) = token {
        request = request.header(bearer(token));
    }
    let response = request.dispatch().await;
    let status = response.status();
    (status, response.into_json::<Value>().await.unwrap_or(Value::Null))
}

/// Creates an event through the multipart endpoint and returns its id.
async fn create_event(app: &TestApp, eo_token: &str, title: &str, submit: bool) -> (Status, Value) {
    let submit = submit.to_string();
    let (content_type, body) = multipart(&[
        field("title", title),
        field("description", "An evening of music"),
        field("category", "Music"),
        field("startDate", "2026-12-05T19:00"),
        field("endDate", "2026-12-05T23:00"),
        field("locationName", "Taman Budaya, Yogyakarta"),
        field("tickets[0].name", "Regular"),
        field("tickets[0].price", "75000"),
        field("tickets[0].stock", "200"),
        field("tickets[1].name", "VIP"),
        field("tickets[1].price", "150000"),
        field("tickets[1].stock", "20"),
        field("submit", &submit),
        file("poster", "poster.png", "image/png", PNG),
    ]);
    let response = app
        .client
        .post("/api/eo/events")
        .header(content_type)
        .header(bearer(eo_token))
        .body(body)
        .dispatch()
        .await;
    let status = response.status();
    (status, response.into_json::<Value>().await.unwrap_or(Value::Null))
}

async fn published_event(app: &TestApp, eo_token: &str, admin_token: &str, title: &str) -> String {
    let (status, event) = create_event(app, eo_token, title, true).await;
    assert_eq!(status, Status::Created, "{event}");
    let id = oid(&event);
    let (status, _) = patch_json(
        app,
        &format!("/api/admin/events/{id}/status"),
        admin_token,
        json!({ "status": "published" }),
    )
    .await;
    assert_eq!(status, Status::Ok);
    id
}

#[tokio::test]
async fn visitor_registers_logs_in_and_reads_profile() {
    let app = spawn().await;

    let (status, profile) = post_json(
        &app,
        "/api/auth/register",
        None,
        json!({ "name": "Rina", "email": "Rina@Example.com", "password": "rahasia1" }),
    )
    .await;
    assert_eq!(status, Status::Created);
    assert_eq!(profile["email"], "rina@example.com");
    assert_eq!(profile["role"], "visitor");
    assert!(profile.get("passwordHash").is_none());

    let (status, body) = post_json(
        &app,
        "/api/auth/login",
        None,
        json!({ "email": "rina@example.com", "password": "rahasia1" }),
    )
    .await;
    assert_eq!(status, Status::Ok);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, me) = get_json(&app, "/api/auth/me", Some(&token)).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(me["name"], "Rina");

    let (status, body) = post_json(
        &app,
        "/api/auth/login",
        None,
        json!({ "email": "rina@example.com", "password": "salah" }),
    )
    .await;
    assert_eq!(status, Status::Unauthorized);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn guarded_routes_answer_with_json_errors() {
    let app = spawn().await;
    let (_, visitor) = account(&app, Role::Visitor, "v@example.com").await;

    let (status, body) = get_json(&app, "/api/wishlist", None).await;
    assert_eq!(status, Status::Unauthorized);
    assert_eq!(body["error"], "Unauthorized");

    let (status, body) = get_json(&app, "/api/admin/transactions", Some(&visitor)).await;
    assert_eq!(status, Status::Forbidden);
    assert_eq!(body["error"], "Forbidden");

    let (status, body) = get_json(&app, "/api/events/not-an-id", None).await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["error"], "Invalid event ID");
}

#[tokio::test]
async fn responses_allow_the_configured_front_end() {
    let app = spawn().await;

    let preflight = app.client.options("/api/checkout").dispatch().await;
    assert_eq!(preflight.status(), Status::NoContent);
    assert_eq!(
        preflight.headers().get_one("Access-Control-Allow-Origin"),
        Some(FRONTEND_ORIGIN)
    );
    assert_eq!(preflight.headers().get_one("Access-Control-Allow-Credentials"), Some("true"));

    let listing = app.client.get("/api/places").dispatch().await;
    assert_eq!(listing.headers().get_one("Access-Control-Allow-Origin"), Some(FRONTEND_ORIGIN));
}

#[tokio::test]
async fn admin_creates_place_with_image_and_features_it() {
    let app = spawn().await;
    let (_, admin) = account(&app, Role::Admin, "admin@example.com").await;

    let (content_type, body) = multipart(&[
        field("name", "Pantai Parangtritis"),
        field("category", "Beach"),
        field("rating", "4.5"),
        field("description", "Black sand beach"),
        field("location", "Bantul"),
        field("price", "10000"),
        file("image", "pantai.png", "image/png", PNG),
    ]);
    let response = app
        .client
        .post("/api/admin/places")
        .header(content_type)
        .header(bearer(&admin))
        .body(body)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    let place: Value = response.into_json().await.unwrap();
    let id = oid(&place);
    let image_url = place["imageUrl"].as_str().unwrap().to_string();
    assert!(image_url.starts_with(&format!("{BASE_URL}/files/places/")));
    assert_eq!(place["isFeatured"], false);

    let served = app
        .client
        .get(image_url.trim_start_matches(BASE_URL).to_string())
        .dispatch()
        .await;
    assert_eq!(served.status(), Status::Ok);
    assert_eq!(served.into_bytes().await.unwrap(), PNG);

    let (_, featured) = get_json(&app, "/api/places?featured=true", None).await;
    assert!(featured.as_array().unwrap().is_empty());

    let (status, _) = patch_json(
        &app,
        &format!("/api/admin/places/{id}/featured"),
        &admin,
        json!({ "isFeatured": true }),
    )
    .await;
    assert_eq!(status, Status::Ok);

    let (_, featured) = get_json(&app, "/api/places?featured=true&q=pantai", None).await;
    assert_eq!(featured.as_array().unwrap().len(), 1);
    assert_eq!(featured[0]["name"], "Pantai Parangtritis");
}

#[tokio::test]
async fn place_without_image_is_rejected_before_upload() {
    let app = spawn().await;
    let (_, admin) = account(&app, Role::Admin, "admin@example.com").await;

    let (content_type, body) = multipart(&[
        field("name", "Malioboro"),
        field("category", "Shopping"),
        field("location", "Yogyakarta"),
    ]);
    let response = app
        .client
        .post("/api/admin/places")
        .header(content_type)
        .header(bearer(&admin))
        .body(body)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::UnprocessableEntity);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["error"], "image is required");
    assert!(!app.upload_dir.join("places").exists());
}

#[tokio::test]
async fn organizer_registration_uploads_documents_and_awaits_verification() {
    let app = spawn().await;

    let (content_type, body) = multipart(&[
        field("contactName", "Agus"),
        field("email", "agus@example.com"),
        field("password", "rahasia1"),
        field("organizationName", "Agus Organizer"),
        field("phone", "0812"),
        field("address", "Jl. Kaliurang 5"),
        file("identityCard", "ktp.png", "image/png", PNG),
    ]);
    let response = app
        .client
        .post("/api/eo/register")
        .header(content_type)
        .body(body)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    let organizer: Value = response.into_json().await.unwrap();
    assert_eq!(organizer["status"], "pending_verification");
    assert!(organizer["documents"]["identityCard"]
        .as_str()
        .unwrap()
        .contains("/files/eos/"));

    let (status, body) = post_json(
        &app,
        "/api/auth/login",
        None,
        json!({ "email": "agus@example.com", "password": "rahasia1" }),
    )
    .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["user"]["role"], "eo");
}

#[tokio::test]
async fn organizer_registration_requires_identity_card() {
    let app = spawn().await;

    let (content_type, body) = multipart(&[
        field("contactName", "Agus"),
        field("email", "agus@example.com"),
        field("password", "rahasia1"),
        field("organizationName", "Agus Organizer"),
        field("phone", "0812"),
        field("address", "Jl. Kaliurang 5"),
        file("taxId", "npwp.png", "image/png", PNG),
    ]);
    let response = app
        .client
        .post("/api/eo/register")
        .header(content_type)
        .body(body)
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::UnprocessableEntity);
    let body: Value = response.into_json().await.unwrap();
    assert_eq!(body["error"], "identityCard document is required");
    assert!(!app.upload_dir.join("eos").exists());
    let users = collection::<User>(&*app.store).find(doc! {}).await.unwrap();
    assert!(users.is_empty());
}

#[tokio::test]
async fn unverified_organizer_cannot_create_events_until_approved() {
    let app = spawn().await;
    let (_, admin) = account(&app, Role::Admin, "admin@example.com").await;
    let (_, eo, eo_id) = organizer(&app, "eo@example.com", EoStatus::PendingVerification).await;

    let (status, body) = create_event(&app, &eo, "Jazz Gunung", false).await;
    assert_eq!(status, Status::Forbidden, "{body}");

    let (_, pending) = get_json(&app, "/api/admin/eos?status=pending_verification", Some(&admin)).await;
    assert_eq!(pending.as_array().unwrap().len(), 1);

    let (status, _) = patch_json(
        &app,
        &format!("/api/admin/eos/{}/status", eo_id.to_hex()),
        &admin,
        json!({ "status": "verified" }),
    )
    .await;
    assert_eq!(status, Status::Ok);

    let (status, event) = create_event(&app, &eo, "Jazz Gunung", false).await;
    assert_eq!(status, Status::Created);
    assert_eq!(event["status"], "draft");
    assert_eq!(event["ticketTypes"][1]["name"], "VIP");
    assert_eq!(event["ticketTypes"][1]["sold"], 0);
}

#[tokio::test]
async fn moderation_controls_public_visibility() {
    let app = spawn().await;
    let (_, admin) = account(&app, Role::Admin, "admin@example.com").await;
    let (_, eo, _) = organizer(&app, "eo@example.com", EoStatus::Verified).await;

    let (_, event) = create_event(&app, &eo, "Festival Kuliner", true).await;
    assert_eq!(event["status"], "pending_review");
    let id = oid(&event);

    let (_, listed) = get_json(&app, "/api/events", None).await;
    assert!(listed.as_array().unwrap().is_empty());
    let (status, _) = get_json(&app, &format!("/api/events/{id}"), None).await;
    assert_eq!(status, Status::NotFound);

    for _ in 0..2 {
        let (status, _) = patch_json(
            &app,
            &format!("/api/admin/events/{id}/status"),
            &admin,
            json!({ "status": "approved" }),
        )
        .await;
        assert_eq!(status, Status::Ok);
        let (_, listed) = get_json(&app, "/api/events?sort=price_asc", None).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["status"], "published");
    }

    let (status, _) = patch_json(
        &app,
        &format!("/api/admin/events/{id}/status"),
        &admin,
        json!({ "status": "rejected" }),
    )
    .await;
    assert_eq!(status, Status::Ok);
    let (_, listed) = get_json(&app, "/api/events", None).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn organizer_edits_only_own_events() {
    let app = spawn().await;
    let (_, eo, _) = organizer(&app, "eo@example.com", EoStatus::Verified).await;
    let (_, rival, _) = organizer(&app, "rival@example.com", EoStatus::Verified).await;

    let (_, event) = create_event(&app, &eo, "Pameran Batik", false).await;
    let id = oid(&event);

    let (status, _) = patch_json(&app, &format!("/api/eo/events/{id}"), &rival, json!({ "title": "Mine now" })).await;
    assert_eq!(status, Status::Forbidden);

    let (status, updated) =
        patch_json(&app, &format!("/api/eo/events/{id}"), &eo, json!({ "title": "Pameran Batik Nusantara" })).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(updated["title"], "Pameran Batik Nusantara");
    assert_eq!(updated["ticketTypes"].as_array().unwrap().len(), 2);

    let (status, submitted) = post_json(&app, &format!("/api/eo/events/{id}/submit"), Some(&eo), json!({})).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(submitted["status"], "pending_review");

    let (status, _) = post_json(&app, &format!("/api/eo/events/{id}/submit"), Some(&eo), json!({})).await;
    assert_eq!(status, Status::Conflict);

    let (_, mine) = get_json(&app, "/api/eo/events", Some(&eo)).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
    let (_, theirs) = get_json(&app, "/api/eo/events", Some(&rival)).await;
    assert!(theirs.as_array().unwrap().is_empty());

    let response = app
        .client
        .delete(format!("/api/eo/events/{id}"))
        .header(bearer(&eo))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let (_, mine) = get_json(&app, "/api/eo/events", Some(&eo)).await;
    assert!(mine.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn wishlist_toggle_round_trips() {
    let app = spawn().await;
    let (_, visitor) = account(&app, Role::Visitor, "v@example.com").await;
    let item = json!({ "itemId": "place-1", "itemType": "place", "name": "Kawah Ijen" });

    let (status, body) = post_json(&app, "/api/wishlist/toggle", Some(&visitor), item.clone()).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["wishlisted"], true);
    let (_, saved) = get_json(&app, "/api/wishlist", Some(&visitor)).await;
    assert_eq!(saved[0]["name"], "Kawah Ijen");

    let (_, body) = post_json(&app, "/api/wishlist/toggle", Some(&visitor), item).await;
    assert_eq!(body["wishlisted"], false);
    let (_, saved) = get_json(&app, "/api/wishlist", Some(&visitor)).await;
    assert!(saved.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn checkout_forwards_client_price_and_returns_token() {
    let app = spawn().await;

    let (status, body) = post_json(
        &app,
        "/api/checkout",
        None,
        json!({
            "id": "ORDER-42",
            "productName": "Festival Pass - VIP",
            "price": 150000,
            "quantity": 3,
            "buyerName": "Dewi",
            "buyerEmail": "dewi@example.com",
            "buyerPhone": "0813"
        }),
    )
    .await;

    assert_eq!(status, Status::Ok);
    assert_eq!(body, json!({ "token": "snap-ORDER-42" }));
    let requests = app.gateway.requests.lock().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].transaction_details.gross_amount, 450_000);
    assert_eq!(requests[0].customer_details.email, "dewi@example.com");

    let (status, config) = get_json(&app, "/api/checkout/config", None).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(config["clientKey"], "SB-Mid-client-test");
}

#[tokio::test]
async fn checkout_failure_is_a_generic_server_error() {
    let app = spawn_with_gateway(RecordingGateway {
        fail: true,
        ..RecordingGateway::default()
    })
    .await;

    let (status, body) = post_json(
        &app,
        "/api/checkout",
        None,
        json!({
            "id": "ORDER-43",
            "productName": "Day ticket",
            "price": 20000,
            "quantity": 1,
            "buyerName": "Dewi",
            "buyerEmail": "dewi@example.com",
            "buyerPhone": "0813"
        }),
    )
    .await;

    assert_eq!(status, Status::InternalServerError);
    assert_eq!(body, json!({ "error": "Failed to create payment transaction" }));
}

#[tokio::test]
async fn settled_purchases_feed_sales_report_and_check_in() {
    let app = spawn().await;
    let (_, admin) = account(&app, Role::Admin, "admin@example.com").await;
    let (_, visitor) = account(&app, Role::Visitor, "v@example.com").await;
    let (_, eo, _) = organizer(&app, "eo@example.com", EoStatus::Verified).await;
    let (_, rival, _) = organizer(&app, "rival@example.com", EoStatus::Verified).await;

    let (_, report) = get_json(&app, "/api/eo/sales", Some(&eo)).await;
    assert_eq!(report["transactionCount"], 0);

    let event_id = published_event(&app, &eo, &admin, "Konser Senja").await;

    for (order_id, quantity) in [("ORDER-A", 2), ("ORDER-B", 1)] {
        let (status, recorded) = post_json(
            &app,
            "/api/transactions",
            Some(&visitor),
            json!({
                "orderId": order_id,
                "eventId": event_id,
                "ticketType": "Regular",
                "quantity": quantity,
                "amount": 75000 * quantity,
            }),
        )
        .await;
        assert_eq!(status, Status::Created, "{recorded}");
        assert_eq!(recorded["status"], "pending");
        assert_eq!(recorded["eventName"], "Konser Senja");
    }

    let (status, _) = post_json(
        &app,
        "/api/checkout/notify",
        None,
        json!({ "order_id": "ORDER-A", "transaction_status": "settlement", "payment_type": "qris" }),
    )
    .await;
    assert_eq!(status, Status::Ok);
    let (status, _) = post_json(
        &app,
        "/api/checkout/notify",
        None,
        json!({ "order_id": "ORDER-UNKNOWN", "transaction_status": "settlement" }),
    )
    .await;
    assert_eq!(status, Status::Ok);

    let (_, report) = get_json(&app, "/api/eo/sales", Some(&eo)).await;
    assert_eq!(report["transactionCount"], 1);
    assert_eq!(report["ticketsSold"], 2);
    assert_eq!(report["totalRevenue"], 150000);
    assert_eq!(report["transactions"][0]["orderId"], "ORDER-A");
    assert_eq!(report["transactions"][0]["paymentType"], "qris");

    let (_, rival_report) = get_json(&app, "/api/eo/sales", Some(&rival)).await;
    assert_eq!(rival_report["transactionCount"], 0);

    for _ in 0..2 {
        let (status, checked) = post_json(&app, "/api/eo/checkin", Some(&eo), json!({ "orderId": "ORDER-A" })).await;
        assert_eq!(status, Status::Ok);
        assert_eq!(checked["validated"], true);
    }
    let (_, pending) = post_json(&app, "/api/eo/checkin", Some(&eo), json!({ "orderId": "ORDER-B" })).await;
    assert_eq!(pending["validated"], false);

    let (status, _) = post_json(&app, "/api/eo/checkin", Some(&rival), json!({ "orderId": "ORDER-A" })).await;
    assert_eq!(status, Status::Forbidden);
    let (status, body) = post_json(&app, "/api/eo/checkin", Some(&eo), json!({ "orderId": "ORDER-Z" })).await;
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["error"], "Ticket not found");

    let (_, mine) = get_json(&app, "/api/transactions", Some(&visitor)).await;
    assert_eq!(mine.as_array().unwrap().len(), 2);
    let (_, all) = get_json(&app, "/api/admin/transactions", Some(&admin)).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}
