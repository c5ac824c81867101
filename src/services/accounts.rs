use std::collections::BTreeMap;

use mongodb::bson::doc;

use super::{parse_id, required};
use crate::blob::{blob_path, BlobStore, Upload};
use crate::error::{ApiError, ApiResult};
use crate::models::eo::{EoStatus, EventOrganizer};
use crate::models::id_hex;
use crate::models::user::{LoginPayload, RegisterPayload, Role, User};
use crate::store::{collection, DocumentStore};
use crate::utils::auth::{create_jwt, hash_password, verify_password};

const MIN_PASSWORD_LEN: usize = 6;

/// Legal document every organizer must upload at registration.
pub const IDENTITY_CARD: &str = "identityCard";

fn normalize_email(email: &str) -> ApiResult<String> {
    let email = required(email, "email")?.to_lowercase();
    if !email.contains('@') {
        return Err(ApiError::Validation("email is invalid".into()));
    }
    Ok(email)
}

/// Account fields after validation, not yet stored.
struct NewAccount {
    name: String,
    email: String,
    password_hash: String,
    role: Role,
}

/// Checks the account fields and that the email is free. Nothing is written.
async fn validate_account(
    store: &dyn DocumentStore,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> ApiResult<NewAccount> {
    let name = required(name, "name")?;
    let email = normalize_email(email)?;
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    if collection::<User>(store)
        .find_one(doc! { "email": email.as_str() })
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let password_hash = hash_password(password)
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))?;

    Ok(NewAccount {
        name,
        email,
        password_hash,
        role,
    })
}

async fn insert_account(store: &dyn DocumentStore, account: NewAccount) -> ApiResult<User> {
    let mut user = User {
        id: None,
        name: account.name,
        email: account.email,
        password_hash: account.password_hash,
        role: account.role,
        created_at: chrono::Utc::now(),
    };
    user.id = Some(collection::<User>(store).insert_one(&user).await?);

    tracing::info!(user_id = %id_hex(&user.id), role = %user.role, "account created");
    Ok(user)
}

pub async fn register_visitor(store: &dyn DocumentStore, payload: &RegisterPayload) -> ApiResult<User> {
    let account = validate_account(store, &payload.name, &payload.email, &payload.password, Role::Visitor).await?;
    insert_account(store, account).await
}

/// Checks credentials and issues a bearer token.
pub async fn login(store: &dyn DocumentStore, jwt_secret: &str, payload: &LoginPayload) -> ApiResult<(String, User)> {
    let email = payload.email.trim().to_lowercase();
    let user = collection::<User>(store)
        .find_one(doc! { "email": email.as_str() })
        .await?
        .filter(|user| verify_password(&payload.password, &user.password_hash))
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".into()))?;

    let token = create_jwt(&user, jwt_secret)
        .map_err(|e| ApiError::Internal(format!("token generation failed: {e}")))?;
    Ok((token, user))
}

pub async fn profile(store: &dyn DocumentStore, user_id: &str) -> ApiResult<User> {
    collection::<User>(store)
        .find_by_id(parse_id(user_id, "user")?)
        .await?
        .ok_or(ApiError::NotFound("User"))
}

#[derive(Debug, Clone, Default)]
pub struct EoRegistration {
    pub contact_name: String,
    pub email: String,
    pub password: String,
    pub organization_name: String,
    pub phone: String,
    pub address: String,
}

/// Creates the organizer's login and its `pending_verification` profile.
///
/// Everything is validated first, then the legal documents (`kind`, file)
/// are uploaded, then the account and profile are written. A failed upload
/// leaves nothing behind in the store.
pub async fn register_eo(
    store: &dyn DocumentStore,
    blobs: &dyn BlobStore,
    registration: EoRegistration,
    documents: Vec<(&'static str, Upload)>,
) -> ApiResult<EventOrganizer> {
    let organization_name = required(&registration.organization_name, "organizationName")?;
    let phone = required(&registration.phone, "phone")?;
    let address = required(&registration.address, "address")?;
    if !documents.iter().any(|(kind, _)| *kind == IDENTITY_CARD) {
        return Err(ApiError::Validation(format!("{IDENTITY_CARD} document is required")));
    }

    let account = validate_account(
        store,
        &registration.contact_name,
        &registration.email,
        &registration.password,
        Role::Eo,
    )
    .await?;

    let mut urls = BTreeMap::new();
    for (kind, upload) in &documents {
        let url = blobs.put(&blob_path("eos", &upload.file_name), upload).await?;
        urls.insert(kind.to_string(), url);
    }

    let user = insert_account(store, account).await?;

    let mut organizer = EventOrganizer {
        id: None,
        user_id: id_hex(&user.id),
        organization_name,
        contact_name: user.name.clone(),
        email: user.email.clone(),
        phone,
        address,
        documents: urls,
        status: EoStatus::PendingVerification,
        created_at: chrono::Utc::now(),
    };
    organizer.id = Some(collection::<EventOrganizer>(store).insert_one(&organizer).await?);

    tracing::info!(
        eo_id = %id_hex(&organizer.id),
        organization = %organizer.organization_name,
        documents = organizer.documents.len(),
        "organizer registered"
    );
    Ok(organizer)
}
