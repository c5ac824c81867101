use jsonwebtoken::{encode, Header, EncodingKey, decode, Validation, DecodingKey};
use serde::{Serialize, Deserialize};
use bcrypt::{hash, verify, DEFAULT_COST};
use rocket::http::Status;
use rocket::request::{Request, FromRequest, Outcome};

use crate::config::Config;
use crate::models::{id_hex, user::{Role, User}};

const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: Role,
    exp: usize,
}

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, DEFAULT_COST)
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    verify(password, hash).unwrap_or(false)
}

pub fn create_jwt(user: &User, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let expiration = (chrono::Utc::now() + chrono::Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize;

    let claims = Claims {
        sub: id_hex(&user.id),
        email: user.email.clone(),
        role: user.role,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
}

pub fn decode_jwt(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_ref()), &validation)
        .map(|token_data| token_data.claims)
}

/// Any signed-in account.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub role: Role,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let config = match request.rocket().state::<Config>() {
            Some(c) => c,
            None => return Outcome::Error((Status::InternalServerError, ())),
        };

        let token = request
            .headers()
            .get_one("Authorization")
            .and_then(|header| header.strip_prefix("Bearer "));

        match token.map(|token| decode_jwt(token, &config.jwt_secret)) {
            Some(Ok(claims)) => Outcome::Success(AuthUser {
                id: claims.sub,
                email: claims.email,
                role: claims.role,
            }),
            Some(Err(e)) => {
                tracing::debug!(error = %e, "rejected bearer token");
                Outcome::Error((Status::Unauthorized, ()))
            }
            None => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}

async fn with_role<'r>(request: &'r Request<'_>, role: Role) -> Outcome<AuthUser, ()> {
    match AuthUser::from_request(request).await {
        Outcome::Success(user) if user.role == role => Outcome::Success(user),
        Outcome::Success(_) => Outcome::Error((Status::Forbidden, ())),
        Outcome::Error(e) => Outcome::Error(e),
        Outcome::Forward(s) => Outcome::Forward(s),
    }
}

/// Signed-in event organizer. Whether the organizer is verified is checked by
/// the operations that require it.
#[derive(Debug, Clone)]
pub struct EoAuth(pub AuthUser);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for EoAuth {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        with_role(request, Role::Eo).await.map(EoAuth)
    }
}

#[derive(Debug, Clone)]
pub struct AdminAuth(pub AuthUser);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminAuth {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        with_role(request, Role::Admin).await.map(AdminAuth)
    }
}
