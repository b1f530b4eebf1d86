use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::{cookie::Cookie, CookieJar};
use chrono::Utc;
use eyre::eyre;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use tracing::Instrument;

use crate::{
    app_state::SharedState,
    auth::{self, SessionUser, SESSION_COOKIE},
    http_error::{ApiError, ApiResult},
    interact,
    model::{repository, repository::user::InsertUserError, CreateUser},
};

use super::super::schema::{
    LoginRequest, RegisterRequest, RegisterResponse, SessionResponse, UploadCredentials,
};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/imagekit-auth", get(imagekit_auth))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, body = RegisterResponse),
        (status = 400, description = "Invalid email or password"),
        (status = 409, description = "Email already registered"),
    ),
)]
#[tracing::instrument(skip(app_state, request))]
pub async fn register(
    State(app_state): State<SharedState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    if !request.email.contains('@') || request.password.len() < 8 {
        return Err(ApiError::BadRequest("invalid email or password".to_owned()));
    }
    let create = CreateUser {
        email: request.email.clone(),
        password_hash: auth::hash_password(&request.password)?,
    };
    let conn = app_state.pool.get().in_current_span().await?;
    let inserted = interact!(conn, move |mut conn| {
        Ok(repository::user::insert_user(&mut conn, &create))
    })
    .in_current_span()
    .await??;
    match inserted {
        Ok(_id) => Ok((
            StatusCode::CREATED,
            Json(RegisterResponse {
                email: request.email,
            }),
        )),
        Err(InsertUserError::EmailTaken) => Err(ApiError::Conflict(
            "a user with this email already exists".to_owned(),
        )),
        Err(InsertUserError::Other(report)) => Err(report.into()),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, body = SessionResponse),
        (status = 401, description = "Unknown email or wrong password"),
    ),
)]
#[tracing::instrument(skip(app_state, request))]
pub async fn login(
    State(app_state): State<SharedState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> ApiResult<(CookieJar, Json<SessionResponse>)> {
    let conn = app_state.pool.get().in_current_span().await?;
    let email = request.email.clone();
    let user = interact!(conn, move |mut conn| {
        repository::user::get_user_by_email(&mut conn, &email)
    })
    .in_current_span()
    .await??
    .ok_or(ApiError::Unauthorized)?;
    if !auth::verify_password(&user.password_hash, &request.password) {
        return Err(ApiError::Unauthorized);
    }
    let token = auth::create_session_token(
        &user.email,
        &app_state.config.auth.session_secret,
        app_state.config.auth.session_max_age_hours,
    )?;
    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true);
    Ok((
        jar.add(cookie),
        Json(SessionResponse {
            token,
            email: user.email,
        }),
    ))
}

/// Signed upload credentials for the media CDN: token is single-use,
/// expire is a unix timestamp, signature is HMAC-SHA1 of token + expire
/// keyed with the CDN private key (the scheme the upload API verifies).
#[utoipa::path(
    get,
    path = "/api/auth/imagekit-auth",
    responses(
        (status = 200, body = UploadCredentials),
        (status = 401, description = "No valid session"),
    ),
)]
#[tracing::instrument(skip(app_state, _session))]
pub async fn imagekit_auth(
    _session: SessionUser,
    State(app_state): State<SharedState>,
) -> ApiResult<Json<UploadCredentials>> {
    let token = uuid::Uuid::new_v4().to_string();
    let expire = Utc::now().timestamp() + app_state.config.auth.credential_expire_seconds;
    let signature = sign_upload_token(
        &token,
        expire,
        &app_state.config.media_cdn.private_key,
    )?;
    Ok(Json(UploadCredentials {
        token,
        signature,
        expire,
    }))
}

fn sign_upload_token(token: &str, expire: i64, private_key: &str) -> eyre::Result<String> {
    let mut mac = Hmac::<Sha1>::new_from_slice(private_key.as_bytes())
        .map_err(|err| eyre!("error creating upload signature: {}", err))?;
    mac.update(token.as_bytes());
    mac.update(expire.to_string().as_bytes());
    let signature = mac
        .finalize()
        .into_bytes()
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect();
    Ok(signature)
}

#[cfg(test)]
mod test {
    use claims::assert_ok;
    use pretty_assertions::assert_eq;

    use super::sign_upload_token;

    #[test]
    fn signature_is_stable_hex() {
        let a = assert_ok!(sign_upload_token("token", 1700000000, "private_key"));
        let b = assert_ok!(sign_upload_token("token", 1700000000, "private_key"));
        assert_eq!(a, b);
        assert_eq!(a.len(), 40);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn signature_depends_on_token_and_expire() {
        let a = assert_ok!(sign_upload_token("token", 1700000000, "private_key"));
        let b = assert_ok!(sign_upload_token("other", 1700000000, "private_key"));
        let c = assert_ok!(sign_upload_token("token", 1700000001, "private_key"));
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
