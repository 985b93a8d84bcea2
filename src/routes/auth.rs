use crate::{
    db::users as db_users,
    error::AppError,
    middleware::auth::{
        apply_session_cookie, clear_session_cookie, issue_session, revoke_session, CurrentUser,
        SESSION_COOKIE,
    },
    models::user::*,
    routes::{ApiJson, AppState},
    services::credentials,
};
use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Value};

/// `POST /api/auth` — sign up, sign in or sign out, selected by `action`.
pub async fn handle_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(req): ApiJson<AuthRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    match req.action {
        AuthAction::Signup => {
            let (email, password) = credentials_from(&req)?;
            let user =
                credentials::create_account(&state.pool, email, password, req.name.as_deref())
                    .await?;
            tracing::info!(user_id = %user.id, "account created");
            start_session(&state, jar, user).await
        }
        AuthAction::Signin => {
            let (email, password) = credentials_from(&req)?;
            let user = credentials::verify_credentials(&state.pool, email, password).await?;
            tracing::info!(user_id = %user.id, "signed in");
            start_session(&state, jar, user).await
        }
        AuthAction::Signout => {
            if let Some(cookie) = jar.get(SESSION_COOKIE) {
                revoke_session(&state.pool, cookie.value()).await?;
            }
            tracing::info!("signed out");
            Ok((
                clear_session_cookie(jar),
                Json(AuthResponse {
                    user: None,
                    error: None,
                }),
            ))
        }
    }
}

/// `GET /api/auth` — the signed-in user, or `null`.
pub async fn current_user(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Value>, AppError> {
    let user = match current.0.user_id() {
        Some(user_id) => db_users::find_by_id(&state.pool, user_id)
            .await?
            .map(UserResponse::from),
        None => None,
    };

    Ok(Json(json!({ "user": user })))
}

fn credentials_from(req: &AuthRequest) -> Result<(&str, &str), AppError> {
    match (req.email.as_deref(), req.password.as_deref()) {
        (Some(email), Some(password)) => Ok((email, password)),
        _ => Err(AppError::Validation(
            "email and password are required".to_string(),
        )),
    }
}

async fn start_session(
    state: &AppState,
    jar: CookieJar,
    user: User,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let token = issue_session(&state.pool, &user.id, state.config.session_ttl_days).await?;

    Ok((
        apply_session_cookie(jar, token, &state.config),
        Json(AuthResponse {
            user: Some(user.into()),
            error: None,
        }),
    ))
}
