use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;

use crate::{
    config::Config,
    db::{self, sessions as db_sessions},
    error::AppError,
    models::Identity,
    routes::AppState,
};

pub const SESSION_COOKIE: &str = "tripdeck_session";

/// Resolved identity of the caller. Never rejects: a missing, unknown or
/// expired session simply yields `Identity::Anonymous`.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(pub Identity);

impl CurrentUser {
    pub fn require_user(&self) -> Result<AuthUser, AppError> {
        match &self.0 {
            Identity::User(user_id) => Ok(AuthUser {
                user_id: user_id.clone(),
            }),
            Identity::Anonymous => Err(AppError::Unauthorized("Sign in required".to_string())),
        }
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // The page guard may already have resolved the session for this request.
        if let Some(current) = parts.extensions.get::<CurrentUser>() {
            return Ok(current.clone());
        }

        let jar = CookieJar::from_headers(&parts.headers);
        let identity = match jar.get(SESSION_COOKIE) {
            Some(cookie) => resolve_session(&state.pool, cookie.value()).await?,
            None => Identity::Anonymous,
        };

        let current = CurrentUser(identity);
        parts.extensions.insert(current.clone());
        Ok(current)
    }
}

/// Signed-in caller. Rejects anonymous requests with 401.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

impl AuthUser {
    pub fn identity(&self) -> Identity {
        Identity::User(self.user_id.clone())
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        CurrentUser::from_request_parts(parts, state)
            .await?
            .require_user()
    }
}

/// 32 random bytes, hex encoded.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Stores a new session for `user_id` and returns the raw token for the cookie.
pub async fn issue_session(
    pool: &SqlitePool,
    user_id: &str,
    ttl_days: i64,
) -> Result<String, AppError> {
    let token = generate_token();
    let expires_at = db::timestamp(Utc::now() + Duration::days(ttl_days));
    db_sessions::insert_session(pool, &hash_token(&token), user_id, &expires_at).await?;
    Ok(token)
}

pub async fn resolve_session(pool: &SqlitePool, token: &str) -> Result<Identity, AppError> {
    let token_hash = hash_token(token);
    let Some(session) = db_sessions::find_session(pool, &token_hash).await? else {
        return Ok(Identity::Anonymous);
    };

    if session.is_expired(Utc::now()) {
        db_sessions::delete_session(pool, &token_hash).await?;
        return Ok(Identity::Anonymous);
    }

    Ok(Identity::User(session.user_id))
}

/// Deletes the server-side session. Unknown tokens are a no-op.
pub async fn revoke_session(pool: &SqlitePool, token: &str) -> Result<(), AppError> {
    db_sessions::delete_session(pool, &hash_token(token)).await?;
    Ok(())
}

pub async fn purge_expired_sessions(pool: &SqlitePool) -> Result<u64, AppError> {
    db_sessions::delete_expired_sessions(pool, &db::timestamp(Utc::now())).await
}

pub fn session_cookie(token: String, config: &Config) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies())
        .path("/")
        .max_age(time::Duration::days(config.session_ttl_days))
        .build()
}

pub fn apply_session_cookie(jar: CookieJar, token: String, config: &Config) -> CookieJar {
    jar.add(session_cookie(token, config))
}

pub fn clear_session_cookie(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::users;

    async fn pool_with_user() -> SqlitePool {
        let pool = db::connect("sqlite::memory:").await.unwrap();
        users::create_user(&pool, "u1", "u1@example.com", "hash", None)
            .await
            .unwrap();
        pool
    }

    #[test]
    fn tokens_are_unique_hex() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn hash_is_stable_and_not_the_token() {
        let token = generate_token();
        assert_eq!(hash_token(&token), hash_token(&token));
        assert_ne!(hash_token(&token), token);
    }

    #[tokio::test]
    async fn issued_session_resolves_to_user() {
        let pool = pool_with_user().await;
        let token = issue_session(&pool, "u1", 7).await.unwrap();
        assert_eq!(
            resolve_session(&pool, &token).await.unwrap(),
            Identity::User("u1".to_string())
        );
    }

    #[tokio::test]
    async fn unknown_token_is_anonymous() {
        let pool = pool_with_user().await;
        assert_eq!(
            resolve_session(&pool, "not-a-real-token").await.unwrap(),
            Identity::Anonymous
        );
    }

    #[tokio::test]
    async fn expired_session_is_anonymous_and_removed() {
        let pool = pool_with_user().await;
        let token = generate_token();
        let expired = db::timestamp(Utc::now() - Duration::minutes(1));
        db_sessions::insert_session(&pool, &hash_token(&token), "u1", &expired)
            .await
            .unwrap();

        assert_eq!(resolve_session(&pool, &token).await.unwrap(), Identity::Anonymous);
        assert!(db_sessions::find_session(&pool, &hash_token(&token))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn revoked_session_no_longer_resolves() {
        let pool = pool_with_user().await;
        let token = issue_session(&pool, "u1", 7).await.unwrap();
        revoke_session(&pool, &token).await.unwrap();
        assert_eq!(resolve_session(&pool, &token).await.unwrap(), Identity::Anonymous);
    }

    #[tokio::test]
    async fn purge_only_removes_expired_rows() {
        let pool = pool_with_user().await;
        let live = issue_session(&pool, "u1", 7).await.unwrap();
        let stale = generate_token();
        let expired = db::timestamp(Utc::now() - Duration::days(1));
        db_sessions::insert_session(&pool, &hash_token(&stale), "u1", &expired)
            .await
            .unwrap();

        assert_eq!(purge_expired_sessions(&pool).await.unwrap(), 1);
        assert!(resolve_session(&pool, &live).await.unwrap().is_authenticated());
    }

    #[test]
    fn cookie_attributes() {
        let config = Config::for_database("sqlite::memory:");
        let cookie = session_cookie("abc".to_string(), &config);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(7)));
    }
}
