//! # 페이지 라우트 가드
//!
//! API가 아닌 모든 경로(프론트엔드 페이지)에 적용되는 리다이렉트 규칙입니다.
//!
//! - 로그인하지 않은 사용자가 `/login`, `/signup` 외의 페이지에 접근 → `/login`으로 이동
//! - 로그인한 사용자가 `/login` 또는 `/signup`에 접근 → `/`로 이동
//!
//! `/api`, 정적 자산(`/_next`, `/assets`), `/favicon.ico`는 검사하지 않습니다.
//! API 경로는 각 핸들러가 401/403/404로 직접 응답합니다.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{error::AppError, middleware::auth::CurrentUser, routes::AppState};

const LOGIN_PATH: &str = "/login";
const HOME_PATH: &str = "/";

fn is_exempt(path: &str) -> bool {
    path == "/api"
        || path.starts_with("/api/")
        || path.starts_with("/_next/")
        || path.starts_with("/assets/")
        || path == "/favicon.ico"
}

fn is_auth_page(path: &str) -> bool {
    path.starts_with("/login") || path.starts_with("/signup")
}

/// 리다이렉트가 필요하면 이동할 경로를 반환합니다.
pub fn redirect_target(path: &str, authenticated: bool) -> Option<&'static str> {
    if is_exempt(path) {
        return None;
    }
    match (authenticated, is_auth_page(path)) {
        (false, false) => Some(LOGIN_PATH),
        (true, true) => Some(HOME_PATH),
        _ => None,
    }
}

/// `axum::middleware::from_fn_with_state`로 등록하는 미들웨어 함수
///
/// 세션 조회 결과(`CurrentUser`)는 요청 extensions에 남으므로
/// 뒤쪽 핸들러가 같은 요청에서 DB를 다시 조회하지 않습니다.
pub async fn route_guard(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_owned();
    if is_exempt(&path) {
        return Ok(next.run(request).await);
    }

    let (mut parts, body) = request.into_parts();
    let current = CurrentUser::from_request_parts(&mut parts, &state).await?;

    if let Some(target) = redirect_target(&path, current.0.is_authenticated()) {
        tracing::debug!(path = %path, redirect = target, "page guard redirect");
        return Ok(Redirect::temporary(target).into_response());
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_pages_go_to_login() {
        assert_eq!(redirect_target("/", false), Some("/login"));
        assert_eq!(redirect_target("/trips/abc", false), Some("/login"));
    }

    #[test]
    fn anonymous_can_reach_auth_pages() {
        assert_eq!(redirect_target("/login", false), None);
        assert_eq!(redirect_target("/signup", false), None);
    }

    #[test]
    fn signed_in_users_leave_auth_pages() {
        assert_eq!(redirect_target("/login", true), Some("/"));
        assert_eq!(redirect_target("/signup", true), Some("/"));
        assert_eq!(redirect_target("/trips/abc", true), None);
    }

    #[test]
    fn api_and_assets_are_not_guarded() {
        assert_eq!(redirect_target("/api/trips", false), None);
        assert_eq!(redirect_target("/_next/static/app.js", false), None);
        assert_eq!(redirect_target("/favicon.ico", false), None);
        assert_eq!(redirect_target("/apiary", false), Some("/login"));
    }
}
