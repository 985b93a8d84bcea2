//! # 자격 증명 저장소 (Credential Store)
//!
//! 계정 생성과 이메일/비밀번호 검증을 담당합니다.
//! 비밀번호는 Argon2id로 해싱한 PHC 문자열만 저장하고, 평문은 저장하지 않습니다.

use std::sync::OnceLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use sqlx::SqlitePool;
use thiserror::Error;

use crate::{db::users as db_users, error::AppError, models::User};

const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 128;
const MAX_EMAIL_LEN: usize = 254;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Email already exists")]
    EmailAlreadyExists,

    /// 이메일이 없을 때와 비밀번호가 틀렸을 때 같은 에러를 씁니다 (계정 존재 여부 노출 방지).
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Store(#[from] AppError),
}

impl From<CredentialError> for AppError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::EmailAlreadyExists => AppError::Conflict(err.to_string()),
            CredentialError::InvalidCredentials => AppError::Unauthorized(err.to_string()),
            CredentialError::Hashing(msg) => AppError::Internal(msg),
            CredentialError::Store(inner) => inner,
        }
    }
}

/// 회원가입 입력 검사. 이메일은 저장된 그대로(대소문자 구분) 비교하므로 변형하지 않습니다.
pub fn validate_signup(email: &str, password: &str) -> Result<(), AppError> {
    if email.is_empty() || email.len() > MAX_EMAIL_LEN || !email.contains('@') {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }
    let password_len = password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&password_len) {
        return Err(AppError::Validation(format!(
            "Password must be between {MIN_PASSWORD_LEN} and {MAX_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::Hashing(e.to_string()))
}

fn verify_password(password: &str, password_hash: &str) -> Result<bool, CredentialError> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| CredentialError::Hashing(format!("Password hash parse error: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// 존재하지 않는 이메일로 로그인할 때 검증할 더미 해시.
/// 두 실패 경로 모두 Argon2 검증을 한 번씩 수행해 응답 시간 차이를 줄입니다.
fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| hash_password("tripdeck-dummy-password").unwrap_or_default())
}

/// 새 계정을 만듭니다.
pub async fn create_account(
    pool: &SqlitePool,
    email: &str,
    password: &str,
    name: Option<&str>,
) -> Result<User, CredentialError> {
    validate_signup(email, password)?;

    if db_users::find_by_email(pool, email).await?.is_some() {
        return Err(CredentialError::EmailAlreadyExists);
    }

    let password_hash = hash_password(password)?;
    let user_id = uuid::Uuid::now_v7().to_string();

    match db_users::create_user(pool, &user_id, email, &password_hash, name).await {
        Ok(user) => Ok(user),
        // 동시 가입 경쟁: 유니크 인덱스가 잡아낸 중복
        Err(AppError::Conflict(_)) => Err(CredentialError::EmailAlreadyExists),
        Err(e) => Err(e.into()),
    }
}

/// 이메일/비밀번호를 검증하고 사용자를 반환합니다.
pub async fn verify_credentials(
    pool: &SqlitePool,
    email: &str,
    password: &str,
) -> Result<User, CredentialError> {
    let Some(user) = db_users::find_by_email(pool, email).await? else {
        let _ = verify_password(password, dummy_hash());
        return Err(CredentialError::InvalidCredentials);
    };

    if verify_password(password, &user.password_hash)? {
        Ok(user)
    } else {
        Err(CredentialError::InvalidCredentials)
    }
}
