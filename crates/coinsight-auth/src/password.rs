//! 비밀번호 해싱.
//!
//! Argon2id PHC 문자열을 생성하고 검증합니다.
//! `APP_PASSWORD_HASH` 값은 `coinsight hash-password`로 만듭니다.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// 비밀번호 해시가 설정되지 않았을 때 쓰는 개발용 비밀번호.
pub const DEFAULT_DEV_PASSWORD: &str = "admin123";

/// 권장 최소 길이.
pub const MIN_PASSWORD_LEN: usize = 8;

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패: {0}")]
    HashingFailed(String),
    #[error("잘못된 해시 형식 (Argon2 PHC 문자열이 필요합니다)")]
    InvalidHashFormat,
}

/// 비밀번호를 Argon2id로 해싱합니다.
///
/// 솔트는 매번 새로 생성되므로 같은 비밀번호도 해시가 달라집니다.
///
/// ```rust,ignore
/// let hash = hash_password("correct horse")?;
/// // "$argon2id$v=19$m=19456,t=2,p=1$..."
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))
}

/// 비밀번호가 해시와 일치하는지 확인합니다.
///
/// 불일치는 `Ok(false)`이며, 해시 자체를 해석할 수 없을 때만 에러입니다.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = parse_hash(hash)?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// 해시 문자열이 PHC 형식인지 검증합니다.
pub fn validate_hash(hash: &str) -> Result<(), PasswordError> {
    parse_hash(hash).map(|_| ())
}

fn parse_hash(hash: &str) -> Result<PasswordHash<'_>, PasswordError> {
    PasswordHash::new(hash.trim()).map_err(|_| PasswordError::InvalidHashFormat)
}

/// 비밀번호 강도 경고 목록.
///
/// 해시 생성을 막지 않고 안내용으로만 사용합니다.
pub fn password_warnings(password: &str) -> Vec<&'static str> {
    let mut warnings = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LEN {
        warnings.push("password is shorter than 8 characters");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        warnings.push("password contains no digits");
    }
    if !password.chars().any(char::is_alphabetic) {
        warnings.push("password contains no letters");
    }
    if password == DEFAULT_DEV_PASSWORD {
        warnings.push("password is the built-in development default");
    }

    warnings
}
