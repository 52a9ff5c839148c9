//! 인증 에러 타입.

use coinsight_core::CoinsightError;
use thiserror::Error;

use crate::password::PasswordError;

/// 로그인 처리 에러.
///
/// 잘못된 자격 증명이나 잠금은 에러가 아니라 [`crate::LoginOutcome`]으로 표현됩니다.
#[derive(Debug, Error)]
pub enum AuthError {
    /// 비밀번호 해싱/검증 실패
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// 세션 저장소 오류
    #[error("세션 저장소 오류: {0}")]
    Store(String),

    /// 잘못된 인증 설정
    #[error("인증 설정 오류: {0}")]
    Config(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

impl From<AuthError> for CoinsightError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Config(message) => CoinsightError::Config(message),
            other => CoinsightError::Auth(other.to_string()),
        }
    }
}
