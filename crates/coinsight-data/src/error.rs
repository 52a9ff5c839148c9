//! 데이터 모듈 오류 타입.

use std::time::Duration;

use thiserror::Error;

use crate::retry::{RetryPolicy, RetryableError};

/// 외부 데이터 조회 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 잘못된 요청 인자 (빈 코인 ID 등)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 요청 한도 초과 (HTTP 429)
    #[error("Rate limit exceeded")]
    RateLimited,

    /// 요청 타임아웃
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// 네트워크/연결 오류
    #[error("Network error: {0}")]
    Network(String),

    /// 리소스를 찾을 수 없음 (잘못된 코인 ID 등)
    #[error("Not found: {0}")]
    NotFound(String),

    /// 그 외 HTTP 오류 응답
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// 응답 형식 오류
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// 빈 응답
    #[error("Empty response: {0}")]
    Empty(String),
}

impl DataError {
    /// 재시도 가능한 에러인지 확인.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DataError::RateLimited | DataError::Timeout(_) | DataError::Network(_)
        )
    }
}

impl RetryableError for DataError {
    fn retry_delay(&self, attempt: u32, policy: &RetryPolicy) -> Option<Duration> {
        match self {
            DataError::RateLimited => Some(policy.rate_limit_delay(attempt)),
            DataError::Timeout(_) => Some(policy.timeout_retry_delay),
            DataError::Network(_) => Some(policy.connection_retry_delay),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DataError::Timeout(err.to_string())
        } else if err.is_decode() {
            DataError::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            DataError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            DataError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::Malformed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
