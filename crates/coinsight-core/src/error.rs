//! 분석 시스템의 에러 타입.
//!
//! 이 모듈은 분석 파이프라인 전반에서 사용되는 에러 타입을 정의합니다.
//! 데이터 부족, 지표 미정의, 심리 지수 부재는 에러가 아니라 값으로 표현됩니다.

use thiserror::Error;

/// 핵심 분석 에러.
#[derive(Debug, Error)]
pub enum CoinsightError {
    /// 재시도 후에도 시세 데이터를 가져오지 못함 (또는 비어 있거나 형식이 잘못됨)
    #[error("데이터를 가져올 수 없음 ({coin}): {reason}")]
    DataUnavailable { coin: String, reason: String },

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 인증 에러
    #[error("인증 에러: {0}")]
    Auth(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 분석 작업을 위한 Result 타입.
pub type CoinsightResult<T> = Result<T, CoinsightError>;

impl CoinsightError {
    /// 시세 데이터 부재 에러를 생성합니다.
    pub fn data_unavailable(coin: impl Into<String>, reason: impl ToString) -> Self {
        CoinsightError::DataUnavailable {
            coin: coin.into(),
            reason: reason.to_string(),
        }
    }

    /// 데이터 부재 에러인지 확인합니다.
    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, CoinsightError::DataUnavailable { .. })
    }

    /// 사용자에게 보여줄 해결 방법 목록.
    ///
    /// 데이터 부재가 아닌 에러는 빈 목록을 반환합니다.
    pub fn remediation_hints(&self) -> Vec<String> {
        match self {
            CoinsightError::DataUnavailable { coin, .. } => vec![
                format!(
                    "Check that `{}` is a valid CoinGecko coin id (see https://www.coingecko.com)",
                    coin
                ),
                "Wait about a minute and retry (the free API allows roughly 50 requests per minute)"
                    .to_string(),
                "Check your internet connection".to_string(),
                "Configure a personal API key via COINGECKO_API_KEY".to_string(),
            ],
            _ => Vec::new(),
        }
    }
}

impl From<serde_json::Error> for CoinsightError {
    fn from(err: serde_json::Error) -> Self {
        CoinsightError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for CoinsightError {
    fn from(err: config::ConfigError) -> Self {
        CoinsightError::Config(err.to_string())
    }
}
