//! 외부 데이터 조회.
//!
//! 이 crate는 다음을 제공합니다:
//! - CoinGecko 가격 이력 및 코인 메타데이터 클라이언트
//! - alternative.me 공포/탐욕 지수 클라이언트
//! - 에러 종류별 대기 시간을 갖는 재사용 가능한 재시도 정책
//! - 분석 파이프라인이 의존하는 Provider 트레이트

pub mod error;
pub mod provider;
pub mod retry;

pub use error::{DataError, Result};
pub use provider::{
    normalize_coin_id, CoinGeckoClient, FearGreedClient, FearGreedReading, MarketDataProvider,
    SentimentProvider, API_KEY_HEADER,
};
pub use retry::{RetryPolicy, RetryableError};
