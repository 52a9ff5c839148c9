//! 데이터 Provider 모듈.
//!
//! 외부 소스에서 분석 입력을 가져오는 Provider들을 정의합니다.
//!
//! ## CoinGecko
//! - `CoinGeckoClient`: 가격/거래량 이력과 코인 메타데이터
//! - 데모 키(`x-cg-demo-api-key`)는 선택 사항
//!
//! ## alternative.me
//! - `FearGreedClient`: 암호화폐 공포/탐욕 지수 (0~100)

pub mod coingecko;
pub mod fear_greed;

use async_trait::async_trait;
use coinsight_core::{CoinInfo, PriceSeries};

use crate::error::Result;

pub use coingecko::{normalize_coin_id, CoinGeckoClient, API_KEY_HEADER};
pub use fear_greed::{FearGreedClient, FearGreedReading};

/// 가격 이력 및 코인 정보 제공자.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// `days`일 동안의 가격/거래량 시계열을 조회합니다.
    ///
    /// 재시도 후에도 실패하거나 응답이 비어 있으면 에러를 반환합니다.
    async fn fetch_market_chart(
        &self,
        coin_id: &str,
        vs_currency: &str,
        days: u32,
    ) -> Result<PriceSeries>;

    /// 코인 메타데이터를 조회합니다.
    async fn fetch_coin_info(&self, coin_id: &str, vs_currency: &str) -> Result<CoinInfo>;
}

/// 시장 심리 지수 제공자.
#[async_trait]
pub trait SentimentProvider: Send + Sync {
    /// 최신 공포/탐욕 지수. 조회에 실패하면 `None`입니다.
    async fn fetch_fear_greed(&self) -> Option<u8>;
}
