//! 코인 메타데이터.
//!
//! 화면 표시에만 쓰이며 점수 계산의 입력이 아닙니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 코인 기본 정보.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinInfo {
    /// CoinGecko 식별자 (예: "bitcoin")
    pub id: String,
    /// 표시 이름
    pub name: String,
    /// 심볼 (대문자)
    pub symbol: String,
    /// 호가 통화 기준 시가총액
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<Decimal>,
    /// 시가총액 순위
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}

impl CoinInfo {
    /// 새 코인 정보를 생성합니다. 심볼은 대문자로 정규화됩니다.
    pub fn new(id: impl Into<String>, name: impl Into<String>, symbol: impl AsRef<str>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.as_ref().to_uppercase(),
            market_cap: None,
            rank: None,
        }
    }

    /// 시가총액을 설정합니다. 0은 값 없음으로 취급합니다.
    pub fn with_market_cap(mut self, market_cap: Option<Decimal>) -> Self {
        self.market_cap = market_cap.filter(|v| !v.is_zero());
        self
    }

    /// 순위를 설정합니다.
    pub fn with_rank(mut self, rank: Option<u32>) -> Self {
        self.rank = rank;
        self
    }
}
