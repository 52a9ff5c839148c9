//! 시장 심리(공포/탐욕 지수) 결과 타입.

use serde::{Deserialize, Serialize};

/// 심리 구간.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    /// 극단적 공포
    ExtremeFear,
    /// 극단적 탐욕
    ExtremeGreed,
    /// 중립 (지수가 없을 때 포함)
    Neutral,
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::ExtremeFear => write!(f, "Extreme Fear"),
            SentimentLabel::ExtremeGreed => write!(f, "Extreme Greed"),
            SentimentLabel::Neutral => write!(f, "Neutral"),
        }
    }
}

/// 심리 분석 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// 원본 공포/탐욕 지수 (0~100, 피드 장애 시 없음)
    pub fear_greed_value: Option<u8>,
    /// 심리 구간
    pub label: SentimentLabel,
    /// 심리 점수 (0~100)
    pub score: u8,
}

impl SentimentResult {
    /// 지수 피드를 사용할 수 있었는지 확인합니다.
    pub fn is_available(&self) -> bool {
        self.fear_greed_value.is_some()
    }
}
