//! 최종 추천 신호.
//!
//! 기술적 결과와 심리 결과만으로 결정되며 별도 상태를 갖지 않습니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 최종 추천 등급.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalLabel {
    /// 기술적 매수 + 심리 기회
    PriorityBuy,
    /// 기술적 매도 + 심리 경고
    CautionSell,
    /// 신호 수렴 부족, 관망
    Monitor,
}

impl FinalLabel {
    /// 등급별 고정 근거 문장.
    pub fn rationale(&self) -> &'static str {
        match self {
            FinalLabel::PriorityBuy => "convergence of bullish technical and sentiment signals",
            FinalLabel::CautionSell => "bearish warning in both analyses",
            FinalLabel::Monitor => "insufficient convergence across signals",
        }
    }
}

impl std::fmt::Display for FinalLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FinalLabel::PriorityBuy => write!(f, "PRIORITY BUY"),
            FinalLabel::CautionSell => write!(f, "CAUTION SELL"),
            FinalLabel::Monitor => write!(f, "MONITOR"),
        }
    }
}

/// 최종 추천 신호.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalSignal {
    /// 추천 등급
    pub label: FinalLabel,
    /// 혼합 점수 (0~100)
    pub blended_score: Decimal,
    /// 근거 문장
    pub rationale: String,
}

impl FinalSignal {
    /// 등급과 점수로 신호를 생성합니다. 근거 문장은 등급에서 결정됩니다.
    pub fn new(label: FinalLabel, blended_score: Decimal) -> Self {
        Self {
            label,
            blended_score,
            rationale: label.rationale().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rationale_follows_label() {
        let signal = FinalSignal::new(FinalLabel::CautionSell, dec!(62.0));
        assert_eq!(signal.rationale, "bearish warning in both analyses");
        assert_eq!(signal.label.to_string(), "CAUTION SELL");
    }
}
