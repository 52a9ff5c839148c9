//! 최종 신호 결합기.
//!
//! 기술적 결과와 심리 결과를 고정 가중치로 혼합하고 추천 등급을 결정합니다.
//!
//! 판정 순서 (처음 일치하는 규칙 적용):
//! 1. 기술적 매수 계열 + 심리 점수 > 60 → PriorityBuy
//! 2. 기술적 매도 계열 + 심리 점수 < 40 → CautionSell
//! 3. 그 외 → Monitor

use coinsight_core::{
    FinalLabel, FinalSignal, ScoringConfig, SentimentResult, TechnicalResult,
};
use rust_decimal::Decimal;
use tracing::debug;

const MAX_BLENDED_SCORE: Decimal = Decimal::ONE_HUNDRED;

/// 최종 신호 결합기.
#[derive(Debug, Clone, Default)]
pub struct SignalCombiner {
    config: ScoringConfig,
}

impl SignalCombiner {
    /// 지정한 점수 설정으로 생성합니다.
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// 두 결과를 결합합니다.
    ///
    /// 혼합 점수 = 기술적 신뢰도 × 0.7 + 심리 점수 × 0.3 (0~100으로 제한)
    pub fn combine(&self, technical: &TechnicalResult, sentiment: &SentimentResult) -> FinalSignal {
        let blended = Decimal::from(technical.confidence) * self.config.technical_weight
            + Decimal::from(sentiment.score) * self.config.sentiment_weight;
        let blended_score = blended.clamp(Decimal::ZERO, MAX_BLENDED_SCORE);

        let label = if technical.signal.is_bullish()
            && sentiment.score > self.config.priority_buy_sentiment_min
        {
            FinalLabel::PriorityBuy
        } else if technical.signal.is_bearish()
            && sentiment.score < self.config.caution_sell_sentiment_max
        {
            FinalLabel::CautionSell
        } else {
            FinalLabel::Monitor
        };

        debug!(
            technical = %technical.signal,
            sentiment_score = sentiment.score,
            blended = %blended_score,
            label = %label,
            "최종 신호 결합"
        );

        FinalSignal::new(label, blended_score)
    }
}
