//! 시장 심리 점수 계산기.
//!
//! 공포/탐욕 지수(0~100)를 역발상 관점의 심리 점수로 변환합니다.
//! 극단적 공포는 매수 기회(높은 점수), 극단적 탐욕은 주의(낮은 점수)로 봅니다.

use coinsight_core::{ScoringConfig, SentimentLabel, SentimentResult};
use tracing::debug;

/// 심리 점수 계산기.
#[derive(Debug, Clone, Default)]
pub struct SentimentScorer {
    config: ScoringConfig,
}

impl SentimentScorer {
    /// 지정한 점수 설정으로 생성합니다.
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// 공포/탐욕 지수를 점수화합니다.
    ///
    /// 지수가 없거나 100을 넘으면 중립(기본 50)으로 처리합니다.
    pub fn score(&self, fear_greed_value: Option<u8>) -> SentimentResult {
        let value = fear_greed_value.filter(|v| *v <= 100);

        let (label, score) = match value {
            Some(v) if v <= self.config.extreme_fear_max => {
                (SentimentLabel::ExtremeFear, self.config.extreme_fear_score)
            }
            Some(v) if v >= self.config.extreme_greed_min => {
                (SentimentLabel::ExtremeGreed, self.config.extreme_greed_score)
            }
            _ => (SentimentLabel::Neutral, self.config.neutral_score),
        };

        debug!(fear_greed = ?value, label = %label, score, "심리 점수 계산");

        SentimentResult {
            fear_greed_value: value,
            label,
            score,
        }
    }
}
