//! 기술적 점수 계산기.
//!
//! 최신 시점의 지표 값으로 규칙별 점수를 누적하여 신호 등급과 신뢰도를 산출합니다.
//!
//! # 규칙 (평가 순서)
//!
//! 1. **RSI**: < 30 → +25 (과매도), > 70 → -20 (과매수)
//! 2. **추세**: 가격 > SMA-20 → +15, 그 외 -10
//! 3. **골든 크로스**: 시계열 > 50개이고 직전 시점 SMA-20 < SMA-50, 현재 SMA-20 > SMA-50 → +20
//! 4. **MACD**: MACD > 시그널 → +10
//! 5. **볼린저**: 가격 < 하단 밴드 → +15
//!
//! 정의되지 않은 지표의 규칙은 건너뜁니다. 근거는 평가 순서대로 최대 3개까지 보관합니다.

use coinsight_core::{
    PriceSeries, RawIndicators, SignalReason, TechnicalResult, TechnicalSignal, MAX_REASONS,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use crate::indicators::{is_golden_cross, IndicatorProvider, IndicatorSnapshot, StandardIndicatorProvider};

/// 점수 계산에 필요한 최소 관측치 수.
pub const MIN_OBSERVATIONS: usize = 20;

/// 골든 크로스 규칙이 평가되기 위한 최소 초과 관측치 수 (이 값보다 많아야 함).
pub const CROSSOVER_MIN_OBSERVATIONS: usize = 50;

/// 신뢰도 하한.
pub const MIN_CONFIDENCE: i32 = 5;

/// 신뢰도 상한.
pub const MAX_CONFIDENCE: i32 = 95;

const RSI_OVERSOLD: Decimal = dec!(30);
const RSI_OVERBOUGHT: Decimal = dec!(70);

const OVERSOLD_POINTS: i32 = 25;
const OVERBOUGHT_POINTS: i32 = -20;
const ABOVE_SMA_POINTS: i32 = 15;
const BELOW_SMA_POINTS: i32 = -10;
const GOLDEN_CROSS_POINTS: i32 = 20;
const POSITIVE_MACD_POINTS: i32 = 10;
const LOWER_BAND_POINTS: i32 = 15;

/// 규칙 평가 결과 (등급 매핑 전).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    /// 누적 점수
    pub score: i32,
    /// 평가 순서대로 기록된 모든 근거 (잘리기 전)
    pub reasons: Vec<SignalReason>,
}

impl ScoreBreakdown {
    fn add(&mut self, points: i32, reason: SignalReason) {
        self.score += points;
        self.reasons.push(reason);
    }
}

/// 기술적 점수 계산기.
///
/// 상태가 없으며 같은 시계열에 대해 항상 같은 결과를 반환합니다.
#[derive(Debug, Default)]
pub struct TechnicalScorer<P = StandardIndicatorProvider> {
    provider: P,
}

impl TechnicalScorer<StandardIndicatorProvider> {
    /// 표준 지표 제공자를 사용하는 계산기.
    pub fn new() -> Self {
        Self::with_provider(StandardIndicatorProvider::new())
    }
}

impl<P: IndicatorProvider> TechnicalScorer<P> {
    /// 지정한 지표 제공자를 사용하는 계산기.
    pub fn with_provider(provider: P) -> Self {
        Self { provider }
    }

    /// 시계열을 분석합니다.
    ///
    /// 관측치가 20개 미만이거나 지표 계산이 실패하면
    /// `TechnicalResult::insufficient_data()`를 반환합니다. 에러를 전파하지 않습니다.
    pub fn analyze(&self, series: &PriceSeries) -> TechnicalResult {
        if series.len() < MIN_OBSERVATIONS {
            debug!(
                observations = series.len(),
                required = MIN_OBSERVATIONS,
                "관측치 부족으로 기술적 분석 생략"
            );
            return TechnicalResult::insufficient_data();
        }

        let prices = series.prices();
        let indicators = match self.provider.compute(&prices) {
            Ok(indicators) => indicators,
            Err(e) => {
                warn!(error = %e, "지표 계산 실패");
                return TechnicalResult::insufficient_data();
            }
        };

        let (Some(price), Some(latest)) = (prices.last().copied(), indicators.latest()) else {
            return TechnicalResult::insufficient_data();
        };

        let breakdown = evaluate_rules(price, latest, indicators.previous(), series.len());
        let (signal, confidence) = classify_score(breakdown.score);

        debug!(
            score = breakdown.score,
            signal = %signal,
            confidence,
            reasons = ?breakdown.reasons,
            "기술적 점수 계산 완료"
        );

        let mut reasons = breakdown.reasons;
        reasons.truncate(MAX_REASONS);

        TechnicalResult {
            signal,
            confidence,
            score: breakdown.score,
            reasons,
            raw: RawIndicators::rounded(Some(price), latest.rsi, latest.sma_20, latest.macd),
        }
    }
}

/// 최신 시점 지표에 규칙을 순서대로 적용합니다.
///
/// `previous`는 최신 시점의 바로 앞 시점이며 골든 크로스 판정에만 사용됩니다.
pub fn evaluate_rules(
    price: Decimal,
    latest: &IndicatorSnapshot,
    previous: Option<&IndicatorSnapshot>,
    observations: usize,
) -> ScoreBreakdown {
    let mut breakdown = ScoreBreakdown::default();

    if let Some(rsi) = latest.rsi {
        if rsi < RSI_OVERSOLD {
            breakdown.add(OVERSOLD_POINTS, SignalReason::Oversold);
        } else if rsi > RSI_OVERBOUGHT {
            breakdown.add(OVERBOUGHT_POINTS, SignalReason::Overbought);
        }
    }

    if let Some(sma_20) = latest.sma_20 {
        if price > sma_20 {
            breakdown.add(ABOVE_SMA_POINTS, SignalReason::AboveSma20);
        } else {
            breakdown.add(BELOW_SMA_POINTS, SignalReason::BelowSma20);
        }

        if observations > CROSSOVER_MIN_OBSERVATIONS && latest.sma_50.is_some() {
            let crossed = previous.is_some_and(|prev| {
                is_golden_cross((prev.sma_20, prev.sma_50), (latest.sma_20, latest.sma_50))
            });
            if crossed {
                breakdown.add(GOLDEN_CROSS_POINTS, SignalReason::GoldenCross);
            }
        }
    }

    if let (Some(macd), Some(signal)) = (latest.macd, latest.macd_signal) {
        if macd > signal {
            breakdown.add(POSITIVE_MACD_POINTS, SignalReason::PositiveMacd);
        }
    }

    if let Some(lower) = latest.bollinger_low {
        if price < lower {
            breakdown.add(LOWER_BAND_POINTS, SignalReason::LowerBollingerBand);
        }
    }

    breakdown
}

/// 누적 점수를 신호 등급과 신뢰도로 변환합니다.
///
/// | 점수 | 등급 | 신뢰도 |
/// |------|------|--------|
/// | ≥ 40 | StrongBuy | min(90, 60 + score) |
/// | 20 ~ 39 | Buy | 50 + score |
/// | ≤ -20 | StrongSell | min(90, 60 - score) |
/// | -19 ~ 0 | Sell | 50 - score |
/// | 1 ~ 19 | Neutral | 50 |
///
/// 신뢰도는 최종적으로 [5, 95]로 제한됩니다.
pub fn classify_score(score: i32) -> (TechnicalSignal, u8) {
    let (signal, confidence) = if score >= 40 {
        (TechnicalSignal::StrongBuy, 90_i32.min(60_i32.saturating_add(score)))
    } else if score >= 20 {
        (TechnicalSignal::Buy, 50 + score)
    } else if score <= -20 {
        (TechnicalSignal::StrongSell, 90_i32.min(60_i32.saturating_sub(score)))
    } else if score <= 0 {
        (TechnicalSignal::Sell, 50 - score)
    } else {
        (TechnicalSignal::Neutral, 50)
    };

    let clamped = confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE);
    (signal, u8::try_from(clamped).unwrap_or(MAX_CONFIDENCE as u8))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use coinsight_core::PricePoint;
    use proptest::prelude::*;

    use crate::indicators::{IndicatorError, IndicatorResult, IndicatorSeries};

    /// 고정 스냅샷을 반환하는 테스트용 제공자.
    struct FixedProvider {
        snapshots: Vec<IndicatorSnapshot>,
    }

    impl IndicatorProvider for FixedProvider {
        fn compute(&self, _prices: &[Decimal]) -> IndicatorResult<IndicatorSeries> {
            Ok(IndicatorSeries::new(self.snapshots.clone()))
        }
    }

    struct FailingProvider;

    impl IndicatorProvider for FailingProvider {
        fn compute(&self, _prices: &[Decimal]) -> IndicatorResult<IndicatorSeries> {
            Err(IndicatorError::CalculationError("broken".to_string()))
        }
    }

    fn series_of(prices: &[Decimal]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, p)| PricePoint::new(start + Duration::hours(i as i64), *p))
            .collect();
        PriceSeries::new(points).unwrap()
    }

    fn flat_series(count: usize, price: Decimal) -> PriceSeries {
        series_of(&vec![price; count])
    }

    /// 마지막 시점에만 `latest`, 직전 시점에 `previous`를 둔 스냅샷 목록.
    fn snapshots_with(
        count: usize,
        previous: IndicatorSnapshot,
        latest: IndicatorSnapshot,
    ) -> Vec<IndicatorSnapshot> {
        let mut snapshots = vec![IndicatorSnapshot::default(); count];
        snapshots[count - 2] = previous;
        snapshots[count - 1] = latest;
        snapshots
    }

    #[test]
    fn test_fewer_than_20_points_is_insufficient() {
        let scorer = TechnicalScorer::new();
        let result = scorer.analyze(&flat_series(19, dec!(100)));

        assert_eq!(result, TechnicalResult::insufficient_data());
    }

    #[test]
    fn test_provider_failure_is_insufficient() {
        let scorer = TechnicalScorer::with_provider(FailingProvider);
        let result = scorer.analyze(&flat_series(30, dec!(100)));

        assert!(result.is_insufficient());
        assert_eq!(result.confidence, 0);
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn test_engineered_strong_buy_round_trip() {
        // RSI 25, 가격 > SMA-20, 크로스 없음, MACD > 시그널, 가격 > 하단 밴드
        let latest = IndicatorSnapshot {
            rsi: Some(dec!(25)),
            sma_20: Some(dec!(95)),
            sma_50: Some(dec!(90)),
            ema_12: Some(dec!(97)),
            macd: Some(dec!(1.5)),
            macd_signal: Some(dec!(1.0)),
            bollinger_high: Some(dec!(110)),
            bollinger_low: Some(dec!(85)),
        };
        let previous = IndicatorSnapshot {
            sma_20: Some(dec!(94)),
            sma_50: Some(dec!(90)),
            ..latest
        };
        let scorer = TechnicalScorer::with_provider(FixedProvider {
            snapshots: snapshots_with(60, previous, latest),
        });

        let result = scorer.analyze(&flat_series(60, dec!(100)));

        assert_eq!(result.score, 50);
        assert_eq!(result.signal, TechnicalSignal::StrongBuy);
        assert_eq!(result.confidence, 90);
        assert_eq!(
            result.reasons,
            vec![
                SignalReason::Oversold,
                SignalReason::AboveSma20,
                SignalReason::PositiveMacd
            ]
        );
        assert_eq!(result.raw.rsi, Some(dec!(25)));
        assert_eq!(result.raw.price, Some(dec!(100)));
    }

    #[test]
    fn test_reasons_truncated_in_evaluation_order() {
        let latest = IndicatorSnapshot {
            rsi: Some(dec!(20)),
            sma_20: Some(dec!(100)),
            sma_50: Some(dec!(99)),
            macd: Some(dec!(2)),
            macd_signal: Some(dec!(1)),
            bollinger_low: Some(dec!(101)),
            ..Default::default()
        };
        let previous = IndicatorSnapshot {
            sma_20: Some(dec!(98)),
            sma_50: Some(dec!(99)),
            ..Default::default()
        };

        // 가격이 SMA-20과 같으면 아래로 취급 (-10)
        let breakdown = evaluate_rules(dec!(100), &latest, Some(&previous), 60);
        assert_eq!(
            breakdown.reasons,
            vec![
                SignalReason::Oversold,
                SignalReason::BelowSma20,
                SignalReason::GoldenCross,
                SignalReason::PositiveMacd,
                SignalReason::LowerBollingerBand,
            ]
        );
        assert_eq!(breakdown.score, 25 - 10 + 20 + 10 + 15);

        let scorer = TechnicalScorer::with_provider(FixedProvider {
            snapshots: snapshots_with(60, previous, latest),
        });
        let result = scorer.analyze(&flat_series(60, dec!(100)));
        assert_eq!(result.reasons.len(), 3);
        assert_eq!(result.reasons[2], SignalReason::GoldenCross);
    }

    #[test]
    fn test_crossover_requires_more_than_50_points() {
        let latest = IndicatorSnapshot {
            sma_20: Some(dec!(101)),
            sma_50: Some(dec!(100)),
            ..Default::default()
        };
        let previous = IndicatorSnapshot {
            sma_20: Some(dec!(99)),
            sma_50: Some(dec!(100)),
            ..Default::default()
        };

        let at_50 = evaluate_rules(dec!(102), &latest, Some(&previous), 50);
        assert!(!at_50.reasons.contains(&SignalReason::GoldenCross));

        let at_51 = evaluate_rules(dec!(102), &latest, Some(&previous), 51);
        assert!(at_51.reasons.contains(&SignalReason::GoldenCross));
    }

    #[test]
    fn test_crossover_two_points_ago_does_not_fire() {
        let crossed = IndicatorSnapshot {
            sma_20: Some(dec!(101)),
            sma_50: Some(dec!(100)),
            ..Default::default()
        };
        let before_cross = IndicatorSnapshot {
            sma_20: Some(dec!(99)),
            sma_50: Some(dec!(100)),
            ..Default::default()
        };
        let still_above = IndicatorSnapshot {
            sma_20: Some(dec!(102)),
            sma_50: Some(dec!(100)),
            ..Default::default()
        };

        let mut snapshots = vec![IndicatorSnapshot::default(); 60];
        snapshots[57] = before_cross;
        snapshots[58] = crossed;
        snapshots[59] = still_above;

        let scorer = TechnicalScorer::with_provider(FixedProvider { snapshots });
        let result = scorer.analyze(&flat_series(60, dec!(103)));

        assert!(!result.reasons.contains(&SignalReason::GoldenCross));
        assert_eq!(result.score, 15);
        assert_eq!(result.signal, TechnicalSignal::Neutral);
        assert_eq!(result.confidence, 50);
    }

    #[test]
    fn test_undefined_indicators_are_skipped() {
        let latest = IndicatorSnapshot::default();
        let breakdown = evaluate_rules(dec!(100), &latest, None, 25);

        assert_eq!(breakdown, ScoreBreakdown::default());
        // 점수 0 → Sell, 신뢰도 50
        assert_eq!(classify_score(breakdown.score), (TechnicalSignal::Sell, 50));
    }

    #[test]
    fn test_overbought_below_average_is_strong_sell() {
        let latest = IndicatorSnapshot {
            rsi: Some(dec!(80)),
            sma_20: Some(dec!(110)),
            ..Default::default()
        };
        let breakdown = evaluate_rules(dec!(100), &latest, None, 30);

        assert_eq!(breakdown.score, -30);
        assert_eq!(classify_score(-30), (TechnicalSignal::StrongSell, 90));
    }

    #[test]
    fn test_classification_thresholds() {
        assert_eq!(classify_score(40), (TechnicalSignal::StrongBuy, 90));
        assert_eq!(classify_score(39), (TechnicalSignal::Buy, 89));
        assert_eq!(classify_score(20), (TechnicalSignal::Buy, 70));
        assert_eq!(classify_score(19), (TechnicalSignal::Neutral, 50));
        assert_eq!(classify_score(1), (TechnicalSignal::Neutral, 50));
        assert_eq!(classify_score(0), (TechnicalSignal::Sell, 50));
        assert_eq!(classify_score(-10), (TechnicalSignal::Sell, 60));
        assert_eq!(classify_score(-19), (TechnicalSignal::Sell, 69));
        assert_eq!(classify_score(-20), (TechnicalSignal::StrongSell, 80));
        assert_eq!(classify_score(100), (TechnicalSignal::StrongBuy, 90));
    }

    #[test]
    fn test_macd_reported_once_slow_window_fills() {
        let scorer = TechnicalScorer::new();

        let result = scorer.analyze(&flat_series(30, dec!(100)));
        assert_eq!(result.raw.macd, Some(Decimal::ZERO));

        let result = scorer.analyze(&flat_series(25, dec!(100)));
        assert_eq!(result.raw.macd, None);
    }

    #[test]
    fn test_analysis_is_idempotent_on_real_indicators() {
        let prices: Vec<Decimal> = (0..80)
            .map(|i| Decimal::from(1000 + (i * 37 % 23) - (i % 7) * 3))
            .collect();
        let series = series_of(&prices);
        let scorer = TechnicalScorer::new();

        let first = scorer.analyze(&series);
        let second = scorer.analyze(&series);

        assert_eq!(first, second);
        assert!(!first.is_insufficient());
        assert!(first.reasons.len() <= MAX_REASONS);
    }

    proptest! {
        #[test]
        fn prop_confidence_always_within_bounds(score in any::<i32>()) {
            let (signal, confidence) = classify_score(score);
            prop_assert!(signal != TechnicalSignal::InsufficientData);
            prop_assert!((5..=95).contains(&confidence));
        }

        #[test]
        fn prop_real_series_respects_invariants(
            raw in prop::collection::vec(1u32..100_000, 20..120)
        ) {
            let prices: Vec<Decimal> = raw.iter().map(|v| Decimal::from(*v)).collect();
            let result = TechnicalScorer::new().analyze(&series_of(&prices));

            prop_assert!(!result.is_insufficient());
            prop_assert!((5..=95).contains(&result.confidence));
            prop_assert!(result.reasons.len() <= MAX_REASONS);
        }
    }
}
