//! 모멘텀 지표 (Momentum Indicators).
//!
//! 가격 모멘텀과 과매수/과매도 상태를 측정하는 지표를 제공합니다.
//! - RSI (Relative Strength Index)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// RSI 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RsiParams {
    /// RSI 기간 (기본: 14).
    pub period: usize,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// 모멘텀 지표 계산기.
#[derive(Debug, Default)]
pub struct MomentumCalculator;

impl MomentumCalculator {
    /// 새로운 모멘텀 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// RSI (Relative Strength Index) 계산.
    ///
    /// RSI = 100 - (100 / (1 + RS))
    /// RS = 평균 상승폭 / 평균 하락폭
    ///
    /// 평균은 Wilder 방식 (alpha = 1 / period) 지수 평활이며,
    /// 첫 평균은 처음 period개 변화량의 단순 평균입니다.
    /// 하락폭 평균이 0이면 100입니다.
    ///
    /// # 반환
    /// 0-100 사이의 RSI 값들 (처음 period개는 None)
    pub fn rsi(&self, prices: &[Decimal], params: RsiParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;

        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "기간은 0보다 커야 합니다".to_string(),
            ));
        }

        if prices.len() < period + 1 {
            return Err(IndicatorError::InsufficientData {
                required: period + 1,
                provided: prices.len(),
            });
        }

        // 상승/하락 분리
        let (gains, losses): (Vec<Decimal>, Vec<Decimal>) = prices
            .windows(2)
            .map(|w| {
                let delta = w[1] - w[0];
                if delta > Decimal::ZERO {
                    (delta, Decimal::ZERO)
                } else {
                    (Decimal::ZERO, delta.abs())
                }
            })
            .unzip();

        let avg_gains = self.wilder_smoothing(&gains, period);
        let avg_losses = self.wilder_smoothing(&losses, period);

        // 변화량은 가격보다 하나 적으므로 첫 시점은 항상 None
        let mut result = Vec::with_capacity(prices.len());
        result.push(None);

        for (gain, loss) in avg_gains.into_iter().zip(avg_losses) {
            let value = match (gain, loss) {
                (Some(_), Some(loss)) if loss.is_zero() => Some(dec!(100)),
                (Some(gain), Some(loss)) => {
                    let rs = gain / loss;
                    Some(dec!(100) - (dec!(100) / (Decimal::ONE + rs)))
                }
                _ => None,
            };
            result.push(value);
        }

        Ok(result)
    }

    /// Wilder 평활 (SMA로 시작하는 alpha = 1/period EWM).
    fn wilder_smoothing(&self, values: &[Decimal], period: usize) -> Vec<Option<Decimal>> {
        let mut result = Vec::with_capacity(values.len());

        if values.len() < period {
            result.resize(values.len(), None);
            return result;
        }

        let alpha = Decimal::ONE / Decimal::from(period);
        let one_minus_alpha = Decimal::ONE - alpha;

        result.resize(period - 1, None);
        let mut ewm_value = values[..period].iter().sum::<Decimal>() / Decimal::from(period);
        result.push(Some(ewm_value));

        for value in &values[period..] {
            ewm_value = (*value * alpha) + (ewm_value * one_minus_alpha);
            result.push(Some(ewm_value));
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_prices() -> Vec<Decimal> {
        vec![
            dec!(44.34),
            dec!(44.09),
            dec!(44.15),
            dec!(43.61),
            dec!(44.33),
            dec!(44.83),
            dec!(45.10),
            dec!(45.42),
            dec!(45.84),
            dec!(46.08),
            dec!(45.89),
            dec!(46.03),
            dec!(45.61),
            dec!(46.28),
            dec!(46.28),
            dec!(46.00),
        ]
    }

    #[test]
    fn test_rsi_alignment() {
        let momentum = MomentumCalculator::new();
        let prices = sample_prices();

        let rsi = momentum.rsi(&prices, RsiParams::default()).unwrap();

        assert_eq!(rsi.len(), prices.len());
        assert!(rsi[13].is_none());
        assert!(rsi[14].is_some());
        assert!(rsi[15].is_some());
    }

    #[test]
    fn test_rsi_range() {
        let momentum = MomentumCalculator::new();
        let rsi = momentum.rsi(&sample_prices(), RsiParams::default()).unwrap();

        for value in rsi.iter().flatten() {
            assert!(*value >= Decimal::ZERO);
            assert!(*value <= dec!(100));
        }

        // 교과서 예제 값 (약 70.5) 근처
        let first = rsi[14].unwrap();
        assert!(first > dec!(70) && first < dec!(71), "rsi = {}", first);
    }

    #[test]
    fn test_rsi_all_gains_is_100() {
        let momentum = MomentumCalculator::new();
        let prices: Vec<Decimal> = (0..20).map(|i| Decimal::from(100 + i)).collect();

        let rsi = momentum.rsi(&prices, RsiParams::default()).unwrap();
        assert_eq!(rsi[19], Some(dec!(100)));
    }

    #[test]
    fn test_rsi_all_losses_is_0() {
        let momentum = MomentumCalculator::new();
        let prices: Vec<Decimal> = (0..20).map(|i| Decimal::from(200 - i)).collect();

        let rsi = momentum.rsi(&prices, RsiParams::default()).unwrap();
        assert_eq!(rsi[19], Some(Decimal::ZERO));
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let momentum = MomentumCalculator::new();
        let prices: Vec<Decimal> = (0..14).map(Decimal::from).collect();

        let result = momentum.rsi(&prices, RsiParams::default());
        assert!(matches!(
            result,
            Err(IndicatorError::InsufficientData { required: 15, provided: 14 })
        ));
    }
}
