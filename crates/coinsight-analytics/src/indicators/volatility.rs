//! 변동성 지표 (Volatility Indicators).
//!
//! 가격 변동성을 측정하는 지표를 제공합니다.
//! - Bollinger Bands (볼린저 밴드)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::trend::validate_window;
use super::IndicatorResult;

/// 제곱근 근사 최대 반복 횟수.
const SQRT_MAX_ITERATIONS: usize = 100;

/// 볼린저 밴드 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerBandsParams {
    /// 이동평균 기간 (기본: 20).
    pub period: usize,
    /// 표준편차 배수 (기본: 2.0).
    pub std_dev_multiplier: Decimal,
}

impl Default for BollingerBandsParams {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: dec!(2.0),
        }
    }
}

/// 볼린저 밴드 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BollingerBandsResult {
    /// 상단 밴드 (MA + k × σ).
    pub upper: Option<Decimal>,
    /// 중간 밴드 (이동평균).
    pub middle: Option<Decimal>,
    /// 하단 밴드 (MA - k × σ).
    pub lower: Option<Decimal>,
}

/// 변동성 지표 계산기.
#[derive(Debug, Default)]
pub struct VolatilityIndicators;

impl VolatilityIndicators {
    /// 새로운 변동성 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 볼린저 밴드 계산.
    ///
    /// 상단 밴드 = MA + (k × σ)
    /// 중간 밴드 = MA (이동평균)
    /// 하단 밴드 = MA - (k × σ)
    ///
    /// σ는 모집단 표준편차입니다.
    pub fn bollinger_bands(
        &self,
        prices: &[Decimal],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerBandsResult>> {
        let period = params.period;
        validate_window(prices.len(), period)?;

        let period_decimal = Decimal::from(period);
        let mut result = vec![BollingerBandsResult::default(); period - 1];
        result.reserve(prices.len() + 1 - period);

        for window in prices.windows(period) {
            let ma = window.iter().sum::<Decimal>() / period_decimal;

            let variance = window
                .iter()
                .map(|&p| {
                    let diff = p - ma;
                    diff * diff
                })
                .sum::<Decimal>()
                / period_decimal;

            let deviation = params.std_dev_multiplier * sqrt_decimal(variance);

            result.push(BollingerBandsResult {
                upper: Some(ma + deviation),
                middle: Some(ma),
                lower: Some(ma - deviation),
            });
        }

        Ok(result)
    }
}

/// Decimal 제곱근 계산 (Newton-Raphson 방법).
///
/// 값이 수렴할 때까지 반복합니다. 0 이하는 0입니다.
pub fn sqrt_decimal(value: Decimal) -> Decimal {
    if value <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let two = dec!(2);
    let mut x = if value > Decimal::ONE { value / two } else { Decimal::ONE };

    for _ in 0..SQRT_MAX_ITERATIONS {
        let next = (x + value / x) / two;
        if next == x {
            break;
        }
        x = next;
    }

    x
}
