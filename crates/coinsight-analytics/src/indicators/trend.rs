//! 추세 지표 (Trend Indicators).
//!
//! 이동평균 기반의 추세 지표들을 제공합니다.
//! - SMA (Simple Moving Average)
//! - EMA (Exponential Moving Average)
//! - MACD (Moving Average Convergence Divergence)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// SMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        Self { period: 20 }
    }
}

/// EMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for EmaParams {
    fn default() -> Self {
        Self { period: 12 }
    }
}

/// MACD 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdParams {
    /// 단기 EMA 기간 (기본: 12).
    pub fast_period: usize,
    /// 장기 EMA 기간 (기본: 26).
    pub slow_period: usize,
    /// 시그널 라인 기간 (기본: 9).
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// MACD 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacdResult {
    /// MACD 라인 (단기 EMA - 장기 EMA).
    pub macd: Option<Decimal>,
    /// 시그널 라인 (MACD의 EMA).
    pub signal: Option<Decimal>,
    /// 히스토그램 (MACD - 시그널).
    pub histogram: Option<Decimal>,
}

/// 추세 지표 계산기.
#[derive(Debug, Default)]
pub struct TrendIndicators;

impl TrendIndicators {
    /// 새로운 추세 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// SMA = (P1 + P2 + ... + Pn) / n
    ///
    /// # 반환
    /// 각 시점의 SMA 값 (처음 period-1개는 None)
    pub fn sma(
        &self,
        prices: &[Decimal],
        params: SmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;
        validate_window(prices.len(), period)?;

        let period_decimal = Decimal::from(period);
        let mut result = vec![None; period - 1];
        result.reserve(prices.len() + 1 - period);

        // 구간 합을 이동시키며 계산
        let mut window_sum: Decimal = prices[..period].iter().sum();
        result.push(Some(window_sum / period_decimal));

        for i in period..prices.len() {
            window_sum += prices[i] - prices[i - period];
            result.push(Some(window_sum / period_decimal));
        }

        Ok(result)
    }

    /// 지수 이동평균 (EMA) 계산.
    ///
    /// EMA = (현재가 × k) + (이전 EMA × (1 - k)), k = 2 / (period + 1)
    ///
    /// 첫 값은 처음 period개의 SMA로 시작합니다.
    pub fn ema(
        &self,
        prices: &[Decimal],
        params: EmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;
        validate_window(prices.len(), period)?;

        let multiplier = dec!(2) / Decimal::from(period + 1);
        let mut result = vec![None; period - 1];
        result.reserve(prices.len() + 1 - period);

        let initial_sma: Decimal = prices[..period].iter().sum::<Decimal>() / Decimal::from(period);
        result.push(Some(initial_sma));

        let mut prev_ema = initial_sma;
        for price in prices.iter().skip(period) {
            let ema = (*price * multiplier) + (prev_ema * (Decimal::ONE - multiplier));
            result.push(Some(ema));
            prev_ema = ema;
        }

        Ok(result)
    }

    /// MACD 계산.
    ///
    /// MACD 라인 = 단기 EMA - 장기 EMA
    /// 시그널 라인 = MACD 라인의 EMA
    /// 히스토그램 = MACD 라인 - 시그널 라인
    ///
    /// 라인은 `slow_period`개부터, 시그널은 `slow_period + signal_period - 1`개부터 정의됩니다.
    /// 라인만 계산 가능한 길이에서는 시그널과 히스토그램이 `None`입니다.
    pub fn macd(&self, prices: &[Decimal], params: MacdParams) -> IndicatorResult<Vec<MacdResult>> {
        if params.fast_period >= params.slow_period {
            return Err(IndicatorError::InvalidParameter(format!(
                "단기 기간({})은 장기 기간({})보다 짧아야 합니다",
                params.fast_period, params.slow_period
            )));
        }

        validate_window(prices.len(), params.slow_period)?;

        let fast_ema = self.ema(prices, EmaParams { period: params.fast_period })?;
        let slow_ema = self.ema(prices, EmaParams { period: params.slow_period })?;

        let macd_line: Vec<Option<Decimal>> = fast_ema
            .iter()
            .zip(slow_ema.iter())
            .map(|pair| match pair {
                (Some(fast), Some(slow)) => Some(*fast - *slow),
                _ => None,
            })
            .collect();

        // 시그널 라인 (정의된 MACD 값들의 EMA)
        let macd_values: Vec<Decimal> = macd_line.iter().flatten().copied().collect();
        let signal_ema = match self.ema(&macd_values, EmaParams { period: params.signal_period }) {
            Ok(values) => values,
            Err(IndicatorError::InsufficientData { .. }) => vec![None; macd_values.len()],
            Err(e) => return Err(e),
        };

        let mut result = Vec::with_capacity(prices.len());
        let mut signal_idx = 0;

        for macd_val in macd_line {
            match macd_val {
                Some(m) => {
                    let signal = signal_ema.get(signal_idx).copied().flatten();
                    result.push(MacdResult {
                        macd: Some(m),
                        signal,
                        histogram: signal.map(|s| m - s),
                    });
                    signal_idx += 1;
                }
                None => result.push(MacdResult::default()),
            }
        }

        Ok(result)
    }
}

/// 두 시점의 (단기, 장기) 값으로 골든 크로스 여부를 판정합니다.
///
/// 어느 한 값이라도 정의되지 않으면 `false`.
pub fn is_golden_cross(
    previous: (Option<Decimal>, Option<Decimal>),
    current: (Option<Decimal>, Option<Decimal>),
) -> bool {
    match (previous, current) {
        ((Some(prev_short), Some(prev_long)), (Some(curr_short), Some(curr_long))) => {
            prev_short < prev_long && curr_short > curr_long
        }
        _ => false,
    }
}

/// 윈도우 길이와 데이터 길이를 검증합니다.
pub(crate) fn validate_window(len: usize, period: usize) -> IndicatorResult<()> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter(
            "기간은 0보다 커야 합니다".to_string(),
        ));
    }

    if len < period {
        return Err(IndicatorError::InsufficientData {
            required: period,
            provided: len,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_prices() -> Vec<Decimal> {
        vec![
            dec!(100.0),
            dec!(102.0),
            dec!(101.0),
            dec!(103.0),
            dec!(105.0),
            dec!(104.0),
            dec!(106.0),
            dec!(108.0),
            dec!(107.0),
            dec!(109.0),
        ]
    }

    #[test]
    fn test_sma_basic() {
        let trend = TrendIndicators::new();
        let prices = sample_prices();

        let sma = trend.sma(&prices, SmaParams { period: 3 }).unwrap();

        assert_eq!(sma.len(), prices.len());
        assert!(sma[0].is_none());
        assert!(sma[1].is_none());

        // (100 + 102 + 101) / 3 = 101
        assert_eq!(sma[2], Some(dec!(101)));
        // (107 + 108 + 109) / 3 = 108
        assert_eq!(sma[9], Some(dec!(108)));
    }

    #[test]
    fn test_sma_insufficient_and_zero_period() {
        let trend = TrendIndicators::new();

        let short = trend.sma(&[dec!(1), dec!(2)], SmaParams { period: 20 });
        assert!(matches!(
            short,
            Err(IndicatorError::InsufficientData { required: 20, provided: 2 })
        ));

        let zero = trend.sma(&sample_prices(), SmaParams { period: 0 });
        assert!(matches!(zero, Err(IndicatorError::InvalidParameter(_))));
    }

    #[test]
    fn test_ema_seeded_with_sma() {
        let trend = TrendIndicators::new();
        let prices = sample_prices();

        let ema = trend.ema(&prices, EmaParams { period: 3 }).unwrap();

        assert!(ema[1].is_none());
        assert_eq!(ema[2], Some(dec!(101)));
        // k = 0.5: 103 × 0.5 + 101 × 0.5 = 102
        assert_eq!(ema[3], Some(dec!(102)));
    }

    #[test]
    fn test_macd_basic() {
        let trend = TrendIndicators::new();
        let prices: Vec<Decimal> = (0..50).map(|i| Decimal::from(100 + i)).collect();

        let macd = trend.macd(&prices, MacdParams::default()).unwrap();

        assert_eq!(macd.len(), prices.len());
        assert!(macd[24].macd.is_none());
        assert!(macd[25].macd.is_some());
        assert!(macd[32].signal.is_none());
        assert!(macd[33].signal.is_some());

        // 꾸준한 상승 추세에서는 MACD가 양수
        assert!(macd[49].macd.unwrap() > Decimal::ZERO);
    }

    #[test]
    fn test_macd_line_before_signal_window() {
        let trend = TrendIndicators::new();
        let prices: Vec<Decimal> = (0..30).map(|i| Decimal::from(100 + i)).collect();

        let macd = trend.macd(&prices, MacdParams::default()).unwrap();

        assert_eq!(macd.len(), 30);
        assert!(macd[25].macd.is_some());
        assert!(macd[29].macd.is_some());
        assert!(macd.iter().all(|m| m.signal.is_none() && m.histogram.is_none()));
    }

    #[test]
    fn test_macd_signal_defined_at_slow_plus_signal_minus_one() {
        let trend = TrendIndicators::new();
        let prices: Vec<Decimal> = (0..34).map(|i| Decimal::from(100 + i)).collect();

        let macd = trend.macd(&prices, MacdParams::default()).unwrap();

        assert!(macd[32].signal.is_none());
        assert!(macd[33].signal.is_some());
        assert!(macd[33].histogram.is_some());
    }

    #[test]
    fn test_macd_requires_slow_window() {
        let trend = TrendIndicators::new();
        let prices: Vec<Decimal> = (0..25).map(Decimal::from).collect();

        let result = trend.macd(&prices, MacdParams::default());
        assert!(matches!(
            result,
            Err(IndicatorError::InsufficientData { required: 26, provided: 25 })
        ));
    }

    #[test]
    fn test_golden_cross_detection() {
        assert!(is_golden_cross(
            (Some(dec!(98)), Some(dec!(100))),
            (Some(dec!(101)), Some(dec!(100)))
        ));
        // 이미 위에 있던 경우
        assert!(!is_golden_cross(
            (Some(dec!(101)), Some(dec!(100))),
            (Some(dec!(103)), Some(dec!(100)))
        ));
    }

    #[test]
    fn test_golden_cross_requires_strict_relation() {
        // 동일 값에서 출발하면 크로스로 보지 않음
        assert!(!is_golden_cross(
            (Some(dec!(100)), Some(dec!(100))),
            (Some(dec!(101)), Some(dec!(100)))
        ));
        assert!(!is_golden_cross(
            (None, Some(dec!(100))),
            (Some(dec!(101)), Some(dec!(100)))
        ));
    }
}
