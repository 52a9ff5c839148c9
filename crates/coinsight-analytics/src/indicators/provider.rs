//! 지표 제공자.
//!
//! 점수 계산기가 사용하는 지표 묶음(RSI-14, SMA-20, SMA-50, EMA-12, MACD, 볼린저)을
//! 한 번에 계산하여 시점별 스냅샷으로 제공합니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    BollingerBandsParams, EmaParams, IndicatorEngine, IndicatorError, IndicatorResult,
    MacdParams, RsiParams, SmaParams,
};

/// 특정 시점의 지표 값.
///
/// 윈도우가 부족한 지표는 `None`입니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    /// RSI-14 (0~100)
    pub rsi: Option<Decimal>,
    /// SMA-20
    pub sma_20: Option<Decimal>,
    /// SMA-50
    pub sma_50: Option<Decimal>,
    /// EMA-12
    pub ema_12: Option<Decimal>,
    /// MACD 라인
    pub macd: Option<Decimal>,
    /// MACD 시그널 라인
    pub macd_signal: Option<Decimal>,
    /// 볼린저 상단 밴드
    pub bollinger_high: Option<Decimal>,
    /// 볼린저 하단 밴드
    pub bollinger_low: Option<Decimal>,
}

/// 입력 가격과 같은 인덱스로 정렬된 지표 시계열.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSeries {
    snapshots: Vec<IndicatorSnapshot>,
}

impl IndicatorSeries {
    /// 시점별 스냅샷으로 생성합니다.
    pub fn new(snapshots: Vec<IndicatorSnapshot>) -> Self {
        Self { snapshots }
    }

    /// 시점 수.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// `index` 시점의 스냅샷.
    pub fn snapshot_at(&self, index: usize) -> Option<&IndicatorSnapshot> {
        self.snapshots.get(index)
    }

    /// 가장 최근 스냅샷.
    pub fn latest(&self) -> Option<&IndicatorSnapshot> {
        self.snapshots.last()
    }

    /// 최근 스냅샷 직전 시점.
    pub fn previous(&self) -> Option<&IndicatorSnapshot> {
        self.len()
            .checked_sub(2)
            .and_then(|index| self.snapshot_at(index))
    }

    /// 모든 스냅샷.
    pub fn snapshots(&self) -> &[IndicatorSnapshot] {
        &self.snapshots
    }
}

/// 가격 열에서 지표 시계열을 계산하는 제공자.
///
/// 점수 계산기는 이 트레이트에만 의존하므로 테스트에서 고정 값을 주입할 수 있습니다.
pub trait IndicatorProvider: Send + Sync {
    /// 전체 가격 열에 대한 지표를 계산합니다.
    fn compute(&self, prices: &[Decimal]) -> IndicatorResult<IndicatorSeries>;
}

/// 표준 지표 제공자.
///
/// RSI-14, SMA-20, SMA-50, EMA-12, MACD(12, 26, 9), 볼린저(20, 2σ)를 계산합니다.
#[derive(Debug, Default)]
pub struct StandardIndicatorProvider {
    engine: IndicatorEngine,
}

impl StandardIndicatorProvider {
    /// 새 제공자를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }
}

impl IndicatorProvider for StandardIndicatorProvider {
    fn compute(&self, prices: &[Decimal]) -> IndicatorResult<IndicatorSeries> {
        if let Some(pos) = prices.iter().position(|p| *p <= Decimal::ZERO) {
            return Err(IndicatorError::CalculationError(format!(
                "가격은 0보다 커야 합니다: index {} = {}",
                pos, prices[pos]
            )));
        }

        let len = prices.len();
        let engine = &self.engine;

        let rsi = undefined_if_short(engine.rsi(prices, RsiParams::default()), len)?;
        let sma_20 = undefined_if_short(engine.sma(prices, SmaParams { period: 20 }), len)?;
        let sma_50 = undefined_if_short(engine.sma(prices, SmaParams { period: 50 }), len)?;
        let ema_12 = undefined_if_short(engine.ema(prices, EmaParams { period: 12 }), len)?;
        let macd = undefined_if_short(engine.macd(prices, MacdParams::default()), len)?;
        let bollinger = undefined_if_short(
            engine.bollinger_bands(prices, BollingerBandsParams::default()),
            len,
        )?;

        let snapshots = (0..len)
            .map(|i| IndicatorSnapshot {
                rsi: rsi[i],
                sma_20: sma_20[i],
                sma_50: sma_50[i],
                ema_12: ema_12[i],
                macd: macd[i].macd,
                macd_signal: macd[i].signal,
                bollinger_high: bollinger[i].upper,
                bollinger_low: bollinger[i].lower,
            })
            .collect();

        Ok(IndicatorSeries::new(snapshots))
    }
}

/// 윈도우보다 짧은 시계열은 에러 대신 전부 미정의(기본값) 열로 바꿉니다.
fn undefined_if_short<T: Clone + Default>(
    result: IndicatorResult<Vec<T>>,
    len: usize,
) -> IndicatorResult<Vec<T>> {
    match result {
        Ok(values) => Ok(values),
        Err(IndicatorError::InsufficientData { .. }) => Ok(vec![T::default(); len]),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rising_prices(count: usize) -> Vec<Decimal> {
        (0..count).map(|i| Decimal::from(100 + i as i64)).collect()
    }

    #[test]
    fn test_columns_align_with_input() {
        let provider = StandardIndicatorProvider::new();
        let series = provider.compute(&rising_prices(60)).unwrap();

        assert_eq!(series.len(), 60);

        let latest = series.latest().unwrap();
        assert!(latest.rsi.is_some());
        assert!(latest.sma_20.is_some());
        assert!(latest.sma_50.is_some());
        assert!(latest.ema_12.is_some());
        assert!(latest.macd.is_some());
        assert!(latest.macd_signal.is_some());
        assert!(latest.bollinger_high.is_some());
        assert!(latest.bollinger_low.is_some());

        // SMA-50은 50번째 시점부터 정의
        assert!(series.snapshot_at(48).unwrap().sma_50.is_none());
        assert!(series.snapshot_at(49).unwrap().sma_50.is_some());
    }

    #[test]
    fn test_short_series_leaves_long_windows_undefined() {
        let provider = StandardIndicatorProvider::new();
        let series = provider.compute(&rising_prices(25)).unwrap();

        let latest = series.latest().unwrap();
        assert!(latest.sma_20.is_some());
        assert!(latest.rsi.is_some());
        assert!(latest.sma_50.is_none());
        assert!(latest.macd.is_none());
        assert!(latest.macd_signal.is_none());
    }

    #[test]
    fn test_macd_columns_follow_their_own_windows() {
        let provider = StandardIndicatorProvider::new();

        // 라인만 정의되는 길이
        let series = provider.compute(&rising_prices(30)).unwrap();
        let latest = series.latest().unwrap();
        assert!(latest.macd.is_some());
        assert!(latest.macd_signal.is_none());

        // 시그널이 처음 정의되는 길이 (26 + 9 - 1)
        let series = provider.compute(&rising_prices(34)).unwrap();
        let latest = series.latest().unwrap();
        assert!(latest.macd.is_some());
        assert!(latest.macd_signal.is_some());
        assert!(series.snapshot_at(32).unwrap().macd_signal.is_none());

        let defined = series
            .snapshots()
            .iter()
            .filter(|s| s.macd.is_some())
            .count();
        assert_eq!(defined, 34 - 25);
    }

    #[test]
    fn test_empty_prices_produce_empty_series() {
        let provider = StandardIndicatorProvider::new();
        let series = provider.compute(&[]).unwrap();

        assert!(series.is_empty());
        assert!(series.snapshots().is_empty());
        assert!(series.latest().is_none());
        assert!(series.previous().is_none());
    }

    #[test]
    fn test_non_positive_price_is_rejected() {
        let provider = StandardIndicatorProvider::new();
        let mut prices = rising_prices(30);
        prices[10] = dec!(0);

        let result = provider.compute(&prices);
        assert!(matches!(result, Err(IndicatorError::CalculationError(_))));
    }

    #[test]
    fn test_previous_is_one_step_back() {
        let series = IndicatorSeries::new(vec![
            IndicatorSnapshot {
                rsi: Some(dec!(10)),
                ..Default::default()
            },
            IndicatorSnapshot {
                rsi: Some(dec!(20)),
                ..Default::default()
            },
            IndicatorSnapshot {
                rsi: Some(dec!(30)),
                ..Default::default()
            },
        ]);

        assert_eq!(series.previous().unwrap().rsi, Some(dec!(20)));
        assert_eq!(series.latest().unwrap().rsi, Some(dec!(30)));
    }
}
