//! `Decimal` 기반 가격 지표.
//!
//! 점수 계산에 쓰는 지표는 SMA, EMA, MACD, RSI, 볼린저 밴드 다섯 가지입니다.
//! 각 계산기는 입력과 같은 길이의 벡터를 돌려주고, 윈도우가 차기 전 시점은 `None`입니다.
//!
//! ```ignore
//! use coinsight_analytics::indicators::{IndicatorEngine, RsiParams};
//!
//! let rsi = IndicatorEngine::new().rsi(&closes, RsiParams::default())?;
//! ```

pub mod momentum;
pub mod provider;
pub mod trend;
pub mod volatility;

use rust_decimal::Decimal;
use thiserror::Error;

pub use momentum::{MomentumCalculator, RsiParams};
pub use provider::{IndicatorProvider, IndicatorSeries, IndicatorSnapshot, StandardIndicatorProvider};
pub use trend::{is_golden_cross, EmaParams, MacdParams, MacdResult, SmaParams, TrendIndicators};
pub use volatility::{BollingerBandsParams, BollingerBandsResult, VolatilityIndicators};

/// 지표 계산 오류.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// 데이터 부족 오류
    #[error("데이터가 부족합니다: 필요 {required}개, 제공 {provided}개")]
    InsufficientData { required: usize, provided: usize },

    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),

    /// 계산 오류
    #[error("계산 오류: {0}")]
    CalculationError(String),
}

/// 지표 계산 결과 타입.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

/// 지표 계산기 묶음.
#[derive(Debug, Default)]
pub struct IndicatorEngine {
    trend: TrendIndicators,
    momentum: MomentumCalculator,
    volatility: VolatilityIndicators,
}

impl IndicatorEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// 단순 이동평균. 처음 `period - 1`개는 `None`.
    pub fn sma(&self, prices: &[Decimal], params: SmaParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.trend.sma(prices, params)
    }

    pub fn ema(&self, prices: &[Decimal], params: EmaParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.trend.ema(prices, params)
    }

    /// MACD 라인과 시그널, 히스토그램.
    pub fn macd(&self, prices: &[Decimal], params: MacdParams) -> IndicatorResult<Vec<MacdResult>> {
        self.trend.macd(prices, params)
    }

    /// Wilder RSI (0~100).
    pub fn rsi(&self, prices: &[Decimal], params: RsiParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.momentum.rsi(prices, params)
    }

    pub fn bollinger_bands(
        &self,
        prices: &[Decimal],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerBandsResult>> {
        self.volatility.bollinger_bands(prices, params)
    }
}
