//! 기술적 분석 결과 타입.
//!
//! - `TechnicalSignal` - 기술적 신호 등급
//! - `SignalReason` - 점수에 기여한 규칙
//! - `RawIndicators` - 화면 표시용 지표 값
//! - `TechnicalResult` - 한 번의 분석 결과

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::DecimalExt;

/// 결과에 보관하는 최대 근거 수.
pub const MAX_REASONS: usize = 3;

/// 기술적 신호 등급.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechnicalSignal {
    /// 강한 매수
    StrongBuy,
    /// 매수
    Buy,
    /// 중립
    Neutral,
    /// 매도
    Sell,
    /// 강한 매도
    StrongSell,
    /// 이력이 부족해 판단 불가
    InsufficientData,
}

impl TechnicalSignal {
    /// 매수 계열 신호인지 확인합니다.
    pub fn is_bullish(&self) -> bool {
        matches!(self, TechnicalSignal::Buy | TechnicalSignal::StrongBuy)
    }

    /// 매도 계열 신호인지 확인합니다.
    pub fn is_bearish(&self) -> bool {
        matches!(self, TechnicalSignal::Sell | TechnicalSignal::StrongSell)
    }
}

impl std::fmt::Display for TechnicalSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TechnicalSignal::StrongBuy => write!(f, "Strong Buy"),
            TechnicalSignal::Buy => write!(f, "Buy"),
            TechnicalSignal::Neutral => write!(f, "Neutral"),
            TechnicalSignal::Sell => write!(f, "Sell"),
            TechnicalSignal::StrongSell => write!(f, "Strong Sell"),
            TechnicalSignal::InsufficientData => write!(f, "Insufficient Data"),
        }
    }
}

/// 점수에 기여한 규칙.
///
/// 선언 순서가 규칙 평가 순서와 같습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalReason {
    /// RSI 과매도
    Oversold,
    /// RSI 과매수
    Overbought,
    /// 가격이 20기간 평균 위
    AboveSma20,
    /// 가격이 20기간 평균 아래
    BelowSma20,
    /// 골든 크로스 (SMA-20이 SMA-50 상향 돌파)
    GoldenCross,
    /// MACD가 시그널 위
    PositiveMacd,
    /// 가격이 볼린저 하단 밴드 아래
    LowerBollingerBand,
}

impl std::fmt::Display for SignalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            SignalReason::Oversold => "RSI in oversold zone",
            SignalReason::Overbought => "RSI in overbought zone",
            SignalReason::AboveSma20 => "price above 20-period average",
            SignalReason::BelowSma20 => "price below 20-period average",
            SignalReason::GoldenCross => "bullish crossover (golden cross)",
            SignalReason::PositiveMacd => "positive MACD",
            SignalReason::LowerBollingerBand => "price at lower Bollinger band",
        };
        f.write_str(text)
    }
}

/// RSI 구간.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiZone {
    /// RSI < 30
    Oversold,
    /// RSI > 70
    Overbought,
    /// 그 외
    Normal,
}

impl RsiZone {
    /// RSI 값으로 구간을 판정합니다.
    pub fn from_rsi(rsi: Decimal) -> Self {
        if rsi < dec!(30) {
            RsiZone::Oversold
        } else if rsi > dec!(70) {
            RsiZone::Overbought
        } else {
            RsiZone::Normal
        }
    }
}

impl std::fmt::Display for RsiZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RsiZone::Oversold => write!(f, "oversold"),
            RsiZone::Overbought => write!(f, "overbought"),
            RsiZone::Normal => write!(f, "normal"),
        }
    }
}

/// 화면 표시용 지표 값 (최신 시점).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawIndicators {
    /// 최신 가격 (소수점 4자리)
    pub price: Option<Decimal>,
    /// RSI (소수점 2자리)
    pub rsi: Option<Decimal>,
    /// SMA-20 (소수점 4자리)
    pub sma_20: Option<Decimal>,
    /// MACD 라인 (소수점 4자리)
    pub macd: Option<Decimal>,
}

impl RawIndicators {
    /// 표시 자릿수로 반올림하여 생성합니다.
    pub fn rounded(
        price: Option<Decimal>,
        rsi: Option<Decimal>,
        sma_20: Option<Decimal>,
        macd: Option<Decimal>,
    ) -> Self {
        Self {
            price: price.map(|v| v.round_half_up(4)),
            rsi: rsi.map(|v| v.round_half_up(2)),
            sma_20: sma_20.map(|v| v.round_half_up(4)),
            macd: macd.map(|v| v.round_half_up(4)),
        }
    }

    /// RSI 구간.
    pub fn rsi_zone(&self) -> Option<RsiZone> {
        self.rsi.map(RsiZone::from_rsi)
    }
}

/// 기술적 분석 결과.
///
/// 분석마다 새로 만들어지며 이후 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalResult {
    /// 신호 등급
    pub signal: TechnicalSignal,
    /// 신뢰도 (0~100, 정상 결과는 5~95)
    pub confidence: u8,
    /// 규칙 누적 점수
    pub score: i32,
    /// 평가 순서대로 정렬된 근거 (최대 3개)
    pub reasons: Vec<SignalReason>,
    /// 표시용 지표 값
    pub raw: RawIndicators,
}

impl TechnicalResult {
    /// 데이터 부족 결과.
    pub fn insufficient_data() -> Self {
        Self {
            signal: TechnicalSignal::InsufficientData,
            confidence: 0,
            score: 0,
            reasons: Vec::new(),
            raw: RawIndicators::default(),
        }
    }

    /// 판단 불가 결과인지 확인합니다.
    pub fn is_insufficient(&self) -> bool {
        self.signal == TechnicalSignal::InsufficientData
    }
}
