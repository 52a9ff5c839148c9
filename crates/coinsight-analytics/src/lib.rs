//! 신호 분석 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 기술적 지표 (RSI, SMA, EMA, MACD, 볼린저 밴드)
//! - 기술적 점수 계산기
//! - 공포/탐욕 지수 기반 심리 점수 계산기
//! - 두 결과를 혼합하는 최종 신호 결합기
//! - 조회부터 결합까지 수행하는 분석 파이프라인
//!
//! # Re-exports
//!
//! - [`indicators`]: 지표 엔진과 지표 제공자
//! - [`technical`]: 규칙 기반 기술적 점수
//! - [`pipeline`]: 분석 파이프라인과 진행 상황 알림

pub mod combiner;
pub mod indicators;
pub mod pipeline;
pub mod sentiment;
pub mod technical;

// Indicators 모듈 re-exports
pub use indicators::{
    // 변동성 지표
    BollingerBandsParams,
    BollingerBandsResult,
    EmaParams,
    IndicatorEngine,
    IndicatorError,
    // 지표 제공자
    IndicatorProvider,
    IndicatorResult,
    IndicatorSeries,
    IndicatorSnapshot,
    MacdParams,
    MacdResult,
    MomentumCalculator,
    // 모멘텀 지표
    RsiParams,
    // 추세 지표
    SmaParams,
    StandardIndicatorProvider,
    TrendIndicators,
    VolatilityIndicators,
};

pub use combiner::SignalCombiner;
pub use pipeline::{
    AnalysisPipeline, AnalysisReport, AnalysisRequest, AnalysisStage, NoProgress,
    ProgressObserver, DEFAULT_DAYS, DEFAULT_VS_CURRENCY,
};
pub use sentiment::SentimentScorer;
pub use technical::{classify_score, evaluate_rules, ScoreBreakdown, TechnicalScorer};
