//! 분석 파이프라인.
//!
//! 한 번의 분석 요청을 순서대로 처리합니다:
//!
//! 1. 가격 이력 조회 (실패 시 `DataUnavailable`, 부분 결과 없음)
//! 2. 코인 정보 조회 (실패 시 `None`, 표시 전용)
//! 3. 기술적 점수 계산
//! 4. 공포/탐욕 지수 조회 (실패 시 지수 없음)
//! 5. 심리 점수 계산 및 최종 신호 결합
//!
//! 각 분석은 독립적이며 이전 실행의 상태를 공유하지 않습니다.

use std::fmt;

use chrono::{DateTime, Utc};
use coinsight_core::{
    analysis_span, CoinInfo, CoinsightError, CoinsightResult, FinalSignal, PriceSeries,
    ScoringConfig, SentimentResult, TechnicalResult,
};
use coinsight_data::{DataError, MarketDataProvider, SentimentProvider};
use serde::Serialize;
use tracing::{info, warn, Instrument};

use crate::combiner::SignalCombiner;
use crate::indicators::{IndicatorProvider, StandardIndicatorProvider};
use crate::sentiment::SentimentScorer;
use crate::technical::TechnicalScorer;

/// 기본 호가 통화.
pub const DEFAULT_VS_CURRENCY: &str = "usd";

/// 기본 조회 기간 (일).
pub const DEFAULT_DAYS: u32 = 30;

/// 분석 요청.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisRequest {
    /// CoinGecko 코인 ID
    pub coin_id: String,
    /// 호가 통화
    pub vs_currency: String,
    /// 조회 기간 (일)
    pub days: u32,
}

impl AnalysisRequest {
    /// 요청을 생성합니다. 코인 ID와 통화는 공백 제거 후 소문자로 정규화됩니다.
    pub fn new(coin_id: impl AsRef<str>, vs_currency: impl AsRef<str>, days: u32) -> Self {
        Self {
            coin_id: coin_id.as_ref().trim().to_lowercase(),
            vs_currency: vs_currency.as_ref().trim().to_lowercase(),
            days,
        }
    }

    /// 기본 통화와 기간으로 요청을 생성합니다.
    pub fn for_coin(coin_id: impl AsRef<str>) -> Self {
        Self::new(coin_id, DEFAULT_VS_CURRENCY, DEFAULT_DAYS)
    }

    fn validate(&self) -> CoinsightResult<()> {
        if self.coin_id.is_empty() {
            return Err(CoinsightError::InvalidInput("coin id is empty".to_string()));
        }
        if self.vs_currency.is_empty() {
            return Err(CoinsightError::InvalidInput("currency is empty".to_string()));
        }
        if self.days == 0 {
            return Err(CoinsightError::InvalidInput(
                "days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// 분석 결과 전체.
///
/// 외부 차트 렌더러에 JSON으로 넘길 수 있습니다.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// 원래 요청
    pub request: AnalysisRequest,
    /// 코인 정보 (조회 실패 시 없음)
    pub coin: Option<CoinInfo>,
    /// 가격 시계열
    pub series: PriceSeries,
    /// 기술적 분석 결과
    pub technical: TechnicalResult,
    /// 심리 분석 결과
    pub sentiment: SentimentResult,
    /// 최종 신호
    pub signal: FinalSignal,
    /// 생성 시각
    pub generated_at: DateTime<Utc>,
}

/// 파이프라인 진행 단계.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    /// 가격 이력 조회 완료
    PricesFetched,
    /// 기술적 분석 완료
    TechnicalScored,
    /// 심리 분석 완료
    SentimentScored,
    /// 최종 신호 결합 완료
    Completed,
}

impl AnalysisStage {
    /// 진행률 (%).
    pub fn percent(self) -> u8 {
        match self {
            AnalysisStage::PricesFetched => 30,
            AnalysisStage::TechnicalScored => 60,
            AnalysisStage::SentimentScored => 90,
            AnalysisStage::Completed => 100,
        }
    }
}

impl fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            AnalysisStage::PricesFetched => "Price history fetched",
            AnalysisStage::TechnicalScored => "Technical indicators scored",
            AnalysisStage::SentimentScored => "Market sentiment scored",
            AnalysisStage::Completed => "Analysis complete",
        };
        write!(f, "{}", message)
    }
}

/// 진행 상황 수신자.
pub trait ProgressObserver: Send + Sync {
    /// 단계가 끝날 때마다 호출됩니다.
    fn on_stage(&self, stage: AnalysisStage);
}

impl<F> ProgressObserver for F
where
    F: Fn(AnalysisStage) + Send + Sync,
{
    fn on_stage(&self, stage: AnalysisStage) {
        self(stage)
    }
}

/// 진행 상황을 무시하는 수신자.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_stage(&self, _stage: AnalysisStage) {}
}

/// 조회 → 점수 계산 → 결합을 수행하는 분석 파이프라인.
pub struct AnalysisPipeline<M, S, P = StandardIndicatorProvider> {
    market: M,
    sentiment: S,
    technical_scorer: TechnicalScorer<P>,
    sentiment_scorer: SentimentScorer,
    combiner: SignalCombiner,
}

impl<M, S> AnalysisPipeline<M, S, StandardIndicatorProvider>
where
    M: MarketDataProvider,
    S: SentimentProvider,
{
    /// 표준 지표 제공자로 파이프라인을 생성합니다.
    pub fn new(market: M, sentiment: S, scoring: &ScoringConfig) -> Self {
        Self::with_indicator_provider(market, sentiment, StandardIndicatorProvider::new(), scoring)
    }
}

impl<M, S, P> AnalysisPipeline<M, S, P>
where
    M: MarketDataProvider,
    S: SentimentProvider,
    P: IndicatorProvider,
{
    /// 지표 제공자를 지정해 파이프라인을 생성합니다.
    pub fn with_indicator_provider(
        market: M,
        sentiment: S,
        indicators: P,
        scoring: &ScoringConfig,
    ) -> Self {
        Self {
            market,
            sentiment,
            technical_scorer: TechnicalScorer::with_provider(indicators),
            sentiment_scorer: SentimentScorer::new(scoring.clone()),
            combiner: SignalCombiner::new(scoring.clone()),
        }
    }

    /// 분석을 실행합니다.
    pub async fn run(&self, request: &AnalysisRequest) -> CoinsightResult<AnalysisReport> {
        self.run_with_progress(request, &NoProgress).await
    }

    /// 단계별 진행 상황을 알리며 분석을 실행합니다.
    ///
    /// # 에러
    ///
    /// - 요청이 잘못되면 `InvalidInput`
    /// - 가격 이력을 가져오지 못하면 `DataUnavailable`
    pub async fn run_with_progress<O>(
        &self,
        request: &AnalysisRequest,
        observer: &O,
    ) -> CoinsightResult<AnalysisReport>
    where
        O: ProgressObserver + ?Sized,
    {
        request.validate()?;

        let span = analysis_span!("analysis", request.coin_id, request.vs_currency);
        self.execute(request, observer).instrument(span).await
    }

    async fn execute<O>(
        &self,
        request: &AnalysisRequest,
        observer: &O,
    ) -> CoinsightResult<AnalysisReport>
    where
        O: ProgressObserver + ?Sized,
    {
        let series = self
            .market
            .fetch_market_chart(&request.coin_id, &request.vs_currency, request.days)
            .await
            .map_err(|e| match e {
                DataError::InvalidInput(message) => CoinsightError::InvalidInput(message),
                other => CoinsightError::data_unavailable(&request.coin_id, other),
            })?;
        observer.on_stage(AnalysisStage::PricesFetched);

        let coin = match self
            .market
            .fetch_coin_info(&request.coin_id, &request.vs_currency)
            .await
        {
            Ok(info) => Some(info),
            Err(e) => {
                warn!(error = %e, "코인 정보 조회 실패, 표시 정보 없이 진행");
                None
            }
        };

        let technical = self.technical_scorer.analyze(&series);
        observer.on_stage(AnalysisStage::TechnicalScored);

        let fear_greed = self.sentiment.fetch_fear_greed().await;
        let sentiment = self.sentiment_scorer.score(fear_greed);
        observer.on_stage(AnalysisStage::SentimentScored);

        let signal = self.combiner.combine(&technical, &sentiment);
        observer.on_stage(AnalysisStage::Completed);

        info!(
            points = series.len(),
            technical = %technical.signal,
            confidence = technical.confidence,
            sentiment = sentiment.score,
            signal = %signal.label,
            blended = %signal.blended_score,
            "분석 완료"
        );

        Ok(AnalysisReport {
            request: request.clone(),
            coin,
            series,
            technical,
            sentiment,
            signal,
            generated_at: Utc::now(),
        })
    }
}
