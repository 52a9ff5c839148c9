//! `analyze` 명령.
//!
//! 로그인 → 데이터 조회 및 분석 → 보고서 출력 순서로 진행합니다.

use std::process::ExitCode;

use anyhow::{Context, Result};
use coinsight_analytics::{AnalysisPipeline, AnalysisRequest, AnalysisStage};
use coinsight_auth::{Authenticator, InMemorySessionStore};
use coinsight_core::AppConfig;
use coinsight_data::{CoinGeckoClient, FearGreedClient, RetryPolicy};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use super::login::login;
use crate::report::{render_failure, render_report};

/// 지원하는 호가 통화.
pub const SUPPORTED_CURRENCIES: [&str; 4] = ["usd", "eur", "gbp", "jpy"];

/// 분석 명령 옵션.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// CoinGecko 코인 ID
    pub coin: String,
    /// 호가 통화
    pub currency: String,
    /// 조회 기간 (일)
    pub days: u32,
    /// JSON 출력 여부
    pub json: bool,
    /// 로그인 사용자 이름
    pub username: Option<String>,
}

/// 분석 명령을 실행합니다.
///
/// 데이터를 가져오지 못하면 안내문을 출력하고 실패 종료 코드를 반환합니다.
pub async fn run_analyze(config: &AppConfig, options: AnalyzeOptions) -> Result<ExitCode> {
    let auth = Authenticator::from_config(&config.auth, InMemorySessionStore::new())
        .context("invalid authentication settings")?;

    if login(&auth, options.username.clone()).await?.is_none() {
        return Ok(ExitCode::FAILURE);
    }

    let market = CoinGeckoClient::new(&config.api, RetryPolicy::from(&config.retry))
        .context("failed to build CoinGecko client")?;
    let sentiment =
        FearGreedClient::new(&config.api).context("failed to build fear/greed client")?;

    if market.has_api_key() {
        eprintln!("Using personal CoinGecko API key.");
    } else {
        eprintln!("Using the public CoinGecko API (rate limited).");
    }

    let pipeline = AnalysisPipeline::new(market, sentiment, &config.scoring);
    let request = AnalysisRequest::new(&options.coin, &options.currency, options.days);

    info!(
        coin = %request.coin_id,
        currency = %request.vs_currency,
        days = request.days,
        "분석 시작"
    );

    let progress = progress_bar();
    progress.set_message("Fetching price history...");
    let observer = |stage: AnalysisStage| {
        progress.set_position(u64::from(stage.percent()));
        progress.set_message(stage.to_string());
    };

    let report = match pipeline.run_with_progress(&request, &observer).await {
        Ok(report) => {
            progress.finish_and_clear();
            report
        }
        Err(e) if e.is_data_unavailable() => {
            progress.abandon_with_message("Data unavailable");
            error!(error = %e, "분석 실패");
            eprint!("\n{}", render_failure(&e));
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => {
            progress.abandon();
            return Err(e).context("analysis failed");
        }
    };

    if options.json {
        let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        println!("{}", json);
    } else {
        print!("{}", render_report(&report));
    }

    Ok(ExitCode::SUCCESS)
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(100);
    // 템플릿은 고정 문자열이므로 실패하면 기본 스타일 사용
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}
