//! 코인 신호 분석 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 비트코인 30일 분석 (USD)
//! coinsight analyze --coin bitcoin
//!
//! # 이더리움 90일 분석 (EUR), 결과를 JSON으로 출력
//! COINSIGHT_PASSWORD=... coinsight analyze -c ethereum --currency eur -d 90 --json -u admin
//!
//! # 배포용 비밀번호 해시 생성
//! coinsight hash-password 'my-secret-password'
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use coinsight_cli::commands::analyze::{run_analyze, AnalyzeOptions, SUPPORTED_CURRENCIES};
use coinsight_cli::commands::hash_password::run_hash_password;
use coinsight_core::{init_logging, AppConfig, LogConfig};
use tracing::error;

#[derive(Parser)]
#[command(name = "coinsight")]
#[command(about = "Crypto signal analyzer - technical indicators combined with market sentiment", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로 (기본: config/default.toml, 없으면 무시)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 디버그 로그와 span 이벤트 출력
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 코인 분석 (로그인 필요)
    Analyze {
        /// CoinGecko 코인 ID (예: bitcoin, ethereum, solana)
        #[arg(short, long, default_value = "bitcoin")]
        coin: String,

        /// 호가 통화
        #[arg(long, default_value = "usd", value_parser = SUPPORTED_CURRENCIES)]
        currency: String,

        /// 조회 기간 (일)
        #[arg(short, long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(7..=365))]
        days: u32,

        /// 보고서를 JSON으로 출력
        #[arg(long)]
        json: bool,

        /// 로그인 사용자 이름 (생략 시 입력 요청)
        #[arg(short, long)]
        username: Option<String>,
    },

    /// APP_PASSWORD_HASH용 Argon2 해시 생성
    HashPassword {
        /// 해싱할 비밀번호
        password: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "명령 실패");
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;

    let mut log_config = LogConfig::from_settings(&config.logging);
    if cli.verbose {
        log_config = LogConfig::new("debug")
            .with_format(log_config.format)
            .with_span_events(true);
    }
    init_logging(log_config).map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    match cli.command {
        Commands::Analyze {
            coin,
            currency,
            days,
            json,
            username,
        } => {
            let options = AnalyzeOptions {
                coin,
                currency,
                days,
                json,
                username,
            };
            run_analyze(&config, options).await
        }

        Commands::HashPassword { password } => {
            run_hash_password(&password)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
