//! 설정 관리.
//!
//! 설정은 다음 순서로 겹쳐서 로드됩니다 (뒤에 오는 값이 우선):
//! 1. 각 섹션의 `Default` 구현
//! 2. TOML 파일 (`config/default.toml` 또는 지정 경로)
//! 3. `COINSIGHT__` 접두사 환경 변수 (예: `COINSIGHT__RETRY__MAX_ATTEMPTS=5`)
//! 4. 배포 호환용 환경 변수 `COINGECKO_API_KEY`, `APP_USERNAME`, `APP_PASSWORD_HASH`

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{CoinsightError, CoinsightResult};

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// CoinGecko 데모 키 자리표시자. 이 값은 키가 없는 것으로 취급합니다.
pub const PLACEHOLDER_API_KEY: &str = "CG-YOUR-DEMO-KEY";

// 심리 지수 휴리스틱 상수 (역발상: 극단적 공포 = 매수 기회)
pub const EXTREME_FEAR_MAX: u8 = 25;
pub const EXTREME_GREED_MIN: u8 = 75;
pub const EXTREME_FEAR_SCORE: u8 = 75;
pub const EXTREME_GREED_SCORE: u8 = 30;
pub const NEUTRAL_SENTIMENT_SCORE: u8 = 50;

// 최종 신호 결합 상수
pub const TECHNICAL_WEIGHT: Decimal = dec!(0.7);
pub const SENTIMENT_WEIGHT: Decimal = dec!(0.3);
pub const PRIORITY_BUY_SENTIMENT_MIN: u8 = 60;
pub const CAUTION_SELL_SENTIMENT_MAX: u8 = 40;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 외부 API 설정
    pub api: ApiConfig,
    /// 재시도 정책 설정
    pub retry: RetryConfig,
    /// 점수 산정 상수
    pub scoring: ScoringConfig,
    /// 로그인 설정
    pub auth: AuthConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// 외부 API 설정.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// CoinGecko REST 기본 URL
    pub coingecko_base_url: String,
    /// 공포/탐욕 지수 URL
    pub fear_greed_url: String,
    /// CoinGecko 데모 API 키
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            coingecko_base_url: "https://api.coingecko.com/api/v3".to_string(),
            fear_greed_url: "https://api.alternative.me/fng/".to_string(),
            api_key: None,
            request_timeout_secs: 20,
        }
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("coingecko_base_url", &self.coingecko_base_url)
            .field("fear_greed_url", &self.fear_greed_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl ApiConfig {
    /// 실제로 사용할 수 있는 API 키.
    ///
    /// 비어 있거나 자리표시자인 키는 `None`입니다.
    pub fn api_key_secret(&self) -> Option<SecretString> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
            .map(|key| SecretString::new(key.into()))
    }

    /// 개인 API 키가 설정되어 있는지 확인합니다.
    pub fn has_personal_key(&self) -> bool {
        self.api_key_secret().is_some()
    }

    /// 요청 타임아웃.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// 재시도 정책 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// 최대 시도 횟수 (첫 시도 포함)
    pub max_attempts: u32,
    /// 요청 한도 초과 시 선형 대기 단위 (초, 시도 번호 × 단위)
    pub rate_limit_step_secs: u64,
    /// 연결 실패 후 대기 (초)
    pub connection_retry_delay_secs: u64,
    /// 타임아웃 후 대기 (초)
    pub timeout_retry_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            rate_limit_step_secs: 10,
            connection_retry_delay_secs: 5,
            timeout_retry_delay_secs: 0,
        }
    }
}

/// 점수 산정 상수.
///
/// 근거가 명시되지 않은 휴리스틱 값들이므로 코드에 흩어두지 않고 한곳에 모읍니다.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// 이 값 이하이면 극단적 공포
    pub extreme_fear_max: u8,
    /// 이 값 이상이면 극단적 탐욕
    pub extreme_greed_min: u8,
    /// 극단적 공포의 심리 점수
    pub extreme_fear_score: u8,
    /// 극단적 탐욕의 심리 점수
    pub extreme_greed_score: u8,
    /// 중립(또는 지수 없음)의 심리 점수
    pub neutral_score: u8,
    /// 기술적 신뢰도 가중치
    pub technical_weight: Decimal,
    /// 심리 점수 가중치
    pub sentiment_weight: Decimal,
    /// 우선 매수에 필요한 심리 점수 하한 (초과)
    pub priority_buy_sentiment_min: u8,
    /// 주의 매도에 필요한 심리 점수 상한 (미만)
    pub caution_sell_sentiment_max: u8,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            extreme_fear_max: EXTREME_FEAR_MAX,
            extreme_greed_min: EXTREME_GREED_MIN,
            extreme_fear_score: EXTREME_FEAR_SCORE,
            extreme_greed_score: EXTREME_GREED_SCORE,
            neutral_score: NEUTRAL_SENTIMENT_SCORE,
            technical_weight: TECHNICAL_WEIGHT,
            sentiment_weight: SENTIMENT_WEIGHT,
            priority_buy_sentiment_min: PRIORITY_BUY_SENTIMENT_MIN,
            caution_sell_sentiment_max: CAUTION_SELL_SENTIMENT_MAX,
        }
    }
}

/// 로그인 설정.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// 허용된 사용자 이름
    pub username: String,
    /// Argon2 PHC 형식 비밀번호 해시
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// 잠금 전 허용되는 실패 횟수
    pub max_attempts: u32,
    /// 잠금 유지 시간 (분)
    pub lockout_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password_hash: None,
            max_attempts: 3,
            lockout_minutes: 5,
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password_hash", &self.password_hash.as_ref().map(|_| "[REDACTED]"))
            .field("max_attempts", &self.max_attempts)
            .field("lockout_minutes", &self.lockout_minutes)
            .finish()
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// `path`가 `None`이면 [`DEFAULT_CONFIG_PATH`]를 선택적으로 읽습니다.
    pub fn load(path: Option<&Path>) -> CoinsightResult<Self> {
        dotenvy::dotenv().ok();

        let file_source = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_PATH).required(false),
        };

        let builder = config::Config::builder()
            .add_source(file_source)
            .add_source(
                config::Environment::with_prefix("COINSIGHT")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut config: AppConfig = builder.build()?.try_deserialize()?;
        config.apply_legacy_env(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// 배포 호환 환경 변수를 반영합니다.
    ///
    /// 비어 있는 값은 무시합니다.
    pub fn apply_legacy_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("COINGECKO_API_KEY") {
            self.api.api_key = Some(key);
        }
        if let Some(username) = non_empty("APP_USERNAME") {
            self.auth.username = username;
        }
        if let Some(hash) = non_empty("APP_PASSWORD_HASH") {
            self.auth.password_hash = Some(hash);
        }
    }

    /// 설정 값의 일관성을 검증합니다.
    pub fn validate(&self) -> CoinsightResult<()> {
        if self.retry.max_attempts == 0 {
            return Err(CoinsightError::Config(
                "retry.max_attempts는 1 이상이어야 합니다".to_string(),
            ));
        }
        if self.auth.max_attempts == 0 {
            return Err(CoinsightError::Config(
                "auth.max_attempts는 1 이상이어야 합니다".to_string(),
            ));
        }

        let scoring = &self.scoring;
        if scoring.extreme_fear_max >= scoring.extreme_greed_min {
            return Err(CoinsightError::Config(format!(
                "extreme_fear_max({})는 extreme_greed_min({})보다 작아야 합니다",
                scoring.extreme_fear_max, scoring.extreme_greed_min
            )));
        }
        if [
            scoring.extreme_greed_min,
            scoring.extreme_fear_score,
            scoring.extreme_greed_score,
            scoring.neutral_score,
        ]
        .iter()
        .any(|v| *v > 100)
        {
            return Err(CoinsightError::Config(
                "심리 지수 관련 값은 0~100 범위여야 합니다".to_string(),
            ));
        }
        if scoring.technical_weight < Decimal::ZERO || scoring.sentiment_weight < Decimal::ZERO {
            return Err(CoinsightError::Config(
                "가중치는 음수일 수 없습니다".to_string(),
            ));
        }

        Ok(())
    }
}
