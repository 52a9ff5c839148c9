//! CoinGecko API 클라이언트.
//!
//! 공개 API(`/api/v3`)에서 가격 이력과 코인 메타데이터를 가져옵니다.
//!
//! # 사용 엔드포인트
//!
//! - `GET /coins/{id}/market_chart?vs_currency=&days=` - 가격/시가총액/거래량 이력
//! - `GET /coins/{id}?localization=false` - 이름, 심볼, 시가총액, 순위
//!
//! # API 키
//!
//! 무료 등급은 키 없이 동작하며 분당 약 50회로 제한됩니다.
//! 개인 데모 키가 설정된 경우에만 `x-cg-demo-api-key` 헤더를 보냅니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use coinsight_core::ApiConfig;
//! use coinsight_data::{CoinGeckoClient, RetryPolicy};
//!
//! let client = CoinGeckoClient::new(&ApiConfig::default(), RetryPolicy::default())?;
//! let series = client.fetch_market_chart("bitcoin", "usd", 30).await?;
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coinsight_core::{ApiConfig, CoinInfo, PricePoint, PriceSeries};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use super::MarketDataProvider;
use crate::error::{DataError, Result};
use crate::retry::RetryPolicy;

/// 데모 API 키 헤더 이름.
pub const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// 에러 메시지에 포함할 응답 본문 최대 길이.
const MAX_ERROR_BODY: usize = 200;

/// CoinGecko API 클라이언트.
#[derive(Clone)]
pub struct CoinGeckoClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for CoinGeckoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinGeckoClient")
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.api_key.is_some())
            .field("retry", &self.retry)
            .finish()
    }
}

/// `market_chart` 응답.
#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    #[serde(default)]
    prices: Vec<(f64, Option<Decimal>)>,
    #[serde(default)]
    total_volumes: Vec<(f64, Option<Decimal>)>,
}

/// `coins/{id}` 응답 중 필요한 필드.
#[derive(Debug, Deserialize)]
struct CoinResponse {
    id: String,
    name: String,
    symbol: String,
    #[serde(default)]
    market_cap_rank: Option<u32>,
    #[serde(default)]
    market_data: Option<CoinMarketData>,
}

#[derive(Debug, Deserialize)]
struct CoinMarketData {
    #[serde(default)]
    market_cap: HashMap<String, Option<Decimal>>,
}

impl CoinGeckoClient {
    /// 설정으로 클라이언트를 생성합니다.
    ///
    /// 요청 타임아웃은 `api.request_timeout_secs`로 고정됩니다.
    pub fn new(api: &ApiConfig, retry: RetryPolicy) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(api.request_timeout())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: api.coingecko_base_url.trim_end_matches('/').to_string(),
            api_key: api.api_key_secret(),
            retry,
        })
    }

    /// 개인 API 키가 설정되어 있는지 확인합니다.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// 단일 GET 요청 (재시도 없음).
    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        debug!(url = %url, query = ?query, "CoinGecko API 요청");

        let mut request = self
            .client
            .get(&url)
            .query(query)
            .header("Accept", "application/json");

        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited);
        }

        if status == StatusCode::NOT_FOUND {
            return Err(DataError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::Http {
                status: status.as_u16(),
                message: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoClient {
    async fn fetch_market_chart(
        &self,
        coin_id: &str,
        vs_currency: &str,
        days: u32,
    ) -> Result<PriceSeries> {
        let coin_id = normalize_coin_id(coin_id)?;
        let vs_currency = vs_currency.trim().to_lowercase();
        if days == 0 {
            return Err(DataError::InvalidInput("days must be at least 1".to_string()));
        }

        let path = format!("/coins/{}/market_chart", coin_id);
        let query = [("vs_currency", vs_currency.clone()), ("days", days.to_string())];
        let label = format!("market_chart:{}", coin_id);

        let response: MarketChartResponse = self
            .retry
            .run(&label, || self.get_json(&path, &query))
            .await?;

        let series = build_series(&response)?;

        debug!(
            coin = %coin_id,
            vs_currency = %vs_currency,
            days = days,
            points = series.len(),
            has_volume = series.has_volume(),
            "가격 이력 조회 완료"
        );

        Ok(series)
    }

    async fn fetch_coin_info(&self, coin_id: &str, vs_currency: &str) -> Result<CoinInfo> {
        let coin_id = normalize_coin_id(coin_id)?;
        let vs_currency = vs_currency.trim().to_lowercase();

        let path = format!("/coins/{}", coin_id);
        let query = [("localization", "false".to_string())];
        let label = format!("coin_info:{}", coin_id);

        let response: CoinResponse = self
            .retry
            .run(&label, || self.get_json(&path, &query))
            .await?;

        let market_cap = response
            .market_data
            .as_ref()
            .and_then(|data| data.market_cap.get(&vs_currency).copied().flatten());

        debug!(
            coin = %response.id,
            rank = ?response.market_cap_rank,
            "코인 정보 조회 완료"
        );

        Ok(CoinInfo::new(response.id, response.name, response.symbol)
            .with_market_cap(market_cap)
            .with_rank(response.market_cap_rank))
    }
}

/// 코인 ID를 정규화합니다 (공백 제거, 소문자).
///
/// 비어 있거나 영문자, 숫자, `-`, `_`, `.` 이외의 문자가 있으면 에러입니다.
pub fn normalize_coin_id(raw: &str) -> Result<String> {
    let id = raw.trim().to_lowercase();

    if id.is_empty() {
        return Err(DataError::InvalidInput("coin id is empty".to_string()));
    }

    if let Some(c) = id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(*c, '-' | '_' | '.')))
    {
        return Err(DataError::InvalidInput(format!(
            "coin id '{}' contains invalid character '{}'",
            id, c
        )));
    }

    Ok(id)
}

/// 응답 배열을 시계열로 변환합니다.
///
/// 가격이 비어 있는 항목과 시간 순서를 어기는 항목은 건너뜁니다.
/// 거래량은 가격 배열과 길이가 같을 때만 위치 기준으로 붙입니다.
fn build_series(response: &MarketChartResponse) -> Result<PriceSeries> {
    if response.prices.is_empty() {
        return Err(DataError::Empty("market_chart returned no prices".to_string()));
    }

    let volumes_aligned = response.total_volumes.len() == response.prices.len();
    let mut points: Vec<PricePoint> = Vec::with_capacity(response.prices.len());
    let mut skipped = 0usize;

    for (index, (millis, price)) in response.prices.iter().enumerate() {
        let Some(price) = price else {
            skipped += 1;
            continue;
        };

        let timestamp = timestamp_from_millis(*millis)?;
        if points.last().is_some_and(|last| timestamp <= last.timestamp) {
            skipped += 1;
            continue;
        }

        let mut point = PricePoint::new(timestamp, *price);
        if volumes_aligned {
            if let Some(volume) = response.total_volumes[index].1 {
                point = point.with_volume(volume);
            }
        }
        points.push(point);
    }

    if skipped > 0 {
        warn!(skipped = skipped, "가격 이력에서 잘못된 항목 제외");
    }

    if points.is_empty() {
        return Err(DataError::Empty("market_chart had no usable prices".to_string()));
    }

    PriceSeries::new(points).map_err(|e| DataError::Malformed(e.to_string()))
}

fn timestamp_from_millis(millis: f64) -> Result<DateTime<Utc>> {
    if !millis.is_finite() {
        return Err(DataError::Malformed(format!("invalid timestamp {}", millis)));
    }

    DateTime::from_timestamp_millis(millis as i64)
        .ok_or_else(|| DataError::Malformed(format!("timestamp out of range {}", millis)))
}
