//! alternative.me 공포/탐욕 지수 클라이언트.
//!
//! 응답의 `data[0].value`(문자열 정수)를 읽습니다.
//! 심리 지수는 보조 입력이므로 실패해도 분석을 막지 않고 `None`으로 처리합니다.

use async_trait::async_trait;
use coinsight_core::ApiConfig;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use super::SentimentProvider;
use crate::error::{DataError, Result};
use crate::retry::RetryPolicy;

/// 지수 조회 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FearGreedReading {
    /// 지수 값 (0~100)
    pub value: u8,
    /// 제공자 분류 문자열 (예: "Extreme Fear")
    pub classification: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FearGreedResponse {
    #[serde(default)]
    data: Vec<FearGreedEntry>,
}

#[derive(Debug, Deserialize)]
struct FearGreedEntry {
    value: String,
    #[serde(default)]
    value_classification: Option<String>,
}

/// 공포/탐욕 지수 클라이언트.
#[derive(Debug, Clone)]
pub struct FearGreedClient {
    client: reqwest::Client,
    url: String,
    retry: RetryPolicy,
}

impl FearGreedClient {
    /// 설정으로 클라이언트를 생성합니다. 기본적으로 재시도하지 않습니다.
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(api.request_timeout())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url: api.fear_greed_url.clone(),
            retry: RetryPolicy::no_retry(),
        })
    }

    /// 재시도 정책을 지정합니다.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// 최신 지수를 조회합니다.
    pub async fn fetch_reading(&self) -> Result<FearGreedReading> {
        self.retry.run("fear_greed", || self.request_once()).await
    }

    async fn request_once(&self) -> Result<FearGreedReading> {
        debug!(url = %self.url, "공포/탐욕 지수 요청");

        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited);
        }

        if !status.is_success() {
            return Err(DataError::Http {
                status: status.as_u16(),
                message: "fear/greed index request failed".to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: FearGreedResponse = serde_json::from_str(&body)?;
        parse_reading(parsed)
    }
}

#[async_trait]
impl SentimentProvider for FearGreedClient {
    async fn fetch_fear_greed(&self) -> Option<u8> {
        match self.fetch_reading().await {
            Ok(reading) => {
                debug!(
                    value = reading.value,
                    classification = ?reading.classification,
                    "공포/탐욕 지수 조회 완료"
                );
                Some(reading.value)
            }
            Err(e) => {
                warn!(error = %e, "공포/탐욕 지수 조회 실패, 중립으로 처리");
                None
            }
        }
    }
}

fn parse_reading(response: FearGreedResponse) -> Result<FearGreedReading> {
    let entry = response
        .data
        .into_iter()
        .next()
        .ok_or_else(|| DataError::Empty("fear/greed data is empty".to_string()))?;

    let value: u8 = entry
        .value
        .trim()
        .parse()
        .map_err(|_| DataError::Malformed(format!("invalid index value '{}'", entry.value)))?;

    if value > 100 {
        return Err(DataError::Malformed(format!("index value {} out of range", value)));
    }

    Ok(FearGreedReading {
        value,
        classification: entry.value_classification,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<FearGreedReading> {
        parse_reading(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_parse_first_entry() {
        let reading = parse(
            r#"{"name":"Fear and Greed Index","data":[
                {"value":"23","value_classification":"Extreme Fear","timestamp":"1704067200"},
                {"value":"40","value_classification":"Fear","timestamp":"1703980800"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(reading.value, 23);
        assert_eq!(reading.classification.as_deref(), Some("Extreme Fear"));
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert!(matches!(parse(r#"{"data":[]}"#), Err(DataError::Empty(_))));
        assert!(matches!(
            parse(r#"{"data":[{"value":"abc"}]}"#),
            Err(DataError::Malformed(_))
        ));
        assert!(matches!(
            parse(r#"{"data":[{"value":"150"}]}"#),
            Err(DataError::Malformed(_))
        ));
        assert!(matches!(
            parse(r#"{"data":[{"value":"-3"}]}"#),
            Err(DataError::Malformed(_))
        ));
    }
}
