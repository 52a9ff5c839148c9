//! 재시도 정책.
//!
//! 네트워크 호출을 감싸는 재사용 가능한 재시도 루프입니다.
//! 에러 종류별 대기 시간은 [`RetryableError`]가 결정하며,
//! `None`을 반환하는 에러는 즉시 호출자에게 전달됩니다.
//!
//! 대기는 `tokio::time::sleep`을 사용하므로 테스트에서 멈춘 시계로 검증할 수 있습니다.

use std::future::Future;
use std::time::Duration;

use coinsight_core::RetryConfig;
use tracing::warn;

/// 재시도 대기 시간을 결정하는 에러.
pub trait RetryableError: std::fmt::Display {
    /// `attempt`번째(1부터) 시도가 이 에러로 실패했을 때 다음 시도 전 대기 시간.
    ///
    /// `None`이면 재시도하지 않습니다.
    fn retry_delay(&self, attempt: u32, policy: &RetryPolicy) -> Option<Duration>;
}

/// 재시도 정책.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 최대 시도 횟수 (첫 시도 포함, 최소 1)
    pub max_attempts: u32,
    /// 요청 한도 초과 시 선형 대기 단위
    pub rate_limit_step: Duration,
    /// 연결 실패 후 대기
    pub connection_retry_delay: Duration,
    /// 타임아웃 후 대기
    pub timeout_retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            rate_limit_step: Duration::from_secs(config.rate_limit_step_secs),
            connection_retry_delay: Duration::from_secs(config.connection_retry_delay_secs),
            timeout_retry_delay: Duration::from_secs(config.timeout_retry_delay_secs),
        }
    }
}

impl RetryPolicy {
    /// 대기 없이 재시도하는 정책.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            rate_limit_step: Duration::ZERO,
            connection_retry_delay: Duration::ZERO,
            timeout_retry_delay: Duration::ZERO,
        }
    }

    /// 재시도 없이 한 번만 시도하는 정책.
    pub fn no_retry() -> Self {
        Self::immediate(1)
    }

    /// 요청 한도 초과 후 대기 시간 (시도 번호 × 단위).
    pub fn rate_limit_delay(&self, attempt: u32) -> Duration {
        self.rate_limit_step.saturating_mul(attempt)
    }

    /// 작업을 정책에 따라 실행합니다.
    ///
    /// 성공하거나, 재시도할 수 없는 에러가 나거나, 시도 횟수를 모두 쓰면 반환합니다.
    /// 마지막 에러가 그대로 반환됩니다.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, E>
    where
        E: RetryableError,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1u32;

        loop {
            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if attempt >= max_attempts {
                warn!(
                    label = label,
                    attempts = attempt,
                    error = %error,
                    "재시도 횟수 소진"
                );
                return Err(error);
            }

            let Some(delay) = error.retry_delay(attempt, self) else {
                return Err(error);
            };

            warn!(
                label = label,
                attempt = attempt,
                max_attempts = max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "요청 실패, 재시도 예정"
            );

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            attempt += 1;
        }
    }
}
