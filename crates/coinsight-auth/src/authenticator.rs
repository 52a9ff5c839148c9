//! 로그인 검사.
//!
//! 요청마다 [`LoginContext`]를 명시적으로 넘기고, 시도 횟수는 주입된
//! [`SessionStore`]에 세션 토큰별로 저장합니다.
//!
//! # 규칙
//!
//! - 잠긴 세션은 자격 증명을 확인하지 않고 `LockedOut`
//! - 잠금 시간이 지나면 실패 횟수를 초기화
//! - 성공하면 `Authenticated`, 실패 횟수 초기화
//! - 실패하면 횟수를 올리고 `Rejected`, 최대 횟수에 도달하면 잠금 설정

use chrono::{DateTime, Duration, Utc};
use coinsight_core::AuthConfig;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::password::{hash_password, validate_hash, verify_password, DEFAULT_DEV_PASSWORD};
use crate::store::{SessionRecord, SessionStore};

/// 요청 단위 로그인 컨텍스트.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginContext {
    /// 세션 토큰
    pub session_token: String,
    /// 요청 시각
    pub now: DateTime<Utc>,
}

impl LoginContext {
    /// 현재 시각으로 컨텍스트를 생성합니다.
    pub fn new(session_token: impl Into<String>) -> Self {
        Self::at(session_token, Utc::now())
    }

    /// 지정한 시각으로 컨텍스트를 생성합니다.
    pub fn at(session_token: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            session_token: session_token.into(),
            now,
        }
    }

    /// 새 세션 토큰(UUID v4)으로 컨텍스트를 생성합니다.
    pub fn new_session() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }
}

/// 로그인 시도 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// 인증 성공
    Authenticated,
    /// 자격 증명 불일치
    Rejected {
        /// 잠금까지 남은 시도 횟수
        remaining_attempts: u32,
    },
    /// 세션 잠김
    LockedOut {
        /// 잠금 해제까지 남은 시간
        retry_after: Duration,
    },
}

impl LoginOutcome {
    /// 인증에 성공했는지 확인합니다.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, LoginOutcome::Authenticated)
    }
}

/// 단일 사용자 로그인 게이트.
pub struct Authenticator<S> {
    username: String,
    password_hash: String,
    max_attempts: u32,
    lockout: Duration,
    uses_default_password: bool,
    store: S,
}

impl<S> std::fmt::Debug for Authenticator<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("username", &self.username)
            .field("max_attempts", &self.max_attempts)
            .field("lockout", &self.lockout)
            .field("uses_default_password", &self.uses_default_password)
            .finish_non_exhaustive()
    }
}

impl<S: SessionStore> Authenticator<S> {
    /// 설정으로 게이트를 생성합니다.
    ///
    /// 비밀번호 해시가 없으면 개발용 기본 비밀번호의 해시를 사용하고 경고를 남깁니다.
    ///
    /// # 에러
    ///
    /// - 해시가 PHC 형식이 아니면 `Config`
    /// - 최대 시도 횟수가 0이거나 잠금 시간이 음수이면 `Config`
    pub fn from_config(config: &AuthConfig, store: S) -> AuthResult<Self> {
        if config.max_attempts == 0 {
            return Err(AuthError::Config(
                "auth.max_attempts must be at least 1".to_string(),
            ));
        }
        if config.lockout_minutes < 0 {
            return Err(AuthError::Config(
                "auth.lockout_minutes must not be negative".to_string(),
            ));
        }

        let configured = config
            .password_hash
            .as_deref()
            .map(str::trim)
            .filter(|hash| !hash.is_empty());

        let (password_hash, uses_default_password) = match configured {
            Some(hash) => {
                validate_hash(hash).map_err(|e| AuthError::Config(e.to_string()))?;
                (hash.to_string(), false)
            }
            None => {
                warn!(
                    username = %config.username,
                    "APP_PASSWORD_HASH가 설정되지 않아 개발용 기본 비밀번호를 사용합니다"
                );
                (hash_password(DEFAULT_DEV_PASSWORD)?, true)
            }
        };

        Ok(Self {
            username: config.username.clone(),
            password_hash,
            max_attempts: config.max_attempts,
            lockout: Duration::minutes(config.lockout_minutes),
            uses_default_password,
            store,
        })
    }

    /// 허용된 사용자 이름.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// 잠금 전 허용되는 실패 횟수.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// 개발용 기본 비밀번호를 쓰고 있는지 확인합니다.
    pub fn uses_default_password(&self) -> bool {
        self.uses_default_password
    }

    /// 로그인을 시도합니다.
    pub async fn check_login(
        &self,
        ctx: &LoginContext,
        username: &str,
        password: &str,
    ) -> AuthResult<LoginOutcome> {
        let token = ctx.session_token.as_str();
        let mut record = self.store.get(token).await?.unwrap_or_default();

        if let Some(until) = record.locked_until {
            if ctx.now < until {
                warn!(session = %token, until = %until, "잠긴 세션의 로그인 시도");
                return Ok(LoginOutcome::LockedOut {
                    retry_after: until - ctx.now,
                });
            }
            // 잠금 만료
            record = SessionRecord::default();
        }

        // 사용자 이름이 틀려도 검증은 수행
        let password_ok = verify_password(password, &self.password_hash)?;
        let username_ok = username.trim() == self.username;

        if username_ok && password_ok {
            self.store
                .put(
                    token,
                    SessionRecord {
                        authenticated: true,
                        ..Default::default()
                    },
                )
                .await?;
            info!(session = %token, username = %self.username, "로그인 성공");
            return Ok(LoginOutcome::Authenticated);
        }

        record.failed_attempts = record.failed_attempts.saturating_add(1);
        record.authenticated = false;
        let remaining_attempts = self.max_attempts.saturating_sub(record.failed_attempts);

        if remaining_attempts == 0 {
            record.locked_until = Some(ctx.now + self.lockout);
            warn!(
                session = %token,
                attempts = record.failed_attempts,
                lockout_minutes = self.lockout.num_minutes(),
                "로그인 실패 횟수 초과, 세션 잠금"
            );
        } else {
            warn!(
                session = %token,
                attempts = record.failed_attempts,
                remaining = remaining_attempts,
                "로그인 실패"
            );
        }

        self.store.put(token, record).await?;
        Ok(LoginOutcome::Rejected { remaining_attempts })
    }

    /// 세션이 인증되었는지 확인합니다.
    pub async fn is_authenticated(&self, session_token: &str) -> AuthResult<bool> {
        Ok(self
            .store
            .get(session_token)
            .await?
            .is_some_and(|record| record.authenticated))
    }

    /// 세션을 로그아웃합니다. 실패 횟수와 잠금도 함께 지워집니다.
    pub async fn logout(&self, session_token: &str) -> AuthResult<()> {
        self.store.remove(session_token).await?;
        info!(session = %session_token, "로그아웃");
        Ok(())
    }
}
