//! 터미널 로그인 절차.
//!
//! `COINSIGHT_PASSWORD`가 있으면 한 번만 시도하고, 없으면 표준 입력으로
//! 최대 허용 횟수까지 비밀번호를 묻습니다.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use coinsight_auth::{Authenticator, LoginContext, LoginOutcome, SessionStore};
use tracing::info;

/// 비밀번호 환경 변수.
pub const PASSWORD_ENV: &str = "COINSIGHT_PASSWORD";

/// 로그인 절차를 진행합니다.
///
/// 인증되면 세션 토큰을, 거부되거나 잠기면 `None`을 반환합니다.
pub async fn login<S: SessionStore>(
    auth: &Authenticator<S>,
    username: Option<String>,
) -> Result<Option<String>> {
    if auth.uses_default_password() {
        eprintln!(
            "warning: using the built-in development password. \
             Set APP_USERNAME and APP_PASSWORD_HASH for real deployments."
        );
    }

    let session = LoginContext::new_session().session_token;
    let username = match username {
        Some(name) => name,
        None => prompt("Username")?,
    };

    let env_password = std::env::var(PASSWORD_ENV).ok().filter(|p| !p.is_empty());
    let interactive = env_password.is_none();
    let mut pending = env_password;

    loop {
        let password = match pending.take() {
            Some(password) => password,
            None => prompt("Password")?,
        };

        let ctx = LoginContext::new(session.clone());
        match auth.check_login(&ctx, &username, &password).await? {
            LoginOutcome::Authenticated => {
                info!(username = %username, "인증 완료");
                eprintln!("Login successful.");
                return Ok(Some(session));
            }
            LoginOutcome::Rejected { remaining_attempts } => {
                eprintln!(
                    "Invalid credentials. {} attempt(s) remaining.",
                    remaining_attempts
                );
                if remaining_attempts == 0 || !interactive {
                    return Ok(None);
                }
            }
            LoginOutcome::LockedOut { retry_after } => {
                eprintln!(
                    "Too many failed attempts. Try again in {} minute(s).",
                    (retry_after.num_seconds() + 59) / 60
                );
                return Ok(None);
            }
        }
    }
}

fn prompt(label: &str) -> Result<String> {
    let mut stderr = io::stderr();
    write!(stderr, "{}: ", label)?;
    stderr.flush()?;

    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .with_context(|| format!("failed to read {}", label.to_lowercase()))?;
    if read == 0 {
        anyhow::bail!("no {} provided on standard input", label.to_lowercase());
    }

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
