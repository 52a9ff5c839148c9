//! `hash-password` 명령.
//!
//! 배포 환경의 `APP_PASSWORD_HASH`에 넣을 Argon2 해시를 출력합니다.

use anyhow::{Context, Result};
use coinsight_auth::{hash_password, password_warnings};

/// 비밀번호를 해싱해 출력합니다. 약한 비밀번호는 stderr로 경고만 합니다.
pub fn run_hash_password(password: &str) -> Result<()> {
    if password.is_empty() {
        anyhow::bail!("password must not be empty");
    }

    for warning in password_warnings(password) {
        eprintln!("warning: {}", warning);
    }

    let hash = hash_password(password).context("failed to hash password")?;

    println!("{}", hash);
    eprintln!("\nSet it in your environment:\n  APP_PASSWORD_HASH='{}'", hash);

    Ok(())
}
