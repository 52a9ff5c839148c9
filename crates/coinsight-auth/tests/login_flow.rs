//! 로그인 시도 횟수와 잠금 흐름 테스트.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use coinsight_auth::{
    hash_password, Authenticator, InMemorySessionStore, LoginContext, LoginOutcome, SessionStore,
};
use coinsight_core::AuthConfig;

const PASSWORD: &str = "correct-horse-42";

fn authenticator() -> Authenticator<InMemorySessionStore> {
    let config = AuthConfig {
        username: "admin".to_string(),
        password_hash: Some(hash_password(PASSWORD).unwrap()),
        max_attempts: 3,
        lockout_minutes: 5,
    };
    Authenticator::from_config(&config, InMemorySessionStore::new()).unwrap()
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
}

#[tokio::test]
async fn test_three_failures_lock_the_session() {
    let auth = authenticator();
    let ctx = LoginContext::at("session-a", t0());

    let mut remaining = Vec::new();
    for _ in 0..3 {
        match auth.check_login(&ctx, "admin", "wrong").await.unwrap() {
            LoginOutcome::Rejected { remaining_attempts } => remaining.push(remaining_attempts),
            other => panic!("expected rejection, got {:?}", other),
        }
    }
    assert_eq!(remaining, vec![2, 1, 0]);

    // 잠긴 동안에는 올바른 비밀번호도 거부
    let later = LoginContext::at("session-a", t0() + Duration::minutes(2));
    match auth.check_login(&later, "admin", PASSWORD).await.unwrap() {
        LoginOutcome::LockedOut { retry_after } => assert_eq!(retry_after, Duration::minutes(3)),
        other => panic!("expected lockout, got {:?}", other),
    }
    assert!(!auth.is_authenticated("session-a").await.unwrap());
}

#[tokio::test]
async fn test_lockout_expires_and_counter_resets() {
    let auth = authenticator();
    let ctx = LoginContext::at("session-a", t0());
    for _ in 0..3 {
        auth.check_login(&ctx, "admin", "wrong").await.unwrap();
    }

    let after = LoginContext::at("session-a", t0() + Duration::minutes(5));
    assert_eq!(
        auth.check_login(&after, "admin", "still-wrong").await.unwrap(),
        LoginOutcome::Rejected { remaining_attempts: 2 }
    );
    assert_eq!(
        auth.check_login(&after, "admin", PASSWORD).await.unwrap(),
        LoginOutcome::Authenticated
    );
}

#[tokio::test]
async fn test_success_resets_failed_attempts() {
    let store = InMemorySessionStore::new();
    let config = AuthConfig {
        username: "admin".to_string(),
        password_hash: Some(hash_password(PASSWORD).unwrap()),
        max_attempts: 3,
        lockout_minutes: 5,
    };
    let auth = Authenticator::from_config(&config, store).unwrap();
    let ctx = LoginContext::at("session-a", t0());

    auth.check_login(&ctx, "admin", "wrong").await.unwrap();
    auth.check_login(&ctx, "admin", "wrong").await.unwrap();
    assert!(auth
        .check_login(&ctx, "admin", PASSWORD)
        .await
        .unwrap()
        .is_authenticated());

    auth.logout("session-a").await.unwrap();
    assert_eq!(
        auth.check_login(&ctx, "admin", "wrong").await.unwrap(),
        LoginOutcome::Rejected { remaining_attempts: 2 }
    );
}

#[tokio::test]
async fn test_sessions_do_not_share_attempts() {
    let auth = authenticator();
    let a = LoginContext::at("session-a", t0());
    let b = LoginContext::at("session-b", t0());

    for _ in 0..3 {
        auth.check_login(&a, "admin", "wrong").await.unwrap();
    }

    assert!(matches!(
        auth.check_login(&a, "admin", PASSWORD).await.unwrap(),
        LoginOutcome::LockedOut { .. }
    ));
    assert_eq!(
        auth.check_login(&b, "admin", PASSWORD).await.unwrap(),
        LoginOutcome::Authenticated
    );
}

#[tokio::test]
async fn test_store_records_lock_deadline() {
    let store = Arc::new(InMemorySessionStore::new());
    let config = AuthConfig {
        username: "admin".to_string(),
        password_hash: Some(hash_password(PASSWORD).unwrap()),
        max_attempts: 1,
        lockout_minutes: 10,
    };
    let auth = Authenticator::from_config(&config, store.clone()).unwrap();
    let ctx = LoginContext::at("s", t0());

    assert_eq!(
        auth.check_login(&ctx, "admin", "nope").await.unwrap(),
        LoginOutcome::Rejected { remaining_attempts: 0 }
    );

    let record = store.get("s").await.unwrap().unwrap();
    assert_eq!(record.failed_attempts, 1);
    assert_eq!(record.locked_until, Some(t0() + Duration::minutes(10)));
    assert!(!record.authenticated);
}
