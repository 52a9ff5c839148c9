//! 로그인 게이트.
//!
//! 이 crate는 다음을 제공합니다:
//! - Argon2id 비밀번호 해싱/검증
//! - 세션 토큰별 실패 횟수와 잠금을 보관하는 주입형 세션 저장소
//! - 요청 단위 컨텍스트를 받는 로그인 검사기

pub mod authenticator;
pub mod error;
pub mod password;
pub mod store;

pub use authenticator::{Authenticator, LoginContext, LoginOutcome};
pub use error::{AuthError, AuthResult};
pub use password::{
    hash_password, password_warnings, validate_hash, verify_password, PasswordError,
    DEFAULT_DEV_PASSWORD,
};
pub use store::{InMemorySessionStore, SessionRecord, SessionStore};
