//! CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 로그인 후 코인 분석 (`analyze`)
//! - 배포용 비밀번호 해시 생성 (`hash-password`)
//! - 텍스트/JSON 보고서 렌더링

pub mod commands;
pub mod report;
