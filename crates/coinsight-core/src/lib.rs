//! # Coinsight Core
//!
//! 코인 신호 분석기의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 분석 파이프라인 전반에서 사용되는 기본 타입을 제공합니다:
//! - 가격 시계열 및 Decimal 유틸리티
//! - 기술적/심리/최종 신호 결과 타입
//! - 코인 메타데이터
//! - 설정 관리
//! - 로깅 인프라
//! - 공통 에러 타입

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
