//! 코인 분석을 위한 도메인 모델.

mod coin;
mod sentiment;
mod signal;
mod technical;

pub use coin::*;
pub use sentiment::*;
pub use signal::*;
pub use technical::*;
