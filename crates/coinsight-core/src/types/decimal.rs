//! 화면 표시용 Decimal 유틸리티.

use rust_decimal::{Decimal, RoundingStrategy};

/// 가격 타입.
pub type Price = Decimal;

/// 거래량 타입.
pub type Volume = Decimal;

/// Decimal 표시 관련 확장 트레이트.
pub trait DecimalExt {
    /// 지정된 소수점 자릿수로 반올림합니다 (0.5는 0에서 멀어지는 방향).
    fn round_half_up(&self, dp: u32) -> Decimal;

    /// 비율을 퍼센트 문자열로 변환합니다 (예: 0.0525 → "5.25%").
    fn to_percentage_string(&self) -> String;

    /// 천 단위 구분 기호가 들어간 문자열 (예: 1234567.891, 2 → "1,234,567.89").
    fn to_grouped_string(&self, dp: u32) -> String;
}

impl DecimalExt for Decimal {
    fn round_half_up(&self, dp: u32) -> Decimal {
        self.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
    }

    fn to_percentage_string(&self) -> String {
        let pct = *self * Decimal::from(100);
        format!("{:.2}%", pct)
    }

    fn to_grouped_string(&self, dp: u32) -> String {
        let rounded = self.round_half_up(dp);
        let rendered = format!("{:.*}", dp as usize, rounded.abs());
        let (int_part, frac_part) = match rendered.split_once('.') {
            Some((i, f)) => (i.to_string(), Some(f.to_string())),
            None => (rendered, None),
        };

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        match frac_part {
            Some(frac) => format!("{}{}.{}", sign, grouped, frac),
            None => format!("{}{}", sign, grouped),
        }
    }
}
