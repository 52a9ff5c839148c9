//! 가격 시계열 타입.
//!
//! `PriceSeries`는 생성 시 시간 순서를 검증하고 이후 변경되지 않습니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Price, Volume};
use crate::error::{CoinsightError, CoinsightResult};

/// 단일 가격 관측치.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// 관측 시각
    pub timestamp: DateTime<Utc>,
    /// 가격 (호가 통화 기준)
    pub price: Price,
    /// 거래량 (제공되지 않을 수 있음)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Volume>,
}

impl PricePoint {
    /// 거래량 없는 관측치를 생성합니다.
    pub fn new(timestamp: DateTime<Utc>, price: Price) -> Self {
        Self {
            timestamp,
            price,
            volume: None,
        }
    }

    /// 거래량을 설정합니다.
    pub fn with_volume(mut self, volume: Volume) -> Self {
        self.volume = Some(volume);
        self
    }
}

/// 시간 순으로 정렬된 불변 가격 시계열.
///
/// 타임스탬프는 엄격하게 증가하며 중복이 없습니다.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// 관측치 목록으로 시계열을 생성합니다.
    ///
    /// # 에러
    ///
    /// 타임스탬프가 직전 값보다 크지 않은 관측치가 있으면 `InvalidInput`.
    pub fn new(points: Vec<PricePoint>) -> CoinsightResult<Self> {
        if let Some(pos) = points
            .windows(2)
            .position(|w| w[1].timestamp <= w[0].timestamp)
        {
            return Err(CoinsightError::InvalidInput(format!(
                "타임스탬프가 엄격히 증가하지 않습니다: index {} ({}) 이후 {}",
                pos,
                points[pos].timestamp,
                points[pos + 1].timestamp
            )));
        }

        Ok(Self { points })
    }

    /// 빈 시계열.
    pub fn empty() -> Self {
        Self::default()
    }

    /// 관측치 수.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 모든 관측치.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// 가격 열만 추출합니다.
    pub fn prices(&self) -> Vec<Decimal> {
        self.points.iter().map(|p| p.price).collect()
    }

    /// 가장 최근 관측치.
    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// 가장 오래된 관측치.
    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    /// 거래량이 하나라도 있는지 확인합니다.
    pub fn has_volume(&self) -> bool {
        self.points.iter().any(|p| p.volume.is_some())
    }

    /// 최저가와 최고가.
    pub fn price_range(&self) -> Option<(Price, Price)> {
        let min = self.points.iter().map(|p| p.price).min()?;
        let max = self.points.iter().map(|p| p.price).max()?;
        Some((min, max))
    }

    /// 첫 관측치 대비 마지막 관측치의 변화율 (0.05 = 5%).
    ///
    /// 첫 가격이 0이면 `None`.
    pub fn change_ratio(&self) -> Option<Decimal> {
        let first = self.first()?.price;
        let last = self.latest()?.price;
        if first.is_zero() {
            return None;
        }
        Some((last - first) / first)
    }
}

impl<'de> Deserialize<'de> for PriceSeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            points: Vec<PricePoint>,
        }

        let raw = Raw::deserialize(deserializer)?;
        PriceSeries::new(raw.points).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn ts(hour: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(hour)
    }

    #[test]
    fn test_series_accepts_increasing_timestamps() {
        let series = PriceSeries::new(vec![
            PricePoint::new(ts(0), dec!(100)),
            PricePoint::new(ts(1), dec!(110)).with_volume(dec!(5)),
            PricePoint::new(ts(2), dec!(90)),
        ])
        .unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.prices(), vec![dec!(100), dec!(110), dec!(90)]);
        assert_eq!(series.latest().unwrap().price, dec!(90));
        assert!(series.has_volume());
        assert_eq!(series.price_range(), Some((dec!(90), dec!(110))));
        assert_eq!(series.change_ratio(), Some(dec!(-0.1)));
    }

    #[test]
    fn test_series_rejects_duplicate_timestamps() {
        let result = PriceSeries::new(vec![
            PricePoint::new(ts(0), dec!(100)),
            PricePoint::new(ts(0), dec!(101)),
        ]);
        assert!(matches!(result, Err(CoinsightError::InvalidInput(_))));
    }

    #[test]
    fn test_series_rejects_decreasing_timestamps() {
        let result = PriceSeries::new(vec![
            PricePoint::new(ts(2), dec!(100)),
            PricePoint::new(ts(1), dec!(101)),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_series() {
        let series = PriceSeries::empty();
        assert!(series.is_empty());
        assert!(series.latest().is_none());
        assert!(series.change_ratio().is_none());
        assert!(!series.has_volume());
    }

    #[test]
    fn test_deserialize_validates_order() {
        let ok = r#"{"points":[
            {"timestamp":"2024-01-01T00:00:00Z","price":"1.5"},
            {"timestamp":"2024-01-01T01:00:00Z","price":"1.6","volume":"10"}
        ]}"#;
        let series: PriceSeries = serde_json::from_str(ok).unwrap();
        assert_eq!(series.len(), 2);

        let bad = r#"{"points":[
            {"timestamp":"2024-01-01T01:00:00Z","price":"1.5"},
            {"timestamp":"2024-01-01T00:00:00Z","price":"1.6"}
        ]}"#;
        assert!(serde_json::from_str::<PriceSeries>(bad).is_err());
    }
}
