//! 분석 결과 텍스트 렌더링.
//!
//! 터미널용 패널을 문자열로 만듭니다. 출력은 호출자가 담당합니다.

use std::fmt::Write as _;

use coinsight_analytics::AnalysisReport;
use coinsight_core::{
    CoinsightError, DecimalExt, FinalLabel, PriceSeries, SentimentLabel, SentimentResult,
    TechnicalResult, TechnicalSignal,
};
use rust_decimal::Decimal;

const RULE: &str = "────────────────────────────────────────────────────────────";

/// 투자 위험 고지.
pub const DISCLAIMER: &[&str] = &[
    "This analysis is a decision aid only and does not guarantee profit.",
    "Crypto markets are highly volatile: trade only with capital you can afford to lose.",
    "Always use a stop loss.",
    "Nothing here is personal investment advice.",
];

/// 기술적 신호별 행동 가이드.
pub fn action_advice(signal: TechnicalSignal) -> &'static [&'static str] {
    match signal {
        TechnicalSignal::StrongBuy => &[
            "Staged entry: 40% of capital now, 30% on a 5% pullback, 30% on a 10% pullback",
            "Stop loss: 8-10% below the first entry",
            "Profit targets: 15% (first), 30% (second), 50% (final)",
            "Aim for a risk/reward of 1:3 or better",
        ],
        TechnicalSignal::Buy => &[
            "Trial entry: 20-30% of capital with a tight stop (5-7%)",
            "Wait for a break of key resistance before adding to the position",
            "Profit target: 10-20%",
        ],
        TechnicalSignal::Sell | TechnicalSignal::StrongSell => &[
            "Exit long positions: sell 50% now and 50% on a pullback",
            "Shorting only for experienced traders, with a 5% stop",
            "Wait for a reversal candle at support before re-entering",
        ],
        TechnicalSignal::Neutral | TechnicalSignal::InsufficientData => &[
            "No new entries: wait for a clearer signal",
            "Watch key support and resistance levels",
            "Stay in cash until a clear pattern forms",
        ],
    }
}

/// 전체 보고서를 렌더링합니다.
pub fn render_report(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let currency = report.request.vs_currency.to_uppercase();

    let _ = writeln!(
        out,
        "Coin analysis: {} ({}, last {} days)",
        report.request.coin_id, currency, report.request.days
    );
    let _ = writeln!(out, "{}", RULE);

    render_coin(&mut out, report, &currency);
    render_prices(&mut out, &report.series, &currency);
    render_technical(&mut out, &report.technical);
    render_sentiment(&mut out, &report.sentiment);
    render_signal(&mut out, report);

    let _ = writeln!(out, "\nWarnings");
    for (i, line) in DISCLAIMER.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, line);
    }

    out
}

/// 데이터 부재 시 안내문을 렌더링합니다.
pub fn render_failure(error: &CoinsightError) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Failed to fetch data: {}", error);

    let hints = error.remediation_hints();
    if !hints.is_empty() {
        let _ = writeln!(out, "\nPossible fixes:");
        for hint in hints {
            let _ = writeln!(out, "  - {}", hint);
        }
    }

    out
}

fn render_coin(out: &mut String, report: &AnalysisReport, currency: &str) {
    let Some(coin) = &report.coin else {
        return;
    };

    let rank = coin
        .rank
        .map(|r| format!("#{}", r))
        .unwrap_or_else(|| "N/A".to_string());
    let market_cap = coin
        .market_cap
        .map(|cap| format!("{} {}", cap.to_grouped_string(0), currency))
        .unwrap_or_else(|| "N/A".to_string());

    let _ = writeln!(out, "\nCoin");
    let _ = writeln!(out, "  Name        {}", coin.name);
    let _ = writeln!(out, "  Symbol      {}", coin.symbol);
    let _ = writeln!(out, "  Rank        {}", rank);
    let _ = writeln!(out, "  Market cap  {}", market_cap);
}

fn render_prices(out: &mut String, series: &PriceSeries, currency: &str) {
    let _ = writeln!(out, "\nPrice history ({} points)", series.len());

    let (Some(first), Some(last)) = (series.first(), series.latest()) else {
        let _ = writeln!(out, "  no data");
        return;
    };

    let _ = writeln!(out, "  First       {} {}", format_price(first.price), currency);
    let _ = writeln!(out, "  Last        {} {}", format_price(last.price), currency);
    if let Some((min, max)) = series.price_range() {
        let _ = writeln!(
            out,
            "  Range       {} - {} {}",
            format_price(min),
            format_price(max),
            currency
        );
    }
    if let Some(change) = series.change_ratio() {
        let sign = if change > Decimal::ZERO { "+" } else { "" };
        let _ = writeln!(out, "  Change      {}{}", sign, change.to_percentage_string());
    }
    let _ = writeln!(
        out,
        "  Volume      {}",
        if series.has_volume() { "available" } else { "not available" }
    );
}

fn render_technical(out: &mut String, technical: &TechnicalResult) {
    let _ = writeln!(out, "\nTechnical analysis");
    let _ = writeln!(out, "  Signal      {}", technical.signal);
    let _ = writeln!(out, "  Confidence  {}%", technical.confidence);

    if let (Some(rsi), Some(zone)) = (technical.raw.rsi, technical.raw.rsi_zone()) {
        let _ = writeln!(out, "  RSI         {} ({})", rsi, zone);
    }
    if let Some(sma) = technical.raw.sma_20 {
        let _ = writeln!(out, "  SMA-20      {}", format_price(sma));
    }
    if let Some(macd) = technical.raw.macd {
        let _ = writeln!(out, "  MACD        {}", macd);
    }

    if technical.is_insufficient() {
        let _ = writeln!(out, "  Not enough history to score (at least 20 points needed)");
    } else if !technical.reasons.is_empty() {
        let _ = writeln!(out, "  Reasons:");
        for reason in &technical.reasons {
            let _ = writeln!(out, "    - {}", reason);
        }
    }
}

fn render_sentiment(out: &mut String, sentiment: &SentimentResult) {
    let _ = writeln!(out, "\nFear & Greed index");

    match sentiment.fear_greed_value {
        Some(value) => {
            let _ = writeln!(out, "  Index       {}/100 {}", value, gauge(value));
            let mood = match sentiment.label {
                SentimentLabel::ExtremeFear => "Extreme fear",
                SentimentLabel::ExtremeGreed => "Extreme greed",
                SentimentLabel::Neutral => "Balanced sentiment",
            };
            let _ = writeln!(out, "  Mood        {}", mood);
        }
        None => {
            let _ = writeln!(out, "  Index       unavailable (treated as neutral)");
        }
    }
    let _ = writeln!(out, "  Score       {}", sentiment.score);
}

fn render_signal(out: &mut String, report: &AnalysisReport) {
    let signal = &report.signal;
    let marker = match signal.label {
        FinalLabel::PriorityBuy => "[+]",
        FinalLabel::CautionSell => "[-]",
        FinalLabel::Monitor => "[=]",
    };

    let _ = writeln!(out, "\n{}", RULE);
    let _ = writeln!(out, "{} {}", marker, signal.label);
    let _ = writeln!(out, "    Blended score {}", signal.blended_score.round_half_up(1));
    let _ = writeln!(out, "    {}", signal.rationale);
    let _ = writeln!(out, "{}", RULE);

    let _ = writeln!(out, "\nSuggested actions ({})", report.technical.signal);
    for line in action_advice(report.technical.signal) {
        let _ = writeln!(out, "  - {}", line);
    }
}

/// 가격 표시 형식. 1 이상은 소수점 2자리, 미만은 6자리.
fn format_price(price: Decimal) -> String {
    if price.abs() >= Decimal::ONE {
        price.to_grouped_string(2)
    } else {
        price.round_half_up(6).normalize().to_string()
    }
}

/// 0~100 값을 20칸 막대로 표시합니다.
fn gauge(value: u8) -> String {
    let filled = usize::from(value.min(100)) / 5;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(20 - filled))
}
