//! Price Analysis
//!
//! Elementary statistics over a fetched price series: moving averages,
//! percent change, volatility, RSI, momentum and the recent trading range.

use serde::{Deserialize, Serialize};

use crate::model::{PriceHistory, PricePoint};

/// Default RSI lookback
pub const RSI_PERIOD: usize = 14;

/// Simple moving average aligned with the input; `None` until the window fills
pub fn simple_moving_average(prices: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; prices.len()];
    }

    let mut out = Vec::with_capacity(prices.len());
    let mut sum = 0.0;

    for (i, price) in prices.iter().enumerate() {
        sum += price;
        if i >= window {
            sum -= prices[i - window];
        }
        if i + 1 >= window {
            out.push(Some(sum / window as f64));
        } else {
            out.push(None);
        }
    }

    out
}

/// First-to-last change in percent
pub fn percent_change(prices: &[f64]) -> f64 {
    match (prices.first(), prices.last()) {
        (Some(&first), Some(&last)) if prices.len() >= 2 && first != 0.0 => {
            (last - first) / first * 100.0
        }
        _ => 0.0,
    }
}

/// Population standard deviation of period-over-period returns, in percent
pub fn volatility(prices: &[f64]) -> f64 {
    let returns: Vec<f64> = prices
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0])
        .collect();

    if returns.is_empty() {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;

    variance.sqrt() * 100.0
}

/// Relative Strength Index over the last `period` changes.
/// Neutral 50 with too little data, 100 when there were no losses.
pub fn rsi(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() < period + 1 {
        return 50.0;
    }

    let changes: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let recent = &changes[changes.len() - period..];

    let avg_gain = recent.iter().filter(|c| **c > 0.0).sum::<f64>() / period as f64;
    let avg_loss = recent.iter().filter(|c| **c < 0.0).map(|c| c.abs()).sum::<f64>() / period as f64;

    if avg_loss == 0.0 {
        return 100.0;
    }

    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Percent change across the trailing `days` periods of a daily series
pub fn momentum(history: &PriceHistory, days: usize) -> f64 {
    let window: Vec<f64> = history.tail(days + 1).iter().map(|p| p.price).collect();
    percent_change(&window)
}

/// Overall risk bucket derived from volatility
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_volatility(volatility: f64) -> Self {
        if volatility > 30.0 {
            Self::High
        } else if volatility > 20.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// RSI interpretation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsiSignal {
    Oversold,
    Neutral,
    Overbought,
}

impl RsiSignal {
    pub fn from_rsi(rsi: f64) -> Self {
        if rsi < 30.0 {
            Self::Oversold
        } else if rsi > 70.0 {
            Self::Overbought
        } else {
            Self::Neutral
        }
    }
}

/// Indicators derived from one coin's recent history
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TechnicalMetrics {
    pub current_price: f64,
    pub high: f64,
    pub low: f64,

    /// Where the current price sits between low (0) and high (100)
    pub range_position: f64,

    pub volatility: f64,
    pub rsi: f64,
    pub momentum_7d: f64,
    pub momentum_30d: f64,

    /// Just under the recent high
    pub resistance: f64,

    /// Just over the recent low
    pub support: f64,

    /// Number of price points the metrics were computed from
    pub sample_size: usize,
}

impl TechnicalMetrics {
    /// Neutral readings used when no history is available
    pub fn neutral() -> Self {
        Self {
            rsi: 50.0,
            range_position: 50.0,
            ..Self::default()
        }
    }

    pub fn from_history(history: &PriceHistory) -> Self {
        let prices = history.prices();
        if prices.is_empty() {
            return Self::neutral();
        }

        let current_price = prices[prices.len() - 1];
        let high = prices.iter().copied().fold(f64::MIN, f64::max);
        let low = prices.iter().copied().fold(f64::MAX, f64::min);
        let range_position = if high > low {
            (current_price - low) / (high - low) * 100.0
        } else {
            50.0
        };

        Self {
            current_price,
            high,
            low,
            range_position,
            volatility: volatility(&prices),
            rsi: rsi(&prices, RSI_PERIOD),
            momentum_7d: momentum(history, 7),
            momentum_30d: momentum(history, 30),
            resistance: high * 0.95,
            support: low * 1.05,
            sample_size: prices.len(),
        }
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_volatility(self.volatility)
    }

    pub fn rsi_signal(&self) -> RsiSignal {
        RsiSignal::from_rsi(self.rsi)
    }

    /// Notable conditions worth calling out to the user
    pub fn key_signals(&self) -> Vec<&'static str> {
        let mut signals = Vec::new();

        match self.rsi_signal() {
            RsiSignal::Oversold => signals.push("Oversold condition (bullish)"),
            RsiSignal::Overbought => signals.push("Overbought condition (bearish)"),
            RsiSignal::Neutral => {}
        }

        if self.momentum_7d > 5.0 {
            signals.push("Strong short-term momentum (bullish)");
        } else if self.momentum_7d < -5.0 {
            signals.push("Weak short-term momentum (bearish)");
        }

        if self.volatility > 30.0 {
            signals.push("High volatility (increased risk)");
        } else if self.volatility < 15.0 {
            signals.push("Low volatility (stable conditions)");
        }

        signals
    }
}

/// Price series plus overlays for the dashboard charts
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChartSeries {
    pub coin_id: String,
    pub days: u32,
    pub points: Vec<PricePoint>,

    /// 7-point moving average
    pub sma_short: Vec<Option<f64>>,

    /// 30-point moving average
    pub sma_long: Vec<Option<f64>>,

    pub percent_change: f64,
    pub volatility: f64,
}

impl ChartSeries {
    pub const SHORT_WINDOW: usize = 7;
    pub const LONG_WINDOW: usize = 30;

    pub fn from_history(history: &PriceHistory) -> Self {
        let prices = history.prices();
        Self {
            coin_id: history.coin_id.clone(),
            days: history.days,
            points: history.points.clone(),
            sma_short: simple_moving_average(&prices, Self::SHORT_WINDOW),
            sma_long: simple_moving_average(&prices, Self::LONG_WINDOW),
            percent_change: percent_change(&prices),
            volatility: volatility(&prices),
        }
    }
}
