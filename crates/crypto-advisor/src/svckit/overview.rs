//! Market Overview
//!
//! Sentiment and dominance readings over global market statistics.

use serde::Serialize;

use crate::model::MarketOverview;

/// Market mood from the 24h market cap change
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MarketSentiment {
    VeryBullish,
    Bullish,
    Neutral,
    Bearish,
    VeryBearish,
}

impl MarketSentiment {
    pub fn from_change(change_24h: f64) -> Self {
        if change_24h > 3.0 {
            Self::VeryBullish
        } else if change_24h > 1.0 {
            Self::Bullish
        } else if change_24h > -1.0 {
            Self::Neutral
        } else if change_24h > -3.0 {
            Self::Bearish
        } else {
            Self::VeryBearish
        }
    }

    pub const fn describe(self) -> &'static str {
        match self {
            Self::VeryBullish => "🟢 **Very Bullish** - Strong market optimism",
            Self::Bullish => "🟢 **Bullish** - Positive market sentiment",
            Self::Neutral => "🟡 **Neutral** - Balanced market conditions",
            Self::Bearish => "🟠 **Bearish** - Market showing caution",
            Self::VeryBearish => "🔴 **Very Bearish** - Strong selling pressure",
        }
    }
}

/// Which side of the market is leading, from BTC dominance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DominanceRegime {
    BitcoinSeason,
    Balanced,
    AltcoinSeason,
}

impl DominanceRegime {
    pub fn from_dominance(btc_dominance: f64) -> Self {
        if btc_dominance > 50.0 {
            Self::BitcoinSeason
        } else if btc_dominance > 40.0 {
            Self::Balanced
        } else {
            Self::AltcoinSeason
        }
    }

    pub const fn describe(self) -> &'static str {
        match self {
            Self::BitcoinSeason => "Bitcoin maintains strong dominance - 'Bitcoin season'",
            Self::Balanced => "Moderate Bitcoin dominance - balanced crypto market",
            Self::AltcoinSeason => "Low Bitcoin dominance - 'Altcoin season' potential",
        }
    }
}

pub fn render_overview(overview: &MarketOverview) -> String {
    let sentiment = MarketSentiment::from_change(overview.market_cap_change_24h);
    let dominance = DominanceRegime::from_dominance(overview.btc_dominance);

    let mut s = String::from("**🌍 Current Market Overview:**\n\n");
    s.push_str(&format!("**Total Market Cap:** ${:.1}B\n", overview.total_market_cap_billions));
    s.push_str(&format!("**24h Volume:** ${:.1}B\n", overview.total_volume_billions));
    s.push_str(&format!("**24h Market Change:** {:+.2}%\n", overview.market_cap_change_24h));
    s.push_str(&format!("**Bitcoin Dominance:** {:.1}%\n\n", overview.btc_dominance));

    s.push_str(&format!("**Market Sentiment:** {}\n\n", sentiment.describe()));
    s.push_str(&format!("**Dominance Analysis:** {}\n\n", dominance.describe()));

    s.push_str("**Investment Implications:**\n");
    if overview.market_cap_change_24h > 0.0 {
        s.push_str("- Positive momentum may continue in short term\n");
        s.push_str("- Consider taking some profits if heavily invested\n");
        s.push_str("- Good time for cost averaging if underinvested\n");
    } else {
        s.push_str("- Market correction may present buying opportunities\n");
        s.push_str("- Focus on fundamentally strong projects\n");
        s.push_str("- Consider increasing positions gradually\n");
    }

    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_bands() {
        assert_eq!(MarketSentiment::from_change(3.5), MarketSentiment::VeryBullish);
        assert_eq!(MarketSentiment::from_change(1.5), MarketSentiment::Bullish);
        assert_eq!(MarketSentiment::from_change(0.0), MarketSentiment::Neutral);
        assert_eq!(MarketSentiment::from_change(-2.0), MarketSentiment::Bearish);
        assert_eq!(MarketSentiment::from_change(-3.0), MarketSentiment::VeryBearish);
    }

    #[test]
    fn test_dominance_bands() {
        assert_eq!(DominanceRegime::from_dominance(56.0), DominanceRegime::BitcoinSeason);
        assert_eq!(DominanceRegime::from_dominance(45.0), DominanceRegime::Balanced);
        assert_eq!(DominanceRegime::from_dominance(40.0), DominanceRegime::AltcoinSeason);
    }

    #[test]
    fn test_render() {
        let overview = MarketOverview {
            total_market_cap_billions: 2500.0,
            market_cap_change_24h: -4.2,
            btc_dominance: 38.0,
            ..MarketOverview::default()
        };
        let md = render_overview(&overview);
        assert!(md.contains("$2500.0B"));
        assert!(md.contains("Very Bearish"));
        assert!(md.contains("Altcoin season"));
        assert!(md.contains("Market correction may present buying opportunities"));
    }
}
