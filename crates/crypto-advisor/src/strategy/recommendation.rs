//! Rules Engine
//!
//! Combines market data, technical metrics and the sustainability score into
//! a recommendation label, two sub-scores and a canned explanation.

use crate::analysis::{RsiSignal, TechnicalMetrics};
use crate::model::{CryptoAsset, Recommendation, RecommendationLabel, RiskProfile, RiskTolerance};
use crate::sustainability::SustainabilityScore;

/// Rule-based recommendation engine for one risk profile
#[derive(Clone, Debug)]
pub struct RulesEngine {
    profile: RiskProfile,
}

impl Default for RulesEngine {
    fn default() -> Self {
        Self::new(RiskProfile::default())
    }
}

impl RulesEngine {
    pub const fn new(profile: RiskProfile) -> Self {
        Self { profile }
    }

    pub fn for_tolerance(tolerance: RiskTolerance) -> Self {
        Self::new(tolerance.profile())
    }

    pub const fn profile(&self) -> &RiskProfile {
        &self.profile
    }

    /// Evaluate one asset
    pub fn recommend(
        &self,
        asset: &CryptoAsset,
        metrics: &TechnicalMetrics,
        sustainability: &SustainabilityScore,
    ) -> Recommendation {
        let label = self.label(asset, metrics, sustainability);
        let profitability = self.profitability_score(asset, metrics);
        let combined = self.profile.profitability_weight * profitability
            + self.profile.sustainability_weight * sustainability.total;

        Recommendation {
            coin_id: asset.id.clone(),
            label,
            profitability_score: round1(profitability),
            sustainability_score: sustainability.total,
            combined_score: round1(combined),
            has_sustainability_data: sustainability.has_profile,
            explanation: self.explain(label, asset, metrics, sustainability),
        }
    }

    /// Label chain: volatility gate first, then market position and momentum
    pub fn label(
        &self,
        asset: &CryptoAsset,
        metrics: &TechnicalMetrics,
        sustainability: &SustainabilityScore,
    ) -> RecommendationLabel {
        use RecommendationLabel as L;

        let change = asset.change_24h;

        if metrics.volatility > self.profile.max_volatility {
            if !sustainability.has_profile {
                return L::Avoid;
            }
            if self.profile.tolerance == RiskTolerance::Aggressive && change > 15.0 {
                return L::SpeculativeBuy;
            }
            return L::Caution;
        }

        let rank = asset.effective_rank();
        let label = if rank <= 10 {
            if change > 5.0 {
                L::StrongBuy
            } else if change > 0.0 {
                L::Buy
            } else if change > -5.0 {
                L::Hold
            } else {
                L::Caution
            }
        } else if rank <= 25 {
            if change > 10.0 {
                L::Buy
            } else if change > 0.0 {
                L::Consider
            } else {
                L::Hold
            }
        } else if change > 15.0 {
            L::SpeculativeBuy
        } else if change > 0.0 && sustainability.total >= 70.0 {
            L::Consider
        } else {
            L::Avoid
        };

        // Rising proof-of-stake assets are never pushed below Consider
        if change > 0.0 && sustainability.consensus.is_proof_of_stake() && !label.is_positive() {
            return L::Consider;
        }

        label
    }

    /// Price-trend score in 0..=100, 50 is neutral
    pub fn profitability_score(&self, asset: &CryptoAsset, metrics: &TechnicalMetrics) -> f64 {
        let mut score = 50.0;

        score += (asset.change_24h * 2.0).clamp(-20.0, 20.0);
        score += asset.change_7d.clamp(-15.0, 15.0);

        let rank = asset.effective_rank();
        if rank <= 10 {
            score += 10.0;
        } else if rank <= 25 {
            score += 5.0;
        } else if rank > 50 {
            score -= 10.0;
        }

        if metrics.volatility > self.profile.max_volatility {
            score -= 15.0;
        } else if metrics.volatility < self.profile.max_volatility / 2.0 {
            score += 5.0;
        }

        match metrics.rsi_signal() {
            RsiSignal::Oversold => score += 5.0,
            RsiSignal::Overbought => score -= 5.0,
            RsiSignal::Neutral => {}
        }

        score.clamp(0.0, 100.0)
    }

    fn explain(
        &self,
        label: RecommendationLabel,
        asset: &CryptoAsset,
        metrics: &TechnicalMetrics,
        sustainability: &SustainabilityScore,
    ) -> String {
        let mut s = format!(
            "{} {} - {}. ",
            label.indicator(),
            label,
            label_reason(label, asset.effective_rank() <= 10)
        );

        s.push_str(&format!(
            "{} is ranked #{} and moved {:+.2}% in 24h. ",
            asset.name,
            asset.effective_rank(),
            asset.change_24h
        ));

        let tolerance = self.profile.tolerance.as_str().to_lowercase();
        if metrics.volatility > self.profile.max_volatility {
            s.push_str(&format!(
                "Volatility of {:.1}% exceeds the {:.0}% ceiling for a {tolerance} profile. ",
                metrics.volatility, self.profile.max_volatility
            ));
        } else {
            s.push_str(&format!(
                "Volatility of {:.1}% is within the {:.0}% ceiling for a {tolerance} profile. ",
                metrics.volatility, self.profile.max_volatility
            ));
        }

        if sustainability.has_profile {
            s.push_str(&format!(
                "Sustainability score is {:.1}/100 ({} consensus).",
                sustainability.total,
                sustainability.consensus_name()
            ));
        } else {
            s.push_str("No sustainability data is available for this asset.");
        }

        s
    }
}

fn label_reason(label: RecommendationLabel, top_ten: bool) -> &'static str {
    use RecommendationLabel as L;

    match (label, top_ten) {
        (L::StrongBuy, _) => "Top crypto with positive momentum",
        (L::Buy, true) => "Stable top crypto showing growth",
        (L::Buy, false) => "Strong momentum in established crypto",
        (L::Consider, _) => "Positive movement worth a closer look",
        (L::SpeculativeBuy, _) => "High risk, high reward potential",
        (L::Hold, true) => "Top crypto with minor decline",
        (L::Hold, false) => "Established crypto under pressure",
        (L::Caution, _) => "Risk currently outweighs the upside",
        (L::Avoid, _) => "High risk with limited upside",
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sustainability::SustainabilityScorer;
    use rust_decimal_macros::dec;

    fn asset(id: &str, rank: u32, change_24h: f64) -> CryptoAsset {
        CryptoAsset::new(id, id, id, dec!(10))
            .with_rank(rank)
            .with_changes(change_24h, 0.0, 0.0)
    }

    fn metrics(volatility: f64) -> TechnicalMetrics {
        TechnicalMetrics {
            volatility,
            rsi: 50.0,
            ..TechnicalMetrics::default()
        }
    }

    #[test]
    fn test_rising_proof_of_stake_is_positive() {
        let scorer = SustainabilityScorer::new();
        for tolerance in RiskTolerance::ALL {
            let engine = RulesEngine::for_tolerance(tolerance);
            // Top ten, mid cap and small cap
            for (id, rank) in [("cardano", 9), ("polkadot", 14), ("algorand", 60)] {
                let rec = engine.recommend(&asset(id, rank, 2.0), &metrics(5.0), &scorer.score(id));
                assert!(rec.label.is_positive(), "{id} ({tolerance}) got {}", rec.label);
            }
        }
    }

    #[test]
    fn test_high_volatility_without_profile() {
        let scorer = SustainabilityScorer::new();
        let sust = scorer.score("mystery-coin");
        for tolerance in RiskTolerance::ALL {
            let engine = RulesEngine::for_tolerance(tolerance);
            let label = engine.label(&asset("mystery-coin", 80, 30.0), &metrics(80.0), &sust);
            assert!(matches!(label, RecommendationLabel::Avoid | RecommendationLabel::Caution));
        }
    }

    #[test]
    fn test_volatility_gate() {
        let scorer = SustainabilityScorer::new();
        let doge = scorer.score("dogecoin");

        let conservative = RulesEngine::for_tolerance(RiskTolerance::Conservative);
        assert_eq!(
            conservative.label(&asset("dogecoin", 8, 20.0), &metrics(20.0), &doge),
            RecommendationLabel::Caution
        );

        let aggressive = RulesEngine::for_tolerance(RiskTolerance::Aggressive);
        assert_eq!(
            aggressive.label(&asset("dogecoin", 8, 20.0), &metrics(60.0), &doge),
            RecommendationLabel::SpeculativeBuy
        );
    }

    #[test]
    fn test_rank_chain() {
        let scorer = SustainabilityScorer::new();
        let btc = scorer.score("bitcoin");
        let engine = RulesEngine::default();

        let label = |rank, change| engine.label(&asset("bitcoin", rank, change), &metrics(5.0), &btc);
        assert_eq!(label(1, 6.0), RecommendationLabel::StrongBuy);
        assert_eq!(label(1, 1.0), RecommendationLabel::Buy);
        assert_eq!(label(1, -2.0), RecommendationLabel::Hold);
        assert_eq!(label(1, -8.0), RecommendationLabel::Caution);
        assert_eq!(label(20, 12.0), RecommendationLabel::Buy);
        assert_eq!(label(20, 1.0), RecommendationLabel::Consider);
        assert_eq!(label(20, -1.0), RecommendationLabel::Hold);
        assert_eq!(label(40, 20.0), RecommendationLabel::SpeculativeBuy);
        // Proof of work, low sustainability
        assert_eq!(label(40, 5.0), RecommendationLabel::Avoid);
    }

    #[test]
    fn test_scores_and_explanation() {
        let scorer = SustainabilityScorer::new();
        let engine = RulesEngine::for_tolerance(RiskTolerance::Conservative);
        let rec = engine.recommend(&asset("ethereum", 2, 3.0), &metrics(5.0), &scorer.score("ethereum"));

        assert!((0.0..=100.0).contains(&rec.profitability_score));
        let expected = 0.6 * rec.profitability_score + 0.4 * rec.sustainability_score;
        assert!((rec.combined_score - expected).abs() < 0.1);
        assert!(rec.has_sustainability_data);
        assert!(rec.explanation.contains("within the 15% ceiling"));
        assert!(rec.explanation.contains("Proof Of Stake"));
    }

    #[test]
    fn test_profitability_bounds() {
        let engine = RulesEngine::default();
        let hot = asset("x", 1, 50.0).with_changes(50.0, 50.0, 0.0);
        assert!(engine.profitability_score(&hot, &metrics(1.0)) <= 100.0);
        let cold = asset("x", 90, -50.0).with_changes(-50.0, -50.0, 0.0);
        assert_eq!(engine.profitability_score(&cold, &metrics(99.0)), 0.0);
    }
}
