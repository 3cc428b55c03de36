//! Sustainability Reports
//!
//! Markdown renderings of sustainability scores and the full report.

use crate::sustainability::{SustainabilityReport, SustainabilityScore};

/// Per-coin breakdown
pub fn render_scores(scores: &[SustainabilityScore]) -> String {
    let mut s = String::from("## 🌱 Sustainability Analysis\n\n");

    for score in scores {
        s.push_str(&format!("### {}\n", score.name));
        if !score.has_profile {
            s.push_str("_No sustainability profile on file; default assumptions applied._\n");
        }
        s.push_str(&format!("- **Overall Sustainability Score: {}/100**\n", score.total));
        s.push_str(&format!("- Energy Efficiency: {}/100\n", score.energy_efficiency));
        s.push_str(&format!("- Governance: {}/100\n", score.governance));
        s.push_str(&format!("- Innovation: {}/100\n", score.innovation));
        s.push_str(&format!("- Transparency: {}/100\n", score.transparency));
        s.push_str(&format!("- Consensus: {}\n", score.consensus_name()));
        s.push_str(&format!("- Key Features: {}\n\n", score.features_summary()));
    }

    s
}

pub fn render_report(report: &SustainabilityReport) -> String {
    let mut s = String::from("## 🌍 Cryptocurrency Sustainability Report\n\n");

    s.push_str("**Methodology:**\n");
    for (criterion, weight) in &report.criteria {
        s.push_str(&format!("- {}: {:.0}%\n", criterion.replace('_', " "), weight * 100.0));
    }
    s.push_str(&format!("\n**Coins analyzed:** {}\n\n", report.total_analyzed));

    s.push_str("**🏆 Most Sustainable:**\n");
    for (i, score) in report.top_sustainable.iter().enumerate() {
        s.push_str(&format!("{}. {} - {}/100 {}\n", i + 1, score.name, score.total, score.badge()));
    }

    s.push_str("\n**By Consensus Mechanism:**\n");
    for (consensus, summary) in &report.consensus_analysis {
        s.push_str(&format!(
            "- {consensus}: average {:.1}/100 across {} ({})\n",
            summary.average_score,
            summary.count,
            summary.coins.join(", ")
        ));
    }

    s.push_str("\n**⚡ Energy Efficiency Ranking:**\n");
    for (i, score) in report.energy_rankings.iter().enumerate() {
        s.push_str(&format!("{}. {} - {}/100\n", i + 1, score.name, score.energy_efficiency));
    }

    s
}

/// General background when no coin was named
pub fn general_sustainability_info() -> &'static str {
    "**🌱 Cryptocurrency Sustainability Overview:**\n\n\
     **Energy Consumption Concerns:**\n\
     - Proof-of-Work cryptocurrencies (like Bitcoin) require significant energy\n\
     - Mining operations contribute to carbon emissions\n\
     - Environmental impact varies by energy source used\n\n\
     **Sustainable Alternatives:**\n\
     - **Proof-of-Stake (PoS)** - 99% less energy than PoW\n\
     - Examples: Ethereum, Cardano, Polkadot, Algorand\n\
     - **Delegated Proof-of-Stake (DPoS)** - Even more efficient\n\n\
     **🏆 Most Sustainable Cryptocurrencies:**\n\
     1. **Cardano (ADA)** - Research-driven PoS blockchain\n\
     2. **Polkadot (DOT)** - Interoperable PoS network\n\
     3. **Solana (SOL)** - High-performance blockchain\n\
     4. **Algorand (ALGO)** - Carbon-negative blockchain\n\
     5. **Ethereum (ETH)** - Transitioned to PoS in 2022\n\n\
     **Sustainability Factors to Consider:**\n\
     - **Consensus Mechanism** - PoS vs PoW energy usage\n\
     - **Carbon Footprint** - Direct and indirect emissions\n\
     - **Governance** - Environmental responsibility initiatives\n\
     - **Innovation** - Green technology development\n\
     - **Transparency** - Environmental impact reporting\n\n\
     **Making Sustainable Choices:**\n\
     - Prioritize PoS cryptocurrencies\n\
     - Research projects' environmental initiatives\n\
     - Consider carbon offset programs\n\
     - Support renewable energy mining operations\n"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sustainability::SustainabilityScorer;

    #[test]
    fn test_render_scores() {
        let scores = SustainabilityScorer::new().compare(&["cardano", "unknown-coin"]);
        let md = render_scores(&scores);
        assert!(md.contains("### Cardano"));
        assert!(md.contains("Democratic governance"));
        assert!(md.contains("default assumptions applied"));
    }

    #[test]
    fn test_render_report() {
        let report = SustainabilityScorer::new().report();
        let md = render_report(&report);
        assert!(md.contains("- energy efficiency: 40%"));
        assert!(md.contains("Proof Of Work: average"));
        assert!(md.contains("⚡ Energy Efficiency Ranking"));
    }
}
