//! Canned Guidance
//!
//! Static educational texts for beginners, risk management and help.

use crate::model::RiskTolerance;

pub fn beginner_guidance(risk: RiskTolerance) -> String {
    let mut s = String::from("Welcome to cryptocurrency investing! Here's what you need to know:\n\n");

    s.push_str("**🎯 Getting Started Steps:**\n");
    s.push_str("1. **Education First** - Understand blockchain technology and crypto basics\n");
    s.push_str("2. **Start Small** - Begin with amounts you can afford to lose completely\n");
    s.push_str("3. **Choose Reputable Exchanges** - Use well-established platforms with good security\n");
    s.push_str("4. **Secure Storage** - Learn about hot vs cold wallets\n");
    s.push_str("5. **Diversify** - Don't put everything in one cryptocurrency\n\n");

    s.push_str(&format!("**📊 For {risk} Investors:**\n"));
    match risk {
        RiskTolerance::Conservative => {
            s.push_str("- Start with Bitcoin and Ethereum (70-80% of crypto allocation)\n");
            s.push_str("- Limit crypto to 5-10% of total portfolio\n");
            s.push_str("- Focus on established cryptocurrencies (top 10 by market cap)\n");
        }
        RiskTolerance::Moderate => {
            s.push_str("- Core holdings: Bitcoin, Ethereum (60-70% of crypto allocation)\n");
            s.push_str("- Add 2-3 alternative cryptocurrencies (20-30%)\n");
            s.push_str("- Limit crypto to 10-20% of total portfolio\n");
        }
        RiskTolerance::Aggressive => {
            s.push_str("- Diversify across 5-8 different cryptocurrencies\n");
            s.push_str("- Include some smaller market cap opportunities\n");
            s.push_str("- Can allocate up to 30% of portfolio to crypto\n");
        }
    }

    s.push_str("\n**⚠️ Essential Reminders:**\n");
    s.push_str("- Never invest borrowed money\n");
    s.push_str("- Don't FOMO (Fear of Missing Out)\n");
    s.push_str("- Set clear entry and exit strategies\n");
    s.push_str("- Consider dollar-cost averaging\n");
    s.push_str("- Keep detailed records for taxes\n");

    s
}

pub fn risk_management_advice() -> &'static str {
    "## ⚖️ Cryptocurrency Risk Management\n\n\
     **🛡️ Essential Risk Management Strategies:**\n\n\
     **1. Position Sizing**\n\
     - Never invest more than you can afford to lose completely\n\
     - Limit crypto to 5-30% of total portfolio (based on risk tolerance)\n\
     - Don't put more than 10% in any single cryptocurrency\n\n\
     **2. Diversification**\n\
     - Spread investments across multiple cryptocurrencies\n\
     - Include different types: store of value (BTC), platforms (ETH), etc.\n\
     - Consider geographic and regulatory diversification\n\n\
     **3. Entry and Exit Strategies**\n\
     - Use dollar-cost averaging for entries\n\
     - Set clear profit-taking levels\n\
     - Implement stop-losses for risk management\n\
     - Have a plan before you invest\n\n\
     **4. Emotional Control**\n\
     - Avoid FOMO (Fear of Missing Out)\n\
     - Don't panic sell during crashes\n\
     - Stick to your predetermined strategy\n\
     - Take breaks from charts and news\n\n\
     **5. Security Measures**\n\
     - Use reputable exchanges with insurance\n\
     - Enable two-factor authentication\n\
     - Consider hardware wallets for large amounts\n\
     - Never share private keys or seed phrases\n\n\
     **6. Regulatory Awareness**\n\
     - Understand tax implications in your jurisdiction\n\
     - Keep detailed transaction records\n\
     - Stay informed about regulatory changes\n\n\
     **⚠️ Red Flags to Avoid:**\n\
     - Guaranteed returns or 'get rich quick' schemes\n\
     - Pressure to invest immediately\n\
     - Unlicensed or suspicious exchanges\n\
     - Projects with anonymous teams\n\
     - Excessive marketing hype without substance\n"
}

pub fn capabilities_help() -> &'static str {
    "I'd be happy to help! Here are some things I can assist you with:\n\n\
     - **Investment Analysis**: Ask about specific cryptocurrencies\n\
     - **Portfolio Recommendations**: Get allocation suggestions\n\
     - **Sustainability Reports**: Learn about eco-friendly cryptos\n\
     - **Market Trends**: Current market analysis\n\
     - **Comparisons**: Compare different cryptocurrencies\n\n\
     Try asking: 'Should I invest in Bitcoin?' or 'Compare Ethereum vs Cardano'"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beginner_guidance_by_risk() {
        assert!(beginner_guidance(RiskTolerance::Conservative).contains("top 10 by market cap"));
        assert!(beginner_guidance(RiskTolerance::Aggressive).contains("For Aggressive Investors"));
    }
}
