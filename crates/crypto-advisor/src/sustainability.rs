//! Sustainability Scoring
//!
//! Static per-asset sustainability profiles and a weighted score over
//! energy efficiency, governance, innovation and transparency.
//!
//! ```text
//! total = energy * 0.40 + governance * 0.30 + innovation * 0.20 + transparency * 0.10
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::model::RiskTolerance;

/// Criteria weights (sum to 1.0)
pub const ENERGY_WEIGHT: f64 = 0.40;
pub const GOVERNANCE_WEIGHT: f64 = 0.30;
pub const INNOVATION_WEIGHT: f64 = 0.20;
pub const TRANSPARENCY_WEIGHT: f64 = 0.10;

/// How a network validates transactions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsensusMechanism {
    ProofOfWork,
    ProofOfStake,
    NominatedProofOfStake,
    PureProofOfStake,
    ProofOfHistory,
    Unknown,
}

impl ConsensusMechanism {
    pub const fn is_proof_of_stake(self) -> bool {
        matches!(
            self,
            Self::ProofOfStake | Self::NominatedProofOfStake | Self::PureProofOfStake
        )
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::ProofOfWork => "Proof Of Work",
            Self::ProofOfStake => "Proof Of Stake",
            Self::NominatedProofOfStake => "Nominated Proof Of Stake",
            Self::PureProofOfStake => "Pure Proof Of Stake",
            Self::ProofOfHistory => "Proof Of History",
            Self::Unknown => "Unknown",
        }
    }

    /// Energy score adjustment for the mechanism
    const fn energy_adjustment(self) -> f64 {
        match self {
            Self::ProofOfStake | Self::NominatedProofOfStake | Self::PureProofOfStake => 15.0,
            Self::ProofOfHistory => 10.0,
            Self::ProofOfWork => -20.0,
            Self::Unknown => 0.0,
        }
    }
}

/// Five-step scale used for energy use, transparency and renewables
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Tier {
    /// Score when higher is better (transparency, renewable usage)
    const fn ascending_score(self) -> f64 {
        match self {
            Self::VeryHigh => 95.0,
            Self::High => 80.0,
            Self::Medium => 60.0,
            Self::Low => 30.0,
            Self::VeryLow => 10.0,
        }
    }

    /// Score when lower is better (energy intensity)
    const fn descending_score(self) -> f64 {
        match self {
            Self::VeryLow => 95.0,
            Self::Low => 80.0,
            Self::Medium => 60.0,
            Self::High => 30.0,
            Self::VeryHigh => 10.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GovernanceModel {
    Democratic,
    Decentralized,
    DeveloperLed,
    FoundationLed,
    Community,
}

impl GovernanceModel {
    const fn score(self) -> f64 {
        match self {
            Self::Democratic => 90.0,
            Self::Decentralized => 80.0,
            Self::Community => 75.0,
            Self::DeveloperLed => 70.0,
            Self::FoundationLed => 60.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Initiatives {
    None,
    Limited,
    Medium,
    Strong,
    VeryStrong,
}

impl Initiatives {
    const fn score(self) -> f64 {
        match self {
            Self::VeryStrong => 95.0,
            Self::Strong => 80.0,
            Self::Medium => 60.0,
            Self::Limited => 30.0,
            Self::None => 10.0,
        }
    }

    const fn is_strong(self) -> bool {
        matches!(self, Self::Strong | Self::VeryStrong)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InnovationFocus {
    Sustainability,
    SmartContracts,
    Interoperability,
    Scaling,
    Performance,
    Oracles,
    StoreOfValue,
    Payments,
    Privacy,
    Meme,
    General,
}

impl InnovationFocus {
    const fn score(self) -> f64 {
        match self {
            Self::Sustainability => 90.0,
            Self::SmartContracts => 85.0,
            Self::Interoperability | Self::Scaling => 80.0,
            Self::Performance | Self::Oracles | Self::Privacy => 75.0,
            Self::StoreOfValue => 70.0,
            Self::Payments => 65.0,
            Self::General => 60.0,
            Self::Meme => 30.0,
        }
    }
}

/// Static sustainability record for one asset
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SustainabilityProfile {
    pub consensus: ConsensusMechanism,
    pub energy_intensity: Tier,
    pub governance: GovernanceModel,
    pub initiatives: Initiatives,
    pub innovation: InnovationFocus,
    pub transparency: Tier,
    pub carbon_neutral_goal: bool,
    pub renewable_energy: Tier,
}

impl SustainabilityProfile {
    /// Profile assumed for assets outside the table
    pub const DEFAULT: Self = Self {
        consensus: ConsensusMechanism::Unknown,
        energy_intensity: Tier::Medium,
        governance: GovernanceModel::Decentralized,
        initiatives: Initiatives::Limited,
        innovation: InnovationFocus::General,
        transparency: Tier::Medium,
        carbon_neutral_goal: false,
        renewable_energy: Tier::Medium,
    };

    fn energy_score(&self) -> f64 {
        let base = self.energy_intensity.descending_score();
        let renewable = self.renewable_energy.ascending_score() * 0.2;
        let carbon = if self.carbon_neutral_goal { 10.0 } else { 0.0 };
        clamp_score(base + renewable + carbon + self.consensus.energy_adjustment())
    }

    fn governance_score(&self) -> f64 {
        let base = self.governance.score();
        let transparency = (self.transparency.ascending_score() - 60.0) * 0.3;
        let initiatives = (self.initiatives.score() - 60.0) * 0.2;
        clamp_score(base + transparency + initiatives)
    }

    fn innovation_score(&self) -> f64 {
        let base = self.innovation.score();
        let environmental = match self.innovation {
            InnovationFocus::Sustainability | InnovationFocus::Scaling => 10.0,
            _ => 0.0,
        };
        let carbon = if self.carbon_neutral_goal { 5.0 } else { 0.0 };
        clamp_score(base + environmental + carbon)
    }

    fn transparency_score(&self) -> f64 {
        let base = self.transparency.ascending_score();
        let initiatives = if self.initiatives.is_strong() { 10.0 } else { 0.0 };
        let governance = if self.governance == GovernanceModel::Democratic { 5.0 } else { 0.0 };
        clamp_score(base + initiatives + governance)
    }

    /// Human-readable highlights
    pub fn key_features(&self) -> Vec<String> {
        let mut features = Vec::new();

        if self.consensus != ConsensusMechanism::Unknown {
            features.push(format!("{} consensus", self.consensus.display_name()));
        }
        if matches!(self.energy_intensity, Tier::VeryLow | Tier::Low) {
            features.push("Energy efficient".into());
        }
        if self.carbon_neutral_goal {
            features.push("Carbon neutral goal".into());
        }
        if matches!(self.renewable_energy, Tier::High | Tier::VeryHigh) {
            features.push("High renewable energy usage".into());
        }
        if self.initiatives.is_strong() {
            features.push("Strong environmental initiatives".into());
        }
        if self.governance == GovernanceModel::Democratic {
            features.push("Democratic governance".into());
        }

        features
    }
}

#[allow(clippy::too_many_arguments)]
const fn profile(
    consensus: ConsensusMechanism,
    energy_intensity: Tier,
    governance: GovernanceModel,
    initiatives: Initiatives,
    innovation: InnovationFocus,
    transparency: Tier,
    carbon_neutral_goal: bool,
    renewable_energy: Tier,
) -> SustainabilityProfile {
    SustainabilityProfile {
        consensus,
        energy_intensity,
        governance,
        initiatives,
        innovation,
        transparency,
        carbon_neutral_goal,
        renewable_energy,
    }
}

/// Look up the static profile for a coin id
pub fn lookup_profile(coin_id: &str) -> Option<SustainabilityProfile> {
    use ConsensusMechanism as C;
    use GovernanceModel as G;
    use InnovationFocus as F;
    use Initiatives as I;

    let p = match coin_id.to_lowercase().as_str() {
        "bitcoin" => profile(C::ProofOfWork, Tier::VeryHigh, G::Decentralized, I::Limited, F::StoreOfValue, Tier::High, false, Tier::Medium),
        "ethereum" => profile(C::ProofOfStake, Tier::Low, G::DeveloperLed, I::Strong, F::SmartContracts, Tier::High, true, Tier::High),
        "cardano" => profile(C::ProofOfStake, Tier::VeryLow, G::Democratic, I::Strong, F::Sustainability, Tier::VeryHigh, true, Tier::VeryHigh),
        "polkadot" => profile(C::NominatedProofOfStake, Tier::VeryLow, G::Democratic, I::Strong, F::Interoperability, Tier::High, true, Tier::High),
        "solana" => profile(C::ProofOfHistory, Tier::Low, G::FoundationLed, I::Medium, F::Performance, Tier::Medium, true, Tier::Medium),
        "chainlink" => profile(C::ProofOfStake, Tier::Low, G::Decentralized, I::Medium, F::Oracles, Tier::Medium, false, Tier::Medium),
        "litecoin" => profile(C::ProofOfWork, Tier::High, G::Decentralized, I::Limited, F::Payments, Tier::Medium, false, Tier::Medium),
        "dogecoin" => profile(C::ProofOfWork, Tier::High, G::Community, I::Limited, F::Meme, Tier::Medium, false, Tier::Low),
        "algorand" => profile(C::PureProofOfStake, Tier::VeryLow, G::Democratic, I::VeryStrong, F::Sustainability, Tier::VeryHigh, true, Tier::VeryHigh),
        "matic-network" => profile(C::ProofOfStake, Tier::Low, G::Democratic, I::Strong, F::Scaling, Tier::High, true, Tier::High),
        _ => return None,
    };

    Some(p)
}

/// Coin ids with a static profile
pub const PROFILED_COINS: &[&str] = &[
    "bitcoin",
    "ethereum",
    "cardano",
    "polkadot",
    "solana",
    "chainlink",
    "litecoin",
    "dogecoin",
    "algorand",
    "matic-network",
];

/// Full score breakdown for one coin
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SustainabilityScore {
    pub coin_id: String,
    pub name: String,
    pub total: f64,
    pub energy_efficiency: f64,
    pub governance: f64,
    pub innovation: f64,
    pub transparency: f64,
    pub key_features: Vec<String>,
    pub carbon_neutral_goal: bool,
    pub consensus: ConsensusMechanism,

    /// False when the default profile stood in for missing data
    pub has_profile: bool,
}

impl SustainabilityScore {
    pub fn consensus_name(&self) -> &'static str {
        self.consensus.display_name()
    }

    pub fn features_summary(&self) -> String {
        if self.key_features.is_empty() {
            "Standard cryptocurrency features".into()
        } else {
            self.key_features.join(", ")
        }
    }

    pub fn badge(&self) -> &'static str {
        sustainability_badge(self.total)
    }
}

/// 🌱 / 🟡 / 🟠 band used in rankings
pub fn sustainability_badge(total: f64) -> &'static str {
    if total >= 70.0 {
        "🌱"
    } else if total >= 50.0 {
        "🟡"
    } else {
        "🟠"
    }
}

/// Per-consensus aggregate in the report
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConsensusSummary {
    pub average_score: f64,
    pub count: usize,
    pub coins: Vec<String>,
}

/// Snapshot of every profiled coin
#[derive(Clone, Debug, Serialize)]
pub struct SustainabilityReport {
    pub generated_at: DateTime<Utc>,
    pub criteria: Vec<(&'static str, f64)>,
    pub total_analyzed: usize,
    pub top_sustainable: Vec<SustainabilityScore>,
    pub consensus_analysis: BTreeMap<String, ConsensusSummary>,
    pub energy_rankings: Vec<SustainabilityScore>,
}

/// Scores coins against the static profile table
#[derive(Clone, Copy, Debug, Default)]
pub struct SustainabilityScorer;

impl SustainabilityScorer {
    pub const fn new() -> Self {
        Self
    }

    /// Score a coin; unknown coins fall back to the default profile
    pub fn score(&self, coin_id: &str) -> SustainabilityScore {
        let known = lookup_profile(coin_id);
        let profile = known.unwrap_or(SustainabilityProfile::DEFAULT);

        let energy = profile.energy_score();
        let governance = profile.governance_score();
        let innovation = profile.innovation_score();
        let transparency = profile.transparency_score();

        let total = energy * ENERGY_WEIGHT
            + governance * GOVERNANCE_WEIGHT
            + innovation * INNOVATION_WEIGHT
            + transparency * TRANSPARENCY_WEIGHT;

        SustainabilityScore {
            coin_id: coin_id.to_lowercase(),
            name: display_name(coin_id),
            total: round1(total),
            energy_efficiency: round1(energy),
            governance: round1(governance),
            innovation: round1(innovation),
            transparency: round1(transparency),
            key_features: profile.key_features(),
            carbon_neutral_goal: profile.carbon_neutral_goal,
            consensus: profile.consensus,
            has_profile: known.is_some(),
        }
    }

    /// Scores sorted best first
    pub fn compare(&self, coin_ids: &[&str]) -> Vec<SustainabilityScore> {
        let mut scores: Vec<_> = coin_ids.iter().map(|id| self.score(id)).collect();
        sort_by_total(&mut scores);
        scores
    }

    /// Sustainability-led picks filtered for a risk tolerance (at most 8)
    pub fn recommendations(&self, risk: RiskTolerance) -> Vec<SustainabilityScore> {
        let scores = self.compare(PROFILED_COINS);

        let picks: Vec<_> = match risk {
            RiskTolerance::Conservative => scores
                .into_iter()
                .filter(|s| {
                    s.total >= 70.0 && matches!(s.coin_id.as_str(), "bitcoin" | "ethereum" | "cardano")
                })
                .collect(),
            RiskTolerance::Moderate => scores.into_iter().filter(|s| s.total >= 60.0).collect(),
            RiskTolerance::Aggressive => scores,
        };

        picks.into_iter().take(8).collect()
    }

    pub fn report(&self) -> SustainabilityReport {
        let all = self.compare(PROFILED_COINS);

        let mut groups: BTreeMap<String, Vec<&SustainabilityScore>> = BTreeMap::new();
        for score in &all {
            groups
                .entry(score.consensus_name().to_string())
                .or_default()
                .push(score);
        }

        let consensus_analysis = groups
            .into_iter()
            .map(|(consensus, members)| {
                let average = members.iter().map(|s| s.total).sum::<f64>() / members.len() as f64;
                let summary = ConsensusSummary {
                    average_score: round1(average),
                    count: members.len(),
                    coins: members.iter().map(|s| s.name.clone()).collect(),
                };
                (consensus, summary)
            })
            .collect();

        let mut energy_rankings = all.clone();
        energy_rankings.sort_by(|a, b| b.energy_efficiency.total_cmp(&a.energy_efficiency));
        energy_rankings.truncate(10);

        SustainabilityReport {
            generated_at: Utc::now(),
            criteria: vec![
                ("energy_efficiency", ENERGY_WEIGHT),
                ("governance", GOVERNANCE_WEIGHT),
                ("innovation", INNOVATION_WEIGHT),
                ("transparency", TRANSPARENCY_WEIGHT),
            ],
            total_analyzed: all.len(),
            top_sustainable: all.iter().take(5).cloned().collect(),
            consensus_analysis,
            energy_rankings,
        }
    }
}

fn sort_by_total(scores: &mut [SustainabilityScore]) {
    scores.sort_by(|a, b| b.total.total_cmp(&a.total));
}

fn display_name(coin_id: &str) -> String {
    if let Some(coin) = catalog::resolve(coin_id) {
        return coin.name.to_string();
    }

    // Title-case the id: "shiba-inu" -> "Shiba-Inu"
    let mut name = String::with_capacity(coin_id.len());
    let mut upper = true;
    for c in coin_id.chars() {
        if upper {
            name.extend(c.to_uppercase());
        } else {
            name.extend(c.to_lowercase());
        }
        upper = !c.is_alphanumeric();
    }
    name
}

fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 100.0)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
