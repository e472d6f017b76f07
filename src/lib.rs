pub mod advisory;
pub mod config;
pub mod error;
pub mod ideas;
pub mod scoring;
pub mod store;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub use crate::advisory::advise;
pub use crate::error::{SimError, SimResult};
pub use crate::scoring::{compose, FixedJitter, JitterSource, RngJitter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl RiskCategory {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "low" => Some(RiskCategory::Low),
            "medium" | "med" => Some(RiskCategory::Medium),
            "high" => Some(RiskCategory::High),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskCategory::Low => "low",
            RiskCategory::Medium => "medium",
            RiskCategory::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketingChannel {
    Organic,
    Ads,
    Hybrid,
}

impl MarketingChannel {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "organic" => Some(MarketingChannel::Organic),
            "ads" | "paid" => Some(MarketingChannel::Ads),
            "hybrid" | "mixed" => Some(MarketingChannel::Hybrid),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MarketingChannel::Organic => "organic",
            MarketingChannel::Ads => "ads",
            MarketingChannel::Hybrid => "hybrid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamRole {
    Dev,
    Designer,
    Marketing,
    Advisor,
}

impl TeamRole {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "dev" | "developer" => Some(TeamRole::Dev),
            "designer" | "design" => Some(TeamRole::Designer),
            "marketing" | "marketer" => Some(TeamRole::Marketing),
            "advisor" | "mentor" => Some(TeamRole::Advisor),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TeamRole::Dev => "dev",
            TeamRole::Designer => "designer",
            TeamRole::Marketing => "marketing",
            TeamRole::Advisor => "advisor",
        }
    }
}

/// Percentage split of the budget. Values are taken as given, never normalised.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    #[serde(rename = "dev")]
    pub dev_pct: f64,
    #[serde(rename = "mkt")]
    pub mkt_pct: f64,
    #[serde(rename = "ops")]
    pub ops_pct: f64,
}

impl Allocation {
    pub fn new(dev_pct: f64, mkt_pct: f64, ops_pct: f64) -> Self {
        Self {
            dev_pct,
            mkt_pct,
            ops_pct,
        }
    }

    pub fn total(&self) -> f64 {
        self.dev_pct + self.mkt_pct + self.ops_pct
    }
}

impl Default for Allocation {
    fn default() -> Self {
        Self::new(40.0, 35.0, 25.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationInput {
    pub idea_id: String,
    pub idea_risk: RiskCategory,
    pub idea_market: String,
    pub budget: f64,
    pub allocation: Allocation,
    pub team: BTreeSet<TeamRole>,
    pub marketing: MarketingChannel,
}

impl SimulationInput {
    pub fn validate(&self) -> SimResult<()> {
        if self.idea_id.trim().is_empty() {
            return Err(SimError::invalid("no idea selected"));
        }
        if !self.budget.is_finite() || self.budget <= 0.0 {
            return Err(SimError::invalid(format!(
                "budget must be a positive number, got {}",
                self.budget
            )));
        }
        let shares = [
            ("dev", self.allocation.dev_pct),
            ("mkt", self.allocation.mkt_pct),
            ("ops", self.allocation.ops_pct),
        ];
        for (name, value) in shares {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(SimError::invalid(format!(
                    "{} allocation must be within 0-100, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    pub fn is_tech_or_edu(&self) -> bool {
        matches!(
            self.idea_market.trim().to_lowercase().as_str(),
            "tech" | "edu"
        )
    }
}

pub const IDEA_FIT_LABEL: &str = "Idea Fit";
pub const BUDGET_STRENGTH_LABEL: &str = "Budget Strength";
pub const TEAM_STRENGTH_LABEL: &str = "Team Strength";
pub const ALLOCATION_FITNESS_LABEL: &str = "Allocation Fitness";
pub const MARKETING_PLAN_LABEL: &str = "Marketing Plan";

/// One labelled sub-score, the shape a breakdown takes on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub label: String,
    pub value: i32,
}

/// The five un-jittered sub-scores, always reported in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<BreakdownEntry>", try_from = "Vec<BreakdownEntry>")]
pub struct ScoreBreakdown {
    pub idea_fit: i32,
    pub budget_strength: i32,
    pub team_strength: i32,
    pub allocation_fitness: i32,
    pub marketing_plan: i32,
}

impl ScoreBreakdown {
    pub fn entries(&self) -> [(&'static str, i32); 5] {
        [
            (IDEA_FIT_LABEL, self.idea_fit),
            (BUDGET_STRENGTH_LABEL, self.budget_strength),
            (TEAM_STRENGTH_LABEL, self.team_strength),
            (ALLOCATION_FITNESS_LABEL, self.allocation_fitness),
            (MARKETING_PLAN_LABEL, self.marketing_plan),
        ]
    }

    pub fn total(&self) -> i32 {
        self.entries().iter().map(|(_, value)| value).sum()
    }
}

impl From<ScoreBreakdown> for Vec<BreakdownEntry> {
    fn from(breakdown: ScoreBreakdown) -> Self {
        breakdown
            .entries()
            .into_iter()
            .map(|(label, value)| BreakdownEntry {
                label: label.to_string(),
                value,
            })
            .collect()
    }
}

impl TryFrom<Vec<BreakdownEntry>> for ScoreBreakdown {
    type Error = String;

    fn try_from(entries: Vec<BreakdownEntry>) -> Result<Self, Self::Error> {
        let labels: Vec<&str> = entries.iter().map(|entry| entry.label.as_str()).collect();
        let expected = [
            IDEA_FIT_LABEL,
            BUDGET_STRENGTH_LABEL,
            TEAM_STRENGTH_LABEL,
            ALLOCATION_FITNESS_LABEL,
            MARKETING_PLAN_LABEL,
        ];
        if labels != expected {
            return Err(format!("unexpected breakdown labels: {:?}", labels));
        }
        Ok(Self {
            idea_fit: entries[0].value,
            budget_strength: entries[1].value,
            team_strength: entries[2].value,
            allocation_fitness: entries[3].value,
            marketing_plan: entries[4].value,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    #[serde(rename = "score")]
    pub composite_score: u32,
    pub breakdown: ScoreBreakdown,
    pub tips: Vec<String>,
}

impl SimulationResult {
    pub fn tier(&self) -> ViabilityTier {
        ViabilityTier::from_score(self.composite_score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViabilityTier {
    HighRisk,
    Promising,
    EarlyTraction,
}

impl ViabilityTier {
    pub fn from_score(score: u32) -> Self {
        if score > 75 {
            ViabilityTier::EarlyTraction
        } else if score > 50 {
            ViabilityTier::Promising
        } else {
            ViabilityTier::HighRisk
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViabilityTier::HighRisk => "High risk, iterate and validate",
            ViabilityTier::Promising => "Promising, needs validation",
            ViabilityTier::EarlyTraction => "High chance of early traction",
        }
    }
}

pub fn format_number(value: f64) -> String {
    let rounded = value.round().max(0.0) as i64;
    let mut chars: Vec<char> = rounded.to_string().chars().collect();
    let mut result = String::new();
    let mut count = 0usize;

    while let Some(ch) = chars.pop() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(ch);
        count += 1;
    }

    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_number_groups_thousands() {
        assert_eq!(format_number(50_000.0), "50,000");
        assert_eq!(format_number(999.4), "999");
        assert_eq!(format_number(1_234_567.0), "1,234,567");
    }

    #[test]
    fn tier_thresholds_follow_verdict_bands() {
        assert_eq!(ViabilityTier::from_score(50), ViabilityTier::HighRisk);
        assert_eq!(ViabilityTier::from_score(51), ViabilityTier::Promising);
        assert_eq!(ViabilityTier::from_score(75), ViabilityTier::Promising);
        assert_eq!(ViabilityTier::from_score(76), ViabilityTier::EarlyTraction);
    }

    #[test]
    fn breakdown_serializes_as_labelled_list() {
        let breakdown = ScoreBreakdown {
            idea_fit: 14,
            budget_strength: 28,
            team_strength: 20,
            allocation_fitness: -3,
            marketing_plan: 12,
        };
        let value = serde_json::to_value(breakdown).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {"label": "Idea Fit", "value": 14},
                {"label": "Budget Strength", "value": 28},
                {"label": "Team Strength", "value": 20},
                {"label": "Allocation Fitness", "value": -3},
                {"label": "Marketing Plan", "value": 12},
            ])
        );
        let back: ScoreBreakdown = serde_json::from_value(value).unwrap();
        assert_eq!(back, breakdown);
    }

    #[test]
    fn breakdown_rejects_reordered_labels() {
        let value = serde_json::json!([
            {"label": "Budget Strength", "value": 28},
            {"label": "Idea Fit", "value": 14},
        ]);
        assert!(serde_json::from_value::<ScoreBreakdown>(value).is_err());
    }

    #[test]
    fn team_roles_collapse_duplicates() {
        let team: BTreeSet<TeamRole> = ["dev", "developer", "marketing"]
            .iter()
            .filter_map(|value| TeamRole::from_str(value))
            .collect();
        assert_eq!(team.len(), 2);
    }
}
