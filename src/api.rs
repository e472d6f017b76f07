use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use venture_sim::ideas::IdeaCatalog;
use venture_sim::store::Scenario;
use venture_sim::{
    Allocation, BreakdownEntry, MarketingChannel, SimError, SimResult, SimulationInput,
    SimulationResult, TeamRole,
};

/// Raw form fields as posted by the page. Missing numbers are rejected,
/// never read as zero.
#[derive(Debug, Deserialize)]
pub struct ApiSimulationRequest {
    pub idea: Option<String>,
    pub budget: Option<f64>,
    pub dev: Option<f64>,
    pub mkt: Option<f64>,
    pub ops: Option<f64>,
    pub team: Option<Vec<String>>,
    pub marketing: Option<String>,
    pub save: Option<bool>,
}

impl ApiSimulationRequest {
    pub fn into_input(self, catalog: &IdeaCatalog) -> SimResult<SimulationInput> {
        let idea = self.idea.unwrap_or_default();
        let budget = self
            .budget
            .ok_or_else(|| SimError::invalid("budget is required"))?;
        let allocation = Allocation::new(
            required(self.dev, "dev")?,
            required(self.mkt, "mkt")?,
            required(self.ops, "ops")?,
        );

        let mut team = BTreeSet::new();
        for role in self.team.unwrap_or_default() {
            let parsed = TeamRole::from_str(&role)
                .ok_or_else(|| SimError::invalid(format!("invalid team role: {}", role)))?;
            team.insert(parsed);
        }

        let marketing = match self.marketing.as_deref() {
            Some(value) => MarketingChannel::from_str(value)
                .ok_or_else(|| SimError::invalid(format!("invalid marketing channel: {}", value)))?,
            None => MarketingChannel::Organic,
        };

        catalog.input_for(&idea, budget, allocation, team, marketing)
    }
}

fn required(value: Option<f64>, name: &str) -> SimResult<f64> {
    value.ok_or_else(|| SimError::invalid(format!("{} allocation is required", name)))
}

#[derive(Debug, Serialize)]
pub struct ApiSimulationResponse {
    pub score: u32,
    pub verdict: String,
    pub breakdown: Vec<BreakdownEntry>,
    pub tips: Vec<String>,
    pub scenario: Option<Scenario>,
    pub warnings: Vec<String>,
}

impl ApiSimulationResponse {
    pub fn from_result(
        result: SimulationResult,
        scenario: Option<Scenario>,
        warnings: Vec<String>,
    ) -> Self {
        Self {
            score: result.composite_score,
            verdict: result.tier().label().to_string(),
            breakdown: result.breakdown.into(),
            tips: result.tips,
            scenario,
            warnings,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub added: bool,
    pub favorites: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub msg: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}
