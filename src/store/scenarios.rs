use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{SimError, SimResult};
use crate::store::{read_collection, write_document, StorageBackend};
use crate::{Allocation, MarketingChannel, SimulationInput, SimulationResult, TeamRole};

pub const SCENARIOS_KEY: &str = "ss_scenarios";

/// A saved snapshot of simulator inputs and the score they produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: u64,
    pub idea: String,
    pub budget: f64,
    pub allocation: Allocation,
    pub team: Vec<TeamRole>,
    pub marketing: MarketingChannel,
    pub score: u32,
    pub created: DateTime<Utc>,
}

/// A scenario that has not been stored yet. `id` is normally left empty and
/// assigned by [`ScenarioStore::save`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInput {
    #[serde(default)]
    pub id: Option<u64>,
    pub idea: String,
    pub budget: f64,
    pub allocation: Allocation,
    pub team: Vec<TeamRole>,
    pub marketing: MarketingChannel,
    pub score: u32,
}

impl ScenarioInput {
    pub fn from_run(input: &SimulationInput, result: &SimulationResult) -> Self {
        Self {
            id: None,
            idea: input.idea_id.clone(),
            budget: input.budget,
            allocation: input.allocation,
            team: input.team.iter().copied().collect(),
            marketing: input.marketing,
            score: result.composite_score,
        }
    }

    // JSON has no NaN or infinity, so those could never be read back.
    fn validate(&self) -> SimResult<()> {
        if self.idea.trim().is_empty() {
            return Err(SimError::invalid("scenario has no idea"));
        }
        let numbers = [
            self.budget,
            self.allocation.dev_pct,
            self.allocation.mkt_pct,
            self.allocation.ops_pct,
        ];
        if numbers.iter().any(|value| !value.is_finite()) {
            return Err(SimError::invalid("scenario numbers must be finite"));
        }
        Ok(())
    }
}

/// Newest-first history of saved scenarios.
///
/// Every operation re-reads the persisted sequence, and every write replaces
/// it whole, so a second save fired mid-flight cannot drop the first.
pub struct ScenarioStore {
    backend: Arc<dyn StorageBackend>,
}

impl ScenarioStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    pub fn save(&self, candidate: ScenarioInput) -> SimResult<Scenario> {
        candidate.validate()?;
        let mut scenarios = self.read_all()?;
        let newest_id = scenarios.iter().map(|scenario| scenario.id).max();

        let id = match (candidate.id, newest_id) {
            (Some(id), Some(newest)) if id <= newest => {
                return Err(SimError::invalid(format!(
                    "scenario id {} must be greater than {}",
                    id, newest
                )));
            }
            // The next automatic id must still fit after this one.
            (Some(u64::MAX), _) => {
                return Err(SimError::invalid("scenario id leaves no room for later saves"));
            }
            (Some(id), _) => id,
            (None, newest) => next_id(now_millis(), newest)?,
        };

        let now = Utc::now();
        let created = match scenarios.first() {
            Some(head) if head.created > now => head.created,
            _ => now,
        };

        let scenario = Scenario {
            id,
            idea: candidate.idea,
            budget: candidate.budget,
            allocation: candidate.allocation,
            team: candidate.team,
            marketing: candidate.marketing,
            score: candidate.score,
            created,
        };

        scenarios.insert(0, scenario.clone());
        write_document(self.backend.as_ref(), SCENARIOS_KEY, &scenarios)?;
        info!(
            id = scenario.id,
            idea = %scenario.idea,
            score = scenario.score,
            total = scenarios.len(),
            "saved scenario"
        );
        Ok(scenario)
    }

    pub fn list_recent(&self, limit: usize) -> SimResult<Vec<Scenario>> {
        let scenarios = self.read_all()?;
        debug!(limit, stored = scenarios.len(), "listing recent scenarios");
        Ok(scenarios.into_iter().take(limit).collect())
    }

    pub fn load_by_id(&self, id: u64) -> SimResult<Scenario> {
        self.read_all()?
            .into_iter()
            .find(|scenario| scenario.id == id)
            .ok_or(SimError::NotFound(id))
    }

    /// Drops everything but the newest `retain` scenarios and returns how
    /// many were removed.
    pub fn prune(&self, retain: usize) -> SimResult<usize> {
        let mut scenarios = self.read_all()?;
        if scenarios.len() <= retain {
            return Ok(0);
        }
        let dropped = scenarios.len() - retain;
        scenarios.truncate(retain);
        write_document(self.backend.as_ref(), SCENARIOS_KEY, &scenarios)?;
        info!(retain, dropped, "pruned scenario history");
        Ok(dropped)
    }

    fn read_all(&self) -> SimResult<Vec<Scenario>> {
        read_collection(self.backend.as_ref(), SCENARIOS_KEY)
    }
}

fn next_id(now_ms: u64, newest: Option<u64>) -> SimResult<u64> {
    match newest {
        Some(newest) if newest >= now_ms => newest
            .checked_add(1)
            .ok_or_else(|| SimError::invalid("scenario ids exhausted")),
        _ => Ok(now_ms),
    }
}

fn now_millis() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_id_uses_clock_when_ahead() {
        assert_eq!(next_id(1_000, None).unwrap(), 1_000);
        assert_eq!(next_id(1_000, Some(999)).unwrap(), 1_000);
    }

    #[test]
    fn next_id_steps_past_newest_on_collision() {
        assert_eq!(next_id(1_000, Some(1_000)).unwrap(), 1_001);
        assert_eq!(next_id(1_000, Some(5_000)).unwrap(), 5_001);
    }

    #[test]
    fn next_id_refuses_to_wrap() {
        assert!(matches!(
            next_id(1_000, Some(u64::MAX)),
            Err(SimError::InvalidInput(_))
        ));
    }
}
