use tracing::debug;

use crate::advisory::advise;
use crate::error::SimResult;
use crate::scoring::jitter::{JitterSource, JITTER_MAX, JITTER_MIN};
use crate::scoring::subscores::{
    allocation_fitness, budget_strength, idea_fit, marketing_plan, team_strength,
};
use crate::{ScoreBreakdown, SimulationInput, SimulationResult};

pub const MIN_SCORE: i32 = 8;
pub const MAX_SCORE: i32 = 95;

/// Scores a validated input. The only non-determinism is the single draw
/// from `jitter`; the breakdown never includes it.
pub fn compose(
    input: &SimulationInput,
    jitter: &mut dyn JitterSource,
) -> SimResult<SimulationResult> {
    input.validate()?;

    let breakdown = ScoreBreakdown {
        idea_fit: idea_fit(input.idea_risk),
        budget_strength: budget_strength(input.budget),
        team_strength: team_strength(&input.team),
        allocation_fitness: allocation_fitness(input),
        marketing_plan: marketing_plan(input.marketing),
    };

    let drawn = jitter.draw().clamp(JITTER_MIN, JITTER_MAX);
    let raw = breakdown.total() + drawn;
    let composite_score = raw.clamp(MIN_SCORE, MAX_SCORE) as u32;

    debug!(
        idea = %input.idea_id,
        raw,
        jitter = drawn,
        score = composite_score,
        "composed simulation score"
    );

    let mut result = SimulationResult {
        composite_score,
        breakdown,
        tips: Vec::new(),
    };
    result.tips = advise(&result);
    Ok(result)
}
