use std::collections::BTreeSet;

use crate::{MarketingChannel, RiskCategory, SimulationInput, TeamRole};

const BUDGET_FLOOR: f64 = 500.0;
const BUDGET_LOG_SCALE: f64 = 3.2;
const BUDGET_MIN_POINTS: f64 = 5.0;
const BUDGET_MAX_POINTS: f64 = 28.0;

const SOLO_FOUNDER_POINTS: i32 = 6;

const BALANCED_ALLOCATION_BONUS: i32 = 10;
const UNDERFUNDED_DEV_PENALTY: i32 = -8;
const UNDERFUNDED_MKT_PENALTY: i32 = -5;
const MIN_DEV_PCT_FOR_TECH: f64 = 30.0;
const MIN_MKT_PCT: f64 = 10.0;

pub fn idea_fit(risk: RiskCategory) -> i32 {
    match risk {
        RiskCategory::Low => 14,
        RiskCategory::Medium => 9,
        RiskCategory::High => 5,
    }
}

/// Log-compressed so very large budgets cannot dominate the composite.
pub fn budget_strength(budget: f64) -> i32 {
    let points = (BUDGET_LOG_SCALE * budget.max(BUDGET_FLOOR).ln()).round();
    points.clamp(BUDGET_MIN_POINTS, BUDGET_MAX_POINTS) as i32
}

pub fn role_weight(role: TeamRole) -> i32 {
    match role {
        TeamRole::Dev => 8,
        TeamRole::Designer => 5,
        TeamRole::Marketing => 6,
        TeamRole::Advisor => 4,
    }
}

pub fn team_strength(team: &BTreeSet<TeamRole>) -> i32 {
    SOLO_FOUNDER_POINTS + team.iter().map(|role| role_weight(*role)).sum::<i32>()
}

/// The bonus and both penalties are independent and may all apply at once.
pub fn allocation_fitness(input: &SimulationInput) -> i32 {
    let allocation = &input.allocation;
    let mut score = 0;
    if allocation.total() == 100.0 {
        score += BALANCED_ALLOCATION_BONUS;
    }
    if input.is_tech_or_edu() && allocation.dev_pct < MIN_DEV_PCT_FOR_TECH {
        score += UNDERFUNDED_DEV_PENALTY;
    }
    if allocation.mkt_pct < MIN_MKT_PCT {
        score += UNDERFUNDED_MKT_PENALTY;
    }
    score
}

pub fn marketing_plan(channel: MarketingChannel) -> i32 {
    match channel {
        MarketingChannel::Ads => 9,
        MarketingChannel::Hybrid => 12,
        MarketingChannel::Organic => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_floor_pins_small_budgets() {
        let floor = budget_strength(500.0);
        assert_eq!(floor, 20);
        assert_eq!(budget_strength(1.0), floor);
        assert_eq!(budget_strength(0.01), floor);
    }

    #[test]
    fn budget_saturates_at_cap() {
        assert_eq!(budget_strength(50_000.0), 28);
        assert_eq!(budget_strength(1e12), 28);
    }

    #[test]
    fn solo_founder_gets_base_points() {
        assert_eq!(team_strength(&BTreeSet::new()), 6);
        let full: BTreeSet<TeamRole> = [
            TeamRole::Dev,
            TeamRole::Designer,
            TeamRole::Marketing,
            TeamRole::Advisor,
        ]
        .into_iter()
        .collect();
        assert_eq!(team_strength(&full), 29);
    }
}
