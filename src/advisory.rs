use crate::SimulationResult;

const LOW_TIER_CEILING: u32 = 40;
const MID_TIER_CEILING: u32 = 70;

/// Tips for a composed result: a fixed set per score tier, plus an allocation
/// warning whenever Allocation Fitness went negative.
pub fn advise(result: &SimulationResult) -> Vec<String> {
    let mut tips = Vec::new();
    let score = result.composite_score;

    if score < LOW_TIER_CEILING {
        tips.push("Consider increasing budget in development or marketing.".to_string());
        tips.push("Add at least one specialist (developer/designer/marketer).".to_string());
        tips.push("Validate your idea with 5 potential customers before scaling.".to_string());
    } else if score < MID_TIER_CEILING {
        tips.push(
            "Good start: tighten allocation to ensure dev and marketing balance.".to_string(),
        );
        tips.push("Run small paid ad experiments to validate channels.".to_string());
    } else {
        tips.push("Strong setup: prepare an MVP and start user testing.".to_string());
        tips.push("Begin building partnerships for growth and distribution.".to_string());
    }

    if result.breakdown.allocation_fitness < 0 {
        tips.push("Fix allocation percentages to total 100% and align with idea needs.".to_string());
    }

    tips
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScoreBreakdown;

    fn result(score: u32, allocation_fitness: i32) -> SimulationResult {
        SimulationResult {
            composite_score: score,
            breakdown: ScoreBreakdown {
                idea_fit: 9,
                budget_strength: 20,
                team_strength: 6,
                allocation_fitness,
                marketing_plan: 6,
            },
            tips: Vec::new(),
        }
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(advise(&result(39, 10)).len(), 3);
        assert_eq!(advise(&result(40, 10)).len(), 2);
        assert_eq!(advise(&result(69, 10)).len(), 2);
        assert!(advise(&result(70, 10))[0].contains("MVP"));
    }

    #[test]
    fn negative_allocation_appends_fix_tip() {
        let tips = advise(&result(30, -3));
        assert_eq!(tips.len(), 4);
        assert!(tips[3].contains("total 100%"));

        let zero = advise(&result(80, 0));
        assert_eq!(zero.len(), 2);
    }
}
