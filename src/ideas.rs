use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{SimError, SimResult};
use crate::{Allocation, MarketingChannel, RiskCategory, SimulationInput, TeamRole};

/// An idea card the user can pick as the basis of a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    pub id: String,
    pub title: String,
    pub risk: RiskCategory,
    pub market: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Idea {
    fn new(id: &str, title: &str, risk: RiskCategory, market: &str, tags: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            risk,
            market: market.to_string(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate.eq_ignore_ascii_case(tag))
    }
}

#[derive(Debug, Clone)]
pub struct IdeaCatalog {
    ideas: Vec<Idea>,
}

impl Default for IdeaCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl IdeaCatalog {
    pub fn new(ideas: Vec<Idea>) -> Self {
        Self { ideas }
    }

    pub fn builtin() -> Self {
        Self::new(vec![
            Idea::new(
                "campus-tutor",
                "Campus Peer Tutoring App",
                RiskCategory::Medium,
                "edu",
                &["edu", "app", "students"],
            ),
            Idea::new(
                "home-kitchen",
                "Home-Cooked Meal Delivery",
                RiskCategory::Medium,
                "other",
                &["food", "local"],
            ),
            Idea::new(
                "freelance-hub",
                "Freelancer Skills Marketplace",
                RiskCategory::High,
                "tech",
                &["tech", "marketplace"],
            ),
            Idea::new(
                "eco-bags",
                "Reusable Eco Bag Brand",
                RiskCategory::Low,
                "other",
                &["retail", "green"],
            ),
            Idea::new(
                "clinic-booking",
                "Clinic Appointment Booking",
                RiskCategory::High,
                "tech",
                &["tech", "health"],
            ),
            Idea::new(
                "weekend-bootcamp",
                "Weekend Coding Bootcamp",
                RiskCategory::Low,
                "edu",
                &["edu", "tech"],
            ),
        ])
    }

    pub fn all(&self) -> &[Idea] {
        &self.ideas
    }

    pub fn first(&self) -> Option<&Idea> {
        self.ideas.first()
    }

    pub fn get(&self, idea_id: &str) -> Option<&Idea> {
        self.ideas.iter().find(|idea| idea.id == idea_id)
    }

    /// `"all"` matches every card.
    pub fn filter(&self, tag: &str) -> Vec<&Idea> {
        let tag = tag.trim();
        if tag.is_empty() || tag.eq_ignore_ascii_case("all") {
            return self.ideas.iter().collect();
        }
        self.ideas.iter().filter(|idea| idea.has_tag(tag)).collect()
    }

    /// Builds a simulation input, taking risk and market type from the card.
    pub fn input_for(
        &self,
        idea_id: &str,
        budget: f64,
        allocation: Allocation,
        team: BTreeSet<TeamRole>,
        marketing: MarketingChannel,
    ) -> SimResult<SimulationInput> {
        if idea_id.trim().is_empty() {
            return Err(SimError::invalid("no idea selected"));
        }
        let idea = self
            .get(idea_id)
            .ok_or_else(|| SimError::invalid(format!("unknown idea: {}", idea_id)))?;
        Ok(SimulationInput {
            idea_id: idea.id.clone(),
            idea_risk: idea.risk,
            idea_market: idea.market.clone(),
            budget,
            allocation,
            team,
            marketing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_all_returns_every_card() {
        let catalog = IdeaCatalog::builtin();
        assert_eq!(catalog.filter("all").len(), catalog.all().len());
        assert_eq!(catalog.filter("").len(), catalog.all().len());
    }

    #[test]
    fn filter_matches_tags_case_insensitively() {
        let catalog = IdeaCatalog::builtin();
        let tech: Vec<&str> = catalog
            .filter("TECH")
            .iter()
            .map(|idea| idea.id.as_str())
            .collect();
        assert_eq!(tech, vec!["freelance-hub", "clinic-booking", "weekend-bootcamp"]);
        assert!(catalog.filter("space").is_empty());
    }

    #[test]
    fn input_for_resolves_card_attributes() {
        let catalog = IdeaCatalog::builtin();
        let input = catalog
            .input_for(
                "eco-bags",
                10_000.0,
                Allocation::default(),
                BTreeSet::new(),
                MarketingChannel::Organic,
            )
            .unwrap();
        assert_eq!(input.idea_risk, RiskCategory::Low);
        assert_eq!(input.idea_market, "other");
    }

    #[test]
    fn input_for_rejects_unknown_and_blank_ids() {
        let catalog = IdeaCatalog::builtin();
        for id in ["", "  ", "nope"] {
            let result = catalog.input_for(
                id,
                10_000.0,
                Allocation::default(),
                BTreeSet::new(),
                MarketingChannel::Ads,
            );
            assert!(matches!(result, Err(SimError::InvalidInput(_))));
        }
    }
}
