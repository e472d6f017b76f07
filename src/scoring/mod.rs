pub mod composer;
pub mod jitter;
pub mod subscores;

pub use composer::{compose, MAX_SCORE, MIN_SCORE};
pub use jitter::{FixedJitter, JitterSource, RngJitter, JITTER_MAX, JITTER_MIN};
pub use subscores::{
    allocation_fitness, budget_strength, idea_fit, marketing_plan, team_strength,
};
