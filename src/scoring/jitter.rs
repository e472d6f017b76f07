use rand::{rngs::StdRng, Rng, SeedableRng};

pub const JITTER_MIN: i32 = -2;
pub const JITTER_MAX: i32 = 2;

/// Market unpredictability applied on top of the sub-scores.
pub trait JitterSource {
    /// Returns an integer in `[JITTER_MIN, JITTER_MAX]`.
    fn draw(&mut self) -> i32;
}

#[derive(Debug, Clone)]
pub struct RngJitter<R> {
    rng: R,
}

impl<R: Rng> RngJitter<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngJitter<StdRng> {
    /// Seeded when `seed` is set, otherwise drawn from OS entropy.
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::new(StdRng::seed_from_u64(seed)),
            None => Self::new(StdRng::from_entropy()),
        }
    }
}

impl<R: Rng> JitterSource for RngJitter<R> {
    fn draw(&mut self) -> i32 {
        self.rng.gen_range(JITTER_MIN..=JITTER_MAX)
    }
}

/// Always returns the same value. Used to pin scores in tests and replays.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedJitter(pub i32);

impl JitterSource for FixedJitter {
    fn draw(&mut self) -> i32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_jitter_stays_in_range() {
        let mut source = RngJitter::new(StdRng::seed_from_u64(7));
        for _ in 0..500 {
            let value = source.draw();
            assert!((JITTER_MIN..=JITTER_MAX).contains(&value));
        }
    }

    #[test]
    fn seeded_jitter_is_reproducible() {
        let mut a = RngJitter::from_seed(Some(42));
        let mut b = RngJitter::new(StdRng::seed_from_u64(42));
        let left: Vec<i32> = (0..20).map(|_| a.draw()).collect();
        let right: Vec<i32> = (0..20).map(|_| b.draw()).collect();
        assert_eq!(left, right);
    }
}
