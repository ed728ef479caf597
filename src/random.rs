use rand::{rngs::StdRng, Rng, SeedableRng};

/// Uniform draws in `[0, 1)` for spawn pacing and category bias
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

/// Production source backed by `StdRng`
#[derive(Debug, Clone)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for StdRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Deterministic source for tests: replays `values` in a loop
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// How many values have been consumed so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

impl<T: RandomSource + ?Sized> RandomSource for Box<T> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}
