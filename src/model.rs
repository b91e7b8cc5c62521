use crate::common::ModelResult;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Root object of a simulation.
pub trait Model {
    /// Advance the model by one tick.
    fn step(&mut self) -> ModelResult<()>;

    /// Whether the model wants to keep running.
    fn running(&self) -> bool {
        true
    }

    /// Step until `running` turns false or `max_steps` ticks have executed.
    /// Returns the number of ticks executed.
    fn run(&mut self, max_steps: u64) -> ModelResult<u64> {
        let mut executed = 0;
        while executed < max_steps && self.running() {
            self.step()?;
            executed += 1;
        }
        Ok(executed)
    }
}

/// RNG for a model run. `None` seeds from OS entropy, `Some` yields a
/// reproducible stream.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
