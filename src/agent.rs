use crate::common::AgentId;
use rand::rngs::StdRng;

/// Behavior contract for a single agent.
///
/// `World` is the shared state agents act on during activation. A model owns
/// a scheduler and a world side by side; the scheduler lends each agent the
/// world for the duration of its activation.
pub trait Agent: Send {
    type World;

    fn id(&self) -> AgentId;

    /// Take one action.
    fn step(&mut self, world: &mut Self::World, rng: &mut StdRng);

    /// Apply state staged during `step`. Only two-phase schedulers call this.
    fn advance(&mut self, _world: &mut Self::World, _rng: &mut StdRng) {}
}
