use crate::agent::Agent;
use crate::common::{AgentId, ModelError, ModelResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

/// Insertion-ordered agent store shared by the schedulers.
struct Roster<A> {
    agents: Vec<A>,
}

impl<A: Agent> Roster<A> {
    fn new() -> Self {
        Self { agents: Vec::new() }
    }

    fn add(&mut self, agent: A) -> ModelResult<()> {
        if self.position(agent.id()).is_some() {
            return Err(ModelError::DuplicateAgent { id: agent.id() });
        }
        self.agents.push(agent);
        Ok(())
    }

    fn remove(&mut self, id: AgentId) -> ModelResult<A> {
        match self.position(id) {
            Some(idx) => Ok(self.agents.remove(idx)),
            None => Err(ModelError::AgentNotFound { id }),
        }
    }

    fn position(&self, id: AgentId) -> Option<usize> {
        self.agents.iter().position(|a| a.id() == id)
    }

    fn shuffled_order(&self, rng: &mut StdRng) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.agents.len()).collect();
        order.shuffle(rng);
        order
    }
}

/// Activates agents one at a time, in the order they were added.
pub struct BaseScheduler<A> {
    roster: Roster<A>,
    steps: u64,
    time: f64,
}

impl<A: Agent> BaseScheduler<A> {
    pub fn new() -> Self {
        Self {
            roster: Roster::new(),
            steps: 0,
            time: 0.0,
        }
    }

    pub fn add(&mut self, agent: A) -> ModelResult<()> {
        self.roster.add(agent)
    }

    pub fn remove(&mut self, id: AgentId) -> ModelResult<A> {
        self.roster.remove(id)
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.roster.position(id).is_some()
    }

    pub fn get(&self, id: AgentId) -> Option<&A> {
        self.roster.position(id).map(|idx| &self.roster.agents[idx])
    }

    pub fn agent_count(&self) -> usize {
        self.roster.agents.len()
    }

    pub fn agents(&self) -> impl Iterator<Item = &A> {
        self.roster.agents.iter()
    }

    pub fn agents_mut(&mut self) -> impl Iterator<Item = &mut A> {
        self.roster.agents.iter_mut()
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Activate every agent once, in insertion order.
    pub fn step(&mut self, world: &mut A::World, rng: &mut StdRng) {
        for agent in self.roster.agents.iter_mut() {
            agent.step(world, rng);
        }
        self.steps += 1;
        self.time += 1.0;
        debug!(steps = self.steps, "scheduler tick");
    }
}

impl<A: Agent> Default for BaseScheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Activates every agent once per step, in a fresh random order each time.
///
/// Insertion order is preserved for iteration and removal; only the
/// activation order is shuffled.
pub struct RandomActivation<A> {
    roster: Roster<A>,
    steps: u64,
    time: f64,
}

impl<A: Agent> RandomActivation<A> {
    pub fn new() -> Self {
        Self {
            roster: Roster::new(),
            steps: 0,
            time: 0.0,
        }
    }

    pub fn add(&mut self, agent: A) -> ModelResult<()> {
        self.roster.add(agent)
    }

    pub fn remove(&mut self, id: AgentId) -> ModelResult<A> {
        self.roster.remove(id)
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.roster.position(id).is_some()
    }

    pub fn get(&self, id: AgentId) -> Option<&A> {
        self.roster.position(id).map(|idx| &self.roster.agents[idx])
    }

    pub fn agent_count(&self) -> usize {
        self.roster.agents.len()
    }

    pub fn agents(&self) -> impl Iterator<Item = &A> {
        self.roster.agents.iter()
    }

    pub fn agents_mut(&mut self) -> impl Iterator<Item = &mut A> {
        self.roster.agents.iter_mut()
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn step(&mut self, world: &mut A::World, rng: &mut StdRng) {
        let order = self.roster.shuffled_order(rng);
        for idx in order {
            self.roster.agents[idx].step(world, rng);
        }
        self.steps += 1;
        self.time += 1.0;
        debug!(steps = self.steps, "scheduler tick");
    }
}

impl<A: Agent> Default for RandomActivation<A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Two-phase activation: every agent's `step` runs before any agent's
/// `advance`, so state staged during `step` applies as if simultaneously.
pub struct SimultaneousActivation<A> {
    roster: Roster<A>,
    steps: u64,
    time: f64,
}

impl<A: Agent> SimultaneousActivation<A> {
    pub fn new() -> Self {
        Self {
            roster: Roster::new(),
            steps: 0,
            time: 0.0,
        }
    }

    pub fn add(&mut self, agent: A) -> ModelResult<()> {
        self.roster.add(agent)
    }

    pub fn remove(&mut self, id: AgentId) -> ModelResult<A> {
        self.roster.remove(id)
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.roster.position(id).is_some()
    }

    pub fn agent_count(&self) -> usize {
        self.roster.agents.len()
    }

    pub fn agents(&self) -> impl Iterator<Item = &A> {
        self.roster.agents.iter()
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn step(&mut self, world: &mut A::World, rng: &mut StdRng) {
        for agent in self.roster.agents.iter_mut() {
            agent.step(world, rng);
        }
        for agent in self.roster.agents.iter_mut() {
            agent.advance(world, rng);
        }
        self.steps += 1;
        self.time += 1.0;
        debug!(steps = self.steps, "scheduler tick");
    }
}

impl<A: Agent> Default for SimultaneousActivation<A> {
    fn default() -> Self {
        Self::new()
    }
}

struct Stage<A: Agent> {
    name: String,
    run: Box<dyn FnMut(&mut A, &mut A::World, &mut StdRng) + Send>,
}

/// Runs a caller-supplied list of named stages each tick. Every stage is
/// applied to every agent before the next stage begins; `time` advances by
/// `1 / num_stages` per stage so partial ticks are observable.
pub struct StagedActivation<A: Agent> {
    roster: Roster<A>,
    stages: Vec<Stage<A>>,
    shuffle: bool,
    shuffle_between_stages: bool,
    steps: u64,
    time: f64,
}

impl<A: Agent> StagedActivation<A> {
    pub fn new(shuffle: bool, shuffle_between_stages: bool) -> Self {
        Self {
            roster: Roster::new(),
            stages: Vec::new(),
            shuffle,
            shuffle_between_stages,
            steps: 0,
            time: 0.0,
        }
    }

    pub fn add_stage(
        &mut self,
        name: impl Into<String>,
        run: impl FnMut(&mut A, &mut A::World, &mut StdRng) + Send + 'static,
    ) {
        self.stages.push(Stage {
            name: name.into(),
            run: Box::new(run),
        });
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn add(&mut self, agent: A) -> ModelResult<()> {
        self.roster.add(agent)
    }

    pub fn remove(&mut self, id: AgentId) -> ModelResult<A> {
        self.roster.remove(id)
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.roster.position(id).is_some()
    }

    pub fn agent_count(&self) -> usize {
        self.roster.agents.len()
    }

    pub fn agents(&self) -> impl Iterator<Item = &A> {
        self.roster.agents.iter()
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn step(&mut self, world: &mut A::World, rng: &mut StdRng) {
        if self.stages.is_empty() {
            self.steps += 1;
            self.time += 1.0;
            return;
        }
        let stage_time = 1.0 / self.stages.len() as f64;
        let mut order: Vec<usize> = if self.shuffle {
            self.roster.shuffled_order(rng)
        } else {
            (0..self.roster.agents.len()).collect()
        };
        for stage in self.stages.iter_mut() {
            if self.shuffle_between_stages {
                order = self.roster.shuffled_order(rng);
            }
            for &idx in &order {
                (stage.run)(&mut self.roster.agents[idx], world, rng);
            }
            self.time += stage_time;
        }
        self.steps += 1;
        debug!(steps = self.steps, stages = self.stages.len(), "scheduler tick");
    }
}
