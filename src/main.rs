use anyhow::Result;
use rand::rngs::StdRng;
use rand::Rng;
use serde_json::json;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use veld::datacollection::DataCollector;
use veld::logging::FileLogger;
use veld::runner::{BatchRunner, JsonFileSink};
use veld::space::{Coord, MultiGrid};
use veld::time::RandomActivation;
use veld::visualization::{TextData, TextMultiGrid, TextVisualization};
use veld::{package_info, seeded_rng, Agent, AgentId, Config, Model, ModelResult};

const WIDTH: i64 = 20;
const HEIGHT: i64 = 10;
const WALKERS: u64 = 15;

/// Shared state the walkers act on.
struct Terrain {
    grid: MultiGrid,
}

struct Walker {
    id: AgentId,
    pos: Coord,
}

impl Agent for Walker {
    type World = Terrain;

    fn id(&self) -> AgentId {
        self.id
    }

    fn step(&mut self, world: &mut Terrain, rng: &mut StdRng) {
        let dx = rng.gen_range(-1..=1);
        let dy = rng.gen_range(-1..=1);
        let target = Coord::new(self.pos.x + dx, self.pos.y + dy);
        if let Ok(landed) = world.grid.move_agent(self.id, target) {
            self.pos = landed;
        }
    }
}

struct WalkerModel {
    schedule: RandomActivation<Walker>,
    terrain: Terrain,
    rng: StdRng,
    collector: DataCollector<Terrain, Walker>,
    collect_interval: u64,
}

impl WalkerModel {
    fn new(seed: Option<u64>, collect_interval: u64) -> ModelResult<Self> {
        let mut rng = seeded_rng(seed);
        let mut schedule = RandomActivation::new();
        let mut grid = MultiGrid::new(WIDTH, HEIGHT, true);
        for raw in 0..WALKERS {
            let id = AgentId(raw);
            let pos = Coord::new(rng.gen_range(0..WIDTH), rng.gen_range(0..HEIGHT));
            grid.place_agent(id, pos)?;
            schedule.add(Walker { id, pos })?;
        }

        let mut collector = DataCollector::new();
        collector.add_model_reporter("occupied_cells", |terrain: &Terrain| {
            let occupied: HashSet<Coord> = terrain.grid.agents().map(|(_, pos)| pos).collect();
            json!(occupied.len())
        });
        collector.add_agent_reporter("x", |walker: &Walker| json!(walker.pos.x));
        collector.add_agent_reporter("y", |walker: &Walker| json!(walker.pos.y));

        Ok(Self {
            schedule,
            terrain: Terrain { grid },
            rng,
            collector,
            collect_interval: collect_interval.max(1),
        })
    }
}

impl Model for WalkerModel {
    fn step(&mut self) -> ModelResult<()> {
        self.schedule.step(&mut self.terrain, &mut self.rng);
        if self.schedule.steps() % self.collect_interval == 0 {
            self.collector
                .collect(self.schedule.steps(), &self.terrain, self.schedule.agents());
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let (config, config_error) = match Config::from_file("config.toml").await {
        Ok(config) => (config, None),
        Err(error) => (Config::default(), Some(error)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.level))
        .init();
    if let Some(error) = config_error {
        warn!("config.toml not loaded ({error}); using defaults");
    }
    if let Some(file) = &config.logging.file {
        if let Err(error) = FileLogger::init(file) {
            warn!("file logger not initialized: {error}");
        }
    }

    let meta = package_info();
    info!("{} {} ({})", meta.title, meta.version, meta.copyright);

    let interval = config.data.collect_interval;

    if config.run.iterations > 1 {
        let base_seed = config.run.seed.unwrap_or_else(rand::random);
        let runner = BatchRunner::new(
            move |seed| {
                WalkerModel::new(Some(seed), interval).expect("walker model construction")
            },
            base_seed,
            config.run.iterations,
            config.run.max_steps,
        )
        .with_sink(Arc::new(JsonFileSink::new(&config.data.output_dir)));
        let results = runner.run_all().await?;
        info!(runs = results.len(), "batch finished");
        return Ok(());
    }

    let mut model = WalkerModel::new(config.run.seed, interval)?;
    let executed = model.run(config.run.max_steps)?;
    info!(steps = executed, "run finished");

    let mut viz = TextVisualization::new();
    viz.add_element(TextMultiGrid::new(
        |terrain: &Terrain| &terrain.grid,
        |occupants| match occupants.len() {
            0 => '.',
            1 => 'o',
            _ => '#',
        },
    ));
    let mut data = TextData::new();
    data.add_field("walkers", |terrain: &Terrain| {
        terrain.grid.agent_count().to_string()
    });
    viz.add_element(data);
    println!("{}", viz.render_all(&model.terrain));

    tokio::fs::create_dir_all(&config.data.output_dir).await?;
    let out = Path::new(&config.data.output_dir).join("model.json");
    model.collector.write_json(&out).await?;
    info!(path = %out.display(), "data written");

    Ok(())
}
