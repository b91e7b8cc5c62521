use crate::common::{ModelError, ModelResult};
use crate::logging::{DynLogger, NoopLogger};
use crate::model::Model;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Outcome of one model run within a batch.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub run_id: Uuid,
    pub iteration: u32,
    pub seed: u64,
    pub steps: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Where batch results go once a run completes.
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn write_run(&self, result: &RunResult) -> ModelResult<()>;
}

/// Writes one JSON document per run into a directory.
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ReportSink for JsonFileSink {
    async fn write_run(&self, result: &RunResult) -> ModelResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(format!("run-{}.json", result.run_id));
        let body = serde_json::to_string_pretty(result)?;
        tokio::fs::write(path, body).await?;
        Ok(())
    }
}

type ModelBuilder<M> = Box<dyn Fn(u64) -> M + Send + Sync>;

/// Runs a model builder for a number of iterations, each with its own
/// derived seed. Runs execute one at a time on blocking tasks so the
/// executor stays responsive.
pub struct BatchRunner<M> {
    builder: ModelBuilder<M>,
    base_seed: u64,
    iterations: u32,
    max_steps: u64,
    sink: Option<Arc<dyn ReportSink>>,
    logger: DynLogger,
}

impl<M: Model + Send + 'static> BatchRunner<M> {
    pub fn new(
        builder: impl Fn(u64) -> M + Send + Sync + 'static,
        base_seed: u64,
        iterations: u32,
        max_steps: u64,
    ) -> Self {
        Self {
            builder: Box::new(builder),
            base_seed,
            iterations,
            max_steps,
            sink: None,
            logger: Arc::new(NoopLogger),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_logger(mut self, logger: DynLogger) -> Self {
        self.logger = logger;
        self
    }

    pub async fn run_all(&self) -> ModelResult<Vec<RunResult>> {
        let mut results = Vec::with_capacity(self.iterations as usize);
        for iteration in 0..self.iterations {
            let seed = self.base_seed.wrapping_add(u64::from(iteration));
            let mut model = (self.builder)(seed);
            let started_at = Utc::now();
            let max_steps = self.max_steps;
            let steps = tokio::task::spawn_blocking(move || model.run(max_steps))
                .await
                .map_err(|join_error| ModelError::TaskFailed {
                    reason: join_error.to_string(),
                })??;
            let result = RunResult {
                run_id: Uuid::new_v4(),
                iteration,
                seed,
                steps,
                started_at,
                finished_at: Utc::now(),
            };
            info!(run_id = %result.run_id, seed, steps, "run complete");
            self.logger.info(&format!(
                "run {} finished after {} steps (seed {})",
                result.run_id, steps, seed
            ));
            if let Some(sink) = &self.sink {
                sink.write_run(&result).await?;
            }
            results.push(result);
        }
        Ok(results)
    }
}
