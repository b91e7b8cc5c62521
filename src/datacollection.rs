use crate::agent::Agent;
use crate::common::{AgentId, ModelError, ModelResult};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

pub type ModelReporter<M> = Box<dyn Fn(&M) -> Value + Send>;
pub type AgentReporter<A> = Box<dyn Fn(&A) -> Value + Send>;

/// One row of model-level data.
#[derive(Debug, Clone, Serialize)]
pub struct ModelRecord {
    pub step: u64,
    pub values: HashMap<String, Value>,
}

/// One row of agent-level data.
#[derive(Debug, Clone, Serialize)]
pub struct AgentRecord {
    pub step: u64,
    pub agent_id: AgentId,
    pub values: HashMap<String, Value>,
}

/// A caller-declared table filled row by row.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

#[derive(Serialize)]
struct Export<'a> {
    model: &'a [ModelRecord],
    agents: &'a [AgentRecord],
    tables: &'a HashMap<String, Table>,
}

/// Gathers model-level and agent-level variables over a run.
///
/// Reporters are named closures evaluated at every `collect`; tables are
/// declared up front and filled explicitly by the model.
pub struct DataCollector<M, A> {
    model_reporters: Vec<(String, ModelReporter<M>)>,
    agent_reporters: Vec<(String, AgentReporter<A>)>,
    model_records: Vec<ModelRecord>,
    agent_records: Vec<AgentRecord>,
    tables: HashMap<String, Table>,
}

impl<M, A> DataCollector<M, A> {
    pub fn new() -> Self {
        Self {
            model_reporters: Vec::new(),
            agent_reporters: Vec::new(),
            model_records: Vec::new(),
            agent_records: Vec::new(),
            tables: HashMap::new(),
        }
    }

    pub fn add_model_reporter(
        &mut self,
        name: impl Into<String>,
        reporter: impl Fn(&M) -> Value + Send + 'static,
    ) {
        self.model_reporters.push((name.into(), Box::new(reporter)));
    }

    pub fn add_agent_reporter(
        &mut self,
        name: impl Into<String>,
        reporter: impl Fn(&A) -> Value + Send + 'static,
    ) {
        self.agent_reporters.push((name.into(), Box::new(reporter)));
    }

    pub fn declare_table(&mut self, name: impl Into<String>, columns: Vec<String>) {
        self.tables.insert(
            name.into(),
            Table {
                columns,
                rows: Vec::new(),
            },
        );
    }

    pub fn add_table_row(&mut self, name: &str, row: Vec<Value>) -> ModelResult<()> {
        let table = self
            .tables
            .get_mut(name)
            .ok_or_else(|| ModelError::UnknownTable {
                name: name.to_string(),
            })?;
        if row.len() != table.columns.len() {
            return Err(ModelError::ColumnMismatch {
                name: name.to_string(),
                expected: table.columns.len(),
                actual: row.len(),
            });
        }
        table.rows.push(row);
        Ok(())
    }

    pub fn model_records(&self) -> &[ModelRecord] {
        &self.model_records
    }

    pub fn agent_records(&self) -> &[AgentRecord] {
        &self.agent_records
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Serialize everything collected so far.
    pub fn to_json(&self) -> ModelResult<Value> {
        let export = Export {
            model: &self.model_records,
            agents: &self.agent_records,
            tables: &self.tables,
        };
        Ok(serde_json::to_value(export)?)
    }

    /// Persist everything collected so far as pretty-printed JSON.
    pub async fn write_json(&self, path: impl AsRef<Path>) -> ModelResult<()> {
        let body = serde_json::to_string_pretty(&self.to_json()?)?;
        tokio::fs::write(path, body).await?;
        Ok(())
    }
}

impl<M, A: Agent> DataCollector<M, A> {
    /// Record one snapshot: a model row from the model reporters and, when
    /// agent reporters are registered, one row per agent.
    pub fn collect<'a>(&mut self, step: u64, model: &M, agents: impl IntoIterator<Item = &'a A>)
    where
        A: 'a,
    {
        if !self.model_reporters.is_empty() {
            let values = self
                .model_reporters
                .iter()
                .map(|(name, reporter)| (name.clone(), reporter(model)))
                .collect();
            self.model_records.push(ModelRecord { step, values });
        }
        if self.agent_reporters.is_empty() {
            return;
        }
        for agent in agents {
            let values = self
                .agent_reporters
                .iter()
                .map(|(name, reporter)| (name.clone(), reporter(agent)))
                .collect();
            self.agent_records.push(AgentRecord {
                step,
                agent_id: agent.id(),
                values,
            });
        }
        debug!(step, "collected data");
    }
}

impl<M, A> Default for DataCollector<M, A> {
    fn default() -> Self {
        Self::new()
    }
}
