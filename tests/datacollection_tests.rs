use rand::rngs::StdRng;
use serde_json::json;
use veld::{Agent, AgentId, DataCollector, ModelError};

struct World {
    total: i64,
}

struct Counter {
    id: AgentId,
    value: i64,
}

impl Agent for Counter {
    type World = ();

    fn id(&self) -> AgentId {
        self.id
    }

    fn step(&mut self, _world: &mut (), _rng: &mut StdRng) {}
}

fn collector() -> DataCollector<World, Counter> {
    let mut collector = DataCollector::new();
    collector.add_model_reporter("total", |world: &World| json!(world.total));
    collector.add_agent_reporter("value", |agent: &Counter| json!(agent.value));
    collector
}

#[test]
fn model_reporters_record_each_collect() {
    let mut collector = collector();
    let agents: Vec<Counter> = Vec::new();

    collector.collect(1, &World { total: 5 }, &agents);
    collector.collect(2, &World { total: 8 }, &agents);

    let records = collector.model_records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].step, 1);
    assert_eq!(records[0].values["total"], json!(5));
    assert_eq!(records[1].step, 2);
    assert_eq!(records[1].values["total"], json!(8));
}

#[test]
fn agent_reporters_record_per_agent() {
    let mut collector = collector();
    let agents = vec![
        Counter {
            id: AgentId(1),
            value: 10,
        },
        Counter {
            id: AgentId(2),
            value: 20,
        },
    ];

    collector.collect(1, &World { total: 30 }, &agents);

    let records = collector.agent_records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].agent_id, AgentId(1));
    assert_eq!(records[0].values["value"], json!(10));
    assert_eq!(records[1].agent_id, AgentId(2));
    assert_eq!(records[1].values["value"], json!(20));
}

#[test]
fn no_agent_records_without_agent_reporters() {
    let mut collector: DataCollector<World, Counter> = DataCollector::new();
    collector.add_model_reporter("total", |world: &World| json!(world.total));
    let agents = vec![Counter {
        id: AgentId(1),
        value: 1,
    }];

    collector.collect(1, &World { total: 0 }, &agents);

    assert_eq!(collector.model_records().len(), 1);
    assert!(collector.agent_records().is_empty());
}

#[test]
fn table_rows_and_errors() {
    let mut collector = collector();
    collector.declare_table("events", vec!["step".to_string(), "kind".to_string()]);

    collector
        .add_table_row("events", vec![json!(1), json!("birth")])
        .unwrap();

    let err = collector
        .add_table_row("missing", vec![json!(1)])
        .unwrap_err();
    assert!(matches!(err, ModelError::UnknownTable { name } if name == "missing"));

    let err = collector
        .add_table_row("events", vec![json!(1)])
        .unwrap_err();
    assert!(matches!(
        err,
        ModelError::ColumnMismatch {
            expected: 2,
            actual: 1,
            ..
        }
    ));

    let table = collector.table("events").unwrap();
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0][1], json!("birth"));
}

#[test]
fn export_shape() {
    let mut collector = collector();
    collector.collect(
        1,
        &World { total: 7 },
        &[Counter {
            id: AgentId(1),
            value: 3,
        }],
    );

    let exported = collector.to_json().unwrap();
    assert!(exported["model"].is_array());
    assert!(exported["agents"].is_array());
    assert!(exported["tables"].is_object());
    assert_eq!(exported["model"][0]["values"]["total"], json!(7));
}

#[test]
fn write_json_persists_collection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");

    let mut collector = collector();
    collector.collect(1, &World { total: 4 }, &[]);
    tokio_test::block_on(collector.write_json(&path)).unwrap();

    let body = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(parsed["model"][0]["values"]["total"], json!(4));
}
