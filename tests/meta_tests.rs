use chrono::{Datelike, Local};
use rand::rngs::StdRng;
use veld::{package_info, Agent, AgentId, Model, ModelResult};

struct NullAgent;

impl Agent for NullAgent {
    type World = ();

    fn id(&self) -> AgentId {
        AgentId(0)
    }

    fn step(&mut self, _world: &mut (), _rng: &mut StdRng) {}
}

struct NullModel;

impl Model for NullModel {
    fn step(&mut self) -> ModelResult<()> {
        Ok(())
    }
}

#[test]
fn metadata_is_idempotent() {
    let first = package_info();
    let second = package_info();

    assert!(std::ptr::eq(first, second));
    assert_eq!(first.copyright, second.copyright);
    assert_eq!(first.version, second.version);
}

#[test]
fn version_matches_manifest_literal() {
    assert_eq!(package_info().version, "0.9.0");
}

#[test]
fn title_and_license_are_published() {
    let meta = package_info();
    assert_eq!(meta.title, "veld");
    assert_eq!(meta.license, "Apache-2.0");
}

#[test]
fn copyright_carries_current_year() {
    let year = Local::now().year().to_string();
    assert!(package_info().copyright.contains(&year));
}

#[test]
fn facade_names_resolve() {
    // Every re-exported name is reachable from the crate root.
    let _collector: veld::DataCollector<(), NullAgent> = veld::DataCollector::new();
    let _scheduler: veld::time::BaseScheduler<NullAgent> = veld::time::BaseScheduler::new();
    let _grid = veld::space::Grid::new(2, 2, false);
    let _viz: veld::visualization::TextVisualization<()> =
        veld::visualization::TextVisualization::new();

    let mut model = NullModel;
    assert_eq!(model.run(0).unwrap(), 0);
}
