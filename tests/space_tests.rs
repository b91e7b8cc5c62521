use petgraph::graph::NodeIndex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use veld::space::{ContinuousSpace, Coord, Grid, MultiGrid, Neighborhood, NetworkSpace, Point};
use veld::{AgentId, SpaceError};

#[test]
fn grid_place_and_lookup() {
    let mut grid = Grid::new(5, 5, false);
    grid.place_agent(AgentId(1), Coord::new(2, 3)).unwrap();

    assert_eq!(grid.agent_at(Coord::new(2, 3)).unwrap(), Some(AgentId(1)));
    assert_eq!(grid.position_of(AgentId(1)), Some(Coord::new(2, 3)));
    assert!(!grid.is_cell_empty(Coord::new(2, 3)));
    assert!(grid.is_cell_empty(Coord::new(0, 0)));
    assert_eq!(grid.agent_count(), 1);
}

#[test]
fn grid_rejects_out_of_bounds() {
    let mut grid = Grid::new(5, 5, false);

    let err = grid.place_agent(AgentId(1), Coord::new(5, 0)).unwrap_err();
    assert!(matches!(err, SpaceError::OutOfBounds { x: 5, y: 0 }));
}

#[test]
fn grid_rejects_occupied_cell() {
    let mut grid = Grid::new(5, 5, false);
    grid.place_agent(AgentId(1), Coord::new(1, 1)).unwrap();

    let err = grid.place_agent(AgentId(2), Coord::new(1, 1)).unwrap_err();
    assert!(matches!(err, SpaceError::CellOccupied { x: 1, y: 1 }));
}

#[test]
fn grid_rejects_double_placement() {
    let mut grid = Grid::new(5, 5, false);
    grid.place_agent(AgentId(1), Coord::new(1, 1)).unwrap();

    let err = grid.place_agent(AgentId(1), Coord::new(2, 2)).unwrap_err();
    assert!(matches!(err, SpaceError::AgentAlreadyPlaced { id } if id == AgentId(1)));
}

#[test]
fn torus_grid_wraps_coordinates() {
    let mut grid = Grid::new(5, 5, true);
    grid.place_agent(AgentId(1), Coord::new(-1, -1)).unwrap();

    assert_eq!(grid.position_of(AgentId(1)), Some(Coord::new(4, 4)));
    assert_eq!(grid.agent_at(Coord::new(4, 4)).unwrap(), Some(AgentId(1)));
}

#[test]
fn grid_move_and_remove_keep_cells_consistent() {
    let mut grid = Grid::new(5, 5, false);
    grid.place_agent(AgentId(1), Coord::new(0, 0)).unwrap();

    let landed = grid.move_agent(AgentId(1), Coord::new(3, 1)).unwrap();
    assert_eq!(landed, Coord::new(3, 1));
    assert!(grid.is_cell_empty(Coord::new(0, 0)));
    assert_eq!(grid.agent_at(Coord::new(3, 1)).unwrap(), Some(AgentId(1)));

    let vacated = grid.remove_agent(AgentId(1)).unwrap();
    assert_eq!(vacated, Coord::new(3, 1));
    assert!(grid.is_cell_empty(Coord::new(3, 1)));
    assert_eq!(grid.agent_count(), 0);

    let err = grid.remove_agent(AgentId(1)).unwrap_err();
    assert!(matches!(err, SpaceError::AgentNotPlaced { id } if id == AgentId(1)));
}

#[test]
fn neighborhood_counts() {
    let torus = Grid::new(10, 10, true);
    let center = Coord::new(0, 0);

    let moore = torus
        .neighborhood(center, Neighborhood::Moore, 1, false)
        .unwrap();
    assert_eq!(moore.len(), 8);

    let von_neumann = torus
        .neighborhood(center, Neighborhood::VonNeumann, 1, false)
        .unwrap();
    assert_eq!(von_neumann.len(), 4);

    let with_center = torus
        .neighborhood(center, Neighborhood::Moore, 1, true)
        .unwrap();
    assert_eq!(with_center.len(), 9);

    // A corner of a bounded grid only sees cells inside the edges.
    let bounded = Grid::new(10, 10, false);
    let clipped = bounded
        .neighborhood(center, Neighborhood::Moore, 1, false)
        .unwrap();
    assert_eq!(clipped.len(), 3);
}

#[test]
fn grid_neighbors_returns_occupants() {
    let mut grid = Grid::new(5, 5, true);
    grid.place_agent(AgentId(1), Coord::new(2, 2)).unwrap();
    grid.place_agent(AgentId(2), Coord::new(2, 3)).unwrap();
    grid.place_agent(AgentId(3), Coord::new(3, 3)).unwrap();
    grid.place_agent(AgentId(4), Coord::new(0, 0)).unwrap();

    let mut neighbors = grid
        .neighbors(Coord::new(2, 2), Neighborhood::Moore, 1, false)
        .unwrap();
    neighbors.sort();
    assert_eq!(neighbors, vec![AgentId(2), AgentId(3)]);
}

#[test]
fn random_empty_cell_picks_remaining_cell() {
    let mut grid = Grid::new(2, 1, false);
    grid.place_agent(AgentId(1), Coord::new(0, 0)).unwrap();
    let mut rng = StdRng::seed_from_u64(11);

    assert_eq!(grid.random_empty_cell(&mut rng).unwrap(), Coord::new(1, 0));

    grid.place_agent(AgentId(2), Coord::new(1, 0)).unwrap();
    let err = grid.random_empty_cell(&mut rng).unwrap_err();
    assert!(matches!(err, SpaceError::NoEmptyCell));
}

#[test]
fn multigrid_stacks_agents_in_placement_order() {
    let mut grid = MultiGrid::new(4, 4, false);
    grid.place_agent(AgentId(1), Coord::new(1, 1)).unwrap();
    grid.place_agent(AgentId(2), Coord::new(1, 1)).unwrap();
    grid.place_agent(AgentId(3), Coord::new(2, 1)).unwrap();

    assert_eq!(
        grid.agents_at(Coord::new(1, 1)).unwrap(),
        &[AgentId(1), AgentId(2)]
    );

    grid.move_agent(AgentId(1), Coord::new(2, 1)).unwrap();
    assert_eq!(grid.agents_at(Coord::new(1, 1)).unwrap(), &[AgentId(2)]);
    assert_eq!(
        grid.agents_at(Coord::new(2, 1)).unwrap(),
        &[AgentId(3), AgentId(1)]
    );

    let mut neighbors = grid
        .neighbors(Coord::new(1, 1), Neighborhood::Moore, 1, false)
        .unwrap();
    neighbors.sort();
    assert_eq!(neighbors, vec![AgentId(1), AgentId(3)]);
}

#[test]
fn continuous_space_wraps_on_torus() {
    let mut space = ContinuousSpace::new(10.0, 10.0, true);
    let landed = space.place_agent(AgentId(1), Point::new(12.5, -0.5)).unwrap();

    assert!((landed.x - 2.5).abs() < 1e-12);
    assert!((landed.y - 9.5).abs() < 1e-12);
}

#[test]
fn continuous_space_rejects_outside_region() {
    let mut space = ContinuousSpace::new(10.0, 10.0, false);

    let err = space
        .place_agent(AgentId(1), Point::new(10.5, 1.0))
        .unwrap_err();
    assert!(matches!(err, SpaceError::OutOfRegion { .. }));

    let err = space.move_agent(AgentId(1), Point::new(1.0, 1.0)).unwrap_err();
    assert!(matches!(err, SpaceError::AgentNotPlaced { id } if id == AgentId(1)));
}

#[test]
fn continuous_distance_uses_minimum_image() {
    let torus = ContinuousSpace::new(10.0, 10.0, true);
    let d = torus.distance(Point::new(1.0, 1.0), Point::new(9.0, 9.0));
    assert!((d - 8.0_f64.sqrt()).abs() < 1e-9);

    let bounded = ContinuousSpace::new(10.0, 10.0, false);
    let d = bounded.distance(Point::new(1.0, 1.0), Point::new(9.0, 9.0));
    assert!((d - 128.0_f64.sqrt()).abs() < 1e-9);
}

#[test]
fn continuous_neighbors_within_radius() {
    let mut space = ContinuousSpace::new(10.0, 10.0, true);
    space.place_agent(AgentId(1), Point::new(1.0, 1.0)).unwrap();
    space.place_agent(AgentId(2), Point::new(2.0, 1.0)).unwrap();
    space.place_agent(AgentId(3), Point::new(9.5, 1.0)).unwrap();
    space.place_agent(AgentId(4), Point::new(5.0, 5.0)).unwrap();

    let mut ids: Vec<AgentId> = space
        .neighbors_within(Point::new(1.0, 1.0), 2.0)
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    ids.sort();

    // Agent 3 is close only because the space wraps.
    assert_eq!(ids, vec![AgentId(1), AgentId(2), AgentId(3)]);
}

#[test]
fn network_space_adjacency() {
    let mut network = NetworkSpace::new();
    let a = network.add_node("a");
    let b = network.add_node("b");
    let c = network.add_node("c");
    network.add_link(a, b).unwrap();
    network.add_link(b, c).unwrap();

    assert_eq!(network.node_count(), 3);
    assert_eq!(network.link_count(), 2);
    assert_eq!(network.label(a).unwrap(), "a");

    network.place_agent(AgentId(1), a).unwrap();
    network.place_agent(AgentId(2), c).unwrap();
    network.place_agent(AgentId(3), b).unwrap();

    let mut around_b = network.neighbors(b).unwrap();
    around_b.sort();
    assert_eq!(around_b, vec![AgentId(1), AgentId(2)]);

    // Direct occupants are not neighbors.
    assert_eq!(network.agents_at(b).unwrap(), &[AgentId(3)]);

    network.move_agent(AgentId(1), b).unwrap();
    assert_eq!(network.agents_at(b).unwrap(), &[AgentId(3), AgentId(1)]);
    assert!(network.agents_at(a).unwrap().is_empty());
}

#[test]
fn network_space_rejects_unknown_node() {
    let mut network = NetworkSpace::new();
    let a = network.add_node("a");

    let err = network.place_agent(AgentId(1), NodeIndex::new(9)).unwrap_err();
    assert!(matches!(err, SpaceError::UnknownNode { index: 9 }));

    let err = network.add_link(a, NodeIndex::new(9)).unwrap_err();
    assert!(matches!(err, SpaceError::UnknownNode { index: 9 }));
}
