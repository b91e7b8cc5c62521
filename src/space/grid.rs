use crate::common::{AgentId, SpaceError, SpaceResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Integer cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i64,
    pub y: i64,
}

impl Coord {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Neighborhood {
    /// All eight surrounding cells (diagonals included).
    Moore,
    /// The four orthogonally adjacent cells.
    VonNeumann,
}

/// Rectangular geometry shared by the grid variants.
#[derive(Debug, Clone, Copy)]
struct Geometry {
    width: i64,
    height: i64,
    torus: bool,
}

impl Geometry {
    fn new(width: i64, height: i64, torus: bool) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        Self {
            width,
            height,
            torus,
        }
    }

    fn out_of_bounds(&self, pos: Coord) -> bool {
        pos.x < 0 || pos.x >= self.width || pos.y < 0 || pos.y >= self.height
    }

    /// Resolve a raw coordinate: wrap on a torus, reject out-of-bounds
    /// otherwise.
    fn resolve(&self, pos: Coord) -> SpaceResult<Coord> {
        if !self.out_of_bounds(pos) {
            return Ok(pos);
        }
        if !self.torus {
            return Err(SpaceError::OutOfBounds { x: pos.x, y: pos.y });
        }
        Ok(Coord::new(
            pos.x.rem_euclid(self.width),
            pos.y.rem_euclid(self.height),
        ))
    }

    fn offset(&self, pos: Coord) -> usize {
        (pos.y * self.width + pos.x) as usize
    }

    /// Cells around `center`. On a torus the neighborhood wraps; otherwise
    /// it is clipped at the edges. Duplicates from wrapping on small grids
    /// are removed, first occurrence wins.
    fn neighborhood(
        &self,
        center: Coord,
        kind: Neighborhood,
        radius: i64,
        include_center: bool,
    ) -> SpaceResult<Vec<Coord>> {
        let center = self.resolve(center)?;
        let mut seen = HashSet::new();
        let mut cells = Vec::new();
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx == 0 && dy == 0 && !include_center {
                    continue;
                }
                if kind == Neighborhood::VonNeumann && dx.abs() + dy.abs() > radius {
                    continue;
                }
                match self.resolve(Coord::new(center.x + dx, center.y + dy)) {
                    Ok(pos) => {
                        if seen.insert(pos) {
                            cells.push(pos);
                        }
                    }
                    Err(_) => continue,
                }
            }
        }
        Ok(cells)
    }

    fn coords(&self) -> impl Iterator<Item = Coord> {
        let width = self.width;
        let height = self.height;
        (0..height).flat_map(move |y| (0..width).map(move |x| Coord::new(x, y)))
    }
}

/// Rectangular grid holding at most one agent per cell.
#[derive(Debug, Clone)]
pub struct Grid {
    geometry: Geometry,
    cells: Vec<Option<AgentId>>,
    index: HashMap<AgentId, Coord>,
}

impl Grid {
    pub fn new(width: i64, height: i64, torus: bool) -> Self {
        let geometry = Geometry::new(width, height, torus);
        Self {
            geometry,
            cells: vec![None; (width * height) as usize],
            index: HashMap::new(),
        }
    }

    pub fn width(&self) -> i64 {
        self.geometry.width
    }

    pub fn height(&self) -> i64 {
        self.geometry.height
    }

    pub fn is_torus(&self) -> bool {
        self.geometry.torus
    }

    pub fn agent_count(&self) -> usize {
        self.index.len()
    }

    pub fn out_of_bounds(&self, pos: Coord) -> bool {
        self.geometry.out_of_bounds(pos)
    }

    pub fn agent_at(&self, pos: Coord) -> SpaceResult<Option<AgentId>> {
        let pos = self.geometry.resolve(pos)?;
        Ok(self.cells[self.geometry.offset(pos)])
    }

    pub fn is_cell_empty(&self, pos: Coord) -> bool {
        matches!(self.agent_at(pos), Ok(None))
    }

    pub fn place_agent(&mut self, id: AgentId, pos: Coord) -> SpaceResult<()> {
        let pos = self.geometry.resolve(pos)?;
        if self.index.contains_key(&id) {
            return Err(SpaceError::AgentAlreadyPlaced { id });
        }
        let offset = self.geometry.offset(pos);
        if self.cells[offset].is_some() {
            return Err(SpaceError::CellOccupied { x: pos.x, y: pos.y });
        }
        self.cells[offset] = Some(id);
        self.index.insert(id, pos);
        Ok(())
    }

    /// Move a placed agent. Returns the resolved destination.
    pub fn move_agent(&mut self, id: AgentId, to: Coord) -> SpaceResult<Coord> {
        let to = self.geometry.resolve(to)?;
        let from = *self
            .index
            .get(&id)
            .ok_or(SpaceError::AgentNotPlaced { id })?;
        if from == to {
            return Ok(to);
        }
        let offset = self.geometry.offset(to);
        if self.cells[offset].is_some() {
            return Err(SpaceError::CellOccupied { x: to.x, y: to.y });
        }
        self.cells[self.geometry.offset(from)] = None;
        self.cells[offset] = Some(id);
        self.index.insert(id, to);
        Ok(to)
    }

    /// Remove a placed agent. Returns the cell it vacated.
    pub fn remove_agent(&mut self, id: AgentId) -> SpaceResult<Coord> {
        let pos = self
            .index
            .remove(&id)
            .ok_or(SpaceError::AgentNotPlaced { id })?;
        self.cells[self.geometry.offset(pos)] = None;
        Ok(pos)
    }

    pub fn position_of(&self, id: AgentId) -> Option<Coord> {
        self.index.get(&id).copied()
    }

    pub fn neighborhood(
        &self,
        center: Coord,
        kind: Neighborhood,
        radius: i64,
        include_center: bool,
    ) -> SpaceResult<Vec<Coord>> {
        self.geometry
            .neighborhood(center, kind, radius, include_center)
    }

    /// Agents occupying the neighborhood of `center`.
    pub fn neighbors(
        &self,
        center: Coord,
        kind: Neighborhood,
        radius: i64,
        include_center: bool,
    ) -> SpaceResult<Vec<AgentId>> {
        let cells = self.neighborhood(center, kind, radius, include_center)?;
        Ok(cells
            .into_iter()
            .filter_map(|pos| self.cells[self.geometry.offset(pos)])
            .collect())
    }

    pub fn random_empty_cell(&self, rng: &mut StdRng) -> SpaceResult<Coord> {
        let empties: Vec<Coord> = self
            .geometry
            .coords()
            .filter(|pos| self.cells[self.geometry.offset(*pos)].is_none())
            .collect();
        empties.choose(rng).copied().ok_or(SpaceError::NoEmptyCell)
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        self.geometry.coords()
    }

    pub fn agents(&self) -> impl Iterator<Item = (AgentId, Coord)> + '_ {
        self.index.iter().map(|(id, pos)| (*id, *pos))
    }
}

/// Rectangular grid allowing any number of agents per cell.
#[derive(Debug, Clone)]
pub struct MultiGrid {
    geometry: Geometry,
    cells: Vec<Vec<AgentId>>,
    index: HashMap<AgentId, Coord>,
}

impl MultiGrid {
    pub fn new(width: i64, height: i64, torus: bool) -> Self {
        let geometry = Geometry::new(width, height, torus);
        Self {
            geometry,
            cells: vec![Vec::new(); (width * height) as usize],
            index: HashMap::new(),
        }
    }

    pub fn width(&self) -> i64 {
        self.geometry.width
    }

    pub fn height(&self) -> i64 {
        self.geometry.height
    }

    pub fn is_torus(&self) -> bool {
        self.geometry.torus
    }

    pub fn agent_count(&self) -> usize {
        self.index.len()
    }

    pub fn out_of_bounds(&self, pos: Coord) -> bool {
        self.geometry.out_of_bounds(pos)
    }

    /// Occupants of a cell, in placement order.
    pub fn agents_at(&self, pos: Coord) -> SpaceResult<&[AgentId]> {
        let pos = self.geometry.resolve(pos)?;
        Ok(&self.cells[self.geometry.offset(pos)])
    }

    pub fn place_agent(&mut self, id: AgentId, pos: Coord) -> SpaceResult<()> {
        let pos = self.geometry.resolve(pos)?;
        if self.index.contains_key(&id) {
            return Err(SpaceError::AgentAlreadyPlaced { id });
        }
        self.cells[self.geometry.offset(pos)].push(id);
        self.index.insert(id, pos);
        Ok(())
    }

    pub fn move_agent(&mut self, id: AgentId, to: Coord) -> SpaceResult<Coord> {
        let to = self.geometry.resolve(to)?;
        let from = *self
            .index
            .get(&id)
            .ok_or(SpaceError::AgentNotPlaced { id })?;
        if from == to {
            return Ok(to);
        }
        let from_offset = self.geometry.offset(from);
        self.cells[from_offset].retain(|occupant| *occupant != id);
        self.cells[self.geometry.offset(to)].push(id);
        self.index.insert(id, to);
        Ok(to)
    }

    pub fn remove_agent(&mut self, id: AgentId) -> SpaceResult<Coord> {
        let pos = self
            .index
            .remove(&id)
            .ok_or(SpaceError::AgentNotPlaced { id })?;
        self.cells[self.geometry.offset(pos)].retain(|occupant| *occupant != id);
        Ok(pos)
    }

    pub fn position_of(&self, id: AgentId) -> Option<Coord> {
        self.index.get(&id).copied()
    }

    pub fn neighborhood(
        &self,
        center: Coord,
        kind: Neighborhood,
        radius: i64,
        include_center: bool,
    ) -> SpaceResult<Vec<Coord>> {
        self.geometry
            .neighborhood(center, kind, radius, include_center)
    }

    pub fn neighbors(
        &self,
        center: Coord,
        kind: Neighborhood,
        radius: i64,
        include_center: bool,
    ) -> SpaceResult<Vec<AgentId>> {
        let cells = self.neighborhood(center, kind, radius, include_center)?;
        Ok(cells
            .into_iter()
            .flat_map(|pos| self.cells[self.geometry.offset(pos)].iter().copied())
            .collect())
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        self.geometry.coords()
    }

    pub fn agents(&self) -> impl Iterator<Item = (AgentId, Coord)> + '_ {
        self.index.iter().map(|(id, pos)| (*id, *pos))
    }
}
