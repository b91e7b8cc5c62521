use crate::common::{AgentId, SpaceError, SpaceResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Position in a continuous 2-D region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Bounded 2-D region where agents hold real-valued positions.
///
/// On a torus, positions wrap into `[0, width) x [0, height)` and distances
/// use the minimum-image convention.
#[derive(Debug, Clone)]
pub struct ContinuousSpace {
    width: f64,
    height: f64,
    torus: bool,
    positions: HashMap<AgentId, Point>,
}

impl ContinuousSpace {
    pub fn new(width: f64, height: f64, torus: bool) -> Self {
        assert!(
            width > 0.0 && height > 0.0,
            "region dimensions must be positive"
        );
        Self {
            width,
            height,
            torus,
            positions: HashMap::new(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn is_torus(&self) -> bool {
        self.torus
    }

    pub fn agent_count(&self) -> usize {
        self.positions.len()
    }

    fn resolve(&self, pos: Point) -> SpaceResult<Point> {
        let inside =
            pos.x >= 0.0 && pos.x < self.width && pos.y >= 0.0 && pos.y < self.height;
        if inside {
            return Ok(pos);
        }
        if !self.torus {
            return Err(SpaceError::OutOfRegion { x: pos.x, y: pos.y });
        }
        Ok(Point::new(
            pos.x.rem_euclid(self.width),
            pos.y.rem_euclid(self.height),
        ))
    }

    pub fn place_agent(&mut self, id: AgentId, pos: Point) -> SpaceResult<Point> {
        let pos = self.resolve(pos)?;
        if self.positions.contains_key(&id) {
            return Err(SpaceError::AgentAlreadyPlaced { id });
        }
        self.positions.insert(id, pos);
        Ok(pos)
    }

    pub fn move_agent(&mut self, id: AgentId, to: Point) -> SpaceResult<Point> {
        let to = self.resolve(to)?;
        if !self.positions.contains_key(&id) {
            return Err(SpaceError::AgentNotPlaced { id });
        }
        self.positions.insert(id, to);
        Ok(to)
    }

    pub fn remove_agent(&mut self, id: AgentId) -> SpaceResult<Point> {
        self.positions
            .remove(&id)
            .ok_or(SpaceError::AgentNotPlaced { id })
    }

    pub fn position_of(&self, id: AgentId) -> Option<Point> {
        self.positions.get(&id).copied()
    }

    pub fn agents(&self) -> impl Iterator<Item = (AgentId, Point)> + '_ {
        self.positions.iter().map(|(id, pos)| (*id, *pos))
    }

    /// Displacement from `from` to `to`, minimum-image on a torus.
    pub fn displacement(&self, from: Point, to: Point) -> (f64, f64) {
        let mut dx = to.x - from.x;
        let mut dy = to.y - from.y;
        if self.torus {
            if dx.abs() > self.width / 2.0 {
                dx -= self.width * dx.signum();
            }
            if dy.abs() > self.height / 2.0 {
                dy -= self.height * dy.signum();
            }
        }
        (dx, dy)
    }

    pub fn distance(&self, a: Point, b: Point) -> f64 {
        let (dx, dy) = self.displacement(a, b);
        dx.hypot(dy)
    }

    /// Agents within `radius` of `center` (inclusive), with their positions.
    pub fn neighbors_within(&self, center: Point, radius: f64) -> Vec<(AgentId, Point)> {
        self.positions
            .iter()
            .filter(|(_, pos)| self.distance(center, **pos) <= radius)
            .map(|(id, pos)| (*id, *pos))
            .collect()
    }
}
