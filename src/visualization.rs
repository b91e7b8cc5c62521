use crate::common::AgentId;
use crate::space::{Coord, Grid, MultiGrid};

/// A renderable piece of a terminal visualization.
pub trait TextElement<M> {
    fn render(&self, model: &M) -> String;
}

/// Renders a single-occupancy grid as text, one row per line, row 0 at the
/// top. The cell closure maps an occupant (or empty cell) to a character.
pub struct TextGrid<M> {
    grid: Box<dyn Fn(&M) -> &Grid + Send>,
    cell: Box<dyn Fn(Option<AgentId>) -> char + Send>,
}

impl<M> TextGrid<M> {
    pub fn new(
        grid: impl Fn(&M) -> &Grid + Send + 'static,
        cell: impl Fn(Option<AgentId>) -> char + Send + 'static,
    ) -> Self {
        Self {
            grid: Box::new(grid),
            cell: Box::new(cell),
        }
    }
}

impl<M> TextElement<M> for TextGrid<M> {
    fn render(&self, model: &M) -> String {
        let grid = (self.grid)(model);
        let mut out = String::new();
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let occupant = grid.agent_at(Coord::new(x, y)).ok().flatten();
                out.push((self.cell)(occupant));
            }
            out.push('\n');
        }
        out
    }
}

/// Renders a multi-occupancy grid as text. The cell closure maps the
/// occupants of a cell to a character.
pub struct TextMultiGrid<M> {
    grid: Box<dyn Fn(&M) -> &MultiGrid + Send>,
    cell: Box<dyn Fn(&[AgentId]) -> char + Send>,
}

impl<M> TextMultiGrid<M> {
    pub fn new(
        grid: impl Fn(&M) -> &MultiGrid + Send + 'static,
        cell: impl Fn(&[AgentId]) -> char + Send + 'static,
    ) -> Self {
        Self {
            grid: Box::new(grid),
            cell: Box::new(cell),
        }
    }
}

impl<M> TextElement<M> for TextMultiGrid<M> {
    fn render(&self, model: &M) -> String {
        let grid = (self.grid)(model);
        let mut out = String::new();
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let occupants = grid
                    .agents_at(Coord::new(x, y))
                    .unwrap_or(&[]);
                out.push((self.cell)(occupants));
            }
            out.push('\n');
        }
        out
    }
}

/// Renders named model values, one `label: value` line each.
pub struct TextData<M> {
    fields: Vec<(String, Box<dyn Fn(&M) -> String + Send>)>,
}

impl<M> TextData<M> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn add_field(
        &mut self,
        label: impl Into<String>,
        value: impl Fn(&M) -> String + Send + 'static,
    ) {
        self.fields.push((label.into(), Box::new(value)));
    }
}

impl<M> Default for TextData<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> TextElement<M> for TextData<M> {
    fn render(&self, model: &M) -> String {
        let mut out = String::new();
        for (label, value) in &self.fields {
            out.push_str(label);
            out.push_str(": ");
            out.push_str(&value(model));
            out.push('\n');
        }
        out
    }
}

/// An ordered collection of text elements rendered together.
pub struct TextVisualization<M> {
    elements: Vec<Box<dyn TextElement<M> + Send>>,
}

impl<M> TextVisualization<M> {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    pub fn add_element(&mut self, element: impl TextElement<M> + Send + 'static) {
        self.elements.push(Box::new(element));
    }

    pub fn render_all(&self, model: &M) -> String {
        self.elements
            .iter()
            .map(|element| element.render(model))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<M> Default for TextVisualization<M> {
    fn default() -> Self {
        Self::new()
    }
}
