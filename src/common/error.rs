use crate::common::AgentId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Duplicate agent: {id}")]
    DuplicateAgent { id: AgentId },

    #[error("Agent not found: {id}")]
    AgentNotFound { id: AgentId },

    #[error("Unknown table: {name}")]
    UnknownTable { name: String },

    #[error("Table {name} expects {expected} columns, got {actual}")]
    ColumnMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Background task failed: {reason}")]
    TaskFailed { reason: String },

    #[error("Space error: {0}")]
    Space(#[from] SpaceError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum SpaceError {
    #[error("Position out of bounds: ({x}, {y})")]
    OutOfBounds { x: i64, y: i64 },

    #[error("Position outside region: ({x}, {y})")]
    OutOfRegion { x: f64, y: f64 },

    #[error("Cell already occupied at ({x}, {y})")]
    CellOccupied { x: i64, y: i64 },

    #[error("Agent already placed: {id}")]
    AgentAlreadyPlaced { id: AgentId },

    #[error("Agent not placed: {id}")]
    AgentNotPlaced { id: AgentId },

    #[error("Unknown node: {index}")]
    UnknownNode { index: usize },

    #[error("No empty cell available")]
    NoEmptyCell,
}

pub type ModelResult<T> = Result<T, ModelError>;
pub type SpaceResult<T> = Result<T, SpaceError>;
