pub mod continuous;
pub mod grid;
pub mod network;

pub use continuous::*;
pub use grid::*;
pub use network::*;
