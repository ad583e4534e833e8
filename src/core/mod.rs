pub mod error;
pub mod grid;
pub mod types;

pub use error::{ForgeError, PlacementError, Result};
pub use grid::{Coord, Footprint, Grid};
