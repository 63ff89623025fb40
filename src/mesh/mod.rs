//! CPU-side geometry for the wireframe lattice.

mod grid;

pub use grid::{GridMesh, GridSpec};
