//! Animated wireframe terrain overlay.
//!
//! A fixed line-segment lattice is displaced every frame on the GPU by
//! elevation decoded from an RGB-encoded heightmap plus animated value noise.

pub mod anim;
pub mod app;
pub mod error;
pub mod io;
pub mod mesh;
pub mod params;
pub mod render;
pub mod settings;
pub mod style;
pub mod terrain;

pub use error::{OverlayError, OverlayResult};
