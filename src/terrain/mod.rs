//! Per-vertex terrain displacement: elevation decoding, value noise, and their
//! composition.

pub mod displace;
pub mod elevation;
mod heightmap;
pub mod noise;

pub use displace::{displace, displace_all};
pub use heightmap::HeightmapImage;
