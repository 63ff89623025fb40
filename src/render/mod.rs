mod renderer;
mod camera;
mod grid;
mod heightmap;
mod vertex;

pub use renderer::Renderer;
pub use camera::Camera;
pub use grid::GridRenderer;
pub use heightmap::HeightmapTexture;
pub use vertex::{GridVertex, OverlayUniforms};
