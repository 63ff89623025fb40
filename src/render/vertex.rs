use bytemuck::{Pod, Zeroable};

/// Per-vertex data for the lattice. Height is computed in the vertex shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct GridVertex {
    pub position: [f32; 3],
}

impl GridVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<GridVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![
            0 => Float32x3,  // position
        ],
    };
}

/// Uniform block shared by both shader stages. Layout matches `Overlay` in
/// `overlay.wgsl` (112 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct OverlayUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// Linear or sRGB color, depending on the surface, plus opacity in `w`.
    pub color: [f32; 4],
    pub time: f32,
    pub height_scale: f32,
    pub amplitude: f32,
    pub frequency: f32,
    pub speed: f32,
    pub _pad: [f32; 3],
}
