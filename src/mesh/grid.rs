use crate::error::{OverlayError, OverlayResult};

/// Lattice resolution, in vertices along X (`width`) and Z (`length`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    width: u32,
    length: u32,
}

impl GridSpec {
    pub fn new(width: u32, length: u32) -> OverlayResult<Self> {
        if width < 2 || length < 2 {
            return Err(OverlayError::InvalidGrid { width, length });
        }
        if width.checked_mul(length).is_none() {
            return Err(OverlayError::GridTooLarge { width, length });
        }
        Ok(Self { width, length })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn vertex_count(&self) -> usize {
        self.width as usize * self.length as usize
    }

    pub fn segment_count(&self) -> usize {
        (self.width as usize - 1) * (self.length as usize - 1)
    }

    /// Size of the vertex buffer: one `[f32; 3]` position per vertex.
    pub fn vertex_bytes(&self) -> u64 {
        self.vertex_count() as u64 * std::mem::size_of::<[f32; 3]>() as u64
    }

    /// Size of the index buffer: two `u32` indices per segment.
    pub fn index_bytes(&self) -> u64 {
        self.segment_count() as u64 * 2 * std::mem::size_of::<u32>() as u64
    }

    /// Check both lattice buffers against a device's `max_buffer_size`.
    pub fn check_buffer_limit(&self, max_buffer_size: u64) -> OverlayResult<()> {
        let bytes = self.vertex_bytes().max(self.index_bytes());
        if bytes > max_buffer_size {
            return Err(OverlayError::GridExceedsBufferLimit {
                width: self.width,
                length: self.length,
                bytes,
                max: max_buffer_size,
            });
        }
        Ok(())
    }

    /// Flat buffer index of the vertex at lattice coordinate (x, z).
    pub fn flat_index(&self, x: u32, z: u32) -> u32 {
        x + z * self.width
    }
}

/// Static line-segment lattice on the XZ plane, centered on the origin and
/// spanning [-0.5, 0.5] on both axes. Height is added by the vertex shader.
#[derive(Debug, Clone)]
pub struct GridMesh {
    pub spec: GridSpec,
    pub positions: Vec<[f32; 3]>,
    /// Line-list indices, two per segment.
    pub indices: Vec<u32>,
}

impl GridMesh {
    pub fn build(spec: GridSpec) -> Self {
        Self {
            spec,
            positions: Self::build_positions(spec),
            indices: Self::build_indices(spec),
        }
    }

    pub fn segment_count(&self) -> usize {
        self.indices.len() / 2
    }

    fn build_positions(spec: GridSpec) -> Vec<[f32; 3]> {
        let mut positions = Vec::with_capacity(spec.vertex_count());
        let max_x = (spec.width - 1) as f32;
        let max_z = (spec.length - 1) as f32;

        for z in 0..spec.length {
            for x in 0..spec.width {
                positions.push([x as f32 / max_x - 0.5, 0.0, z as f32 / max_z - 0.5]);
            }
        }

        positions
    }

    // One segment per cell, from (x, z+1) to (x+1, z). Only this anti-diagonal
    // is emitted; the cell outline is intentionally left open.
    fn build_indices(spec: GridSpec) -> Vec<u32> {
        let mut indices = Vec::with_capacity(spec.segment_count() * 2);

        for z in 0..spec.length - 1 {
            for x in 0..spec.width - 1 {
                indices.push(spec.flat_index(x, z + 1));
                indices.push(spec.flat_index(x + 1, z));
            }
        }

        indices
    }
}
