/// Errors raised while setting up or feeding the overlay.
///
/// Grid and GPU setup failures are fatal at startup. Heightmap failures are
/// reported to the caller, which keeps rendering against the sea-level
/// placeholder.
#[derive(thiserror::Error, Debug)]
pub enum OverlayError {
    #[error("invalid grid {width}x{length}: width and length must both be at least 2")]
    InvalidGrid { width: u32, length: u32 },

    #[error("grid {width}x{length} has more vertices than a 32-bit index can address")]
    GridTooLarge { width: u32, length: u32 },

    #[error("grid {width}x{length} needs a {bytes}-byte buffer, over the device limit of {max}")]
    GridExceedsBufferLimit { width: u32, length: u32, bytes: u64, max: u64 },

    #[error("heightmap is empty ({width}x{height})")]
    EmptyHeightmap { width: u32, height: u32 },

    #[error("heightmap {width}x{height} exceeds the device texture limit of {max}")]
    HeightmapTooLarge { width: u32, height: u32, max: u32 },

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter found: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("failed to fetch heightmap: {0}")]
    Fetch(#[from] ureq::Error),

    #[error("failed to decode heightmap: {0}")]
    Decode(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type OverlayResult<T> = Result<T, OverlayError>;
