//! Heightmap acquisition: fetch over HTTP or read from disk, then decode.

use std::path::{Path, PathBuf};

use crate::error::OverlayResult;
use crate::terrain::HeightmapImage;

/// Where an elevation image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeightmapSource {
    Url(String),
    Path(PathBuf),
}

impl HeightmapSource {
    pub fn parse(source: &str) -> Self {
        let trimmed = source.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::Path(PathBuf::from(trimmed))
        }
    }
}

impl std::fmt::Display for HeightmapSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Tile URLs usually carry an access token in the query string.
            Self::Url(url) => f.write_str(url.split('?').next().unwrap_or(url)),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetch and decode a heightmap. Blocking.
pub fn load_heightmap(source: &HeightmapSource) -> OverlayResult<HeightmapImage> {
    let bytes = match source {
        HeightmapSource::Url(url) => fetch_url(url)?,
        HeightmapSource::Path(path) => read_file(path)?,
    };
    decode_heightmap(&bytes)
}

/// Decode an encoded image into RGBA8 texels. Rows stay in file order.
pub fn decode_heightmap(bytes: &[u8]) -> OverlayResult<HeightmapImage> {
    let img = image::load_from_memory(bytes)?.to_rgba8();
    Ok(HeightmapImage::from_rgba(img))
}

/// Load a heightmap on a background thread and hand the result to `deliver`
/// from that thread.
pub fn spawn_loader<F>(source: HeightmapSource, deliver: F) -> std::io::Result<()>
where
    F: FnOnce(HeightmapSource, OverlayResult<HeightmapImage>) + Send + 'static,
{
    std::thread::Builder::new()
        .name("heightmap-loader".to_string())
        .spawn(move || {
            log::info!("loading heightmap from {source}");
            let result = load_heightmap(&source);
            deliver(source, result);
        })
        .map(|_| ())
}

fn fetch_url(url: &str) -> OverlayResult<Vec<u8>> {
    let mut response = ureq::get(url).call()?;
    let bytes = response
        .body_mut()
        .with_config()
        .limit(64 * 1024 * 1024)
        .read_to_vec()?;
    Ok(bytes)
}

fn read_file(path: &Path) -> OverlayResult<Vec<u8>> {
    Ok(std::fs::read(path)?)
}
