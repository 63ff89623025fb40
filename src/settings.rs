use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// All user-configurable settings, persisted to JSON.
#[derive(Default, Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct Settings {
    pub grid: GridSettings,
    pub shader: ShaderSettings,
    pub camera: CameraSettings,
    pub heightmap: HeightmapSettings,
    pub style: StyleSettings,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct GridSettings {
    pub width: u32,
    pub length: u32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self { width: 512, length: 512 }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ShaderSettings {
    pub opacity: f32,
    pub height_scale: f32,
    pub amplitude: f32,
    pub frequency: f32,
    pub speed: f32,
}

impl Default for ShaderSettings {
    fn default() -> Self {
        Self {
            opacity: 0.12,
            height_scale: 1.0,
            amplitude: 0.01,
            frequency: 4.0,
            speed: 0.1,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct CameraSettings {
    pub fov_degrees: f32,
    pub near_plane: f32,
    pub far_plane: f32,
    pub eye: [f32; 3],
    pub target: [f32; 3],
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 32.0,
            near_plane: 0.1,
            far_plane: 1000.0,
            eye: [0.0, 0.5, -0.5],
            target: [0.0, 0.0, 0.0],
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct HeightmapSettings {
    /// URL (`http://`, `https://`) or filesystem path of an RGB-encoded
    /// elevation image. Without one the overlay renders flat.
    pub source: Option<String>,
}

/// Named style sheets the wireframe color is read from.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct StyleSettings {
    pub active_theme: usize,
    pub themes: Vec<Theme>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Theme {
    pub name: String,
    /// Custom properties, e.g. `--wireframe-color` -> `#ffffff`.
    pub properties: BTreeMap<String, String>,
    pub background: [f32; 3],
}

impl Theme {
    fn new(name: &str, wireframe_color: &str, background: [f32; 3]) -> Self {
        let mut properties = BTreeMap::new();
        properties.insert(
            crate::style::WIREFRAME_COLOR_PROPERTY.to_string(),
            wireframe_color.to_string(),
        );
        Self { name: name.to_string(), properties, background }
    }
}

impl Default for StyleSettings {
    fn default() -> Self {
        Self {
            active_theme: 0,
            themes: vec![
                Theme::new("dark", "#ffffff", [0.0, 0.0, 0.0]),
                Theme::new("light", "#1a1a1a", [1.0, 1.0, 1.0]),
            ],
        }
    }
}

impl Settings {
    /// Load settings from config file. Falls back to defaults on error.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(&path).map(|data| serde_json::from_str::<Settings>(&data)) {
            Ok(Ok(settings)) => settings,
            Ok(Err(e)) => {
                log::warn!("ignoring malformed settings at {}: {e}", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("could not read settings at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Save settings to config file.
    pub fn save(&self) {
        let path = config_path();
        if let Err(e) = self.save_to(&path) {
            log::warn!("could not save settings to {}: {e}", path.display());
        }
    }

    fn save_to(&self, path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)
    }
}

fn config_path() -> std::path::PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    std::path::PathBuf::from(home).join(".config/terrawire/settings.json")
}
