use crate::settings::ShaderSettings;

/// Per-frame shader inputs. Written only by the animation driver, read by the
/// renderer during the same tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSet {
    /// Seconds since the first frame was scheduled.
    pub time: f32,
    /// sRGB wireframe color.
    pub color: [f32; 3],
    pub opacity: f32,
    pub height_scale: f32,
    pub amplitude: f32,
    pub frequency: f32,
    pub speed: f32,
}

impl ParameterSet {
    pub fn from_settings(shader: &ShaderSettings) -> Self {
        Self {
            time: 0.0,
            color: [1.0, 1.0, 1.0],
            opacity: shader.opacity,
            height_scale: shader.height_scale,
            amplitude: shader.amplitude,
            frequency: shader.frequency,
            speed: shader.speed,
        }
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::from_settings(&ShaderSettings::default())
    }
}
