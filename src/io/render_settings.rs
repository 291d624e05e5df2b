use crate::core::rasterizer::RasterizerOptions;
use crate::geometry::math::{Mat4, Vec3};
use crate::geometry::transform::TransformFactory;
use crate::geometry::triangle::Vertex;
use crate::material_system::texture::TextureAddressing;

/// Which built-in scene to draw when no geometry is configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DemoScene {
    #[default]
    Triangle,
    Quad,
}

impl DemoScene {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "triangle" => Some(Self::Triangle),
            "quad" => Some(Self::Quad),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Triangle => "triangle",
            Self::Quad => "quad",
        }
    }
}

/// Object placement in normalized device space. When present, positions go
/// through `viewport * model`; when absent they are pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub position: Vec3,
    /// Euler angles in degrees, applied X then Y then Z.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl ModelSettings {
    pub fn matrix(&self) -> Mat4 {
        TransformFactory::model(&self.position, &self.rotation, &self.scale)
    }
}

/// Everything a render run can be configured with, from TOML or the CLI.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    // ===== files =====
    /// Base name of the output images
    pub output: String,
    /// Directory the images are written to
    pub output_dir: String,
    /// Texture image modulating the vertex colors
    pub texture: Option<String>,

    // ===== render =====
    pub width: usize,
    pub height: usize,
    /// Row stride of the color buffer in bytes, `None` for tightly packed
    pub pitch: Option<usize>,
    /// Depth test on a one-byte depth buffer
    pub use_zbuffer: bool,
    /// Shade triangle rows on the rayon pool
    pub use_multithreading: bool,
    pub texture_addressing: TextureAddressing,
    /// Also write a color-mapped depth image
    pub save_depth: bool,
    pub demo: DemoScene,

    // ===== scene =====
    pub model: Option<ModelSettings>,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<usize>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            output: "frame".to_string(),
            output_dir: "output".to_string(),
            texture: None,

            width: 640,
            height: 480,
            pitch: None,
            use_zbuffer: true,
            use_multithreading: false,
            texture_addressing: TextureAddressing::Clamp,
            save_depth: true,
            demo: DemoScene::Triangle,

            model: None,
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }
}

impl RenderSettings {
    pub fn rasterizer_options(&self) -> RasterizerOptions {
        RasterizerOptions {
            depth_test: self.use_zbuffer,
            multithreading: self.use_multithreading,
            texture_addressing: self.texture_addressing,
            pitch: self.pitch,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "Image size must be positive, got {}x{}",
                self.width, self.height
            ));
        }
        if let Some(pitch) = self.pitch {
            if pitch < self.width * 4 {
                return Err(format!(
                    "Pitch {} is smaller than a row of {} pixels",
                    pitch, self.width
                ));
            }
        }
        if self.output.trim().is_empty() {
            return Err("Output name must not be empty".to_string());
        }
        if !self.indices.is_empty() && self.indices.len() % 3 != 0 {
            return Err(format!(
                "Index count {} is not a multiple of 3",
                self.indices.len()
            ));
        }
        if let Some(&index) = self.indices.iter().find(|&&i| i >= self.vertices.len()) {
            return Err(format!(
                "Index {} is out of range for {} vertices",
                index,
                self.vertices.len()
            ));
        }
        Ok(())
    }
}

pub fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err("Expected 3 comma-separated values".to_string());
    }
    let x = parts[0]
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("Invalid number '{}': {}", parts[0], e))?;
    let y = parts[1]
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("Invalid number '{}': {}", parts[1], e))?;
    let z = parts[2]
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("Invalid number '{}': {}", parts[2], e))?;
    Ok(Vec3::new(x, y, z))
}

pub fn format_vec3(v: &Vec3) -> String {
    format!("{},{},{}", v.x, v.y, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::math::Vec2;

    #[test]
    fn parses_comma_separated_vectors() {
        assert_eq!(parse_vec3(" 1, -2.5 ,3").unwrap(), Vec3::new(1.0, -2.5, 3.0));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("1,x,3").is_err());
        assert_eq!(
            parse_vec3(&format_vec3(&Vec3::new(0.5, 0.0, -1.0))).unwrap(),
            Vec3::new(0.5, 0.0, -1.0)
        );
    }

    #[test]
    fn options_follow_settings() {
        let settings = RenderSettings {
            use_zbuffer: false,
            use_multithreading: true,
            texture_addressing: TextureAddressing::Repeat,
            pitch: Some(4096),
            ..Default::default()
        };
        assert_eq!(
            settings.rasterizer_options(),
            RasterizerOptions {
                depth_test: false,
                multithreading: true,
                texture_addressing: TextureAddressing::Repeat,
                pitch: Some(4096),
            }
        );
    }

    #[test]
    fn validation_catches_bad_geometry() {
        let vertex = Vertex::new(Vec3::zeros(), Vec3::zeros(), Vec2::zeros());
        let mut settings = RenderSettings {
            vertices: vec![vertex; 3],
            indices: vec![0, 1],
            ..Default::default()
        };
        assert!(settings.validate().is_err());
        settings.indices = vec![0, 1, 3];
        assert!(settings.validate().is_err());
        settings.indices = vec![0, 1, 2];
        assert!(settings.validate().is_ok());

        settings.pitch = Some(10);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn default_model_is_identity() {
        assert_eq!(ModelSettings::default().matrix(), Mat4::identity());
    }
}
