use crate::geometry::math::{Vec2, Vec3, Vec4};
use crate::geometry::triangle::Vertex;
use crate::io::render_settings::{DemoScene, ModelSettings, RenderSettings, format_vec3, parse_vec3};
use crate::material_system::texture::TextureAddressing;
use log::warn;
use std::path::Path;
use toml::Value;

/// Reads and writes `RenderSettings` as TOML.
pub struct TomlConfigLoader;

impl TomlConfigLoader {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<RenderSettings, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::load_from_content(&content)
    }

    pub fn load_from_content(content: &str) -> Result<RenderSettings, String> {
        let toml_value: Value =
            toml::from_str(content).map_err(|e| format!("Failed to parse TOML: {}", e))?;

        let settings = Self::parse_toml_to_settings(toml_value)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save_to_file<P: AsRef<Path>>(settings: &RenderSettings, path: P) -> Result<(), String> {
        let toml_content = Self::settings_to_toml(settings)?;
        std::fs::write(path, toml_content).map_err(|e| format!("Failed to write config file: {}", e))
    }

    /// Writes a commented config that renders the textured demo quad.
    pub fn create_example_config<P: AsRef<Path>>(path: P) -> Result<(), String> {
        let settings = RenderSettings {
            demo: DemoScene::Quad,
            model: Some(ModelSettings {
                rotation: Vec3::new(0.0, 0.0, 15.0),
                ..Default::default()
            }),
            ..Default::default()
        };

        Self::save_to_file(&settings, path)
    }

    // ===== TOML -> RenderSettings =====

    fn parse_toml_to_settings(toml: Value) -> Result<RenderSettings, String> {
        let mut settings = RenderSettings::default();

        if let Some(files) = toml.get("files").and_then(|v| v.as_table()) {
            Self::parse_files_section(&mut settings, files)?;
        }

        if let Some(render) = toml.get("render").and_then(|v| v.as_table()) {
            Self::parse_render_section(&mut settings, render)?;
        }

        if let Some(model) = toml.get("model").and_then(|v| v.as_table()) {
            settings.model = Some(Self::parse_model_section(model)?);
        }

        settings.vertices = Self::parse_vertex_array(&toml)?;

        if let Some(mesh) = toml.get("mesh").and_then(|v| v.as_table()) {
            settings.indices = Self::parse_mesh_section(mesh)?;
        }

        Ok(settings)
    }

    fn parse_files_section(
        settings: &mut RenderSettings,
        files: &toml::Table,
    ) -> Result<(), String> {
        if let Some(output) = files.get("output").and_then(|v| v.as_str()) {
            settings.output = output.to_string();
        }
        if let Some(output_dir) = files.get("output_dir").and_then(|v| v.as_str()) {
            settings.output_dir = output_dir.to_string();
        }
        if let Some(texture) = files.get("texture").and_then(|v| v.as_str()) {
            settings.texture = Some(texture.to_string());
        }
        Ok(())
    }

    fn parse_render_section(
        settings: &mut RenderSettings,
        render: &toml::Table,
    ) -> Result<(), String> {
        if let Some(width) = render.get("width").and_then(|v| v.as_integer()) {
            settings.width = Self::to_usize("width", width)?;
        }
        if let Some(height) = render.get("height").and_then(|v| v.as_integer()) {
            settings.height = Self::to_usize("height", height)?;
        }
        if let Some(pitch) = render.get("pitch").and_then(|v| v.as_integer()) {
            settings.pitch = Some(Self::to_usize("pitch", pitch)?);
        }
        if let Some(use_zbuffer) = render.get("use_zbuffer").and_then(|v| v.as_bool()) {
            settings.use_zbuffer = use_zbuffer;
        }
        if let Some(multithreading) = render.get("use_multithreading").and_then(|v| v.as_bool()) {
            settings.use_multithreading = multithreading;
        }
        if let Some(save_depth) = render.get("save_depth").and_then(|v| v.as_bool()) {
            settings.save_depth = save_depth;
        }
        if let Some(addressing) = render.get("texture_addressing").and_then(|v| v.as_str()) {
            match TextureAddressing::parse(addressing) {
                Some(mode) => settings.texture_addressing = mode,
                None => warn!(
                    "Unknown texture addressing '{}', keeping {}",
                    addressing,
                    settings.texture_addressing.as_str()
                ),
            }
        }
        if let Some(demo) = render.get("demo").and_then(|v| v.as_str()) {
            match DemoScene::parse(demo) {
                Some(scene) => settings.demo = scene,
                None => warn!(
                    "Unknown demo scene '{}', keeping {}",
                    demo,
                    settings.demo.as_str()
                ),
            }
        }
        Ok(())
    }

    fn parse_model_section(model: &toml::Table) -> Result<ModelSettings, String> {
        let mut parsed = ModelSettings::default();

        if let Some(position) = model.get("position").and_then(|v| v.as_str()) {
            parsed.position =
                parse_vec3(position).map_err(|e| format!("Invalid model position: {}", e))?;
        }
        if let Some(rotation) = model.get("rotation").and_then(|v| v.as_str()) {
            parsed.rotation =
                parse_vec3(rotation).map_err(|e| format!("Invalid model rotation: {}", e))?;
        }
        // Either a uniform factor or "x,y,z".
        match model.get("scale") {
            Some(Value::String(scale)) => {
                parsed.scale =
                    parse_vec3(scale).map_err(|e| format!("Invalid model scale: {}", e))?;
            }
            Some(value) => {
                let factor = Self::as_f32(value).ok_or("Model scale must be a number")?;
                parsed.scale = Vec3::new(factor, factor, factor);
            }
            None => {}
        }
        Ok(parsed)
    }

    fn parse_vertex_array(toml: &Value) -> Result<Vec<Vertex>, String> {
        let mut vertices = Vec::new();

        if let Some(vertex_array) = toml.get("vertex").and_then(|v| v.as_array()) {
            for (i, vertex_value) in vertex_array.iter().enumerate() {
                if let Some(vertex_table) = vertex_value.as_table() {
                    let vertex = Self::parse_single_vertex(vertex_table)
                        .map_err(|e| format!("Vertex {} is invalid: {}", i + 1, e))?;
                    vertices.push(vertex);
                }
            }
        }

        Ok(vertices)
    }

    fn parse_single_vertex(vertex_table: &toml::Table) -> Result<Vertex, String> {
        let position = vertex_table
            .get("position")
            .ok_or("missing position")
            .and_then(|v| Self::float_array(v).ok_or("position must be an array of numbers"))?;
        let position = match position.as_slice() {
            [x, y, z] => Vec4::new(*x, *y, *z, 1.0),
            [x, y, z, w] => Vec4::new(*x, *y, *z, *w),
            _ => return Err(format!("position needs 3 or 4 values, got {}", position.len())),
        };

        let color = match vertex_table.get("color") {
            Some(value) => match Self::float_array(value).as_deref() {
                Some([r, g, b]) => Vec3::new(*r, *g, *b),
                _ => return Err("color must be [r, g, b]".to_string()),
            },
            None => Vec3::new(1.0, 1.0, 1.0),
        };

        let uv = match vertex_table.get("uv") {
            Some(value) => match Self::float_array(value).as_deref() {
                Some([u, v]) => Vec2::new(*u, *v),
                _ => return Err("uv must be [u, v]".to_string()),
            },
            None => Vec2::zeros(),
        };

        Ok(Vertex::homogeneous(position, color, uv))
    }

    fn parse_mesh_section(mesh: &toml::Table) -> Result<Vec<usize>, String> {
        let Some(indices) = mesh.get("indices") else {
            return Ok(Vec::new());
        };
        let indices = indices.as_array().ok_or("mesh indices must be an array")?;
        indices
            .iter()
            .map(|v| {
                v.as_integer()
                    .ok_or_else(|| "mesh indices must be integers".to_string())
                    .and_then(|i| Self::to_usize("index", i))
            })
            .collect()
    }

    fn as_f32(value: &Value) -> Option<f32> {
        match value {
            Value::Float(f) => Some(*f as f32),
            Value::Integer(i) => Some(*i as f32),
            _ => None,
        }
    }

    fn float_array(value: &Value) -> Option<Vec<f32>> {
        value.as_array()?.iter().map(Self::as_f32).collect()
    }

    fn to_usize(name: &str, value: i64) -> Result<usize, String> {
        usize::try_from(value).map_err(|_| format!("{} must not be negative, got {}", name, value))
    }

    // ===== RenderSettings -> TOML =====

    fn settings_to_toml(settings: &RenderSettings) -> Result<String, String> {
        let mut content = String::new();

        content.push_str("# softraster configuration\n");
        content.push_str("# Without [[vertex]] entries the demo scene from [render] is drawn.\n\n");

        content.push_str("[files]\n");
        content.push_str(&format!("output = \"{}\"\n", settings.output));
        content.push_str(&format!("output_dir = \"{}\"\n", settings.output_dir));
        if let Some(texture) = &settings.texture {
            content.push_str(&format!("texture = \"{}\"\n", texture));
        } else {
            content.push_str("# texture = \"path/to/texture.png\"  # modulates vertex colors\n");
        }
        content.push('\n');

        content.push_str("[render]\n");
        content.push_str(&format!("width = {}\n", settings.width));
        content.push_str(&format!("height = {}\n", settings.height));
        if let Some(pitch) = settings.pitch {
            content.push_str(&format!("pitch = {}\n", pitch));
        } else {
            content.push_str("# pitch = 4096  # row stride in bytes, at least width * 4\n");
        }
        content.push_str(&format!("use_zbuffer = {}\n", settings.use_zbuffer));
        content.push_str(&format!(
            "use_multithreading = {}\n",
            settings.use_multithreading
        ));
        content.push_str(&format!(
            "texture_addressing = \"{}\"  # clamp | repeat\n",
            settings.texture_addressing.as_str()
        ));
        content.push_str(&format!("save_depth = {}\n", settings.save_depth));
        content.push_str(&format!(
            "demo = \"{}\"  # triangle | quad\n",
            settings.demo.as_str()
        ));
        content.push('\n');

        if let Some(model) = &settings.model {
            content.push_str("# Positions are normalized device coordinates while [model] is present.\n");
            content.push_str("[model]\n");
            content.push_str(&format!("position = \"{}\"\n", format_vec3(&model.position)));
            content.push_str(&format!("rotation = \"{}\"\n", format_vec3(&model.rotation)));
            content.push_str(&format!("scale = \"{}\"\n", format_vec3(&model.scale)));
            content.push('\n');
        }

        if settings.vertices.is_empty() {
            content.push_str("# [[vertex]]\n");
            content.push_str("# position = [160.0, 430.0, 0.0]  # or [x, y, z, w]\n");
            content.push_str("# color = [1.0, 0.0, 0.0]\n");
            content.push_str("# uv = [0.0, 1.0]\n");
        }
        for vertex in &settings.vertices {
            let p = vertex.position;
            content.push_str("[[vertex]]\n");
            content.push_str(&format!(
                "position = [{:?}, {:?}, {:?}, {:?}]\n",
                p.x, p.y, p.z, p.w
            ));
            content.push_str(&format!(
                "color = [{:?}, {:?}, {:?}]\n",
                vertex.color.x, vertex.color.y, vertex.color.z
            ));
            content.push_str(&format!("uv = [{:?}, {:?}]\n", vertex.uv.x, vertex.uv.y));
            content.push('\n');
        }

        if !settings.indices.is_empty() {
            let indices: Vec<String> = settings.indices.iter().map(|i| i.to_string()).collect();
            content.push_str("[mesh]\n");
            content.push_str(&format!("indices = [{}]\n", indices.join(", ")));
        }

        Ok(content)
    }
}
