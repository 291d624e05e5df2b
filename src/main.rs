use log::{info, warn};
use softraster::core::renderer::render_scene;
use softraster::core::scene::Scene;
use softraster::io::simple_cli::SimpleCli;
use softraster::material_system::texture::Texture;
use softraster::utils::save_utils::save_render_result;
use std::fs;
use std::time::Instant;

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let start_time = Instant::now();
    let settings = SimpleCli::process()?;

    // A missing texture is not fatal; the scene renders with vertex colors.
    let texture = match &settings.texture {
        Some(path) => match Texture::from_file(path) {
            Ok(texture) => Some(texture),
            Err(e) => {
                warn!("{}, rendering untextured", e);
                None
            }
        },
        None => None,
    };

    let scene = Scene::from_settings(&settings);
    info!(
        "Scene: {} vertices, {} triangles, {}",
        scene.vertices.len(),
        scene.triangle_count(),
        if scene.model.is_some() {
            "normalized device coordinates"
        } else {
            "pixel coordinates"
        }
    );

    let rasterizer = render_scene(&settings, &scene, texture.as_ref())?;

    fs::create_dir_all(&settings.output_dir).map_err(|e| {
        format!(
            "Failed to create output directory '{}': {}",
            settings.output_dir, e
        )
    })?;
    save_render_result(&rasterizer, &settings)?;

    info!("Done in {:?}", start_time.elapsed());
    Ok(())
}
