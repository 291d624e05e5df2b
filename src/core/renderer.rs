use super::rasterizer::Rasterizer;
use super::scene::Scene;
use crate::io::render_settings::RenderSettings;
use crate::material_system::texture::Texture;
use log::info;
use std::time::Instant;

/// Renders one complete frame of `scene`.
///
/// Builds a rasterizer sized by `settings`, activates the texture and model,
/// draws the indexed geometry between `begin_draw` and `finish`, and returns
/// the rasterizer holding the finished image.
pub fn render_scene<'t>(
    settings: &RenderSettings,
    scene: &Scene,
    texture: Option<&'t Texture>,
) -> Result<Rasterizer<'t>, String> {
    let start = Instant::now();

    let mut rasterizer =
        Rasterizer::with_options(settings.width, settings.height, settings.rasterizer_options())
            .map_err(|e| format!("Failed to create rasterizer: {}", e))?;

    rasterizer.activate_texture(texture);
    match &scene.model {
        Some(model) => rasterizer.activate_model(model),
        None => rasterizer.reset_model(),
    }

    let mut frame = rasterizer.begin_draw();
    let drawn = frame.draw_indexed(&scene.vertices, &scene.indices);
    frame.finish();
    let pixels = drawn.map_err(|e| format!("Failed to draw scene: {}", e))?;

    info!(
        "Rendered {} triangles ({} pixels written) in {:?}",
        scene.triangle_count(),
        pixels,
        start.elapsed()
    );
    Ok(rasterizer)
}
