use crate::core::frame_buffer::DEPTH_FAR;
use crate::core::rasterizer::Rasterizer;
use crate::io::render_settings::RenderSettings;
use crate::material_system::color::apply_colormap_jet;
use image::{ColorType, RgbaImage};
use log::{debug, info};
use std::path::Path;

/// Writes 8-bit image data to a file, the format picked from the extension.
///
/// # Arguments
/// * `path` - Output file path
/// * `data` - Pixel bytes laid out per `color_type`
/// * `width` - Image width
/// * `height` - Image height
/// * `color_type` - `Rgb8` or `Rgba8`
pub fn save_image(
    path: &Path,
    data: &[u8],
    width: u32,
    height: u32,
    color_type: ColorType,
) -> Result<(), String> {
    image::save_buffer(path, data, width, height, color_type)
        .map_err(|e| format!("Failed to save image to {}: {}", path.display(), e))?;
    info!("Image saved to {}", path.display());
    Ok(())
}

/// Spreads the written depth bytes over [0, 1].
///
/// Cells still at the far value were never drawn and come back as infinity.
/// When every written cell shares one depth, they all map to 0.
pub fn normalize_depth(depth: &[u8]) -> Vec<f32> {
    let written = depth.iter().copied().filter(|&d| d != DEPTH_FAR);
    let (min, max) = written.fold((u8::MAX, u8::MIN), |(lo, hi), d| (lo.min(d), hi.max(d)));

    let range = max.saturating_sub(min) as f32;
    debug!("Normalizing depth over [{}, {}]", min, max);

    depth
        .iter()
        .map(|&d| {
            if d == DEPTH_FAR {
                f32::INFINITY
            } else if range > 0.0 {
                (d - min) as f32 / range
            } else {
                0.0
            }
        })
        .collect()
}

/// Saves `<output>_color.png` and, when enabled and available,
/// `<output>_depth.png` into the configured output directory.
pub fn save_render_result(
    rasterizer: &Rasterizer<'_>,
    settings: &RenderSettings,
) -> Result<(), String> {
    let (width, height) = (rasterizer.width() as u32, rasterizer.height() as u32);
    let output_dir = Path::new(&settings.output_dir);

    let mut color = RgbaImage::new(width, height);
    rasterizer
        .render(&mut color)
        .map_err(|e| format!("Failed to present frame: {}", e))?;
    save_image(
        &output_dir.join(format!("{}_color.png", settings.output)),
        color.as_raw(),
        width,
        height,
        ColorType::Rgba8,
    )?;

    if !settings.save_depth {
        return Ok(());
    }
    let Some(depth_buffer) = rasterizer.depth_buffer() else {
        debug!("Depth test disabled, no depth image to save");
        return Ok(());
    };

    // Nearer is hotter.
    let inverted: Vec<f32> = normalize_depth(depth_buffer.as_slice())
        .iter()
        .map(|&d| 1.0 - d)
        .collect();
    let depth_colored = apply_colormap_jet(&inverted, width as usize, height as usize)?;
    save_image(
        &output_dir.join(format!("{}_depth.png", settings.output)),
        &depth_colored,
        width,
        height,
        ColorType::Rgb8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_written_depths_only() {
        let normalized = normalize_depth(&[10, 20, DEPTH_FAR, 30]);
        assert_eq!(normalized[0], 0.0);
        assert_eq!(normalized[1], 0.5);
        assert!(normalized[2].is_infinite());
        assert_eq!(normalized[3], 1.0);
    }

    #[test]
    fn flat_or_empty_depth_is_handled() {
        assert_eq!(normalize_depth(&[7, 7]), vec![0.0, 0.0]);
        assert!(normalize_depth(&[DEPTH_FAR; 3]).iter().all(|d| d.is_infinite()));
    }

    #[test]
    fn writes_color_and_depth_images() {
        use crate::core::scene::Scene;
        use crate::core::renderer::render_scene;

        let dir = std::env::temp_dir().join(format!("softraster_save_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let settings = RenderSettings {
            width: 200,
            height: 200,
            output: "unit".to_string(),
            output_dir: dir.to_string_lossy().into_owned(),
            ..Default::default()
        };
        let rasterizer = render_scene(&settings, &Scene::from_settings(&settings), None).unwrap();
        save_render_result(&rasterizer, &settings).unwrap();

        let color = image::open(dir.join("unit_color.png")).unwrap().into_rgba8();
        assert_eq!(color.dimensions(), (200, 200));
        assert_eq!(color.get_pixel(0, 0).0, [0, 0, 0, 255]);
        let depth = image::open(dir.join("unit_depth.png")).unwrap().into_rgb8();
        // Flat triangle: every drawn cell is the nearest, so fully red.
        assert_eq!(depth.get_pixel(100, 120).0, [255, 0, 0]);
        assert_eq!(depth.get_pixel(0, 0).0, [0, 0, 0]);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
