use nalgebra::Vector3;

/// Represents an RGB color with float components [0.0, 1.0].
pub type Color = Vector3<f32>;

/// Converts one float channel to a byte: clamp to [0, 1], scale, round.
#[inline]
pub fn unit_to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Converts an RGB color in [0, 1] to three bytes.
#[inline]
pub fn color_to_rgb8(color: &Color) -> [u8; 3] {
    [unit_to_u8(color.x), unit_to_u8(color.y), unit_to_u8(color.z)]
}

/// Converts three RGB bytes to a float color.
#[inline]
pub fn rgb8_to_color(r: u8, g: u8, b: u8) -> Color {
    Color::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}

/// Applies the JET colormap to normalized values in [0, 1].
///
/// # Arguments
/// * `normalized` - One value per pixel, row-major.
/// * `width` - Image width in pixels.
/// * `height` - Image height in pixels.
///
/// # Returns
/// Flattened RGB bytes. Non-finite values stay black.
pub fn apply_colormap_jet(
    normalized: &[f32],
    width: usize,
    height: usize,
) -> Result<Vec<u8>, String> {
    let num_pixels = width * height;
    if normalized.len() != num_pixels {
        return Err(format!(
            "colormap input has {} values, expected {}x{}",
            normalized.len(),
            width,
            height
        ));
    }

    let mut result = vec![0u8; num_pixels * 3];

    for (index, &value) in normalized.iter().enumerate() {
        if !value.is_finite() {
            continue;
        }
        let value = value.clamp(0.0, 1.0);

        let mut r = 0.0;
        let g;
        let mut b = 0.0;

        if value <= 0.25 {
            // Blue to Cyan
            b = 1.0;
            g = value * 4.0;
        } else if value <= 0.5 {
            // Cyan to Green
            g = 1.0;
            b = 1.0 - (value - 0.25) * 4.0;
        } else if value <= 0.75 {
            // Green to Yellow
            g = 1.0;
            r = (value - 0.5) * 4.0;
        } else {
            // Yellow to Red
            r = 1.0;
            g = 1.0 - (value - 0.75) * 4.0;
        }

        let base_index = index * 3;
        result[base_index..base_index + 3].copy_from_slice(&color_to_rgb8(&Color::new(r, g, b)));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_conversion_rounds_and_clamps() {
        assert_eq!(unit_to_u8(0.0), 0);
        assert_eq!(unit_to_u8(1.0), 255);
        assert_eq!(unit_to_u8(0.5), 128);
        assert_eq!(unit_to_u8(1.0 / 3.0), 85);
        assert_eq!(unit_to_u8(0.998), 254);
        assert_eq!(unit_to_u8(-0.2), 0);
        assert_eq!(unit_to_u8(7.0), 255);
    }

    #[test]
    fn byte_round_trip_is_lossless() {
        for byte in [0u8, 1, 17, 128, 254, 255] {
            let c = rgb8_to_color(byte, byte, byte);
            assert_eq!(color_to_rgb8(&c), [byte; 3]);
        }
    }

    #[test]
    fn jet_endpoints() {
        let out = apply_colormap_jet(&[0.0, 1.0, f32::NAN], 3, 1).unwrap();
        assert_eq!(&out[0..3], &[0, 0, 255]);
        assert_eq!(&out[3..6], &[255, 0, 0]);
        assert_eq!(&out[6..9], &[0, 0, 0]);
    }

    #[test]
    fn jet_rejects_size_mismatch() {
        assert!(apply_colormap_jet(&[0.0; 3], 2, 2).is_err());
    }
}
