//! # Triangle rasterizer
//!
//! Owns the output image and depth buffer, tracks the active texture and
//! transform, and scan-converts triangles into the image. Drawing happens
//! through a [`Frame`], obtained from [`Rasterizer::begin_draw`]; the frame
//! holds the only write access to the pixels until it is finished.

use super::display::DisplayTarget;
use super::frame_buffer::{CHANNELS, DEPTH_FAR, DepthBuffer, FrameBuffer, depth_test};
use crate::error::{RasterError, RasterResult};
use crate::geometry::math::{Mat4, Vec2, Vec3};
use crate::geometry::transform::viewport_matrix;
use crate::geometry::triangle::{BoundingBox, Triangle, Vertex};
use crate::material_system::color::{color_to_rgb8, unit_to_u8};
use crate::material_system::texture::{Texture, TextureAddressing};
use log::{debug, info, trace};
use rayon::prelude::*;

/// Construction-time switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterizerOptions {
    /// Allocate a depth buffer and run the less-than test. Without it every
    /// covered pixel is overwritten, so later triangles win.
    pub depth_test: bool,
    /// Shade the rows of each triangle on the rayon pool.
    pub multithreading: bool,
    pub texture_addressing: TextureAddressing,
    /// Row stride in bytes; `None` packs rows at `width * 4`.
    pub pitch: Option<usize>,
}

impl Default for RasterizerOptions {
    fn default() -> Self {
        Self {
            depth_test: true,
            multithreading: false,
            texture_addressing: TextureAddressing::Clamp,
            pitch: None,
        }
    }
}

/// Maps interpolated depth in [0, 1] to the depth buffer's byte range.
#[inline]
pub fn quantize_depth(z: f32) -> u8 {
    if z.is_finite() { unit_to_u8(z) } else { DEPTH_FAR }
}

pub struct Rasterizer<'t> {
    width: usize,
    height: usize,
    frame_buffer: FrameBuffer,
    depth_buffer: Option<DepthBuffer>,
    options: RasterizerOptions,
    viewport_transform: Mat4,
    full_transform: Mat4,
    active_texture: Option<&'t Texture>,
}

impl<'t> Rasterizer<'t> {
    pub fn new(width: usize, height: usize) -> RasterResult<Self> {
        Self::with_options(width, height, RasterizerOptions::default())
    }

    pub fn with_options(
        width: usize,
        height: usize,
        options: RasterizerOptions,
    ) -> RasterResult<Self> {
        let frame_buffer = FrameBuffer::new(width, height, options.pitch)?;
        let depth_buffer = if options.depth_test {
            Some(DepthBuffer::new(width, height)?)
        } else {
            None
        };

        info!(
            "Rasterizer {}x{} (pitch {}, depth test {}, multithreading {})",
            width, height, frame_buffer.pitch, options.depth_test, options.multithreading
        );

        Ok(Self {
            width,
            height,
            frame_buffer,
            depth_buffer,
            options,
            viewport_transform: viewport_matrix(width, height),
            full_transform: Mat4::identity(),
            active_texture: None,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn options(&self) -> &RasterizerOptions {
        &self.options
    }

    pub fn viewport_transform(&self) -> &Mat4 {
        &self.viewport_transform
    }

    /// Transform applied to every vertex position before scan conversion.
    pub fn active_transform(&self) -> &Mat4 {
        &self.full_transform
    }

    pub fn active_texture(&self) -> Option<&'t Texture> {
        self.active_texture
    }

    /// Sets the texture for subsequent draws, `None` disables texturing.
    /// The texture is borrowed for `'t` and must outlive the rasterizer.
    pub fn activate_texture(&mut self, texture: Option<&'t Texture>) {
        self.active_texture = texture;
    }

    /// Positions are in normalized device space from now on:
    /// the active transform becomes `viewport * model`.
    pub fn activate_model(&mut self, model: &Mat4) {
        self.full_transform = self.viewport_transform * model;
    }

    /// Back to identity: positions are pixel coordinates.
    pub fn reset_model(&mut self) {
        self.full_transform = Mat4::identity();
    }

    /// Clears the image to zero and depth to far, and hands out the write
    /// capability for one frame.
    pub fn begin_draw(&mut self) -> Frame<'_, 't> {
        self.frame_buffer.clear();
        if let Some(depth) = self.depth_buffer.as_mut() {
            depth.clear();
        }
        trace!("Frame begun");
        Frame { rasterizer: self }
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame_buffer
    }

    pub fn depth_buffer(&self) -> Option<&DepthBuffer> {
        self.depth_buffer.as_ref()
    }

    /// Hands the last finished frame to a presentation surface.
    pub fn render<D: DisplayTarget + ?Sized>(&self, target: &mut D) -> RasterResult<()> {
        target.present(&self.frame_buffer)
    }
}

/// Exclusive write access to the rasterizer's pixels for one frame.
///
/// Dropping the frame (or calling [`Frame::finish`]) ends it; the borrow
/// checker rules out drawing afterwards or opening a second frame.
pub struct Frame<'r, 't> {
    rasterizer: &'r mut Rasterizer<'t>,
}

impl<'r, 't> Frame<'r, 't> {
    pub fn activate_texture(&mut self, texture: Option<&'t Texture>) {
        self.rasterizer.activate_texture(texture);
    }

    pub fn activate_model(&mut self, model: &Mat4) {
        self.rasterizer.activate_model(model);
    }

    pub fn reset_model(&mut self) {
        self.rasterizer.reset_model();
    }

    /// Writes one pixel's R, G, B if it passes the depth test.
    ///
    /// Returns whether the pixel was written. Coordinates outside the image
    /// are rejected.
    pub fn draw_pixel(&mut self, x: usize, y: usize, depth: u8, color: &Vec3) -> bool {
        let r = &mut *self.rasterizer;
        if x >= r.width || y >= r.height {
            trace!("Rejected pixel ({}, {}) outside {}x{}", x, y, r.width, r.height);
            return false;
        }
        if let Some(depth_buffer) = r.depth_buffer.as_mut() {
            if !depth_buffer.test_and_set(x, y, depth) {
                return false;
            }
        }
        r.frame_buffer.write_rgb(x, y, color_to_rgb8(color));
        true
    }

    /// Scan-converts one triangle under the active transform and texture.
    ///
    /// Returns the number of pixels written. Degenerate triangles and
    /// triangles with non-finite transformed positions draw nothing.
    pub fn draw_triangle(&mut self, triangle: &Triangle) -> usize {
        let Rasterizer {
            width,
            height,
            frame_buffer,
            depth_buffer,
            options,
            full_transform,
            active_texture,
            ..
        } = &mut *self.rasterizer;

        let screen = triangle.transformed(full_transform);
        if !screen.is_finite() {
            debug!("Skipping triangle with non-finite screen position");
            return 0;
        }
        if screen.is_degenerate() {
            debug!("Skipping degenerate triangle");
            return 0;
        }
        let Some(bbox) = BoundingBox::from_triangle(&screen, *width, *height) else {
            return 0;
        };

        let shader = FragmentShader {
            triangle: &screen,
            texture: *active_texture,
            addressing: options.texture_addressing,
        };

        let row_count = bbox.max_y - bbox.min_y + 1;
        let mut depth_rows = depth_buffer
            .as_mut()
            .map(|depth| depth.rows_mut().skip(bbox.min_y));
        let rows: Vec<(usize, &mut [u8], Option<&mut [u8]>)> = frame_buffer
            .rows_mut()
            .enumerate()
            .skip(bbox.min_y)
            .take(row_count)
            .map(|(y, color_row)| {
                let depth_row = depth_rows.as_mut().and_then(|it| it.next());
                (y, color_row, depth_row)
            })
            .collect();

        if options.multithreading {
            rows.into_par_iter()
                .map(|(y, color_row, depth_row)| shader.shade_row(y, &bbox, color_row, depth_row))
                .sum()
        } else {
            rows.into_iter()
                .map(|(y, color_row, depth_row)| shader.shade_row(y, &bbox, color_row, depth_row))
                .sum()
        }
    }

    /// Draws triangles in order; order only matters for depth ties.
    pub fn draw_triangle_array(&mut self, triangles: &[Triangle]) -> usize {
        triangles.iter().map(|t| self.draw_triangle(t)).sum()
    }

    /// Draws one triangle per consecutive index triple.
    ///
    /// The whole call is rejected, with nothing drawn, if the index count is
    /// not a multiple of three or any index is out of range.
    pub fn draw_indexed(&mut self, vertices: &[Vertex], indices: &[usize]) -> RasterResult<usize> {
        if indices.len() % 3 != 0 {
            return Err(RasterError::IndexCount(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i >= vertices.len()) {
            return Err(RasterError::IndexOutOfRange {
                index,
                vertex_count: vertices.len(),
            });
        }

        Ok(indices
            .chunks_exact(3)
            .map(|tri| {
                let triangle = Triangle::new(vertices[tri[0]], vertices[tri[1]], vertices[tri[2]]);
                self.draw_triangle(&triangle)
            })
            .sum())
    }

    /// Ends the frame.
    pub fn finish(self) {}
}

impl Drop for Frame<'_, '_> {
    fn drop(&mut self) {
        trace!("Frame finished");
    }
}

/// Per-triangle state shared by every row task.
struct FragmentShader<'a> {
    triangle: &'a Triangle,
    texture: Option<&'a Texture>,
    addressing: TextureAddressing,
}

impl FragmentShader<'_> {
    /// Covers one image row. The sample point of pixel `(x, y)` is the
    /// integer coordinate itself.
    fn shade_row(
        &self,
        y: usize,
        bbox: &BoundingBox,
        color_row: &mut [u8],
        mut depth_row: Option<&mut [u8]>,
    ) -> usize {
        let mut written = 0;
        for x in bbox.min_x..=bbox.max_x {
            let point = Vec2::new(x as f32, y as f32);
            if !self.triangle.contains(&point) {
                continue;
            }
            let Some(fragment) = self.triangle.interpolate_at(&point) else {
                continue;
            };

            if let Some(depth_row) = depth_row.as_deref_mut() {
                if !depth_test(&mut depth_row[x], quantize_depth(fragment.position.z)) {
                    continue;
                }
            }

            let color = match self.texture {
                Some(texture) => fragment.color.component_mul(&texture.sample(
                    fragment.uv.x,
                    fragment.uv.y,
                    self.addressing,
                )),
                None => fragment.color,
            };

            let offset = x * CHANNELS;
            color_row[offset..offset + 3].copy_from_slice(&color_to_rgb8(&color));
            written += 1;
        }
        written
    }
}
