use crate::geometry::math::{Mat4, Vec2, Vec3};
use crate::geometry::triangle::Vertex;
use crate::geometry::transform::TransformFactory;
use crate::io::render_settings::{DemoScene, RenderSettings};

/// Geometry for one draw: an indexed vertex list plus an optional model
/// transform. Without a model the positions are pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<usize>,
    pub model: Option<Mat4>,
}

impl Scene {
    /// Geometry from the settings, or the configured demo scene when the
    /// settings carry no vertices. A configured model replaces the scene's.
    pub fn from_settings(settings: &RenderSettings) -> Self {
        let mut scene = if settings.vertices.is_empty() {
            match settings.demo {
                DemoScene::Triangle => Self::demo_triangle(settings.width, settings.height),
                DemoScene::Quad => Self::demo_quad(),
            }
        } else {
            let indices = if settings.indices.is_empty() {
                (0..settings.vertices.len()).collect()
            } else {
                settings.indices.clone()
            };
            Self {
                vertices: settings.vertices.clone(),
                indices,
                model: None,
            }
        };
        if let Some(model) = &settings.model {
            scene.model = Some(model.matrix());
        }
        scene
    }

    /// Red, green and blue corners at the bottom-left, top and bottom-right
    /// of the target, in pixel space.
    pub fn demo_triangle(width: usize, height: usize) -> Self {
        let (w, h) = (width as f32, height as f32);
        Self {
            vertices: vec![
                Vertex::new(
                    Vec3::new(w / 4.0, h - 50.0, 0.0),
                    Vec3::new(1.0, 0.0, 0.0),
                    Vec2::new(0.0, 1.0),
                ),
                Vertex::new(
                    Vec3::new(w / 2.0, 50.0, 0.0),
                    Vec3::new(0.0, 1.0, 0.0),
                    Vec2::new(0.5, 0.0),
                ),
                Vertex::new(
                    Vec3::new(w * 3.0 / 4.0, h - 50.0, 0.0),
                    Vec3::new(0.0, 0.0, 1.0),
                    Vec2::new(1.0, 1.0),
                ),
            ],
            indices: vec![0, 1, 2],
            model: None,
        }
    }

    /// Textured square in normalized device space, tilted by 15 degrees.
    pub fn demo_quad() -> Self {
        let white = Vec3::new(1.0, 1.0, 1.0);
        Self {
            vertices: vec![
                Vertex::new(Vec3::new(-0.75, -0.75, 0.0), white, Vec2::new(0.0, 1.0)),
                Vertex::new(Vec3::new(-0.75, 0.75, 0.0), white, Vec2::new(0.0, 0.0)),
                Vertex::new(Vec3::new(0.75, 0.75, 0.0), white, Vec2::new(1.0, 0.0)),
                Vertex::new(Vec3::new(0.75, -0.75, 0.0), white, Vec2::new(1.0, 1.0)),
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
            model: Some(TransformFactory::rotation_z(15f32.to_radians())),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::render_settings::ModelSettings;

    #[test]
    fn demo_triangle_matches_target_size() {
        let scene = Scene::demo_triangle(640, 480);
        let xy: Vec<(f32, f32)> = scene
            .vertices
            .iter()
            .map(|v| (v.position.x, v.position.y))
            .collect();
        assert_eq!(xy, vec![(160.0, 430.0), (320.0, 50.0), (480.0, 430.0)]);
        assert_eq!(scene.triangle_count(), 1);
        assert!(scene.model.is_none());
    }

    #[test]
    fn settings_without_geometry_fall_back_to_demo() {
        let settings = RenderSettings::default();
        let scene = Scene::from_settings(&settings);
        assert_eq!(scene, Scene::demo_triangle(settings.width, settings.height));

        let settings = RenderSettings {
            demo: DemoScene::Quad,
            ..Default::default()
        };
        let scene = Scene::from_settings(&settings);
        assert_eq!(scene.triangle_count(), 2);
        assert!(scene.model.is_some());
    }

    #[test]
    fn settings_geometry_and_model_are_used() {
        let quad = Scene::demo_quad();
        let settings = RenderSettings {
            vertices: quad.vertices.clone(),
            model: Some(ModelSettings::default()),
            ..Default::default()
        };
        let scene = Scene::from_settings(&settings);
        assert_eq!(scene.indices, vec![0, 1, 2, 3]);
        assert_eq!(scene.model, Some(Mat4::identity()));
    }
}
