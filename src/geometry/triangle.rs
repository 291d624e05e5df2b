use super::math::{EPSILON, Mat4, Vec2, Vec3, Vec4, transform_position};

/// A triangle corner: homogeneous position plus the attributes that get
/// interpolated across the face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec4,
    pub color: Vec3,
    pub uv: Vec2,
}

impl Vertex {
    /// Vertex from a flat 3D position (`w = 1`).
    pub fn new(position: Vec3, color: Vec3, uv: Vec2) -> Self {
        Self {
            position: Vec4::new(position.x, position.y, position.z, 1.0),
            color,
            uv,
        }
    }

    pub fn homogeneous(position: Vec4, color: Vec3, uv: Vec2) -> Self {
        Self {
            position,
            color,
            uv,
        }
    }
}

/// Signed edge function of `point` against the directed line `v0 -> v1`.
#[inline(always)]
pub fn edge_function(point: &Vec2, v0: &Vec4, v1: &Vec4) -> f32 {
    (point.x - v0.x) * (v1.y - v0.y) - (point.y - v0.y) * (v1.x - v0.x)
}

/// Three vertices. Winding matters: a point is inside when the edge
/// functions of `v0->v2`, `v2->v1` and `v1->v0` are all strictly positive,
/// which in image space (y down) is a triangle listed clockwise on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Copy of this triangle with every position pushed through `transform`.
    pub fn transformed(&self, transform: &Mat4) -> Triangle {
        let mut out = *self;
        for vertex in out.vertices.iter_mut() {
            vertex.position = transform_position(transform, &vertex.position);
        }
        out
    }

    pub fn is_inside(&self, transform: &Mat4, point: &Vec2) -> bool {
        self.transformed(transform).contains(point)
    }

    pub fn interpolate(&self, transform: &Mat4, point: &Vec2) -> Option<Vertex> {
        self.transformed(transform).interpolate_at(point)
    }

    /// Inside test for a triangle whose positions are already in the space of
    /// `point`. Points on an edge are outside, so neighbours sharing an edge
    /// never both cover it.
    pub fn contains(&self, point: &Vec2) -> bool {
        let [v0, v1, v2] = [
            &self.vertices[0].position,
            &self.vertices[1].position,
            &self.vertices[2].position,
        ];

        edge_function(point, v0, v2) > 0.0
            && edge_function(point, v2, v1) > 0.0
            && edge_function(point, v1, v0) > 0.0
    }

    /// Signed area; negative for triangles that pass the inside test.
    pub fn signed_area(&self) -> f32 {
        0.5 * edge_function(
            &self.vertices[0].position.xy(),
            &self.vertices[1].position,
            &self.vertices[2].position,
        )
    }

    pub fn is_degenerate(&self) -> bool {
        self.signed_area().abs() < EPSILON
    }

    /// Barycentric interpolation of position, color and uv at `point`.
    ///
    /// Returns `None` for a degenerate triangle. Only meaningful for points
    /// that passed [`Triangle::contains`]; weights outside are negative.
    /// Weights are linear in screen space, with no perspective correction.
    pub fn interpolate_at(&self, point: &Vec2) -> Option<Vertex> {
        let [a, b, c] = &self.vertices;

        let subtriangle_areas = [
            0.5 * edge_function(point, &b.position, &c.position),
            0.5 * edge_function(point, &c.position, &a.position),
            0.5 * edge_function(point, &a.position, &b.position),
        ];
        let total_area: f32 = subtriangle_areas.iter().sum();
        if total_area.abs() < EPSILON {
            return None;
        }

        let l0 = subtriangle_areas[0] / total_area;
        let l1 = subtriangle_areas[1] / total_area;
        let l2 = subtriangle_areas[2] / total_area;
        let sum = l0 + l1 + l2;

        Some(Vertex {
            position: (a.position * l0 + b.position * l1 + c.position * l2) / sum,
            color: (a.color * l0 + b.color * l1 + c.color * l2) / sum,
            uv: (a.uv * l0 + b.uv * l1 + c.uv * l2) / sum,
        })
    }

    pub fn is_finite(&self) -> bool {
        self.vertices
            .iter()
            .all(|v| v.position.iter().all(|c| c.is_finite()))
    }
}

/// Inclusive pixel range that can contain covered sample points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: usize,
    pub min_y: usize,
    pub max_x: usize,
    pub max_y: usize,
}

impl BoundingBox {
    /// Bounds of an already transformed triangle, clamped to the target.
    /// `None` when the triangle lies entirely off-target.
    pub fn from_triangle(triangle: &Triangle, width: usize, height: usize) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }

        let [v0, v1, v2] = [
            &triangle.vertices[0].position,
            &triangle.vertices[1].position,
            &triangle.vertices[2].position,
        ];

        let min_x = v0.x.min(v1.x).min(v2.x).floor().max(0.0);
        let min_y = v0.y.min(v1.y).min(v2.y).floor().max(0.0);
        let max_x = v0.x.max(v1.x).max(v2.x).ceil().min((width - 1) as f32);
        let max_y = v0.y.max(v1.y).max(v2.y).ceil().min((height - 1) as f32);

        if max_x < min_x || max_y < min_y {
            None
        } else {
            Some(Self {
                min_x: min_x as usize,
                min_y: min_y as usize,
                max_x: max_x as usize,
                max_y: max_y as usize,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn vertex(x: f32, y: f32, color: Vec3, uv: Vec2) -> Vertex {
        Vertex::new(Vec3::new(x, y, 0.0), color, uv)
    }

    /// Bottom-left, top, bottom-right in image space.
    fn screen_triangle() -> Triangle {
        Triangle::new(
            vertex(160.0, 430.0, Vec3::new(1.0, 0.0, 0.0), Vec2::new(0.0, 1.0)),
            vertex(320.0, 50.0, Vec3::new(0.0, 1.0, 0.0), Vec2::new(0.5, 0.0)),
            vertex(480.0, 430.0, Vec3::new(0.0, 0.0, 1.0), Vec2::new(1.0, 1.0)),
        )
    }

    #[test]
    fn centroid_is_inside_and_far_points_are_not() {
        let tri = screen_triangle();
        let id = Mat4::identity();
        assert!(tri.is_inside(&id, &Vec2::new(320.0, 303.3)));
        assert!(!tri.is_inside(&id, &Vec2::new(10.0, 10.0)));
        assert!(!tri.is_inside(&id, &Vec2::new(320.0, 431.0)));
        assert!(!tri.is_inside(&id, &Vec2::new(600.0, 303.0)));
    }

    #[test]
    fn opposite_winding_is_never_inside() {
        let tri = screen_triangle();
        let flipped = Triangle::new(tri.vertices[0], tri.vertices[2], tri.vertices[1]);
        assert!(!flipped.contains(&Vec2::new(320.0, 303.3)));
    }

    #[test]
    fn edge_points_are_excluded() {
        let tri = screen_triangle();
        // Midpoints of all three edges.
        for (i, j) in [(0, 1), (1, 2), (2, 0)] {
            let a = tri.vertices[i].position;
            let b = tri.vertices[j].position;
            let mid = Vec2::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5);
            assert!(!tri.contains(&mid), "edge {}-{} midpoint covered", i, j);
        }
        // A point on the horizontal bottom edge, away from the vertices.
        assert!(!tri.contains(&Vec2::new(250.0, 430.0)));
        // Vertices themselves.
        for v in &tri.vertices {
            assert!(!tri.contains(&v.position.xy()));
        }
    }

    #[test]
    fn random_points_agree_with_barycentric_signs() {
        let tri = screen_triangle();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2000 {
            let p = Vec2::new(rng.random_range(0.0..640.0), rng.random_range(0.0..480.0));
            let inside = tri.contains(&p);

            let [a, b, c] = &tri.vertices;
            let w0 = edge_function(&p, &b.position, &c.position);
            let w1 = edge_function(&p, &c.position, &a.position);
            let w2 = edge_function(&p, &a.position, &b.position);
            if w0.abs() < 1e-2 || w1.abs() < 1e-2 || w2.abs() < 1e-2 {
                continue;
            }
            let strictly_inside = w0 < 0.0 && w1 < 0.0 && w2 < 0.0;
            assert_eq!(inside, strictly_inside, "disagreement at {:?}", p);
        }
    }

    #[test]
    fn interpolation_recovers_position() {
        let tri = screen_triangle();
        let mut rng = StdRng::seed_from_u64(42);
        let mut checked = 0;
        while checked < 500 {
            let p = Vec2::new(rng.random_range(160.0..480.0), rng.random_range(50.0..430.0));
            if !tri.contains(&p) {
                continue;
            }
            let v = tri.interpolate_at(&p).expect("non-degenerate");
            assert!((v.position.x - p.x).abs() < 1e-2, "{:?} vs {:?}", v.position, p);
            assert!((v.position.y - p.y).abs() < 1e-2, "{:?} vs {:?}", v.position, p);
            let weight_sum = v.color.x + v.color.y + v.color.z;
            assert!((weight_sum - 1.0).abs() < 1e-4);
            checked += 1;
        }
    }

    #[test]
    fn centroid_mixes_colors_equally() {
        let tri = screen_triangle();
        let v = tri
            .interpolate(&Mat4::identity(), &Vec2::new(320.0, 303.333))
            .expect("non-degenerate");
        for c in v.color.iter() {
            assert!((c - 1.0 / 3.0).abs() < 1e-3, "{:?}", v.color);
        }
        assert!((v.uv.x - 0.5).abs() < 1e-3);
        assert!((v.uv.y - 2.0 / 3.0).abs() < 1e-3);
    }

    #[test]
    fn zero_area_triangle_is_rejected() {
        let v = vertex(100.0, 100.0, Vec3::new(1.0, 1.0, 1.0), Vec2::zeros());
        let tri = Triangle::new(v, v, v);
        assert!(tri.is_degenerate());
        assert!(!tri.contains(&Vec2::new(100.0, 100.0)));
        assert!(tri.interpolate_at(&Vec2::new(100.0, 100.0)).is_none());

        let line = Triangle::new(
            vertex(0.0, 0.0, Vec3::zeros(), Vec2::zeros()),
            vertex(10.0, 10.0, Vec3::zeros(), Vec2::zeros()),
            vertex(20.0, 20.0, Vec3::zeros(), Vec2::zeros()),
        );
        assert!(line.is_degenerate());
        assert!(!line.contains(&Vec2::new(5.0, 6.0)));
        assert!(line.interpolate_at(&Vec2::new(5.0, 6.0)).is_none());
    }

    #[test]
    fn transform_is_applied_before_testing() {
        let tri = screen_triangle();
        let shift = Mat4::new_translation(&Vec3::new(100.0, 0.0, 0.0));
        assert!(tri.is_inside(&shift, &Vec2::new(420.0, 303.0)));
        assert!(!tri.is_inside(&shift, &Vec2::new(200.0, 400.0)));
        let v = tri.interpolate(&shift, &Vec2::new(420.0, 303.0)).unwrap();
        assert!((v.position.x - 420.0).abs() < 1e-2);
    }

    #[test]
    fn bounding_box_is_clamped() {
        let tri = screen_triangle();
        let bbox = BoundingBox::from_triangle(&tri, 640, 480).unwrap();
        assert_eq!(
            bbox,
            BoundingBox {
                min_x: 160,
                min_y: 50,
                max_x: 480,
                max_y: 430
            }
        );

        let clipped = BoundingBox::from_triangle(&tri, 300, 200).unwrap();
        assert_eq!((clipped.max_x, clipped.max_y), (299, 199));

        let off = tri.transformed(&Mat4::new_translation(&Vec3::new(-1000.0, 0.0, 0.0)));
        assert!(BoundingBox::from_triangle(&off, 640, 480).is_none());
    }
}
