//! The scene model: canvas layout plus the ordered mesh points.

use rand::Rng;

use crate::{MeshPoint, PointId, PointUpdate, RenderQuality};

/// Default canvas width in scene pixels.
pub const DEFAULT_WIDTH: u32 = 800;

/// Default canvas height in scene pixels.
pub const DEFAULT_HEIGHT: u32 = 500;

/// Largest canvas side, in scene pixels.
pub const MAX_DIMENSION: u32 = 8192;

/// Default background color.
pub const DEFAULT_BACKGROUND: &str = "#000000";

/// The whole document.
///
/// Point order is paint order: the first point is composited first.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Canvas width in scene pixels.
    pub width: u32,
    /// Canvas height in scene pixels.
    pub height: u32,
    /// Hex color painted before any point.
    pub background_color: String,
    /// Raster multiplier used at render/export time.
    pub render_quality: RenderQuality,
    points: Vec<MeshPoint>,
}

/// Canvas-level fields for [`Scene::set_layout`]; `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutUpdate {
    /// New canvas width.
    pub width: Option<u32>,
    /// New canvas height.
    pub height: Option<u32>,
    /// New background color.
    pub background_color: Option<String>,
    /// New render quality.
    pub render_quality: Option<RenderQuality>,
}

impl Scene {
    /// Create an empty scene with the given canvas size.
    ///
    /// Dimensions are clamped to `1..=MAX_DIMENSION`.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.clamp(1, MAX_DIMENSION),
            height: height.clamp(1, MAX_DIMENSION),
            background_color: DEFAULT_BACKGROUND.to_string(),
            render_quality: RenderQuality::default(),
            points: Vec::new(),
        }
    }

    /// The three-point preset used by the non-interactive hero preview.
    #[must_use]
    pub fn hero() -> Self {
        let mut scene = Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT);
        scene.points = vec![
            MeshPoint::new(150.0, 100.0)
                .with_id(PointId::from_string("point-1"))
                .with_color("#6b46c1")
                .with_radius(300.0)
                .with_blur(0.4)
                .with_opacity(0.9),
            MeshPoint::new(400.0, 150.0)
                .with_id(PointId::from_string("point-2"))
                .with_color("#9f7aea")
                .with_radius(250.0)
                .with_blur(0.5)
                .with_opacity(0.8),
            MeshPoint::new(250.0, 300.0)
                .with_id(PointId::from_string("point-3"))
                .with_color("#000000")
                .with_radius(350.0)
                .with_blur(0.6)
                .with_opacity(0.9),
        ];
        scene
    }

    /// Append a default-styled point at a random position inside the canvas.
    pub fn add_point(&mut self) -> PointId {
        self.add_point_with_rng(&mut rand::rng())
    }

    /// [`Scene::add_point`] with a caller-supplied random source.
    #[allow(clippy::cast_precision_loss)]
    pub fn add_point_with_rng<R: Rng>(&mut self, rng: &mut R) -> PointId {
        let x = rng.random_range(0.0..self.width as f32);
        let y = rng.random_range(0.0..self.height as f32);
        self.insert_point(MeshPoint::new(x, y))
    }

    /// Append an existing point, returning its id.
    pub fn insert_point(&mut self, point: MeshPoint) -> PointId {
        let id = point.id.clone();
        tracing::debug!("Adding point {id} at ({}, {})", point.x, point.y);
        self.points.push(point);
        id
    }

    /// Merge fields into the point with the given id.
    ///
    /// Returns `false` (and changes nothing) if no such point exists.
    pub fn update_point(&mut self, id: &PointId, update: PointUpdate) -> bool {
        match self.point_mut(id) {
            Some(point) => {
                point.apply(update);
                true
            }
            None => false,
        }
    }

    /// Remove a point, returning it if it existed.
    pub fn remove_point(&mut self, id: &PointId) -> Option<MeshPoint> {
        let index = self.points.iter().position(|p| &p.id == id)?;
        tracing::debug!("Removing point {id}");
        Some(self.points.remove(index))
    }

    /// Replace all points with the demonstration gradient, scaled to the canvas.
    #[allow(clippy::cast_precision_loss)]
    pub fn load_example(&mut self) {
        let w = self.width as f32;
        let h = self.height as f32;
        self.background_color = DEFAULT_BACKGROUND.to_string();
        self.points = vec![
            MeshPoint::new(w * 0.7, h * 0.8)
                .with_id(PointId::from_string("point-1"))
                .with_color("#6b46c1")
                .with_radius(w * 0.6)
                .with_blur(0.4)
                .with_opacity(0.9),
            MeshPoint::new(w * 0.3, h * 0.9)
                .with_id(PointId::from_string("point-2"))
                .with_color("#9f7aea")
                .with_radius(w * 0.5)
                .with_blur(0.5)
                .with_opacity(0.8),
            MeshPoint::new(w * 0.5, h * 0.2)
                .with_id(PointId::from_string("point-3"))
                .with_color("#000000")
                .with_radius(w * 0.7)
                .with_blur(0.6)
                .with_opacity(0.9),
        ];
        tracing::debug!("Loaded example gradient for {}x{}", self.width, self.height);
    }

    /// Update canvas-level fields. Existing points are not repositioned.
    pub fn set_layout(&mut self, update: LayoutUpdate) {
        let LayoutUpdate {
            width,
            height,
            background_color,
            render_quality,
        } = update;
        if let Some(width) = width {
            self.width = width.clamp(1, MAX_DIMENSION);
        }
        if let Some(height) = height {
            self.height = height.clamp(1, MAX_DIMENSION);
        }
        if let Some(color) = background_color {
            self.background_color = color;
        }
        if let Some(quality) = render_quality {
            self.render_quality = quality;
        }
    }

    /// Replace the whole point list.
    pub fn set_points(&mut self, points: Vec<MeshPoint>) {
        self.points = points;
    }

    /// Points in paint order.
    #[must_use]
    pub fn points(&self) -> &[MeshPoint] {
        &self.points
    }

    /// Get a point by id.
    #[must_use]
    pub fn point(&self, id: &PointId) -> Option<&MeshPoint> {
        self.points.iter().find(|p| &p.id == id)
    }

    /// Get a mutable point by id.
    pub fn point_mut(&mut self, id: &PointId) -> Option<&mut MeshPoint> {
        self.points.iter_mut().find(|p| &p.id == id)
    }

    /// Mutable access to every point, in paint order.
    pub fn points_mut(&mut self) -> impl Iterator<Item = &mut MeshPoint> {
        self.points.iter_mut()
    }

    /// Find the point closest to a scene-space position, if it is strictly
    /// within `tolerance` scene pixels.
    ///
    /// On equal distance the later (topmost) point wins.
    #[must_use]
    pub fn nearest_point(&self, x: f32, y: f32, tolerance: f32) -> Option<&MeshPoint> {
        let mut best: Option<(&MeshPoint, f32)> = None;
        for point in &self.points {
            let d = point.distance_to(x, y);
            if d.is_nan() || d >= tolerance {
                continue;
            }
            match best {
                Some((_, best_d)) if d > best_d => {}
                _ => best = Some((point, d)),
            }
        }
        best.map(|(p, _)| p)
    }

    /// Number of points.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Whether the scene has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_scene_add_remove() {
        let mut scene = Scene::new(800, 500);
        assert!(scene.is_empty());

        let before = scene.points().to_vec();
        let id = scene.add_point();
        assert_eq!(scene.point_count(), 1);
        assert!(scene.point(&id).is_some());

        scene.remove_point(&id).expect("should remove");
        assert_eq!(scene.points(), before.as_slice());
    }

    #[test]
    fn test_add_point_lands_inside_canvas() {
        let mut scene = Scene::new(40, 30);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let id = scene.add_point_with_rng(&mut rng);
            let p = scene.point(&id).expect("added");
            assert!((0.0..40.0).contains(&p.x));
            assert!((0.0..30.0).contains(&p.y));
        }
    }

    #[test]
    fn test_update_missing_point_is_noop() {
        let mut scene = Scene::hero();
        let before = scene.clone();
        assert!(!scene.update_point(&PointId::from_string("nope"), PointUpdate::radius(1.0)));
        assert_eq!(scene, before);
    }

    #[test]
    fn test_load_example_scales_to_canvas() {
        let mut scene = Scene::new(1000, 400);
        scene.background_color = "#123456".to_string();
        scene.load_example();

        assert_eq!(scene.background_color, DEFAULT_BACKGROUND);
        let p = &scene.points()[0];
        assert!((p.x - 700.0).abs() < 1e-3);
        assert!((p.y - 320.0).abs() < 1e-3);
        assert!((p.radius - 600.0).abs() < 1e-3);
        assert_eq!(scene.point_count(), 3);
    }

    #[test]
    fn test_set_layout_leaves_points_alone() {
        let mut scene = Scene::new(800, 500);
        scene.load_example();
        let points = scene.points().to_vec();

        scene.set_layout(LayoutUpdate {
            width: Some(100),
            height: Some(0),
            ..LayoutUpdate::default()
        });

        assert_eq!(scene.width, 100);
        assert_eq!(scene.height, 1);
        assert_eq!(scene.points(), points.as_slice());

        scene.set_layout(LayoutUpdate {
            width: Some(400_000),
            ..LayoutUpdate::default()
        });
        assert_eq!(scene.width, MAX_DIMENSION);
        assert_eq!(Scene::new(u32::MAX, 10).width, MAX_DIMENSION);
    }

    #[test]
    fn test_nearest_point_picks_closest() {
        let mut scene = Scene::new(800, 500);
        let a = scene.insert_point(MeshPoint::new(100.0, 100.0));
        let b = scene.insert_point(MeshPoint::new(110.0, 100.0));

        assert_eq!(scene.nearest_point(101.0, 100.0, 15.0).map(|p| &p.id), Some(&a));
        assert_eq!(scene.nearest_point(108.0, 100.0, 15.0).map(|p| &p.id), Some(&b));
        assert!(scene.nearest_point(300.0, 300.0, 15.0).is_none());
    }

    #[test]
    fn test_nearest_point_tie_goes_to_topmost() {
        let mut scene = Scene::new(800, 500);
        scene.insert_point(MeshPoint::new(50.0, 50.0));
        let top = scene.insert_point(MeshPoint::new(50.0, 50.0));
        assert_eq!(scene.nearest_point(50.0, 50.0, 15.0).map(|p| &p.id), Some(&top));
    }
}
