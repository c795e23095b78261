//! Scene compositing.
//!
//! A frame is built in two phases per point:
//!
//! 1. **Buffer pass**: a blurred point is painted alone into a transparent
//!    layer the size of the surface, and that layer is blurred.
//! 2. **Composite pass**: the layer (or, for unblurred points, the gradient
//!    itself) is added onto the surface with `Plus` blending.
//!
//! The merged frame itself is never blurred.

use meshgrad_core::{MeshPoint, PointId, RenderQuality, Rgb, Scene};
use tiny_skia::{
    BlendMode, Color, GradientStop, Paint, PathBuilder, Pixmap, PixmapPaint, Point,
    RadialGradient, Rect, Shader, SpreadMode, Stroke, Transform,
};

use crate::blur::{blur_sigma, gaussian_blur};
use crate::error::{RenderError, RenderResult};

/// Outer selection ring radius, in scene pixels.
pub const INDICATOR_OUTER_RADIUS: f32 = 15.0;
/// Outer selection ring stroke width, in scene pixels.
pub const INDICATOR_OUTER_WIDTH: f32 = 2.0;
/// Inner selection ring radius, in scene pixels.
pub const INDICATOR_INNER_RADIUS: f32 = 12.0;
/// Inner selection ring stroke width, in scene pixels.
pub const INDICATOR_INNER_WIDTH: f32 = 1.0;

/// Largest raster, in pixels, a frame or blur layer may allocate.
pub const MAX_SURFACE_PIXELS: u64 = 1 << 26;

/// Per-frame render options.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Raster multiplier.
    pub quality: RenderQuality,
    /// Apply per-point blur.
    pub blur: bool,
    /// Point to ring with the selection indicator. Always `None` for exports.
    pub indicator: Option<PointId>,
}

impl RenderOptions {
    /// Options for an export pass: no decoration.
    #[must_use]
    pub fn export(quality: RenderQuality, blur: bool) -> Self {
        Self {
            quality,
            blur,
            indicator: None,
        }
    }

    /// Ring the given point.
    #[must_use]
    pub fn with_indicator(mut self, id: Option<PointId>) -> Self {
        self.indicator = id;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::export(RenderQuality::default(), true)
    }
}

/// How one point reaches the surface.
enum PointLayer<'a> {
    /// Unblurred: shade the surface straight from the gradient.
    Direct(Shader<'a>),
    /// Blurred: a pre-rendered, pre-blurred layer.
    Buffered(Pixmap),
}

/// Render a scene to a fresh pixmap of `width·q × height·q` pixels.
///
/// # Errors
///
/// Returns [`RenderError::Surface`] if the raster exceeds
/// [`MAX_SURFACE_PIXELS`] or cannot be allocated.
pub fn render_scene(scene: &Scene, options: &RenderOptions) -> RenderResult<Pixmap> {
    let (width, height) = options.quality.scale_size(scene.width, scene.height);
    let mut surface = allocate(width, height, "surface")?;
    compose(&mut surface, scene, options)?;
    Ok(surface)
}

/// Draw a scene onto an existing surface of the right size.
///
/// # Errors
///
/// Returns [`RenderError::Surface`] if a blur layer cannot be allocated.
pub fn compose(surface: &mut Pixmap, scene: &Scene, options: &RenderOptions) -> RenderResult<()> {
    let bg = Rgb::background_color(&scene.background_color);
    surface.fill(Color::from_rgba8(bg.r, bg.g, bg.b, 255));

    let q = options.quality.factor();
    for point in scene.points() {
        let Some(layer) = buffer_pass(point, surface.width(), surface.height(), q, options)? else {
            continue;
        };
        composite_pass(surface, layer);
    }

    if let Some(id) = &options.indicator {
        if let Some(point) = scene.point(id) {
            draw_indicator(surface, point, q);
        }
    }
    Ok(())
}

/// Opacity or blur as a unit fraction; NaN counts as zero.
fn unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// The point's radial ramp in raster space, or `None` if it has no extent.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn point_shader(point: &MeshPoint, q: f32) -> Option<Shader<'static>> {
    let (cx, cy, r) = (point.x * q, point.y * q, point.radius * q);
    if !(cx.is_finite() && cy.is_finite() && r.is_finite()) || r <= 0.0 {
        tracing::trace!("Skipping degenerate point {} (radius {})", point.id, point.radius);
        return None;
    }
    let rgb = point.rgb();
    let alpha = (unit(point.opacity) * 255.0).round() as u8;
    let center = Point::from_xy(cx, cy);
    RadialGradient::new(
        center,
        center,
        r,
        vec![
            GradientStop::new(0.0, Color::from_rgba8(rgb.r, rgb.g, rgb.b, alpha)),
            // Transparent end stop keeps the hue.
            GradientStop::new(1.0, Color::from_rgba8(rgb.r, rgb.g, rgb.b, 0)),
        ],
        SpreadMode::Pad,
        Transform::identity(),
    )
}

fn fill_surface(target: &mut Pixmap, shader: Shader<'_>, blend_mode: BlendMode) {
    #[allow(clippy::cast_precision_loss)]
    let Some(rect) = Rect::from_xywh(0.0, 0.0, target.width() as f32, target.height() as f32)
    else {
        return;
    };
    let paint = Paint {
        shader,
        blend_mode,
        anti_alias: false,
        ..Paint::default()
    };
    target.fill_rect(rect, &paint, Transform::identity(), None);
}

fn allocate(width: u32, height: u32, what: &str) -> RenderResult<Pixmap> {
    if u64::from(width) * u64::from(height) > MAX_SURFACE_PIXELS {
        return Err(RenderError::Surface(format!(
            "{width}x{height} {what} exceeds the {MAX_SURFACE_PIXELS} pixel limit"
        )));
    }
    Pixmap::new(width, height)
        .ok_or_else(|| RenderError::Surface(format!("cannot allocate {width}x{height} {what}")))
}

fn buffer_pass(
    point: &MeshPoint,
    width: u32,
    height: u32,
    q: f32,
    options: &RenderOptions,
) -> RenderResult<Option<PointLayer<'static>>> {
    let Some(shader) = point_shader(point, q) else {
        return Ok(None);
    };
    let blur = unit(point.blur);
    if !options.blur || blur <= 0.0 {
        return Ok(Some(PointLayer::Direct(shader)));
    }

    let mut layer = allocate(width, height, "blur layer")?;
    fill_surface(&mut layer, shader, BlendMode::Source);
    gaussian_blur(&mut layer, blur_sigma(blur, options.quality));
    Ok(Some(PointLayer::Buffered(layer)))
}

fn composite_pass(surface: &mut Pixmap, layer: PointLayer<'_>) {
    match layer {
        PointLayer::Direct(shader) => fill_surface(surface, shader, BlendMode::Plus),
        PointLayer::Buffered(pixmap) => {
            let paint = PixmapPaint {
                blend_mode: BlendMode::Plus,
                ..PixmapPaint::default()
            };
            surface.draw_pixmap(0, 0, pixmap.as_ref(), &paint, Transform::identity(), None);
        }
    }
}

fn draw_indicator(surface: &mut Pixmap, point: &MeshPoint, q: f32) {
    let (cx, cy) = (point.x * q, point.y * q);
    let rings = [
        (INDICATOR_OUTER_RADIUS, INDICATOR_OUTER_WIDTH, Rgb::WHITE),
        (INDICATOR_INNER_RADIUS, INDICATOR_INNER_WIDTH, Rgb::BLACK),
    ];
    for (radius, width, color) in rings {
        let Some(path) = PathBuilder::from_circle(cx, cy, radius * q) else {
            continue;
        };
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, 255);
        paint.anti_alias = true;
        let stroke = Stroke {
            width: width * q,
            ..Stroke::default()
        };
        surface.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba(pixmap: &Pixmap, x: u32, y: u32) -> [u8; 4] {
        let p = pixmap.pixel(x, y).expect("in bounds");
        [p.red(), p.green(), p.blue(), p.alpha()]
    }

    fn no_blur() -> RenderOptions {
        RenderOptions::export(RenderQuality::MIN, false)
    }

    #[test]
    fn test_empty_scene_is_flat_background() {
        let mut scene = Scene::new(10, 6);
        scene.background_color = "#336699".to_string();
        let pixmap = render_scene(&scene, &no_blur()).expect("render");
        assert_eq!((pixmap.width(), pixmap.height()), (10, 6));
        for (x, y) in [(0, 0), (9, 5), (4, 3)] {
            assert_eq!(rgba(&pixmap, x, y), [0x33, 0x66, 0x99, 255]);
        }
    }

    #[test]
    fn test_oversized_surface_is_an_error() {
        let mut scene = Scene::new(1, 1);
        scene.width = 400_000;
        scene.height = 400_000;
        let q4 = RenderQuality::new(4).expect("valid");
        let err = render_scene(&scene, &RenderOptions::export(q4, true)).unwrap_err();
        assert!(matches!(err, RenderError::Surface(_)));
    }

    #[test]
    fn test_surface_scales_with_quality() {
        let scene = Scene::new(10, 6);
        let q3 = RenderQuality::new(3).expect("valid");
        let pixmap = render_scene(&scene, &RenderOptions::export(q3, true)).expect("render");
        assert_eq!((pixmap.width(), pixmap.height()), (30, 18));
    }

    #[test]
    fn test_points_add_rather_than_occlude() {
        let mut scene = Scene::new(20, 20);
        scene.insert_point(
            MeshPoint::new(10.0, 10.0)
                .with_color("#ff0000")
                .with_radius(50.0)
                .with_opacity(1.0),
        );
        scene.insert_point(
            MeshPoint::new(10.0, 10.0)
                .with_color("#0000ff")
                .with_radius(50.0)
                .with_opacity(1.0),
        );
        let pixmap = render_scene(&scene, &no_blur()).expect("render");
        let [r, g, b, _] = rgba(&pixmap, 10, 10);
        assert!(r > 200 && b > 200, "both colors should survive: {r},{g},{b}");
        assert!(g < 10);
    }

    #[test]
    fn test_gradient_fades_to_background_at_radius() {
        let mut scene = Scene::new(40, 5);
        scene.insert_point(
            MeshPoint::new(0.0, 2.0)
                .with_color("#ffffff")
                .with_radius(20.0)
                .with_opacity(1.0),
        );
        let pixmap = render_scene(&scene, &no_blur()).expect("render");
        let near = rgba(&pixmap, 1, 2)[0];
        let mid = rgba(&pixmap, 10, 2)[0];
        let far = rgba(&pixmap, 30, 2)[0];
        assert!(near > mid && mid > far);
        assert_eq!(far, 0);
    }

    #[test]
    fn test_degenerate_points_are_invisible() {
        let mut scene = Scene::new(8, 8);
        scene.insert_point(MeshPoint::new(4.0, 4.0).with_radius(0.0));
        scene.insert_point(MeshPoint::new(4.0, 4.0).with_radius(-5.0));
        scene.insert_point(MeshPoint::new(f32::NAN, 4.0));
        let pixmap = render_scene(&scene, &no_blur()).expect("render");
        assert_eq!(rgba(&pixmap, 4, 4), [0, 0, 0, 255]);
    }

    #[test]
    fn test_bad_color_uses_fallback() {
        let mut scene = Scene::new(8, 8);
        scene.insert_point(
            MeshPoint::new(4.0, 4.0)
                .with_color("not-a-color")
                .with_radius(100.0)
                .with_opacity(1.0),
        );
        let pixmap = render_scene(&scene, &no_blur()).expect("render");
        let [r, g, b, _] = rgba(&pixmap, 4, 4);
        assert!(r.abs_diff(107) <= 3 && g.abs_diff(70) <= 3 && b.abs_diff(193) <= 3);
    }

    #[test]
    fn test_blur_softens_a_small_point() {
        let mut scene = Scene::new(60, 60);
        scene.insert_point(
            MeshPoint::new(30.0, 30.0)
                .with_color("#ffffff")
                .with_radius(4.0)
                .with_blur(0.2)
                .with_opacity(1.0),
        );
        let sharp = render_scene(&scene, &no_blur()).expect("render");
        let soft = render_scene(&scene, &RenderOptions::export(RenderQuality::MIN, true))
            .expect("render");

        assert!(rgba(&soft, 30, 30)[0] < rgba(&sharp, 30, 30)[0]);
        assert_eq!(rgba(&sharp, 30, 40)[0], 0);
        assert!(rgba(&soft, 30, 40)[0] > 0);
    }

    #[test]
    fn test_indicator_only_when_requested() {
        let mut scene = Scene::new(40, 40);
        let id = scene.insert_point(MeshPoint::new(20.0, 20.0).with_radius(1.0));
        let plain = render_scene(&scene, &no_blur()).expect("render");
        let ringed = render_scene(&scene, &no_blur().with_indicator(Some(id))).expect("render");

        // Outer ring passes through (35, 20); inner through (32, 20).
        assert_eq!(rgba(&plain, 35, 20), [0, 0, 0, 255]);
        assert!(rgba(&ringed, 35, 20)[0] > 100);
        assert_eq!(rgba(&ringed, 20, 20), rgba(&plain, 20, 20));
    }
}
