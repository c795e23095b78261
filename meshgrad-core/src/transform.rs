//! Coordinate spaces and the transforms between them.
//!
//! Four units meet in the editor:
//!
//! ```text
//!  device px ──(− origin)──▶ display px ──(× internal/display)──▶ raster px ──(÷ q)──▶ scene px
//! ```
//!
//! - *device*: pointer coordinates as reported by the host window.
//! - *display*: the on-screen box the surface is stretched into.
//! - *raster*: the surface's own pixel grid, `scene size × q`.
//! - *scene*: where point positions and radii are authored.
//!
//! All conversions go through [`SurfaceGeometry`] so no caller mixes units by hand.

use serde::{Deserialize, Serialize};

/// A 2D position. The space it lives in is given by context.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component.
    pub y: f32,
}

impl Vec2 {
    /// Create a vector.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position in the same space.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Integer multiplier from scene pixels to raster pixels.
///
/// Applied only when drawing or exporting; never stored per point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RenderQuality(u8);

impl RenderQuality {
    /// Lowest quality: one raster pixel per scene pixel.
    pub const MIN: Self = Self(1);
    /// Highest quality offered.
    pub const MAX: Self = Self(4);

    /// Create a quality level if `q` is within `1..=4`.
    #[must_use]
    pub fn new(q: u8) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0).contains(&q).then_some(Self(q))
    }

    /// Create a quality level, clamping `q` into `1..=4`.
    #[must_use]
    pub fn clamped(q: i64) -> Self {
        let clamped = q.clamp(i64::from(Self::MIN.0), i64::from(Self::MAX.0));
        // In range of u8 after the clamp.
        Self(u8::try_from(clamped).unwrap_or(Self::MIN.0))
    }

    /// The multiplier as an integer.
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// The multiplier as a float for coordinate math.
    #[must_use]
    pub fn factor(self) -> f32 {
        f32::from(self.0)
    }

    /// Raster size for a scene of the given size.
    #[must_use]
    pub fn scale_size(self, width: u32, height: u32) -> (u32, u32) {
        let q = u32::from(self.0);
        (width.saturating_mul(q), height.saturating_mul(q))
    }
}

impl Default for RenderQuality {
    fn default() -> Self {
        Self(2)
    }
}

impl TryFrom<u8> for RenderQuality {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("render quality {value} outside 1..=4"))
    }
}

impl From<RenderQuality> for u8 {
    fn from(q: RenderQuality) -> Self {
        q.0
    }
}

impl std::fmt::Display for RenderQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x", self.0)
    }
}

/// Placement of a drawing surface on screen.
///
/// The raster is `scene size × quality` pixels, but it is presented stretched
/// into whatever box its container gives it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceGeometry {
    /// Top-left of the display box in device pixels.
    pub origin: Vec2,
    /// Display box width in device pixels.
    pub display_width: f32,
    /// Display box height in device pixels.
    pub display_height: f32,
    /// Scene width in scene pixels.
    pub scene_width: u32,
    /// Scene height in scene pixels.
    pub scene_height: u32,
    /// Raster multiplier.
    pub quality: RenderQuality,
}

impl SurfaceGeometry {
    /// Geometry for a surface shown unscaled at the device origin.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn unscaled(scene_width: u32, scene_height: u32, quality: RenderQuality) -> Self {
        let (w, h) = quality.scale_size(scene_width, scene_height);
        Self {
            origin: Vec2::default(),
            display_width: w as f32,
            display_height: h as f32,
            scene_width,
            scene_height,
            quality,
        }
    }

    /// Set where and how large the surface is presented.
    #[must_use]
    pub fn with_display(mut self, origin: Vec2, width: f32, height: f32) -> Self {
        self.origin = origin;
        self.display_width = width;
        self.display_height = height;
        self
    }

    /// Raster size in pixels.
    #[must_use]
    pub fn raster_size(&self) -> (u32, u32) {
        self.quality.scale_size(self.scene_width, self.scene_height)
    }

    /// Raster pixels per display pixel on each axis.
    ///
    /// A collapsed display box maps 1:1 so a pointer event during a zero-size
    /// layout pass never produces NaN coordinates.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn display_to_raster_scale(&self) -> (f32, f32) {
        let (rw, rh) = self.raster_size();
        let sx = if self.display_width > 0.0 {
            rw as f32 / self.display_width
        } else {
            1.0
        };
        let sy = if self.display_height > 0.0 {
            rh as f32 / self.display_height
        } else {
            1.0
        };
        (sx, sy)
    }

    /// Device pointer position to raster pixels.
    #[must_use]
    pub fn device_to_raster(&self, device: Vec2) -> Vec2 {
        let (sx, sy) = self.display_to_raster_scale();
        Vec2::new(
            (device.x - self.origin.x) * sx,
            (device.y - self.origin.y) * sy,
        )
    }

    /// Raster pixels to scene pixels.
    #[must_use]
    pub fn raster_to_scene(&self, raster: Vec2) -> Vec2 {
        let q = self.quality.factor();
        Vec2::new(raster.x / q, raster.y / q)
    }

    /// Scene pixels to raster pixels.
    #[must_use]
    pub fn scene_to_raster(&self, scene: Vec2) -> Vec2 {
        let q = self.quality.factor();
        Vec2::new(scene.x * q, scene.y * q)
    }

    /// Device pointer position straight to scene pixels.
    #[must_use]
    pub fn device_to_scene(&self, device: Vec2) -> Vec2 {
        self.raster_to_scene(self.device_to_raster(device))
    }

    /// Scene pixels to the device position where they appear on screen.
    #[must_use]
    pub fn scene_to_device(&self, scene: Vec2) -> Vec2 {
        let raster = self.scene_to_raster(scene);
        let (sx, sy) = self.display_to_raster_scale();
        Vec2::new(
            raster.x / sx + self.origin.x,
            raster.y / sy + self.origin.y,
        )
    }
}
