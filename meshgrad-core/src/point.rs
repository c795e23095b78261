//! Mesh points - the radial color sources a scene is built from.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color::Rgb;

/// Blur strength used when a point does not specify one.
pub const DEFAULT_BLUR: f32 = 0.4;

/// Opacity used when a point does not specify one.
pub const DEFAULT_OPACITY: f32 = 0.8;

/// Color given to freshly added points.
pub const DEFAULT_COLOR: &str = "#6b46c1";

/// Radius given to freshly added points, in scene pixels.
pub const DEFAULT_RADIUS: f32 = 300.0;

/// Slider ranges offered to callers editing a point.
///
/// The model does not enforce these; the compositor tolerates anything.
pub mod ranges {
    use std::ops::RangeInclusive;

    /// Radius slider range (scene pixels).
    pub const RADIUS: RangeInclusive<f32> = 50.0..=800.0;
    /// Blur slider range.
    pub const BLUR: RangeInclusive<f32> = 0.0..=1.0;
    /// Opacity slider range.
    pub const OPACITY: RangeInclusive<f32> = 0.1..=1.0;
    /// Step shared by the blur and opacity sliders.
    pub const NORMALIZED_STEP: f32 = 0.1;
}

/// Opaque identifier for a mesh point.
///
/// Imported documents may carry arbitrary id strings, so this wraps a string
/// rather than a UUID. Freshly minted ids are `point-<uuid>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointId(String);

impl PointId {
    /// Mint a new unique point ID.
    #[must_use]
    pub fn new() -> Self {
        Self(format!("point-{}", Uuid::new_v4()))
    }

    /// Wrap an existing id string.
    #[must_use]
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PointId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One radial color source.
///
/// Position and radius are in scene space; render quality never touches them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshPoint {
    /// Unique identifier.
    pub id: PointId,
    /// Center X in scene pixels.
    pub x: f32,
    /// Center Y in scene pixels.
    pub y: f32,
    /// Hex color as authored (`#RRGGBB` or `#RGB`).
    pub color: String,
    /// Distance at which the gradient fades to nothing, in scene pixels.
    pub radius: f32,
    /// Normalized blur strength, 0 disables blur.
    pub blur: f32,
    /// Alpha at the gradient center.
    pub opacity: f32,
}

impl MeshPoint {
    /// Create a point at the given position with default styling.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            id: PointId::new(),
            x,
            y,
            color: DEFAULT_COLOR.to_string(),
            radius: DEFAULT_RADIUS,
            blur: DEFAULT_BLUR,
            opacity: DEFAULT_OPACITY,
        }
    }

    /// Set the id.
    #[must_use]
    pub fn with_id(mut self, id: PointId) -> Self {
        self.id = id;
        self
    }

    /// Set the color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Set the radius.
    #[must_use]
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Set the blur strength.
    #[must_use]
    pub fn with_blur(mut self, blur: f32) -> Self {
        self.blur = blur;
        self
    }

    /// Set the opacity.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Parsed color, or the fallback purple when the hex is malformed.
    #[must_use]
    pub fn rgb(&self) -> Rgb {
        Rgb::point_color(&self.color)
    }

    /// Euclidean distance from the center to a scene-space position.
    #[must_use]
    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        (self.x - x).hypot(self.y - y)
    }

    /// Merge a partial update into this point.
    pub fn apply(&mut self, update: PointUpdate) {
        let PointUpdate {
            x,
            y,
            color,
            radius,
            blur,
            opacity,
        } = update;
        if let Some(x) = x {
            self.x = x;
        }
        if let Some(y) = y {
            self.y = y;
        }
        if let Some(color) = color {
            self.color = color;
        }
        if let Some(radius) = radius {
            self.radius = radius;
        }
        if let Some(blur) = blur {
            self.blur = blur;
        }
        if let Some(opacity) = opacity {
            self.opacity = opacity;
        }
    }
}

/// Partial set of point fields for [`crate::Scene::update_point`].
///
/// Values are stored as given; no range clamping happens here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointUpdate {
    /// New center X.
    pub x: Option<f32>,
    /// New center Y.
    pub y: Option<f32>,
    /// New hex color.
    pub color: Option<String>,
    /// New radius.
    pub radius: Option<f32>,
    /// New blur strength.
    pub blur: Option<f32>,
    /// New opacity.
    pub opacity: Option<f32>,
}

impl PointUpdate {
    /// Update only the position.
    #[must_use]
    pub fn position(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Update only the color.
    #[must_use]
    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Self::default()
        }
    }

    /// Update only the radius.
    #[must_use]
    pub fn radius(radius: f32) -> Self {
        Self {
            radius: Some(radius),
            ..Self::default()
        }
    }

    /// Update only the blur strength.
    #[must_use]
    pub fn blur(blur: f32) -> Self {
        Self {
            blur: Some(blur),
            ..Self::default()
        }
    }

    /// Update only the opacity.
    #[must_use]
    pub fn opacity(opacity: f32) -> Self {
        Self {
            opacity: Some(opacity),
            ..Self::default()
        }
    }

    /// Whether this update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
