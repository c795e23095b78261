//! Canonical JSON document for scenes, and the validating importer.
//!
//! ```json
//! {
//!   "layout": { "width": 800, "height": 500, "backgroundColor": "#000000", "quality": 2 },
//!   "points": [
//!     { "id": "point-1", "x": 560, "y": 400, "color": "#6b46c1", "radius": 480, "blur": 0.4, "opacity": 0.9 }
//!   ]
//! }
//! ```
//!
//! Export always writes every field. Import checks the structure of the whole
//! document before building anything, so a rejected file never leaves a
//! half-applied scene behind.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::FormatError;
use crate::point::{DEFAULT_BLUR, DEFAULT_OPACITY};
use crate::scene::MAX_DIMENSION;
use crate::{MeshPoint, PointId, RenderQuality, Scene};

/// Canvas-level part of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDocument {
    /// Canvas width in scene pixels.
    pub width: u32,
    /// Canvas height in scene pixels.
    pub height: u32,
    /// Background hex color.
    pub background_color: String,
    /// Render quality multiplier.
    pub quality: u8,
}

/// One point in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointDocument {
    /// Point identifier.
    pub id: String,
    /// Center X.
    pub x: f32,
    /// Center Y.
    pub y: f32,
    /// Hex color.
    pub color: String,
    /// Fade-out radius.
    pub radius: f32,
    /// Blur strength.
    pub blur: f32,
    /// Center opacity.
    pub opacity: f32,
}

impl From<&MeshPoint> for PointDocument {
    fn from(point: &MeshPoint) -> Self {
        Self {
            id: point.id.to_string(),
            x: point.x,
            y: point.y,
            color: point.color.clone(),
            radius: point.radius,
            blur: point.blur,
            opacity: point.opacity,
        }
    }
}

impl From<PointDocument> for MeshPoint {
    fn from(doc: PointDocument) -> Self {
        Self {
            id: PointId::from_string(doc.id),
            x: doc.x,
            y: doc.y,
            color: doc.color,
            radius: doc.radius,
            blur: doc.blur,
            opacity: doc.opacity,
        }
    }
}

/// Canonical scene document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Canvas layout.
    pub layout: LayoutDocument,
    /// Points in paint order.
    pub points: Vec<PointDocument>,
}

impl SceneDocument {
    /// Build a document from a scene, materializing every field.
    #[must_use]
    pub fn from_scene(scene: &Scene) -> Self {
        Self {
            layout: LayoutDocument {
                width: scene.width,
                height: scene.height,
                background_color: scene.background_color.clone(),
                quality: scene.render_quality.get(),
            },
            points: scene.points().iter().map(PointDocument::from).collect(),
        }
    }

    /// Turn the document into a scene.
    ///
    /// A `quality` outside `1..=4` is ignored in favour of `fallback_quality`.
    #[must_use]
    pub fn into_scene(self, fallback_quality: RenderQuality) -> Scene {
        let mut scene = Scene::new(self.layout.width, self.layout.height);
        scene.background_color = self.layout.background_color;
        scene.render_quality = RenderQuality::new(self.layout.quality).unwrap_or(fallback_quality);
        scene.set_points(self.points.into_iter().map(MeshPoint::from).collect());
        scene
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Validate an untrusted JSON value and build a document from it.
    ///
    /// Missing point ids are minted, missing `blur`/`opacity` take their
    /// defaults, and a missing or unusable `quality` becomes `fallback_quality`.
    ///
    /// # Errors
    ///
    /// Returns the first structural violation found.
    pub fn from_value(value: &Value, fallback_quality: RenderQuality) -> Result<Self, FormatError> {
        let root = value
            .as_object()
            .ok_or_else(|| FormatError::wrong_type("document", "an object"))?;

        let layout = object_field(root, "layout", "layout")?;
        let width = dimension(layout, "width")?;
        let height = dimension(layout, "height")?;
        let background_color = string_field(layout, "backgroundColor", "layout.backgroundColor")?;
        let quality = quality_field(layout).unwrap_or(fallback_quality);

        let points = root
            .get("points")
            .ok_or_else(|| FormatError::missing("points"))?
            .as_array()
            .ok_or_else(|| FormatError::wrong_type("points", "an array"))?
            .iter()
            .enumerate()
            .map(|(i, p)| point_document(i, p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            layout: LayoutDocument {
                width,
                height,
                background_color,
                quality: quality.get(),
            },
            points,
        })
    }
}

/// Serialize a scene to its canonical pretty-printed JSON document.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize(scene: &Scene) -> Result<String, serde_json::Error> {
    SceneDocument::from_scene(scene).to_json_pretty()
}

/// Parse and validate a scene document from raw bytes.
///
/// # Errors
///
/// Returns [`FormatError`] if the bytes are not JSON or the structure is wrong.
pub fn deserialize(bytes: &[u8], fallback_quality: RenderQuality) -> Result<Scene, FormatError> {
    let value: Value = serde_json::from_slice(bytes)?;
    Ok(SceneDocument::from_value(&value, fallback_quality)?.into_scene(fallback_quality))
}

fn object_field<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, FormatError> {
    obj.get(key)
        .ok_or_else(|| FormatError::missing(path))?
        .as_object()
        .ok_or_else(|| FormatError::wrong_type(path, "an object"))
}

fn number_field(obj: &Map<String, Value>, key: &str, path: &str) -> Result<f64, FormatError> {
    obj.get(key)
        .ok_or_else(|| FormatError::missing(path))?
        .as_f64()
        .ok_or_else(|| FormatError::wrong_type(path, "a number"))
}

fn string_field(obj: &Map<String, Value>, key: &str, path: &str) -> Result<String, FormatError> {
    obj.get(key)
        .ok_or_else(|| FormatError::missing(path))?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| FormatError::wrong_type(path, "a string"))
}

/// An optional number: absent or `null` is `None`, anything else must be numeric.
fn optional_number(obj: &Map<String, Value>, key: &str, path: &str) -> Result<Option<f64>, FormatError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_f64()
            .map(Some)
            .ok_or_else(|| FormatError::wrong_type(path, "a number")),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn dimension(layout: &Map<String, Value>, key: &str) -> Result<u32, FormatError> {
    let path = format!("layout.{key}");
    let value = number_field(layout, key, &path)?;
    if value < 1.0 {
        return Err(FormatError::out_of_range(path, "must be at least 1"));
    }
    if value.round() > f64::from(MAX_DIMENSION) {
        return Err(FormatError::out_of_range(path, "must be at most 8192"));
    }
    Ok(value.round() as u32)
}

/// `quality` is lenient: only a whole number in `1..=4` is honoured.
#[allow(clippy::cast_possible_truncation)]
fn quality_field(layout: &Map<String, Value>) -> Option<RenderQuality> {
    let q = layout.get("quality")?.as_f64()?;
    if q.fract().abs() > f64::EPSILON || !(1.0..=4.0).contains(&q) {
        tracing::debug!("Ignoring unusable layout.quality {q}");
        return None;
    }
    RenderQuality::new(q as u8)
}

/// Narrow a document number to `f32`, rejecting values that overflow it.
#[allow(clippy::cast_possible_truncation)]
fn narrow(value: f64, path: impl Into<String>) -> Result<f32, FormatError> {
    let narrowed = value as f32;
    if narrowed.is_finite() {
        Ok(narrowed)
    } else {
        Err(FormatError::out_of_range(path, "does not fit in f32"))
    }
}

fn point_document(index: usize, value: &Value) -> Result<PointDocument, FormatError> {
    let base = format!("points[{index}]");
    let obj = value
        .as_object()
        .ok_or_else(|| FormatError::wrong_type(base.clone(), "an object"))?;
    let path = |key: &str| format!("{base}.{key}");

    let x = narrow(number_field(obj, "x", &path("x"))?, path("x"))?;
    let y = narrow(number_field(obj, "y", &path("y"))?, path("y"))?;
    let color = string_field(obj, "color", &path("color"))?;
    let radius = narrow(number_field(obj, "radius", &path("radius"))?, path("radius"))?;
    let blur = optional_number(obj, "blur", &path("blur"))?
        .map(|b| narrow(b, path("blur")))
        .transpose()?;
    let opacity = optional_number(obj, "opacity", &path("opacity"))?
        .map(|o| narrow(o, path("opacity")))
        .transpose()?;

    let id = match obj.get("id") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        None | Some(Value::Null | Value::String(_)) => PointId::new().to_string(),
        Some(_) => return Err(FormatError::wrong_type(path("id"), "a string")),
    };

    Ok(PointDocument {
        id,
        x,
        y,
        color,
        radius,
        blur: blur.unwrap_or(DEFAULT_BLUR),
        opacity: opacity.unwrap_or(DEFAULT_OPACITY),
    })
}
