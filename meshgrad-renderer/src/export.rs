//! Scene export to image and document formats.
//!
//! Exports run an independent render pass at `width·q × height·q` with no
//! selection decoration, then encode the result. They never touch the scene.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use image::ImageEncoder;
use meshgrad_core::{schema, EditorState, RenderQuality, Scene};
use serde::{Deserialize, Serialize};
use tiny_skia::Pixmap;

use crate::compositor::{render_scene, RenderOptions};
use crate::error::{RenderError, RenderResult};

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// PNG image.
    Png,
    /// JPEG image.
    Jpeg,
    /// The scene document as pretty-printed JSON.
    Json,
}

impl ExportFormat {
    /// File extension, without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Json => "json",
        }
    }

    /// MIME type of the encoded payload.
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Json => "application/json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Configuration for scene export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    /// JPEG quality 1-100 (default: 90).
    pub jpeg_quality: u8,
    /// Apply per-point blur (default: true).
    pub blur: bool,
    /// Raster multiplier override; the scene's own quality when `None`.
    pub quality: Option<RenderQuality>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 90,
            blur: true,
            quality: None,
        }
    }
}

impl ExportConfig {
    /// Defaults with blur following the editor's blur toggle.
    #[must_use]
    pub fn for_editor(editor: &EditorState) -> Self {
        Self {
            blur: editor.use_blur(),
            ..Self::default()
        }
    }
}

/// Exports a [`Scene`] to PNG, JPEG or JSON.
#[derive(Debug, Clone, Default)]
pub struct SceneExporter {
    config: ExportConfig,
}

impl SceneExporter {
    /// Create a new exporter with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// The exporter configuration.
    #[must_use]
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Export a scene to the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if the scene cannot be rendered or encoded.
    pub fn export(&self, scene: &Scene, format: ExportFormat) -> RenderResult<Vec<u8>> {
        let bytes = match format {
            ExportFormat::Png => self.render_to_png(scene)?,
            ExportFormat::Jpeg => self.render_to_jpeg(scene)?,
            ExportFormat::Json => Self::render_to_json(scene)?,
        };
        tracing::info!(
            "Exported {}x{} scene as {format} ({} bytes)",
            scene.width,
            scene.height,
            bytes.len()
        );
        Ok(bytes)
    }

    /// Export the editor's scene, honouring its blur toggle over
    /// [`ExportConfig::blur`].
    ///
    /// # Errors
    ///
    /// Returns an error if the scene cannot be rendered or encoded.
    pub fn export_editor(&self, editor: &EditorState, format: ExportFormat) -> RenderResult<Vec<u8>> {
        let exporter = Self::new(ExportConfig {
            blur: editor.use_blur(),
            ..self.config.clone()
        });
        exporter.export(editor.scene(), format)
    }

    /// Run the export render pass.
    ///
    /// # Errors
    ///
    /// Returns an error if the raster cannot be allocated.
    pub fn render(&self, scene: &Scene) -> RenderResult<Pixmap> {
        let quality = self.config.quality.unwrap_or(scene.render_quality);
        render_scene(scene, &RenderOptions::export(quality, self.config.blur))
    }

    /// Export the scene to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    pub fn render_to_png(&self, scene: &Scene) -> RenderResult<Vec<u8>> {
        self.render(scene)?
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
    }

    /// Export the scene to JPEG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    pub fn render_to_jpeg(&self, scene: &Scene) -> RenderResult<Vec<u8>> {
        let pixmap = self.render(scene)?;
        let (width, height) = (pixmap.width(), pixmap.height());

        // The background is opaque, so premultiplied channels are the colors.
        let rgb_data: Vec<u8> = pixmap
            .data()
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();

        let mut buf = std::io::Cursor::new(Vec::new());
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, self.config.jpeg_quality);
        encoder
            .write_image(&rgb_data, width, height, image::ColorType::Rgb8.into())
            .map_err(|e| RenderError::Export(format!("JPEG encoding failed: {e}")))?;

        Ok(buf.into_inner())
    }

    /// Export the scene document as JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_to_json(scene: &Scene) -> RenderResult<Vec<u8>> {
        schema::serialize(scene)
            .map(String::into_bytes)
            .map_err(|e| RenderError::Export(format!("JSON serialization failed: {e}")))
    }

    /// Export and wrap the payload in a base64 `data:` URL.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    pub fn to_data_url(&self, scene: &Scene, format: ExportFormat) -> RenderResult<String> {
        use base64::Engine;
        let bytes = self.export(scene, format)?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        Ok(format!("data:{};base64,{encoded}", format.mime_type()))
    }
}

/// Download name for an export made at `unix_ms`: `mesh-gradient-<ms>.<ext>`.
#[must_use]
pub fn suggested_file_name(format: ExportFormat, unix_ms: u128) -> String {
    format!("mesh-gradient-{unix_ms}.{}", format.extension())
}

/// [`suggested_file_name`] stamped with the current time.
#[must_use]
pub fn timestamped_file_name(format: ExportFormat) -> String {
    let ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis());
    suggested_file_name(format, ms)
}
