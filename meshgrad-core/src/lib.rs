//! # Meshgrad Core
//!
//! Core logic for the mesh gradient editor: a scene of soft radial color
//! points, the coordinate transforms between pointer, raster and scene
//! space, hit-testing and dragging, and the JSON scene document.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               meshgrad-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Scene Model     │  Interaction             │
//! │  - Mesh points   │  - Coordinate transforms │
//! │  - Layout        │  - Hit-testing           │
//! │  - Colors        │  - Drag controller       │
//! ├─────────────────────────────────────────────┤
//! │  Editor State    │  Scene Document          │
//! │  - Revisions     │  - Serialize             │
//! │  - Listeners     │  - Validate + import     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Rasterization lives in `meshgrad-renderer`; nothing here allocates pixels.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod animation;
pub mod color;
pub mod editor;
pub mod error;
pub mod interaction;
pub mod point;
pub mod scene;
pub mod schema;
pub mod transform;

pub use animation::{AnimationHandle, FloatingAnimation};
pub use color::Rgb;
pub use editor::{EditorConfig, EditorState, SceneEvent, SceneListener};
pub use error::{ColorParseError, CoreError, CoreResult, FormatError};
pub use interaction::{DragController, DragOutcome, DragState, PointerEvent, PointerPhase};
pub use point::{MeshPoint, PointId, PointUpdate};
pub use scene::{LayoutUpdate, Scene};
pub use schema::{LayoutDocument, PointDocument, SceneDocument};
pub use transform::{RenderQuality, SurfaceGeometry, Vec2};

/// Meshgrad core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
