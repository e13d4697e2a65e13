#![warn(missing_docs)]

//! gridfin — parametric Gridfinity-style storage solids.
//!
//! Generators for the modular storage family: baseplates, bins/boxes,
//! drawer spacer sets, and multi-part rugged transport boxes. Each
//! generator turns unit counts plus option flags into a declarative
//! solid-modeling request ([`gridfin_ir::Document`]) for a geometry
//! kernel backend, and reports exact part dimensions without any
//! geometry evaluation.
//!
//! # Example
//!
//! ```rust
//! use gridfin::{BoxParams, GridfinityBox};
//!
//! let params = BoxParams {
//!     length_u: 2,
//!     width_u: 3,
//!     height_u: 5,
//!     ..BoxParams::default()
//! };
//! let bin = GridfinityBox::new(params).unwrap();
//! let solid = bin.render();
//! let (x, y, z) = solid.size();
//! assert!((x - 83.5).abs() < 1e-6 && (y - 125.5).abs() < 1e-6 && (z - 38.8).abs() < 1e-6);
//! let doc = solid.to_document();
//! assert!(doc.to_json().is_ok());
//! ```

use thiserror::Error;

pub mod baseplate;
pub mod boxes;
pub mod constants;
pub mod dims;
pub mod drawer;
pub mod ruggedbox;
pub mod solid;

pub use baseplate::{BaseplateParams, GridfinityBaseplate};
pub use boxes::{BoxParams, GridfinityBox, GridfinitySolidBox};
pub use dims::GridDims;
pub use drawer::{FitReport, GridfinityDrawerSpacer, SpacerParams};
pub use ruggedbox::{GridfinityRuggedBox, RuggedBoxParams};
pub use solid::{Aabb, Solid};

/// Errors returned when a generator's parameters are inconsistent.
#[derive(Error, Debug)]
pub enum GfError {
    /// A unit count was zero.
    #[error("unit counts must be at least 1 ({axis} = {value})")]
    UnitCount {
        /// Axis the count applies to.
        axis: char,
        /// Offending value.
        value: usize,
    },
    /// Wall thickness outside the printable range.
    #[error("wall thickness {0} mm is outside the supported 0.5-2.5 mm range")]
    WallThickness(f64),
    /// Lite construction with a wall too thick to shell.
    #[error("lite construction requires a wall thickness of at most 1.5 mm (got {0} mm)")]
    LiteWall(f64),
    /// Lite construction has no floor slab to fill.
    #[error("lite construction cannot be combined with a solid interior")]
    LiteSolidConflict,
    /// Lite construction has no floor material to drill.
    #[error("lite construction cannot be combined with bottom holes")]
    LiteHolesConflict,
    /// More dividers than compartment walls can fit.
    #[error("{axis} divider count {count} exceeds the maximum {max} for this size")]
    DividerCount {
        /// Axis the dividers run across.
        axis: char,
        /// Requested divider count.
        count: usize,
        /// Largest valid count for the part size.
        max: usize,
    },
    /// Rugged box below its minimum viable size.
    #[error("rugged box {axis} size must be at least {min} units (got {value})")]
    RuggedSize {
        /// Axis the constraint applies to.
        axis: char,
        /// Offending value.
        value: usize,
        /// Minimum supported value.
        min: usize,
    },
    /// Document serialization failure.
    #[error("document serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Convenience result alias for generator operations.
pub type Result<T> = std::result::Result<T, GfError>;
