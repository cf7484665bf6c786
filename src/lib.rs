//! svgpix - SVG to PNG rendering shim
//!
//! A thin, typed facade over the resvg rendering stack:
//! - `Loader` configures parsing and fonts
//! - `Document` holds a parsed SVG scene
//! - `Bitmap` is the render target and PNG encoder
//! - `Matrix` / `BoundingBox` carry the affine geometry
//!
//! All SVG semantics (parsing, cascade, path geometry, rasterization,
//! compositing) live in the wrapped renderer. This crate only decides
//! sizes, transforms, and where bytes come from and go to.

pub mod bitmap;
pub mod document;
pub mod error;
pub mod geometry;

pub use bitmap::Bitmap;
pub use document::{Document, Element, Loader};
pub use error::RenderError;
pub use geometry::{BoundingBox, Matrix};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
