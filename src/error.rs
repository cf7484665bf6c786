//! Error type shared by the library and the CLI.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to parse SVG: {0}")]
    Parse(#[from] resvg::usvg::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid bitmap size: {0}x{1}")]
    InvalidSize(i32, i32),

    #[error("Document has no intrinsic size")]
    EmptyDocument,

    #[error("PNG encoding failed: {0}")]
    PngEncode(String),

    #[error("Failed to load font face: {0}")]
    FontLoad(String),
}
