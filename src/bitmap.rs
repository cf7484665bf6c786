//! Render target wrapping the renderer's pixmap.
//!
//! Pixels are RGBA8 with premultiplied alpha, the renderer's native layout.

use std::io::Write;
use std::path::Path;

use resvg::tiny_skia;

use crate::error::RenderError;

/// Unpacks a `0xRRGGBBAA` color into the renderer's color type.
pub(crate) fn unpack_rgba(color: u32) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(
        (color >> 24) as u8,
        (color >> 16) as u8,
        (color >> 8) as u8,
        color as u8,
    )
}

pub struct Bitmap {
    pixmap: tiny_skia::Pixmap,
}

impl Bitmap {
    /// Allocates a bitmap of the given size. Zero dimensions are rejected.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
            RenderError::InvalidSize(
                i32::try_from(width).unwrap_or(i32::MAX),
                i32::try_from(height).unwrap_or(i32::MAX),
            )
        })?;
        Ok(Self { pixmap })
    }

    pub(crate) fn from_pixmap(pixmap: tiny_skia::Pixmap) -> Self {
        Self { pixmap }
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut tiny_skia::Pixmap {
        &mut self.pixmap
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Row stride in bytes.
    pub fn stride(&self) -> u32 {
        self.pixmap.width() * 4
    }

    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        self.pixmap.data_mut()
    }

    /// Fills the whole bitmap with a `0xRRGGBBAA` color.
    pub fn clear(&mut self, color: u32) {
        self.pixmap.fill(unpack_rgba(color));
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        self.pixmap
            .encode_png()
            .map_err(|e| RenderError::PngEncode(e.to_string()))
    }

    pub fn write_to_png<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        let png = self.encode_png()?;
        std::fs::write(path, png)?;
        Ok(())
    }

    pub fn write_to_png_stream<W: Write>(&self, writer: &mut W) -> Result<(), RenderError> {
        let png = self.encode_png()?;
        writer.write_all(&png)?;
        Ok(())
    }
}
