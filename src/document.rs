//! Document loading and rendering.
//!
//! `Loader` owns the parse options and font database, `Document` owns the
//! parsed scene tree, and `Element` borrows a single node out of it. All
//! heavy lifting is delegated to resvg.

use std::path::Path;

use resvg::tiny_skia;
use resvg::usvg;

use crate::bitmap::{unpack_rgba, Bitmap};
use crate::error::RenderError;
use crate::geometry::{BoundingBox, Matrix};

/// Parse options and font registration for document loading.
pub struct Loader {
    options: usvg::Options<'static>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            options: usvg::Options::default(),
        }
    }

    /// Makes the fonts installed on this machine available to text layout.
    pub fn load_system_fonts(&mut self) -> &mut Self {
        self.options.fontdb_mut().load_system_fonts();
        self
    }

    /// Registers a single font file. Face attributes are read from the font.
    pub fn add_font_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), RenderError> {
        self.options
            .fontdb_mut()
            .load_font_file(path.as_ref())
            .map_err(|e| RenderError::FontLoad(format!("{}: {e}", path.as_ref().display())))
    }

    /// Registers an in-memory font.
    pub fn add_font_data(&mut self, data: Vec<u8>) {
        self.options.fontdb_mut().load_font_data(data);
    }

    /// Loads a document from a file. Relative resource references inside the
    /// SVG resolve against the file's directory.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<Document, RenderError> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        self.options.resources_dir = std::fs::canonicalize(path)
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()));
        let tree = usvg::Tree::from_data(&data, &self.options)?;
        Ok(Document { tree })
    }

    /// Loads a document from raw markup. No resources directory is set, so
    /// relative references inside the SVG will not resolve.
    pub fn load_from_data(&mut self, data: &[u8]) -> Result<Document, RenderError> {
        self.options.resources_dir = None;
        let tree = usvg::Tree::from_data(data, &self.options)?;
        Ok(Document { tree })
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves an output size from requested dimensions and an intrinsic size.
///
/// Non-positive requests mean "derive from the document": both missing uses
/// the intrinsic size, one missing preserves the aspect ratio.
fn resolve_size(
    width: i32,
    height: i32,
    intrinsic_w: f32,
    intrinsic_h: f32,
) -> Result<(u32, u32), RenderError> {
    if !(intrinsic_w > 0.0 && intrinsic_h > 0.0) {
        return Err(RenderError::EmptyDocument);
    }
    let (w, h) = if width <= 0 && height <= 0 {
        (intrinsic_w.ceil(), intrinsic_h.ceil())
    } else if height <= 0 {
        let w = width as f32;
        (w, (w * intrinsic_h / intrinsic_w).ceil())
    } else if width <= 0 {
        let h = height as f32;
        ((h * intrinsic_w / intrinsic_h).ceil(), h)
    } else {
        (width as f32, height as f32)
    };
    if w < 1.0 || h < 1.0 || w > u32::MAX as f32 || h > u32::MAX as f32 {
        return Err(RenderError::InvalidSize(width, height));
    }
    Ok((w as u32, h as u32))
}

/// A parsed SVG document, ready to render.
pub struct Document {
    tree: usvg::Tree,
}

impl Document {
    /// Intrinsic width in user units.
    pub fn width(&self) -> f32 {
        self.tree.size().width()
    }

    /// Intrinsic height in user units.
    pub fn height(&self) -> f32 {
        self.tree.size().height()
    }

    /// Bounds of all visible content, in document coordinates.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_rect(self.tree.root().abs_bounding_box())
    }

    /// Renders the document into an existing bitmap with the given transform.
    /// The bitmap is composited onto, not cleared first.
    pub fn render(&self, bitmap: &mut Bitmap, matrix: &Matrix) {
        resvg::render(
            &self.tree,
            matrix.to_transform(),
            &mut bitmap.pixmap_mut().as_mut(),
        );
    }

    /// Renders to a freshly allocated bitmap.
    ///
    /// Non-positive `width`/`height` derive the missing dimension from the
    /// document (see [`resolve_size`]); the bitmap is cleared to the packed
    /// `0xRRGGBBAA` `background` before rendering.
    pub fn render_to_bitmap(
        &self,
        width: i32,
        height: i32,
        background: u32,
    ) -> Result<Bitmap, RenderError> {
        let (out_w, out_h) = resolve_size(width, height, self.width(), self.height())?;
        let mut pixmap = tiny_skia::Pixmap::new(out_w, out_h)
            .ok_or(RenderError::InvalidSize(width, height))?;
        pixmap.fill(unpack_rgba(background));
        let transform = tiny_skia::Transform::from_scale(
            out_w as f32 / self.width(),
            out_h as f32 / self.height(),
        );
        resvg::render(&self.tree, transform, &mut pixmap.as_mut());
        Ok(Bitmap::from_pixmap(pixmap))
    }

    /// Looks up an element by its `id` attribute.
    pub fn element_by_id<'a>(&'a self, id: &str) -> Option<Element<'a>> {
        self.tree.node_by_id(id).map(|node| Element { node })
    }
}

/// A single node of a loaded document.
///
/// The wrapped scene tree is post-cascade and immutable, so elements expose
/// geometry and rendering but no attribute mutation.
pub struct Element<'a> {
    node: &'a usvg::Node,
}

impl Element<'_> {
    pub fn id(&self) -> &str {
        self.node.id()
    }

    /// The element's cumulative transform from document space.
    pub fn global_matrix(&self) -> Matrix {
        Matrix::from_transform(self.node.abs_transform())
    }

    /// Bounds in the element's own coordinate space.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_rect(self.node.bounding_box())
    }

    /// Bounds in document coordinates.
    pub fn global_bounding_box(&self) -> BoundingBox {
        BoundingBox::from_rect(self.node.abs_bounding_box())
    }

    /// Renders just this element into an existing bitmap.
    pub fn render(&self, bitmap: &mut Bitmap, matrix: &Matrix) {
        resvg::render_node(
            self.node,
            matrix.to_transform(),
            &mut bitmap.pixmap_mut().as_mut(),
        );
    }

    /// Renders just this element to a freshly allocated bitmap, sized from
    /// the element's bounds when `width`/`height` are non-positive.
    pub fn render_to_bitmap(
        &self,
        width: i32,
        height: i32,
        background: u32,
    ) -> Result<Bitmap, RenderError> {
        let bbox = self.global_bounding_box();
        let (out_w, out_h) = resolve_size(width, height, bbox.w, bbox.h)?;
        let mut pixmap = tiny_skia::Pixmap::new(out_w, out_h)
            .ok_or(RenderError::InvalidSize(width, height))?;
        pixmap.fill(unpack_rgba(background));
        let transform =
            tiny_skia::Transform::from_scale(out_w as f32 / bbox.w, out_h as f32 / bbox.h);
        resvg::render_node(self.node, transform, &mut pixmap.as_mut());
        Ok(Bitmap::from_pixmap(pixmap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECT_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50">
        <rect id="mark" x="10" y="20" width="30" height="5" fill="#ff0000"/>
    </svg>"##;

    fn load(data: &str) -> Document {
        Loader::new().load_from_data(data.as_bytes()).unwrap()
    }

    #[test]
    fn intrinsic_size_comes_from_markup() {
        let doc = load(RECT_SVG);
        assert_eq!(doc.width(), 100.0);
        assert_eq!(doc.height(), 50.0);
    }

    #[test]
    fn malformed_markup_is_a_parse_error() {
        let result = Loader::new().load_from_data(b"not svg at all");
        assert!(matches!(result, Err(RenderError::Parse(_))));
    }

    #[test]
    fn zero_size_markup_is_rejected() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="0" height="0"/>"#;
        assert!(Loader::new().load_from_data(svg.as_bytes()).is_err());
    }

    #[test]
    fn auto_size_uses_intrinsic_dimensions() {
        let bitmap = load(RECT_SVG).render_to_bitmap(-1, -1, 0).unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (100, 50));
    }

    #[test]
    fn width_only_preserves_aspect_ratio() {
        let bitmap = load(RECT_SVG).render_to_bitmap(200, -1, 0).unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (200, 100));
    }

    #[test]
    fn height_only_preserves_aspect_ratio() {
        let bitmap = load(RECT_SVG).render_to_bitmap(-1, 25, 0).unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (50, 25));
    }

    #[test]
    fn explicit_size_wins_over_aspect_ratio() {
        let bitmap = load(RECT_SVG).render_to_bitmap(64, 64, 0).unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (64, 64));
    }

    #[test]
    fn background_fills_uncovered_pixels() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"/>"#;
        let bitmap = load(svg).render_to_bitmap(-1, -1, 0x00FF00FF).unwrap();
        assert_eq!(&bitmap.data()[..4], &[0x00, 0xFF, 0x00, 0xFF]);
    }

    #[test]
    fn rendered_shape_covers_background() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4">
            <rect x="0" y="0" width="4" height="4" fill="#0000ff"/>
        </svg>"##;
        let bitmap = load(svg).render_to_bitmap(-1, -1, 0xFF0000FF).unwrap();
        assert_eq!(&bitmap.data()[..4], &[0x00, 0x00, 0xFF, 0xFF]);
    }

    #[test]
    fn element_lookup_by_id() {
        let doc = load(RECT_SVG);
        let element = doc.element_by_id("mark").unwrap();
        assert_eq!(element.id(), "mark");
        assert!(doc.element_by_id("missing").is_none());
    }

    #[test]
    fn element_bounding_box_matches_markup() {
        let doc = load(RECT_SVG);
        let bbox = doc.element_by_id("mark").unwrap().bounding_box();
        assert_eq!(bbox, BoundingBox::new(10.0, 20.0, 30.0, 5.0));
    }

    #[test]
    fn untransformed_element_has_identity_global_matrix() {
        let doc = load(RECT_SVG);
        let element = doc.element_by_id("mark").unwrap();
        assert_eq!(element.global_matrix(), Matrix::identity());
    }

    #[test]
    fn element_renders_at_its_own_size() {
        let doc = load(RECT_SVG);
        let element = doc.element_by_id("mark").unwrap();
        let bitmap = element.render_to_bitmap(-1, -1, 0).unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (30, 5));
    }

    #[test]
    fn resolve_size_rules() {
        assert_eq!(resolve_size(-1, -1, 10.5, 20.5).unwrap(), (11, 21));
        assert_eq!(resolve_size(21, -1, 10.0, 20.0).unwrap(), (21, 42));
        assert_eq!(resolve_size(-1, 40, 10.0, 20.0).unwrap(), (20, 40));
        assert_eq!(resolve_size(3, 7, 10.0, 20.0).unwrap(), (3, 7));
        assert!(matches!(
            resolve_size(-1, -1, 0.0, 20.0),
            Err(RenderError::EmptyDocument)
        ));
    }
}
