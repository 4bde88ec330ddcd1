//! Pixmap canvas.
//!
//! The canvas is a premultiplied-RGBA8 `tiny-skia` pixmap the size of the
//! output frame. Image fragments are decoded from PNG and blitted at their
//! cell origin; locally-drawn cells (chart, balance, pool) are generated as
//! SVG documents and rasterized through `resvg`, which also takes care of
//! text shaping.

use std::sync::{Arc, LazyLock};

use mosaic_core::error::MosaicError;
use resvg::usvg;
use tiny_skia::{Color, Pixmap, PixmapPaint, Transform};

/// Shared font database — loading system fonts once is enough.
static FONTDB: LazyLock<Arc<usvg::fontdb::Database>> = LazyLock::new(|| {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    Arc::new(db)
});

/// Rasterize an SVG document at its declared size.
pub fn rasterize_svg(svg: &str) -> Result<Pixmap, MosaicError> {
    let options = usvg::Options { fontdb: FONTDB.clone(), ..usvg::Options::default() };
    let tree = usvg::Tree::from_data(svg.as_bytes(), &options)
        .map_err(|e| MosaicError::Render(format!("svg parse: {e}")))?;

    let size = tree.size().to_int_size();
    let mut pixmap = Pixmap::new(size.width(), size.height())
        .ok_or_else(|| MosaicError::Render("svg has a zero extent".into()))?;
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());
    Ok(pixmap)
}

/// The output frame canvas.
pub struct FrameCanvas {
    pixmap: Pixmap,
    background: Color,
}

impl FrameCanvas {
    pub fn new(width: u32, height: u32, background: [u8; 3]) -> Result<Self, MosaicError> {
        let pixmap = Pixmap::new(width, height)
            .ok_or_else(|| MosaicError::Render(format!("bad canvas size {width}x{height}")))?;
        let [r, g, b] = background;
        let mut canvas = Self { pixmap, background: Color::from_rgba8(r, g, b, 255) };
        canvas.clear();
        Ok(canvas)
    }

    /// Fill the whole canvas with the background color.
    pub fn clear(&mut self) {
        self.pixmap.fill(self.background);
    }

    /// Decode a PNG payload and blit it at `(x, y)`, unscaled.
    pub fn blit_png(&mut self, png: &[u8], x: u32, y: u32) -> Result<(), MosaicError> {
        let image =
            Pixmap::decode_png(png).map_err(|e| MosaicError::Render(format!("png decode: {e}")))?;
        self.blit(&image, x, y);
        Ok(())
    }

    /// Rasterize an SVG document and blit it at `(x, y)`.
    pub fn blit_svg(&mut self, svg: &str, x: u32, y: u32) -> Result<(), MosaicError> {
        let image = rasterize_svg(svg)?;
        self.blit(&image, x, y);
        Ok(())
    }

    fn blit(&mut self, image: &Pixmap, x: u32, y: u32) {
        self.pixmap.draw_pixmap(
            x as i32,
            y as i32,
            image.as_ref(),
            &PixmapPaint::default(),
            Transform::default(),
            None,
        );
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// The finished frame: premultiplied RGBA8, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Pixel at `(x, y)` as `[r, g, b, a]` — test helper.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * self.width() + x) * 4) as usize;
        let d = self.data();
        [d[idx], d[idx + 1], d[idx + 2], d[idx + 3]]
    }
}
