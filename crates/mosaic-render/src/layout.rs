//! Static frame layout.
//!
//! The layout maps cell names to fixed rectangles within the output canvas.
//! It is built once at startup from configuration and immutable afterwards —
//! producers come and go, the grid does not.

use mosaic_core::config::{CanvasConfig, CellConfig};
use mosaic_core::error::MosaicError;

/// A fixed rectangle within the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// What gets painted into a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// A PNG fragment from the store, blitted as-is. The cell name is the
    /// fragment name.
    Image,
    /// The locally-drawn price chart for the tracked symbol.
    PriceChart,
    /// Futures account equity / unrealized PnL.
    Balance,
    /// Mining-pool sparklines + wallet balance.
    Pool,
}

impl CellKind {
    fn parse(s: &str) -> Result<Self, MosaicError> {
        match s {
            "image" => Ok(Self::Image),
            "price_chart" => Ok(Self::PriceChart),
            "balance" => Ok(Self::Balance),
            "pool" => Ok(Self::Pool),
            other => Err(MosaicError::Config(format!("unknown cell kind: {other}"))),
        }
    }
}

/// One named cell.
#[derive(Debug, Clone)]
pub struct Cell {
    pub name: String,
    pub kind: CellKind,
    pub rect: Rect,
}

/// The whole frame layout.
#[derive(Debug, Clone)]
pub struct FrameLayout {
    pub width: u32,
    pub height: u32,
    pub cells: Vec<Cell>,
}

impl FrameLayout {
    /// Build and validate the layout from configuration.
    pub fn from_config(canvas: &CanvasConfig, cells: &[CellConfig]) -> Result<Self, MosaicError> {
        let mut out = Vec::with_capacity(cells.len());
        for cell in cells {
            let kind = CellKind::parse(&cell.kind)?;
            if cell.w == 0 || cell.h == 0 {
                return Err(MosaicError::Config(format!("cell '{}' has a zero extent", cell.name)));
            }
            let fits = cell.x.checked_add(cell.w).is_some_and(|x| x <= canvas.width)
                && cell.y.checked_add(cell.h).is_some_and(|y| y <= canvas.height);
            if !fits {
                return Err(MosaicError::Config(format!(
                    "cell '{}' exceeds the {}x{} canvas",
                    cell.name, canvas.width, canvas.height
                )));
            }
            out.push(Cell {
                name: cell.name.clone(),
                kind,
                rect: Rect { x: cell.x, y: cell.y, w: cell.w, h: cell.h },
            });
        }
        Ok(Self { width: canvas.width, height: canvas.height, cells: out })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> CanvasConfig {
        CanvasConfig { width: 1216, height: 684, background: None }
    }

    fn cell(name: &str, kind: &str, x: u32, y: u32, w: u32, h: u32) -> CellConfig {
        CellConfig { name: name.into(), kind: kind.into(), x, y, w, h }
    }

    #[test]
    fn builds_typed_cells() {
        let layout = FrameLayout::from_config(
            &canvas(),
            &[cell("vix", "image", 20, 20, 187, 154), cell("xmrusdt", "price_chart", 601, 194, 187, 154)],
        )
        .unwrap();
        assert_eq!(layout.cells.len(), 2);
        assert_eq!(layout.cells[0].kind, CellKind::Image);
        assert_eq!(layout.cells[1].kind, CellKind::PriceChart);
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = FrameLayout::from_config(&canvas(), &[cell("x", "hologram", 0, 0, 10, 10)]);
        assert!(err.is_err());
    }

    #[test]
    fn rejects_out_of_bounds_cell() {
        let err = FrameLayout::from_config(&canvas(), &[cell("x", "image", 1200, 0, 187, 154)]);
        assert!(err.is_err());
    }

    #[test]
    fn rejects_overflowing_cell_extent() {
        let err = FrameLayout::from_config(&canvas(), &[cell("x", "image", u32::MAX, 0, 2, 10)]);
        assert!(err.is_err());

        let err = FrameLayout::from_config(&canvas(), &[cell("y", "image", 0, u32::MAX, 10, 2)]);
        assert!(err.is_err());
    }
}
