//! Fixed-rate frame composition.
//!
//! Every tick the compositor clears the canvas, takes snapshots of the
//! shared state, paints each layout cell independently, and hands the
//! finished buffer to the sink. A cell that fails to paint is skipped with a
//! warning and leaves the background visible; the rest of the frame still
//! goes out. Ticks missed because a frame took longer than its slot are
//! dropped, never replayed, so a slow encoder cannot build a backlog.

use std::sync::Arc;
use std::time::Duration;

use mosaic_feed::state::MarketState;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use mosaic_core::error::MosaicError;

use crate::canvas::FrameCanvas;
use crate::cells::{balance_cell_svg, pool_cell_svg};
use crate::chart::chart_cell_svg;
use crate::layout::{Cell, CellKind, FrameLayout};
use crate::sink::FrameSink;

pub struct Compositor {
    state: Arc<MarketState>,
    layout: FrameLayout,
    canvas: FrameCanvas,
    sink: Box<dyn FrameSink>,
    chart_label: String,
    series_cap: usize,
    fps: u32,
}

impl Compositor {
    pub fn new(
        state: Arc<MarketState>,
        layout: FrameLayout,
        background: [u8; 3],
        sink: Box<dyn FrameSink>,
        chart_label: String,
        series_cap: usize,
        fps: u32,
    ) -> Result<Self, MosaicError> {
        let canvas = FrameCanvas::new(layout.width, layout.height, background)?;
        Ok(Self { state, layout, canvas, sink, chart_label, series_cap, fps })
    }

    /// Run the tick loop until shutdown, then close the sink.
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) {
        let period = Duration::from_secs(1) / self.fps.max(1);
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!("compositor started ({} fps, {} cells)", self.fps, self.layout.cells.len());
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let started = tokio::time::Instant::now();
                    self.compose();
                    if let Err(e) = self.sink.write_frame(self.canvas.data()) {
                        warn!("dropping frame: {e}");
                    }
                    let elapsed = started.elapsed();
                    if elapsed > period {
                        warn!("frame took {elapsed:?} (budget {period:?}), skipping missed ticks");
                    }
                }
                _ = shutdown_rx.changed() => {
                    info!("compositor stopped");
                    self.sink.close();
                    return;
                }
            }
        }
    }

    /// Paint one full frame into the canvas.
    fn compose(&mut self) {
        self.canvas.clear();
        let cells = std::mem::take(&mut self.layout.cells);
        for cell in &cells {
            if let Err(e) = self.paint_cell(cell) {
                warn!("cell '{}' failed to paint, leaving blank: {e}", cell.name);
            }
        }
        self.layout.cells = cells;
    }

    fn paint_cell(&mut self, cell: &Cell) -> Result<(), MosaicError> {
        let r = cell.rect;
        match cell.kind {
            CellKind::Image => {
                // No fragment yet: background shows through, not an error.
                if let Some(fragment) = self.state.fragments().get(&cell.name) {
                    self.canvas.blit_png(&fragment.payload, r.x, r.y)?;
                }
            }
            CellKind::PriceChart => {
                let samples = self.state.series_snapshot();
                let svg = chart_cell_svg(&samples, self.series_cap, &self.chart_label, r.w, r.h);
                self.canvas.blit_svg(&svg, r.x, r.y)?;
            }
            CellKind::Balance => {
                let svg = balance_cell_svg(self.state.account(), r.w, r.h);
                self.canvas.blit_svg(&svg, r.x, r.y)?;
            }
            CellKind::Pool => {
                let pool = self.state.pool();
                let svg = pool_cell_svg(pool.as_ref(), self.state.wallet(), r.w, r.h);
                self.canvas.blit_svg(&svg, r.x, r.y)?;
            }
        }
        Ok(())
    }

    /// Compose a single frame and return a copy — test/debug entry point.
    pub fn compose_once(&mut self) -> Vec<u8> {
        self.compose();
        self.canvas.data().to_vec()
    }
}
