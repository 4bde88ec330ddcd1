//! # mosaic-render
//!
//! Frame composition for the mosaic streamer.
//!
//! The compositor ticks at a fixed rate, reads a snapshot of the shared
//! market state, and paints each configured layout cell independently into a
//! premultiplied-RGBA8 pixmap. Missing fragments leave their cell blank; a
//! broken cell is skipped with a warning; the finished buffer is handed to an
//! output sink (normally an ffmpeg encoder process).
//!
//! ## Modules
//!
//! - [`layout`] — static cell layout, built once from configuration
//! - [`canvas`] — pixmap canvas: PNG blitting and SVG rasterization
//! - [`chart`] — price-chart cell: window statistics + SVG painter
//! - [`cells`] — balance and pool cell painters
//! - [`compositor`] — the fixed-rate tick loop
//! - [`sink`] — frame sinks (ffmpeg, raw file)

pub mod canvas;
pub mod cells;
pub mod chart;
pub mod compositor;
pub mod layout;
pub mod sink;
