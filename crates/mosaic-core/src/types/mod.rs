//! Core data types flowing through the mosaic pipeline.

pub mod fragment;
pub mod market;
pub mod messages;

pub use fragment::*;
pub use market::*;
pub use messages::*;
