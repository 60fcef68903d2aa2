//! HTML rendering of model output for display in the counseling panel.

pub mod markdown;

pub use markdown::render;
