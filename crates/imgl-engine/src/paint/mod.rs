//! Color values shared by passes and the immediate-mode helper.

mod color;

pub use color::ColorRgba;
