//!
//! # flo_lineart_canvas
//!
//! Draws the strokes generated by `flo_lineart` using `flo_canvas`. Each stroke becomes a path in the camera frame,
//! which is set up so that the area computed by the line art engine fills the canvas (from -1 to 1 on both axes).
//!
//! Any `GraphicsContext` can be used as a target, so the result can be sent to a window, rendered offscreen or
//! collected into a `Vec<Draw>` for encoding.
//!

#![warn(bare_trait_objects)]

mod stroke_drawing;

pub use self::stroke_drawing::*;

pub use flo_canvas as canvas;
pub use flo_lineart as lineart;
