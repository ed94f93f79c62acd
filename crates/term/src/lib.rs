//! Terminal crate: framebuffer, palette, frame composition, and the
//! diff-flushing renderer.

mod compose;
mod fb;
mod palette;
mod renderer;

pub use compose::{compose_frame, Viewport};
pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use palette::style_for;
pub use renderer::TerminalRenderer;
