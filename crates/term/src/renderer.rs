//! TerminalRenderer: flushes a framebuffer to a terminal.
//!
//! Rendering is diff-based: the renderer keeps the previously presented
//! frame and only rewrites cells that changed, coalescing neighbours on the
//! same row into single cursor-move-plus-print runs. Each frame is wrapped
//! in a synchronized-update block so partially drawn states never flash.

use std::io::{self, Write};

use anyhow::Result;
use log::debug;

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    presented: Option<FrameBuffer>,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            presented: None,
        }
    }

    /// Enter raw mode and the alternate screen. Pair with `exit`.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.out.queue(terminal::EnterAlternateScreen)?;
        self.out.queue(cursor::Hide)?;
        self.out.queue(terminal::DisableLineWrap)?;
        self.out.flush()?;
        Ok(())
    }

    /// Restore the terminal. Safe to call even if `enter` failed midway.
    pub fn exit(&mut self) -> Result<()> {
        self.out.queue(ResetColor)?;
        self.out.queue(SetAttribute(Attribute::Reset))?;
        self.out.queue(terminal::EnableLineWrap)?;
        self.out.queue(cursor::Show)?;
        self.out.queue(terminal::LeaveAlternateScreen)?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next `present` to redraw every cell (e.g. after a resize).
    pub fn invalidate(&mut self) {
        self.presented = None;
    }

    /// Present a frame, swapping it into internal state.
    ///
    /// The caller keeps one `FrameBuffer` and passes it in every frame; the
    /// renderer swaps it with the last presented frame so neither side ever
    /// clones cell data.
    pub fn present(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.out.queue(terminal::BeginSynchronizedUpdate)?;

        match self.presented.take() {
            Some(mut prev) if prev.width() == fb.width() && prev.height() == fb.height() => {
                self.draw_diff(fb, &prev)?;
                std::mem::swap(&mut prev, fb);
                self.presented = Some(prev);
            }
            stale => {
                debug!("full redraw at {}x{}", fb.width(), fb.height());
                self.draw_full(fb)?;
                let mut prev =
                    stale.unwrap_or_else(|| FrameBuffer::new(fb.width(), fb.height()));
                prev.resize(fb.width(), fb.height());
                std::mem::swap(&mut prev, fb);
                self.presented = Some(prev);
            }
        }

        self.out.queue(ResetColor)?;
        self.out.queue(SetAttribute(Attribute::Reset))?;
        self.out.queue(terminal::EndSynchronizedUpdate)?;
        self.out.flush()?;
        Ok(())
    }

    fn draw_full(&mut self, fb: &FrameBuffer) -> Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;

        let mut style: Option<CellStyle> = None;
        for y in 0..fb.height() {
            self.out.queue(cursor::MoveTo(0, y))?;
            for x in 0..fb.width() {
                let cell = fb.get(x, y).unwrap_or_default();
                if style != Some(cell.style) {
                    self.switch_style(cell.style)?;
                    style = Some(cell.style);
                }
                self.out.queue(Print(cell.ch))?;
            }
        }
        Ok(())
    }

    fn draw_diff(&mut self, next: &FrameBuffer, prev: &FrameBuffer) -> Result<()> {
        let mut style: Option<CellStyle> = None;
        for y in 0..next.height() {
            for (start, len) in dirty_spans(prev, next, y) {
                self.out.queue(cursor::MoveTo(start, y))?;
                for x in start..start + len {
                    let cell = next.get(x, y).unwrap_or_default();
                    if style != Some(cell.style) {
                        self.switch_style(cell.style)?;
                        style = Some(cell.style);
                    }
                    self.out.queue(Print(cell.ch))?;
                }
            }
        }
        Ok(())
    }

    fn switch_style(&mut self, style: CellStyle) -> Result<()> {
        self.out.queue(SetAttribute(Attribute::Reset))?;
        self.out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
        self.out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
        if style.bold {
            self.out.queue(SetAttribute(Attribute::Bold))?;
        }
        if style.dim {
            self.out.queue(SetAttribute(Attribute::Dim))?;
        }
        Ok(())
    }
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Runs of changed cells on row `y`, as `(start_x, len)` pairs.
///
/// Both buffers must have identical dimensions.
fn dirty_spans(prev: &FrameBuffer, next: &FrameBuffer, y: u16) -> Vec<(u16, u16)> {
    let w = next.width();
    let mut spans = Vec::new();
    let mut x = 0;
    while x < w {
        if prev.get(x, y) == next.get(x, y) {
            x += 1;
            continue;
        }
        let start = x;
        while x < w && prev.get(x, y) != next.get(x, y) {
            x += 1;
        }
        spans.push((start, x - start));
    }
    spans
}
