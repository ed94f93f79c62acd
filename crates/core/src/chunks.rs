//! Background chunk files and the scrolling starfield backdrop.
//!
//! Chunk file format: a line starting with the literal marker `~chunk~`
//! followed by a name opens a new named chunk; subsequent non-blank lines
//! append verbatim (truncated to a width cap) until the next marker or end
//! of file. Blank lines are skipped. Duplicate names, a nameless marker,
//! and zero-chunk files are all rejected outright; the loader performs no
//! partial recovery.

use thiserror::Error;
use tui_starfire_types::{StyleKind, FIELD_HEIGHT, FIELD_WIDTH};

use crate::surface::Surface;

/// Chunk marker literal.
const MARKER: &str = "~chunk~";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub name: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChunkError {
    #[error("duplicate chunk name '{0}'")]
    DuplicateName(String),
    #[error("chunk marker without a name at line {0}")]
    MissingName(usize),
    #[error("chunk file contains no chunks")]
    Empty,
}

/// Parse a chunk file, truncating content lines to `max_width` characters.
pub fn parse_chunks(text: &str, max_width: usize) -> Result<Vec<Chunk>, ChunkError> {
    let mut chunks: Vec<Chunk> = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim_end();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix(MARKER) {
            let name = rest.trim();
            if name.is_empty() {
                return Err(ChunkError::MissingName(idx + 1));
            }
            if chunks.iter().any(|c| c.name == name) {
                return Err(ChunkError::DuplicateName(name.to_string()));
            }
            chunks.push(Chunk {
                name: name.to_string(),
                lines: Vec::new(),
            });
        } else if let Some(current) = chunks.last_mut() {
            current.lines.push(line.chars().take(max_width).collect());
        }
        // Content before the first marker is ignored, matching the loader's
        // "current chunk" model.
    }

    if chunks.is_empty() {
        return Err(ChunkError::Empty);
    }
    Ok(chunks)
}

/// Scrolling starfield backdrop assembled from loaded chunks.
///
/// The backdrop cycles its line ring downward at a fixed rate and rebuilds
/// its surface each step (value-semantics redraw). It never collides and is
/// drawn across the whole playfield including the border line.
#[derive(Debug, Clone)]
pub struct Background {
    lines: Vec<String>,
    offset: usize,
    scroll_acc: f32,
    /// Scroll speed in rows per second.
    speed: f32,
    surface: Surface,
}

impl Background {
    pub fn new(chunks: &[Chunk], speed: f32) -> Self {
        let mut lines: Vec<String> = chunks.iter().flat_map(|c| c.lines.clone()).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        let mut bg = Self {
            lines,
            offset: 0,
            scroll_acc: 0.0,
            speed,
            surface: Surface::new(&[], Some(StyleKind::Background)),
        };
        bg.rebuild();
        bg
    }

    fn rebuild(&mut self) {
        let n = self.lines.len();
        let rows: Vec<String> = (0..FIELD_HEIGHT as usize)
            .map(|row| self.lines[(self.offset + row) % n].clone())
            .collect();
        self.surface = Surface::from_rows(rows, Some(StyleKind::Background));
    }

    pub fn update(&mut self, dt: f32) {
        self.scroll_acc += self.speed * dt;
        let mut stepped = false;
        while self.scroll_acc >= 1.0 {
            self.scroll_acc -= 1.0;
            self.offset = (self.offset + self.lines.len() - 1) % self.lines.len();
            stepped = true;
        }
        if stepped {
            self.rebuild();
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }
}

/// A built-in starfield used when no chunk file is supplied.
pub fn default_starfield() -> Vec<Chunk> {
    let width = FIELD_WIDTH as usize;
    let mut lines = Vec::new();
    // Sparse deterministic star pattern.
    for row in 0..16usize {
        let mut line = " ".repeat(width);
        let col = (row * 37 + 11) % width;
        line.replace_range(col..col + 1, if row % 3 == 0 { "*" } else { "." });
        lines.push(line);
    }
    vec![Chunk {
        name: "starfield".to_string(),
        lines,
    }]
}
