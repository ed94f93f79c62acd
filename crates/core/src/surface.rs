//! Surface: an immutable glyph+style grid.
//!
//! A `Surface` is the visual frame of a game object: a small 2D grid of
//! characters with one semantic style. Rows may have different lengths
//! (ragged grids are allowed); `width` is the longest row. Objects rebuild
//! their surface whole whenever their visual state changes rather than
//! patching cells in place.

use tui_starfire_types::{Point, StyleKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    rows: Vec<Vec<char>>,
    style: Option<StyleKind>,
    width: i32,
    height: i32,
}

impl Surface {
    /// Build a surface from string rows. Blank (space) cells carry no style.
    pub fn new(rows: &[&str], style: Option<StyleKind>) -> Self {
        Self::from_rows(rows.iter().map(|r| r.to_string()).collect(), style)
    }

    pub fn from_rows(rows: Vec<String>, style: Option<StyleKind>) -> Self {
        let rows: Vec<Vec<char>> = rows.iter().map(|r| r.chars().collect()).collect();
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0) as i32;
        let height = rows.len() as i32;
        Self {
            rows,
            style,
            width,
            height,
        }
    }

    /// Width in cells (length of the longest row).
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in cells (row count).
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn style(&self) -> Option<StyleKind> {
        self.style
    }

    /// Iterate every cell in row-major order as `(local, glyph, style)`.
    ///
    /// Each call returns a fresh iterator; the sequence is finite and can be
    /// walked any number of times. Blank cells are yielded with no style so
    /// callers can decide whether to skip them.
    pub fn cells(&self) -> impl Iterator<Item = (Point, char, Option<StyleKind>)> + '_ {
        let style = self.style;
        self.rows.iter().enumerate().flat_map(move |(y, row)| {
            row.iter().enumerate().map(move |(x, &glyph)| {
                let cell_style = if glyph == ' ' { None } else { style };
                (Point::new(x as i32, y as i32), glyph, cell_style)
            })
        })
    }
}
