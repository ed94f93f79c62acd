//! Charges: projectiles in flight.

use tui_starfire_types::{Point, PointF, StyleKind};

use crate::collision::ColliderId;
use crate::surface::Surface;

/// A projectile spawned by a weapon.
///
/// Charges travel vertically at a fixed speed; they are destroyed on hit or
/// pulled down by the renderer's border cull once they leave the playfield.
#[derive(Debug, Clone)]
pub struct Charge {
    tag: &'static str,
    pos: PointF,
    vy: f32,
    damage: i32,
    rows: Vec<String>,
    surface: Surface,
    pub(crate) collider: Option<ColliderId>,
    pub(crate) destroyed: bool,
}

impl Charge {
    /// `radius` widens the charge: 0 is a single cell, r gives `2r + 1`
    /// cells across.
    pub fn new(tag: &'static str, pos: PointF, vy: f32, damage: i32, radius: u32) -> Self {
        let glyph = if vy < 0.0 { '|' } else { '!' };
        let row = if radius == 0 {
            glyph.to_string()
        } else {
            let body: String = std::iter::repeat(glyph)
                .take(2 * radius as usize + 1)
                .collect();
            body
        };
        let rows = vec![row];
        let surface = Surface::from_rows(rows.clone(), Some(StyleKind::Charge));
        Self {
            tag,
            pos,
            vy,
            damage,
            rows,
            surface,
            collider: None,
            destroyed: false,
        }
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn damage(&self) -> i32 {
        self.damage
    }

    pub fn position(&self) -> PointF {
        self.pos
    }

    pub fn anchor(&self) -> Point {
        self.pos.to_cell()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Bitmap rows for collider construction (same footprint as the
    /// surface).
    pub fn bitmap(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.as_str()).collect()
    }

    pub fn update(&mut self, dt: f32) {
        self.pos.y += self.vy * dt;
    }
}
