//! Frame composition: merges the simulation's renderables into one
//! framebuffer.
//!
//! This module is pure (no I/O) and unit-testable. Composition walks every
//! render item back to front, translates surface cells by the item's anchor,
//! and clips against the playfield border. An object with cells beyond the
//! border is reported back to the caller instead of drawn there; this is
//! the pull-based cleanup path for projectiles that out-ran their own logic.
//! Items flagged `draw_on_border` (backdrop, HUD bars) are exempt from the
//! cull.

use tui_starfire_core::{Ammo, ObjectId, State};
use tui_starfire_types::{StyleKind, FIELD_HEIGHT, FIELD_WIDTH};

use crate::fb::{CellStyle, FrameBuffer};
use crate::palette::style_for;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Compose one frame.
///
/// Returns the framebuffer plus the ids of objects whose cells left the
/// playfield; the caller feeds those to `State::remove_obsolete`.
pub fn compose_frame(state: &State, viewport: Viewport) -> (FrameBuffer, Vec<ObjectId>) {
    let mut fb = FrameBuffer::new(viewport.width, viewport.height);
    fb.clear(CellStyle::default().into_cell(' '));

    let frame_w = FIELD_WIDTH as u16 + 2;
    let frame_h = FIELD_HEIGHT as u16 + 2;
    let start_x = viewport.width.saturating_sub(frame_w) / 2;
    let start_y = viewport.height.saturating_sub(frame_h) / 2;

    draw_border(&mut fb, start_x, start_y, frame_w, frame_h);

    let mut obsolete: Vec<ObjectId> = Vec::new();
    for item in state.render_items() {
        let mut out_of_field = false;
        for (local, glyph, style) in item.surface.cells() {
            if glyph == ' ' {
                continue;
            }
            let global = item.anchor + local;
            let inside = global.x >= 0
                && global.x < FIELD_WIDTH
                && global.y >= 0
                && global.y < FIELD_HEIGHT;
            if !inside {
                out_of_field = true;
                continue;
            }
            let style = style.map(style_for).unwrap_or_default();
            fb.put_char(
                start_x + 1 + global.x as u16,
                start_y + 1 + global.y as u16,
                glyph,
                style,
            );
        }
        if out_of_field && !item.draw_on_border {
            if let Some(owner) = item.owner {
                if !obsolete.contains(&owner) {
                    obsolete.push(owner);
                }
            }
        }
    }

    draw_hud(&mut fb, state, start_x, start_y, frame_w, frame_h);
    (fb, obsolete)
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16) {
    let style = style_for(StyleKind::Ui);
    for dx in 0..w {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 0..h {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);
}

/// HUD bars live on the frame edge itself (`draw_on_border` territory).
fn draw_hud(fb: &mut FrameBuffer, state: &State, x: u16, y: u16, w: u16, h: u16) {
    let ui = style_for(StyleKind::Ui);
    let critical = style_for(StyleKind::UiCritical);

    let score = format!(" SCORE {:06} ", state.score());
    fb.put_str(x + 2, y, &score, ui);

    if let Some(player) = state.player() {
        let hull_style = if player.hull() * 4 <= player.max_hull() {
            critical
        } else {
            ui
        };
        let hull = format!(
            " HULL {:>3}/{:<3} ",
            player.hull(),
            player.max_hull()
        );
        fb.put_str(x + 2, y + h - 1, &hull, hull_style);

        let shield = format!(" SHD {:>3}/{:<3} ", player.shield(), player.max_shield());
        fb.put_str(x + 18, y + h - 1, &shield, ui);

        let weapon = player.weapons().current();
        let ammo = match weapon.ammo() {
            Ammo::Infinite => format!(" {} ∞ ", weapon.name()),
            Ammo::Count(n) => format!(" {} {:>3} ", weapon.name(), n),
        };
        fb.put_str(x + 34, y + h - 1, &ammo, ui);
    }

    if state.game_over() {
        banner(fb, x, y, w, h, " GAME OVER - r to restart, q to quit ", critical);
    } else if state.paused() {
        banner(fb, x, y, w, h, " PAUSED ", ui);
    }
}

fn banner(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, text: &str, style: CellStyle) {
    let tx = x + w.saturating_sub(text.chars().count() as u16) / 2;
    let ty = y + h / 2;
    fb.put_str(tx, ty, text, style.bold());
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_starfire_core::Config;

    fn viewport() -> Viewport {
        Viewport::new(FIELD_WIDTH as u16 + 4, FIELD_HEIGHT as u16 + 4)
    }

    fn started_state() -> State {
        let mut state = State::new(7, Config::default());
        state.start();
        state
    }

    #[test]
    fn player_glyphs_land_inside_the_border() {
        let state = started_state();
        let (fb, obsolete) = compose_frame(&state, viewport());
        assert!(obsolete.is_empty());

        let mut hull_cells = 0;
        for y in 0..fb.height() {
            for x in 0..fb.width() {
                let ch = fb.get(x, y).unwrap().ch;
                if ch == '^' || ch == '/' || ch == '\\' || ch == '-' {
                    hull_cells += 1;
                }
            }
        }
        assert!(hull_cells >= 4, "expected player art, found {hull_cells} cells");
    }

    #[test]
    fn hud_shows_score_on_the_border() {
        let state = started_state();
        let (fb, _) = compose_frame(&state, viewport());
        let top_row: String = (0..fb.width())
            .map(|x| fb.get(x, 1).unwrap().ch)
            .collect();
        assert!(top_row.contains("SCORE"), "top border was: {top_row}");
    }

    #[test]
    fn offscreen_objects_are_reported_not_drawn() {
        let mut state = started_state();
        // Let the player fire; then walk the charge off the top edge.
        state.apply_action(tui_starfire_types::GameAction::FireStart);
        for _ in 0..400 {
            state.tick(tui_starfire_types::TICK_MS);
            let (_, obsolete) = compose_frame(&state, viewport());
            for id in obsolete {
                state.remove_obsolete(id);
            }
        }
        // Every culled charge has been destroyed and purged; those left all
        // sit inside the field.
        let (_, obsolete) = compose_frame(&state, viewport());
        assert!(obsolete.is_empty());
    }
}
