//! Palette: semantic style names mapped to concrete cell styles.
//!
//! This is the single place where the simulation's semantic categories pick
//! up colors; nothing else in the codebase hardcodes an entity color.

use tui_starfire_types::StyleKind;

use crate::fb::{CellStyle, Rgb};

pub fn style_for(kind: StyleKind) -> CellStyle {
    match kind {
        StyleKind::Ship => CellStyle::fg(Rgb::new(120, 220, 255)).bold(),
        StyleKind::Enemy => CellStyle::fg(Rgb::new(255, 110, 100)),
        StyleKind::Charge => CellStyle::fg(Rgb::new(255, 240, 120)),
        StyleKind::Pickup => CellStyle::fg(Rgb::new(140, 255, 140)).bold(),
        StyleKind::Ui => CellStyle::fg(Rgb::new(210, 210, 220)),
        StyleKind::UiCritical => CellStyle::fg(Rgb::new(255, 80, 80)).bold(),
        StyleKind::Background => CellStyle::fg(Rgb::new(70, 70, 110)).dim(),
    }
}
