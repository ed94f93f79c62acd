//! Shared types module - geometry, playfield constants, actions, styles
//!
//! This module defines the fundamental types used throughout the game.
//! All types are pure data structures with no external dependencies, making
//! them usable in any context (simulation core, input mapping, terminal
//! rendering).
//!
//! # Playfield Dimensions
//!
//! The playfield is a fixed-size cell grid; every simulated position is a
//! cell coordinate inside it (sub-cell motion uses `PointF` and rounds at
//! render time):
//!
//! - **Width**: 78 columns (indexed 0-77)
//! - **Height**: 24 rows (indexed 0-23), row 0 at the top
//! - Enemies enter at the top border and travel toward the bottom border.
//!
//! # Game Timing
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `SHIELD_REGEN_PER_SEC` | 2.0 | Shield points restored per second |

/// Playfield width in cells (78 columns)
pub const FIELD_WIDTH: i32 = 78;

/// Playfield height in cells (24 rows)
pub const FIELD_HEIGHT: i32 = 24;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Shield points regenerated per second while a ship is alive
pub const SHIELD_REGEN_PER_SEC: f32 = 2.0;

/// Integer cell position on the playfield.
///
/// A pure value type; translation returns a new point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Vector add: `self + (dx, dy)`.
    pub const fn translate(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Float position for sub-cell motion and animation interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

impl PointF {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Round to the nearest playfield cell.
    pub fn to_cell(self) -> Point {
        Point::new(self.x.round() as i32, self.y.round() as i32)
    }
}

impl std::ops::Add for PointF {
    type Output = PointF;

    fn add(self, rhs: PointF) -> PointF {
        PointF::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl From<Point> for PointF {
    fn from(p: Point) -> Self {
        PointF::new(p.x as f32, p.y as f32)
    }
}

/// Axis-aligned rectangle in cell coordinates.
///
/// `w`/`h` are extents; a rect with zero width or height contains nothing
/// and intersects nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.w > 0
            && self.h > 0
            && other.w > 0
            && other.h > 0
            && self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

/// Semantic style categories for rendered cells.
///
/// The simulation tags cells with a semantic name; the terminal layer owns
/// the mapping from each name to a concrete color/attribute. Only this
/// mapping matters, not any particular palette numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKind {
    /// Player ship hull
    Ship,
    /// Enemy ships
    Enemy,
    /// Projectiles in flight
    Charge,
    /// Droppable pickups
    Pickup,
    /// HUD text and bars
    Ui,
    /// HUD elements signalling danger (low hull)
    UiCritical,
    /// Scrolling starfield backdrop
    Background,
}

impl StyleKind {
    /// Convert to lowercase string representation (for logs and config keys)
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleKind::Ship => "ship",
            StyleKind::Enemy => "enemy",
            StyleKind::Charge => "charge",
            StyleKind::Pickup => "pickup",
            StyleKind::Ui => "ui",
            StyleKind::UiCritical => "ui_critical",
            StyleKind::Background => "background",
        }
    }
}

/// Game actions that can be applied to the simulation.
///
/// Each action maps to a specific mechanic on the current actor (the player
/// ship, except for `Pause`/`Restart` which act on the whole state).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move the player ship one step left
    MoveLeft,
    /// Move the player ship one step right
    MoveRight,
    /// Move the player ship one step up
    MoveUp,
    /// Move the player ship one step down
    MoveDown,
    /// Start firing the current weapon
    FireStart,
    /// Stop firing
    FireStop,
    /// Cycle to the next weapon in the ring
    NextWeapon,
    /// Cycle to the previous weapon in the ring
    PrevWeapon,
    /// Toggle pause state
    Pause,
    /// Restart after game over (or at any time)
    Restart,
}

impl GameAction {
    /// Parse action from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_starfire_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("firestart"), Some(GameAction::FireStart));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "moveup" => Some(GameAction::MoveUp),
            "movedown" => Some(GameAction::MoveDown),
            "firestart" => Some(GameAction::FireStart),
            "firestop" => Some(GameAction::FireStop),
            "nextweapon" => Some(GameAction::NextWeapon),
            "prevweapon" => Some(GameAction::PrevWeapon),
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::MoveUp => "moveUp",
            GameAction::MoveDown => "moveDown",
            GameAction::FireStart => "fireStart",
            GameAction::FireStop => "fireStop",
            GameAction::NextWeapon => "nextWeapon",
            GameAction::PrevWeapon => "prevWeapon",
            GameAction::Pause => "pause",
            GameAction::Restart => "restart",
        }
    }
}
