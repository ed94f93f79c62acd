//! Held-key tracking: turns press/release/repeat events into per-tick
//! continuous actions.
//!
//! Terminals without the enhanced keyboard protocol never deliver release
//! events, so every held key carries a grace timer refreshed by terminal
//! auto-repeat; when the timer lapses the key is treated as released. Ships
//! keep moving (and firing) for as long as the key is actually held either
//! way.

use arrayvec::ArrayVec;
use crossterm::event::KeyCode;

use crate::map::handle_key_event;
use crate::types::GameAction;
use crossterm::event::KeyEvent;

/// Upper bound on actions synthesized in one tick.
pub const MAX_TICK_ACTIONS: usize = 8;

/// Hold grace in milliseconds; auto-repeat refreshes it.
const HOLD_GRACE_MS: i32 = 550;

#[derive(Debug, Clone, Copy)]
struct Held {
    action: GameAction,
    timer_ms: i32,
}

#[derive(Debug, Default)]
pub struct InputHandler {
    held: ArrayVec<Held, MAX_TICK_ACTIONS>,
    firing: bool,
    fire_timer_ms: i32,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn firing(&self) -> bool {
        self.firing
    }

    fn is_movement(action: GameAction) -> bool {
        matches!(
            action,
            GameAction::MoveLeft
                | GameAction::MoveRight
                | GameAction::MoveUp
                | GameAction::MoveDown
        )
    }

    /// Process a key press (or terminal auto-repeat).
    ///
    /// Returns the action to apply immediately this tick, if any. Movement
    /// and firing additionally latch into the held set.
    pub fn handle_key_press(&mut self, key: KeyEvent) -> Option<GameAction> {
        let action = handle_key_event(key)?;
        if Self::is_movement(action) {
            match self.held.iter_mut().find(|h| h.action == action) {
                Some(h) => {
                    h.timer_ms = HOLD_GRACE_MS;
                    return None; // repeat refresh, movement already flows
                }
                None => {
                    let _ = self.held.try_push(Held {
                        action,
                        timer_ms: HOLD_GRACE_MS,
                    });
                    return Some(action);
                }
            }
        }
        if action == GameAction::FireStart {
            self.fire_timer_ms = HOLD_GRACE_MS;
            if self.firing {
                return None;
            }
            self.firing = true;
            return Some(GameAction::FireStart);
        }
        Some(action)
    }

    /// Process a key release (enhanced-protocol terminals only).
    pub fn handle_key_release(&mut self, code: KeyCode) -> Option<GameAction> {
        if code == KeyCode::Char(' ') {
            if self.firing {
                self.firing = false;
                return Some(GameAction::FireStop);
            }
            return None;
        }
        let released = handle_key_event(KeyEvent::from(code))?;
        self.held.retain(|h| h.action != released);
        None
    }

    /// Advance one tick: emit held movement, expire lapsed holds.
    pub fn update(&mut self, tick_ms: u32) -> ArrayVec<GameAction, MAX_TICK_ACTIONS> {
        let mut actions = ArrayVec::new();

        for h in self.held.iter_mut() {
            h.timer_ms -= tick_ms as i32;
        }
        for h in self.held.iter() {
            if h.timer_ms > 0 {
                let _ = actions.try_push(h.action);
            }
        }
        self.held.retain(|h| h.timer_ms > 0);

        if self.firing {
            self.fire_timer_ms -= tick_ms as i32;
            if self.fire_timer_ms <= 0 {
                self.firing = false;
                let _ = actions.try_push(GameAction::FireStop);
            }
        }
        actions
    }
}
