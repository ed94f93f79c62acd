//! Input crate: terminal key events mapped to game actions.

mod handler;
mod map;

pub use handler::{InputHandler, MAX_TICK_ACTIONS};
pub use map::{handle_key_event, should_quit};

use tui_starfire_types as types;
