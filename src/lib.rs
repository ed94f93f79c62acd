//! Starfire (workspace facade crate).
//!
//! The binary and integration tests consume `tui_starfire::{core,input,term,types}`;
//! the implementation lives in dedicated crates under `crates/`.

pub use tui_starfire_core as core;
pub use tui_starfire_input as input;
pub use tui_starfire_term as term;
pub use tui_starfire_types as types;
