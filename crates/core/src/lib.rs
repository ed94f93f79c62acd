//! Simulation core for the terminal space shooter.
//!
//! Everything in this crate is pure state advanced by explicit `update`/`tick`
//! calls; no terminal I/O happens here. The frame contract is:
//! actions → object updates → scheduled spawns → collision detection →
//! contact dispatch → purge of destroyed objects, in that order, so the
//! renderer never sees a dangling entry.

pub mod animation;
pub mod chunks;
pub mod collision;
pub mod config;
pub mod objects;
pub mod rng;
pub mod schedule;
pub mod scoreboard;
pub mod state;
pub mod surface;

pub use animation::{Animation, AnimationError, AnimationManager, Frame, KeyValue, Keyframe};
pub use chunks::{parse_chunks, Background, Chunk, ChunkError};
pub use collision::{Collider, ColliderError, ColliderId, CollisionManager, Contact, HandlerId, TypePair};
pub use config::{Config, ConfigError, ShipStats, WeaponStats};
pub use chunks::default_starfield;
pub use objects::{
    from_droptable, Ammo, Charge, DamageOutcome, GameObject, Pickup, PickupEffect, Ship, ShipKind,
    ShotOutcome, Weapon, WeaponRing, TAG_CHARGE, TAG_ENEMY, TAG_ENEMY_CHARGE, TAG_PICKUP, TAG_SHIP,
};
pub use rng::SimpleRng;
pub use schedule::Scheduler;
pub use scoreboard::{Scoreboard, ScoreboardError};
pub use state::{ObjectId, RenderItem, State, WaveEvent};
pub use surface::Surface;
