//! Game object hierarchy: ships, weapons, charges, and pickups.
//!
//! Objects are a tagged union (`GameObject`) stored in the game state's
//! arena. Compound renderables (objects drawing child surfaces) declare the
//! capability explicitly via `is_compound()`/`children()` rather than by
//! probing.

pub mod charge;
pub mod pickup;
pub mod ship;
pub mod weapon;

pub use charge::Charge;
pub use pickup::{from_droptable, Pickup, PickupEffect, TAG_PICKUP};
pub use ship::{DamageOutcome, Ship, ShipKind, TAG_ENEMY, TAG_SHIP};
pub use weapon::{Ammo, ShotOutcome, Weapon, WeaponRing, MAX_WEAPONS};

use tui_starfire_types::Point;

use crate::collision::ColliderId;
use crate::surface::Surface;

/// Collider type tag for player charges.
pub const TAG_CHARGE: &str = "charge";
/// Collider type tag for enemy charges.
pub const TAG_ENEMY_CHARGE: &str = "enemy_charge";

/// Tagged union over every simulated entity.
#[derive(Debug, Clone)]
pub enum GameObject {
    Ship(Ship),
    Charge(Charge),
    Pickup(Pickup),
}

impl GameObject {
    pub fn anchor(&self) -> Point {
        match self {
            GameObject::Ship(s) => s.anchor(),
            GameObject::Charge(c) => c.anchor(),
            GameObject::Pickup(p) => p.anchor(),
        }
    }

    pub fn surface(&self) -> &Surface {
        match self {
            GameObject::Ship(s) => s.surface(),
            GameObject::Charge(c) => c.surface(),
            GameObject::Pickup(p) => p.surface(),
        }
    }

    pub fn destroyed(&self) -> bool {
        match self {
            GameObject::Ship(s) => s.destroyed,
            GameObject::Charge(c) => c.destroyed,
            GameObject::Pickup(p) => p.destroyed,
        }
    }

    pub(crate) fn set_destroyed(&mut self) {
        match self {
            GameObject::Ship(s) => s.destroyed = true,
            GameObject::Charge(c) => c.destroyed = true,
            GameObject::Pickup(p) => p.destroyed = true,
        }
    }

    pub fn collider(&self) -> Option<ColliderId> {
        match self {
            GameObject::Ship(s) => s.collider,
            GameObject::Charge(c) => c.collider,
            GameObject::Pickup(p) => p.collider,
        }
    }

    pub(crate) fn set_collider(&mut self, id: Option<ColliderId>) {
        match self {
            GameObject::Ship(s) => s.collider = id,
            GameObject::Charge(c) => c.collider = id,
            GameObject::Pickup(p) => p.collider = id,
        }
    }

    /// Explicit compound-renderable capability.
    pub fn is_compound(&self) -> bool {
        match self {
            GameObject::Ship(s) => s.is_compound(),
            _ => false,
        }
    }

    /// Child surfaces as (offset-from-anchor, surface) pairs; empty unless
    /// `is_compound()`.
    pub fn children(&self) -> Vec<(Point, &Surface)> {
        match self {
            GameObject::Ship(s) => s.children(),
            _ => Vec::new(),
        }
    }
}
