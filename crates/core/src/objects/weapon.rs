//! Weapons: ammo bookkeeping, cooldown state machine, and the firing ring.

use arrayvec::ArrayVec;
use tui_starfire_types::PointF;

use crate::config::WeaponStats;
use crate::objects::charge::Charge;

/// Maximum weapons a ship can mount.
pub const MAX_WEAPONS: usize = 4;

/// Ammunition counter. `Infinite` never exhausts; the HUD renders it as a
/// large number but logic treats it as bottomless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ammo {
    Infinite,
    Count(u32),
}

impl Ammo {
    /// Number shown on the HUD.
    pub fn display(&self) -> u32 {
        match self {
            Ammo::Infinite => 999,
            Ammo::Count(n) => *n,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Ammo::Count(0))
    }
}

/// Result of a firing attempt.
///
/// Out-of-ammo is expected, frequent, and handled unconditionally by the
/// caller (switch weapon), so it is a result variant rather than an error.
#[derive(Debug)]
pub enum ShotOutcome {
    Fired(Charge),
    /// The cooldown timer is still running; a silent no-op, not a fault.
    CoolingDown,
    OutOfAmmo,
}

/// A mounted weapon.
///
/// State machine: `Ready ⇄ CoolingDown`. Firing transitions to cooling
/// down; the timer expiring per-tick transitions back to ready.
#[derive(Debug, Clone)]
pub struct Weapon {
    name: String,
    ammo: Ammo,
    max_ammo: u32,
    cooldown_ms: u32,
    cooldown_left_ms: f32,
    damage: i32,
    radius: u32,
    charge_dy: f32,
    charge_tag: &'static str,
}

impl Weapon {
    pub fn new(name: &str, stats: &WeaponStats, charge_tag: &'static str) -> Self {
        Self {
            name: name.to_string(),
            ammo: stats.ammo,
            max_ammo: stats.max_ammo,
            cooldown_ms: stats.cooldown,
            cooldown_left_ms: 0.0,
            damage: stats.damage,
            radius: stats.radius,
            charge_dy: stats.dy,
            charge_tag,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ammo(&self) -> Ammo {
        self.ammo
    }

    pub fn damage(&self) -> i32 {
        self.damage
    }

    pub fn ready(&self) -> bool {
        self.cooldown_left_ms <= 0.0
    }

    /// Decay the cooldown timer by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if self.cooldown_left_ms > 0.0 {
            self.cooldown_left_ms -= dt * 1000.0;
        }
    }

    /// Attempt to fire from `pos`.
    ///
    /// While cooling down this is a silent no-op. With ammunition exhausted
    /// (and not infinite) it reports `OutOfAmmo` and leaves the counter at
    /// zero. Otherwise it spawns a charge, decrements ammo, and starts the
    /// cooldown timer.
    pub fn make_shot(&mut self, pos: PointF) -> ShotOutcome {
        if !self.ready() {
            return ShotOutcome::CoolingDown;
        }
        match self.ammo {
            Ammo::Count(0) => return ShotOutcome::OutOfAmmo,
            Ammo::Count(n) => self.ammo = Ammo::Count(n - 1),
            Ammo::Infinite => {}
        }
        self.cooldown_left_ms = self.cooldown_ms as f32;
        ShotOutcome::Fired(Charge::new(
            self.charge_tag,
            pos,
            self.charge_dy,
            self.damage,
            self.radius,
        ))
    }

    /// Restore ammunition to maximum (pickup effect).
    pub fn refill(&mut self) {
        if let Ammo::Count(_) = self.ammo {
            self.ammo = Ammo::Count(self.max_ammo);
        }
    }

    /// Raise damage by half again (pickup effect).
    pub fn upgrade(&mut self) {
        self.damage += self.damage / 2 + 1;
    }
}

/// Cyclic weapon-selection ring: a fixed-size array with a current index
/// and modular next/prev.
#[derive(Debug, Clone)]
pub struct WeaponRing {
    slots: ArrayVec<Weapon, MAX_WEAPONS>,
    current: usize,
}

impl WeaponRing {
    pub fn new(first: Weapon) -> Self {
        let mut slots = ArrayVec::new();
        slots.push(first);
        Self { slots, current: 0 }
    }

    /// Mount another weapon. Returns false when the ring is full.
    pub fn push(&mut self, weapon: Weapon) -> bool {
        if self.slots.is_full() {
            return false;
        }
        self.slots.push(weapon);
        true
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn current(&self) -> &Weapon {
        &self.slots[self.current]
    }

    pub fn current_mut(&mut self) -> &mut Weapon {
        &mut self.slots[self.current]
    }

    pub fn next(&mut self) {
        self.current = (self.current + 1) % self.slots.len();
    }

    pub fn prev(&mut self) {
        self.current = (self.current + self.slots.len() - 1) % self.slots.len();
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Weapon> {
        self.slots.iter_mut()
    }
}
