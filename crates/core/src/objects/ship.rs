//! Ships: the player vessel and the enemy hull types.

use log::debug;
use tui_starfire_types::{Point, PointF, StyleKind, FIELD_HEIGHT, FIELD_WIDTH, SHIELD_REGEN_PER_SEC};

use crate::animation::{Animation, AnimationManager, KeyValue, Keyframe};
use crate::collision::ColliderId;
use crate::config::ShipStats;
use crate::objects::charge::Charge;
use crate::objects::weapon::{ShotOutcome, Weapon, WeaponRing};
use crate::surface::Surface;

/// Collider type tag for the player ship.
pub const TAG_SHIP: &str = "ship";
/// Collider type tag for enemy ships.
pub const TAG_ENEMY: &str = "enemy";

/// Exhaust flicker frames, cycled by a looping animation.
const EXHAUST_FRAMES: [&str; 2] = [" ' ", " . "];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShipKind {
    Player,
    /// Fast, fragile diver.
    Raider,
    /// Slow, armored hull.
    Cruiser,
}

impl ShipKind {
    pub fn is_enemy(&self) -> bool {
        !matches!(self, ShipKind::Player)
    }

    pub fn tag(&self) -> &'static str {
        match self {
            ShipKind::Player => TAG_SHIP,
            _ => TAG_ENEMY,
        }
    }

    /// Key into the stats config table.
    pub fn config_name(&self) -> &'static str {
        match self {
            ShipKind::Player => "player",
            ShipKind::Raider => "raider",
            ShipKind::Cruiser => "cruiser",
        }
    }

    /// Points awarded when destroyed by the player.
    pub fn score_value(&self) -> u32 {
        match self {
            ShipKind::Player => 0,
            ShipKind::Raider => 30,
            ShipKind::Cruiser => 100,
        }
    }

    pub fn art(&self) -> &'static [&'static str] {
        match self {
            ShipKind::Player => &[" ^ ", "/-\\"],
            ShipKind::Raider => &["\\o/"],
            ShipKind::Cruiser => &["[===]", " \\_/ "],
        }
    }

    fn style(&self) -> StyleKind {
        match self {
            ShipKind::Player => StyleKind::Ship,
            _ => StyleKind::Enemy,
        }
    }
}

/// Result of applying damage to a ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    Absorbed,
    /// Hull reached zero on this hit.
    Destroyed,
}

#[derive(Debug, Clone)]
pub struct Ship {
    kind: ShipKind,
    pos: PointF,
    /// Horizontal / vertical speed, cells per second (from stats).
    dx: f32,
    dy: f32,
    /// Player steering for the current tick; consumed by `update`.
    steer: Point,
    hull: i32,
    max_hull: i32,
    shield: i32,
    max_shield: i32,
    regen_acc: f32,
    weapons: WeaponRing,
    firing: bool,
    surface: Surface,
    /// Engine exhaust drawn below the player hull (compound child).
    exhaust: Option<Surface>,
    animations: AnimationManager,
    pub(crate) collider: Option<ColliderId>,
    pub(crate) destroyed: bool,
}

impl Ship {
    pub fn new(kind: ShipKind, pos: PointF, stats: &ShipStats, weapons: WeaponRing) -> Self {
        let surface = Surface::new(kind.art(), Some(kind.style()));
        let exhaust = match kind {
            ShipKind::Player => Some(Surface::new(&[EXHAUST_FRAMES[0]], Some(StyleKind::Charge))),
            _ => None,
        };
        let mut animations = AnimationManager::default();
        if kind == ShipKind::Player {
            if let Ok(anim) = Animation::new(
                "exhaust",
                vec![
                    Keyframe::new(0.0, KeyValue::Int(0)),
                    Keyframe::new(0.12, KeyValue::Int(1)),
                ],
                false,
                true,
            ) {
                animations.add(anim);
            }
        }
        Self {
            kind,
            pos,
            dx: stats.dx,
            dy: stats.dy,
            steer: Point::default(),
            hull: stats.hull,
            max_hull: stats.max_hull,
            shield: stats.shield,
            max_shield: stats.max_shield,
            regen_acc: 0.0,
            weapons,
            firing: false,
            surface,
            exhaust,
            animations,
            collider: None,
            destroyed: false,
        }
    }

    pub fn kind(&self) -> ShipKind {
        self.kind
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

    /// Bitmap rows for collider construction.
    pub fn bitmap(&self) -> &'static [&'static str] {
        self.kind.art()
    }

    pub fn hull(&self) -> i32 {
        self.hull
    }

    pub fn max_hull(&self) -> i32 {
        self.max_hull
    }

    pub fn shield(&self) -> i32 {
        self.shield
    }

    pub fn max_shield(&self) -> i32 {
        self.max_shield
    }

    pub fn weapons(&self) -> &WeaponRing {
        &self.weapons
    }

    pub fn weapons_mut(&mut self) -> &mut WeaponRing {
        &mut self.weapons
    }

    pub fn set_firing(&mut self, firing: bool) {
        self.firing = firing;
    }

    pub fn firing(&self) -> bool {
        self.firing
    }

    /// Queue one tick of player steering (direction components in -1..=1).
    pub fn steer(&mut self, dx: i32, dy: i32) {
        self.steer.x += dx;
        self.steer.y += dy;
    }

    /// Repair the hull to maximum (pickup effect).
    pub fn repair_hull(&mut self) {
        self.hull = self.max_hull;
    }

    /// The player renders with an exhaust child below the hull.
    pub fn is_compound(&self) -> bool {
        self.exhaust.is_some()
    }

    /// Child renderables as (offset-from-anchor, surface) pairs.
    pub fn children(&self) -> Vec<(Point, &Surface)> {
        match &self.exhaust {
            Some(s) => vec![(Point::new(0, self.surface.height()), s)],
            None => Vec::new(),
        }
    }

    /// Advance one tick: integrate position, regenerate shield, run weapon
    /// cooldowns, and fire while the trigger is held. Spawned charges are
    /// pushed into `out`.
    ///
    /// Border policy differs by side: the player is clamped inside the
    /// playfield; an enemy crossing the far (bottom) border self-destroys.
    pub fn update(&mut self, dt: f32, out: &mut Vec<Charge>) {
        if self.destroyed {
            return;
        }

        if self.kind.is_enemy() {
            self.pos.y += self.dy * dt;
            if self.pos.y as i32 > FIELD_HEIGHT {
                debug!("{:?} left the playfield, scuttling", self.kind);
                self.destroyed = true;
                return;
            }
        } else {
            self.pos.x += self.steer.x as f32 * self.dx * dt;
            self.pos.y += self.steer.y as f32 * self.dy * dt;
            self.steer = Point::default();
            let max_x = (FIELD_WIDTH - self.surface.width()) as f32;
            let max_y = (FIELD_HEIGHT - self.surface.height()) as f32;
            self.pos.x = self.pos.x.clamp(0.0, max_x);
            self.pos.y = self.pos.y.clamp(0.0, max_y);
        }

        if self.max_shield > 0 && self.shield < self.max_shield {
            self.regen_acc += SHIELD_REGEN_PER_SEC * dt;
            while self.regen_acc >= 1.0 {
                self.shield = (self.shield + 1).min(self.max_shield);
                self.regen_acc -= 1.0;
            }
        }

        match self.animations.update(dt) {
            Ok(Some(KeyValue::Int(frame))) => {
                if let Some(exhaust) = self.exhaust.as_mut() {
                    let row = EXHAUST_FRAMES[frame as usize % EXHAUST_FRAMES.len()];
                    *exhaust = Surface::new(&[row], Some(StyleKind::Charge));
                }
            }
            Ok(_) => {}
            Err(err) => debug!("exhaust animation fault: {err}"),
        }

        for weapon in self.weapons.iter_mut() {
            weapon.update(dt);
        }

        if self.firing {
            let muzzle = self.muzzle();
            match self.weapons.current_mut().make_shot(muzzle) {
                ShotOutcome::Fired(charge) => out.push(charge),
                ShotOutcome::CoolingDown => {}
                ShotOutcome::OutOfAmmo => {
                    debug!(
                        "weapon '{}' exhausted, switching",
                        self.weapons.current().name()
                    );
                    self.weapons.next();
                }
            }
        }
    }

    fn muzzle(&self) -> PointF {
        let center_x = self.pos.x + (self.surface.width() / 2) as f32;
        if self.kind.is_enemy() {
            PointF::new(center_x, self.pos.y + self.surface.height() as f32)
        } else {
            PointF::new(center_x, self.pos.y - 1.0)
        }
    }

    /// Apply damage: shield absorbs first, the excess carries into hull,
    /// both clamped to `[0, max]`. Hull reaching zero marks the ship
    /// destroyed.
    pub fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        if self.destroyed || amount <= 0 {
            return DamageOutcome::Absorbed;
        }
        let absorbed = amount.min(self.shield);
        self.shield -= absorbed;
        let excess = amount - absorbed;
        self.hull = (self.hull - excess).max(0);
        if self.hull == 0 {
            self.destroyed = true;
            DamageOutcome::Destroyed
        } else {
            DamageOutcome::Absorbed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::objects::weapon::Ammo;

    fn player() -> Ship {
        let cfg = Config::default();
        let ring = WeaponRing::new(Weapon::new(
            "blaster",
            cfg.weapon("blaster").unwrap(),
            "charge",
        ));
        Ship::new(
            ShipKind::Player,
            PointF::new(30.0, 20.0),
            cfg.ship("player").unwrap(),
            ring,
        )
    }

    fn raider(y: f32) -> Ship {
        let cfg = Config::default();
        let ring = WeaponRing::new(Weapon::new(
            "enemy_bolt",
            cfg.weapon("enemy_bolt").unwrap(),
            "enemy_charge",
        ));
        Ship::new(
            ShipKind::Raider,
            PointF::new(10.0, y),
            cfg.ship("raider").unwrap(),
            ring,
        )
    }

    #[test]
    fn shield_absorbs_before_hull() {
        let mut ship = player();
        let (hull0, shield0) = (ship.hull(), ship.shield());
        assert_eq!(ship.take_damage(5), DamageOutcome::Absorbed);
        assert_eq!(ship.shield(), shield0 - 5);
        assert_eq!(ship.hull(), hull0);
    }

    #[test]
    fn excess_damage_carries_into_hull_and_clamps() {
        let mut ship = player();
        let hull0 = ship.hull();
        let shield0 = ship.shield();
        assert_eq!(ship.take_damage(shield0 + 7), DamageOutcome::Absorbed);
        assert_eq!(ship.shield(), 0);
        assert_eq!(ship.hull(), hull0 - 7);

        // Overkill clamps at zero and reports destruction.
        assert_eq!(ship.take_damage(10_000), DamageOutcome::Destroyed);
        assert_eq!(ship.hull(), 0);
    }

    #[test]
    fn player_clamps_at_playfield_borders() {
        let mut ship = player();
        let mut out = Vec::new();
        for _ in 0..1000 {
            ship.steer(-1, 0);
            ship.update(0.016, &mut out);
        }
        assert_eq!(ship.position().x, 0.0);
        assert!(!ship.destroyed);
    }

    #[test]
    fn enemy_self_destroys_past_the_far_border() {
        let mut ship = raider(FIELD_HEIGHT as f32 - 0.5);
        let mut out = Vec::new();
        for _ in 0..200 {
            ship.update(0.016, &mut out);
        }
        assert!(ship.destroyed);
    }

    #[test]
    fn shield_regenerates_up_to_max() {
        let mut ship = player();
        ship.take_damage(3);
        let dented = ship.shield();
        let mut out = Vec::new();
        for _ in 0..200 {
            ship.update(0.016, &mut out);
        }
        assert!(ship.shield() > dented);
        assert!(ship.shield() <= ship.max_shield());
    }

    #[test]
    fn firing_spawns_charges_and_respects_cooldown() {
        let mut ship = player();
        ship.set_firing(true);
        let mut out = Vec::new();
        ship.update(0.016, &mut out);
        assert_eq!(out.len(), 1);
        // Immediately again: weapon is cooling down.
        ship.update(0.016, &mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn exhausted_weapon_auto_switches_to_next_in_ring() {
        let cfg = Config::default();
        let empty = Weapon::new(
            "dry",
            &crate::config::WeaponStats {
                ammo: Ammo::Count(0),
                max_ammo: 10,
                cooldown: 0,
                damage: 1,
                radius: 0,
                dy: -20.0,
            },
            "charge",
        );
        let mut ring = WeaponRing::new(empty);
        ring.push(Weapon::new(
            "blaster",
            cfg.weapon("blaster").unwrap(),
            "charge",
        ));
        let mut ship = Ship::new(
            ShipKind::Player,
            PointF::new(30.0, 20.0),
            cfg.ship("player").unwrap(),
            ring,
        );
        ship.set_firing(true);

        let mut out = Vec::new();
        // First tick: dry weapon reports OutOfAmmo, ring advances.
        ship.update(0.016, &mut out);
        assert!(out.is_empty());
        assert_eq!(ship.weapons().current().name(), "blaster");
        // Next tick fires for real.
        ship.update(0.016, &mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn only_the_player_is_compound() {
        assert!(player().is_compound());
        assert_eq!(player().children().len(), 1);
        assert!(!raider(0.0).is_compound());
        assert!(raider(0.0).children().is_empty());
    }

    #[test]
    fn exhaust_flicker_cycles_its_frames() {
        let mut ship = player();
        let first = ship.children()[0].1.clone();
        let mut out = Vec::new();
        let mut changed = false;
        for _ in 0..20 {
            ship.update(0.016, &mut out);
            if *ship.children()[0].1 != first {
                changed = true;
            }
        }
        assert!(changed, "exhaust surface never left its first frame");
    }
}
