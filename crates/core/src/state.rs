//! Game state: the per-frame object list and frame orchestration.
//!
//! `State` owns the object arena, the collision manager, and the wave
//! scheduler, and drives the fixed frame order: input actions → object
//! updates → scheduled spawns → collision detection → contact dispatch →
//! purge of destroyed objects. Purging runs before the caller composes a
//! frame, so the renderer never sees a dangling entry.

use log::{debug, info, warn};
use tui_starfire_types::{GameAction, Point, PointF, FIELD_WIDTH};

use crate::chunks::{default_starfield, Background, Chunk};
use crate::collision::{Collider, CollisionManager, HandlerId};
use crate::config::Config;
use crate::objects::{
    from_droptable, Charge, DamageOutcome, GameObject, Pickup, Ship, ShipKind, Weapon, WeaponRing,
    TAG_CHARGE, TAG_ENEMY, TAG_ENEMY_CHARGE, TAG_PICKUP, TAG_SHIP,
};
use crate::rng::SimpleRng;
use crate::schedule::Scheduler;
use crate::surface::Surface;

/// Damage the player takes when ramming an enemy hull.
const RAM_DAMAGE: i32 = 10;

/// Stable handle into the state's object arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId {
    index: u32,
    generation: u32,
}

impl ObjectId {
    #[doc(hidden)]
    pub const fn for_tests(index: u32) -> Self {
        Self {
            index,
            generation: 0,
        }
    }
}

/// One renderable unit handed to the frame composer.
///
/// `owner` is `None` for renderables that live outside the object arena
/// (the background); those are never reported obsolete.
#[derive(Debug, Clone, Copy)]
pub struct RenderItem<'a> {
    pub owner: Option<ObjectId>,
    pub anchor: Point,
    pub surface: &'a Surface,
    pub draw_on_border: bool,
}

/// Timeline events fired by the wave scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveEvent {
    Spawn { kind: ShipKind, x: i32 },
}

#[derive(Debug)]
struct ObjSlot {
    generation: u32,
    object: Option<GameObject>,
}

pub struct State {
    config: Config,
    slots: Vec<ObjSlot>,
    free: Vec<u32>,
    player: Option<ObjectId>,
    collisions: CollisionManager,
    wave: Scheduler<WaveEvent>,
    rng: SimpleRng,
    background: Background,
    /// Source chunks for the scrolling backdrop, kept so a restart
    /// rebuilds the same sky.
    backdrop: Vec<Chunk>,
    score: u32,
    started: bool,
    paused: bool,
    game_over: bool,
    // Contact dispatch tokens, one per registered handler direction.
    h_charge_enemy: HandlerId,
    h_enemy_charge_ship: HandlerId,
    h_ship_enemy: HandlerId,
    h_ship_pickup: HandlerId,
}

impl State {
    pub fn new(seed: u32, config: Config) -> Self {
        Self::with_backdrop(seed, config, default_starfield())
    }

    /// Build a state scrolling the given backdrop chunks instead of the
    /// built-in starfield.
    pub fn with_backdrop(seed: u32, config: Config, backdrop: Vec<Chunk>) -> Self {
        let mut collisions = CollisionManager::new();
        let h_charge_enemy = collisions.add_handler(TAG_CHARGE, TAG_ENEMY);
        let h_enemy_charge_ship = collisions.add_handler(TAG_ENEMY_CHARGE, TAG_SHIP);
        let h_ship_enemy = collisions.add_handler(TAG_SHIP, TAG_ENEMY);
        let h_ship_pickup = collisions.add_handler(TAG_SHIP, TAG_PICKUP);

        let mut state = Self {
            config,
            slots: Vec::new(),
            free: Vec::new(),
            player: None,
            collisions,
            wave: default_wave(),
            rng: SimpleRng::new(seed),
            background: Background::new(&backdrop, 6.0),
            backdrop,
            score: 0,
            started: false,
            paused: false,
            game_over: false,
            h_charge_enemy,
            h_enemy_charge_ship,
            h_ship_enemy,
            h_ship_pickup,
        };
        state.spawn_player();
        state
    }

    /// Start the game: arms the wave timeline.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.wave.start();
        info!("game started");
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn collisions(&self) -> &CollisionManager {
        &self.collisions
    }

    pub fn player(&self) -> Option<&Ship> {
        let id = self.player?;
        match self.get(id) {
            Some(GameObject::Ship(s)) => Some(s),
            _ => None,
        }
    }

    /// Count of live (non-destroyed) objects.
    pub fn object_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.object.as_ref().is_some_and(|o| !o.destroyed()))
            .count()
    }

    pub fn get(&self, id: ObjectId) -> Option<&GameObject> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.object.as_ref())
    }

    fn get_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.object.as_mut())
    }

    fn ship_mut(&mut self, id: ObjectId) -> Option<&mut Ship> {
        match self.get_mut(id) {
            Some(GameObject::Ship(s)) => Some(s),
            _ => None,
        }
    }

    /// Apply a player/meta action for this tick.
    pub fn apply_action(&mut self, action: GameAction) {
        match action {
            GameAction::Pause => {
                self.paused = !self.paused;
                return;
            }
            GameAction::Restart => {
                self.restart();
                return;
            }
            _ => {}
        }
        if self.paused || self.game_over {
            return;
        }
        let Some(id) = self.player else { return };
        let Some(ship) = self.ship_mut(id) else {
            return;
        };
        match action {
            GameAction::MoveLeft => ship.steer(-1, 0),
            GameAction::MoveRight => ship.steer(1, 0),
            GameAction::MoveUp => ship.steer(0, -1),
            GameAction::MoveDown => ship.steer(0, 1),
            GameAction::FireStart => ship.set_firing(true),
            GameAction::FireStop => ship.set_firing(false),
            GameAction::NextWeapon => ship.weapons_mut().next(),
            GameAction::PrevWeapon => ship.weapons_mut().prev(),
            GameAction::Pause | GameAction::Restart => {}
        }
    }

    fn restart(&mut self) {
        info!("restart requested (final score {})", self.score);
        let seed = self.rng.next_u32();
        let config = self.config.clone();
        let backdrop = std::mem::take(&mut self.backdrop);
        *self = State::with_backdrop(seed, config, backdrop);
        self.start();
    }

    /// Advance the simulation by one fixed tick.
    pub fn tick(&mut self, dt_ms: u32) {
        if !self.started || self.paused || self.game_over {
            return;
        }
        let dt = dt_ms as f32 / 1000.0;

        self.background.update(dt);

        // 1. Object updates; ships may spawn charges.
        let mut spawned: Vec<Charge> = Vec::new();
        for i in 0..self.slots.len() {
            if let Some(obj) = self.slots[i].object.as_mut() {
                match obj {
                    GameObject::Ship(s) => s.update(dt, &mut spawned),
                    GameObject::Charge(c) => c.update(dt),
                    GameObject::Pickup(p) => p.update(dt),
                }
            }
        }
        for charge in spawned {
            self.spawn_charge(charge);
        }

        // 2. Scheduled wave spawns; an emptied wave restarts once the field
        //    clears, giving endless play.
        for event in self.wave.update() {
            match event {
                WaveEvent::Spawn { kind, x } => self.spawn_enemy(kind, x),
            }
        }
        if !self.wave.running() && !self.any_enemy_alive() {
            debug!("wave drained, restarting timeline");
            self.wave.start();
        }

        // 3. Push fresh positions, then detect.
        for slot in &self.slots {
            if let Some(obj) = slot.object.as_ref() {
                if let Some(cid) = obj.collider() {
                    self.collisions.set_position(cid, obj.anchor());
                }
            }
        }
        let contacts = self.collisions.update();

        // 4. Dispatch. Objects destroyed mid-dispatch lose their colliders,
        //    so later contacts touching them are skipped.
        for contact in contacts {
            if !self.collisions.contains(contact.subject) || !self.collisions.contains(contact.other)
            {
                continue;
            }
            if contact.handler == self.h_charge_enemy {
                self.on_charge_hits_enemy(contact.subject_owner, contact.other_owner);
            } else if contact.handler == self.h_enemy_charge_ship {
                self.on_charge_hits_player(contact.subject_owner, contact.other_owner);
            } else if contact.handler == self.h_ship_enemy {
                self.on_ram(contact.subject_owner, contact.other_owner);
            } else if contact.handler == self.h_ship_pickup {
                self.on_pickup(contact.subject_owner, contact.other_owner);
            }
        }

        // 5. Purge destroyed objects before anything is rendered.
        self.purge_destroyed();
    }

    fn any_enemy_alive(&self) -> bool {
        self.slots.iter().any(|s| {
            matches!(
                s.object.as_ref(),
                Some(GameObject::Ship(ship)) if ship.kind().is_enemy() && !ship.destroyed
            )
        })
    }

    fn on_charge_hits_enemy(&mut self, charge_id: ObjectId, enemy_id: ObjectId) {
        let damage = match self.get(charge_id) {
            Some(GameObject::Charge(c)) => c.damage(),
            _ => return,
        };
        self.destroy(charge_id);
        self.damage_enemy(enemy_id, damage);
    }

    fn damage_enemy(&mut self, enemy_id: ObjectId, damage: i32) {
        let (kind, pos) = match self.get(enemy_id) {
            Some(GameObject::Ship(s)) => (s.kind(), s.position()),
            _ => return,
        };
        let Some(enemy) = self.ship_mut(enemy_id) else {
            return;
        };
        if enemy.take_damage(damage) == DamageOutcome::Destroyed {
            self.score += kind.score_value();
            debug!("{kind:?} destroyed, score {}", self.score);
            if let Some(effect) = from_droptable(kind, &mut self.rng) {
                self.spawn_pickup(Pickup::new(effect, pos));
            }
            self.destroy(enemy_id);
        }
    }

    fn on_charge_hits_player(&mut self, charge_id: ObjectId, player_id: ObjectId) {
        let damage = match self.get(charge_id) {
            Some(GameObject::Charge(c)) => c.damage(),
            _ => return,
        };
        self.destroy(charge_id);
        self.damage_player(player_id, damage);
    }

    fn damage_player(&mut self, player_id: ObjectId, damage: i32) {
        let Some(ship) = self.ship_mut(player_id) else {
            return;
        };
        if ship.take_damage(damage) == DamageOutcome::Destroyed {
            info!("player destroyed, game over at score {}", self.score);
            self.destroy(player_id);
            self.game_over = true;
        }
    }

    fn on_ram(&mut self, player_id: ObjectId, enemy_id: ObjectId) {
        // Ramming wrecks the enemy outright and dents the player.
        self.damage_enemy(enemy_id, i32::MAX / 2);
        self.damage_player(player_id, RAM_DAMAGE);
    }

    fn on_pickup(&mut self, player_id: ObjectId, pickup_id: ObjectId) {
        let pickup = match self.get(pickup_id) {
            Some(GameObject::Pickup(p)) => p.clone(),
            _ => return,
        };
        if let Some(ship) = self.ship_mut(player_id) {
            pickup.apply(ship);
            debug!("pickup {:?} applied", pickup.effect());
        }
        self.destroy(pickup_id);
    }

    /// Mark an object destroyed and deregister its collider.
    ///
    /// Idempotent: a second call (or a call racing a border cull against a
    /// collision kill) is a no-op. The slot itself is reclaimed by
    /// `purge_destroyed` at the end of the tick.
    pub fn destroy(&mut self, id: ObjectId) {
        let Some(obj) = self.get_mut(id) else { return };
        if obj.destroyed() && obj.collider().is_none() {
            return;
        }
        obj.set_destroyed();
        let collider = obj.collider();
        if let Some(cid) = collider {
            if let Some(o) = self.get_mut(id) {
                o.set_collider(None);
            }
            self.collisions.remove(cid);
        }
    }

    /// The renderer's pull-based cleanup hook: called for objects whose
    /// cells left the playfield. The player is clamped and never culled.
    pub fn remove_obsolete(&mut self, id: ObjectId) {
        match self.get(id) {
            Some(GameObject::Ship(s)) if !s.kind().is_enemy() => {}
            Some(_) => self.destroy(id),
            None => {}
        }
    }

    fn purge_destroyed(&mut self) {
        for index in 0..self.slots.len() {
            let destroyed = self.slots[index]
                .object
                .as_ref()
                .is_some_and(|o| o.destroyed());
            if destroyed {
                let id = ObjectId {
                    index: index as u32,
                    generation: self.slots[index].generation,
                };
                // Collider cleanup first (no-op when already gone).
                self.destroy(id);
                let slot = &mut self.slots[index];
                slot.object = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
                if Some(id) == self.player {
                    self.player = None;
                }
            }
        }
    }

    // ---- spawning ------------------------------------------------------

    fn insert_object(&mut self, object: GameObject) -> ObjectId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.object = Some(object);
            ObjectId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(ObjSlot {
                generation: 0,
                object: Some(object),
            });
            ObjectId {
                index,
                generation: 0,
            }
        }
    }

    fn attach_collider(&mut self, id: ObjectId, tag: &str, bitmap: &[&str], pos: Point) {
        match Collider::new(tag, bitmap, pos, id) {
            Ok(collider) => {
                let cid = self.collisions.insert(collider);
                if let Some(obj) = self.get_mut(id) {
                    obj.set_collider(Some(cid));
                }
            }
            Err(err) => warn!("collider rejected for '{tag}': {err}"),
        }
    }

    fn spawn_player(&mut self) {
        let stats = match self.config.ship("player") {
            Ok(s) => s.clone(),
            Err(err) => {
                warn!("player stats missing, using defaults: {err}");
                return;
            }
        };
        let mut ring = match self.config.weapon("blaster") {
            Ok(w) => WeaponRing::new(Weapon::new("blaster", w, TAG_CHARGE)),
            Err(err) => {
                warn!("blaster stats missing: {err}");
                return;
            }
        };
        if let Ok(w) = self.config.weapon("plasma") {
            ring.push(Weapon::new("plasma", w, TAG_CHARGE));
        }
        let pos = PointF::new((FIELD_WIDTH / 2) as f32, 20.0);
        let ship = Ship::new(ShipKind::Player, pos, &stats, ring);
        let bitmap = ship.bitmap();
        let anchor = ship.anchor();
        let id = self.insert_object(GameObject::Ship(ship));
        self.attach_collider(id, TAG_SHIP, bitmap, anchor);
        self.player = Some(id);
    }

    fn spawn_enemy(&mut self, kind: ShipKind, x: i32) {
        let stats = match self.config.ship(kind.config_name()) {
            Ok(s) => s.clone(),
            Err(err) => {
                warn!("enemy stats missing: {err}");
                return;
            }
        };
        let ring = match self.config.weapon("enemy_bolt") {
            Ok(w) => WeaponRing::new(Weapon::new("enemy_bolt", w, TAG_ENEMY_CHARGE)),
            Err(err) => {
                warn!("enemy weapon stats missing: {err}");
                return;
            }
        };
        // Jitter the entry column a little so waves do not stack.
        let jitter = self.rng.next_range(5) as i32 - 2;
        let x = (x + jitter).clamp(0, FIELD_WIDTH - 6);
        let mut ship = Ship::new(kind, PointF::new(x as f32, 0.0), &stats, ring);
        ship.set_firing(true);
        let bitmap = ship.bitmap();
        let anchor = ship.anchor();
        let id = self.insert_object(GameObject::Ship(ship));
        self.attach_collider(id, TAG_ENEMY, bitmap, anchor);
        debug!("spawned {kind:?} at column {x}");
    }

    fn spawn_charge(&mut self, charge: Charge) {
        let tag = charge.tag();
        let anchor = charge.anchor();
        let rows: Vec<String> = charge.bitmap().iter().map(|s| s.to_string()).collect();
        let id = self.insert_object(GameObject::Charge(charge));
        let bitmap: Vec<&str> = rows.iter().map(|s| s.as_str()).collect();
        self.attach_collider(id, tag, &bitmap, anchor);
    }

    fn spawn_pickup(&mut self, pickup: Pickup) {
        let anchor = pickup.anchor();
        let id = self.insert_object(GameObject::Pickup(pickup));
        self.attach_collider(id, TAG_PICKUP, &["#"], anchor);
    }

    // ---- rendering -----------------------------------------------------

    /// Everything to draw this frame, back to front: backdrop, then live
    /// objects (with compound children right after their parent).
    pub fn render_items(&self) -> Vec<RenderItem<'_>> {
        let mut items = Vec::new();
        items.push(RenderItem {
            owner: None,
            anchor: Point::new(0, 0),
            surface: self.background.surface(),
            draw_on_border: true,
        });
        for (index, slot) in self.slots.iter().enumerate() {
            let Some(obj) = slot.object.as_ref() else {
                continue;
            };
            if obj.destroyed() {
                continue;
            }
            let owner = Some(ObjectId {
                index: index as u32,
                generation: slot.generation,
            });
            let anchor = obj.anchor();
            items.push(RenderItem {
                owner,
                anchor,
                surface: obj.surface(),
                draw_on_border: false,
            });
            if obj.is_compound() {
                for (offset, surface) in obj.children() {
                    items.push(RenderItem {
                        owner,
                        anchor: anchor + offset,
                        surface,
                        draw_on_border: false,
                    });
                }
            }
        }
        items
    }
}

/// The default level timeline: staggered raider waves with cruisers mixed
/// in later. Counter units are milliseconds.
fn default_wave() -> Scheduler<WaveEvent> {
    let mut wave = Scheduler::new(tui_starfire_types::TICK_MS as i64);
    for i in 0..5 {
        wave.add_event(
            1_000 + i * 700,
            WaveEvent::Spawn {
                kind: ShipKind::Raider,
                x: 8 + (i as i32) * 13,
            },
        );
    }
    wave.add_event(
        5_500,
        WaveEvent::Spawn {
            kind: ShipKind::Cruiser,
            x: 24,
        },
    );
    wave.add_event(
        5_500,
        WaveEvent::Spawn {
            kind: ShipKind::Cruiser,
            x: 48,
        },
    );
    for i in 0..4 {
        wave.add_event(
            8_000 + i * 500,
            WaveEvent::Spawn {
                kind: ShipKind::Raider,
                x: 12 + (i as i32) * 16,
            },
        );
    }
    wave
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_starfire_types::TICK_MS;

    fn new_state() -> State {
        let mut state = State::new(1234, Config::default());
        state.start();
        state
    }

    #[test]
    fn tick_is_noop_before_start_and_while_paused() {
        let mut state = State::new(1, Config::default());
        let before = state.object_count();
        for _ in 0..100 {
            state.tick(TICK_MS);
        }
        assert_eq!(state.object_count(), before);

        state.start();
        state.apply_action(GameAction::Pause);
        for _ in 0..200 {
            state.tick(TICK_MS);
        }
        assert_eq!(state.object_count(), before);
    }

    #[test]
    fn wave_spawns_enemies_over_time() {
        let mut state = new_state();
        // 2 seconds: the first raiders are due.
        for _ in 0..125 {
            state.tick(TICK_MS);
        }
        assert!(state.any_enemy_alive());
    }

    #[test]
    fn firing_registers_charges_with_colliders() {
        let mut state = new_state();
        let before = state.collisions().len();
        state.apply_action(GameAction::FireStart);
        state.tick(TICK_MS);
        assert!(state.collisions().len() > before);
    }

    #[test]
    fn destroy_is_idempotent() {
        let mut state = new_state();
        state.spawn_enemy(ShipKind::Raider, 10);
        let id = state
            .slots
            .iter()
            .enumerate()
            .find_map(|(i, s)| match s.object.as_ref() {
                Some(GameObject::Ship(ship)) if ship.kind().is_enemy() => Some(ObjectId {
                    index: i as u32,
                    generation: s.generation,
                }),
                _ => None,
            })
            .unwrap();

        let colliders_before = state.collisions().len();
        state.destroy(id);
        assert_eq!(state.collisions().len(), colliders_before - 1);
        let score = state.score();
        state.destroy(id);
        state.destroy(id);
        assert_eq!(state.collisions().len(), colliders_before - 1);
        assert_eq!(state.score(), score);
    }

    #[test]
    fn destroyed_objects_never_reach_the_renderer() {
        let mut state = new_state();
        state.spawn_enemy(ShipKind::Raider, 10);
        let count = state.render_items().len();
        // Find and kill the enemy mid-frame, then tick: purge runs before
        // the next render_items call.
        let id = state
            .slots
            .iter()
            .enumerate()
            .find_map(|(i, s)| match s.object.as_ref() {
                Some(GameObject::Ship(ship)) if ship.kind().is_enemy() => Some(ObjectId {
                    index: i as u32,
                    generation: s.generation,
                }),
                _ => None,
            })
            .unwrap();
        state.destroy(id);
        assert_eq!(state.render_items().len(), count - 1);
    }

    #[test]
    fn border_cull_destroys_charges() {
        let mut state = new_state();
        state.spawn_charge(Charge::new(TAG_CHARGE, PointF::new(10.0, -3.0), -20.0, 5, 0));
        let id = state
            .slots
            .iter()
            .enumerate()
            .find_map(|(i, s)| match s.object.as_ref() {
                Some(GameObject::Charge(_)) => Some(ObjectId {
                    index: i as u32,
                    generation: s.generation,
                }),
                _ => None,
            })
            .unwrap();
        state.remove_obsolete(id);
        assert!(state.get(id).unwrap().destroyed());

        // The player is exempt from the cull path.
        let player_id = state.player.unwrap();
        state.remove_obsolete(player_id);
        assert!(!state.get(player_id).unwrap().destroyed());
    }

    #[test]
    fn killing_an_enemy_awards_score_once() {
        let mut state = new_state();
        state.spawn_enemy(ShipKind::Raider, 10);
        let id = state
            .slots
            .iter()
            .enumerate()
            .find_map(|(i, s)| match s.object.as_ref() {
                Some(GameObject::Ship(ship)) if ship.kind().is_enemy() => Some(ObjectId {
                    index: i as u32,
                    generation: s.generation,
                }),
                _ => None,
            })
            .unwrap();
        state.damage_enemy(id, 1_000);
        assert_eq!(state.score(), ShipKind::Raider.score_value());
        // Further damage to the dead hull changes nothing.
        state.damage_enemy(id, 1_000);
        assert_eq!(state.score(), ShipKind::Raider.score_value());
    }

    #[test]
    fn player_death_ends_the_game() {
        let mut state = new_state();
        let player_id = state.player.unwrap();
        state.damage_player(player_id, 1_000_000);
        assert!(state.game_over());
        // Ticking after game over is inert.
        let count = state.object_count();
        state.tick(TICK_MS);
        assert_eq!(state.object_count(), count);
    }

    #[test]
    fn tick_advances_the_player_animation() {
        let mut state = new_state();
        let first = state.player().unwrap().children()[0].1.clone();
        let mut changed = false;
        for _ in 0..20 {
            state.tick(TICK_MS);
            if *state.player().unwrap().children()[0].1 != first {
                changed = true;
            }
        }
        assert!(changed, "exhaust never flickered across twenty ticks");
    }

    #[test]
    fn render_items_start_with_the_backdrop() {
        let state = new_state();
        let items = state.render_items();
        assert!(items[0].owner.is_none());
        assert!(items[0].draw_on_border);
        // Player plus its exhaust child are present.
        let player_items = items.iter().filter(|i| i.owner.is_some()).count();
        assert_eq!(player_items, 2);
    }
}
