//! Weapon, ship, and pickup behavior through the public API.

use tui_starfire::core::{
    Ammo, Config, DamageOutcome, Pickup, PickupEffect, Ship, ShipKind, ShotOutcome, Weapon,
    WeaponRing, TAG_CHARGE,
};
use tui_starfire::types::PointF;

fn plasma() -> Weapon {
    let config = Config::default();
    Weapon::new("plasma", config.weapon("plasma").unwrap(), TAG_CHARGE)
}

fn player() -> Ship {
    let config = Config::default();
    let ring = WeaponRing::new(Weapon::new(
        "blaster",
        config.weapon("blaster").unwrap(),
        TAG_CHARGE,
    ));
    Ship::new(
        ShipKind::Player,
        PointF::new(10.0, 10.0),
        config.ship("player").unwrap(),
        ring,
    )
}

#[test]
fn firing_starts_the_cooldown_and_spends_ammo() {
    let mut weapon = plasma();
    let pos = PointF::new(5.0, 5.0);

    assert!(matches!(weapon.make_shot(pos), ShotOutcome::Fired(_)));
    assert_eq!(weapon.ammo(), Ammo::Count(29));
    assert!(matches!(weapon.make_shot(pos), ShotOutcome::CoolingDown));

    // Plasma cools down in 350 ms.
    weapon.update(0.4);
    assert!(matches!(weapon.make_shot(pos), ShotOutcome::Fired(_)));
}

#[test]
fn exhausted_ammo_is_an_outcome_not_a_shot() {
    let mut weapon = plasma();
    let pos = PointF::new(0.0, 0.0);
    for _ in 0..30 {
        assert!(matches!(weapon.make_shot(pos), ShotOutcome::Fired(_)));
        weapon.update(1.0);
    }
    assert!(matches!(weapon.make_shot(pos), ShotOutcome::OutOfAmmo));

    weapon.refill();
    assert_eq!(weapon.ammo(), Ammo::Count(30));
}

#[test]
fn infinite_ammo_never_exhausts() {
    let config = Config::default();
    let mut blaster = Weapon::new("blaster", config.weapon("blaster").unwrap(), TAG_CHARGE);
    for _ in 0..200 {
        assert!(matches!(
            blaster.make_shot(PointF::new(0.0, 0.0)),
            ShotOutcome::Fired(_)
        ));
        blaster.update(1.0);
    }
    assert_eq!(blaster.ammo(), Ammo::Infinite);
}

#[test]
fn weapon_ring_cycles_in_both_directions() {
    let config = Config::default();
    let mut ring = WeaponRing::new(Weapon::new(
        "blaster",
        config.weapon("blaster").unwrap(),
        TAG_CHARGE,
    ));
    ring.push(Weapon::new(
        "plasma",
        config.weapon("plasma").unwrap(),
        TAG_CHARGE,
    ));

    assert_eq!(ring.current().name(), "blaster");
    ring.next();
    assert_eq!(ring.current().name(), "plasma");
    ring.next();
    assert_eq!(ring.current().name(), "blaster");
    ring.prev();
    assert_eq!(ring.current().name(), "plasma");
}

#[test]
fn shields_absorb_before_hull() {
    let mut ship = player();
    // Defaults: 50 hull, 20 shield.
    assert_eq!(ship.take_damage(25), DamageOutcome::Absorbed);
    assert_eq!(ship.shield(), 0);
    assert_eq!(ship.hull(), 45);

    assert_eq!(ship.take_damage(45), DamageOutcome::Destroyed);
    assert_eq!(ship.hull(), 0);
}

#[test]
fn repair_pickup_restores_the_hull() {
    let mut ship = player();
    ship.take_damage(30);
    assert!(ship.hull() < ship.max_hull());

    Pickup::new(PickupEffect::RepairHull, PointF::new(0.0, 0.0)).apply(&mut ship);
    assert_eq!(ship.hull(), ship.max_hull());
}

#[test]
fn upgrade_pickup_raises_current_weapon_damage() {
    let mut ship = player();
    let before = ship.weapons().current().damage();

    Pickup::new(PickupEffect::UpgradeWeapon, PointF::new(0.0, 0.0)).apply(&mut ship);
    assert!(ship.weapons().current().damage() > before);
}
