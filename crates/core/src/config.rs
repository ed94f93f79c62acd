//! Ship and weapon stat tables, loaded from TOML.
//!
//! The simulation consumes these as plain maps from type name to numeric
//! stats. `ammo = "infinite"` is a valid sentinel: rendered as a large
//! number by the HUD but inexhaustible in logic. Load errors are fatal to
//! startup; a compiled-in default table means the game runs with no config
//! file present.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::objects::Ammo;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("missing stats for type '{0}'")]
    MissingType(String),
}

/// Per-ship-type movement and durability stats.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShipStats {
    /// Horizontal cells per second
    pub dx: f32,
    /// Vertical cells per second
    pub dy: f32,
    pub hull: i32,
    pub max_hull: i32,
    pub shield: i32,
    pub max_shield: i32,
}

/// Per-weapon-type firing stats.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeaponStats {
    #[serde(deserialize_with = "de_ammo")]
    pub ammo: Ammo,
    pub max_ammo: u32,
    /// Cooldown between shots, milliseconds
    pub cooldown: u32,
    pub damage: i32,
    /// Blast radius in cells (0 = single-cell charge)
    pub radius: u32,
    /// Charge speed, cells per second (sign gives direction)
    pub dy: f32,
}

fn de_ammo<'de, D>(deserializer: D) -> Result<Ammo, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Count(u32),
        Word(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Count(n) => Ok(Ammo::Count(n)),
        Raw::Word(w) if w == "infinite" => Ok(Ammo::Infinite),
        Raw::Word(w) => Err(serde::de::Error::custom(format!(
            "unknown ammo sentinel '{w}' (only \"infinite\" is accepted)"
        ))),
    }
}

/// All stat tables, keyed by type name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ships: HashMap<String, ShipStats>,
    #[serde(default)]
    pub weapons: HashMap<String, WeaponStats>,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn ship(&self, name: &str) -> Result<&ShipStats, ConfigError> {
        self.ships
            .get(name)
            .ok_or_else(|| ConfigError::MissingType(name.to_string()))
    }

    pub fn weapon(&self, name: &str) -> Result<&WeaponStats, ConfigError> {
        self.weapons
            .get(name)
            .ok_or_else(|| ConfigError::MissingType(name.to_string()))
    }
}

impl Default for Config {
    /// Compiled-in stat table used when no config file is supplied.
    fn default() -> Self {
        let mut ships = HashMap::new();
        ships.insert(
            "player".to_string(),
            ShipStats {
                dx: 24.0,
                dy: 12.0,
                hull: 50,
                max_hull: 50,
                shield: 20,
                max_shield: 20,
            },
        );
        ships.insert(
            "raider".to_string(),
            ShipStats {
                dx: 0.0,
                dy: 4.0,
                hull: 10,
                max_hull: 10,
                shield: 0,
                max_shield: 0,
            },
        );
        ships.insert(
            "cruiser".to_string(),
            ShipStats {
                dx: 0.0,
                dy: 2.0,
                hull: 30,
                max_hull: 30,
                shield: 10,
                max_shield: 10,
            },
        );

        let mut weapons = HashMap::new();
        weapons.insert(
            "blaster".to_string(),
            WeaponStats {
                ammo: Ammo::Infinite,
                max_ammo: 999,
                cooldown: 200,
                damage: 5,
                radius: 0,
                dy: -20.0,
            },
        );
        weapons.insert(
            "plasma".to_string(),
            WeaponStats {
                ammo: Ammo::Count(30),
                max_ammo: 30,
                cooldown: 350,
                damage: 12,
                radius: 1,
                dy: -16.0,
            },
        );
        weapons.insert(
            "enemy_bolt".to_string(),
            WeaponStats {
                ammo: Ammo::Infinite,
                max_ammo: 999,
                cooldown: 900,
                damage: 6,
                radius: 0,
                dy: 10.0,
            },
        );

        Self { ships, weapons }
    }
}
