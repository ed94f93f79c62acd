//! Config parsing and scoreboard persistence, through the public API.

use tui_starfire::core::{Ammo, Config, ConfigError, Scoreboard, ScoreboardError};

const SAMPLE: &str = r#"
[ships.player]
dx = 30.0
dy = 14.0
hull = 60
max_hull = 60
shield = 25
max_shield = 25

[weapons.blaster]
ammo = "infinite"
max_ammo = 0
cooldown = 150
damage = 4
radius = 0
dy = -22.0

[weapons.plasma]
ammo = 12
max_ammo = 40
cooldown = 400
damage = 15
radius = 2
dy = -14.0
"#;

#[test]
fn toml_tables_override_the_defaults() {
    let config = Config::from_toml_str(SAMPLE).unwrap();
    assert_eq!(config.ship("player").unwrap().hull, 60);
    assert_eq!(config.weapon("plasma").unwrap().ammo, Ammo::Count(12));
    assert_eq!(config.weapon("blaster").unwrap().ammo, Ammo::Infinite);
}

#[test]
fn only_the_infinite_sentinel_is_accepted() {
    let text = SAMPLE.replace("\"infinite\"", "\"unlimited\"");
    assert!(matches!(
        Config::from_toml_str(&text),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn unknown_type_lookups_fail_with_the_name() {
    let config = Config::from_toml_str(SAMPLE).unwrap();
    let err = config.ship("mothership").unwrap_err();
    assert!(matches!(err, ConfigError::MissingType(name) if name == "mothership"));
}

#[test]
fn compiled_in_defaults_cover_every_spawnable_type() {
    let config = Config::default();
    for ship in ["player", "raider", "cruiser"] {
        assert!(config.ship(ship).is_ok(), "missing ship '{ship}'");
    }
    for weapon in ["blaster", "plasma", "enemy_bolt"] {
        assert!(config.weapon(weapon).is_ok(), "missing weapon '{weapon}'");
    }
}

#[test]
fn scoreboard_survives_a_csv_round_trip() {
    let mut board = Scoreboard::new();
    board.record("ace", 4200);
    board.record("rookie", 310);
    board.record("ace", 9000);

    let reloaded = Scoreboard::from_csv_str(&board.to_csv_string()).unwrap();
    assert_eq!(reloaded.best(), Some(("ace", 9000)));
}

#[test]
fn malformed_scoreboard_rows_report_their_line() {
    let err = Scoreboard::from_csv_str("ace,100\nnot a row\n").unwrap_err();
    assert!(matches!(err, ScoreboardError::MalformedRow { line: 2, .. }));
}
