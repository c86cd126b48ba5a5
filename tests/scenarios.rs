//! End-to-end gameplay scenarios driven through the public level API
//!
//! The library does not integrate motion, so scenarios that need movement
//! advance projectile positions by hand between ticks.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use tile_quest::Settings;
use tile_quest::consts::*;
use tile_quest::sim::triggers::SPAWN_POINT;
use tile_quest::sim::{
    Game, GameEvent, HudState, InputSnapshot, Level, LevelMap, LevelSignal, MapObject,
    Monster, MonsterConfig, PlayerState, Species, Tile, TileLayer, TileProps, Timer,
};

fn legend(c: char) -> Option<Tile> {
    let mut props = TileProps::default();
    match c {
        '#' => return Some(Tile::solid(1)),
        'H' => props.heals = Some(1),
        'K' => props.opens = Some("gate".into()),
        'L' => {
            props.collides = true;
            props.name = Some("gate".into());
        }
        'x' => props.monster = Some(Species::Scorpion.marker().into()),
        's' => props.monster = Some(Species::Spider.marker().into()),
        _ => return None,
    }
    Some(Tile::new(7, props))
}

fn arena(world: &[&str], dynamic: &[&str], spawn: Vec2) -> LevelMap {
    LevelMap {
        name: "arena".into(),
        world: TileLayer::from_ascii("World", world, legend),
        dynamic: TileLayer::from_ascii("Dynamic", dynamic, legend),
        objects: vec![MapObject::region(SPAWN_POINT, spawn.x, spawn.y, 0.0, 0.0)],
    }
}

fn load(map: &LevelMap) -> Level {
    Level::load(map, 0, &Settings::default(), &mut Pcg32::seed_from_u64(7)).expect("level")
}

const FLOOR: [&str; 4] = [
    "            ",
    "            ",
    "            ",
    "############",
];
const EMPTY: [&str; 4] = ["            "; 4];

fn health_changes(events: &[GameEvent]) -> impl Iterator<Item = i32> + '_ {
    events.iter().filter_map(|e| match e {
        GameEvent::HealthChanged(h) => Some(*h),
        _ => None,
    })
}

#[test]
fn test_melee_bites_respect_attack_delay() {
    let dynamic = [
        "            ",
        "            ",
        "   x        ",
        "            ",
    ];
    let m = arena(&FLOOR, &dynamic, TileLayer::tile_center(3, 2));
    let mut level = load(&m);
    let mut timer = Timer::new();
    let attack_delay = level.monsters()[0].config().attack_delay_ms;
    assert_eq!(attack_delay, 700.0);

    let mut bites = Vec::new();
    let mut health = PLAYER_MAX_HEALTH;
    let mut t = 0.0;
    while t < 2000.0 {
        let report = level.tick(t, &InputSnapshot::default(), false, &mut timer);
        for h in health_changes(&report.events) {
            if h < health {
                bites.push(t);
            }
            health = h;
        }
        t += 10.0;
    }

    // The first bite waits a full delay after engagement
    assert_eq!(bites.len(), (2000.0 / attack_delay).floor() as usize);
    assert!(bites[0] >= attack_delay, "first bite at {}", bites[0]);
    for pair in bites.windows(2) {
        assert!(pair[1] - pair[0] >= attack_delay, "bites at {pair:?}");
    }
    assert_eq!(level.player().health(), PLAYER_MAX_HEALTH - 2 * 2);
}

#[test]
fn test_heal_tile_heals_every_half_second() {
    let world = [
        "            ",
        "            ",
        "  H         ",
        "############",
    ];
    let m = arena(&world, &EMPTY, TileLayer::tile_center(2, 2));
    let mut level = load(&m);
    let mut timer = Timer::new();
    level.player_mut().change_health(-8);

    let mut heals = 0;
    let mut health = PLAYER_MAX_HEALTH;
    let mut t = 0.0;
    while t < 1200.0 {
        let report = level.tick(t, &InputSnapshot::default(), false, &mut timer);
        for h in health_changes(&report.events) {
            heals += (h > health) as u32;
            health = h;
        }
        t += 16.0;
    }
    assert_eq!(heals, 3);
    assert_eq!(level.player().health(), 5);
}

#[test]
fn test_projectile_kill_credits_reward_once() {
    let dynamic = [
        "            ",
        "            ",
        "        s   ",
        "            ",
    ];
    let m = arena(&FLOOR, &dynamic, TileLayer::tile_center(1, 2));
    let mut level = load(&m);
    let mut timer = Timer::new();
    let config = MonsterConfig {
        health: 1,
        score: 20,
        ..MonsterConfig::for_species(Species::Spider)
    };
    level.monsters_mut()[0] = Monster::new(Species::Spider, config, TileLayer::tile_center(8, 2));

    let dt = 16.0;
    let fire = InputSnapshot {
        attack: true,
        ..Default::default()
    };
    let mut kills = Vec::new();
    let mut score_events = Vec::new();
    let mut t = 0.0;
    while t < 1500.0 {
        for p in level.projectiles_mut() {
            p.body.pos += p.body.vel * (dt / 1000.0) as f32;
        }
        let input = if t == 0.0 { fire } else { InputSnapshot::default() };
        let report = level.tick(t, &input, false, &mut timer);
        kills.extend(report.kills);
        score_events.extend(report.events.into_iter().filter(|e| {
            matches!(e, GameEvent::ScoreChanged(_) | GameEvent::MonsterKilled { .. })
        }));
        t += dt;
    }

    assert_eq!(kills.len(), 1);
    assert_eq!(kills[0].reward, 20);
    assert_eq!(level.player().score(), 20);
    assert!(!level.monsters()[0].is_alive());
    assert_eq!(
        score_events,
        vec![
            GameEvent::ScoreChanged(0),
            GameEvent::MonsterKilled {
                species: Species::Spider,
                reward: 20
            },
            GameEvent::ScoreChanged(20),
        ]
    );
    // The stopped projectile faded out and was dropped
    assert!(level.projectiles().is_empty());
}

#[test]
fn test_fall_death_then_restart_keeps_score() {
    let m = arena(&FLOOR, &EMPTY, TileLayer::tile_center(1, 2));
    let settings = Settings {
        start_level: "arena".into(),
        ..Settings::default()
    };
    let mut game = Game::new([m], settings).expect("game");
    let mut hud = HudState::default();
    game.level_mut().player_mut().set_score(30);
    game.level_mut().player_mut().body.pos.y = 4.0 * TILE_SIZE + 4.0;

    let report = game.tick(0.0, &InputSnapshot::default(), false, &mut hud);
    assert_eq!(report.signal, None);
    assert_eq!(hud.health, 0);
    assert_eq!(game.level().player().state(), PlayerState::Dead);

    let report = game.tick(RESTART_AFTER_DEATH_MS, &InputSnapshot::default(), false, &mut hud);
    assert_eq!(report.signal, None);

    let report = game.tick(
        RESTART_AFTER_DEATH_MS + 16.0,
        &InputSnapshot::default(),
        false,
        &mut hud,
    );
    assert_eq!(report.signal, Some(LevelSignal::Restart));
    let player = game.level().player();
    assert_eq!(player.health(), PLAYER_MAX_HEALTH);
    assert_eq!(player.score(), 30);
    assert_eq!(player.body.pos, TileLayer::tile_center(1, 2));
}

#[test]
fn test_key_opens_lock_once() {
    let dynamic = [
        "     L      ",
        "     L      ",
        "  K         ",
        "            ",
    ];
    let m = arena(&FLOOR, &dynamic, TileLayer::tile_center(2, 2));
    let mut level = load(&m);
    let mut timer = Timer::new();

    let report = level.tick(0.0, &InputSnapshot::default(), false, &mut timer);
    let opened: Vec<_> = report
        .events
        .iter()
        .filter(|e| matches!(e, GameEvent::LockOpened { .. }))
        .collect();
    assert_eq!(
        opened,
        vec![&GameEvent::LockOpened {
            name: "gate".into(),
            tiles: 2
        }]
    );
    assert!(level.dynamic().tile_at(2, 2).is_none());
    for ty in 0..2 {
        let gate = level.dynamic().tile_at(5, ty).expect("gate tile");
        assert!(!gate.collides);
        assert_eq!(gate.alpha, 0.5);
    }

    let report = level.tick(16.0, &InputSnapshot::default(), false, &mut timer);
    assert!(
        !report
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::LockOpened { .. }))
    );
}
