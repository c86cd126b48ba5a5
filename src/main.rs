//! Tile Quest entry point
//!
//! Runs a headless session on a built-in demo level with scripted input. A
//! crude stand-in integrates bodies; real builds hand that job to the
//! physics engine of the host.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::path::PathBuf;

    use glam::Vec2;
    use tile_quest::consts::*;
    use tile_quest::highscores::{EntryMode, NameKeys};
    use tile_quest::hud::{format_elapsed, hearts};
    use tile_quest::sim::{
        Body, Game, GameObserver, HudState, InputSnapshot, LevelMap, MapObject, Species, Tile,
        TileLayer, TileProps,
    };
    use tile_quest::sim::triggers::{END_OF_GAME, SPAWN_POINT, START_OF_GAME};
    use tile_quest::{HighScores, NameEntry, Settings};

    /// Fixed simulation step (ms)
    const SIM_DT: f64 = 16.0;
    const MAX_TICKS: usize = 60_000 / SIM_DT as usize;

    const WORLD: [&str; 8] = [
        "                                        ",
        "                                        ",
        "                                        ",
        "                                        ",
        "                                        ",
        "                             #          ",
        "             HH              #   ~~     ",
        "########################################",
    ];

    const DYNAMIC: [&str; 8] = [
        "                                        ",
        "                                        ",
        "                                        ",
        "                                        ",
        "                    L                   ",
        "                    L                   ",
        "       $  $  K      L     r    s     $  ",
        "                                        ",
    ];

    fn world_tile(c: char) -> Option<Tile> {
        let mut props = TileProps::default();
        match c {
            '#' => return Some(Tile::solid(1)),
            'H' => props.heals = Some(1),
            '~' => {
                props.is_liquid = Some(true);
                props.gravity = Some(0.3);
            }
            _ => return None,
        }
        Some(Tile::new(2, props))
    }

    fn dynamic_tile(c: char) -> Option<Tile> {
        let mut props = TileProps::default();
        match c {
            '$' => props.pays = Some(5),
            'K' => props.opens = Some("gate".into()),
            'L' => {
                props.collides = true;
                props.name = Some("gate".into());
            }
            'r' => props.monster = Some(Species::Rat.marker().into()),
            's' => props.monster = Some(Species::Spider.marker().into()),
            _ => return None,
        }
        Some(Tile::new(3, props))
    }

    fn demo_map(name: &str) -> LevelMap {
        let mut sign = MapObject::region("sign", 96.0, 80.0, 48.0, 32.0);
        sign.properties.message = Some("Grab the key to open the gate".into());
        LevelMap {
            name: name.to_string(),
            world: TileLayer::from_ascii("World", &WORLD, world_tile),
            dynamic: TileLayer::from_ascii("Dynamic", &DYNAMIC, dynamic_tile),
            objects: vec![
                MapObject::region(SPAWN_POINT, 24.0, 104.0, 0.0, 0.0),
                MapObject::region(START_OF_GAME, 0.0, 64.0, 48.0, 48.0),
                sign,
                MapObject::region(END_OF_GAME, 560.0, 64.0, 80.0, 48.0),
            ],
        }
    }

    /// Integrate one body against the solid tiles
    fn step_body(body: &mut Body, layers: &[&TileLayer], dt: f32) {
        let solid = |p: Vec2| layers.iter().any(|l| l.is_solid_at(p));

        body.vel += body.accel * dt;
        if body.allow_gravity {
            body.vel.y += GRAVITY * body.gravity_scale * dt;
        }
        if body.accel.x == 0.0 {
            let brake = (body.drag.x * dt).min(body.vel.x.abs());
            body.vel.x -= brake * body.vel.x.signum();
        }
        body.vel = body.vel.clamp(-body.max_vel, body.max_vel);

        let half = body.size / 2.0;
        let next_x = body.pos.x + body.vel.x * dt;
        let ahead = Vec2::new(next_x + half.x.copysign(body.vel.x), body.pos.y);
        if body.vel.x != 0.0 && solid(ahead) {
            body.vel.x = 0.0;
        } else {
            body.pos.x = next_x;
        }

        body.pos.y += body.vel.y * dt;
        let feet = Vec2::new(body.pos.x, body.pos.y + half.y);
        body.grounded = body.vel.y >= 0.0 && solid(feet);
        if body.grounded {
            body.pos.y = (feet.y / TILE_SIZE).floor() * TILE_SIZE - half.y;
            body.vel.y = 0.0;
        }
    }

    fn step_physics(game: &mut Game) {
        let dt = (SIM_DT / 1000.0) as f32;
        let level = game.level_mut();
        let world = level.world().clone();
        let dynamic = level.dynamic().clone();
        let layers = [&world, &dynamic];
        step_body(&mut level.player_mut().body, &layers, dt);
        for monster in level.monsters_mut() {
            step_body(&mut monster.body, &layers, dt);
        }
        for projectile in level.projectiles_mut() {
            projectile.body.pos += projectile.body.vel * dt;
        }
    }

    /// Console presentation: HUD values plus the name entry screen
    #[derive(Default)]
    struct Console {
        hud: HudState,
        names: NameEntry,
    }

    impl GameObserver for Console {
        fn on_health_changed(&mut self, health: i32) {
            self.hud.on_health_changed(health);
            log::debug!("Health {health} {:?}", hearts(health));
        }

        fn on_score_changed(&mut self, score: u32) {
            self.hud.on_score_changed(score);
        }

        fn on_time_changed(&mut self, elapsed_ms: f64) {
            self.hud.on_time_changed(elapsed_ms);
        }

        fn on_message(&mut self, message: Option<&str>) {
            self.hud.on_message(message);
            if let Some(text) = message {
                log::info!("Message: {text}");
            }
        }

        fn on_monster_killed(&mut self, species: Species, reward: u32) {
            log::info!("{species:?} defeated (+{reward})");
        }

        fn on_lock_opened(&mut self, name: &str) {
            log::info!("Lock '{name}' is open");
        }

        fn on_score_entry_reset(&mut self) {
            self.names.on_score_entry_reset();
        }

        fn on_end_of_game(&mut self, score: u32) {
            log::info!(
                "End of game: score {score}, time {}",
                format_elapsed(self.hud.elapsed_ms)
            );
            self.names.on_end_of_game(score);
        }
    }

    /// Walk right, shooting now and then
    fn scripted_input(tick: usize) -> InputSnapshot {
        let keyboard = InputSnapshot {
            right: true,
            up: tick % 90 == 0,
            ..Default::default()
        };
        let gamepad = (tick % 20 < 2).then_some(InputSnapshot {
            attack: true,
            ..Default::default()
        });
        InputSnapshot::combine([Some(keyboard), gamepad])
    }

    /// Type "AB" and submit
    fn scripted_name_keys(step: usize) -> NameKeys {
        match step {
            0 => NameKeys {
                next_digit: true,
                ..Default::default()
            },
            2 => NameKeys {
                next_char: true,
                ..Default::default()
            },
            4 => NameKeys {
                done: true,
                ..Default::default()
            },
            _ => NameKeys::default(),
        }
    }

    /// Settings from the file named by the first argument, or defaults
    pub fn settings() -> Settings {
        std::env::args()
            .nth(1)
            .map(PathBuf::from)
            .map(|path| Settings::load_or_default(&path))
            .unwrap_or_default()
    }

    pub fn run(settings: Settings) -> tile_quest::Result<()> {
        let settings = Settings {
            start_level: "demo".to_string(),
            ..settings
        };
        let highscore_path = settings.highscore_path.clone();
        let mut scores = HighScores::load(&highscore_path)?;
        let mut game = Game::new([demo_map("demo")], settings)?;
        let mut console = Console::default();

        let mut name_step = 0;
        for tick in 0..MAX_TICKS {
            let time = tick as f64 * SIM_DT;
            step_physics(&mut game);
            game.tick(time, &scripted_input(tick), false, &mut console);

            if console.names.mode() == EntryMode::EnteringName {
                let keys = scripted_name_keys(name_step);
                name_step += 1;
                if let Some(rank) = console.names.update(time, &keys, &mut scores) {
                    log::info!("Entered high score table at rank {rank}");
                    scores.save(&highscore_path)?;
                    break;
                }
            }
        }

        println!(
            "Score {} | Health {:?} | Time {}",
            console.hud.score,
            hearts(console.hud.health),
            format_elapsed(console.hud.elapsed_ms)
        );
        for (i, entry) in scores.top(tile_quest::highscores::SHOWN_HIGH_SCORES).iter().enumerate() {
            println!(
                "{:>4} {:>6} {}",
                tile_quest::highscores::ordinal(i + 1),
                entry.score,
                entry.name
            );
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    let mut logger = env_logger::Builder::from_default_env();
    // Settings are read before the logger exists, so their own log lines are lost
    let settings = demo::settings();
    if settings.debug {
        logger.filter_module("tile_quest", log::LevelFilter::Debug);
    }
    logger.init();
    log::info!("Tile Quest (native) starting...");
    if let Err(err) = demo::run(settings) {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives the simulation through the library
}
