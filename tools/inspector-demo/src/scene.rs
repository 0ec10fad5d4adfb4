//! Simulated scene hosting a few inspectable objects

use glam::Vec2;
use nethercore_inspector::{Color, DebugEnum, Inspect, ObjectWorld, debug_methods};

#[derive(DebugEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Team {
    Red,
    Blue,
}

#[derive(Inspect)]
#[debug_class(category = "Actors")]
pub struct Player {
    #[debug_property(order = -1)]
    pub speed: f32,
    #[debug_property]
    pub position: Vec2,
    #[debug_property(category = "Stats")]
    pub health: i32,
    #[debug_property(category = "Stats", read_only)]
    pub kills: u32,
    #[debug_property]
    pub team: Team,
    velocity: Vec2,
}

impl Player {
    pub fn new(team: Team, position: Vec2) -> Self {
        Self {
            speed: 3.0,
            position,
            health: 100,
            kills: 0,
            team,
            velocity: Vec2::X,
        }
    }
}

#[debug_methods]
impl Player {
    #[debug_method(category = "Cheats")]
    fn heal(&mut self, #[debug_param(default = 25)] amount: i32) -> i32 {
        self.health = (self.health + amount).min(100);
        self.health
    }

    #[debug_method(category = "Cheats", display_name = "Teleport")]
    fn teleport(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
    }

    #[debug_property(display_name = "Distance From Origin")]
    fn distance(&self) -> f32 {
        self.position.length()
    }
}

#[derive(Inspect)]
#[debug_class(category = "World", order = 1)]
pub struct Spawner {
    #[debug_property]
    pub rate: f32,
    #[debug_property]
    pub tint: Color,
    #[debug_property(read_only)]
    pub spawned: u32,
    timer: f32,
}

impl Spawner {
    pub fn new(rate: f32) -> Self {
        Self {
            rate,
            tint: Color::WHITE,
            spawned: 0,
            timer: 0.0,
        }
    }
}

#[debug_methods]
impl Spawner {
    #[debug_method]
    fn reset(&mut self) {
        self.spawned = 0;
        self.timer = 0.0;
    }
}

#[derive(Inspect)]
#[debug_class(display_name = "Clock")]
pub struct GameClock {
    #[debug_property(init_only)]
    pub started_at: u64,
    #[debug_property]
    pub time_scale: f32,
    elapsed: f64,
    paused: bool,
}

#[debug_methods]
impl GameClock {
    #[debug_property]
    fn elapsed(&self) -> f64 {
        self.elapsed
    }

    #[debug_property(setter = set_paused)]
    fn paused(&self) -> bool {
        self.paused
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
}

/// Host world with a fixed cast of objects
pub struct Scene {
    pub world: ObjectWorld,
}

impl Scene {
    pub fn new() -> Self {
        let world = ObjectWorld::new();
        world.spawn("Alice", Player::new(Team::Red, Vec2::new(-4.0, 0.0)));
        world.spawn("Bob", Player::new(Team::Blue, Vec2::new(4.0, 0.0)));
        world.spawn("Gate", Spawner::new(0.5));
        world.spawn(
            "Clock",
            GameClock {
                started_at: 1_700_000_000,
                time_scale: 1.0,
                elapsed: 0.0,
                paused: false,
            },
        );
        Self { world }
    }

    /// Advance every object by `dt` seconds
    pub fn step(&self, dt: f32) {
        let mut scaled = dt;
        for clock in self.world.find_objects::<GameClock>() {
            clock.with_mut(|clock: &mut GameClock| {
                if clock.paused {
                    scaled = 0.0;
                } else {
                    scaled = dt * clock.time_scale;
                    clock.elapsed += f64::from(scaled);
                }
            });
        }

        for player in self.world.find_objects::<Player>() {
            player.with_mut(|player: &mut Player| {
                player.position += player.velocity * player.speed * scaled;
                if player.position.x.abs() > 10.0 {
                    player.velocity = -player.velocity;
                }
            });
        }

        for spawner in self.world.find_objects::<Spawner>() {
            spawner.with_mut(|spawner: &mut Spawner| {
                spawner.timer += scaled;
                while spawner.rate > 0.0 && spawner.timer >= spawner.rate {
                    spawner.timer -= spawner.rate;
                    spawner.spawned += 1;
                }
            });
        }
    }
}
