use glam::Vec2;
use rein2d::{
    App, BallCollider, BoxCollider, ColliderHandle, ColliderKind, ColliderSettings,
    CollisionRepository, EngineConfig, GlobalTransform, RigidBody, SystemContext, Tilemap,
    TilemapCollider, Transform, run_app,
};

const FRAMES: u32 = 600;
const COIN_LAYER: &str = "coin";

/// Headless sandbox: balls rain onto a tilemap floor and a ramp of crates
/// while a sensor coin reports who touches it.
struct SandboxApp {
    frames: u32,
    balls: Vec<hecs::Entity>,
    coin: Option<hecs::Entity>,
}

impl App for SandboxApp {
    fn init(&mut self, world: &mut hecs::World) -> anyhow::Result<()> {
        // Floor: 40 tiles wide, a pit in the middle and two pillars
        let width = 40;
        let mut tiles = vec![0; width * 6];
        for x in 0..width {
            if !(18..22).contains(&x) {
                tiles[5 * width + x] = 1;
            }
        }
        for y in 2..5 {
            tiles[y * width + 4] = 1;
            tiles[y * width + 35] = 1;
        }
        world.spawn((
            Transform::from_position(Vec2::new(0.0, 96.0)),
            GlobalTransform::default(),
            RigidBody::new_static(),
            Tilemap::new(width, 16.0, 16.0, tiles),
            TilemapCollider::new(true),
        ));

        // Crates on the floor
        for i in 0..3 {
            world.spawn((
                Transform::from_position(Vec2::new(120.0 + i as f32 * 40.0, 20.0))
                    .with_rotation(0.1 * i as f32),
                GlobalTransform::default(),
                RigidBody::new_static(),
                BoxCollider::new(24.0, 24.0),
            ));
        }

        self.coin = Some(world.spawn((
            Transform::from_position(Vec2::new(480.0, 24.0)),
            GlobalTransform::default(),
            BallCollider::new(6.0)
                .with_settings(ColliderSettings::default().with_layer(COIN_LAYER).sensor()),
        )));

        for i in 0..24 {
            let x = 40.0 + (i % 12) as f32 * 45.0;
            let y = 160.0 + (i / 12) as f32 * 30.0;
            let ball = world.spawn((
                Transform::from_position(Vec2::new(x, y)),
                GlobalTransform::default(),
                RigidBody::new_dynamic()
                    .with_gravity(300.0)
                    .with_velocity(Vec2::new(if i % 2 == 0 { 20.0 } else { -20.0 }, 0.0)),
                BallCollider::new(7.0),
            ));
            self.balls.push(ball);
        }

        log::info!("sandbox spawned {} entities", world.len());
        Ok(())
    }

    fn update(&mut self, world: &mut hecs::World, ctx: &SystemContext) {
        if self.frames % 60 == 0 {
            let resting = self
                .balls
                .iter()
                .filter(|ball| {
                    world
                        .get::<&RigidBody>(**ball)
                        .is_ok_and(|rb| rb.velocity.y == 0.0)
                })
                .count();
            log::info!(
                "t = {:.2}s: {resting}/{} balls resting",
                ctx.elapsed_time,
                self.balls.len()
            );
        }
    }

    fn physics_update(
        &mut self,
        world: &mut hecs::World,
        collisions: &CollisionRepository,
        _dt: f32,
    ) {
        let Some(coin) = self.coin else {
            return;
        };
        let handle = ColliderHandle::new(coin, ColliderKind::Ball);
        let touching: Vec<_> = collisions
            .find_collisions_for_collider(handle)
            .map(|c| c.remote_entity)
            .collect();
        if touching.is_empty() {
            return;
        }

        log::info!("coin collected by {:?}", touching);
        if world.despawn(coin).is_ok() {
            self.coin = None;
        }
    }

    fn render(&mut self, _world: &hecs::World, _ctx: &SystemContext) {
        self.frames += 1;
    }

    fn running(&self) -> bool {
        self.frames < FRAMES
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = EngineConfig {
        max_frame_rate: Some(120),
        ..EngineConfig::default()
    };
    let app = SandboxApp {
        frames: 0,
        balls: Vec::new(),
        coin: None,
    };
    run_app(config, app)
}
