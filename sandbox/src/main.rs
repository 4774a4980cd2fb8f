//! Headless sandbox: builds a small level, drops an actor into it and runs a
//! scripted input sequence, logging the actor's state.
//!
//! Usage: `sandbox [settings.toml]`. Log level comes from `RUST_LOG` (default `info`).

use std::{process::ExitCode, sync::Arc};

use kcc::{
    Actor, ActorInput, ActorSize, BoundingBox, ColliderShapeDef, ControllerSettings, Mesh,
    ModelTransform, StaticColliderDef, StaticWorld, Vec2, Vec3, get_elevation, probe, step_actor,
};
use nalgebra::Point3;

const SPAWN_XY: (f32, f32) = (-4.0, 0.0);
const SPAWN_DROP: f32 = 3.0;

fn level() -> StaticWorld {
    let terrain = Mesh::grid_plane(8.0, 8.0, 16, 16, |x, y| 0.15 * (x * 0.5).sin() * (y * 0.5).cos());

    let defs = vec![
        StaticColliderDef {
            id: 0,
            shape: ColliderShapeDef::Box {
                bounds: BoundingBox::new(Point3::new(-20.0, -20.0, -1.0), Point3::new(20.0, 20.0, 0.0)),
            },
            transform: None,
        },
        // Wall across the +x side of the arena.
        StaticColliderDef {
            id: 1,
            shape: ColliderShapeDef::Box {
                bounds: BoundingBox::new(Point3::new(-0.5, -10.0, 0.0), Point3::new(0.5, 10.0, 3.0)),
            },
            transform: Some(ModelTransform::at(Vec3::new(12.0, 0.0, 0.0))),
        },
        StaticColliderDef {
            id: 2,
            shape: ColliderShapeDef::Mesh {
                mesh: Arc::new(terrain),
            },
            transform: Some(ModelTransform::at(Vec3::new(4.0, 8.0, 0.3))),
        },
        StaticColliderDef {
            id: 3,
            shape: ColliderShapeDef::Mesh {
                mesh: Arc::new(Mesh::solid_box(Vec3::new(0.5, 0.5, 0.5))),
            },
            transform: Some(ModelTransform {
                position: Vec3::new(-2.0, 3.0, 0.5),
                rotation_angle_deg: 30.0,
                ..ModelTransform::default()
            }),
        },
    ];
    StaticWorld::from_defs(&defs)
}

/// Input for a given tick: stand, walk +x, jump once, then walk into the wall.
fn scripted_input(tick: u32) -> ActorInput {
    match tick {
        0..60 => ActorInput::default(),
        120 => ActorInput {
            direction: Vec2::new(1.0, 0.0),
            jump: true,
            ..ActorInput::default()
        },
        60..600 => ActorInput::walk(Vec2::new(1.0, 0.0)),
        _ => ActorInput::default(),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = match std::env::args().nth(1) {
        Some(path) => match ControllerSettings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("failed to load settings from {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => ControllerSettings::default(),
    };

    let world = level();
    let (x, y) = SPAWN_XY;
    let Some(floor) = get_elevation(&world, x, y, 100.0) else {
        log::error!("no ground under spawn point ({x}, {y})");
        return ExitCode::FAILURE;
    };

    let mut actor = Actor::new(ActorSize::SMALL);
    let mut position = Vec3::new(x, y, floor + SPAWN_DROP);
    log::info!("spawned actor at {position:?} (floor at {floor})");

    for tick in 0..720 {
        let input = scripted_input(tick);
        let report = step_actor(&world, &settings, &mut actor, &mut position, &input);
        if report.landed {
            log::info!("tick {tick}: landed at {position:?}");
        }
        if report.jumped {
            log::info!("tick {tick}: jumped");
        }
        if tick % 60 == 0 {
            log::info!(
                "tick {tick}: pos={position:?} vel={:?} grounded={}",
                actor.velocity,
                actor.grounded
            );
        }
    }

    let look = probe(&world, &(position + Vec3::new(0.0, 0.0, 1.0)), &Vec3::x(), 50.0);
    if look.hit {
        log::info!("facing a surface {:.2} m ahead at {:?}", look.distance, look.point);
    } else {
        log::info!("nothing ahead");
    }

    // How far this actor could still move along +x before its box touches something.
    let clearance_world = world.expanded(&actor.size);
    let run = probe(&clearance_world, &actor.size.center_at(&position), &Vec3::x(), 50.0);
    if run.hit {
        log::info!("clear run of {:.2} m along +x", run.distance);
    } else {
        log::info!("clear run along +x beyond 50 m");
    }

    ExitCode::SUCCESS
}
