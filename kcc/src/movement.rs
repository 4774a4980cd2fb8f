use crate::actor::Actor;
use crate::collision::{
    ColliderRegistry, RayCollision, Vec2, Vec3,
    ground::{self, probe_ground},
    kinematic::{resolve_sweep, sweep},
    ray,
    settings::{MIN_MOVE_SQ, SEPARATING_SPEED_EPS},
};
use crate::math;
use crate::motion::{accelerate, apply_friction, apply_gravity, is_walkable, wish_direction};
use crate::settings::ControllerSettings;

/// Caller intent for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActorInput {
    /// Desired planar direction; any length, zero for none.
    pub direction: Vec2,
    pub jump: bool,
    /// Measured frame time in ticks (`1.0` at exactly 60 Hz).
    pub frame_scale: f32,
}

impl Default for ActorInput {
    fn default() -> Self {
        Self {
            direction: Vec2::zeros(),
            jump: false,
            frame_scale: 1.0,
        }
    }
}

impl ActorInput {
    #[inline]
    pub fn walk(direction: Vec2) -> Self {
        Self {
            direction,
            ..Self::default()
        }
    }

    #[inline]
    pub fn jump() -> Self {
        Self {
            jump: true,
            ..Self::default()
        }
    }
}

/// What happened during one `step_actor()` tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepReport {
    /// The ground probe found walkable support under the feet.
    pub supported: bool,
    /// Grounded was (re)established this tick.
    pub landed: bool,
    pub jumped: bool,
    /// Contacts evaluated by the sweep.
    pub contacts: usize,
    /// Deepest walkable sweep contact, if any.
    pub ground_point: Option<Vec3>,
}

/// Advance one actor by one tick.
///
/// Behavior
/// - Probes for walkable ground below the feet and snaps to the hover height.
/// - Applies gravity when airborne, friction when grounded, then accelerates
///   toward the input with the grounded or airborne speed cap.
/// - Keeps a supported actor's velocity in the ground plane (which also stops
///   it digging in on landing) and applies a requested jump.
/// - Sweeps the actor volume at its tentative position and shortens the move
///   so it stops a contact margin short of whatever it hits.
/// - Refreshes the grace counter on any ground contact, counts it down otherwise.
///
/// `actor` and `position` are updated in place; the tick never fails.
pub fn step_actor<R: ColliderRegistry + ?Sized>(
    registry: &R,
    settings: &ControllerSettings,
    actor: &mut Actor,
    position: &mut Vec3,
    input: &ActorInput,
) -> StepReport {
    actor.debug_validate(position);

    let dt = settings.tick_seconds(input.frame_scale);
    let min_up = settings.min_walkable_up();
    let was_grounded = actor.is_grounded();
    let mut report = StepReport::default();

    // 1) Ground probe. Moving along a slope keeps probing; only an actor
    //    moving away from its last ground plane (a jump) is left alone.
    let separating = actor.velocity.dot(&actor.ground_normal) > SEPARATING_SPEED_EPS;
    if !separating {
        let hit = probe_ground(registry, &actor.size, position, settings.ground_probe_distance)
            .filter(|probe| is_walkable(&probe.normal, min_up));
        if let Some(probe) = hit {
            report.supported = true;
            actor.ground_normal = probe.normal;
            let snap = ground::snap_offset(&probe, settings.ground_hover, settings.snap_tolerance);
            if let Some(offset) = snap {
                *position += offset;
            }
        }
    }

    let grounded_now = report.supported || was_grounded;
    let mut velocity = actor.velocity;

    // 2) Gravity.
    if !grounded_now {
        velocity = apply_gravity(velocity, settings.gravity * dt, settings.terminal_fall_speed);
    }

    // 3) Horizontal control.
    if grounded_now {
        velocity = apply_friction(velocity, settings.friction * dt, settings.stop_speed);
    }

    let ground_normal = grounded_now.then_some(&actor.ground_normal);
    if let Some(wish) = wish_direction(&input.direction, ground_normal) {
        let max_speed = if grounded_now {
            settings.ground_max_speed
        } else {
            settings.air_max_speed
        };
        velocity = accelerate(velocity, &wish, max_speed, settings.acceleration * dt);
    }

    // Supported actors move within the ground plane. On landing this drops
    // the velocity driving into the ground; on a slope it removes the drift
    // friction leaves in the plane normal.
    if report.supported {
        velocity = math::clip_vector(&velocity, &actor.ground_normal);
    }

    if grounded_now && !was_grounded {
        report.landed = true;
        log::debug!("actor landed at {position:?}");
    }

    if input.jump && grounded_now {
        velocity.z += settings.jump_speed;
        report.jumped = true;
        log::debug!("actor jumped at {position:?}");
    }

    // 4) Sweep and resolve.
    let displacement = velocity * dt;
    let mut sweep_ground = None;
    if displacement.norm_squared() > MIN_MOVE_SQ {
        let hits = sweep(registry, &actor.size, position, &displacement);
        let outcome = resolve_sweep(&displacement, &velocity, &hits, settings);
        *position += outcome.displacement;
        velocity = outcome.velocity;
        report.contacts = outcome.contacts;
        sweep_ground = outcome.ground;
    }

    // 5) Ground state.
    if let Some(ground) = sweep_ground {
        actor.ground_normal = ground.normal;
        report.ground_point = Some(ground.point);
    }

    actor.grounded = if report.jumped {
        0
    } else if report.supported || sweep_ground.is_some() {
        settings.ground_grace_ticks
    } else {
        actor.grounded.saturating_sub(1)
    };
    actor.velocity = velocity;

    log::trace!(
        "step: pos={position:?} vel={:?} grounded={} contacts={}",
        actor.velocity,
        actor.grounded,
        report.contacts
    );

    actor.debug_validate(position);
    report
}

/// Gameplay ray query (e.g. pointer picking) against the same colliders the
/// controller uses.
#[inline]
pub fn probe<R: ColliderRegistry + ?Sized>(
    registry: &R,
    origin: &Vec3,
    direction: &Vec3,
    max_distance: f32,
) -> RayCollision {
    ray::cast_ray(registry, origin, direction, max_distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorSize;
    use crate::collision::{BoundingBox, Point3, StaticWorld, UP};
    use approx::assert_relative_eq;

    fn flat_world() -> StaticWorld {
        let mut world = StaticWorld::new();
        world.push_box(
            BoundingBox::new(Point3::new(-50.0, -50.0, -1.0), Point3::new(50.0, 50.0, 0.0)),
            None,
        );
        world
    }

    fn settled(size: ActorSize) -> (Actor, Vec3) {
        let mut actor = Actor::new(size);
        actor.grounded = ControllerSettings::default().ground_grace_ticks;
        (actor, Vec3::new(0.0, 0.0, ControllerSettings::default().ground_hover))
    }

    #[test]
    fn resting_actor_does_not_move() {
        let world = flat_world();
        let settings = ControllerSettings::default();
        for size in [ActorSize::Point, ActorSize::SMALL] {
            let mut actor = Actor::new(size);
            let mut pos = Vec3::new(0.0, 0.0, settings.ground_hover);
            let start = pos;
            let report = step_actor(&world, &settings, &mut actor, &mut pos, &ActorInput::default());
            assert!(report.supported);
            assert_eq!((pos - start).norm(), 0.0);
            assert_eq!(actor.velocity, Vec3::zeros());
            assert_eq!(actor.grounded, settings.ground_grace_ticks);
        }
    }

    #[test]
    fn probe_snaps_down_to_hover() {
        let world = flat_world();
        let settings = ControllerSettings::default();
        let mut actor = Actor::new(ActorSize::SMALL);
        let mut pos = Vec3::new(0.0, 0.0, 0.2);
        let report = step_actor(&world, &settings, &mut actor, &mut pos, &ActorInput::default());
        assert!(report.supported && report.landed);
        assert_relative_eq!(pos.z, settings.ground_hover, epsilon = 1.0e-5);
    }

    #[test]
    fn grounded_walk_is_capped_at_ground_speed() {
        let world = flat_world();
        let settings = ControllerSettings::default();
        let (mut actor, mut pos) = settled(ActorSize::SMALL);
        for _ in 0..120 {
            step_actor(&world, &settings, &mut actor, &mut pos, &ActorInput::walk(Vec2::new(1.0, 0.0)));
        }
        assert!(actor.is_grounded());
        assert!(actor.velocity.x > 0.0);
        assert!(actor.velocity.x <= settings.ground_max_speed + 1.0e-4);
        assert_relative_eq!(pos.z, settings.ground_hover, epsilon = 1.0e-4);
    }

    #[test]
    fn airborne_control_is_capped_at_air_speed() {
        let world = StaticWorld::new();
        let settings = ControllerSettings::default();
        let mut actor = Actor::new(ActorSize::Point);
        let mut pos = Vec3::new(0.0, 0.0, 100.0);
        for _ in 0..60 {
            step_actor(&world, &settings, &mut actor, &mut pos, &ActorInput::walk(Vec2::new(0.0, 1.0)));
        }
        assert!(!actor.is_grounded());
        assert!(actor.velocity.y <= settings.air_max_speed + 1.0e-4);
        assert!(actor.velocity.z < 0.0);
    }

    #[test]
    fn grace_window_counts_down_after_leaving_ground() {
        let world = StaticWorld::new();
        let settings = ControllerSettings::default();
        let (mut actor, mut pos) = settled(ActorSize::Point);
        let start_z = pos.z;

        step_actor(&world, &settings, &mut actor, &mut pos, &ActorInput::default());
        assert_eq!(actor.grounded, settings.ground_grace_ticks - 1);
        // Still grounded inside the window, so no gravity yet.
        assert_eq!(actor.velocity.z, 0.0);
        assert_eq!(pos.z, start_z);

        for _ in 1..settings.ground_grace_ticks {
            step_actor(&world, &settings, &mut actor, &mut pos, &ActorInput::default());
        }
        assert_eq!(actor.grounded, 0);
        step_actor(&world, &settings, &mut actor, &mut pos, &ActorInput::default());
        assert!(actor.velocity.z < 0.0);
    }

    #[test]
    fn jump_clears_grounded_and_rises() {
        let world = flat_world();
        let settings = ControllerSettings::default();
        let (mut actor, mut pos) = settled(ActorSize::SMALL);
        let report = step_actor(&world, &settings, &mut actor, &mut pos, &ActorInput::jump());
        assert!(report.jumped);
        assert_eq!(actor.grounded, 0);
        assert_relative_eq!(actor.velocity.z, settings.jump_speed);
        assert!(pos.z > settings.ground_hover);

        // No double jump while airborne.
        let report = step_actor(&world, &settings, &mut actor, &mut pos, &ActorInput::jump());
        assert!(!report.jumped);
        assert!(actor.velocity.z < settings.jump_speed);
    }

    #[test]
    fn probe_reuses_the_registry() {
        let world = flat_world();
        let hit = probe(&world, &Vec3::new(1.0, 1.0, 3.0), &-UP, 10.0);
        assert!(hit.hit);
        assert_relative_eq!(hit.distance, 3.0, epsilon = 1.0e-5);
        assert!(!probe(&world, &Vec3::new(1.0, 1.0, 3.0), &UP, 10.0).hit);
    }
}
