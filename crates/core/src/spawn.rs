//! Scene (re)load and random placement.

use glam::Vec3;

use crate::config::SceneConfig;
use crate::curve::{CurveId, CurveSet};
use crate::entities::{
    Cat, Crate, CurveFollower, EntityIdGenerator, Exclusion, Floor, Lamp, PingPong, StaticActor,
    Ufo, Viewpoint,
};
use crate::physics::{normalize_or_keep, planar_distance, point_in_sphere};
use crate::random::SeededRandom;
use crate::store::SceneStore;
use crate::viewpoint::{self, ViewMode};

const FLOOR_POSITION: Vec3 = Vec3::new(0.0, 0.0, -0.015);
const ALIEN_ANCHOR: Vec3 = Vec3::new(0.0, 0.0, 0.065);
const SCANNER_ANCHOR: Vec3 = Vec3::new(0.0, 0.0, 0.5);
const CARGO_POSITION: Vec3 = Vec3::new(0.0, 1.0, 0.1);
const CARGO_DIRECTION: Vec3 = Vec3::new(-0.8, -0.7, 0.0);
const STOP_POSITION: Vec3 = Vec3::new(0.8, 0.0, 0.1);
const STOP_DIRECTION: Vec3 = Vec3::new(-0.2, 1.0, 0.0);
const SWARM_POSITION: Vec3 = Vec3::new(0.8, 0.2, 0.03);
const SWARM_DIRECTION: Vec3 = Vec3::new(-1.0, 0.1, 0.0);
const SWARM_B_POSITION: Vec3 = Vec3::new(-0.15, -0.55, 0.07);
const SWARM_B_DIRECTION: Vec3 = Vec3::new(-0.42, -0.9, 0.0);
const SWARM_B_SCALE: f32 = 1.5;
const CAT_HEIGHT: f32 = 0.02;
const LAMP_POSITION: Vec3 = Vec3::new(0.0, 0.4, 0.1);
const LAMP_RADIUS: f32 = 0.2;
const UFO_POSITION: Vec3 = Vec3::new(-0.5, -0.4, 0.2);
const UFO_SIZE: f32 = 0.1;
const UFO_TILT_DEG: f32 = 5.0;

/// Sample a ground position clear of the viewpoint and the cargo.
///
/// Rejection sampling over the placement rectangle. After
/// `placement_max_attempts` misses the best candidate seen so far is returned
/// and a warning is logged; `SceneConfig::validate` makes that unreachable
/// for sane constants.
pub fn generate_random_position(
    config: &SceneConfig,
    rng: &mut SeededRandom,
    viewpoint: Vec3,
    cargo: Vec3,
) -> Vec3 {
    let camera_clearance = config.camera_clearance();
    let cargo_clearance = config.cargo_clearance();

    let mut best = Vec3::new(config.placement_min.x, config.placement_min.y, config.placement_height);
    let mut best_margin = f32::NEG_INFINITY;

    for _ in 0..config.placement_max_attempts {
        let xy = rng.next_in_rect(config.placement_min, config.placement_max);
        let candidate = Vec3::new(xy.x, xy.y, config.placement_height);

        let near_camera = point_in_sphere(candidate, viewpoint, camera_clearance);
        let near_cargo = point_in_sphere(candidate, cargo, cargo_clearance);
        if !near_camera && !near_cargo {
            return candidate;
        }

        let margin = (candidate.distance(viewpoint) - camera_clearance)
            .min(candidate.distance(cargo) - cargo_clearance);
        if margin > best_margin {
            best_margin = margin;
            best = candidate;
        }
    }

    tracing::warn!(
        attempts = config.placement_max_attempts,
        ?best,
        "placement gave up, using best candidate"
    );
    best
}

/// Build a fresh scene at scene time `now`.
///
/// The viewpoint starts on preset A; exclusion radii are measured from there.
pub fn build_scene(
    config: &SceneConfig,
    curves: &CurveSet,
    rng: &mut SeededRandom,
    now: f32,
) -> SceneStore {
    let mut entity_ids = EntityIdGenerator::new();

    let mut camera = Viewpoint::new(config.camera_size);
    viewpoint::apply_preset(&mut camera, ViewMode::FixedPresetA, now);

    let floor = Floor {
        position: FLOOR_POSITION,
        size: config.floor_size,
    };

    let mut alien = CurveFollower {
        anchor: ALIEN_ANCHOR,
        position: ALIEN_ANCHOR,
        direction: Vec3::X,
        size: config.alien_size,
        exclusion: None,
        curve: CurveId::Alien,
        tracks_position: false,
        time_scale: config.alien_time_scale,
        start_time: now,
    };
    sample_follower(&mut alien, curves, now);
    alien.exclusion = Some(Exclusion::new(
        planar_distance(camera.position, alien.position),
        config.alien_exclusion_floor,
    ));

    let cargo = StaticActor {
        position: CARGO_POSITION,
        direction: CARGO_DIRECTION,
        size: config.cargo_size,
        exclusion: None,
    };

    let cat_position = generate_random_position(config, rng, camera.position, cargo.position);
    let cat_direction = normalize_or_keep(rng.next_planar_direction(), Vec3::X);
    let cat = Cat {
        actor: StaticActor {
            position: Vec3::new(cat_position.x, cat_position.y, CAT_HEIGHT),
            direction: cat_direction,
            size: config.cat_size,
            exclusion: None,
        },
        collapsed: false,
    };

    let stop = StaticActor {
        position: STOP_POSITION,
        direction: STOP_DIRECTION,
        size: config.stop_size,
        exclusion: None,
    };

    let swarm = StaticActor {
        position: SWARM_POSITION,
        direction: SWARM_DIRECTION,
        size: config.swarm_size,
        exclusion: Some(Exclusion::new(
            planar_distance(camera.position, SWARM_POSITION),
            config.swarm_exclusion_floor,
        )),
    };

    let swarm_b = StaticActor {
        position: SWARM_B_POSITION,
        direction: SWARM_B_DIRECTION,
        size: config.swarm_size * SWARM_B_SCALE,
        exclusion: Some(Exclusion::new(
            planar_distance(camera.position, SWARM_B_POSITION),
            config.swarm_b_exclusion_floor,
        )),
    };

    let mut scanner = CurveFollower {
        anchor: SCANNER_ANCHOR,
        position: SCANNER_ANCHOR,
        direction: Vec3::X,
        size: config.scanner_size,
        exclusion: None,
        curve: CurveId::Scanner,
        tracks_position: true,
        time_scale: config.scanner_time_scale,
        start_time: now,
    };
    sample_follower(&mut scanner, curves, now);

    let lamp = Lamp {
        position: LAMP_POSITION,
        size: config.lamp_size,
        radius: LAMP_RADIUS,
    };

    let ufo = Ufo {
        position: UFO_POSITION,
        size: UFO_SIZE,
        rotation_angle: UFO_TILT_DEG.to_radians(),
        scroll: PingPong::new(config.ufo_lower, config.ufo_upper, config.ufo_step),
    };

    let mut crates = Vec::with_capacity(config.crate_count);
    for _ in 0..config.crate_count {
        let direction = normalize_or_keep(rng.next_planar_direction(), Vec3::X);
        let position = generate_random_position(config, rng, camera.position, cargo.position);
        crates.push(Crate {
            id: entity_ids.next(),
            position,
            direction,
            size: config.crate_size,
            rotation_speed: rng.next_unit(),
            alive: true,
            start_time: now,
            current_time: now,
        });
    }

    tracing::debug!(crates = crates.len(), seed = rng.seed(), "scene built");

    SceneStore {
        viewpoint: camera,
        floor,
        scanner,
        alien,
        cargo,
        stop,
        swarm,
        swarm_b,
        cat,
        lamp,
        ufo,
        crates,
        explosions: Vec::new(),
        entity_ids,
    }
}

/// Pose a curve follower for scene time `now`.
pub fn sample_follower(follower: &mut CurveFollower, curves: &CurveSet, now: f32) {
    let curve = curves.get(follower.curve);
    let t = follower.parameter_at(now);
    follower.position = if follower.tracks_position {
        follower.anchor + curve.evaluate(t)
    } else {
        follower.anchor
    };
    follower.direction = normalize_or_keep(curve.evaluate_derivative(t), follower.direction);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_respects_both_clearances() {
        let config = SceneConfig::default();
        let mut rng = SeededRandom::new(12345);
        let camera = Vec3::new(0.0, 0.0, 0.09);
        let cargo = Vec3::new(0.0, 1.0, 0.1);

        for _ in 0..2000 {
            let p = generate_random_position(&config, &mut rng, camera, cargo);
            assert!(p.distance(camera) > config.camera_clearance());
            assert!(p.distance(cargo) > config.cargo_clearance());
            assert!(p.x >= config.placement_min.x && p.x < config.placement_max.x);
            assert!(p.y >= config.placement_min.y && p.y < config.placement_max.y);
            assert_eq!(p.z, config.placement_height);
        }
    }

    #[test]
    fn placement_terminates_when_rectangle_is_covered() {
        let config = SceneConfig {
            cargo_size: 5.0,
            placement_max_attempts: 50,
            ..SceneConfig::default()
        };
        let mut rng = SeededRandom::new(7);
        let p = generate_random_position(&config, &mut rng, Vec3::ZERO, Vec3::new(0.5, 0.5, 0.0));
        assert!(p.x >= config.placement_min.x && p.x < config.placement_max.x);
    }

    #[test]
    fn scene_has_configured_crate_count() {
        let config = SceneConfig::default();
        let mut rng = SeededRandom::new(3);
        let store = build_scene(&config, &CurveSet::builtin().unwrap(), &mut rng, 0.0);

        assert_eq!(store.crates.len(), config.crate_count);
        assert!(store.crates.iter().all(|c| c.alive));
        assert!(store
            .crates
            .iter()
            .all(|c| (c.direction.length() - 1.0).abs() < 1e-4));
        assert!(store
            .crates
            .iter()
            .all(|c| (0.0..1.0).contains(&c.rotation_speed)));
        assert!(store.explosions.is_empty());
    }

    #[test]
    fn exclusion_radii_start_at_camera_distance() {
        let config = SceneConfig::default();
        let mut rng = SeededRandom::new(3);
        let store = build_scene(&config, &CurveSet::builtin().unwrap(), &mut rng, 0.0);
        let eye = store.viewpoint.position;

        let swarm = store.swarm.exclusion.unwrap();
        assert!((swarm.radius - planar_distance(eye, store.swarm.position)).abs() < 1e-6);
        assert_eq!(swarm.floor, config.swarm_exclusion_floor);

        let alien = store.alien.exclusion.unwrap();
        assert!((alien.radius - planar_distance(eye, store.alien.position)).abs() < 1e-6);
        assert_eq!(store.swarm_b.exclusion.unwrap().floor, config.swarm_b_exclusion_floor);
    }

    #[test]
    fn same_seed_builds_same_scene() {
        let config = SceneConfig::default();
        let curves = CurveSet::builtin().unwrap();
        let a = build_scene(&config, &curves, &mut SeededRandom::new(42), 0.0);
        let b = build_scene(&config, &curves, &mut SeededRandom::new(42), 0.0);
        let pa: Vec<Vec3> = a.crates.iter().map(|c| c.position).collect();
        let pb: Vec<Vec3> = b.crates.iter().map(|c| c.position).collect();
        assert_eq!(pa, pb);
        assert_eq!(a.cat.actor.position, b.cat.actor.position);
    }

    #[test]
    fn followers_start_on_their_curves() {
        let config = SceneConfig::default();
        let curves = CurveSet::builtin().unwrap();
        let store = build_scene(&config, &curves, &mut SeededRandom::new(1), 0.0);
        let expected = store.scanner.anchor + curves.get(CurveId::Scanner).evaluate(0.0);
        assert!((store.scanner.position - expected).length() < 1e-6);
        assert!((store.alien.direction.length() - 1.0).abs() < 1e-4);
        assert_eq!(store.alien.position, store.alien.anchor);
    }
}
