//! Read-only copy of the scene handed to the renderer each frame.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::SceneConfig;
use crate::entities::{CurveFollower, EntityId, StaticActor};
use crate::environment::Environment;
use crate::selection::{PickId, PickTable};
use crate::store::SceneStore;
use crate::view::ViewTransform;
use crate::viewpoint::ViewMode;

/// Where to put one mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActorPose {
    pub position: Vec3,
    pub direction: Vec3,
    pub size: f32,
}

impl From<&StaticActor> for ActorPose {
    fn from(actor: &StaticActor) -> Self {
        Self {
            position: actor.position,
            direction: actor.direction,
            size: actor.size,
        }
    }
}

impl From<&CurveFollower> for ActorPose {
    fn from(actor: &CurveFollower) -> Self {
        Self {
            position: actor.position,
            direction: actor.direction,
            size: actor.size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrateView {
    pub id: EntityId,
    /// `None` when the crate is past the pickable range.
    pub pick: Option<PickId>,
    pub pose: ActorPose,
    pub rotation_speed: f32,
    /// Seconds since the crate was spawned; drives the spin.
    pub age: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExplosionView {
    pub pose: ActorPose,
    pub frame: u32,
    pub frame_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UfoView {
    pub position: Vec3,
    pub size: f32,
    pub rotation_angle: f32,
    pub scroll: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightState {
    pub fog: bool,
    pub lamp_position: Vec3,
    pub lamp_radius: f32,
    pub lamp_intensity: f32,
    pub flashlight: bool,
    pub flashlight_intensity: f32,
    pub flashlight_position: Vec3,
    pub flashlight_direction: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub time: f32,
    pub mode: ViewMode,
    pub view: ViewTransform,
    pub floor: ActorPose,
    pub scanner: ActorPose,
    pub alien: ActorPose,
    pub cargo: ActorPose,
    pub stop: ActorPose,
    pub swarm: ActorPose,
    pub swarm_b: ActorPose,
    /// Size is zero once the cat has been poked.
    pub cat: ActorPose,
    pub lamp: ActorPose,
    pub ufo: UfoView,
    pub crates: Vec<CrateView>,
    pub explosions: Vec<ExplosionView>,
    pub lights: LightState,
    pub picks: PickTable,
}

impl RenderSnapshot {
    pub fn capture(
        store: &SceneStore,
        environment: &Environment,
        config: &SceneConfig,
        mode: ViewMode,
        aspect: f32,
        time: f32,
    ) -> Self {
        let view = ViewTransform::from_viewpoint(&store.viewpoint, aspect);
        let picks = PickTable::assign(store.crates.iter().map(|c| c.id));

        let crates = store
            .crates
            .iter()
            .map(|c| CrateView {
                id: c.id,
                pick: picks.pick_for(c.id),
                pose: ActorPose {
                    position: c.position,
                    direction: c.direction,
                    size: c.size,
                },
                rotation_speed: c.rotation_speed,
                age: c.current_time - c.start_time,
            })
            .collect();

        let explosions = store
            .explosions
            .iter()
            .map(|e| ExplosionView {
                pose: ActorPose {
                    position: e.position,
                    direction: e.direction,
                    size: e.size,
                },
                frame: e.frame_index(),
                frame_count: e.frame_count,
            })
            .collect();

        let mut cat = ActorPose::from(&store.cat.actor);
        cat.size = store.cat.render_size();

        Self {
            time,
            mode,
            view,
            floor: ActorPose {
                position: store.floor.position,
                direction: Vec3::X,
                size: store.floor.size,
            },
            scanner: ActorPose::from(&store.scanner),
            alien: ActorPose::from(&store.alien),
            cargo: ActorPose::from(&store.cargo),
            stop: ActorPose::from(&store.stop),
            swarm: ActorPose::from(&store.swarm),
            swarm_b: ActorPose::from(&store.swarm_b),
            cat,
            lamp: ActorPose {
                position: store.lamp.position,
                direction: Vec3::X,
                size: store.lamp.size,
            },
            ufo: UfoView {
                position: store.ufo.position,
                size: store.ufo.size,
                rotation_angle: store.ufo.rotation_angle,
                scroll: store.ufo.scroll.value,
            },
            crates,
            explosions,
            lights: LightState {
                fog: environment.fog,
                lamp_position: store.lamp.position,
                lamp_radius: store.lamp.radius,
                lamp_intensity: environment.lamp_intensity(config),
                flashlight: environment.flashlight,
                flashlight_intensity: environment.flashlight_intensity,
                flashlight_position: view.eye,
                flashlight_direction: view.forward,
            },
            picks,
        }
    }
}
