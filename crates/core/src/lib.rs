//! Area 51 Core - Scene Simulation
//!
//! Everything the Area 51 scene does between host callbacks: the viewpoint
//! state machine, the per-tick entity update, click selection and scene
//! placement. The crate never opens a window or draws; hosts feed it
//! [`SceneEvent`]s, carry out the returned [`BackendCommand`]s and render
//! from a [`RenderSnapshot`].
//!
//! # Rules
//!
//! 1. One owner - the host loop owns the [`Simulation`]; no globals
//! 2. The tick takes time from the timer event or a `TimeSource`, nothing else
//! 3. Randomness only through `SeededRandom`
//! 4. Dead entities are compacted once per tick with `retain`

pub mod config;
pub mod curve;
pub mod entities;
pub mod environment;
pub mod event;
pub mod input;
pub mod physics;
pub mod random;
pub mod selection;
pub mod simulation;
pub mod snapshot;
pub mod spawn;
pub mod store;
pub mod view;
pub mod viewpoint;

pub use config::{ConfigError, SceneConfig};
pub use curve::{ClosedCurve, CurveSampler, CurveSet};
pub use environment::Environment;
pub use event::{
    BackendCommand, ManualClock, MenuAction, PointerButton, SceneEvent, TimeSource, WallClock,
    WheelDirection,
};
pub use input::{Key, MoveInput};
pub use random::SeededRandom;
pub use selection::{PickId, SelectionOutcome};
pub use simulation::Simulation;
pub use snapshot::RenderSnapshot;
pub use store::SceneStore;
pub use view::ViewTransform;
pub use viewpoint::ViewMode;
