//! Pick ids and the selection resolver.
//!
//! The renderer draws every pickable entity with an 8-bit id and reports the
//! id under a click. Crate ids are handed out per snapshot in store order and
//! recorded in a [`PickTable`], so a click always resolves against the frame
//! the user actually saw.

use serde::{Deserialize, Serialize};

use crate::config::SceneConfig;
use crate::entities::EntityId;
use crate::environment::Environment;
use crate::store::SceneStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PickId(pub u8);

impl PickId {
    /// Background, nothing hit.
    pub const NONE: PickId = PickId(0);
    pub const CAT: PickId = PickId(88);
    pub const LAMP: PickId = PickId(99);

    pub const fn is_reserved(self) -> bool {
        self.0 == Self::NONE.0 || self.0 == Self::CAT.0 || self.0 == Self::LAMP.0
    }
}

/// Crate pick ids issued for one rendered frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PickTable {
    entries: Vec<(PickId, EntityId)>,
}

impl PickTable {
    /// Number crates 1-based in order, skipping reserved values. Crates past
    /// the 8-bit range are not pickable.
    pub fn assign(crates: impl IntoIterator<Item = EntityId>) -> Self {
        let mut entries = Vec::new();
        let mut next: u16 = 1;
        for id in crates {
            while next <= u8::MAX as u16 && PickId(next as u8).is_reserved() {
                next += 1;
            }
            if next > u8::MAX as u16 {
                break;
            }
            entries.push((PickId(next as u8), id));
            next += 1;
        }
        Self { entries }
    }

    pub fn lookup(&self, pick: PickId) -> Option<EntityId> {
        self.entries
            .iter()
            .find(|(p, _)| *p == pick)
            .map(|(_, id)| *id)
    }

    pub fn pick_for(&self, id: EntityId) -> Option<PickId> {
        self.entries
            .iter()
            .find(|(_, e)| *e == id)
            .map(|(p, _)| *p)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(PickId, EntityId)> {
        self.entries.iter()
    }
}

/// What a click did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionOutcome {
    Background,
    CatPoked,
    LampToggled { on: bool },
    CrateDestroyed { crate_id: EntityId, explosion: EntityId },
    /// Id unknown to the last frame, or its crate is already gone.
    Stale,
}

/// Apply a click that hit `pick` at scene time `now`.
pub fn resolve(
    pick: PickId,
    table: &PickTable,
    store: &mut SceneStore,
    environment: &mut Environment,
    config: &SceneConfig,
    now: f32,
) -> SelectionOutcome {
    match pick {
        PickId::NONE => SelectionOutcome::Background,
        PickId::CAT => {
            store.cat.collapsed = true;
            tracing::info!("MEOW");
            SelectionOutcome::CatPoked
        }
        PickId::LAMP => {
            environment.toggle_lamp();
            SelectionOutcome::LampToggled {
                on: environment.lamp,
            }
        }
        _ => destroy_crate(pick, table, store, config, now),
    }
}

fn destroy_crate(
    pick: PickId,
    table: &PickTable,
    store: &mut SceneStore,
    config: &SceneConfig,
    now: f32,
) -> SelectionOutcome {
    let Some(crate_id) = table.lookup(pick) else {
        tracing::warn!(pick = pick.0, "pick id not issued last frame");
        return SelectionOutcome::Stale;
    };
    let position = match store.crate_by_id_mut(crate_id) {
        Some(target) if target.alive => {
            target.alive = false;
            target.position
        }
        _ => {
            tracing::warn!(pick = pick.0, ?crate_id, "pick id refers to a destroyed crate");
            return SelectionOutcome::Stale;
        }
    };

    let explosion = store.spawn_explosion(
        position,
        config.explosion_size,
        config.explosion_frames,
        config.explosion_frame_duration,
        now,
    );
    tracing::debug!(?crate_id, ?explosion, "crate destroyed");
    SelectionOutcome::CrateDestroyed {
        crate_id,
        explosion,
    }
}
