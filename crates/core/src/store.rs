//! The live collection of scene entities.
//!
//! Singletons are fields; crates and explosions are ordered vectors compacted
//! once per tick with `retain`, never erased while iterating.

use glam::Vec3;

use crate::entities::{
    Cat, Crate, CurveFollower, EntityId, EntityIdGenerator, Exclusion, Explosion, Floor, Lamp,
    StaticActor, Ufo, Viewpoint,
};

/// Everything that exists in the scene.
#[derive(Debug, Clone)]
pub struct SceneStore {
    pub viewpoint: Viewpoint,
    pub floor: Floor,
    pub scanner: CurveFollower,
    pub alien: CurveFollower,
    pub cargo: StaticActor,
    pub stop: StaticActor,
    pub swarm: StaticActor,
    pub swarm_b: StaticActor,
    pub cat: Cat,
    pub lamp: Lamp,
    pub ufo: Ufo,
    pub crates: Vec<Crate>,
    pub explosions: Vec<Explosion>,
    pub entity_ids: EntityIdGenerator,
}

/// Which actor an exclusion disc belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionOwner {
    Alien,
    Swarm,
    SwarmB,
}

impl SceneStore {
    /// Drop destroyed crates, keeping the order of the rest.
    pub fn reap_crates(&mut self) -> usize {
        let before = self.crates.len();
        self.crates.retain(|c| c.alive);
        let removed = before - self.crates.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = self.crates.len(), "reaped crates");
        }
        removed
    }

    /// Age every explosion to `now` and drop the finished ones.
    pub fn age_explosions(&mut self, now: f32) -> usize {
        for explosion in &mut self.explosions {
            explosion.age_to(now);
        }
        let before = self.explosions.len();
        self.explosions.retain(|e| e.alive);
        before - self.explosions.len()
    }

    pub fn crate_by_id(&self, id: EntityId) -> Option<&Crate> {
        self.crates.iter().find(|c| c.id == id)
    }

    pub fn crate_by_id_mut(&mut self, id: EntityId) -> Option<&mut Crate> {
        self.crates.iter_mut().find(|c| c.id == id)
    }

    /// Add an explosion starting at scene time `now`.
    pub fn spawn_explosion(
        &mut self,
        position: Vec3,
        size: f32,
        frame_count: u32,
        frame_duration: f32,
        now: f32,
    ) -> EntityId {
        let id = self.entity_ids.next();
        self.explosions.push(Explosion {
            id,
            position,
            direction: Vec3::Z,
            size,
            frame_count,
            frame_duration,
            start_time: now,
            current_time: now,
            alive: true,
        });
        id
    }

    /// Actors the viewpoint must keep clear of, with their positions.
    pub fn exclusion_actors(&self) -> [(ExclusionOwner, Vec3, Option<Exclusion>); 3] {
        [
            (ExclusionOwner::Alien, self.alien.position, self.alien.exclusion),
            (ExclusionOwner::Swarm, self.swarm.position, self.swarm.exclusion),
            (ExclusionOwner::SwarmB, self.swarm_b.position, self.swarm_b.exclusion),
        ]
    }

    /// Set the radius of one exclusion disc.
    pub fn shrink_exclusion(&mut self, owner: ExclusionOwner, radius: f32) {
        let exclusion = match owner {
            ExclusionOwner::Alien => &mut self.alien.exclusion,
            ExclusionOwner::Swarm => &mut self.swarm.exclusion,
            ExclusionOwner::SwarmB => &mut self.swarm_b.exclusion,
        };
        if let Some(exclusion) = exclusion {
            if radius < exclusion.radius {
                exclusion.radius = radius;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use crate::curve::CurveSet;
    use crate::random::SeededRandom;
    use crate::spawn;

    fn store() -> SceneStore {
        let config = SceneConfig::default();
        let mut rng = SeededRandom::new(99);
        spawn::build_scene(&config, &CurveSet::builtin().unwrap(), &mut rng, 0.0)
    }

    #[test]
    fn reap_without_dead_is_identity() {
        let mut store = store();
        let before: Vec<EntityId> = store.crates.iter().map(|c| c.id).collect();
        assert_eq!(store.reap_crates(), 0);
        let after: Vec<EntityId> = store.crates.iter().map(|c| c.id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn reap_keeps_order_of_survivors() {
        let mut store = store();
        let ids: Vec<EntityId> = store.crates.iter().map(|c| c.id).collect();
        store.crates[1].alive = false;
        store.crates[4].alive = false;

        assert_eq!(store.reap_crates(), 2);
        let expected: Vec<EntityId> = ids
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != 1 && *i != 4)
            .map(|(_, id)| *id)
            .collect();
        let after: Vec<EntityId> = store.crates.iter().map(|c| c.id).collect();
        assert_eq!(after, expected);
    }

    #[test]
    fn explosions_expire_after_lifetime() {
        let mut store = store();
        store.spawn_explosion(Vec3::ZERO, 0.1, 16, 0.1, 5.0);
        assert_eq!(store.age_explosions(6.0), 0);
        assert_eq!(store.explosions[0].current_time, 6.0);
        assert_eq!(store.age_explosions(7.0), 1);
        assert!(store.explosions.is_empty());
    }

    #[test]
    fn shrink_never_grows() {
        let mut store = store();
        let radius = store.alien.exclusion.unwrap().radius;
        store.shrink_exclusion(ExclusionOwner::Alien, radius + 1.0);
        assert_eq!(store.alien.exclusion.unwrap().radius, radius);
        store.shrink_exclusion(ExclusionOwner::Alien, radius * 0.5);
        assert_eq!(store.alien.exclusion.unwrap().radius, radius * 0.5);
    }
}
