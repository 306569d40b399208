//! Target selection: keep a valid hostile lock, otherwise take the nearest.

use glam::Vec3;
use hecs::{Entity, World};

use broadside_core::enums::Team;

use crate::components::{Hull, Kinematics, Pilot, Ship, TargetLock};

struct Candidate {
    entity: Entity,
    team: Team,
    position: Vec3,
    alive: bool,
}

/// Refresh the target lock of every combat pilot.
///
/// A lock on a live hostile is kept even if a closer one appears, so a
/// manually assigned target sticks until it dies.
pub fn run(world: &mut World) {
    let candidates: Vec<Candidate> = world
        .query::<(&Ship, &Kinematics, &Hull)>()
        .iter()
        .map(|(entity, (ship, kinematics, hull))| Candidate {
            entity,
            team: ship.team,
            position: kinematics.pose.position,
            alive: !hull.is_destroyed(),
        })
        .collect();

    for (entity, (ship, kinematics, hull, pilot, lock)) in
        world.query_mut::<(&Ship, &Kinematics, &Hull, &Pilot, &mut TargetLock)>()
    {
        if hull.is_destroyed() || !matches!(pilot, Pilot::Combat(_)) {
            lock.0 = None;
            continue;
        }

        let still_valid = lock
            .0
            .and_then(|target| candidates.iter().find(|c| c.entity == target))
            .is_some_and(|c| c.alive && ship.team.is_hostile_to(c.team));
        if still_valid {
            continue;
        }

        let nearest = candidates
            .iter()
            .filter(|c| c.entity != entity && c.alive && ship.team.is_hostile_to(c.team))
            .min_by(|a, b| {
                let da = a.position.distance_squared(kinematics.pose.position);
                let db = b.position.distance_squared(kinematics.pose.position);
                da.total_cmp(&db)
            })
            .map(|c| c.entity);

        if nearest != lock.0 {
            log::debug!("{}: target lock {:?} -> {:?}", ship.name, lock.0, nearest);
        }
        lock.0 = nearest;
    }
}
