//! Snapshot system: reads the world and builds a `SimSnapshot`.
//!
//! Read-only; never modifies the world.

use std::collections::HashMap;

use hecs::{Entity, World};

use broadside_core::enums::WeaponSlot;
use broadside_weapons::loadout::Loadout;

use crate::components::*;
use crate::state::{ShipView, SimEvent, SimSnapshot};

pub fn build_snapshot(
    world: &World,
    armaments: &HashMap<Entity, Loadout>,
    tick: u64,
    dt: f32,
    events: Vec<SimEvent>,
) -> SimSnapshot {
    let names: HashMap<Entity, String> = world
        .query::<&Ship>()
        .iter()
        .map(|(entity, ship)| (entity, ship.name.clone()))
        .collect();

    let mut ships: Vec<ShipView> = world
        .query::<(&Ship, &Kinematics, &Hull, &Controls, &ActiveManeuver, Option<&TargetLock>, Option<&Pilot>)>()
        .iter()
        .map(|(entity, (ship, kinematics, hull, controls, maneuver, lock, pilot))| {
            let followed = match pilot {
                Some(Pilot::Formation { leader, .. }) => Some(*leader),
                _ => lock.and_then(|lock| lock.0),
            };
            let firing = |slot| {
                armaments
                    .get(&entity)
                    .and_then(|loadout| loadout.get(slot))
                    .is_some_and(|weapon| weapon.is_firing())
            };
            ShipView {
                id: entity.id(),
                name: ship.name.clone(),
                team: ship.team,
                position: kinematics.pose.position,
                forward: kinematics.pose.forward(),
                velocity: kinematics.velocity,
                hull: hull.integrity,
                destroyed: hull.is_destroyed(),
                target: followed.and_then(|entity| names.get(&entity).cloned()),
                maneuver: maneuver.0,
                primary_firing: firing(WeaponSlot::Primary),
                secondary_firing: firing(WeaponSlot::Secondary),
                controls: controls.0,
            }
        })
        .collect();
    ships.sort_by_key(|ship| ship.id);

    SimSnapshot {
        tick,
        elapsed_secs: tick as f64 * dt as f64,
        ships,
        events,
    }
}
