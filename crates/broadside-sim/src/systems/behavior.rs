//! Behavior system: runs every pilot and writes its control outputs.

use std::collections::HashMap;

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use broadside_core::enums::Maneuver;
use broadside_core::types::{ControlOutputs, TargetState};
use broadside_weapons::loadout::Loadout;

use crate::components::{ActiveManeuver, Controls, Hull, Kinematics, Pilot, TargetLock};

/// Run combat and formation pilots for one tick.
pub fn run(world: &mut World, armaments: &mut HashMap<Entity, Loadout>, rng: &mut ChaCha8Rng, dt: f32) {
    // Read every ship's state up front; pilots look at each other.
    let states: HashMap<Entity, TargetState> = world
        .query::<(&Kinematics, &Hull)>()
        .iter()
        .filter(|(_, (_, hull))| !hull.is_destroyed())
        .map(|(entity, (kinematics, _))| (entity, kinematics.target_state()))
        .collect();

    for (entity, (kinematics, hull, pilot, lock, controls, maneuver)) in world.query_mut::<(
        &Kinematics,
        &Hull,
        &mut Pilot,
        &TargetLock,
        &mut Controls,
        &mut ActiveManeuver,
    )>() {
        if hull.is_destroyed() {
            controls.0 = ControlOutputs::default();
            maneuver.0 = None;
            continue;
        }

        let own = kinematics.ship_state();
        match pilot {
            Pilot::Combat(behavior) => {
                let target = lock.0.and_then(|target| states.get(&target));
                let mut unarmed = Loadout::default();
                let loadout = armaments.get_mut(&entity).unwrap_or(&mut unarmed);
                match behavior.tick(&own, target, loadout, rng, dt) {
                    Some(decision) => {
                        controls.0 = decision.controls;
                        maneuver.0 = Some(decision.maneuver);
                    }
                    None => {
                        behavior.stand_down(loadout);
                        controls.0 = ControlOutputs::default();
                        maneuver.0 = None;
                    }
                }
            }
            Pilot::Formation { behavior, leader } => {
                match behavior.tick(&own, states.get(&*leader), dt) {
                    Some(decision) => {
                        controls.0 = decision.controls;
                        maneuver.0 = Some(Maneuver::Formation);
                    }
                    None => {
                        controls.0 = ControlOutputs::default();
                        maneuver.0 = None;
                    }
                }
            }
        }
        log::trace!("{:?}: {:?}", entity, controls.0);
    }
}
