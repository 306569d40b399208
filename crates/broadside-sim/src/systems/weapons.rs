//! Weapons system: advances every loadout and resolves hits.
//!
//! A discrete shot hits when the unit that fired it is in solution on the
//! shooter's locked target. Beam units deal their damage per second for as
//! long as the beam is on and in solution.

use std::collections::HashMap;

use glam::Vec3;
use hecs::{Entity, World};

use broadside_core::enums::{TriggerPhase, WeaponSlot};
use broadside_core::events::{SlotEvent, WeaponEvent};
use broadside_core::types::Pose;
use broadside_weapons::loadout::Loadout;
use broadside_weapons::solution::{unit_in_solution, SolutionParams};

use crate::components::{Hull, Kinematics, Pilot, Ship, TargetLock};
use crate::state::SimEvent;

struct Hit {
    attacker: Entity,
    target: Entity,
    damage: f32,
}

/// Tick every armament, translate weapon events and apply damage.
pub fn run(
    world: &mut World,
    armaments: &mut HashMap<Entity, Loadout>,
    dt: f32,
    events: &mut Vec<SimEvent>,
) {
    let names: HashMap<Entity, String> = world
        .query::<&Ship>()
        .iter()
        .map(|(entity, ship)| (entity, ship.name.clone()))
        .collect();

    let positions: HashMap<Entity, Vec3> = world
        .query::<(&Kinematics, &Hull)>()
        .iter()
        .filter(|(_, (_, hull))| !hull.is_destroyed())
        .map(|(entity, (kinematics, _))| (entity, kinematics.pose.position))
        .collect();

    let mut hits = Vec::new();
    for (entity, (kinematics, hull, lock, pilot)) in
        world.query::<(&Kinematics, &Hull, &TargetLock, &Pilot)>().iter()
    {
        if hull.is_destroyed() {
            continue;
        }
        let Some(loadout) = armaments.get_mut(&entity) else {
            continue;
        };
        loadout.tick(dt);

        let params = match pilot {
            Pilot::Combat(behavior) => Some(behavior.solution_params()),
            Pilot::Formation { .. } => None,
        };
        let aim = lock
            .0
            .and_then(|target| positions.get(&target).map(|position| (target, *position)))
            .zip(params);

        let ship_name = names.get(&entity).cloned().unwrap_or_default();
        for SlotEvent { slot, event } in loadout.drain_events() {
            if let (WeaponEvent::UnitFired { unit }, Some(((target, position), params))) = (event, aim) {
                if let Some(damage) = shot_damage(loadout, slot, unit, &kinematics.pose, position, &params) {
                    hits.push(Hit {
                        attacker: entity,
                        target,
                        damage,
                    });
                }
            }
            events.push(SimEvent::Weapon {
                ship: ship_name.clone(),
                slot,
                event,
            });
        }

        if let Some(((target, position), params)) = aim {
            let beam = beam_damage(loadout, &kinematics.pose, position, &params) * dt;
            if beam > 0.0 {
                hits.push(Hit {
                    attacker: entity,
                    target,
                    damage: beam,
                });
            }
        }
    }

    apply_hits(world, armaments, &names, hits, events);
}

/// Damage of one discrete shot, if the unit that fired is in solution.
fn shot_damage(
    loadout: &Loadout,
    slot: WeaponSlot,
    unit: usize,
    ship: &Pose,
    target: Vec3,
    params: &SolutionParams,
) -> Option<f32> {
    let unit = loadout.get(slot)?.units().get(unit)?;
    unit_in_solution(unit, ship, target, params).then_some(unit.damage)
}

/// Damage per second of every beam currently on and in solution.
fn beam_damage(loadout: &Loadout, ship: &Pose, target: Vec3, params: &SolutionParams) -> f32 {
    [WeaponSlot::Primary, WeaponSlot::Secondary]
        .into_iter()
        .filter_map(|slot| loadout.get(slot))
        .filter(|weapon| weapon.is_firing())
        .flat_map(|weapon| weapon.units())
        .filter(|unit| unit.trigger().phase() == TriggerPhase::Firing)
        .filter(|unit| unit_in_solution(unit, ship, target, params))
        .map(|unit| unit.damage)
        .sum()
}

fn apply_hits(
    world: &mut World,
    armaments: &mut HashMap<Entity, Loadout>,
    names: &HashMap<Entity, String>,
    hits: Vec<Hit>,
    events: &mut Vec<SimEvent>,
) {
    let name = |entity: Entity| names.get(&entity).cloned().unwrap_or_default();

    for hit in hits {
        let Ok(mut hull) = world.get::<&mut Hull>(hit.target) else {
            continue;
        };
        if hull.is_destroyed() {
            continue;
        }
        let destroyed = hull.apply_damage(hit.damage);
        drop(hull);

        events.push(SimEvent::Hit {
            attacker: name(hit.attacker),
            target: name(hit.target),
            damage: hit.damage,
        });

        if destroyed {
            log::info!("{} destroyed by {}", name(hit.target), name(hit.attacker));
            if let Some(loadout) = armaments.get_mut(&hit.target) {
                loadout.stop_all();
                for SlotEvent { slot, event } in loadout.drain_events() {
                    events.push(SimEvent::Weapon {
                        ship: name(hit.target),
                        slot,
                        event,
                    });
                }
            }
            events.push(SimEvent::ShipDestroyed {
                ship: name(hit.target),
            });
        }
    }
}
