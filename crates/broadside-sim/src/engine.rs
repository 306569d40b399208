//! Simulation engine: owns the skirmish world and the tick loop.
//!
//! `SimulationEngine` holds the hecs world, the armament map and the seeded
//! RNG, runs all systems in order and produces `SimSnapshot`s. Headless and
//! deterministic: the same seed and setup give the same snapshot stream.

use std::collections::HashMap;

use hecs::{ComponentError, Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use broadside_core::constants::DT;
use broadside_weapons::loadout::Loadout;

use crate::components::{Pilot, Ship, TargetLock};
use crate::error::SimError;
use crate::state::{SimEvent, SimSnapshot};
use crate::systems;
use crate::world_setup::{self, SkirmishSetup};

/// Configuration for a new simulation.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Seconds per tick.
    pub dt: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { seed: 42, dt: DT }
    }
}

pub struct SimulationEngine {
    world: World,
    /// Loadouts live beside the world: weapons are not `Send + Sync`.
    armaments: HashMap<Entity, Loadout>,
    rng: ChaCha8Rng,
    dt: f32,
    tick: u64,
    running: bool,
    events: Vec<SimEvent>,
}

impl SimulationEngine {
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            armaments: HashMap::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            dt: config.dt,
            tick: 0,
            running: false,
            events: Vec::new(),
        }
    }

    /// Spawn `setup` into a fresh world and start running.
    pub fn initialize(&mut self, setup: &SkirmishSetup) -> Result<Vec<Entity>, SimError> {
        self.world.clear();
        self.armaments.clear();
        self.events.clear();
        self.tick = 0;

        let entities = world_setup::spawn_skirmish(&mut self.world, &mut self.armaments, setup, &mut self.rng)?;
        self.running = true;
        log::info!("skirmish initialized: {} ships, dt {:.4}", entities.len(), self.dt);
        Ok(entities)
    }

    /// Advance one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> SimSnapshot {
        if self.running {
            self.run_systems();
            self.tick += 1;
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(&self.world, &self.armaments, self.tick, self.dt, events)
    }

    /// Stop every behavior and release every trigger.
    pub fn shutdown(&mut self) {
        for (entity, pilot) in self.world.query_mut::<&mut Pilot>() {
            match pilot {
                Pilot::Combat(behavior) => {
                    let mut unarmed = Loadout::default();
                    let loadout = self.armaments.get_mut(&entity).unwrap_or(&mut unarmed);
                    behavior.shutdown(loadout);
                }
                Pilot::Formation { behavior, .. } => behavior.shutdown(),
            }
        }
        let mut armed: Vec<Entity> = self.armaments.keys().copied().collect();
        armed.sort_by_key(|entity| entity.id());
        for entity in armed {
            let Some(loadout) = self.armaments.get_mut(&entity) else {
                continue;
            };
            let ship = self
                .world
                .get::<&Ship>(entity)
                .map(|ship| ship.name.clone())
                .unwrap_or_default();
            for event in loadout.drain_events() {
                self.events.push(SimEvent::Weapon {
                    ship: ship.clone(),
                    slot: event.slot,
                    event: event.event,
                });
            }
        }
        self.running = false;
        log::info!("skirmish shut down at tick {}", self.tick);
    }

    /// Lock `ship` onto `target`. The lock holds while the target is a
    /// live hostile; otherwise targeting picks a new one next tick.
    pub fn set_target(&mut self, ship: Entity, target: Option<Entity>) -> Result<(), SimError> {
        if let Some(target) = target {
            if !self.world.contains(target) {
                return Err(SimError::UnknownEntity(target));
            }
        }
        let mut lock = self.world.get::<&mut TargetLock>(ship).map_err(|err| match err {
            ComponentError::NoSuchEntity => SimError::UnknownEntity(ship),
            ComponentError::MissingComponent(_) => SimError::MissingComponent {
                entity: ship,
                component: "TargetLock",
            },
        })?;
        lock.0 = target;
        Ok(())
    }

    /// Find a ship by name.
    pub fn find_ship(&self, name: &str) -> Option<Entity> {
        self.world
            .query::<&Ship>()
            .iter()
            .find(|(_, ship)| ship.name == name)
            .map(|(entity, _)| entity)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn armament(&self, ship: Entity) -> Option<&Loadout> {
        self.armaments.get(&ship)
    }

    fn run_systems(&mut self) {
        // 1. Target selection
        systems::targeting::run(&mut self.world);
        // 2. Pilots decide, weapons toggle
        systems::behavior::run(&mut self.world, &mut self.armaments, &mut self.rng, self.dt);
        // 3. Weapon cadence and hits
        systems::weapons::run(&mut self.world, &mut self.armaments, self.dt, &mut self.events);
        // 4. Motion
        systems::kinematics::run(&mut self.world, self.dt);
    }
}
