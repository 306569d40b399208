//! Skirmish description and spawn factories.
//!
//! A `SkirmishSetup` is plain serde data, so scenarios can live in JSON
//! files. Spawning resolves formation leaders by name and builds each
//! ship's loadout into the engine's armament map.

use std::collections::HashMap;

use glam::Vec3;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use broadside_ai::combat::CombatBehavior;
use broadside_ai::formation::FormationBehavior;
use broadside_core::config::{BroadsideConfig, CombatConfig, FormationConfig, TriggerSettings};
use broadside_core::enums::{ConsumptionPolicy, FiringMode, Team};
use broadside_core::types::Pose;
use broadside_weapons::loadout::Loadout;
use broadside_weapons::resource::{HeatSink, ResourceHandler, ResourcePool};
use broadside_weapons::unit::{GimbalMount, WeaponUnit};
use broadside_weapons::weapon::Weapon;

use crate::components::*;
use crate::error::SimError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkirmishSetup {
    /// Random horizontal offset (m) applied to every spawn position.
    #[serde(default = "default_jitter")]
    pub position_jitter: f32,
    pub ships: Vec<ShipSpec>,
}

fn default_jitter() -> f32 {
    50.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipSpec {
    pub name: String,
    pub team: Team,
    pub position: Vec3,
    #[serde(default = "default_forward")]
    pub forward: Vec3,
    #[serde(default)]
    pub velocity: Vec3,
    #[serde(default = "default_hull")]
    pub hull: f32,
    #[serde(default)]
    pub performance: Performance,
    pub pilot: PilotSpec,
    #[serde(default)]
    pub primary: Option<WeaponSpec>,
    #[serde(default)]
    pub secondary: Option<WeaponSpec>,
}

fn default_forward() -> Vec3 {
    Vec3::Z
}

fn default_hull() -> f32 {
    300.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum PilotSpec {
    Combat {
        #[serde(default)]
        config: CombatConfig,
    },
    Formation {
        leader: String,
        #[serde(default)]
        config: FormationConfig,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub name: String,
    #[serde(default)]
    pub firing_mode: FiringMode,
    #[serde(default)]
    pub start_index_override: Option<usize>,
    pub units: Vec<UnitSpec>,
    #[serde(default)]
    pub resources: Vec<ResourceSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSpec {
    pub name: String,
    #[serde(default)]
    pub trigger: TriggerSettings,
    #[serde(default)]
    pub mount: Option<GimbalMount>,
    #[serde(default = "default_damage")]
    pub damage: f32,
}

fn default_damage() -> f32 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ResourceSpec {
    Pool {
        capacity: f32,
        #[serde(default)]
        amount: Option<f32>,
        #[serde(default)]
        regen_per_second: f32,
        cost: f32,
        #[serde(default)]
        policy: ConsumptionPolicy,
        #[serde(default)]
        per_unit: bool,
    },
    Heat {
        capacity: f32,
        dissipation_per_second: f32,
        #[serde(default)]
        recovery_fraction: Option<f32>,
        cost: f32,
        #[serde(default)]
        policy: ConsumptionPolicy,
        #[serde(default)]
        per_unit: bool,
    },
}

impl ResourceSpec {
    pub fn build(&self) -> ResourceHandler {
        match *self {
            ResourceSpec::Pool {
                capacity,
                amount,
                regen_per_second,
                cost,
                policy,
                per_unit,
            } => {
                let mut pool = ResourcePool::new(capacity).with_regen(regen_per_second);
                if let Some(amount) = amount {
                    pool = pool.with_amount(amount);
                }
                ResourceHandler::new(pool, cost, policy).with_per_unit(per_unit)
            }
            ResourceSpec::Heat {
                capacity,
                dissipation_per_second,
                recovery_fraction,
                cost,
                policy,
                per_unit,
            } => {
                let mut sink = HeatSink::new(capacity, dissipation_per_second);
                if let Some(fraction) = recovery_fraction {
                    sink = sink.with_recovery_fraction(fraction);
                }
                ResourceHandler::new(sink, cost, policy).with_per_unit(per_unit)
            }
        }
    }
}

impl UnitSpec {
    pub fn build(&self) -> WeaponUnit {
        let unit = WeaponUnit::new(self.name.clone(), self.trigger).with_damage(self.damage);
        match self.mount {
            Some(mount) => unit.with_mount(mount),
            None => unit,
        }
    }
}

impl WeaponSpec {
    pub fn build(&self) -> Weapon {
        let mut weapon = Weapon::new(self.name.clone(), self.firing_mode)
            .with_units(self.units.iter().map(UnitSpec::build));
        if let Some(index) = self.start_index_override {
            weapon = weapon.with_start_index_override(index);
        }
        for resource in &self.resources {
            weapon = weapon.with_resource(resource.build());
        }
        weapon
    }
}

impl SkirmishSetup {
    /// Two blue ships (a leader and its wingman) against a red broadside
    /// cruiser and a beam lancer.
    pub fn default_skirmish() -> Self {
        let autocannon = WeaponSpec {
            name: "autocannon".into(),
            firing_mode: FiringMode::Simultaneous,
            start_index_override: None,
            units: [-5.0, 5.0]
                .iter()
                .enumerate()
                .map(|(i, x)| UnitSpec {
                    name: format!("autocannon-{i}"),
                    trigger: TriggerSettings::automatic(0.2),
                    mount: Some(GimbalMount::turret(Vec3::new(*x, 0.0, 10.0), Vec3::Z, 5.0)),
                    damage: 4.0,
                })
                .collect(),
            resources: vec![ResourceSpec::Pool {
                capacity: 400.0,
                amount: None,
                regen_per_second: 0.0,
                cost: 1.0,
                policy: ConsumptionPolicy::PerUse,
                per_unit: true,
            }],
        };

        let missiles = WeaponSpec {
            name: "missile rack".into(),
            firing_mode: FiringMode::Sequential,
            start_index_override: None,
            units: (0..2)
                .map(|i| UnitSpec {
                    name: format!("rack-{i}"),
                    trigger: TriggerSettings::burst(2, 0.15, 2.5, true),
                    mount: Some(GimbalMount::turret(Vec3::new(0.0, 2.0, 5.0), Vec3::Z, 30.0)),
                    damage: 20.0,
                })
                .collect(),
            resources: vec![ResourceSpec::Pool {
                capacity: 12.0,
                amount: None,
                regen_per_second: 0.0,
                cost: 1.0,
                policy: ConsumptionPolicy::PerUse,
                per_unit: false,
            }],
        };

        let battery = WeaponSpec {
            name: "broadside battery".into(),
            firing_mode: FiringMode::Simultaneous,
            start_index_override: None,
            units: [(-20.0, Vec3::NEG_X), (20.0, Vec3::NEG_X), (-20.0, Vec3::X), (20.0, Vec3::X)]
                .iter()
                .enumerate()
                .map(|(i, (z, rest))| UnitSpec {
                    name: format!("battery-{i}"),
                    trigger: TriggerSettings::automatic(0.5),
                    mount: Some(GimbalMount::turret(Vec3::new(rest.x * 8.0, 0.0, *z), *rest, 60.0)),
                    damage: 6.0,
                })
                .collect(),
            resources: vec![ResourceSpec::Heat {
                capacity: 100.0,
                dissipation_per_second: 15.0,
                recovery_fraction: Some(0.4),
                cost: 2.0,
                policy: ConsumptionPolicy::PerUse,
                per_unit: true,
            }],
        };

        let lance = WeaponSpec {
            name: "lance".into(),
            firing_mode: FiringMode::Simultaneous,
            start_index_override: None,
            units: vec![UnitSpec {
                name: "lance-emitter".into(),
                trigger: TriggerSettings::on_off(),
                mount: Some(GimbalMount::fixed(Vec3::new(0.0, 0.0, 12.0))),
                damage: 15.0,
            }],
            resources: vec![ResourceSpec::Pool {
                capacity: 100.0,
                amount: None,
                regen_per_second: 8.0,
                cost: 25.0,
                policy: ConsumptionPolicy::PerSecond,
                per_unit: false,
            }],
        };

        let ship = |name: &str, team, position, forward, pilot, primary, secondary| ShipSpec {
            name: name.to_string(),
            team,
            position,
            forward,
            velocity: Vec3::ZERO,
            hull: default_hull(),
            performance: Performance::default(),
            pilot,
            primary,
            secondary,
        };

        Self {
            position_jitter: default_jitter(),
            ships: vec![
                ship(
                    "Vanguard",
                    Team::Blue,
                    Vec3::new(0.0, 0.0, -1500.0),
                    Vec3::Z,
                    PilotSpec::Combat {
                        config: CombatConfig::default(),
                    },
                    Some(autocannon),
                    Some(missiles),
                ),
                ship(
                    "Wing",
                    Team::Blue,
                    Vec3::new(-60.0, 0.0, -1560.0),
                    Vec3::Z,
                    PilotSpec::Formation {
                        leader: "Vanguard".into(),
                        config: FormationConfig::default(),
                    },
                    None,
                    None,
                ),
                ship(
                    "Corsair",
                    Team::Red,
                    Vec3::new(300.0, 0.0, 1500.0),
                    Vec3::NEG_Z,
                    PilotSpec::Combat {
                        config: CombatConfig {
                            broadside: BroadsideConfig {
                                enabled: true,
                                distance: 500.0,
                                ..Default::default()
                            },
                            ..Default::default()
                        },
                    },
                    Some(battery),
                    None,
                ),
                ship(
                    "Lancer",
                    Team::Red,
                    Vec3::new(-300.0, 0.0, 1600.0),
                    Vec3::NEG_Z,
                    PilotSpec::Combat {
                        config: CombatConfig {
                            max_engage_distance: 800.0,
                            ..Default::default()
                        },
                    },
                    Some(lance),
                    None,
                ),
            ],
        }
    }
}

/// Spawn every ship of `setup`. Returns the entities in setup order.
///
/// Formation leaders are resolved by name once all ships exist.
pub fn spawn_skirmish(
    world: &mut World,
    armaments: &mut HashMap<Entity, Loadout>,
    setup: &SkirmishSetup,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<Entity>, SimError> {
    let mut entities = Vec::with_capacity(setup.ships.len());
    let mut by_name = HashMap::new();

    for ship in &setup.ships {
        let entity = spawn_ship(world, ship, setup.position_jitter, rng);
        armaments.insert(
            entity,
            Loadout::new(
                ship.primary.as_ref().map(WeaponSpec::build),
                ship.secondary.as_ref().map(WeaponSpec::build),
            ),
        );
        by_name.insert(ship.name.clone(), entity);
        entities.push(entity);
    }

    for (ship, &entity) in setup.ships.iter().zip(&entities) {
        let pilot = match &ship.pilot {
            PilotSpec::Combat { config } => {
                let mut behavior = CombatBehavior::new(*config);
                behavior.initialize();
                Pilot::Combat(behavior)
            }
            PilotSpec::Formation { leader, config } => {
                let leader = *by_name
                    .get(leader)
                    .ok_or_else(|| SimError::UnknownShip(leader.clone()))?;
                let mut behavior = FormationBehavior::new(*config);
                behavior.initialize();
                Pilot::Formation { behavior, leader }
            }
        };
        world
            .insert_one(entity, pilot)
            .map_err(|_| SimError::UnknownEntity(entity))?;
    }

    log::info!("spawned {} ships", entities.len());
    Ok(entities)
}

/// Spawn one ship without its pilot.
pub fn spawn_ship(world: &mut World, ship: &ShipSpec, jitter: f32, rng: &mut ChaCha8Rng) -> Entity {
    let offset = if jitter > 0.0 {
        Vec3::new(rng.gen_range(-jitter..=jitter), 0.0, rng.gen_range(-jitter..=jitter))
    } else {
        Vec3::ZERO
    };
    let pose = Pose::looking(ship.position + offset, ship.forward);

    world.spawn((
        Ship {
            name: ship.name.clone(),
            team: ship.team,
        },
        Kinematics::new(pose.position, pose.rotation, ship.velocity),
        ship.performance,
        Hull::new(ship.hull),
        TargetLock::default(),
        Controls::default(),
        ActiveManeuver::default(),
    ))
}
