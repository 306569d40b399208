#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use glam::{Quat, Vec3};

    use broadside_core::config::TriggerSettings;
    use broadside_core::enums::{FiringMode, WeaponSlot};
    use broadside_core::events::WeaponEvent;
    use broadside_core::types::Pose;

    use crate::loadout::Loadout;
    use crate::resource::{HeatSink, ResourceHandler, ResourcePool};
    use crate::solution::{firing_solution_quality, unit_in_solution, unit_solution_quality, SolutionParams};
    use crate::unit::{GimbalMount, WeaponUnit};
    use crate::weapon::Weapon;

    fn units(count: usize, settings: TriggerSettings) -> Vec<WeaponUnit> {
        (0..count)
            .map(|i| {
                WeaponUnit::new(format!("gun-{i}"), settings)
                    .with_mount(GimbalMount::fixed(Vec3::new(i as f32, 0.0, 0.0)))
            })
            .collect()
    }

    fn fired_units(events: &[WeaponEvent]) -> Vec<usize> {
        events
            .iter()
            .filter_map(|e| match e {
                WeaponEvent::UnitFired { unit } => Some(*unit),
                _ => None,
            })
            .collect()
    }

    fn failures(events: &[WeaponEvent]) -> usize {
        events
            .iter()
            .filter(|e| **e == WeaponEvent::FiringFailed)
            .count()
    }

    fn params() -> SolutionParams {
        SolutionParams {
            max_firing_angle_deg: 5.0,
            max_engage_distance: 1000.0,
        }
    }

    // ---- Sequencing ----

    #[test]
    fn test_sequential_trigger_once_cycles_units() {
        let mut weapon = Weapon::new("battery", FiringMode::Sequential)
            .with_units(units(4, TriggerSettings::single()));

        for _ in 0..5 {
            assert!(weapon.trigger_once());
        }
        assert_eq!(fired_units(&weapon.drain_events()), vec![0, 1, 2, 3, 0]);
        assert_eq!(weapon.cursor(), 1);
    }

    #[test]
    fn test_sequential_stop_resets_to_override() {
        let mut weapon = Weapon::new("battery", FiringMode::Sequential)
            .with_units(units(4, TriggerSettings::single()))
            .with_start_index_override(2);
        assert_eq!(weapon.cursor(), 2);

        weapon.trigger_once();
        weapon.trigger_once();
        weapon.trigger_once();
        assert_eq!(fired_units(&weapon.drain_events()), vec![2, 3, 0]);
        assert_eq!(weapon.cursor(), 1);

        weapon.stop_firing();
        assert_eq!(weapon.cursor(), 2, "stop returns to the override, not zero");
    }

    #[test]
    fn test_start_index_override_set_before_units() {
        let weapon = Weapon::new("battery", FiringMode::Sequential)
            .with_start_index_override(2)
            .with_units(units(4, TriggerSettings::single()));
        assert_eq!(weapon.cursor(), 2);

        let one_by_one = units(3, TriggerSettings::single())
            .into_iter()
            .fold(
                Weapon::new("battery", FiringMode::Sequential).with_start_index_override(1),
                Weapon::with_unit,
            );
        assert_eq!(one_by_one.cursor(), 1);
    }

    #[test]
    fn test_sequential_stop_without_override_keeps_cursor() {
        let mut weapon = Weapon::new("battery", FiringMode::Sequential)
            .with_units(units(3, TriggerSettings::single()));
        weapon.trigger_once();
        weapon.stop_firing();
        assert_eq!(weapon.cursor(), 1);
    }

    #[test]
    fn test_sequential_on_off_advances_on_start() {
        let mut weapon = Weapon::new("beams", FiringMode::Sequential)
            .with_units(units(2, TriggerSettings::on_off()));

        assert!(weapon.start_firing());
        assert_eq!(weapon.cursor(), 1);
        let events = weapon.drain_events();
        assert!(events.contains(&WeaponEvent::UnitBeamOn { unit: 0 }));
        assert!(!events.contains(&WeaponEvent::UnitBeamOn { unit: 1 }));

        weapon.stop_firing();
        let events = weapon.drain_events();
        assert!(events.contains(&WeaponEvent::UnitBeamOff { unit: 0 }));

        weapon.start_firing();
        assert!(weapon
            .drain_events()
            .contains(&WeaponEvent::UnitBeamOn { unit: 1 }));
        assert_eq!(weapon.cursor(), 0);
    }

    #[test]
    fn test_sequential_automatic_does_not_advance_on_start() {
        let mut weapon = Weapon::new("autocannons", FiringMode::Sequential)
            .with_units(units(2, TriggerSettings::automatic(0.1)));
        weapon.start_firing();
        assert_eq!(weapon.cursor(), 0);
        weapon.tick(0.1);
        assert_eq!(fired_units(&weapon.drain_events()), vec![0, 0]);
    }

    #[test]
    fn test_simultaneous_start_fires_all_units() {
        let mut weapon = Weapon::new("broadside", FiringMode::Simultaneous)
            .with_units(units(3, TriggerSettings::automatic(0.5)));
        assert!(weapon.start_firing());
        assert_eq!(fired_units(&weapon.drain_events()), vec![0, 1, 2]);
        weapon.tick(0.5);
        assert_eq!(fired_units(&weapon.drain_events()), vec![0, 1, 2]);
        weapon.stop_firing();
        weapon.tick(1.0);
        assert!(fired_units(&weapon.drain_events()).is_empty());
    }

    #[test]
    fn test_start_while_firing_is_noop() {
        let mut weapon = Weapon::new("guns", FiringMode::Simultaneous)
            .with_units(units(1, TriggerSettings::automatic(0.5)));
        assert!(weapon.start_firing());
        weapon.drain_events();
        assert!(!weapon.start_firing());
        assert!(weapon.drain_events().is_empty());
    }

    // ---- Gating ----

    #[test]
    fn test_simultaneous_requires_all_units_ready() {
        let mut weapon = Weapon::new("guns", FiringMode::Simultaneous)
            .with_units(units(3, TriggerSettings::single()));
        assert!(weapon.can_fire());
        weapon.unit_mut(1).unwrap().set_ready(false);
        assert!(!weapon.can_fire());
    }

    #[test]
    fn test_sequential_requires_only_cursor_unit() {
        let mut weapon = Weapon::new("guns", FiringMode::Sequential)
            .with_units(units(3, TriggerSettings::single()));
        weapon.unit_mut(1).unwrap().set_ready(false);
        assert!(weapon.can_fire(), "cursor on unit 0");
        weapon.trigger_once();
        assert!(!weapon.can_fire(), "cursor on unit 1");
    }

    #[test]
    fn test_empty_weapon_cannot_fire() {
        let mut weapon = Weapon::new("nothing", FiringMode::Sequential);
        assert!(!weapon.can_fire());
        assert!(!weapon.trigger_once());
        assert_eq!(weapon.cursor(), 0);
        assert_eq!(weapon.damage_per_second(), 0.0);
    }

    #[test]
    fn test_module_and_conditions_gate_fire() {
        let docked = Rc::new(Cell::new(false));
        let mut weapon = Weapon::new("guns", FiringMode::Simultaneous)
            .with_units(units(1, TriggerSettings::single()));
        let flag = Rc::clone(&docked);
        weapon.add_condition(move || !flag.get());
        assert!(weapon.can_fire());

        docked.set(true);
        assert!(!weapon.can_fire());
        docked.set(false);

        weapon.set_module_active(false);
        assert!(!weapon.can_fire());
    }

    #[test]
    fn test_deactivating_module_stops_fire() {
        let mut weapon = Weapon::new("guns", FiringMode::Simultaneous)
            .with_units(units(1, TriggerSettings::automatic(0.1)));
        weapon.start_firing();
        weapon.set_module_active(false);
        assert!(!weapon.is_firing());
        assert!(weapon.drain_events().contains(&WeaponEvent::FiringStopped));
        weapon.tick(1.0);
        assert!(fired_units(&weapon.drain_events()).is_empty());
        assert!(!weapon.units()[0].trigger().is_triggering());
    }

    #[test]
    fn test_resource_denial_reports_once_per_attempt() {
        let mut weapon = Weapon::new("railgun", FiringMode::Simultaneous)
            .with_units(units(1, TriggerSettings::single()))
            .with_resource(ResourceHandler::per_use(
                ResourcePool::new(10.0).with_amount(0.0),
                1.0,
            ));

        // Held by the AI: repeated starts while denied report once
        for _ in 0..10 {
            assert!(!weapon.start_firing());
            weapon.tick(0.1);
        }
        assert_eq!(failures(&weapon.drain_events()), 1);

        // Released and pressed again: a new attempt, a new report
        weapon.stop_firing();
        assert!(!weapon.start_firing());
        assert_eq!(failures(&weapon.drain_events()), 1);
    }

    #[test]
    fn test_ammo_runs_out_mid_fire() {
        let mut weapon = Weapon::new("autocannon", FiringMode::Simultaneous)
            .with_units(units(1, TriggerSettings::automatic(0.1)))
            .with_resource(ResourceHandler::per_use(ResourcePool::new(3.0), 1.0));

        assert!(weapon.start_firing());
        for _ in 0..10 {
            weapon.tick(0.1);
        }
        let events = weapon.drain_events();
        assert_eq!(fired_units(&events).len(), 3, "three rounds of ammo");
        assert_eq!(failures(&events), 1, "one dry-fire signal");
        assert!(events.contains(&WeaponEvent::FiringStopped));
        assert!(!weapon.is_firing());
    }

    #[test]
    fn test_ammo_exhausted_burst_is_cut_short() {
        let mut weapon = Weapon::new("flak", FiringMode::Simultaneous)
            .with_units(units(1, TriggerSettings::burst(3, 0.1, 1.0, false)))
            .with_resource(ResourceHandler::per_use(ResourcePool::new(1.0), 1.0));

        assert!(weapon.start_firing());
        for _ in 0..10 {
            weapon.tick(0.1);
        }
        let events = weapon.drain_events();
        assert_eq!(fired_units(&events).len(), 1, "one round of ammo, one shot: {events:?}");
        assert_eq!(failures(&events), 1);
        let stopped = events
            .iter()
            .position(|e| *e == WeaponEvent::FiringStopped)
            .expect("forced stop");
        assert!(fired_units(&events[stopped..]).is_empty(), "no shots after the stop");
        assert!(!weapon.units()[0].trigger().is_busy());
    }

    #[test]
    fn test_module_off_cancels_burst_in_flight() {
        let mut weapon = Weapon::new("flak", FiringMode::Simultaneous)
            .with_units(units(1, TriggerSettings::burst(3, 0.1, 1.0, false)));
        weapon.start_firing();
        weapon.set_module_active(false);
        for _ in 0..10 {
            weapon.tick(0.1);
        }
        assert_eq!(fired_units(&weapon.drain_events()).len(), 1);

        // A burst left to finish after release is cut off too
        weapon.set_module_active(true);
        weapon.start_firing();
        weapon.stop_firing();
        weapon.set_module_active(false);
        for _ in 0..10 {
            weapon.tick(0.1);
        }
        let events = weapon.drain_events();
        assert_eq!(fired_units(&events).len(), 1);
        assert_eq!(failures(&events), 0);
    }

    #[test]
    fn test_released_burst_stops_when_ammo_runs_out() {
        let mut weapon = Weapon::new("flak", FiringMode::Simultaneous)
            .with_units(units(1, TriggerSettings::burst(3, 0.1, 1.0, false)))
            .with_resource(ResourceHandler::per_use(ResourcePool::new(2.0), 1.0));
        weapon.start_firing();
        weapon.stop_firing();
        for _ in 0..10 {
            weapon.tick(0.1);
        }
        let events = weapon.drain_events();
        assert_eq!(fired_units(&events).len(), 2);
        assert_eq!(failures(&events), 0, "the trigger was already released");
        assert!(!weapon.has_pending_denial());
    }

    #[test]
    fn test_catch_up_never_overdraws_ammo() {
        let mut weapon = Weapon::new("minigun", FiringMode::Simultaneous)
            .with_units(units(1, TriggerSettings::automatic(0.01)))
            .with_resource(ResourceHandler::per_use(ResourcePool::new(2.0), 1.0));

        assert!(weapon.start_firing());
        weapon.tick(1.0 / 30.0);
        let events = weapon.drain_events();
        assert_eq!(fired_units(&events).len(), 2, "two rounds, two shots: {events:?}");
        assert_eq!(failures(&events), 1);
        assert!(!weapon.is_firing());
        assert_eq!(weapon.resources()[0].container().fraction(), 0.0);
    }

    #[test]
    fn test_catch_up_sequential_counts_every_shot() {
        let mut weapon = Weapon::new("pods", FiringMode::Sequential)
            .with_units(units(2, TriggerSettings::automatic(0.01)))
            .with_resource(ResourceHandler::per_use(ResourcePool::new(3.0), 1.0));

        weapon.start_firing();
        weapon.tick(0.05);
        assert_eq!(fired_units(&weapon.drain_events()), vec![0, 0, 0]);
    }

    #[test]
    fn test_per_unit_accounting_scales_simultaneous_fire() {
        let mut weapon = Weapon::new("quad", FiringMode::Simultaneous)
            .with_units(units(4, TriggerSettings::single()))
            .with_resource(ResourceHandler::per_use(ResourcePool::new(10.0), 1.0).with_per_unit(true));

        assert!(weapon.trigger_once());
        assert!((weapon.resources()[0].container().fraction() - 0.6).abs() < 1e-6);
        assert!(weapon.trigger_once());
        // 2 left, 4 needed
        assert!(!weapon.can_fire());
    }

    #[test]
    fn test_per_unit_accounting_ignored_when_sequential() {
        let mut weapon = Weapon::new("quad", FiringMode::Sequential)
            .with_units(units(4, TriggerSettings::single()))
            .with_resource(ResourceHandler::per_use(ResourcePool::new(10.0), 1.0).with_per_unit(true));
        weapon.trigger_once();
        assert!((weapon.resources()[0].container().fraction() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_per_second_resource_drains_while_held() {
        let mut weapon = Weapon::new("beam", FiringMode::Simultaneous)
            .with_units(units(1, TriggerSettings::on_off()))
            .with_resource(ResourceHandler::per_second(ResourcePool::new(2.0), 1.0));

        assert!(weapon.start_firing());
        weapon.tick(1.0);
        assert!(weapon.is_firing());
        weapon.tick(1.0);
        // Pool is empty now; the next check forces a stop
        weapon.tick(0.1);
        assert!(!weapon.is_firing());
        let events = weapon.drain_events();
        assert_eq!(failures(&events), 1);
        assert!(events.contains(&WeaponEvent::UnitBeamOff { unit: 0 }));
    }

    #[test]
    fn test_heat_lockout_interrupts_fire() {
        let mut weapon = Weapon::new("laser", FiringMode::Simultaneous)
            .with_units(units(1, TriggerSettings::automatic(0.1)))
            .with_resource(ResourceHandler::per_use(HeatSink::new(30.0, 0.0), 10.0));

        weapon.start_firing();
        for _ in 0..5 {
            weapon.tick(0.1);
        }
        // 10 heat per shot, 30 capacity: three shots then locked
        let events = weapon.drain_events();
        assert_eq!(fired_units(&events).len(), 3);
        assert!(!weapon.is_firing());
    }

    // ---- Damage per second ----

    #[test]
    fn test_damage_per_second() {
        let simultaneous = Weapon::new("pair", FiringMode::Simultaneous).with_units(
            units(2, TriggerSettings::automatic(0.5))
                .into_iter()
                .map(|u| u.with_damage(10.0)),
        );
        assert!((simultaneous.damage_per_second() - 40.0).abs() < 1e-4);

        let sequential = Weapon::new("pair", FiringMode::Sequential).with_units(
            units(2, TriggerSettings::automatic(0.5))
                .into_iter()
                .map(|u| u.with_damage(10.0)),
        );
        assert!((sequential.damage_per_second() - 20.0).abs() < 1e-4);
    }

    // ---- Firing solution ----

    #[test]
    fn test_solution_all_units_on_target() {
        let weapon = Weapon::new("guns", FiringMode::Simultaneous)
            .with_units(units(2, TriggerSettings::single()));
        let ship = Pose::default();
        let q = firing_solution_quality(&weapon, &ship, Vec3::new(0.5, 0.0, 500.0), &params());
        assert_eq!(q, 1.0);
    }

    #[test]
    fn test_solution_zero_without_eligible_units() {
        let ship = Pose::default();
        let target = Vec3::new(0.0, 0.0, 100.0);

        let unmounted = vec![WeaponUnit::new("a", TriggerSettings::single())];
        assert_eq!(unit_solution_quality(&unmounted, &ship, target, &params()), 0.0);

        let independent = vec![WeaponUnit::new("b", TriggerSettings::single()).with_mount(GimbalMount {
            independent: true,
            ..Default::default()
        })];
        assert_eq!(unit_solution_quality(&independent, &ship, target, &params()), 0.0);
    }

    #[test]
    fn test_solution_zero_beyond_engage_distance() {
        let weapon = Weapon::new("guns", FiringMode::Simultaneous)
            .with_units(units(2, TriggerSettings::single()));
        let ship = Pose::default();
        let q = firing_solution_quality(&weapon, &ship, Vec3::new(0.0, 0.0, 1500.0), &params());
        assert_eq!(q, 0.0, "dead ahead but out of range");
    }

    #[test]
    fn test_solution_fraction_with_turret() {
        // One fixed forward gun, one turret that can swing 90 degrees
        let weapon = Weapon::new("mixed", FiringMode::Simultaneous)
            .with_unit(
                WeaponUnit::new("fixed", TriggerSettings::single())
                    .with_mount(GimbalMount::fixed(Vec3::ZERO)),
            )
            .with_unit(
                WeaponUnit::new("turret", TriggerSettings::single())
                    .with_mount(GimbalMount::turret(Vec3::ZERO, Vec3::Z, 90.0)),
            );
        let ship = Pose::new(Vec3::ZERO, Quat::IDENTITY);
        // Target 45 degrees to the right
        let q = firing_solution_quality(&weapon, &ship, Vec3::new(300.0, 0.0, 300.0), &params());
        assert!((q - 0.5).abs() < 1e-6, "quality {q}");
    }

    #[test]
    fn test_solution_follows_ship_rotation() {
        let weapon = Weapon::new("guns", FiringMode::Simultaneous)
            .with_units(units(1, TriggerSettings::single()));
        let ship = Pose::new(Vec3::ZERO, Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        // Ship faces +X now
        assert_eq!(
            firing_solution_quality(&weapon, &ship, Vec3::new(400.0, 0.0, 0.0), &params()),
            1.0
        );
        assert_eq!(
            firing_solution_quality(&weapon, &ship, Vec3::new(0.0, 0.0, 400.0), &params()),
            0.0
        );
    }

    #[test]
    fn test_unit_in_solution_per_unit() {
        let mut independent = GimbalMount::turret(Vec3::ZERO, Vec3::Z, 90.0);
        independent.independent = true;
        let fixed = WeaponUnit::new("fixed", TriggerSettings::single()).with_mount(GimbalMount::fixed(Vec3::ZERO));
        let player = WeaponUnit::new("player", TriggerSettings::single()).with_mount(independent);
        let unmounted = WeaponUnit::new("bare", TriggerSettings::single());
        let ship = Pose::default();
        let ahead = Vec3::new(0.0, 0.0, 500.0);

        assert!(unit_in_solution(&fixed, &ship, ahead, &params()));
        assert!(!unit_in_solution(&fixed, &ship, Vec3::new(500.0, 0.0, 0.0), &params()));
        assert!(!unit_in_solution(&fixed, &ship, Vec3::new(0.0, 0.0, 5000.0), &params()));
        assert!(!unit_in_solution(&player, &ship, ahead, &params()));
        assert!(!unit_in_solution(&unmounted, &ship, ahead, &params()));
    }

    // ---- Loadout ----

    #[test]
    fn test_loadout_tags_events_by_slot() {
        let mut loadout = Loadout::new(
            Some(Weapon::new("guns", FiringMode::Simultaneous).with_units(units(1, TriggerSettings::single()))),
            Some(Weapon::new("missiles", FiringMode::Sequential).with_units(units(2, TriggerSettings::single()))),
        );
        loadout.get_mut(WeaponSlot::Primary).unwrap().trigger_once();
        loadout.get_mut(WeaponSlot::Secondary).unwrap().trigger_once();
        let events = loadout.drain_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].slot, WeaponSlot::Primary);
        assert_eq!(events[1].slot, WeaponSlot::Secondary);

        loadout.get_mut(WeaponSlot::Primary).unwrap().start_firing();
        assert!(loadout.is_firing(), "weapon stays held until released");
        loadout.stop_all();
        assert!(!loadout.get(WeaponSlot::Primary).unwrap().is_firing());
    }
}
