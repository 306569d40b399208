//! Multi-unit weapon: coordinates units under one trigger.
//!
//! A weapon owns an ordered list of units and decides which of them fire:
//! all together (Simultaneous) or one at a time behind a cursor
//! (Sequential). Firing is gated on the enabling module, registered
//! preconditions, resource readiness and unit readiness.

use std::fmt;

use broadside_core::enums::FiringMode;
use broadside_core::events::{TriggerEvent, WeaponEvent};

use crate::resource::ResourceHandler;
use crate::unit::WeaponUnit;

type Condition = Box<dyn Fn() -> bool>;

pub struct Weapon {
    name: String,
    units: Vec<WeaponUnit>,
    firing_mode: FiringMode,
    /// Next unit to fire in Sequential mode.
    cursor: usize,
    /// Cursor value restored whenever sequential fire stops.
    start_index_override: Option<usize>,
    resources: Vec<ResourceHandler>,
    conditions: Vec<Condition>,
    module_active: bool,
    triggering: bool,
    /// A denial was already reported and the trigger has not been released.
    denial_latched: bool,
    events: Vec<WeaponEvent>,
}

impl fmt::Debug for Weapon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Weapon")
            .field("name", &self.name)
            .field("units", &self.units)
            .field("firing_mode", &self.firing_mode)
            .field("cursor", &self.cursor)
            .field("start_index_override", &self.start_index_override)
            .field("resources", &self.resources)
            .field("conditions", &self.conditions.len())
            .field("module_active", &self.module_active)
            .field("triggering", &self.triggering)
            .finish()
    }
}

impl Weapon {
    pub fn new(name: impl Into<String>, firing_mode: FiringMode) -> Self {
        Self {
            name: name.into(),
            units: Vec::new(),
            firing_mode,
            cursor: 0,
            start_index_override: None,
            resources: Vec::new(),
            conditions: Vec::new(),
            module_active: true,
            triggering: false,
            denial_latched: false,
            events: Vec::new(),
        }
    }

    pub fn with_unit(mut self, unit: WeaponUnit) -> Self {
        self.units.push(unit);
        self.apply_start_index();
        self
    }

    pub fn with_units(mut self, units: impl IntoIterator<Item = WeaponUnit>) -> Self {
        self.units.extend(units);
        self.apply_start_index();
        self
    }

    pub fn with_resource(mut self, handler: ResourceHandler) -> Self {
        self.resources.push(handler);
        self
    }

    /// Sequential fire starts from `index` and returns to it on every stop.
    pub fn with_start_index_override(mut self, index: usize) -> Self {
        self.start_index_override = Some(index);
        self.apply_start_index();
        self
    }

    /// Register a precondition that must hold for the weapon to fire.
    pub fn add_condition(&mut self, condition: impl Fn() -> bool + 'static) {
        self.conditions.push(Box::new(condition));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn firing_mode(&self) -> FiringMode {
        self.firing_mode
    }

    pub fn units(&self) -> &[WeaponUnit] {
        &self.units
    }

    pub fn unit_mut(&mut self, index: usize) -> Option<&mut WeaponUnit> {
        self.units.get_mut(index)
    }

    pub fn resources(&self) -> &[ResourceHandler] {
        &self.resources
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_firing(&self) -> bool {
        self.triggering
    }

    /// A denied start has been reported and the trigger is still held.
    pub fn has_pending_denial(&self) -> bool {
        self.denial_latched
    }

    pub fn is_module_active(&self) -> bool {
        self.module_active
    }

    /// Activate or deactivate the enabling module. Deactivating stops fire
    /// at once, including a burst still finishing after release.
    pub fn set_module_active(&mut self, active: bool) {
        self.module_active = active;
        if !active {
            self.halt();
        }
    }

    /// Whether the weapon may fire right now.
    pub fn can_fire(&self) -> bool {
        if !self.module_active || self.units.is_empty() {
            return false;
        }
        if !self.conditions.iter().all(|condition| condition()) {
            return false;
        }
        if !self.resources_ready() {
            return false;
        }
        match self.firing_mode {
            FiringMode::Simultaneous => self.units.iter().all(WeaponUnit::can_fire),
            FiringMode::Sequential => self.units[self.cursor].can_fire(),
        }
    }

    /// Pull the trigger. Returns true if firing started with this call.
    ///
    /// A denied start emits `FiringFailed` once; further denied starts stay
    /// silent until `stop_firing` releases the trigger or a start succeeds.
    pub fn start_firing(&mut self) -> bool {
        if self.triggering {
            return false;
        }
        if !self.can_fire() {
            if !self.denial_latched {
                log::debug!("{}: fire denied", self.name);
                self.events.push(WeaponEvent::FiringFailed);
                self.denial_latched = true;
            }
            return false;
        }

        self.denial_latched = false;
        self.triggering = true;
        self.events.push(WeaponEvent::FiringStarted);
        log::debug!("{}: firing started ({:?})", self.name, self.firing_mode);

        match self.firing_mode {
            FiringMode::Simultaneous => {
                for unit in &mut self.units {
                    unit.trigger_mut().start_triggering();
                }
            }
            FiringMode::Sequential => {
                let index = self.cursor;
                let unit = &mut self.units[index];
                unit.trigger_mut().start_triggering();
                if unit.trigger().is_continuous() {
                    self.advance_cursor();
                }
            }
        }

        self.settle_rounds();
        true
    }

    /// Release the trigger.
    pub fn stop_firing(&mut self) {
        self.denial_latched = false;
        if self.triggering {
            self.triggering = false;
            for unit in &mut self.units {
                unit.trigger_mut().stop_triggering();
            }
            self.collect_unit_events(u32::MAX);
            self.events.push(WeaponEvent::FiringStopped);
            log::debug!("{}: firing stopped", self.name);
        }
        if self.firing_mode == FiringMode::Sequential {
            if let Some(index) = self.start_index_override {
                self.cursor = self.wrap(index);
            }
        }
    }

    /// Fire one round outside any cadence.
    pub fn trigger_once(&mut self) -> bool {
        if !self.can_fire() {
            self.events.push(WeaponEvent::FiringFailed);
            return false;
        }

        match self.firing_mode {
            FiringMode::Simultaneous => {
                for unit in &mut self.units {
                    unit.trigger_mut().trigger_once();
                }
            }
            FiringMode::Sequential => {
                let index = self.cursor;
                self.units[index].trigger_mut().trigger_once();
                self.advance_cursor();
            }
        }

        self.settle_rounds();
        true
    }

    /// Re-validate held fire. Forces a stop (and reports failure) when the
    /// weapon can no longer fire; otherwise charges per-second resources.
    pub fn on_firing_tick(&mut self, dt: f32) -> bool {
        if !self.triggering {
            return false;
        }
        if !self.can_fire() {
            log::debug!("{}: fire interrupted", self.name);
            self.halt();
            self.events.push(WeaponEvent::FiringFailed);
            self.denial_latched = true;
            return false;
        }
        for index in 0..self.resources.len() {
            let scale = self.resource_scale(&self.resources[index]);
            self.resources[index].charge_held(scale, dt);
        }
        true
    }

    /// Advance resources, held-fire checks and every unit's cadence.
    pub fn tick(&mut self, dt: f32) {
        for handler in &mut self.resources {
            handler.tick(dt);
        }
        self.on_firing_tick(dt);
        for unit in &mut self.units {
            unit.trigger_mut().tick(dt);
        }
        self.settle_rounds();
    }

    /// Expected damage per second given each unit's damage per action.
    pub fn damage_per_second(&self) -> f32 {
        match self.firing_mode {
            FiringMode::Simultaneous => self
                .units
                .iter()
                .map(|unit| unit.trigger().fire_rate() * unit.damage)
                .sum(),
            FiringMode::Sequential => self
                .units
                .get(self.cursor)
                .map(|unit| unit.trigger().fire_rate() * unit.damage)
                .unwrap_or(0.0),
        }
    }

    /// Take the events buffered since the last drain.
    pub fn drain_events(&mut self) -> Vec<WeaponEvent> {
        std::mem::take(&mut self.events)
    }

    /// Stop every unit at once, dropping any burst still in flight. The
    /// cursor override is left alone.
    fn halt(&mut self) {
        for (index, unit) in self.units.iter_mut().enumerate() {
            let trigger = unit.trigger_mut();
            let beam_on = trigger.is_continuous() && trigger.is_triggering();
            trigger.cancel();
            if beam_on {
                self.events.push(WeaponEvent::UnitBeamOff { unit: index });
            }
        }
        if self.triggering {
            self.triggering = false;
            self.events.push(WeaponEvent::FiringStopped);
        }
    }

    /// Pay for the unit actions buffered since the last settle, one round
    /// at a time, and publish only the rounds that were paid for. A
    /// shortfall cancels every schedule; held fire also reports a failure.
    fn settle_rounds(&mut self) {
        let pending = self.pending_rounds();
        let mut paid = 0;
        while paid < pending && self.resources_ready() {
            self.charge_use(1);
            paid += 1;
        }
        self.collect_unit_events(paid);

        if paid < pending {
            log::debug!("{}: resources ran out after {paid} of {pending} rounds", self.name);
            let held = self.triggering;
            self.halt();
            if held {
                self.events.push(WeaponEvent::FiringFailed);
                self.denial_latched = true;
            }
        }
    }

    fn pending_rounds(&self) -> u32 {
        let pending = self.units.iter().map(|unit| unit.trigger().pending_actions());
        match self.firing_mode {
            FiringMode::Simultaneous => pending.max().unwrap_or(0),
            FiringMode::Sequential => pending.sum(),
        }
    }

    fn resources_ready(&self) -> bool {
        self.resources
            .iter()
            .all(|handler| handler.is_ready(self.resource_scale(handler)))
    }

    fn apply_start_index(&mut self) {
        if let Some(index) = self.start_index_override {
            self.cursor = self.wrap(index);
        }
    }

    fn advance_cursor(&mut self) {
        self.cursor = self.wrap(self.cursor + 1);
    }

    fn wrap(&self, index: usize) -> usize {
        if self.units.is_empty() {
            0
        } else {
            index % self.units.len()
        }
    }

    fn resource_scale(&self, handler: &ResourceHandler) -> f32 {
        if handler.per_unit && self.firing_mode == FiringMode::Simultaneous {
            self.units.len() as f32
        } else {
            1.0
        }
    }

    fn charge_use(&mut self, rounds: u32) {
        if rounds == 0 {
            return;
        }
        for index in 0..self.resources.len() {
            let scale = self.resource_scale(&self.resources[index]);
            self.resources[index].charge_use(scale, rounds);
        }
    }

    /// Translate unit trigger events into weapon events, dropping actions
    /// past `max_rounds`. A round is all units firing together in
    /// Simultaneous mode and every single shot in Sequential mode.
    fn collect_unit_events(&mut self, max_rounds: u32) {
        let mut total_actions = 0;

        for (index, unit) in self.units.iter_mut().enumerate() {
            let continuous = unit.trigger().is_continuous();
            let mut actions = 0;
            for event in unit.trigger_mut().drain_events() {
                match event {
                    TriggerEvent::Action => {
                        let round = match self.firing_mode {
                            FiringMode::Simultaneous => actions,
                            FiringMode::Sequential => total_actions,
                        };
                        if round >= max_rounds {
                            continue;
                        }
                        actions += 1;
                        total_actions += 1;
                        self.events.push(WeaponEvent::UnitFired { unit: index });
                    }
                    TriggerEvent::Started if continuous => {
                        self.events.push(WeaponEvent::UnitBeamOn { unit: index });
                    }
                    TriggerEvent::Stopped if continuous => {
                        self.events.push(WeaponEvent::UnitBeamOff { unit: index });
                    }
                    TriggerEvent::Started | TriggerEvent::Stopped => {}
                }
            }
        }
    }
}
