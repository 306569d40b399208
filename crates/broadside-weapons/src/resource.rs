//! Resource gating for weapons: ammunition, energy, heat.
//!
//! A `ResourceHandler` pairs a container with a consumption policy. The
//! weapon asks every handler whether it is ready before firing and charges
//! it per firing round or per second of held fire.

use broadside_core::enums::ConsumptionPolicy;

/// Anything a weapon can draw from or load up.
pub trait ResourceContainer: std::fmt::Debug {
    /// Whether `quantity` can be drawn right now.
    fn is_ready(&self, quantity: f32) -> bool;

    fn consume(&mut self, quantity: f32);

    /// Regenerate / dissipate over time.
    fn tick(&mut self, _dt: f32) {}

    /// Fill level in [0, 1] for display.
    fn fraction(&self) -> f32;
}

/// Depletable store: ammunition, capacitor charge, fuel.
#[derive(Debug, Clone)]
pub struct ResourcePool {
    pub amount: f32,
    pub capacity: f32,
    /// Units regained per second, capped at capacity.
    pub regen_per_second: f32,
}

impl ResourcePool {
    pub fn new(capacity: f32) -> Self {
        Self {
            amount: capacity,
            capacity,
            regen_per_second: 0.0,
        }
    }

    pub fn with_regen(mut self, per_second: f32) -> Self {
        self.regen_per_second = per_second;
        self
    }

    pub fn with_amount(mut self, amount: f32) -> Self {
        self.amount = amount.min(self.capacity);
        self
    }
}

impl ResourceContainer for ResourcePool {
    fn is_ready(&self, quantity: f32) -> bool {
        self.amount > 0.0 && self.amount + f32::EPSILON >= quantity
    }

    fn consume(&mut self, quantity: f32) {
        self.amount = (self.amount - quantity).max(0.0);
    }

    fn tick(&mut self, dt: f32) {
        if self.regen_per_second > 0.0 {
            self.amount = (self.amount + self.regen_per_second * dt).min(self.capacity);
        }
    }

    fn fraction(&self) -> f32 {
        if self.capacity > 0.0 {
            self.amount / self.capacity
        } else {
            0.0
        }
    }
}

/// Heat that builds with use and bleeds off over time.
///
/// Hitting capacity overheats the sink; it stays locked out until heat
/// falls to `recovery_fraction` of capacity.
#[derive(Debug, Clone)]
pub struct HeatSink {
    pub heat: f32,
    pub capacity: f32,
    pub dissipation_per_second: f32,
    pub recovery_fraction: f32,
    overheated: bool,
}

impl HeatSink {
    pub fn new(capacity: f32, dissipation_per_second: f32) -> Self {
        Self {
            heat: 0.0,
            capacity,
            dissipation_per_second,
            recovery_fraction: 0.5,
            overheated: false,
        }
    }

    pub fn with_recovery_fraction(mut self, fraction: f32) -> Self {
        self.recovery_fraction = fraction;
        self
    }

    pub fn is_overheated(&self) -> bool {
        self.overheated
    }
}

impl ResourceContainer for HeatSink {
    fn is_ready(&self, quantity: f32) -> bool {
        !self.overheated && self.heat + quantity <= self.capacity
    }

    fn consume(&mut self, quantity: f32) {
        self.heat += quantity;
        if self.heat >= self.capacity {
            self.heat = self.capacity;
            if !self.overheated {
                log::debug!("heat sink overheated at {:.1}", self.capacity);
            }
            self.overheated = true;
        }
    }

    fn tick(&mut self, dt: f32) {
        self.heat = (self.heat - self.dissipation_per_second * dt).max(0.0);
        if self.overheated && self.heat <= self.capacity * self.recovery_fraction {
            self.overheated = false;
        }
    }

    fn fraction(&self) -> f32 {
        if self.capacity > 0.0 {
            self.heat / self.capacity
        } else {
            0.0
        }
    }
}

/// One resource requirement of a weapon.
#[derive(Debug)]
pub struct ResourceHandler {
    container: Box<dyn ResourceContainer>,
    /// Quantity per firing round (PerUse) or per second (PerSecond).
    pub amount: f32,
    pub policy: ConsumptionPolicy,
    /// Multiply by unit count when all units fire together.
    pub per_unit: bool,
}

impl ResourceHandler {
    pub fn new(container: impl ResourceContainer + 'static, amount: f32, policy: ConsumptionPolicy) -> Self {
        Self {
            container: Box::new(container),
            amount,
            policy,
            per_unit: false,
        }
    }

    pub fn per_use(container: impl ResourceContainer + 'static, amount: f32) -> Self {
        Self::new(container, amount, ConsumptionPolicy::PerUse)
    }

    pub fn per_second(container: impl ResourceContainer + 'static, amount: f32) -> Self {
        Self::new(container, amount, ConsumptionPolicy::PerSecond)
    }

    pub fn with_per_unit(mut self, per_unit: bool) -> Self {
        self.per_unit = per_unit;
        self
    }

    pub fn container(&self) -> &dyn ResourceContainer {
        self.container.as_ref()
    }

    /// Quantity that must be available before fire is allowed.
    pub fn required_quantity(&self, scale: f32) -> f32 {
        match self.policy {
            ConsumptionPolicy::PerUse => self.amount * scale,
            ConsumptionPolicy::PerSecond => 0.0,
        }
    }

    pub fn is_ready(&self, scale: f32) -> bool {
        self.container.is_ready(self.required_quantity(scale))
    }

    /// Charge `rounds` firing rounds.
    pub fn charge_use(&mut self, scale: f32, rounds: u32) {
        if self.policy == ConsumptionPolicy::PerUse && rounds > 0 {
            self.container.consume(self.amount * scale * rounds as f32);
        }
    }

    /// Charge `dt` seconds of held fire.
    pub fn charge_held(&mut self, scale: f32, dt: f32) {
        if self.policy == ConsumptionPolicy::PerSecond {
            self.container.consume(self.amount * scale * dt);
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.container.tick(dt);
    }
}
