//! Primary/secondary weapon slots of one ship.

use broadside_core::enums::WeaponSlot;
use broadside_core::events::SlotEvent;

use crate::weapon::Weapon;

#[derive(Debug, Default)]
pub struct Loadout {
    pub primary: Option<Weapon>,
    pub secondary: Option<Weapon>,
}

impl Loadout {
    pub fn new(primary: Option<Weapon>, secondary: Option<Weapon>) -> Self {
        Self { primary, secondary }
    }

    pub fn get(&self, slot: WeaponSlot) -> Option<&Weapon> {
        match slot {
            WeaponSlot::Primary => self.primary.as_ref(),
            WeaponSlot::Secondary => self.secondary.as_ref(),
        }
    }

    pub fn get_mut(&mut self, slot: WeaponSlot) -> Option<&mut Weapon> {
        match slot {
            WeaponSlot::Primary => self.primary.as_mut(),
            WeaponSlot::Secondary => self.secondary.as_mut(),
        }
    }

    /// Either slot has its trigger held.
    pub fn is_firing(&self) -> bool {
        self.primary.iter().chain(self.secondary.iter()).any(Weapon::is_firing)
    }

    pub fn tick(&mut self, dt: f32) {
        for weapon in self.weapons_mut() {
            weapon.tick(dt);
        }
    }

    /// Release every trigger.
    pub fn stop_all(&mut self) {
        for weapon in self.weapons_mut() {
            weapon.stop_firing();
        }
    }

    /// Drain both slots' events, tagged by slot.
    pub fn drain_events(&mut self) -> Vec<SlotEvent> {
        let mut out = Vec::new();
        for slot in [WeaponSlot::Primary, WeaponSlot::Secondary] {
            if let Some(weapon) = self.get_mut(slot) {
                out.extend(
                    weapon
                        .drain_events()
                        .into_iter()
                        .map(|event| SlotEvent { slot, event }),
                );
            }
        }
        out
    }

    fn weapons_mut(&mut self) -> impl Iterator<Item = &mut Weapon> {
        self.primary.iter_mut().chain(self.secondary.iter_mut())
    }
}
