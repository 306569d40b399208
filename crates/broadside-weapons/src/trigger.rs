//! Trigger state machine: firing cadence for one weapon unit.
//!
//! The schedule is an explicit phase plus a countdown timer advanced by
//! `tick(dt)`, so cadence can be driven (and tested) with synthetic time.
//! Only one schedule runs at a time; a start while one is in flight is
//! rejected.

use broadside_core::config::TriggerSettings;
use broadside_core::enums::{TriggerMode, TriggerPhase};
use broadside_core::events::TriggerEvent;

/// Float slack when comparing the countdown against zero.
const TIMER_EPSILON: f32 = 1e-5;

#[derive(Debug, Clone)]
pub struct Trigger {
    settings: TriggerSettings,
    phase: TriggerPhase,
    /// Held by the caller.
    triggering: bool,
    enabled: bool,
    /// Seconds until the next scheduled action or burst.
    timer: f32,
    shots_in_burst: u32,
    events: Vec<TriggerEvent>,
}

impl Trigger {
    pub fn new(settings: TriggerSettings) -> Self {
        Self {
            settings,
            phase: TriggerPhase::Idle,
            triggering: false,
            enabled: true,
            timer: 0.0,
            shots_in_burst: 0,
            events: Vec::new(),
        }
    }

    pub fn settings(&self) -> &TriggerSettings {
        &self.settings
    }

    pub fn mode(&self) -> TriggerMode {
        self.settings.mode
    }

    pub fn phase(&self) -> TriggerPhase {
        self.phase
    }

    pub fn is_triggering(&self) -> bool {
        self.triggering
    }

    /// A schedule (or continuous discharge) is in progress.
    pub fn is_busy(&self) -> bool {
        self.phase != TriggerPhase::Idle
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// OnOff triggers are "firing" for as long as they are held.
    pub fn is_continuous(&self) -> bool {
        self.settings.mode == TriggerMode::OnOff
    }

    /// Replace the cadence settings. Any running schedule is cancelled.
    pub fn set_settings(&mut self, settings: TriggerSettings) {
        self.cancel();
        self.settings = settings;
    }

    /// Enable or disable the owner. Disabling stops everything silently.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.cancel();
        }
        self.enabled = enabled;
    }

    /// Begin triggering. Returns false when disabled or already running.
    pub fn start_triggering(&mut self) -> bool {
        if !self.enabled || self.triggering || self.phase != TriggerPhase::Idle {
            return false;
        }

        self.triggering = true;
        self.events.push(TriggerEvent::Started);

        match self.settings.mode {
            TriggerMode::Single => {
                self.act();
                self.triggering = false;
                self.events.push(TriggerEvent::Stopped);
            }
            TriggerMode::Automatic => {
                self.act();
                self.schedule(TriggerPhase::WaitingBetweenShots, self.settings.action_interval, 0.0);
            }
            TriggerMode::Burst => {
                if self.settings.burst_size == 0 {
                    self.triggering = false;
                    self.events.push(TriggerEvent::Stopped);
                } else {
                    self.shots_in_burst = 0;
                    self.burst_shot(0.0);
                }
            }
            TriggerMode::OnOff => {
                self.phase = TriggerPhase::Firing;
            }
        }
        true
    }

    /// Release the trigger. A burst already in flight finishes its shots.
    pub fn stop_triggering(&mut self) {
        if !self.triggering {
            return;
        }
        self.triggering = false;
        self.events.push(TriggerEvent::Stopped);

        let mid_burst = self.settings.mode == TriggerMode::Burst
            && self.phase == TriggerPhase::WaitingBetweenShots;
        if !mid_burst {
            self.reset_schedule();
        }
    }

    /// Abort any schedule immediately, dropping remaining shots. Emits nothing.
    pub fn cancel(&mut self) {
        self.triggering = false;
        self.reset_schedule();
    }

    /// One action outside the schedule.
    pub fn trigger_once(&mut self) -> bool {
        if !self.enabled {
            return false;
        }
        self.act();
        true
    }

    /// Advance the schedule by `dt` seconds. Returns the number of actions taken.
    pub fn tick(&mut self, dt: f32) -> u32 {
        if !self.enabled
            || !matches!(
                self.phase,
                TriggerPhase::WaitingBetweenShots | TriggerPhase::WaitingBetweenBursts
            )
        {
            return 0;
        }

        self.timer -= dt;
        let mut actions = 0;

        while self.timer <= TIMER_EPSILON {
            let overshoot = self.timer.min(0.0);
            let keep_going = match (self.phase, self.settings.mode) {
                (TriggerPhase::WaitingBetweenShots, TriggerMode::Automatic) => {
                    if !self.triggering {
                        self.reset_schedule();
                        break;
                    }
                    self.act();
                    actions += 1;
                    self.schedule(
                        TriggerPhase::WaitingBetweenShots,
                        self.settings.action_interval,
                        overshoot,
                    )
                }
                (TriggerPhase::WaitingBetweenShots, TriggerMode::Burst) => {
                    actions += 1;
                    self.burst_shot(overshoot)
                }
                (TriggerPhase::WaitingBetweenBursts, TriggerMode::Burst) => {
                    if !self.triggering {
                        self.reset_schedule();
                        break;
                    }
                    self.shots_in_burst = 0;
                    actions += 1;
                    self.burst_shot(overshoot)
                }
                _ => {
                    self.reset_schedule();
                    break;
                }
            };
            if !keep_going || self.phase == TriggerPhase::Idle {
                break;
            }
        }
        actions
    }

    /// Actions per second for damage-per-second estimates.
    pub fn fire_rate(&self) -> f32 {
        let s = &self.settings;
        match s.mode {
            TriggerMode::Automatic => {
                if s.action_interval > 0.0 {
                    1.0 / s.action_interval
                } else {
                    0.0
                }
            }
            TriggerMode::Burst => {
                if s.burst_size == 0 {
                    return 0.0;
                }
                let cycle = (s.burst_size - 1) as f32 * s.action_interval + s.burst_interval;
                if cycle > 0.0 {
                    s.burst_size as f32 / cycle
                } else {
                    0.0
                }
            }
            TriggerMode::Single | TriggerMode::OnOff => 1.0,
        }
    }

    /// Actions buffered and not yet drained.
    pub fn pending_actions(&self) -> u32 {
        self.events
            .iter()
            .filter(|event| **event == TriggerEvent::Action)
            .count() as u32
    }

    /// Take the events buffered since the last drain.
    pub fn drain_events(&mut self) -> Vec<TriggerEvent> {
        std::mem::take(&mut self.events)
    }

    fn act(&mut self) {
        self.events.push(TriggerEvent::Action);
    }

    /// Fire one shot of the current burst and schedule what follows.
    fn burst_shot(&mut self, overshoot: f32) -> bool {
        self.act();
        self.shots_in_burst += 1;

        if self.shots_in_burst < self.settings.burst_size {
            return self.schedule(
                TriggerPhase::WaitingBetweenShots,
                self.settings.action_interval,
                overshoot,
            );
        }

        if self.settings.repeat_burst && self.triggering {
            return self.schedule(
                TriggerPhase::WaitingBetweenBursts,
                self.settings.burst_interval,
                overshoot,
            );
        }

        self.reset_schedule();
        if self.triggering {
            self.triggering = false;
            self.events.push(TriggerEvent::Stopped);
        }
        false
    }

    /// Enter a waiting phase. Returns false for non-positive waits so a
    /// zero interval fires at most once per tick.
    fn schedule(&mut self, phase: TriggerPhase, wait: f32, overshoot: f32) -> bool {
        self.phase = phase;
        if wait <= 0.0 {
            self.timer = 0.0;
            return false;
        }
        self.timer = overshoot + wait;
        true
    }

    fn reset_schedule(&mut self) {
        self.phase = TriggerPhase::Idle;
        self.timer = 0.0;
        self.shots_in_burst = 0;
    }
}
