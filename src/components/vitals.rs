//! Creature needs and health.
//!
//! Five needs (hunger, thirst, hygiene, affection, energy) slowly decay and
//! are refilled by the matching care action. A value of 100 means fully
//! satisfied. Health follows the needs: it drops while any need is critical
//! and recovers otherwise.

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::components::phase::Task;

pub const VITAL_MAX: u8 = 100;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    pub hunger: u8,
    pub thirst: u8,
    pub hygiene: u8,
    pub affection: u8,
    pub energy: u8,
    pub health: u8,
}

impl Default for Vitals {
    fn default() -> Self {
        Self {
            hunger: 80,
            thirst: 80,
            hygiene: 80,
            affection: 80,
            energy: VITAL_MAX,
            health: VITAL_MAX,
        }
    }
}

impl Vitals {
    /// The five needs with display labels, in a fixed order.
    pub fn needs(&self) -> [(&'static str, u8); 5] {
        [
            ("hunger", self.hunger),
            ("thirst", self.thirst),
            ("hygiene", self.hygiene),
            ("affection", self.affection),
            ("energy", self.energy),
        ]
    }

    fn need_mut(&mut self, task: Task) -> &mut u8 {
        match task {
            Task::Eat => &mut self.hunger,
            Task::Drink => &mut self.thirst,
            Task::Clean => &mut self.hygiene,
            Task::Hug => &mut self.affection,
            Task::Sleep => &mut self.energy,
        }
    }

    /// One tick of a care action.
    pub fn care(&mut self, task: Task) {
        let need = self.need_mut(task);
        *need = need.saturating_add(1).min(VITAL_MAX);
    }

    /// One tick of sleep.
    pub fn rest(&mut self) {
        self.care(Task::Sleep);
    }

    /// One decay step. Energy holds while sleeping.
    pub fn decay(&mut self, sleeping: bool) {
        for need in [
            &mut self.hunger,
            &mut self.thirst,
            &mut self.hygiene,
            &mut self.affection,
        ] {
            *need = need.saturating_sub(1);
        }
        if !sleeping {
            self.energy = self.energy.saturating_sub(1);
        }
    }

    /// Number of needs at or below `threshold`.
    pub fn critical_count(&self, threshold: u8) -> usize {
        self.needs().iter().filter(|(_, v)| *v <= threshold).count()
    }

    /// Health reaction to the needs, applied once per decay step.
    pub fn update_health(&mut self, threshold: u8) {
        if self.critical_count(threshold) > 0 {
            self.health = self.health.saturating_sub(1);
        } else {
            self.health = self.health.saturating_add(1).min(VITAL_MAX);
        }
    }

    pub fn energy_full(&self) -> bool {
        self.energy >= VITAL_MAX
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn care_fills_the_matching_need_up_to_max() {
        let mut v = Vitals {
            hunger: 99,
            ..Vitals::default()
        };
        v.care(Task::Eat);
        v.care(Task::Eat);
        assert_eq!(v.hunger, VITAL_MAX);
        v.care(Task::Drink);
        assert_eq!(v.thirst, 81);
        assert_eq!(v.hygiene, 80);
    }

    #[test]
    fn decay_spares_energy_while_sleeping() {
        let mut v = Vitals::default();
        v.decay(true);
        assert_eq!(v.hunger, 79);
        assert_eq!(v.energy, VITAL_MAX);
        v.decay(false);
        assert_eq!(v.energy, VITAL_MAX - 1);
    }

    #[test]
    fn decay_saturates_at_zero() {
        let mut v = Vitals {
            hunger: 0,
            thirst: 0,
            hygiene: 0,
            affection: 0,
            energy: 0,
            health: 1,
        };
        v.decay(false);
        assert_eq!(v.critical_count(0), 5);
        v.update_health(20);
        assert!(v.is_dead());
        v.update_health(20);
        assert_eq!(v.health, 0);
    }

    #[test]
    fn health_recovers_without_critical_needs() {
        let mut v = Vitals {
            health: 50,
            ..Vitals::default()
        };
        v.update_health(20);
        assert_eq!(v.health, 51);
        v.thirst = 20;
        assert_eq!(v.critical_count(20), 1);
        v.update_health(20);
        assert_eq!(v.health, 50);
    }
}
