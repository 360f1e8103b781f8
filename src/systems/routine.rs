//! Timed progress through hatching and care actions.
//!
//! The creature's walk to the action spot, the action itself and the walk
//! back all take a fixed number of ticks from [`PetConfig`]. This system
//! watches [`PetPhase::ticks_in_phase`] and writes the [`PetRequest`] that
//! ends the current phase once its time is up.

use bevy_ecs::prelude::*;

use crate::components::phase::{PetPhase, Phase, Task};
use crate::components::vitals::Vitals;
use crate::events::phase::PetRequest;
use crate::resources::petconfig::PetConfig;

/// Request that ends `phase` after `ticks` ticks in it, if any.
pub fn routine_request(
    phase: &PetPhase,
    vitals: Option<&Vitals>,
    config: &PetConfig,
) -> Option<PetRequest> {
    let t = phase.ticks_in_phase();
    let reached = |limit: u32| t >= limit as u64;
    match phase.current() {
        Phase::Hatching if reached(config.hatch_ticks) => Some(PetRequest::HatchComplete),
        Phase::TaskApproach if reached(config.approach_ticks) => Some(PetRequest::ArrivedAtTask),
        Phase::TaskPerform if reached(config.perform_ticks) => {
            // Sleeping is a task whose "perform" ends in actual sleep.
            if phase.task() == Some(Task::Sleep) {
                Some(PetRequest::Sleep)
            } else {
                Some(PetRequest::TaskDone)
            }
        }
        Phase::TaskReturn if reached(config.return_ticks) => Some(PetRequest::ArrivedHome),
        Phase::Sleeping
            if reached(config.sleep_ticks) || vitals.is_some_and(Vitals::energy_full) =>
        {
            Some(PetRequest::Wake)
        }
        _ => None,
    }
}

pub fn routine_system(
    config: Res<PetConfig>,
    query: Query<(&PetPhase, Option<&Vitals>)>,
    mut requests: MessageWriter<PetRequest>,
) {
    for (phase, vitals) in query.iter() {
        if let Some(request) = routine_request(phase, vitals, &config) {
            log::trace!("routine: {:?} after {} ticks", request, phase.ticks_in_phase());
            requests.write(request);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hatched(config: &PetConfig) -> PetPhase {
        let mut phase = PetPhase::new(0);
        phase.start();
        phase.tick();
        for _ in 0..config.hatch_ticks {
            phase.tick();
        }
        phase
    }

    #[test]
    fn hatching_completes_after_hatch_ticks() {
        let config = PetConfig::new();
        let mut phase = PetPhase::new(0);
        phase.start();
        phase.tick();
        assert_eq!(phase.current(), Phase::Hatching);
        assert_eq!(routine_request(&phase, None, &config), None);
        let phase = hatched(&config);
        assert_eq!(routine_request(&phase, None, &config), Some(PetRequest::HatchComplete));
    }

    #[test]
    fn sleep_task_ends_in_sleep() {
        let config = PetConfig {
            perform_ticks: 0,
            ..PetConfig::new()
        };
        let mut phase = hatched(&config);
        phase.request(PetRequest::HatchComplete);
        phase.request(PetRequest::Care(Task::Sleep));
        phase.request(PetRequest::ArrivedAtTask);
        assert_eq!(routine_request(&phase, None, &config), Some(PetRequest::Sleep));
        phase.request(PetRequest::Sleep);
        assert_eq!(phase.current(), Phase::Sleeping);
    }

    #[test]
    fn full_energy_wakes_the_creature() {
        let config = PetConfig::new();
        let mut phase = hatched(&config);
        phase.request(PetRequest::HatchComplete);
        phase.request(PetRequest::Sleep);
        let tired = Vitals {
            energy: 10,
            ..Vitals::default()
        };
        assert_eq!(routine_request(&phase, Some(&tired), &config), None);
        assert_eq!(
            routine_request(&phase, Some(&Vitals::default()), &config),
            Some(PetRequest::Wake)
        );
    }

    #[test]
    fn idle_has_no_routine() {
        let config = PetConfig::new();
        let mut phase = hatched(&config);
        phase.request(PetRequest::HatchComplete);
        for _ in 0..1000 {
            phase.tick();
        }
        assert_eq!(routine_request(&phase, Some(&Vitals::default()), &config), None);
    }
}
