//! Needs decay, care effects and death by neglect.

use bevy_ecs::prelude::*;

use crate::components::phase::{PetPhase, Phase};
use crate::components::vitals::Vitals;
use crate::events::phase::PetRequest;
use crate::resources::petconfig::PetConfig;
use crate::resources::worldtime::WorldTime;

/// Phases in which vitals change. The egg and the dead do not get hungry.
pub fn vitals_active(phase: Phase) -> bool {
    !matches!(phase, Phase::BootIntro | Phase::Hatching) && !phase.is_terminal()
}

/// Apply one tick of care and decay to `vitals` for a creature in `phase`.
///
/// Returns true when health has run out.
pub fn step_vitals(vitals: &mut Vitals, phase: &PetPhase, decay_step: bool, critical_threshold: u8) -> bool {
    match phase.current() {
        Phase::TaskPerform => {
            if let Some(task) = phase.task() {
                vitals.care(task);
            }
        }
        Phase::Sleeping => vitals.rest(),
        _ => {}
    }
    if decay_step {
        vitals.decay(phase.current() == Phase::Sleeping);
        vitals.update_health(critical_threshold);
    }
    vitals.is_dead()
}

pub fn vitals_system(
    time: Res<WorldTime>,
    config: Res<PetConfig>,
    mut query: Query<(Entity, &PetPhase, &mut Vitals)>,
    mut requests: MessageWriter<PetRequest>,
) {
    let decay_step = time.every(config.decay_every_ticks);
    for (entity, phase, mut vitals) in query.iter_mut() {
        if !vitals_active(phase.current()) {
            continue;
        }
        if step_vitals(&mut vitals, phase, decay_step, config.critical_threshold) {
            log::info!("{:?}: health ran out", entity);
            requests.write(PetRequest::Die);
        }
    }
}
