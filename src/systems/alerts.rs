//! Critical-stat alert beeps.

use bevy_ecs::prelude::*;

use crate::components::phase::{PetPhase, Phase};
use crate::components::vitals::Vitals;
use crate::events::audio::MelodyCmd;
use crate::resources::cues::AudioCueDispatcher;
use crate::resources::petconfig::PetConfig;

/// Phases in which the creature can call for attention.
pub fn alerts_allowed(phase: Phase) -> bool {
    !matches!(phase, Phase::BootIntro | Phase::Hatching) && !phase.is_terminal()
}

/// Queue one alert beep per critical need on every cadence boundary.
///
/// The cadence clock only runs while alerts are allowed.
pub fn alert_system(
    config: Res<PetConfig>,
    mut dispatcher: ResMut<AudioCueDispatcher>,
    query: Query<(&PetPhase, &Vitals)>,
    mut melody_cmds: MessageWriter<MelodyCmd>,
) {
    for (phase, vitals) in query.iter() {
        if !alerts_allowed(phase.current()) {
            continue;
        }
        let critical = vitals.critical_count(config.critical_threshold);
        let beeps = dispatcher.tick_alerts(critical, config.alert_mode);
        if !beeps.is_empty() {
            log::debug!("{} critical needs, {} alert beeps", critical, beeps.len());
        }
        melody_cmds.write_batch(beeps.into_iter().map(|id| MelodyCmd::Enqueue { id }));
    }
}
