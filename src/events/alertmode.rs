//! Switch between frequent and limited critical-need reminders.
use crate::resources::cues::AudioCueDispatcher;
use crate::resources::petconfig::PetConfig;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;

#[derive(Event, Debug, Clone, Copy)]
pub struct SwitchAlertModeEvent {}

/// Flip [`PetConfig::alert_mode`] and restart the alert cadence so the new
/// mode counts from zero.
pub fn switch_alert_mode_observer(
    _trigger: On<SwitchAlertModeEvent>,
    mut config: ResMut<PetConfig>,
    mut dispatcher: ResMut<AudioCueDispatcher>,
) {
    let mode = config.alert_mode.toggled();
    config.alert_mode = mode;
    dispatcher.reset_alerts();
    log::info!("alert mode {:?}, every {} ticks", mode, dispatcher.cadence(mode));
}
