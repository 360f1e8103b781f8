//! F1 toggle for the simulator's debug overlay.
use crate::resources::debugmode::DebugMode;
use crate::resources::worldtime::WorldTime;
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;

#[derive(Event, Debug, Clone, Copy)]
pub struct SwitchDebugEvent {}

/// Insert [`DebugMode`] if absent, remove it otherwise.
pub fn switch_debug_observer(
    _trigger: On<SwitchDebugEvent>,
    mut commands: Commands,
    debug_mode: Option<Res<DebugMode>>,
    time: Option<Res<WorldTime>>,
) {
    let tick = time.map_or(0, |t| t.tick);
    match debug_mode {
        Some(mode) => {
            commands.remove_resource::<DebugMode>();
            log::info!("debug overlay off (was on since tick {})", mode.since_tick);
        }
        None => {
            commands.insert_resource(DebugMode { since_tick: tick });
            log::info!("debug overlay on at tick {}", tick);
        }
    }
}
