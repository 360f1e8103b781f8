//! Simulator debug overlay toggle.
//!
//! Present while the overlay (hit zones, tick counter, audio state) is shown.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct DebugMode {
    /// Tick at which the overlay was switched on.
    pub since_tick: u64,
}
