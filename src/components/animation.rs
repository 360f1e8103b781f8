use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

/// Playhead into the creature's current [`AnimationAsset`].
///
/// The frame index is unbounded; the asset reduces it modulo its frame count
/// when the frame is fetched.
///
/// [`AnimationAsset`]: crate::resources::animationstore::AnimationAsset
#[derive(Debug, Clone, Copy, Default, Component, Serialize, Deserialize)]
pub struct Animation {
    pub frame_index: usize,
    /// Ticks spent on the current frame.
    pub ticks_on_frame: u32,
}

impl Animation {
    /// Advance by one tick; moves to the next frame every `frame_ticks` ticks.
    /// Returns true when the frame changed.
    pub fn step(&mut self, frame_ticks: u32) -> bool {
        self.ticks_on_frame += 1;
        if self.ticks_on_frame < frame_ticks.max(1) {
            return false;
        }
        self.ticks_on_frame = 0;
        self.frame_index = self.frame_index.wrapping_add(1);
        true
    }

    pub fn restart(&mut self) {
        *self = Self::default();
    }
}
