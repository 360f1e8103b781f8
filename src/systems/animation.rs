//! Animation systems.
//!
//! - [`animation`] advances each creature's [`Animation`] playhead every
//!   `frame_ticks` ticks. Terminal phases hold the last frame shown.
//! - [`render_creature`] asks the [`AnimationStore`] for the current stage's
//!   asset and blits the frame under the playhead through the injected
//!   [`DisplayDevice`].
//!
//! # Related
//!
//! - [`crate::components::animation::Animation`] – per-entity playhead
//! - [`crate::resources::animationstore::AnimationStore`] – per-stage frames

use bevy_ecs::prelude::*;

use crate::components::animation::Animation;
use crate::components::phase::PetPhase;
use crate::resources::animationstore::AnimationStore;
use crate::resources::drivers::DisplayDevice;
use crate::resources::petconfig::PetConfig;

pub fn animation(config: Res<PetConfig>, mut query: Query<(&PetPhase, &mut Animation)>) {
    for (phase, mut anim) in query.iter_mut() {
        if phase.is_terminal() {
            continue;
        }
        anim.step(config.frame_ticks);
    }
}

/// Draw every creature's current frame, centred on the panel.
pub fn render_creature(
    display: Option<NonSendMut<DisplayDevice>>,
    store: Res<AnimationStore>,
    query: Query<(&PetPhase, &Animation)>,
) {
    let Some(mut display) = display else {
        return;
    };
    let (panel_w, panel_h) = (display.0.width() as i32, display.0.height() as i32);
    for (phase, anim) in query.iter() {
        let assets = store.select(phase.stage());
        // Empty asset: nothing to draw this tick.
        let Some(frame) = assets.walk.frame(anim.frame_index) else {
            continue;
        };
        let x = (panel_w - assets.w as i32) / 2;
        let y = (panel_h - assets.h as i32) / 3;
        display.0.blit(frame, x, y, assets.w, assets.h, assets.key);
    }
}
