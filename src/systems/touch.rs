//! Touch polling and tap handling.
//!
//! - [`poll_touch`] reads the injected [`TouchDevice`] once per tick, maps the
//!   first sample (if any) to panel coordinates and records it in
//!   [`TouchState`].
//! - [`touch_requests`] turns a fresh tap inside a [`HitZones`] entry into the
//!   zone's [`PetRequest`].

use bevy_ecs::prelude::*;

use crate::events::phase::PetRequest;
use crate::resources::drivers::{DisplayDevice, TouchDevice};
use crate::resources::hitzones::HitZones;
use crate::resources::petconfig::PetConfig;
use crate::resources::touch::{TouchMapper, TouchState};

pub fn poll_touch(
    touch: Option<NonSendMut<TouchDevice>>,
    display: Option<NonSend<DisplayDevice>>,
    config: Res<PetConfig>,
    mapper: Res<TouchMapper>,
    mut state: ResMut<TouchState>,
) {
    let Some(mut touch) = touch else {
        return;
    };
    let (panel_w, panel_h) = match display {
        Some(display) => (display.0.width(), display.0.height()),
        None => (config.panel_width, config.panel_height),
    };
    let point = touch
        .0
        .samples()
        .first()
        .map(|&raw| mapper.map(raw, panel_w, panel_h));
    if let Some(p) = point {
        log::trace!("touch at {},{}", p.x, p.y);
    }
    state.update(point);
}

pub fn touch_requests(
    state: Res<TouchState>,
    zones: Res<HitZones>,
    mut requests: MessageWriter<PetRequest>,
) {
    if !state.just_pressed {
        return;
    }
    let Some(point) = state.point else {
        return;
    };
    if let Some(request) = zones.hit(point) {
        log::debug!("tap at {},{} -> {:?}", point.x, point.y, request);
        requests.write(request);
    }
}
