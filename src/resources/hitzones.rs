//! Screen regions that turn a tap into a [`PetRequest`].

use bevy_ecs::prelude::Resource;

use crate::components::phase::Task;
use crate::events::phase::PetRequest;
use crate::resources::touch::ScreenPoint;

/// Axis-aligned rectangle in panel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneRect {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl ZoneRect {
    pub fn contains(&self, p: ScreenPoint) -> bool {
        p.x >= self.x
            && p.y >= self.y
            && (p.x - self.x) < self.w
            && (p.y - self.y) < self.h
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitZone {
    pub rect: ZoneRect,
    pub request: PetRequest,
    pub label: &'static str,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct HitZones {
    zones: Vec<HitZone>,
}

impl HitZones {
    pub fn new(zones: Vec<HitZone>) -> Self {
        Self { zones }
    }

    /// A row of care buttons along the bottom edge, plus the creature area
    /// above it, which wakes a sleeping creature.
    pub fn default_layout(panel_w: u16, panel_h: u16) -> Self {
        let buttons: [(&'static str, Task); 5] = [
            ("EAT", Task::Eat),
            ("DRINK", Task::Drink),
            ("CLEAN", Task::Clean),
            ("HUG", Task::Hug),
            ("SLEEP", Task::Sleep),
        ];
        let bar_h = (panel_h / 6).max(1);
        let bar_y = panel_h.saturating_sub(bar_h);
        let button_w = panel_w / buttons.len() as u16;

        let mut zones: Vec<HitZone> = buttons
            .iter()
            .enumerate()
            .map(|(i, (label, task))| HitZone {
                rect: ZoneRect {
                    x: button_w * i as u16,
                    y: bar_y,
                    w: button_w,
                    h: bar_h,
                },
                request: PetRequest::Care(*task),
                label: *label,
            })
            .collect();
        zones.push(HitZone {
            rect: ZoneRect {
                x: 0,
                y: 0,
                w: panel_w,
                h: bar_y,
            },
            request: PetRequest::Wake,
            label: "WAKE",
        });
        Self { zones }
    }

    pub fn zones(&self) -> &[HitZone] {
        &self.zones
    }

    /// Request of the first zone containing `point`.
    pub fn hit(&self, point: ScreenPoint) -> Option<PetRequest> {
        self.zones
            .iter()
            .find(|zone| zone.rect.contains(point))
            .map(|zone| zone.request)
    }
}
