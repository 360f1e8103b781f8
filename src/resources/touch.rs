//! Touch sensor to screen coordinate mapping and the per-tick touch state.
//!
//! The capacitive sensor reports points in its own native orientation
//! (`raw_w` x `raw_h`, portrait). [`TouchMapper::map`] turns a raw sample
//! into a panel coordinate for the configured display rotation and axis
//! inversion:
//!
//! ```text
//! rotation 0: sx = rx;              sy = ry
//! rotation 1: sx = (raw_h-1) - ry;  sy = rx
//! rotation 2: sx = (raw_w-1) - rx;  sy = (raw_h-1) - ry
//! rotation 3: sx = ry;              sy = (raw_w-1) - rx
//! ```
//!
//! The result is clamped to the panel *before* the optional flips are
//! applied. Swapping the two steps changes results at the panel edges.

use bevy_ecs::prelude::Resource;

/// Native sensor width.
pub const RAW_W: u16 = 240;
/// Native sensor height.
pub const RAW_H: u16 = 320;

/// One raw sample in sensor coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawTouch {
    pub x: u16,
    pub y: u16,
}

/// A point on the panel, always inside `[0, w-1] x [0, h-1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenPoint {
    pub x: u16,
    pub y: u16,
}

/// Fixed rotation and inversion settings of the touch sensor.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchMapper {
    /// Display rotation quadrant; only the two low bits are used.
    pub rotation: u8,
    pub flip_x: bool,
    pub flip_y: bool,
    pub raw_w: u16,
    pub raw_h: u16,
}

impl Default for TouchMapper {
    fn default() -> Self {
        Self {
            rotation: 1,
            flip_x: true,
            flip_y: true,
            raw_w: RAW_W,
            raw_h: RAW_H,
        }
    }
}

fn clamp_axis(v: i32, extent: u16) -> u16 {
    let hi = (extent as i32 - 1).max(0);
    v.clamp(0, hi) as u16
}

fn flip_axis(v: u16, extent: u16) -> u16 {
    extent.saturating_sub(1).saturating_sub(v)
}

impl TouchMapper {
    /// Map a raw sample onto a `panel_w` x `panel_h` panel.
    pub fn map(&self, raw: RawTouch, panel_w: u16, panel_h: u16) -> ScreenPoint {
        let (rx, ry) = (raw.x as i32, raw.y as i32);
        let (raw_w, raw_h) = (self.raw_w as i32, self.raw_h as i32);

        let (sx, sy) = match self.rotation & 3 {
            0 => (rx, ry),
            1 => ((raw_h - 1) - ry, rx),
            2 => ((raw_w - 1) - rx, (raw_h - 1) - ry),
            _ => (ry, (raw_w - 1) - rx),
        };

        let mut x = clamp_axis(sx, panel_w);
        let mut y = clamp_axis(sy, panel_h);
        if self.flip_x {
            x = flip_axis(x, panel_w);
        }
        if self.flip_y {
            y = flip_axis(y, panel_h);
        }
        ScreenPoint { x, y }
    }

    /// Inverse of [`TouchMapper::map`] for points inside the panel.
    ///
    /// Used by the simulator to turn a mouse position back into the raw
    /// sample a real sensor would report.
    pub fn unmap(&self, point: ScreenPoint, panel_w: u16, panel_h: u16) -> RawTouch {
        let mut x = clamp_axis(point.x as i32, panel_w);
        let mut y = clamp_axis(point.y as i32, panel_h);
        if self.flip_x {
            x = flip_axis(x, panel_w);
        }
        if self.flip_y {
            y = flip_axis(y, panel_h);
        }

        let (sx, sy) = (x as i32, y as i32);
        let (raw_w, raw_h) = (self.raw_w as i32, self.raw_h as i32);
        let (rx, ry) = match self.rotation & 3 {
            0 => (sx, sy),
            1 => (sy, (raw_h - 1) - sx),
            2 => ((raw_w - 1) - sx, (raw_h - 1) - sy),
            _ => ((raw_w - 1) - sy, sx),
        };
        RawTouch {
            x: clamp_axis(rx, self.raw_w),
            y: clamp_axis(ry, self.raw_h),
        }
    }
}

/// Touch state of the current tick.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct TouchState {
    /// Mapped point of the first sample this tick, if the sensor had one.
    pub point: Option<ScreenPoint>,
    pub pressed: bool,
    pub just_pressed: bool,
    pub just_released: bool,
}

impl TouchState {
    /// Record this tick's sample (or its absence) and derive edge flags.
    pub fn update(&mut self, point: Option<ScreenPoint>) {
        let was_pressed = self.pressed;
        self.point = point;
        self.pressed = point.is_some();
        self.just_pressed = self.pressed && !was_pressed;
        self.just_released = !self.pressed && was_pressed;
    }
}
