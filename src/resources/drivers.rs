//! Hardware driver interfaces.
//!
//! The panel, the touch sensor and the buzzer are owned by the surrounding
//! application and injected into the world as non-send resources
//! ([`DisplayDevice`], [`TouchDevice`]) or handed to the audio thread
//! ([`ToneOutput`]). Nothing in the crate reaches for a global device.

use smallvec::SmallVec;

use crate::resources::animationstore::FrameRef;
use crate::resources::touch::RawTouch;

/// Up to five simultaneous touch points, as capacitive controllers report.
pub type TouchSamples = SmallVec<[RawTouch; 5]>;

pub trait DisplayDriver {
    fn init(&mut self);
    /// Rotation quadrant, `0..=3`.
    fn set_rotation(&mut self, rotation: u8);
    fn set_brightness(&mut self, level: u8);
    /// Panel width in the current rotation.
    fn width(&self) -> u16;
    /// Panel height in the current rotation.
    fn height(&self) -> u16;
    /// Draw a `w` x `h` RGB565 frame at `(x, y)`, skipping pixels equal to `key`.
    fn blit(&mut self, frame: &FrameRef, x: i32, y: i32, w: u16, h: u16, key: u16);
}

pub trait TouchDriver {
    fn init(&mut self);
    /// Samples available right now. Must return immediately, empty when the
    /// sensor has nothing.
    fn samples(&mut self) -> TouchSamples;
}

/// Single-voice tone generator driven by the audio thread.
pub trait ToneOutput {
    /// Start sounding `freq_hz`, or go silent with `None`.
    fn tone(&mut self, freq_hz: Option<u32>);
}

/// Non-send resource wrapping the injected display driver.
pub struct DisplayDevice(pub Box<dyn DisplayDriver>);

/// Non-send resource wrapping the injected touch driver.
pub struct TouchDevice(pub Box<dyn TouchDriver>);

/// Tone sink that only logs. Used when no audio hardware is available.
#[derive(Debug, Default)]
pub struct LogTone {
    current: Option<u32>,
}

impl ToneOutput for LogTone {
    fn tone(&mut self, freq_hz: Option<u32>) {
        if freq_hz != self.current {
            log::trace!("tone {:?}", freq_hz);
            self.current = freq_hz;
        }
    }
}
