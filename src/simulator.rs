//! Desktop stand-ins for the panel and the touch sensor.
//!
//! [`PanelDisplay`] blits frames into a shared RGB565 [`Framebuffer`] that
//! the main loop paints with raylib. [`MouseTouch`] reports whatever raw
//! sample the main loop derived from the mouse this frame.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use jurassiclife::resources::animationstore::FrameRef;
use jurassiclife::resources::drivers::{DisplayDriver, TouchDriver, TouchSamples};
use jurassiclife::resources::touch::RawTouch;
use raylib::prelude::Color;

/// Panel background colour (RGB565 black).
pub const BACKGROUND: u16 = 0x0000;

pub struct Framebuffer {
    pub w: u16,
    pub h: u16,
    pub pixels: Vec<u16>,
}

impl Framebuffer {
    pub fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            pixels: vec![BACKGROUND; w as usize * h as usize],
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(BACKGROUND);
    }

    /// Copy a `w` x `h` frame to `(x, y)`, clipped to the buffer, skipping
    /// `key` pixels.
    pub fn blit(&mut self, frame: &FrameRef, x: i32, y: i32, w: u16, h: u16, key: u16) {
        for fy in 0..h as i32 {
            let ty = y + fy;
            if ty < 0 || ty >= self.h as i32 {
                continue;
            }
            for fx in 0..w as i32 {
                let tx = x + fx;
                if tx < 0 || tx >= self.w as i32 {
                    continue;
                }
                let Some(c) = frame.rgb565((fy * w as i32 + fx) as usize) else {
                    return;
                };
                if c != key {
                    self.pixels[ty as usize * self.w as usize + tx as usize] = c;
                }
            }
        }
    }

    /// Horizontal runs of equal, non-background colour: `(x, y, len, rgb565)`.
    pub fn runs(&self) -> impl Iterator<Item = (u16, u16, u16, u16)> + '_ {
        let w = self.w as usize;
        (0..self.h).flat_map(move |y| {
            let row = &self.pixels[y as usize * w..(y as usize + 1) * w];
            let mut out = Vec::new();
            let mut x = 0;
            while x < row.len() {
                let c = row[x];
                let start = x;
                while x < row.len() && row[x] == c {
                    x += 1;
                }
                if c != BACKGROUND {
                    out.push((start as u16, y, (x - start) as u16, c));
                }
            }
            out
        })
    }
}

pub fn rgb565_to_color(c: u16) -> Color {
    let r = ((c >> 11) & 0x1F) as u8;
    let g = ((c >> 5) & 0x3F) as u8;
    let b = (c & 0x1F) as u8;
    Color::new(r << 3 | r >> 2, g << 2 | g >> 4, b << 3 | b >> 2, 255)
}

pub struct PanelDisplay {
    pub buffer: Rc<RefCell<Framebuffer>>,
    rotation: u8,
    brightness: u8,
}

impl PanelDisplay {
    pub fn new(buffer: Rc<RefCell<Framebuffer>>) -> Self {
        Self {
            buffer,
            rotation: 0,
            brightness: 255,
        }
    }
}

impl DisplayDriver for PanelDisplay {
    fn init(&mut self) {
        self.buffer.borrow_mut().clear();
    }

    fn set_rotation(&mut self, rotation: u8) {
        self.rotation = rotation & 3;
        log::debug!("panel rotation {}", self.rotation);
    }

    fn set_brightness(&mut self, level: u8) {
        self.brightness = level;
        log::debug!("panel brightness {}", self.brightness);
    }

    fn width(&self) -> u16 {
        self.buffer.borrow().w
    }

    fn height(&self) -> u16 {
        self.buffer.borrow().h
    }

    fn blit(&mut self, frame: &FrameRef, x: i32, y: i32, w: u16, h: u16, key: u16) {
        self.buffer.borrow_mut().blit(frame, x, y, w, h, key);
    }
}

pub struct MouseTouch {
    pub sample: Rc<Cell<Option<RawTouch>>>,
}

impl TouchDriver for MouseTouch {
    fn init(&mut self) {
        self.sample.set(None);
    }

    fn samples(&mut self) -> TouchSamples {
        self.sample.get().into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blit_clips_and_skips_the_key() {
        let mut fb = Framebuffer::new(4, 4);
        // 2x2 frame: key, red, red, key
        let mut pixels = Vec::new();
        for c in [0xF81Fu16, 0xF800, 0xF800, 0xF81F] {
            pixels.extend_from_slice(&c.to_le_bytes());
        }
        let frame = FrameRef::new("t", pixels);
        // Only the bottom-left pixel of the frame lands inside.
        fb.blit(&frame, 3, -1, 2, 2, 0xF81F);
        assert_eq!(fb.pixels.iter().filter(|&&c| c != BACKGROUND).count(), 1);
        assert_eq!(fb.pixels[3], 0xF800);

        fb.clear();
        fb.blit(&frame, 0, 0, 2, 2, 0xF81F);
        assert_eq!(&fb.pixels[0..2], &[BACKGROUND, 0xF800]);
        assert_eq!(fb.pixels[4], 0xF800);
        assert_eq!(fb.pixels[5], BACKGROUND);
        assert_eq!(fb.runs().count(), 2);
    }

    #[test]
    fn rgb565_expands_to_full_range() {
        let white = rgb565_to_color(0xFFFF);
        assert_eq!((white.r, white.g, white.b), (255, 255, 255));
        let red = rgb565_to_color(0xF800);
        assert_eq!((red.r, red.g, red.b), (255, 0, 0));
    }
}
