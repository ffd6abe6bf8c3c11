//! LED output side: the consumer of decoded batches.

use serde::{Deserialize, Serialize};

use crate::Hold;
use crate::protocol::color::Rgb;

/// A strip of individually addressable LEDs.
///
/// Writes are staged until `show`, matching how WS2812-style drivers latch a
/// full frame at once.
pub trait LedStrip {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Turn every LED off.
    fn clear(&mut self);

    /// Stage a color. Returns `false` when `index` is past the end of the strip.
    fn set_pixel(&mut self, index: usize, color: Rgb) -> bool;

    /// Latch staged writes.
    fn show(&mut self);
}

/// In-memory strip, used in place of hardware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Vec<Rgb>,
    shows: u64,
}

impl PixelBuffer {
    pub fn new(len: usize) -> Self {
        Self {
            pixels: vec![Rgb::BLACK; len],
            shows: 0,
        }
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixel(&self, index: usize) -> Option<Rgb> {
        self.pixels.get(index).copied()
    }

    /// Number of LEDs not switched off.
    pub fn lit(&self) -> usize {
        self.pixels.iter().filter(|p| **p != Rgb::BLACK).count()
    }

    pub fn shows(&self) -> u64 {
        self.shows
    }
}

impl LedStrip for PixelBuffer {
    fn len(&self) -> usize {
        self.pixels.len()
    }

    fn clear(&mut self) {
        self.pixels.fill(Rgb::BLACK);
    }

    fn set_pixel(&mut self, index: usize, color: Rgb) -> bool {
        match self.pixels.get_mut(index) {
            Some(pixel) => {
                *pixel = color;
                true
            }
            None => false,
        }
    }

    fn show(&mut self) {
        self.shows += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderOutcome {
    /// Holds written to the strip.
    pub applied: u64,
    /// Holds whose position lies past the end of the strip.
    pub out_of_range: u64,
}

/// Replace whatever the strip shows with `holds`; unlisted LEDs stay off.
pub fn render_batch<S: LedStrip + ?Sized>(strip: &mut S, holds: &[Hold]) -> RenderOutcome {
    strip.clear();
    strip.show();

    let mut outcome = RenderOutcome::default();
    for hold in holds {
        if strip.set_pixel(hold.position as usize, hold.color()) {
            outcome.applied += 1;
        } else {
            outcome.out_of_range += 1;
        }
    }
    strip.show();
    outcome
}
