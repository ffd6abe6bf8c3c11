use serde::{Deserialize, Serialize};

use crate::protocol::color::Rgb;

/// Target color for one LED of the strip.
///
/// Holds are only created by decoding a validated frame (or by callers
/// building frames to send) and are never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hold {
    pub position: u16,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Hold {
    pub const fn new(position: u16, color: Rgb) -> Self {
        Self {
            position,
            red: color.red,
            green: color.green,
            blue: color.blue,
        }
    }

    pub const fn color(&self) -> Rgb {
        Rgb::new(self.red, self.green, self.blue)
    }
}
