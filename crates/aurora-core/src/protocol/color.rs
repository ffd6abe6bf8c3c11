//! Packed 8-bit color: `RRRGGGBB`, most significant field first.
//!
//! Decoding scales each field to 0..=255 with truncating integer division,
//! so the mapping is lossy: red and green have eight levels, blue four.

use serde::{Deserialize, Serialize};

const RED_SHIFT: u8 = 5;
const GREEN_SHIFT: u8 = 2;
const THREE_BITS: u8 = 0b111;
const TWO_BITS: u8 = 0b11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// Expand a packed color byte to full RGB.
pub fn decode_color(packed: u8) -> Rgb {
    Rgb {
        red: scale_up(packed >> RED_SHIFT & THREE_BITS, THREE_BITS),
        green: scale_up(packed >> GREEN_SHIFT & THREE_BITS, THREE_BITS),
        blue: scale_up(packed & TWO_BITS, TWO_BITS),
    }
}

/// Quantize an RGB color to the nearest packed byte.
pub fn encode_color(color: Rgb) -> u8 {
    scale_down(color.red, THREE_BITS) << RED_SHIFT
        | scale_down(color.green, THREE_BITS) << GREEN_SHIFT
        | scale_down(color.blue, TWO_BITS)
}

fn scale_up(value: u8, max: u8) -> u8 {
    (value as u16 * 255 / max as u16) as u8
}

fn scale_down(channel: u8, max: u8) -> u8 {
    ((channel as u16 * max as u16 + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::{Rgb, decode_color, encode_color};

    #[test]
    fn full_byte_is_white() {
        assert_eq!(decode_color(0xFF), Rgb::new(255, 255, 255));
        assert_eq!(decode_color(0x00), Rgb::BLACK);
    }

    #[test]
    fn fields_truncate() {
        assert_eq!(decode_color(0b1010_0001), Rgb::new(182, 0, 85));
        assert_eq!(decode_color(0b0000_0100), Rgb::new(0, 36, 0));
        assert_eq!(decode_color(0b0000_0010), Rgb::new(0, 0, 170));
    }

    #[test]
    fn primaries() {
        assert_eq!(decode_color(0b1110_0000), Rgb::new(255, 0, 0));
        assert_eq!(decode_color(0b0001_1100), Rgb::new(0, 255, 0));
        assert_eq!(decode_color(0b0000_0011), Rgb::new(0, 0, 255));
    }

    #[test]
    fn encode_picks_the_decoded_level() {
        for packed in 0..=u8::MAX {
            let decoded = decode_color(packed);
            assert_eq!(encode_color(decoded), packed, "packed {packed:#010b}");
        }
    }

    #[test]
    fn encode_rounds_to_nearest() {
        assert_eq!(decode_color(encode_color(Rgb::new(250, 5, 130))), Rgb::new(255, 0, 170));
    }
}
