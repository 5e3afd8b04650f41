//! Fixed RGB palette shared by every office texture.

use image::Rgba;

pub const fn rgb(hex: u32) -> Rgba<u8> {
    Rgba([(hex >> 16) as u8, (hex >> 8) as u8, hex as u8, 0xFF])
}

pub const WHITE: Rgba<u8> = rgb(0xFFFFFF);
pub const BLACK: Rgba<u8> = rgb(0x000000);

pub const FLOOR: Rgba<u8> = rgb(0xECF0F1);
pub const FLOOR_LINE: Rgba<u8> = rgb(0xBDC3C7);
pub const WALL: Rgba<u8> = rgb(0x95A5A6);
pub const WALL_LINE: Rgba<u8> = rgb(0x7F8C8D);
pub const DOOR_FRAME: Rgba<u8> = rgb(0x7F8C8D);
pub const DOOR_RED: Rgba<u8> = rgb(0xE74C3C);
pub const DOOR_HANDLE: Rgba<u8> = rgb(0xF1C40F);
pub const CHAIR_PURPLE: Rgba<u8> = rgb(0x8E44AD);
pub const CHAIR_LEG: Rgba<u8> = rgb(0x34495E);
pub const DESK_ORANGE: Rgba<u8> = rgb(0xD35400);
pub const DESK_LEG: Rgba<u8> = rgb(0x7F8C8D);
pub const PLANT_POT: Rgba<u8> = rgb(0xE67E22);
pub const PLANT_GREEN: Rgba<u8> = rgb(0x2ECC71);
pub const SHIRT_BLUE: Rgba<u8> = rgb(0x3498DB);
pub const SKIN_YELLOW: Rgba<u8> = rgb(0xF1C40F);
pub const EYE: Rgba<u8> = BLACK;

/// Same color as floats in 0..=1, for GPU clear colors and tints.
pub fn to_linear_f64(color: Rgba<u8>) -> [f64; 4] {
    let channel = |c: u8| {
        let c = f64::from(c) / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        f64::from(color[3]) / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_unpacks_channels() {
        assert_eq!(rgb(0x3498DB), Rgba([0x34, 0x98, 0xDB, 0xFF]));
        assert_eq!(WALL_LINE, DOOR_FRAME);
    }

    #[test]
    fn linear_conversion_keeps_extremes() {
        assert_eq!(to_linear_f64(WHITE), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(to_linear_f64(BLACK), [0.0, 0.0, 0.0, 1.0]);
    }
}
