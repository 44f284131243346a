//! ARGB32 packing helpers and the Rec. 709 luma weights.
//!
//! An ARGB32 pixel is a `u32` laid out as `0xAARRGGBB`: alpha in the top byte,
//! then red, green and blue.

/// Rec. 709 red weight.
pub const RED_LUM: f32 = 0.2125;
/// Rec. 709 green weight.
pub const GREEN_LUM: f32 = 0.7154;
/// Rec. 709 blue weight.
pub const BLUE_LUM: f32 = 0.0721;

/// Bits of an ARGB32 pixel that hold color (everything except alpha).
pub const COLOR_CHANNELS_MASK: u32 = 0x00FF_FFFF;

/// Packs straight channels into an ARGB32 word.
#[inline]
pub const fn pack_argb32(a: u8, r: u8, g: u8, b: u8) -> u32 {
    u32::from_be_bytes([a, r, g, b])
}

/// Splits an ARGB32 word into `[a, r, g, b]`.
#[inline]
pub const fn unpack_argb32(px: u32) -> [u8; 4] {
    px.to_be_bytes()
}

/// Alpha byte of an ARGB32 word.
#[inline]
pub const fn argb32_alpha(px: u32) -> u8 {
    (px >> 24) as u8
}

/// Converts one RGBA8 pixel (as stored by `image::RgbaImage`) to ARGB32.
#[inline]
pub const fn rgba8_to_argb32(px: [u8; 4]) -> u32 {
    pack_argb32(px[3], px[0], px[1], px[2])
}

/// Rec. 709 luma of 8-bit channels, still in the 0..=255 domain.
///
/// The addition order is fixed; every mask backend evaluates the same
/// expression so their results agree bit for bit.
#[inline]
pub fn rec709_luma(r: u8, g: u8, b: u8) -> f32 {
    RED_LUM * f32::from(r) + GREEN_LUM * f32::from(g) + BLUE_LUM * f32::from(b)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/pixel.rs"]
mod tests;
