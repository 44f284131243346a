use super::*;
use crate::foundation::pixel::pack_argb32;

fn with_alpha(a: u8) -> u32 {
    pack_argb32(a, 0x12, 0x34, 0x56)
}

#[test]
fn opaque_white_mask_keeps_alpha() {
    let white = pack_argb32(255, 255, 255, 255);
    for a in 0..=255u8 {
        assert_eq!(mask_pixel(with_alpha(a), white), with_alpha(a), "alpha {a}");
    }
}

#[test]
fn opaque_black_mask_clears_alpha() {
    let black = pack_argb32(255, 0, 0, 0);
    assert_eq!(mask_pixel(with_alpha(200), black), with_alpha(0));
}

#[test]
fn transparent_mask_clears_alpha_regardless_of_color() {
    for m in [
        pack_argb32(0, 255, 255, 255),
        pack_argb32(0, 0, 0, 0),
        pack_argb32(0, 10, 200, 30),
    ] {
        assert_eq!(mask_pixel(with_alpha(255), m), with_alpha(0));
    }
}

#[test]
fn opaque_mid_gray_halves_alpha() {
    let gray = pack_argb32(255, 128, 128, 128);
    assert_eq!(mask_pixel(with_alpha(255), gray), with_alpha(128));
    assert_eq!(mask_pixel(with_alpha(200), gray), with_alpha(100));
    assert_eq!(mask_pixel(with_alpha(100), gray), with_alpha(50));
}

#[test]
fn mask_alpha_scales_coverage() {
    let half_white = pack_argb32(128, 255, 255, 255);
    assert_eq!(mask_pixel(with_alpha(255), half_white), with_alpha(128));
}

#[test]
fn primaries_follow_rec709_weights() {
    let px = with_alpha(255);
    assert_eq!(argb(mask_pixel(px, pack_argb32(255, 255, 0, 0))), 54);
    assert_eq!(argb(mask_pixel(px, pack_argb32(255, 0, 255, 0))), 182);
    assert_eq!(argb(mask_pixel(px, pack_argb32(255, 0, 0, 255))), 18);
}

fn argb(px: u32) -> u32 {
    px >> 24
}

#[test]
fn scalar_backend_preserves_color_bits() {
    let mut pixels = vec![0xFF00_0000 | 0x00AB_CDEF, 0x8012_3456, 0x0000_0001];
    let before = pixels.clone();
    let mask = vec![pack_argb32(200, 90, 10, 240); 3];
    ScalarApplicator.apply_luminance_mask(&mut pixels, &mask);
    for (a, b) in pixels.iter().zip(&before) {
        assert_eq!(a & COLOR_CHANNELS_MASK, b & COLOR_CHANNELS_MASK);
    }
}

#[test]
fn scalar_backend_empty_run_is_noop() {
    let mut pixels: Vec<u32> = Vec::new();
    ScalarApplicator.apply_luminance_mask(&mut pixels, &[]);
    assert!(pixels.is_empty());
}

#[test]
fn scalar_backend_ignores_extra_mask_pixels() {
    let mut pixels = vec![with_alpha(255)];
    let mask = [pack_argb32(255, 0, 0, 0), pack_argb32(255, 255, 255, 255)];
    ScalarApplicator.apply_luminance_mask(&mut pixels, &mask);
    assert_eq!(pixels, vec![with_alpha(0)]);
}

#[test]
#[should_panic]
fn scalar_backend_panics_on_short_mask() {
    let mut pixels = vec![with_alpha(255); 2];
    ScalarApplicator.apply_luminance_mask(&mut pixels, &[0]);
}

#[test]
fn masking_twice_is_not_idempotent() {
    let gray = pack_argb32(255, 128, 128, 128);
    let once = mask_pixel(with_alpha(255), gray);
    let twice = mask_pixel(once, gray);
    assert_ne!(once, with_alpha(255));
    assert_ne!(twice, once);
    assert_eq!(argb(twice), 64);
}

#[test]
fn split_routes_remainder_to_fallback() {
    let s = MaskSplit::new(10 * 4 + 3, 4);
    assert_eq!(s.batches, 10);
    assert_eq!(s.remainder, 3);
    assert_eq!(s.vector_pixels(), 40);

    let s = MaskSplit::new(3, 8);
    assert_eq!((s.batches, s.remainder), (0, 3));
}

#[test]
fn split_without_vector_path_is_all_remainder() {
    for lanes in [0, 1] {
        let s = MaskSplit::new(17, lanes);
        assert_eq!(s.batches, 0);
        assert_eq!(s.remainder, 17);
        assert_eq!(s.vector_pixels(), 0);
    }
}
