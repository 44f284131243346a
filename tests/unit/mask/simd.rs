use super::*;
use crate::foundation::pixel::{COLOR_CHANNELS_MASK, pack_argb32};
use crate::mask::applicator::{ScalarApplicator, mask_pixel};

fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn noise(n: usize, seed: u64) -> Vec<u32> {
    (0..n as u64).map(|i| mix64(seed ^ i) as u32).collect()
}

#[test]
fn lanes_match_associated_const() {
    assert_eq!(VectorApplicator.lanes(), VectorApplicator::LANES);
    assert!(VectorApplicator::LANES >= 4);
    assert_ne!(VectorApplicator.name(), "scalar");
}

#[test]
fn vector_matches_scalar_at_batch_boundaries() {
    let l = VectorApplicator::LANES;
    for n in [0, 1, l - 1, l, l + 1, 10 * l + 3] {
        let mask = noise(n, 0xA5A5);
        let mut vector = noise(n, 0x5A5A);
        let mut scalar = vector.clone();

        VectorApplicator.apply_luminance_mask(&mut vector, &mask);
        ScalarApplicator.apply_luminance_mask(&mut scalar, &mask);

        assert_eq!(vector, scalar, "n = {n}");
    }
}

#[test]
fn vector_matches_scalar_over_every_alpha_and_gray() {
    // 256 target alphas against 256 opaque gray masks.
    let mut pixels = Vec::with_capacity(256 * 256);
    let mut mask = Vec::with_capacity(256 * 256);
    for a in 0..=255u8 {
        for g in 0..=255u8 {
            pixels.push(pack_argb32(a, g, 255 - g, a));
            mask.push(pack_argb32(255, g, g, g));
        }
    }
    let expected: Vec<u32> = pixels
        .iter()
        .zip(&mask)
        .map(|(&p, &m)| mask_pixel(p, m))
        .collect();

    VectorApplicator.apply_luminance_mask(&mut pixels, &mask);
    assert_eq!(pixels, expected);
}

#[test]
fn vector_preserves_color_bits() {
    let n = 4 * VectorApplicator::LANES + 1;
    let mask = noise(n, 7);
    let before = noise(n, 11);
    let mut after = before.clone();
    VectorApplicator.apply_luminance_mask(&mut after, &mask);
    for (a, b) in after.iter().zip(&before) {
        assert_eq!(a & COLOR_CHANNELS_MASK, b & COLOR_CHANNELS_MASK);
    }
}

#[test]
fn remainder_pixel_matches_scalar_formula() {
    let l = VectorApplicator::LANES;
    let mask: Vec<u32> = (0..=l)
        .map(|i| pack_argb32(255 - (i as u8) * 13, (i as u8) * 29, 200, (i as u8) * 7))
        .collect();
    let mut pixels = vec![pack_argb32(233, 1, 2, 3); l + 1];

    VectorApplicator.apply_luminance_mask(&mut pixels, &mask);

    assert_eq!(pixels[l], mask_pixel(pack_argb32(233, 1, 2, 3), mask[l]));
}
