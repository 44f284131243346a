use crate::foundation::error::{ClipMaskError, ClipMaskResult};
use crate::mask::applicator::ClipMaskApplicator;

/// The backend picked for this build.
///
/// A vector backend on x86_64 and aarch64, the scalar backend elsewhere or with
/// the `scalar-only` feature.
#[cfg(all(
    not(feature = "scalar-only"),
    any(target_arch = "x86_64", target_arch = "aarch64")
))]
pub type DefaultApplicator = crate::mask::simd::VectorApplicator;

/// The backend picked for this build.
///
/// A vector backend on x86_64 and aarch64, the scalar backend elsewhere or with
/// the `scalar-only` feature.
#[cfg(not(all(
    not(feature = "scalar-only"),
    any(target_arch = "x86_64", target_arch = "aarch64")
)))]
pub type DefaultApplicator = crate::mask::applicator::ScalarApplicator;

/// Returns the compiled default backend.
pub fn default_applicator() -> DefaultApplicator {
    DefaultApplicator::default()
}

/// Pixels staged per step by [`apply_luminance_mask_bytes`].
const BYTE_STAGING_PIXELS: usize = 256;

/// Masks the first `n_pixels` ARGB32 pixels of `pixels` with `mask`.
///
/// Both buffers must hold at least `n_pixels` pixels; nothing is written when
/// they do not. `n_pixels == 0` is a no-op.
pub fn apply_luminance_mask(
    pixels: &mut [u32],
    mask: &[u32],
    n_pixels: usize,
) -> ClipMaskResult<()> {
    if pixels.len() < n_pixels || mask.len() < n_pixels {
        return Err(ClipMaskError::validation(format!(
            "apply_luminance_mask expects at least {n_pixels} pixels (target has {}, mask has {})",
            pixels.len(),
            mask.len()
        )));
    }
    default_applicator().apply_luminance_mask(&mut pixels[..n_pixels], &mask[..n_pixels]);
    Ok(())
}

/// Masks an ARGB32 raster given as raw bytes (native-endian `u32` words).
///
/// Byte slices carry no alignment guarantee, so pixels are staged through a
/// small stack buffer on their way to the vector backend. Lengths must match and
/// be a multiple of 4.
pub fn apply_luminance_mask_bytes(pixels: &mut [u8], mask: &[u8]) -> ClipMaskResult<()> {
    if pixels.len() != mask.len() || !pixels.len().is_multiple_of(4) {
        return Err(ClipMaskError::validation(
            "apply_luminance_mask_bytes expects equal-length argb32 buffers",
        ));
    }

    let applicator = default_applicator();
    let mut px_stage = [0u32; BYTE_STAGING_PIXELS];
    let mut mask_stage = [0u32; BYTE_STAGING_PIXELS];
    let step = BYTE_STAGING_PIXELS * 4;

    for (px_bytes, mask_bytes) in pixels.chunks_mut(step).zip(mask.chunks(step)) {
        let n = px_bytes.len() / 4;
        for ((dst, m), (p, mb)) in px_stage[..n]
            .iter_mut()
            .zip(mask_stage[..n].iter_mut())
            .zip(px_bytes.chunks_exact(4).zip(mask_bytes.chunks_exact(4)))
        {
            *dst = u32::from_ne_bytes([p[0], p[1], p[2], p[3]]);
            *m = u32::from_ne_bytes([mb[0], mb[1], mb[2], mb[3]]);
        }

        applicator.apply_luminance_mask(&mut px_stage[..n], &mask_stage[..n]);

        for (p, &staged) in px_bytes.chunks_exact_mut(4).zip(&px_stage[..n]) {
            p.copy_from_slice(&staged.to_ne_bytes());
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/mask/dispatch.rs"]
mod tests;
