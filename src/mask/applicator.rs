use crate::foundation::pixel::{COLOR_CHANNELS_MASK, rec709_luma, unpack_argb32};

/// Normalizes `mask_alpha * luma` (both 0..=255) into 0..=1 with a single multiply.
pub(crate) const INV_255_SQ: f32 = 1.0 / 65025.0;

/// Applies an ARGB32 luminance clip mask to an ARGB32 pixel run.
///
/// The new alpha of each target pixel is
/// `round(alpha * mask_alpha/255 * rec709(mask_rgb)/255)`; color bits are left
/// untouched and the mask is only read. Backends differ only in how many
/// pixels they process per step; every backend produces bit-identical output.
pub trait ClipMaskApplicator {
    /// Short backend identifier, e.g. `"sse2"` or `"scalar"`.
    fn name(&self) -> &'static str;

    /// Pixels processed per vector step (`1` for the scalar backend).
    fn lanes(&self) -> usize;

    /// Masks `pixels.len()` pixels of `pixels` with the same-index pixels of `mask`.
    ///
    /// # Panics
    ///
    /// Panics if `mask` is shorter than `pixels`.
    fn apply_luminance_mask(&self, pixels: &mut [u32], mask: &[u32]);

    /// One-pixel-at-a-time path, used for whole runs by the scalar backend and for
    /// the pixels left over after the last full vector batch.
    ///
    /// # Panics
    ///
    /// Panics if `mask` is shorter than `pixels`.
    fn fallback_luminance_mask(&self, pixels: &mut [u32], mask: &[u32]) {
        let mask = &mask[..pixels.len()];
        for (px, &m) in pixels.iter_mut().zip(mask) {
            *px = mask_pixel(*px, m);
        }
    }
}

/// Masks a single ARGB32 pixel.
///
/// All arithmetic is `f32` and rounding is ties-to-even, matching the vector
/// backends lane for lane.
#[inline]
pub fn mask_pixel(pixel: u32, mask: u32) -> u32 {
    let [ma, mr, mg, mb] = unpack_argb32(mask);
    let luma = rec709_luma(mr, mg, mb);
    let coverage = f32::from(ma) * luma * INV_255_SQ;
    let alpha = (f32::from((pixel >> 24) as u8) * coverage)
        .clamp(0.0, 255.0)
        .round_ties_even() as u32;
    (pixel & COLOR_CHANNELS_MASK) | (alpha << 24)
}

/// The portable backend: every pixel goes through [`mask_pixel`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScalarApplicator;

impl ClipMaskApplicator for ScalarApplicator {
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn lanes(&self) -> usize {
        1
    }

    fn apply_luminance_mask(&self, pixels: &mut [u32], mask: &[u32]) {
        self.fallback_luminance_mask(pixels, mask);
    }
}

/// How a run of pixels divides between whole vector batches and the scalar tail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaskSplit {
    /// Number of full vector batches.
    pub batches: usize,
    /// Pixels left for the scalar fallback.
    pub remainder: usize,
    /// Batch width in pixels.
    pub lanes: usize,
}

impl MaskSplit {
    /// Splits `n_pixels` for a backend processing `lanes` pixels per step.
    ///
    /// A `lanes` of `0` or `1` means there is no vector path: the whole run is remainder.
    pub fn new(n_pixels: usize, lanes: usize) -> Self {
        if lanes <= 1 {
            return Self {
                batches: 0,
                remainder: n_pixels,
                lanes: 1,
            };
        }
        Self {
            batches: n_pixels / lanes,
            remainder: n_pixels % lanes,
            lanes,
        }
    }

    /// Pixels covered by full vector batches.
    pub fn vector_pixels(self) -> usize {
        self.batches * self.lanes
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mask/applicator.rs"]
mod tests;
