//! Vector backends for the luminance mask.
//!
//! Exactly one `arch` module is compiled, picked from the target's enabled
//! features at build time: AVX2 (8 lanes) or SSE2 (4 lanes) on x86_64, NEON
//! (4 lanes) on aarch64. Each lane runs the same `f32` operation sequence as
//! [`mask_pixel`](super::applicator::mask_pixel) and rounds ties-to-even, so
//! batch and remainder pixels agree bit for bit.
#![allow(unsafe_code)]

use super::applicator::{ClipMaskApplicator, MaskSplit};

/// The vector backend compiled for this target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VectorApplicator;

impl VectorApplicator {
    /// Pixels per vector batch on this target.
    pub const LANES: usize = arch::LANES;
}

impl ClipMaskApplicator for VectorApplicator {
    fn name(&self) -> &'static str {
        arch::NAME
    }

    fn lanes(&self) -> usize {
        arch::LANES
    }

    fn apply_luminance_mask(&self, pixels: &mut [u32], mask: &[u32]) {
        let mask = &mask[..pixels.len()];
        let split = MaskSplit::new(pixels.len(), arch::LANES);
        let (head, tail) = pixels.split_at_mut(split.vector_pixels());
        let (mask_head, mask_tail) = mask.split_at(split.vector_pixels());

        for (px, m) in head
            .chunks_exact_mut(arch::LANES)
            .zip(mask_head.chunks_exact(arch::LANES))
        {
            // SAFETY: `chunks_exact` yields exactly `LANES` pixels on both sides.
            unsafe { arch::mask_batch(px, m) };
        }

        self.fallback_luminance_mask(tail, mask_tail);
    }
}

#[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
mod arch {
    use std::arch::x86_64::*;

    use crate::foundation::pixel::{BLUE_LUM, COLOR_CHANNELS_MASK, GREEN_LUM, RED_LUM};
    use crate::mask::applicator::INV_255_SQ;

    pub(super) const LANES: usize = 8;
    pub(super) const NAME: &str = "avx2";

    /// # Safety
    ///
    /// `pixels` and `mask` must each hold at least `LANES` elements.
    #[inline]
    pub(super) unsafe fn mask_batch(pixels: &mut [u32], mask: &[u32]) {
        debug_assert!(pixels.len() >= LANES && mask.len() >= LANES);
        unsafe {
            let px = _mm256_loadu_si256(pixels.as_ptr().cast::<__m256i>());
            let m = _mm256_loadu_si256(mask.as_ptr().cast::<__m256i>());
            let byte = _mm256_set1_epi32(0xFF);

            let ma = _mm256_cvtepi32_ps(_mm256_srli_epi32::<24>(m));
            let mr = _mm256_cvtepi32_ps(_mm256_and_si256(_mm256_srli_epi32::<16>(m), byte));
            let mg = _mm256_cvtepi32_ps(_mm256_and_si256(_mm256_srli_epi32::<8>(m), byte));
            let mb = _mm256_cvtepi32_ps(_mm256_and_si256(m, byte));

            let luma = _mm256_add_ps(
                _mm256_add_ps(
                    _mm256_mul_ps(_mm256_set1_ps(RED_LUM), mr),
                    _mm256_mul_ps(_mm256_set1_ps(GREEN_LUM), mg),
                ),
                _mm256_mul_ps(_mm256_set1_ps(BLUE_LUM), mb),
            );
            let coverage = _mm256_mul_ps(_mm256_mul_ps(ma, luma), _mm256_set1_ps(INV_255_SQ));

            let pa = _mm256_cvtepi32_ps(_mm256_srli_epi32::<24>(px));
            let alpha = _mm256_min_ps(
                _mm256_max_ps(_mm256_mul_ps(pa, coverage), _mm256_setzero_ps()),
                _mm256_set1_ps(255.0),
            );
            // Default MXCSR rounding: nearest, ties to even.
            let alpha = _mm256_cvtps_epi32(alpha);

            let out = _mm256_or_si256(
                _mm256_and_si256(px, _mm256_set1_epi32(COLOR_CHANNELS_MASK as i32)),
                _mm256_slli_epi32::<24>(alpha),
            );
            _mm256_storeu_si256(pixels.as_mut_ptr().cast::<__m256i>(), out);
        }
    }
}

#[cfg(all(target_arch = "x86_64", not(target_feature = "avx2")))]
mod arch {
    use std::arch::x86_64::*;

    use crate::foundation::pixel::{BLUE_LUM, COLOR_CHANNELS_MASK, GREEN_LUM, RED_LUM};
    use crate::mask::applicator::INV_255_SQ;

    pub(super) const LANES: usize = 4;
    pub(super) const NAME: &str = "sse2";

    /// # Safety
    ///
    /// `pixels` and `mask` must each hold at least `LANES` elements.
    #[inline]
    pub(super) unsafe fn mask_batch(pixels: &mut [u32], mask: &[u32]) {
        debug_assert!(pixels.len() >= LANES && mask.len() >= LANES);
        unsafe {
            let px = _mm_loadu_si128(pixels.as_ptr().cast::<__m128i>());
            let m = _mm_loadu_si128(mask.as_ptr().cast::<__m128i>());
            let byte = _mm_set1_epi32(0xFF);

            let ma = _mm_cvtepi32_ps(_mm_srli_epi32::<24>(m));
            let mr = _mm_cvtepi32_ps(_mm_and_si128(_mm_srli_epi32::<16>(m), byte));
            let mg = _mm_cvtepi32_ps(_mm_and_si128(_mm_srli_epi32::<8>(m), byte));
            let mb = _mm_cvtepi32_ps(_mm_and_si128(m, byte));

            let luma = _mm_add_ps(
                _mm_add_ps(
                    _mm_mul_ps(_mm_set1_ps(RED_LUM), mr),
                    _mm_mul_ps(_mm_set1_ps(GREEN_LUM), mg),
                ),
                _mm_mul_ps(_mm_set1_ps(BLUE_LUM), mb),
            );
            let coverage = _mm_mul_ps(_mm_mul_ps(ma, luma), _mm_set1_ps(INV_255_SQ));

            let pa = _mm_cvtepi32_ps(_mm_srli_epi32::<24>(px));
            let alpha = _mm_min_ps(
                _mm_max_ps(_mm_mul_ps(pa, coverage), _mm_setzero_ps()),
                _mm_set1_ps(255.0),
            );
            // Default MXCSR rounding: nearest, ties to even.
            let alpha = _mm_cvtps_epi32(alpha);

            let out = _mm_or_si128(
                _mm_and_si128(px, _mm_set1_epi32(COLOR_CHANNELS_MASK as i32)),
                _mm_slli_epi32::<24>(alpha),
            );
            _mm_storeu_si128(pixels.as_mut_ptr().cast::<__m128i>(), out);
        }
    }
}

#[cfg(target_arch = "aarch64")]
mod arch {
    use std::arch::aarch64::*;

    use crate::foundation::pixel::{BLUE_LUM, COLOR_CHANNELS_MASK, GREEN_LUM, RED_LUM};
    use crate::mask::applicator::INV_255_SQ;

    pub(super) const LANES: usize = 4;
    pub(super) const NAME: &str = "neon";

    /// # Safety
    ///
    /// `pixels` and `mask` must each hold at least `LANES` elements.
    #[inline]
    pub(super) unsafe fn mask_batch(pixels: &mut [u32], mask: &[u32]) {
        debug_assert!(pixels.len() >= LANES && mask.len() >= LANES);
        unsafe {
            let px = vld1q_u32(pixels.as_ptr());
            let m = vld1q_u32(mask.as_ptr());
            let byte = vdupq_n_u32(0xFF);

            let ma = vcvtq_f32_u32(vshrq_n_u32::<24>(m));
            let mr = vcvtq_f32_u32(vandq_u32(vshrq_n_u32::<16>(m), byte));
            let mg = vcvtq_f32_u32(vandq_u32(vshrq_n_u32::<8>(m), byte));
            let mb = vcvtq_f32_u32(vandq_u32(m, byte));

            // Separate multiply and add; a fused vfmaq would round differently
            // from the scalar kernel.
            let luma = vaddq_f32(
                vaddq_f32(vmulq_n_f32(mr, RED_LUM), vmulq_n_f32(mg, GREEN_LUM)),
                vmulq_n_f32(mb, BLUE_LUM),
            );
            let coverage = vmulq_n_f32(vmulq_f32(ma, luma), INV_255_SQ);

            let pa = vcvtq_f32_u32(vshrq_n_u32::<24>(px));
            let alpha = vminq_f32(
                vmaxq_f32(vmulq_f32(pa, coverage), vdupq_n_f32(0.0)),
                vdupq_n_f32(255.0),
            );
            let alpha = vcvtnq_u32_f32(alpha);

            let out = vorrq_u32(
                vandq_u32(px, vdupq_n_u32(COLOR_CHANNELS_MASK)),
                vshlq_n_u32::<24>(alpha),
            );
            vst1q_u32(pixels.as_mut_ptr(), out);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mask/simd.rs"]
mod tests;
