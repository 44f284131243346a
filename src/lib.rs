//! clipmask applies luminance clip masks to ARGB32 pixel runs.
//!
//! A clip mask is an auxiliary raster whose alpha and Rec. 709 luminance
//! together decide how much of a target shows through. For every pixel the
//! target alpha becomes `round(alpha * mask_alpha/255 * luma(mask_rgb)/255)`;
//! the target's color channels and the mask are never written.
//!
//! # Layers
//!
//! 1. **Kernel**: [`ClipMaskApplicator`] with a shared scalar fallback
//!    ([`mask_pixel`]) and, on x86_64 and aarch64, a [`VectorApplicator`] that
//!    processes whole SIMD batches and hands the tail to the fallback.
//!    [`DefaultApplicator`] names whichever backend this build compiled.
//! 2. **Checked entry points**: [`apply_luminance_mask`] for `u32` runs and
//!    [`apply_luminance_mask_bytes`] for raw ARGB32 bytes.
//! 3. **Image pipeline**: [`apply_clip_mask`] walks an `image::RgbaImage` one
//!    scanline at a time, optionally over parallel row bands.
//!
//! Vector and scalar paths evaluate the same single-precision expression in
//! the same order and round ties-to-even, so output never depends on where a
//! batch boundary falls.
#![deny(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod mask;
mod pipeline;

pub use foundation::error::{ClipMaskError, ClipMaskResult};
pub use foundation::pixel::{
    BLUE_LUM, COLOR_CHANNELS_MASK, GREEN_LUM, RED_LUM, argb32_alpha, pack_argb32, rec709_luma,
    rgba8_to_argb32, unpack_argb32,
};
pub use mask::applicator::{ClipMaskApplicator, MaskSplit, ScalarApplicator, mask_pixel};
pub use mask::dispatch::{
    DefaultApplicator, apply_luminance_mask, apply_luminance_mask_bytes, default_applicator,
};
#[cfg(all(
    not(feature = "scalar-only"),
    any(target_arch = "x86_64", target_arch = "aarch64")
))]
pub use mask::simd::VectorApplicator;
pub use pipeline::image_mask::{MaskStats, apply_clip_mask};
pub use pipeline::opts::MaskOpts;
