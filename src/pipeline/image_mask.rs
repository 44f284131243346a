//! Scanline driver that feeds `image` rasters through a mask backend.
//!
//! `image::RgbaImage` stores straight RGBA8 bytes. Each row is packed into
//! ARGB32 words, masked, and only the resulting alpha bytes are written back.

use crate::foundation::error::{ClipMaskError, ClipMaskResult};
use crate::foundation::pixel::{argb32_alpha, rgba8_to_argb32};
use crate::mask::applicator::{ClipMaskApplicator, MaskSplit, ScalarApplicator};
use crate::mask::dispatch::default_applicator;
use crate::pipeline::opts::MaskOpts;
use image::RgbaImage;
use rayon::prelude::*;

/// Work summary for one [`apply_clip_mask`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MaskStats {
    /// Backend that ran the rows.
    pub backend: &'static str,
    /// Backend batch width in pixels.
    pub lanes: usize,
    /// Rows processed.
    pub rows: u64,
    /// Pixels processed.
    pub pixels: u64,
    /// Pixels that went through full vector batches.
    pub vector_pixels: u64,
    /// Pixels that went through the scalar fallback.
    pub scalar_pixels: u64,
    /// Row bands handed to the worker pool (`1` when serial).
    pub bands: u64,
}

/// Multiplies the alpha of every pixel in `image` by the luminance coverage of
/// the same pixel in `mask`.
///
/// Both images must have the same dimensions. Color channels of `image` are
/// left as they are.
#[tracing::instrument(
    skip(image, mask, opts),
    fields(width = image.width(), height = image.height())
)]
pub fn apply_clip_mask(
    image: &mut RgbaImage,
    mask: &RgbaImage,
    opts: &MaskOpts,
) -> ClipMaskResult<MaskStats> {
    opts.validate()?;
    if image.dimensions() != mask.dimensions() {
        return Err(ClipMaskError::validation(format!(
            "clip mask is {}x{} but image is {}x{}",
            mask.width(),
            mask.height(),
            image.width(),
            image.height()
        )));
    }

    let (width, height) = image.dimensions();
    let pixels = &mut **image;
    let mask = &**mask;

    if opts.force_scalar {
        run(&ScalarApplicator, pixels, mask, width, height, opts)
    } else {
        run(&default_applicator(), pixels, mask, width, height, opts)
    }
}

fn run<A: ClipMaskApplicator + Sync>(
    applicator: &A,
    pixels: &mut [u8],
    mask: &[u8],
    width: u32,
    height: u32,
    opts: &MaskOpts,
) -> ClipMaskResult<MaskStats> {
    let row_split = MaskSplit::new(width as usize, applicator.lanes());
    let mut stats = MaskStats {
        backend: applicator.name(),
        lanes: applicator.lanes(),
        rows: u64::from(height),
        pixels: u64::from(width) * u64::from(height),
        vector_pixels: row_split.vector_pixels() as u64 * u64::from(height),
        scalar_pixels: row_split.remainder as u64 * u64::from(height),
        bands: 0,
    };

    let row_bytes = width as usize * 4;
    if row_bytes == 0 || height == 0 {
        return Ok(stats);
    }

    if opts.parallel {
        // A band never spans more than the whole image.
        let rows_per_band = opts.rows_per_band.min(height as usize);
        let band_bytes = row_bytes * rows_per_band;
        let pool = build_thread_pool(opts.threads)?;
        stats.bands = u64::from(height).div_ceil(rows_per_band as u64);
        tracing::debug!(
            backend = stats.backend,
            lanes = stats.lanes,
            bands = stats.bands,
            threads = pool.current_num_threads(),
            "masking row bands in parallel"
        );
        pool.install(|| {
            pixels
                .par_chunks_mut(band_bytes)
                .zip(mask.par_chunks(band_bytes))
                .for_each(|(band, mask_band)| mask_rows(applicator, band, mask_band, row_bytes));
        });
    } else {
        stats.bands = 1;
        tracing::debug!(
            backend = stats.backend,
            lanes = stats.lanes,
            "masking rows serially"
        );
        mask_rows(applicator, pixels, mask, row_bytes);
    }

    Ok(stats)
}

fn mask_rows<A: ClipMaskApplicator>(
    applicator: &A,
    rows: &mut [u8],
    mask: &[u8],
    row_bytes: usize,
) {
    let width = row_bytes / 4;
    let mut row_px = Vec::<u32>::with_capacity(width);
    let mut row_mask = Vec::<u32>::with_capacity(width);

    for (row, mask_row) in rows
        .chunks_exact_mut(row_bytes)
        .zip(mask.chunks_exact(row_bytes))
    {
        row_px.clear();
        row_px.extend(
            row.chunks_exact(4)
                .map(|p| rgba8_to_argb32([p[0], p[1], p[2], p[3]])),
        );
        row_mask.clear();
        row_mask.extend(
            mask_row
                .chunks_exact(4)
                .map(|p| rgba8_to_argb32([p[0], p[1], p[2], p[3]])),
        );

        applicator.apply_luminance_mask(&mut row_px, &row_mask);

        for (p, &argb) in row.chunks_exact_mut(4).zip(&row_px) {
            p[3] = argb32_alpha(argb);
        }
    }
}

fn build_thread_pool(threads: Option<usize>) -> ClipMaskResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ClipMaskError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/image_mask.rs"]
mod tests;
