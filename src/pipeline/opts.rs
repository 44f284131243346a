use crate::foundation::error::{ClipMaskError, ClipMaskResult};
use anyhow::Context as _;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Options controlling how [`apply_clip_mask`](crate::apply_clip_mask) walks an image.
///
/// Every field has a default, so a JSON options file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaskOpts {
    /// Process row bands in parallel on a dedicated rayon pool.
    pub parallel: bool,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Rows per parallel band.
    pub rows_per_band: usize,
    /// Use the scalar backend even when a vector backend is compiled in.
    pub force_scalar: bool,
}

impl Default for MaskOpts {
    fn default() -> Self {
        Self {
            parallel: false,
            threads: None,
            rows_per_band: 64,
            force_scalar: false,
        }
    }
}

impl MaskOpts {
    /// Parse options from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ClipMaskResult<Self> {
        let opts: Self = serde_json::from_reader(r)
            .map_err(|e| ClipMaskError::serde(format!("parse mask options JSON: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Parse options from a JSON string.
    pub fn from_json_str(s: &str) -> ClipMaskResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse options from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ClipMaskResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open mask options '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check option ranges.
    pub fn validate(&self) -> ClipMaskResult<()> {
        if self.rows_per_band == 0 {
            return Err(ClipMaskError::validation("'rows_per_band' must be >= 1"));
        }
        if let Some(n) = self.threads
            && n == 0
        {
            return Err(ClipMaskError::validation("'threads' must be >= 1 when set"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/opts.rs"]
mod tests;
