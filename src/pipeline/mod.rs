pub(crate) mod image_mask;
pub(crate) mod opts;
