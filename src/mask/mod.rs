pub(crate) mod applicator;
pub(crate) mod dispatch;
#[cfg(all(
    not(feature = "scalar-only"),
    any(target_arch = "x86_64", target_arch = "aarch64")
))]
pub(crate) mod simd;
