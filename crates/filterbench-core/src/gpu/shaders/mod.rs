//! WGSL shader sources embedded at compile time.
//!
//! Pixel bytes arrive widened to one u32 word per element (see
//! `gpu::buffers`), so the shaders index storage exactly like the host
//! kernels index bytes and integer arithmetic matches the host bit for bit.

/// Container for all shader source code.
pub(crate) struct Shaders;

impl Shaders {
    /// Pointwise kernels (invert, grayscale, threshold).
    pub const POINTWISE: &'static str = include_str!("pointwise.wgsl");

    /// Morphological kernels (erode, dilate).
    pub const MORPHOLOGY: &'static str = include_str!("morphology.wgsl");

    /// General convolution.
    pub const CONVOLUTION: &'static str = include_str!("convolution.wgsl");
}
