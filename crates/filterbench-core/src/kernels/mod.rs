//! Pixel kernel library.
//!
//! One descriptor type plus pure host reference implementations for the
//! five kernel families:
//! - `pointwise`: inversion, grayscale, threshold (1-D, one pixel per step)
//! - `morphology`: erode, dilate (2-D stencil over a structuring element)
//! - `convolution`: general NxN weighted sum, including the fixed Gaussian
//!   blur masks
//!
//! Every kernel reads interleaved channels and writes at most the first
//! three; a fourth channel is never touched. The functions assume the
//! caller has validated buffer shapes (the execution strategies do this
//! before dispatch).

mod convolution;
mod morphology;
mod pointwise;

pub use convolution::convolve;
pub use morphology::{dilate, erode};
pub use pointwise::{grayscale, inversion, threshold};

pub(crate) use convolution::convolve_row;
pub(crate) use morphology::{dilate_row, erode_row};

use crate::buffer::{ConvMask, MorphMask};
use serde::{Deserialize, Serialize};

/// Default threshold control value (mean brightness cutoff).
pub const THRESHOLD_CONTROL: u8 = 128;

/// Default threshold top value (output for pixels above the cutoff).
pub const THRESHOLD_TOP: u8 = 255;

/// A kernel descriptor: which transform to run and with which parameters.
///
/// The descriptor carries everything an execution strategy needs to
/// dispatch the kernel; it holds no buffer references and is cheap to
/// clone for pointwise kernels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Kernel {
    /// `out[c] = 255 - in[c]` for the first three channels.
    Inversion,

    /// All three channels set to the integer mean of the RGB triple.
    Grayscale,

    /// All three channels set to `top` when the RGB mean exceeds
    /// `control`, else 0.
    Threshold { control: u8, top: u8 },

    /// Keep the neighboring RGB triple with the smallest channel sum.
    Erode { mask: MorphMask },

    /// Keep the neighboring RGB triple with the largest channel sum.
    Dilate { mask: MorphMask },

    /// Weighted neighborhood sum per channel, truncated back to u8.
    Convolution { mask: ConvMask },
}

impl Kernel {
    /// Threshold with the default 128/255 parameters.
    pub fn threshold_default() -> Self {
        Kernel::Threshold {
            control: THRESHOLD_CONTROL,
            top: THRESHOLD_TOP,
        }
    }

    /// Convolution specialized to the fixed 3x3 Gaussian blur mask.
    pub fn gaussian_blur_3x3() -> Self {
        Kernel::Convolution {
            mask: ConvMask::gaussian_3x3(),
        }
    }

    /// Convolution specialized to the fixed 5x5 Gaussian blur mask.
    pub fn gaussian_blur_5x5() -> Self {
        Kernel::Convolution {
            mask: ConvMask::gaussian_5x5(),
        }
    }

    /// Stable label used in benchmark output and result filenames.
    ///
    /// The Gaussian blur masks keep their historical benchmark names; any
    /// other convolution mask reports plain "convolution".
    pub fn name(&self) -> &'static str {
        match self {
            Kernel::Inversion => "inversion",
            Kernel::Grayscale => "grayscale",
            Kernel::Threshold { .. } => "threshold",
            Kernel::Erode { .. } => "erode",
            Kernel::Dilate { .. } => "dilate",
            Kernel::Convolution { mask } => {
                if *mask == ConvMask::gaussian_3x3() {
                    "convolution-gaussian-blur-3x3"
                } else if *mask == ConvMask::gaussian_5x5() {
                    "convolution-gaussian-blur-5x5"
                } else {
                    "convolution"
                }
            }
        }
    }

    /// True for kernels indexed per pixel (no neighborhood access).
    pub fn is_pointwise(&self) -> bool {
        matches!(
            self,
            Kernel::Inversion | Kernel::Grayscale | Kernel::Threshold { .. }
        )
    }
}
