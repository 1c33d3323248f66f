//! Execution strategies: three interchangeable ways to run a kernel.
//!
//! Every strategy implements the same contract. The host strategy is the
//! correctness baseline and the fallback when no accelerator exists; the
//! device-pointer strategy manages device memory and transfers explicitly;
//! the staged-buffer strategy hands data to the runtime and lets it stage
//! buffers around the dispatch.
//!
//! A `run` call is synchronous: it returns after the whole
//! copy-in / compute / copy-out chain has completed (or the host loop has
//! finished), or fails as a unit with the output content unspecified.

#[cfg(feature = "gpu")]
pub mod device_ptr;
pub mod host;
#[cfg(feature = "gpu")]
pub mod staged;

#[cfg(test)]
mod tests;

pub use host::HostExecutor;

#[cfg(feature = "gpu")]
pub use device_ptr::DevicePointerExecutor;
#[cfg(feature = "gpu")]
pub use staged::StagedExecutor;

#[cfg(feature = "gpu")]
use crate::gpu::GpuError;

use crate::buffer::PixelBuffer;
use crate::kernels::Kernel;

/// Errors from running a kernel through an execution strategy.
#[derive(Debug, Clone)]
pub enum ExecError {
    /// Buffer shapes or kernel parameters failed validation; nothing was
    /// dispatched.
    Validation(String),
    /// The device or runtime failed during copy-in, compute, or copy-out.
    #[cfg(feature = "gpu")]
    Gpu(GpuError),
}

impl std::fmt::Display for ExecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecError::Validation(e) => write!(f, "Validation failed: {}", e),
            #[cfg(feature = "gpu")]
            ExecError::Gpu(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ExecError {}

#[cfg(feature = "gpu")]
impl From<GpuError> for ExecError {
    fn from(e: GpuError) -> Self {
        ExecError::Gpu(e)
    }
}

/// One way to run a kernel over a pair of pixel buffers.
pub trait Executor {
    /// Stable strategy label used in benchmark output and filenames.
    fn name(&self) -> &'static str;

    /// Run `kernel`, reading `input` and fully writing `output`'s RGB
    /// channels. Fails as a unit; on error the output content is
    /// unspecified.
    fn run(
        &self,
        kernel: &Kernel,
        input: &PixelBuffer,
        output: &mut PixelBuffer,
    ) -> Result<(), ExecError>;
}

/// Shared pre-dispatch validation. Kernels themselves assume these hold;
/// every strategy calls this before touching a buffer or the device.
pub(crate) fn validate(
    kernel: &Kernel,
    input: &PixelBuffer,
    output: &PixelBuffer,
) -> Result<(), String> {
    if input.channels < 3 {
        return Err(format!(
            "Kernels require at least 3 channels, got {}",
            input.channels
        ));
    }
    if input.width != output.width
        || input.height != output.height
        || input.channels != output.channels
    {
        return Err(format!(
            "Input {}x{}x{} and output {}x{}x{} shapes differ",
            input.width,
            input.height,
            input.channels,
            output.width,
            output.height,
            output.channels
        ));
    }
    if input.data.len() != input.len() {
        return Err(format!(
            "Input data length {} violates the {}x{}x{} invariant",
            input.data.len(),
            input.width,
            input.height,
            input.channels
        ));
    }
    if output.data.len() != output.len() {
        return Err(format!(
            "Output data length {} violates the {}x{}x{} invariant",
            output.data.len(),
            output.width,
            output.height,
            output.channels
        ));
    }

    // Masks are validated at construction, but the fields are public;
    // re-check the shape the stencil loops rely on.
    let mask_shape = match kernel {
        Kernel::Erode { mask } | Kernel::Dilate { mask } => {
            Some((mask.width, mask.height, mask.weights.len()))
        }
        Kernel::Convolution { mask } => Some((mask.width, mask.height, mask.weights.len())),
        _ => None,
    };
    if let Some((w, h, count)) = mask_shape {
        if w == 0 || h == 0 || w % 2 == 0 || h % 2 == 0 {
            return Err(format!("Mask dimensions must be odd and positive, got {}x{}", w, h));
        }
        if count != (w as usize) * (h as usize) {
            return Err(format!(
                "Mask weight count {} does not match {}x{}",
                count, w, h
            ));
        }
    }

    Ok(())
}
