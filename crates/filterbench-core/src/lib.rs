//! Filterbench Core Library
//!
//! Pixel-kernel image processing across three memory-model execution
//! strategies: a host CPU baseline, an explicit device-pointer strategy,
//! and a runtime-staged buffer strategy, all producing byte-identical
//! results for the same kernel and input.

pub mod buffer;
pub mod codec;
pub mod exec;
pub mod kernels;

// GPU support (optional, enabled with the default "gpu" feature)
#[cfg(feature = "gpu")]
pub mod gpu;

// Re-export commonly used types
pub use buffer::{ConvMask, MorphMask, PixelBuffer};
pub use exec::{ExecError, Executor, HostExecutor};
pub use kernels::Kernel;

#[cfg(feature = "gpu")]
pub use exec::{DevicePointerExecutor, StagedExecutor};
#[cfg(feature = "gpu")]
pub use gpu::{gpu_info, is_gpu_available, GpuContext, GpuError};
