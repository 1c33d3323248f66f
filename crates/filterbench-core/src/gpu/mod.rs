//! GPU execution support for the kernel library.
//!
//! Built on wgpu compute shaders: Metal on macOS, Vulkan on Linux and
//! Windows, DX12 on Windows. The module provides the shared plumbing for
//! the two device-backed execution strategies (`exec::device_ptr` and
//! `exec::staged`): adapter selection, context and pipeline setup, buffer
//! transfer helpers, and dispatch geometry.
//!
//! Enabled via the `gpu` feature flag (on by default).

pub(crate) mod buffers;
mod context;
pub(crate) mod dispatch;
pub mod selector;
mod shaders;

pub use context::{GpuContext, GpuError};
pub use selector::DeviceRating;

/// Threads per workgroup for 1-D pointwise dispatches.
pub(crate) const WORKGROUP_SIZE: u32 = 256;

/// Threads per workgroup side for 2-D stencil dispatches (16x16).
pub(crate) const WORKGROUP_SIZE_2D: u32 = 16;

/// Maximum workgroups per grid dimension (device limit).
pub(crate) const MAX_WORKGROUPS_PER_DIM: u32 = 65535;

/// Check if a compatible compute device is available on this system.
pub fn is_gpu_available() -> bool {
    GpuContext::is_available()
}

/// Get information about the device the selector would pick.
pub fn gpu_info() -> Option<String> {
    GpuContext::device_info()
}

#[cfg(test)]
mod tests;
