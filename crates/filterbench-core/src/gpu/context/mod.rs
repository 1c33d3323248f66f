//! GPU context management for the wgpu device, queue, and compute pipelines.

mod init;
mod pipelines;

use std::sync::Arc;

pub(crate) use pipelines::GpuPipelines;

/// Errors from GPU initialization and kernel dispatch.
#[derive(Debug, Clone)]
pub enum GpuError {
    /// No adapter passed the selector's capability and scoring pass
    NoAdapter,
    /// Failed to request a device from the selected adapter
    DeviceRequest(String),
    /// Buffer allocation, transfer, or readback failed
    BufferError(String),
    /// Dispatch exceeded device limits or failed to execute
    ExecutionError(String),
}

impl std::fmt::Display for GpuError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GpuError::NoAdapter => write!(f, "No compatible compute adapter found"),
            GpuError::DeviceRequest(e) => write!(f, "Failed to request GPU device: {}", e),
            GpuError::BufferError(e) => write!(f, "Buffer operation failed: {}", e),
            GpuError::ExecutionError(e) => write!(f, "GPU execution failed: {}", e),
        }
    }
}

impl std::error::Error for GpuError {}

/// GPU context holding the wgpu device, queue, and pre-compiled pipelines.
///
/// Created once per program run through the device selector. A context is
/// not re-entrant: callers serialize kernel runs against one context.
pub struct GpuContext {
    pub(crate) device: Arc<wgpu::Device>,
    pub(crate) queue: Arc<wgpu::Queue>,
    pub(crate) pipelines: GpuPipelines,
    adapter_info: wgpu::AdapterInfo,
    explicit_allocation: bool,
}

impl GpuContext {
    /// Check whether any eligible adapter exists without fully initializing.
    pub fn is_available() -> bool {
        init::is_available()
    }

    /// Human-readable description of the adapter the selector would pick.
    pub fn device_info() -> Option<String> {
        init::device_info()
    }

    /// Create a context: select an adapter, request the device, and
    /// compile all kernel pipelines.
    pub fn new() -> Result<Self, GpuError> {
        pollster::block_on(Self::new_async())
    }

    /// Async version of context creation.
    pub async fn new_async() -> Result<Self, GpuError> {
        let (device, queue, adapter_info, explicit_allocation) = init::initialize_device().await?;

        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let pipelines = pipelines::create_pipelines(&device)?;

        Ok(Self {
            device,
            queue,
            pipelines,
            adapter_info,
            explicit_allocation,
        })
    }

    /// Adapter info for the selected device.
    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    /// Whether the selected adapter satisfies the device-pointer
    /// strategy's explicit-allocation capability. Always true for
    /// adapters that pass the selector; kept as a queryable report.
    pub fn supports_device_pointer(&self) -> bool {
        self.explicit_allocation
    }

    /// Memory-model summary for the device report.
    pub fn memory_model(&self) -> &'static str {
        if self.explicit_allocation {
            "explicit device allocation + staged buffers"
        } else {
            "staged buffers only"
        }
    }

    /// Submit a command encoder and block until the device drains it.
    pub(crate) fn submit_and_wait(&self, encoder: wgpu::CommandEncoder) {
        self.queue.submit(std::iter::once(encoder.finish()));
        self.device.poll(wgpu::Maintain::Wait);
    }
}
