//! Device and adapter initialization for the GPU context.

use super::GpuError;
use crate::gpu::selector;

fn new_instance() -> wgpu::Instance {
    wgpu::Instance::new(wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    })
}

/// Check if an eligible adapter exists without fully initializing.
pub(crate) fn is_available() -> bool {
    selector::select_adapter(&new_instance()).is_ok()
}

/// Describe the adapter the selector would pick.
pub(crate) fn device_info() -> Option<String> {
    let adapter = selector::select_adapter(&new_instance()).ok()?;
    let info = adapter.get_info();
    Some(format!(
        "{} ({:?}, {:?})",
        info.name, info.device_type, info.backend
    ))
}

/// Select an adapter and request the device and queue.
pub(crate) async fn initialize_device(
) -> Result<(wgpu::Device, wgpu::Queue, wgpu::AdapterInfo, bool), GpuError> {
    let instance = new_instance();

    let adapter = selector::select_adapter(&instance)?;
    let adapter_info = adapter.get_info();
    let explicit_allocation = selector::supports_explicit_allocation(&adapter);

    // Lift the storage-buffer limits to whatever the adapter offers so
    // large images fit in a single binding.
    let adapter_limits = adapter.limits();
    let limits = wgpu::Limits {
        max_storage_buffer_binding_size: adapter_limits.max_storage_buffer_binding_size,
        max_buffer_size: adapter_limits.max_buffer_size,
        ..Default::default()
    };

    let (device, queue) = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: Some("filterbench-gpu"),
                required_features: wgpu::Features::empty(),
                required_limits: limits,
                memory_hints: wgpu::MemoryHints::Performance,
            },
            None,
        )
        .await
        .map_err(|e| GpuError::DeviceRequest(e.to_string()))?;

    Ok((device, queue, adapter_info, explicit_allocation))
}
