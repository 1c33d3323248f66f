//! Adapter scoring and selection.
//!
//! Ranks every available adapter by backend family and excludes anything
//! that cannot run the compute dispatches the device-backed strategies
//! need. The "not eligible" case is an explicit [`DeviceRating::Reject`]
//! variant rather than a sentinel score.

use super::context::GpuError;

/// Outcome of rating a single adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceRating {
    /// Eligible, with a priority score (higher wins).
    Score(u32),
    /// Ineligible for the device-backed strategies; never selected.
    Reject,
}

/// Capability predicate for the device-pointer strategy: the adapter must
/// support real compute dispatches over device-resident storage buffers.
pub fn supports_explicit_allocation(adapter: &wgpu::Adapter) -> bool {
    adapter
        .get_downlevel_capabilities()
        .flags
        .contains(wgpu::DownlevelFlags::COMPUTE_SHADERS)
}

/// Pure scoring function over adapter properties.
///
/// Native high-throughput backends (Vulkan, Metal, DX12) outrank the
/// browser WebGPU backend, which outranks the GL compatibility backend;
/// GL only counts as a real accelerator for GPU-class devices. Adapters
/// without compute-shader support are rejected outright.
pub fn rate(
    backend: wgpu::Backend,
    device_type: wgpu::DeviceType,
    flags: wgpu::DownlevelFlags,
) -> DeviceRating {
    if !flags.contains(wgpu::DownlevelFlags::COMPUTE_SHADERS) {
        return DeviceRating::Reject;
    }

    match backend {
        wgpu::Backend::Vulkan | wgpu::Backend::Metal | wgpu::Backend::Dx12 => {
            DeviceRating::Score(3)
        }
        wgpu::Backend::BrowserWebGpu => DeviceRating::Score(2),
        wgpu::Backend::Gl => match device_type {
            wgpu::DeviceType::DiscreteGpu
            | wgpu::DeviceType::IntegratedGpu
            | wgpu::DeviceType::VirtualGpu => DeviceRating::Score(1),
            _ => DeviceRating::Score(0),
        },
        wgpu::Backend::Empty => DeviceRating::Reject,
    }
}

/// Rate a live adapter.
pub fn rate_adapter(adapter: &wgpu::Adapter) -> DeviceRating {
    let info = adapter.get_info();
    let caps = adapter.get_downlevel_capabilities();
    rate(info.backend, info.device_type, caps.flags)
}

/// Pick the highest-scoring eligible adapter.
///
/// Ties resolve to the first adapter in enumeration order (the runtime's
/// default ordering). Returns [`GpuError::NoAdapter`] when nothing is
/// eligible; callers fall back to the host strategy.
pub fn select_adapter(instance: &wgpu::Instance) -> Result<wgpu::Adapter, GpuError> {
    let mut best: Option<(u32, wgpu::Adapter)> = None;

    for adapter in instance.enumerate_adapters(wgpu::Backends::all()) {
        let score = match rate_adapter(&adapter) {
            DeviceRating::Score(s) => s,
            DeviceRating::Reject => continue,
        };
        let replace = match &best {
            Some((best_score, _)) => score > *best_score,
            None => true,
        };
        if replace {
            best = Some((score, adapter));
        }
    }

    best.map(|(_, adapter)| adapter).ok_or(GpuError::NoAdapter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compute_flags() -> wgpu::DownlevelFlags {
        wgpu::DownlevelFlags::COMPUTE_SHADERS
    }

    #[test]
    fn native_backends_outrank_everything() {
        for backend in [wgpu::Backend::Vulkan, wgpu::Backend::Metal, wgpu::Backend::Dx12] {
            assert_eq!(
                rate(backend, wgpu::DeviceType::DiscreteGpu, compute_flags()),
                DeviceRating::Score(3)
            );
        }
    }

    #[test]
    fn webgpu_is_intermediate() {
        assert_eq!(
            rate(
                wgpu::Backend::BrowserWebGpu,
                wgpu::DeviceType::Other,
                compute_flags()
            ),
            DeviceRating::Score(2)
        );
    }

    #[test]
    fn gl_scores_by_device_class() {
        assert_eq!(
            rate(
                wgpu::Backend::Gl,
                wgpu::DeviceType::DiscreteGpu,
                compute_flags()
            ),
            DeviceRating::Score(1)
        );
        assert_eq!(
            rate(wgpu::Backend::Gl, wgpu::DeviceType::Cpu, compute_flags()),
            DeviceRating::Score(0)
        );
    }

    #[test]
    fn missing_compute_capability_is_rejected_not_scored() {
        // Capability gating: a rejected adapter must never be selectable,
        // whatever its backend rank would have been.
        assert_eq!(
            rate(
                wgpu::Backend::Vulkan,
                wgpu::DeviceType::DiscreteGpu,
                wgpu::DownlevelFlags::empty()
            ),
            DeviceRating::Reject
        );
        assert_eq!(
            rate(
                wgpu::Backend::Gl,
                wgpu::DeviceType::Cpu,
                wgpu::DownlevelFlags::empty()
            ),
            DeviceRating::Reject
        );
    }
}
