//! Compute pipeline creation for the kernel shaders.

use super::GpuError;
use crate::gpu::shaders::Shaders;

/// Pre-compiled compute pipelines, one per kernel entry point, plus the
/// two bind group layouts they dispatch against.
pub(crate) struct GpuPipelines {
    pub invert: wgpu::ComputePipeline,
    pub grayscale: wgpu::ComputePipeline,
    pub threshold: wgpu::ComputePipeline,
    pub erode: wgpu::ComputePipeline,
    pub dilate: wgpu::ComputePipeline,
    pub convolve: wgpu::ComputePipeline,

    /// Layout for pointwise kernels: input (read-only) + output + params.
    pub pointwise_layout: wgpu::BindGroupLayout,
    /// Layout for stencil kernels: input + output + mask + params.
    pub stencil_layout: wgpu::BindGroupLayout,
}

/// Compile all shader modules and build the pipelines.
pub(crate) fn create_pipelines(device: &wgpu::Device) -> Result<GpuPipelines, GpuError> {
    let pointwise_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("pointwise"),
        source: wgpu::ShaderSource::Wgsl(Shaders::POINTWISE.into()),
    });

    let morphology_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("morphology"),
        source: wgpu::ShaderSource::Wgsl(Shaders::MORPHOLOGY.into()),
    });

    let convolution_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("convolution"),
        source: wgpu::ShaderSource::Wgsl(Shaders::CONVOLUTION.into()),
    });

    let pointwise_layout = create_pointwise_layout(device);
    let pointwise_pipeline_layout =
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pointwise_pipeline_layout"),
            bind_group_layouts: &[&pointwise_layout],
            push_constant_ranges: &[],
        });

    let stencil_layout = create_stencil_layout(device);
    let stencil_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("stencil_pipeline_layout"),
        bind_group_layouts: &[&stencil_layout],
        push_constant_ranges: &[],
    });

    let invert = create_compute_pipeline(
        device,
        "invert",
        &pointwise_pipeline_layout,
        &pointwise_module,
        "invert",
    );

    let grayscale = create_compute_pipeline(
        device,
        "grayscale",
        &pointwise_pipeline_layout,
        &pointwise_module,
        "grayscale",
    );

    let threshold = create_compute_pipeline(
        device,
        "threshold",
        &pointwise_pipeline_layout,
        &pointwise_module,
        "apply_threshold",
    );

    let erode = create_compute_pipeline(
        device,
        "erode",
        &stencil_pipeline_layout,
        &morphology_module,
        "erode",
    );

    let dilate = create_compute_pipeline(
        device,
        "dilate",
        &stencil_pipeline_layout,
        &morphology_module,
        "dilate",
    );

    let convolve = create_compute_pipeline(
        device,
        "convolve",
        &stencil_pipeline_layout,
        &convolution_module,
        "convolve",
    );

    Ok(GpuPipelines {
        invert,
        grayscale,
        threshold,
        erode,
        dilate,
        convolve,
        pointwise_layout,
        stencil_layout,
    })
}

/// Create a compute pipeline with the given parameters.
fn create_compute_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    module: &wgpu::ShaderModule,
    entry_point: &str,
) -> wgpu::ComputePipeline {
    device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        module,
        entry_point: Some(entry_point),
        compilation_options: Default::default(),
        cache: None,
    })
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn create_pointwise_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("pointwise_layout"),
        entries: &[
            storage_entry(0, true),
            storage_entry(1, false),
            uniform_entry(2),
        ],
    })
}

fn create_stencil_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("stencil_layout"),
        entries: &[
            storage_entry(0, true),
            storage_entry(1, false),
            storage_entry(2, true),
            uniform_entry(3),
        ],
    })
}
