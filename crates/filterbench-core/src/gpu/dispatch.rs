//! Kernel-to-pipeline resolution and dispatch geometry.
//!
//! Both device-backed strategies run the same pipelines with the same
//! bind group shapes; they differ only in how buffers are created and
//! when commands are submitted. This module holds the shared part:
//! resolving a [`Kernel`] to its pipeline, uniform contents, and mask
//! payload, computing workgroup counts, and recording the compute pass.

use super::context::{GpuContext, GpuError};
use super::{buffers, MAX_WORKGROUPS_PER_DIM, WORKGROUP_SIZE, WORKGROUP_SIZE_2D};
use crate::buffer::PixelBuffer;
use crate::kernels::Kernel;

/// A kernel resolved against a context's pipelines: everything a strategy
/// needs to bind and dispatch, independent of buffer management.
pub(crate) struct PreparedKernel<'a> {
    pub pipeline: &'a wgpu::ComputePipeline,
    pub layout: &'a wgpu::BindGroupLayout,
    /// Uniform buffer contents.
    pub params: Vec<u8>,
    /// Storage contents for the mask binding; `None` for pointwise kernels.
    pub mask_payload: Option<Vec<u8>>,
    /// Workgroup counts in x and y.
    pub workgroups: (u32, u32),
}

/// Resolve `kernel` to its pipeline, parameters, and dispatch geometry.
pub(crate) fn prepare_kernel<'a>(
    ctx: &'a GpuContext,
    kernel: &Kernel,
    input: &PixelBuffer,
) -> Result<PreparedKernel<'a>, GpuError> {
    let pipelines = &ctx.pipelines;

    if kernel.is_pointwise() {
        let (pipeline, control, top) = match kernel {
            Kernel::Inversion => (&pipelines.invert, 0u32, 0u32),
            Kernel::Grayscale => (&pipelines.grayscale, 0, 0),
            Kernel::Threshold { control, top } => {
                (&pipelines.threshold, *control as u32, *top as u32)
            }
            _ => unreachable!(),
        };
        let params = buffers::PointwiseParams {
            pixel_count: input.pixel_count(),
            channels: input.channels,
            control,
            top,
        };
        Ok(PreparedKernel {
            pipeline,
            layout: &pipelines.pointwise_layout,
            params: bytemuck::bytes_of(&params).to_vec(),
            mask_payload: None,
            workgroups: pointwise_workgroups(input.pixel_count())?,
        })
    } else {
        let (pipeline, mask_width, mask_height, mask_payload) = match kernel {
            Kernel::Erode { mask } => (
                &pipelines.erode,
                mask.width,
                mask.height,
                bytemuck::cast_slice::<u32, u8>(&buffers::morph_mask_words(mask)).to_vec(),
            ),
            Kernel::Dilate { mask } => (
                &pipelines.dilate,
                mask.width,
                mask.height,
                bytemuck::cast_slice::<u32, u8>(&buffers::morph_mask_words(mask)).to_vec(),
            ),
            Kernel::Convolution { mask } => (
                &pipelines.convolve,
                mask.width,
                mask.height,
                bytemuck::cast_slice::<f32, u8>(&mask.weights).to_vec(),
            ),
            _ => unreachable!(),
        };
        let params = buffers::StencilParams {
            width: input.width,
            height: input.height,
            channels: input.channels,
            mask_width,
            mask_height,
            _padding: [0; 3],
        };
        Ok(PreparedKernel {
            pipeline,
            layout: &pipelines.stencil_layout,
            params: bytemuck::bytes_of(&params).to_vec(),
            mask_payload: Some(mask_payload),
            workgroups: stencil_workgroups(input.width, input.height),
        })
    }
}

/// Workgroup counts for a 1-D pointwise dispatch, split over two grid
/// dimensions when the pixel count exceeds one dimension's limit.
pub(crate) fn pointwise_workgroups(pixel_count: u32) -> Result<(u32, u32), GpuError> {
    let total = pixel_count.div_ceil(WORKGROUP_SIZE);
    if total <= MAX_WORKGROUPS_PER_DIM {
        return Ok((total.max(1), 1));
    }

    let side = ((total as f64).sqrt().ceil() as u32).min(MAX_WORKGROUPS_PER_DIM);
    let y = total.div_ceil(side);
    if y > MAX_WORKGROUPS_PER_DIM {
        return Err(GpuError::ExecutionError(format!(
            "Image too large: {} pixels requires {} workgroups, max supported is {}",
            pixel_count,
            total,
            MAX_WORKGROUPS_PER_DIM as u64 * MAX_WORKGROUPS_PER_DIM as u64
        )));
    }
    Ok((side, y))
}

/// Workgroup counts for a 2-D stencil dispatch.
pub(crate) fn stencil_workgroups(width: u32, height: u32) -> (u32, u32) {
    (
        width.div_ceil(WORKGROUP_SIZE_2D).max(1),
        height.div_ceil(WORKGROUP_SIZE_2D).max(1),
    )
}

/// Build the bind group for a prepared kernel over the given buffers.
/// `mask_buffer` must be `Some` exactly when the kernel carries a mask.
pub(crate) fn create_bind_group(
    device: &wgpu::Device,
    prepared: &PreparedKernel<'_>,
    input: &wgpu::Buffer,
    output: &wgpu::Buffer,
    mask_buffer: Option<&wgpu::Buffer>,
    uniform: &wgpu::Buffer,
    label: &str,
) -> wgpu::BindGroup {
    let mut entries = vec![
        wgpu::BindGroupEntry {
            binding: 0,
            resource: input.as_entire_binding(),
        },
        wgpu::BindGroupEntry {
            binding: 1,
            resource: output.as_entire_binding(),
        },
    ];
    let uniform_binding = match mask_buffer {
        Some(mask) => {
            entries.push(wgpu::BindGroupEntry {
                binding: 2,
                resource: mask.as_entire_binding(),
            });
            3
        }
        None => 2,
    };
    entries.push(wgpu::BindGroupEntry {
        binding: uniform_binding,
        resource: uniform.as_entire_binding(),
    });

    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout: prepared.layout,
        entries: &entries,
    })
}

/// Record the compute pass for a prepared kernel into `encoder`.
pub(crate) fn record_pass(
    encoder: &mut wgpu::CommandEncoder,
    prepared: &PreparedKernel<'_>,
    bind_group: &wgpu::BindGroup,
    label: &str,
) {
    let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
        label: Some(label),
        timestamp_writes: None,
    });
    pass.set_pipeline(prepared.pipeline);
    pass.set_bind_group(0, bind_group, &[]);
    let (x, y) = prepared.workgroups;
    pass.dispatch_workgroups(x, y, 1);
}
