//! Device-pointer execution strategy: explicit memory management.
//!
//! The strategy owns every transfer. It allocates device-resident scratch
//! buffers sized to the widened input and output, copies the input in
//! with an explicit queue write, dispatches, then copies the output
//! region into a mappable staging buffer it also created itself. Queue
//! submission order forms the strict copy-in -> compute -> copy-out
//! chain; the scratch buffers drop before `run` returns, success or
//! failure.

use std::sync::Arc;

use super::{validate, ExecError, Executor};
use crate::buffer::PixelBuffer;
use crate::gpu::{buffers, dispatch, GpuContext};
use crate::kernels::Kernel;

/// Explicit-allocation strategy. Requires a context whose adapter passed
/// the selector's capability gate.
pub struct DevicePointerExecutor {
    ctx: Arc<GpuContext>,
}

impl DevicePointerExecutor {
    pub fn new(ctx: Arc<GpuContext>) -> Self {
        Self { ctx }
    }
}

impl Executor for DevicePointerExecutor {
    fn name(&self) -> &'static str {
        "device-pointer"
    }

    fn run(
        &self,
        kernel: &Kernel,
        input: &PixelBuffer,
        output: &mut PixelBuffer,
    ) -> Result<(), ExecError> {
        validate(kernel, input, output).map_err(ExecError::Validation)?;
        if input.data.is_empty() {
            return Ok(());
        }

        let device = &self.ctx.device;
        let queue = &self.ctx.queue;
        let prepared = dispatch::prepare_kernel(&self.ctx, kernel, input)?;

        let in_size = buffers::word_size(input.data.len());
        let out_size = buffers::word_size(output.data.len());

        // (a) allocate device-resident scratch regions.
        let in_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("device_ptr_input"),
            size: in_size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let out_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("device_ptr_output"),
            size: out_size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        let mask_buf = prepared.mask_payload.as_ref().map(|payload| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("device_ptr_mask"),
                size: payload.len() as u64,
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        });

        // (b) copy in: queued writes land before any later submission.
        let in_words = buffers::widen_to_words(&input.data);
        queue.write_buffer(&in_buf, 0, bytemuck::cast_slice(&in_words));
        if let (Some(mask_buf), Some(payload)) = (&mask_buf, &prepared.mask_payload) {
            queue.write_buffer(mask_buf, 0, payload);
        }

        let uniform = buffers::create_uniform_buffer(device, &prepared.params, "device_ptr_params");
        let bind_group = dispatch::create_bind_group(
            device,
            &prepared,
            &in_buf,
            &out_buf,
            mask_buf.as_ref(),
            &uniform,
            "device_ptr_bind_group",
        );

        // (c) compute, submitted after the copy-in.
        let mut compute_encoder =
            device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("device_ptr_compute"),
            });
        dispatch::record_pass(
            &mut compute_encoder,
            &prepared,
            &bind_group,
            "device_ptr_pass",
        );
        queue.submit(std::iter::once(compute_encoder.finish()));

        // (d) copy out: a separate submission ordered after the compute.
        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("device_ptr_staging"),
            size: out_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let mut copy_encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("device_ptr_readback"),
        });
        copy_encoder.copy_buffer_to_buffer(&out_buf, 0, &staging, 0, out_size);
        queue.submit(std::iter::once(copy_encoder.finish()));

        let words = buffers::read_back_words(device, &staging)?;
        output.data.copy_from_slice(&buffers::narrow_from_words(&words));

        // (e) scratch regions drop here.
        Ok(())
    }
}
