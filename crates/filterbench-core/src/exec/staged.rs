//! Staged-buffer execution strategy: runtime-managed data movement.
//!
//! Instead of issuing transfers itself, this strategy wraps the input in
//! a buffer created *with* its contents (the runtime stages the upload)
//! and declares the output write-only by never uploading anything to it:
//! wgpu's guaranteed zero initialization stands in for a no-init access
//! annotation, so no stale output bytes ever cross the bus. Dispatch and
//! readback copy are recorded into a single submission whose internal
//! ordering the runtime enforces; the mapped read at the end is fenced by
//! draining the queue.

use std::sync::Arc;

use wgpu::util::DeviceExt;

use super::{validate, ExecError, Executor};
use crate::buffer::PixelBuffer;
use crate::gpu::{buffers, dispatch, GpuContext};
use crate::kernels::Kernel;

/// Managed-buffer strategy.
pub struct StagedExecutor {
    ctx: Arc<GpuContext>,
}

impl StagedExecutor {
    pub fn new(ctx: Arc<GpuContext>) -> Self {
        Self { ctx }
    }
}

impl Executor for StagedExecutor {
    fn name(&self) -> &'static str {
        "staged-buffer"
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
        let prepared = dispatch::prepare_kernel(&self.ctx, kernel, input)?;

        let out_size = buffers::word_size(output.data.len());

        // Input staged by the runtime from its initial contents; the
        // dispatch only ever reads it.
        let in_words = buffers::widen_to_words(&input.data);
        let in_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("staged_input"),
            contents: bytemuck::cast_slice(&in_words),
            usage: wgpu::BufferUsages::STORAGE,
        });

        // Output gets no host copy at all: every element is written by the
        // kernel (alpha excepted, which zero-init covers).
        let out_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("staged_output"),
            size: out_size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });

        let mask_buf = prepared.mask_payload.as_ref().map(|payload| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("staged_mask"),
                contents: payload,
                usage: wgpu::BufferUsages::STORAGE,
            })
        });

        let uniform = buffers::create_uniform_buffer(device, &prepared.params, "staged_params");
        let bind_group = dispatch::create_bind_group(
            device,
            &prepared,
            &in_buf,
            &out_buf,
            mask_buf.as_ref(),
            &uniform,
            "staged_bind_group",
        );

        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("staged_readback"),
            size: out_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // One submission: compute, then the readback copy behind it. The
        // queue is drained before the host maps the staging buffer.
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("staged_encoder"),
        });
        dispatch::record_pass(&mut encoder, &prepared, &bind_group, "staged_pass");
        encoder.copy_buffer_to_buffer(&out_buf, 0, &staging, 0, out_size);
        self.ctx.submit_and_wait(encoder);

        let words = buffers::read_back_words(device, &staging)?;
        output.data.copy_from_slice(&buffers::narrow_from_words(&words));

        Ok(())
    }
}
