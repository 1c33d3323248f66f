//! Device buffer helpers: byte widening, uniform parameters, readback.
//!
//! WGSL storage buffers have no 8-bit element type, and packing four
//! bytes per word would let neighboring 3-channel pixels race on shared
//! words. Every u8 element therefore occupies one u32 word on the device:
//! `widen_to_words` on the way up, `narrow_from_words` on the way down.
//! Integer kernels compute in u32 and match the host path bit for bit.

use bytemuck::{Pod, Zeroable};

use super::context::GpuError;
use crate::buffer::MorphMask;

/// Widen bytes to one u32 word each for device storage.
pub(crate) fn widen_to_words(bytes: &[u8]) -> Vec<u32> {
    bytes.iter().map(|&b| b as u32).collect()
}

/// Narrow device words back to bytes (low byte of each word).
pub(crate) fn narrow_from_words(words: &[u32]) -> Vec<u8> {
    words.iter().map(|&w| w as u8).collect()
}

/// Device-side byte size of a widened buffer.
pub(crate) fn word_size(element_count: usize) -> u64 {
    (element_count * std::mem::size_of::<u32>()) as u64
}

/// Widen a morphological mask's weights for device storage.
pub(crate) fn morph_mask_words(mask: &MorphMask) -> Vec<u32> {
    widen_to_words(&mask.weights)
}

// Parameter structures for uniform buffers.
// These must match the WGSL struct layouts exactly.

/// Parameters for the 1-D pointwise kernels. `control`/`top` are only
/// read by the threshold entry point.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub(crate) struct PointwiseParams {
    pub pixel_count: u32,
    pub channels: u32,
    pub control: u32,
    pub top: u32,
}

/// Parameters for the 2-D stencil kernels.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub(crate) struct StencilParams {
    pub width: u32,
    pub height: u32,
    pub channels: u32,
    pub mask_width: u32,
    pub mask_height: u32,
    pub _padding: [u32; 3],
}

/// Create a uniform buffer from already-serialized parameter bytes.
pub(crate) fn create_uniform_buffer(
    device: &wgpu::Device,
    contents: &[u8],
    label: &str,
) -> wgpu::Buffer {
    use wgpu::util::DeviceExt;
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

/// Map a MAP_READ staging buffer and copy its words out.
///
/// The caller must already have submitted the command buffer that fills
/// `staging`; this blocks until the device drains the queue, reads the
/// mapped range, and unmaps before returning.
pub(crate) fn read_back_words(
    device: &wgpu::Device,
    staging: &wgpu::Buffer,
) -> Result<Vec<u32>, GpuError> {
    let buffer_slice = staging.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();

    buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
        // If the receiver is gone the recv() below fails appropriately.
        let _ = tx.send(result);
    });

    device.poll(wgpu::Maintain::Wait);

    rx.recv()
        .map_err(|e| GpuError::BufferError(e.to_string()))?
        .map_err(|e| GpuError::BufferError(e.to_string()))?;

    let data = buffer_slice.get_mapped_range();
    let words: Vec<u32> = bytemuck::cast_slice(&data).to_vec();

    drop(data);
    staging.unmap();

    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widen_narrow_roundtrip() {
        let bytes: Vec<u8> = (0..=255).collect();
        let words = widen_to_words(&bytes);
        assert_eq!(words.len(), 256);
        assert_eq!(words[255], 255u32);
        assert_eq!(narrow_from_words(&words), bytes);
    }

    #[test]
    fn word_size_is_four_bytes_per_element() {
        assert_eq!(word_size(0), 0);
        assert_eq!(word_size(7), 28);
    }

    #[test]
    fn morph_mask_widening_preserves_order() {
        let mask = MorphMask::cross_3x3();
        let words = morph_mask_words(&mask);
        assert_eq!(words, vec![0u32, 1, 0, 1, 1, 1, 0, 1, 0]);
    }
}
