//! Pointwise kernels: one pixel in, one pixel out, no neighborhood access.
//!
//! Each function walks any contiguous run of whole pixels, so callers can
//! hand it a full buffer or a single row; the host strategy uses the row
//! form to parallelize. Arithmetic is done in u32 and matches the GPU
//! shaders bit for bit.

/// Invert the first three channels of every pixel: `out[c] = 255 - in[c]`.
///
/// A fourth channel, if present, is left as the output buffer had it.
pub fn inversion(channels: u32, input: &[u8], output: &mut [u8]) {
    let c = channels as usize;
    for (src, dst) in input.chunks_exact(c).zip(output.chunks_exact_mut(c)) {
        dst[0] = 255 - src[0];
        dst[1] = 255 - src[1];
        dst[2] = 255 - src[2];
    }
}

/// Replace every pixel's RGB triple with its integer mean.
pub fn grayscale(channels: u32, input: &[u8], output: &mut [u8]) {
    let c = channels as usize;
    for (src, dst) in input.chunks_exact(c).zip(output.chunks_exact_mut(c)) {
        let mean = ((src[0] as u32 + src[1] as u32 + src[2] as u32) / 3) as u8;
        dst[0] = mean;
        dst[1] = mean;
        dst[2] = mean;
    }
}

/// Binarize every pixel against its RGB mean: `top` above `control`, 0 otherwise.
pub fn threshold(channels: u32, input: &[u8], output: &mut [u8], control: u8, top: u8) {
    let c = channels as usize;
    for (src, dst) in input.chunks_exact(c).zip(output.chunks_exact_mut(c)) {
        let mean = (src[0] as u32 + src[1] as u32 + src[2] as u32) / 3;
        let bin = if mean > control as u32 { top } else { 0 };
        dst[0] = bin;
        dst[1] = bin;
        dst[2] = bin;
    }
}
