//! Host execution strategy: CPU loops over the buffers' native memory.
//!
//! No copies, no device handle. Rows are processed in parallel with
//! rayon; every row writes a disjoint output slice, so the result is
//! byte-identical to a sequential pass and serves as the ground truth the
//! device strategies are tested against.

use rayon::prelude::*;

use super::{validate, ExecError, Executor};
use crate::buffer::PixelBuffer;
use crate::kernels::{self, Kernel};

/// The no-accelerator strategy and correctness baseline.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostExecutor;

impl HostExecutor {
    pub fn new() -> Self {
        HostExecutor
    }
}

impl Executor for HostExecutor {
    fn name(&self) -> &'static str {
        "host"
    }

    fn run(
        &self,
        kernel: &Kernel,
        input: &PixelBuffer,
        output: &mut PixelBuffer,
    ) -> Result<(), ExecError> {
        validate(kernel, input, output).map_err(ExecError::Validation)?;

        let channels = input.channels;
        let width = input.width;
        let height = input.height;
        let row_len = (width * channels) as usize;
        if row_len == 0 || height == 0 {
            return Ok(());
        }

        let in_rows = input.data.par_chunks_exact(row_len);
        let out_rows = output.data.par_chunks_exact_mut(row_len);

        match kernel {
            Kernel::Inversion => {
                out_rows.zip(in_rows).for_each(|(out_row, in_row)| {
                    kernels::inversion(channels, in_row, out_row);
                });
            }
            Kernel::Grayscale => {
                out_rows.zip(in_rows).for_each(|(out_row, in_row)| {
                    kernels::grayscale(channels, in_row, out_row);
                });
            }
            Kernel::Threshold { control, top } => {
                let (control, top) = (*control, *top);
                out_rows.zip(in_rows).for_each(|(out_row, in_row)| {
                    kernels::threshold(channels, in_row, out_row, control, top);
                });
            }
            Kernel::Erode { mask } => {
                out_rows.enumerate().for_each(|(y, out_row)| {
                    kernels::erode_row(channels, width, height, y as u32, &input.data, out_row, mask);
                });
            }
            Kernel::Dilate { mask } => {
                out_rows.enumerate().for_each(|(y, out_row)| {
                    kernels::dilate_row(
                        channels,
                        width,
                        height,
                        y as u32,
                        &input.data,
                        out_row,
                        mask,
                    );
                });
            }
            Kernel::Convolution { mask } => {
                out_rows.enumerate().for_each(|(y, out_row)| {
                    kernels::convolve_row(
                        channels,
                        width,
                        height,
                        y as u32,
                        &input.data,
                        out_row,
                        mask,
                    );
                });
            }
        }

        Ok(())
    }
}
