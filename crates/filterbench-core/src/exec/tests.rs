//! Host-strategy behavior and the kernel properties it anchors.

use super::*;
use crate::buffer::{ConvMask, MorphMask, PixelBuffer};
use crate::kernels::Kernel;

fn run_host(kernel: &Kernel, input: &PixelBuffer) -> PixelBuffer {
    let mut output = PixelBuffer::new(input.width, input.height, input.channels);
    HostExecutor::new()
        .run(kernel, input, &mut output)
        .expect("host run should succeed");
    output
}

/// Deterministic RGB gradient covering the full byte range.
fn gradient(width: u32, height: u32) -> PixelBuffer {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            data.push((x * 7 + y * 13) as u8);
            data.push((x * 3 + y * 29) as u8);
            data.push((x * 11 + y * 5) as u8);
        }
    }
    PixelBuffer::from_vec(width, height, 3, data).unwrap()
}

fn uniform(width: u32, height: u32, channels: u32, value: u8) -> PixelBuffer {
    PixelBuffer::from_vec(
        width,
        height,
        channels,
        vec![value; (width * height * channels) as usize],
    )
    .unwrap()
}

#[test]
fn inversion_is_an_involution() {
    let input = gradient(16, 12);
    let once = run_host(&Kernel::Inversion, &input);
    let twice = run_host(&Kernel::Inversion, &once);
    assert_eq!(twice.data, input.data);
}

#[test]
fn grayscale_is_idempotent_on_gray_input() {
    // R==G==B per pixel: the mean equals the channel value exactly, so a
    // second pass changes nothing.
    let mut data = Vec::new();
    for i in 0..64u32 {
        let v = (i * 4) as u8;
        data.extend_from_slice(&[v, v, v]);
    }
    let input = PixelBuffer::from_vec(8, 8, 3, data).unwrap();
    let once = run_host(&Kernel::Grayscale, &input);
    assert_eq!(once.data, input.data);
    let twice = run_host(&Kernel::Grayscale, &once);
    assert_eq!(twice.data, once.data);
}

#[test]
fn grayscale_of_any_input_is_idempotent_after_one_pass() {
    let input = gradient(9, 7);
    let once = run_host(&Kernel::Grayscale, &input);
    let twice = run_host(&Kernel::Grayscale, &once);
    assert_eq!(twice.data, once.data);
}

#[test]
fn threshold_output_is_binary_and_monotonic() {
    let input = gradient(16, 16);
    let out = run_host(&Kernel::threshold_default(), &input);
    assert!(out.data.iter().all(|&b| b == 0 || b == 255));

    // Monotonic in mean brightness: pixels passing at control=200 must
    // also pass at control=100.
    let strict = run_host(
        &Kernel::Threshold {
            control: 200,
            top: 255,
        },
        &input,
    );
    let loose = run_host(
        &Kernel::Threshold {
            control: 100,
            top: 255,
        },
        &input,
    );
    for (s, l) in strict.data.iter().zip(loose.data.iter()) {
        if *s == 255 {
            assert_eq!(*l, 255);
        }
    }
}

#[test]
fn erode_dilate_complement_duality() {
    // Binary image, symmetric mask: dilating the complement equals the
    // complement of eroding the original.
    let mut data = Vec::new();
    for i in 0..48u32 {
        let v = if (i / 3) % 2 == 0 || i % 7 == 0 { 255u8 } else { 0 };
        data.extend_from_slice(&[v, v, v]);
    }
    let image = PixelBuffer::from_vec(8, 6, 3, data).unwrap();
    let mask = MorphMask::cross_3x3();

    let complement = run_host(&Kernel::Inversion, &image);
    let dilated_complement = run_host(&Kernel::Dilate { mask: mask.clone() }, &complement);
    let eroded = run_host(&Kernel::Erode { mask }, &image);
    let complement_of_eroded = run_host(&Kernel::Inversion, &eroded);

    assert_eq!(dilated_complement.data, complement_of_eroded.data);
}

#[test]
fn convolution_preserves_constants_in_the_interior() {
    let input = uniform(8, 8, 3, 191);
    let out = run_host(&Kernel::gaussian_blur_3x3(), &input);
    for y in 1..7usize {
        for x in 1..7usize {
            let base = (y * 8 + x) * 3;
            assert_eq!(&out.data[base..base + 3], &[191, 191, 191]);
        }
    }
    // Border pixels lose out-of-bounds contributions.
    assert!(out.data[0] < 191);
}

#[test]
fn four_by_four_uniform_scenario() {
    // The concrete end-to-end scenario: 4x4 RGB, value 100 everywhere.
    let input = uniform(4, 4, 3, 100);

    let inverted = run_host(&Kernel::Inversion, &input);
    assert!(inverted.data.iter().all(|&b| b == 155));

    let gray = run_host(&Kernel::Grayscale, &input);
    assert!(gray.data.iter().all(|&b| b == 100));

    let thresholded = run_host(&Kernel::threshold_default(), &input);
    assert!(thresholded.data.iter().all(|&b| b == 0));

    let blurred = run_host(&Kernel::gaussian_blur_3x3(), &input);
    for y in 1..3usize {
        for x in 1..3usize {
            let base = (y * 4 + x) * 3;
            assert_eq!(&blurred.data[base..base + 3], &[100, 100, 100]);
        }
    }
    for (x, y) in [(0usize, 0usize), (3, 0), (0, 3), (3, 3)] {
        let base = (y * 4 + x) * 3;
        assert!(blurred.data[base] < 100, "corner ({},{}) not attenuated", x, y);
    }
}

#[test]
fn alpha_channel_is_never_written() {
    let input = uniform(4, 4, 4, 100);
    for kernel in [
        Kernel::Inversion,
        Kernel::Grayscale,
        Kernel::threshold_default(),
        Kernel::Erode {
            mask: MorphMask::cross_3x3(),
        },
        Kernel::Dilate {
            mask: MorphMask::cross_3x3(),
        },
        Kernel::gaussian_blur_3x3(),
    ] {
        let out = run_host(&kernel, &input);
        for px in 0..16usize {
            assert_eq!(out.data[px * 4 + 3], 0, "{} wrote alpha", kernel.name());
        }
    }
}

#[test]
fn host_matches_sequential_kernels() {
    // The rayon row split must not change results.
    let input = gradient(33, 17); // odd sizes on purpose
    let mask = MorphMask::cross_3x3();

    let parallel = run_host(
        &Kernel::Erode { mask: mask.clone() },
        &input,
    );
    let mut sequential = PixelBuffer::new(33, 17, 3);
    crate::kernels::erode(3, 33, 17, &input.data, &mut sequential.data, &mask);
    assert_eq!(parallel.data, sequential.data);

    let conv = ConvMask::gaussian_5x5();
    let parallel = run_host(&Kernel::Convolution { mask: conv.clone() }, &input);
    let mut sequential = PixelBuffer::new(33, 17, 3);
    crate::kernels::convolve(3, 33, 17, &input.data, &mut sequential.data, &conv);
    assert_eq!(parallel.data, sequential.data);
}

#[test]
fn validation_rejects_shape_mismatch() {
    let input = gradient(4, 4);
    let mut output = PixelBuffer::new(5, 4, 3);
    let err = HostExecutor::new()
        .run(&Kernel::Inversion, &input, &mut output)
        .unwrap_err();
    assert!(matches!(err, ExecError::Validation(_)));
}

#[test]
fn validation_rejects_too_few_channels() {
    let input = PixelBuffer::new(4, 4, 1);
    let mut output = PixelBuffer::new(4, 4, 1);
    let err = HostExecutor::new()
        .run(&Kernel::Grayscale, &input, &mut output)
        .unwrap_err();
    assert!(matches!(err, ExecError::Validation(_)));
}

#[test]
fn validation_rejects_corrupted_mask() {
    let input = gradient(4, 4);
    let mut output = PixelBuffer::new(4, 4, 3);
    let mut mask = MorphMask::cross_3x3();
    mask.weights.pop(); // break the invariant behind the constructor's back
    let err = HostExecutor::new()
        .run(&Kernel::Erode { mask }, &input, &mut output)
        .unwrap_err();
    assert!(matches!(err, ExecError::Validation(_)));
}
