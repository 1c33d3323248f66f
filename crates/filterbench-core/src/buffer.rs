//! Owned pixel buffers and kernel masks.
//!
//! `PixelBuffer` is the only image representation in the library: an
//! interleaved 8-bit buffer with explicit width, height, and channel count.
//! Kernels never allocate; they read one buffer and write a disjoint one.

use serde::{Deserialize, Serialize};

/// An owned rectangular image buffer with interleaved 8-bit channels.
///
/// Invariant: `data.len() == width * height * channels`. The constructors
/// enforce it; code that mutates the fields directly is responsible for
/// keeping it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Image width in pixels.
    pub width: u32,

    /// Image height in pixels.
    pub height: u32,

    /// Channels per pixel (1, 3, or 4).
    pub channels: u32,

    /// Pixel data, row-major, channels interleaved per pixel.
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a zero-filled buffer of the given shape.
    ///
    /// Used for output buffers that a kernel run will fully (or for a
    /// fourth channel, partially) overwrite. The zero fill matters: an
    /// alpha channel that no kernel writes reads back as 0 on every
    /// execution strategy.
    pub fn new(width: u32, height: u32, channels: u32) -> Self {
        let len = (width as usize) * (height as usize) * (channels as usize);
        Self {
            width,
            height,
            channels,
            data: vec![0u8; len],
        }
    }

    /// Adopt decoded bytes as a pixel buffer, validating the length invariant.
    pub fn from_vec(width: u32, height: u32, channels: u32, data: Vec<u8>) -> Result<Self, String> {
        let expected = (width as usize) * (height as usize) * (channels as usize);
        if data.len() != expected {
            return Err(format!(
                "Pixel data length mismatch: expected {} bytes for {}x{}x{}, got {}",
                expected,
                width,
                height,
                channels,
                data.len()
            ));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Total byte length (`width * height * channels`).
    pub fn len(&self) -> usize {
        (self.width as usize) * (self.height as usize) * (self.channels as usize)
    }

    /// True when the buffer holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of pixels (`width * height`).
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }
}

fn validate_mask_shape(width: u32, height: u32, weight_count: usize) -> Result<(), String> {
    if width == 0 || height == 0 {
        return Err(format!("Mask dimensions must be positive, got {}x{}", width, height));
    }
    if width % 2 == 0 || height % 2 == 0 {
        return Err(format!(
            "Mask dimensions must be odd so a center element exists, got {}x{}",
            width, height
        ));
    }
    let expected = (width as usize) * (height as usize);
    if weight_count != expected {
        return Err(format!(
            "Mask weight count mismatch: expected {} for {}x{}, got {}",
            expected, width, height, weight_count
        ));
    }
    Ok(())
}

/// A morphological structuring element: u8 weights where nonzero marks a
/// participating neighbor. Always odd in both dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorphMask {
    pub width: u32,
    pub height: u32,
    /// Row-major weights, `width * height` entries.
    pub weights: Vec<u8>,
}

impl MorphMask {
    /// Build a structuring element, validating shape and weight count.
    pub fn new(width: u32, height: u32, weights: Vec<u8>) -> Result<Self, String> {
        validate_mask_shape(width, height, weights.len())?;
        Ok(Self {
            width,
            height,
            weights,
        })
    }

    /// The 3x3 cross (4-connected) structuring element.
    pub fn cross_3x3() -> Self {
        Self {
            width: 3,
            height: 3,
            weights: vec![0, 1, 0, 1, 1, 1, 0, 1, 0],
        }
    }
}

/// A convolution mask: f32 weights, odd in both dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvMask {
    pub width: u32,
    pub height: u32,
    /// Row-major weights, `width * height` entries.
    pub weights: Vec<f32>,
}

impl ConvMask {
    /// Build a convolution mask, validating shape and weight count.
    pub fn new(width: u32, height: u32, weights: Vec<f32>) -> Result<Self, String> {
        validate_mask_shape(width, height, weights.len())?;
        Ok(Self {
            width,
            height,
            weights,
        })
    }

    /// The fixed 3x3 Gaussian blur mask `[1,2,1; 2,4,2; 1,2,1] / 16`.
    pub fn gaussian_3x3() -> Self {
        let w = [
            1.0 / 16.0,
            2.0 / 16.0,
            1.0 / 16.0,
            2.0 / 16.0,
            4.0 / 16.0,
            2.0 / 16.0,
            1.0 / 16.0,
            2.0 / 16.0,
            1.0 / 16.0,
        ];
        Self {
            width: 3,
            height: 3,
            weights: w.to_vec(),
        }
    }

    /// The fixed 5x5 Gaussian blur mask (binomial weights over 256).
    pub fn gaussian_5x5() -> Self {
        #[rustfmt::skip]
        let w = [
            1.0 / 256.0,  4.0 / 256.0,  6.0 / 256.0,  4.0 / 256.0, 1.0 / 256.0,
            4.0 / 256.0, 16.0 / 256.0, 24.0 / 256.0, 16.0 / 256.0, 4.0 / 256.0,
            6.0 / 256.0, 24.0 / 256.0, 36.0 / 256.0, 24.0 / 256.0, 6.0 / 256.0,
            4.0 / 256.0, 16.0 / 256.0, 24.0 / 256.0, 16.0 / 256.0, 4.0 / 256.0,
            1.0 / 256.0,  4.0 / 256.0,  6.0 / 256.0,  4.0 / 256.0, 1.0 / 256.0,
        ];
        Self {
            width: 5,
            height: 5,
            weights: w.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_zero_filled() {
        let buf = PixelBuffer::new(4, 3, 3);
        assert_eq!(buf.len(), 36);
        assert_eq!(buf.data.len(), 36);
        assert!(buf.data.iter().all(|&b| b == 0));
        assert_eq!(buf.pixel_count(), 12);
    }

    #[test]
    fn from_vec_validates_length() {
        assert!(PixelBuffer::from_vec(2, 2, 3, vec![0u8; 12]).is_ok());
        let err = PixelBuffer::from_vec(2, 2, 3, vec![0u8; 11]).unwrap_err();
        assert!(err.contains("length mismatch"));
    }

    #[test]
    fn mask_rejects_even_dimensions() {
        assert!(MorphMask::new(2, 3, vec![0u8; 6]).is_err());
        assert!(MorphMask::new(3, 2, vec![0u8; 6]).is_err());
        assert!(ConvMask::new(4, 1, vec![0.0; 4]).is_err());
    }

    #[test]
    fn mask_rejects_zero_dimensions() {
        assert!(MorphMask::new(0, 3, vec![]).is_err());
        assert!(ConvMask::new(3, 0, vec![]).is_err());
    }

    #[test]
    fn mask_rejects_weight_count_mismatch() {
        assert!(MorphMask::new(3, 3, vec![1u8; 8]).is_err());
        assert!(ConvMask::new(3, 3, vec![0.0; 10]).is_err());
    }

    #[test]
    fn cross_3x3_shape() {
        let m = MorphMask::cross_3x3();
        assert_eq!(m.weights.len(), 9);
        assert_eq!(m.weights[4], 1);
        assert_eq!(m.weights[0], 0);
    }

    #[test]
    fn gaussian_masks_sum_to_one() {
        for mask in [ConvMask::gaussian_3x3(), ConvMask::gaussian_5x5()] {
            let sum: f32 = mask.weights.iter().sum();
            assert!((sum - 1.0).abs() < 1e-6);
        }
    }
}
