//! PNG image codec.
//!
//! Narrow contract: decode an 8-bit grayscale/RGB/RGBA PNG into a
//! [`PixelBuffer`] and encode one back. Anything else (16-bit, indexed,
//! gray+alpha) is reported as an unsupported format rather than silently
//! converted.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::buffer::PixelBuffer;

/// Decode a PNG file into a pixel buffer.
pub fn load<P: AsRef<Path>>(path: P) -> Result<PixelBuffer, String> {
    let file = File::open(path.as_ref()).map_err(|e| format!("Failed to open image: {}", e))?;
    let decoder = png::Decoder::new(std::io::BufReader::new(file));
    let mut reader = decoder
        .read_info()
        .map_err(|e| format!("Failed to read PNG info: {}", e))?;

    let info = reader.info();
    let width = info.width;
    let height = info.height;
    let color_type = info.color_type;
    let bit_depth = info.bit_depth;

    let channels = match (color_type, bit_depth) {
        (png::ColorType::Grayscale, png::BitDepth::Eight) => 1u32,
        (png::ColorType::Rgb, png::BitDepth::Eight) => 3,
        (png::ColorType::Rgba, png::BitDepth::Eight) => 4,
        _ => {
            return Err(format!(
                "Unsupported PNG format: {:?} with bit depth {:?}",
                color_type, bit_depth
            ));
        }
    };

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame_info = reader
        .next_frame(&mut buf)
        .map_err(|e| format!("Failed to read PNG frame: {}", e))?;
    buf.truncate(frame_info.buffer_size());

    PixelBuffer::from_vec(width, height, channels, buf)
}

/// Encode a pixel buffer as a PNG file.
pub fn save<P: AsRef<Path>>(path: P, image: &PixelBuffer) -> Result<(), String> {
    let color_type = match image.channels {
        1 => png::ColorType::Grayscale,
        3 => png::ColorType::Rgb,
        4 => png::ColorType::Rgba,
        n => return Err(format!("Cannot encode {}-channel image as PNG", n)),
    };
    if image.data.len() != image.len() {
        return Err(format!(
            "Refusing to encode buffer whose data length {} violates its {}x{}x{} shape",
            image.data.len(),
            image.width,
            image.height,
            image.channels
        ));
    }

    let file =
        File::create(path.as_ref()).map_err(|e| format!("Failed to create output file: {}", e))?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, image.width, image.height);
    encoder.set_color(color_type);
    encoder.set_depth(png::BitDepth::Eight);

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| format!("Failed to write PNG header: {}", e))?;
    png_writer
        .write_image_data(&image.data)
        .map_err(|e| format!("Failed to write PNG data: {}", e))?;

    Ok(())
}
