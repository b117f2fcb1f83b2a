//! PNG sink: writes a BGRA pixel grid to a file. Used only by the texture
//! dumper CLI; the core decoders never touch image codecs.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::{Error, Result};

/// Write `pixels` (tightly packed BGRA, `width * height * 4` bytes) as a PNG
/// file at `path`.
pub fn write_png(path: &Path, width: u32, height: u32, pixels: &[u8]) -> Result<()> {
    let expected = width as usize * height as usize * 4;
    if pixels.len() != expected {
        return Err(Error::Malformed(format!("pixel buffer is {} bytes, expected {}", pixels.len(), expected)));
    }

    let rgba = bgra_to_rgba(pixels);

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder
        .write_header()
        .map_err(|e| Error::Malformed(format!("png header write failed: {e}")))?;
    writer
        .write_image_data(&rgba)
        .map_err(|e| Error::Malformed(format!("png data write failed: {e}")))?;

    Ok(())
}

fn bgra_to_rgba(pixels: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixels.len());
    for px in pixels.chunks_exact(4) {
        out.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bgra_swaps_red_and_blue_channels() {
        let bgra = [0x11, 0x22, 0x33, 0xFF]; // B G R A
        let rgba = bgra_to_rgba(&bgra);
        assert_eq!(rgba, vec![0x33, 0x22, 0x11, 0xFF]);
    }

    #[test]
    fn size_mismatch_is_rejected() {
        let tmp = std::env::temp_dir().join("propfile_test_size_mismatch.png");
        let result = write_png(&tmp, 2, 2, &[0u8; 4]);
        assert!(result.is_err());
    }
}
