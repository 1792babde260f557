//! Writing rendered images to disk.
//!
//! The format follows the output path's extension. `.ppm` and unrecognized
//! extensions are written as binary PPM (P6).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ColorType, ImageEncoder, ImageFormat};
use thiserror::Error;

use crate::renderer::ImageBuffer;

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("RGB buffer holds {actual} bytes, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

pub type OutputResult<T> = Result<T, OutputError>;

/// Image format used for `path`.
pub fn output_format(path: &Path) -> ImageFormat {
    ImageFormat::from_path(path).unwrap_or(ImageFormat::Pnm)
}

/// Encode packed RGB bytes as binary PPM.
pub fn write_ppm<W: Write>(writer: W, width: u32, height: u32, rgb: &[u8]) -> OutputResult<()> {
    PnmEncoder::new(writer)
        .with_subtype(PnmSubtype::Pixmap(SampleEncoding::Binary))
        .write_image(rgb, width, height, ColorType::Rgb8)?;
    Ok(())
}

/// Write packed, row-major RGB bytes to `path`.
pub fn save_rgb8<P: AsRef<Path>>(path: P, width: u32, height: u32, rgb: &[u8]) -> OutputResult<()> {
    let path = path.as_ref();

    let expected = width as usize * height as usize * 3;
    if rgb.len() != expected {
        return Err(OutputError::SizeMismatch {
            expected,
            actual: rgb.len(),
        });
    }

    let format = output_format(path);
    match format {
        ImageFormat::Pnm => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_ppm(&mut writer, width, height, rgb)?;
            writer.flush()?;
        }
        _ => image::save_buffer_with_format(path, rgb, width, height, ColorType::Rgb8, format)?,
    }

    log::info!("Saved {}x{} {:?} image to {}", width, height, format, path.display());
    Ok(())
}

/// Quantize and write a rendered image.
pub fn save_image<P: AsRef<Path>>(path: P, image: &ImageBuffer) -> OutputResult<()> {
    save_rgb8(path, image.width, image.height, &image.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_math::Color;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("glint_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_output_format() {
        assert_eq!(output_format(Path::new("out.ppm")), ImageFormat::Pnm);
        assert_eq!(output_format(Path::new("out.png")), ImageFormat::Png);
        assert_eq!(output_format(Path::new("out.img")), ImageFormat::Pnm);
        assert_eq!(output_format(Path::new("out")), ImageFormat::Pnm);
    }

    #[test]
    fn test_write_ppm() {
        let rgb = [255, 0, 0, 0, 255, 0];
        let mut bytes = Vec::new();
        write_ppm(&mut bytes, 2, 1, &rgb).unwrap();

        assert!(bytes.starts_with(b"P6"));
        assert!(bytes.ends_with(&rgb));
    }

    #[test]
    fn test_size_mismatch() {
        let err = save_rgb8(temp_path("short.ppm"), 2, 2, &[0; 6]).unwrap_err();
        assert!(matches!(
            err,
            OutputError::SizeMismatch {
                expected: 12,
                actual: 6
            }
        ));
    }

    #[test]
    fn test_save_image_ppm() {
        let mut buffer = ImageBuffer::new(2, 2);
        buffer.set(1, 0, Color::new(1.0, 0.0, 0.0));

        let path = temp_path("image.ppm");
        save_image(&path, &buffer).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"P6"));
        assert!(bytes.ends_with(&[0, 0, 0, 255, 0, 0, 0, 0, 0, 0, 0, 0]));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_image_png() {
        let mut buffer = ImageBuffer::new(3, 1);
        buffer.set(2, 0, Color::new(0.0, 0.0, 1.0));

        let path = temp_path("image.png");
        save_image(&path, &buffer).unwrap();

        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (3, 1));
        assert_eq!(decoded.get_pixel(2, 0).0, [0, 0, 255]);
        assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0]);

        std::fs::remove_file(&path).unwrap();
    }
}
