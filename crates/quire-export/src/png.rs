//! PNG encoding of rendered pages.

use std::io::Cursor;
use std::path::Path;

use image::ImageFormat;
use quire_core::{Color, ExportError};
use quire_render::{CompositeOptions, Raster};

/// Export options for PNG.
#[derive(Debug, Clone, Default)]
pub struct PngOptions {
    /// Background to flatten the page onto; `None` keeps transparency.
    pub background: Option<Color>,
}

/// Encode a raster as PNG bytes.
pub fn encode(raster: &Raster, options: &PngOptions) -> Result<Vec<u8>, ExportError> {
    let flattened;
    let raster = match options.background {
        Some(color) => {
            let mut base = Raster::filled(raster.width(), raster.height(), color);
            base.composite(raster, CompositeOptions::at(0, 0));
            flattened = base;
            &flattened
        }
        None => raster,
    };

    let mut output = Cursor::new(Vec::new());
    raster
        .as_image()
        .write_to(&mut output, ImageFormat::Png)
        .map_err(|e| ExportError::EncodeFailed {
            reason: e.to_string(),
        })?;
    Ok(output.into_inner())
}

/// Encode a raster as PNG and write it to `path`.
pub fn write(raster: &Raster, path: &Path, options: &PngOptions) -> Result<(), ExportError> {
    let bytes = encode(raster, options)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decodes_back() {
        let raster = Raster::filled(3, 2, Color::rgb(1.0, 0.0, 0.0));
        let bytes = encode(&raster, &PngOptions::default()).unwrap();
        assert_eq!(&bytes[..8], &[137, 80, 78, 71, 13, 10, 26, 10]);

        let decoded = Raster::decode(&bytes).unwrap();
        assert_eq!(decoded, raster);
    }

    #[test]
    fn test_background_flattens_transparency() {
        let raster = Raster::new(2, 2);
        let options = PngOptions {
            background: Some(Color::WHITE),
        };
        let decoded = Raster::decode(&encode(&raster, &options).unwrap()).unwrap();
        assert_eq!(decoded.pixel(1, 1), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.png");
        write(&Raster::new(4, 4), &path, &PngOptions::default()).unwrap();
        assert!(path.exists());
    }
}
