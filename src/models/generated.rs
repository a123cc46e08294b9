use crate::error::{FluxError, Result};
use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, GenericImageView, ImageFormat, ImageOutputFormat};
use std::io::Cursor;

/// A bitmap decoded from the inference endpoint's response body.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    image: DynamicImage,
    format: ImageFormat,
}

impl GeneratedImage {
    /// Decodes `bytes`, detecting the encoding from its magic number.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(FluxError::DecodeError("response body is empty".into()));
        }
        let format = image::guess_format(bytes)
            .map_err(|e| FluxError::DecodeError(format!("unrecognised image data: {}", e)))?;
        let image = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| FluxError::DecodeError(e.to_string()))?;
        Ok(Self { image, format })
    }

    pub fn width(&self) -> u32 {
        self.image.dimensions().0
    }

    pub fn height(&self) -> u32 {
        self.image.dimensions().1
    }

    /// Encoding the endpoint sent the image in.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.image
            .write_to(&mut buffer, ImageOutputFormat::Png)
            .map_err(|e| FluxError::DecodeError(format!("PNG encoding failed: {}", e)))?;
        Ok(buffer.into_inner())
    }

    /// `data:` URI suitable for an `<img src>` attribute.
    pub fn to_data_uri(&self) -> Result<String> {
        let png = self.to_png()?;
        Ok(format!(
            "data:image/png;base64,{}",
            general_purpose::STANDARD.encode(png)
        ))
    }
}

#[cfg(test)]
pub(crate) fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let pixels = image::RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40]));
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(pixels)
        .write_to(&mut buffer, ImageOutputFormat::Png)
        .unwrap();
    buffer.into_inner()
}
