use image::RgbaImage;
use image::imageops::FilterType;

use crate::types::Result;

/// Decoded publisher logo
#[derive(Debug, Clone)]
pub struct LogoImage {
    pub image: RgbaImage,
}

impl LogoImage {
    /// Decode PNG, JPEG or any other format the `image` crate recognizes
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Width over height
    pub fn aspect(&self) -> f64 {
        if self.image.height() == 0 {
            return 1.0;
        }
        f64::from(self.image.width()) / f64::from(self.image.height())
    }

    /// Resampled copy at an exact pixel size
    pub fn resized(&self, width: u32, height: u32) -> RgbaImage {
        image::imageops::resize(&self.image, width.max(1), height.max(1), FilterType::Triangle)
    }

    /// Color samples and alpha samples as separate planes
    pub fn split_rgb_alpha(&self) -> (Vec<u8>, Vec<u8>) {
        let pixels = self.image.as_raw();
        let mut rgb = Vec::with_capacity(pixels.len() / 4 * 3);
        let mut alpha = Vec::with_capacity(pixels.len() / 4);
        for px in pixels.chunks_exact(4) {
            rgb.extend_from_slice(&px[..3]);
            alpha.push(px[3]);
        }
        (rgb, alpha)
    }

    /// True when every pixel is fully opaque
    pub fn is_opaque(&self) -> bool {
        self.image.pixels().all(|p| p.0[3] == u8::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_png_and_splits_planes() {
        let mut source = RgbaImage::new(4, 2);
        source.put_pixel(0, 0, image::Rgba([255, 0, 0, 128]));
        let mut png = std::io::Cursor::new(Vec::new());
        source.write_to(&mut png, image::ImageFormat::Png).unwrap();

        let logo = LogoImage::decode(png.get_ref()).unwrap();
        assert_eq!((logo.width(), logo.height()), (4, 2));
        assert_eq!(logo.aspect(), 2.0);
        assert!(!logo.is_opaque());

        let (rgb, alpha) = logo.split_rgb_alpha();
        assert_eq!(rgb.len(), 24);
        assert_eq!(&rgb[..3], &[255, 0, 0]);
        assert_eq!(alpha[0], 128);
    }

    #[test]
    fn rejects_garbage() {
        assert!(LogoImage::decode(b"not an image").is_err());
    }
}
