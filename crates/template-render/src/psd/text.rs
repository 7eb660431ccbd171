//! Bitmap text for raster layers
//!
//! Glyphs come from the fixed-size fonts bundled with embedded-graphics and
//! are scaled up by whole pixels to roughly match the point size used in the
//! vector formats.

use std::convert::Infallible;

use embedded_graphics::mono_font::ascii::{FONT_8X13, FONT_9X15_BOLD};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use image::imageops;
use image::{Rgba, RgbaImage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Weight {
    Regular,
    Bold,
}

impl Weight {
    fn font(self) -> &'static MonoFont<'static> {
        match self {
            Weight::Regular => &FONT_8X13,
            Weight::Bold => &FONT_9X15_BOLD,
        }
    }
}

/// One bit per pixel, set where a glyph is inked
struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width as usize * height as usize],
        }
    }
}

impl OriginDimensions for Mask {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Mask {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if color.is_off() || point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            if x < self.width && y < self.height {
                self.bits[(y * self.width + x) as usize] = true;
            }
        }
        Ok(())
    }
}

/// Render one line of text whose glyph cells are about `height_px` tall.
///
/// Returns `None` for blank text.
pub(crate) fn render_line(
    text: &str,
    weight: Weight,
    height_px: f64,
    color: [u8; 3],
) -> Option<RgbaImage> {
    let text = text.trim_end();
    if text.is_empty() {
        return None;
    }

    let font = weight.font();
    let advance = font.character_size.width + font.character_spacing;
    let glyphs = text.chars().count() as u32;
    let mut mask = Mask::new(advance * glyphs, font.character_size.height);

    let style = MonoTextStyle::new(font, BinaryColor::On);
    let Ok(_) = Text::with_baseline(text, Point::zero(), style, Baseline::Top).draw(&mut mask);

    let [r, g, b] = color;
    let glyph_image = RgbaImage::from_fn(mask.width, mask.height, |x, y| {
        if mask.bits[(y * mask.width + x) as usize] {
            Rgba([r, g, b, u8::MAX])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });

    let scale = (height_px / f64::from(font.character_size.height))
        .round()
        .max(1.0) as u32;
    if scale == 1 {
        return Some(glyph_image);
    }
    // Whole-pixel blocks keep glyph edges hard
    Some(RgbaImage::from_fn(
        mask.width * scale,
        mask.height * scale,
        |x, y| *glyph_image.get_pixel(x / scale, y / scale),
    ))
}

/// Stack lines top to bottom, left aligned
pub(crate) fn stack(lines: Vec<RgbaImage>, gap: u32) -> Option<RgbaImage> {
    let width = lines.iter().map(RgbaImage::width).max()?;
    let height = lines.iter().map(RgbaImage::height).sum::<u32>()
        + gap * (lines.len() as u32).saturating_sub(1);
    let mut out = RgbaImage::new(width, height);
    let mut y = 0;
    for line in &lines {
        imageops::overlay(&mut out, line, 0, i64::from(y));
        y += line.height() + gap;
    }
    Some(out)
}

/// Turn a bitmap counter-clockwise by `degrees`, snapped to quarter turns
pub(crate) fn rotate(image: RgbaImage, degrees: f64) -> RgbaImage {
    match (degrees / 90.0).round().rem_euclid(4.0) as u8 {
        1 => imageops::rotate270(&image),
        2 => imageops::rotate180(&image),
        3 => imageops::rotate90(&image),
        _ => image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inked(image: &RgbaImage) -> usize {
        image.pixels().filter(|p| p.0[3] > 0).count()
    }

    #[test]
    fn lines_are_inked_and_scaled() {
        let small = render_line("0.125 in", Weight::Regular, 13.0, [0, 0, 0]).unwrap();
        assert_eq!((small.width(), small.height()), (64, 13));
        assert!(inked(&small) > 0);

        let large = render_line("0.125 in", Weight::Regular, 39.0, [0, 0, 0]).unwrap();
        assert_eq!((large.width(), large.height()), (192, 39));
        assert_eq!(inked(&large), inked(&small) * 9);
    }

    #[test]
    fn blank_text_renders_nothing() {
        assert!(render_line("   ", Weight::Bold, 20.0, [0, 0, 0]).is_none());
    }

    #[test]
    fn quarter_turns_swap_dimensions() {
        let line = render_line("SPINE", Weight::Bold, 15.0, [0, 0, 0]).unwrap();
        let turned = rotate(line.clone(), 90.0);
        assert_eq!((turned.width(), turned.height()), (line.height(), line.width()));
        assert_eq!(rotate(line.clone(), 0.0), line);
    }

    #[test]
    fn stacked_lines_keep_the_widest() {
        let value = render_line("12.750 x 9.250 in", Weight::Bold, 15.0, [0, 0, 0]).unwrap();
        let description = render_line("Total", Weight::Regular, 13.0, [0, 0, 0]).unwrap();
        let block = stack(vec![value.clone(), description.clone()], 2).unwrap();
        assert_eq!(block.width(), value.width());
        assert_eq!(block.height(), value.height() + description.height() + 2);
    }
}
