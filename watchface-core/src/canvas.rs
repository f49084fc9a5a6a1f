//! One bit per pixel framebuffer the face renders into, and the seam that
//! hands finished frames to the host's graphics service.

use core::convert::Infallible;

use thiserror::Error;

use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, OriginDimensions, Point, Size},
    Pixel,
};

pub struct Framebuffer {
    width: u32,
    height: u32,
    bits: Vec<u8>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let len = ((width * height) as usize + 7) / 8;
        Self {
            width,
            height,
            bits: vec![0u8; len],
        }
    }

    fn index(&self, p: Point) -> Option<usize> {
        if p.x < 0 || p.y < 0 || p.x as u32 >= self.width || p.y as u32 >= self.height {
            return None;
        }
        Some(p.y as usize * self.width as usize + p.x as usize)
    }

    pub fn is_on(&self, p: Point) -> bool {
        match self.index(p) {
            Some(i) => self.bits[i / 8] & (1 << (i % 8)) != 0,
            None => false,
        }
    }

    pub fn set(&mut self, p: Point, color: BinaryColor) {
        if let Some(i) = self.index(p) {
            match color {
                BinaryColor::On => self.bits[i / 8] |= 1 << (i % 8),
                BinaryColor::Off => self.bits[i / 8] &= !(1 << (i % 8)),
            }
        }
    }

    pub fn count_on(&self) -> u32 {
        self.bits.iter().map(|b| b.count_ones()).sum()
    }

    /// Packed pixels, row major, least significant bit first.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }
}

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("graphics service unavailable")]
    Unavailable,
    #[error("posting frame failed: {0}")]
    Post(String),
}

/// Destination for finished frames.
pub trait Display {
    fn present(&mut self, frame: &Framebuffer) -> Result<(), DisplayError>;
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, color) in pixels {
            self.set(p, color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let fill = match color {
            BinaryColor::On => 0xff,
            BinaryColor::Off => 0x00,
        };
        self.bits.iter_mut().for_each(|b| *b = fill);
        let used = (self.width * self.height) as usize % 8;
        if fill != 0 && used != 0 {
            if let Some(last) = self.bits.last_mut() {
                *last &= (1u8 << used) - 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_clip() {
        let mut fb = Framebuffer::new(10, 3);
        fb.set(Point::new(9, 2), BinaryColor::On);
        fb.set(Point::new(10, 2), BinaryColor::On);
        fb.set(Point::new(-1, 0), BinaryColor::On);
        assert!(fb.is_on(Point::new(9, 2)));
        assert!(!fb.is_on(Point::new(10, 2)));
        assert_eq!(fb.count_on(), 1);

        fb.set(Point::new(9, 2), BinaryColor::Off);
        assert_eq!(fb.count_on(), 0);
    }

    #[test]
    fn test_clear() {
        let mut fb = Framebuffer::new(8, 2);
        fb.clear(BinaryColor::On).ok();
        assert_eq!(fb.count_on(), 16);
        fb.clear(BinaryColor::Off).ok();
        assert_eq!(fb.count_on(), 0);
        assert_eq!(fb.size(), Size::new(8, 2));
    }
}
