//! Dials and their tick marks.

use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, Point, Primitive, Size},
    primitives::{Line, PrimitiveStyle, Rectangle},
    Drawable, Pixel,
};

use crate::geometry::point_on_circle_deg;

/// A circular drawing region.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Dial {
    pub center: Point,
    pub radius: i32,
}

impl Dial {
    pub const fn new(center: Point, radius: i32) -> Self {
        Self { center, radius }
    }

    pub fn point_at_deg(&self, radius: i32, degrees: i32) -> Point {
        point_on_circle_deg(self.center, radius.max(0), degrees)
    }
}

/// How major calibration marks are drawn.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TickStyle {
    /// 3x3 filled square
    Block,
    /// Radial segment from radius+1 to radius-1
    Line,
}

/// Degree position of mark `i` out of `count`.
pub fn tick_degrees(i: u32, count: u32) -> i32 {
    (i * 360 / count) as i32
}

pub fn draw_ticks<D>(target: &mut D, dial: &Dial, count: u32, major_every: u32, style: TickStyle)
where
    D: DrawTarget<Color = BinaryColor>,
{
    if count == 0 {
        return;
    }
    let major_every = major_every.max(1);
    for i in 0..count {
        let deg = tick_degrees(i, count);
        let p = dial.point_at_deg(dial.radius, deg);
        if i % major_every == 0 {
            match style {
                TickStyle::Block => {
                    Rectangle::new(Point::new(p.x - 1, p.y - 1), Size::new(3, 3))
                        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                        .draw(target)
                        .ok();
                }
                TickStyle::Line => {
                    let outer = dial.point_at_deg(dial.radius + 1, deg);
                    let inner = dial.point_at_deg(dial.radius - 1, deg);
                    Line::new(outer, inner)
                        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
                        .draw(target)
                        .ok();
                }
            }
        } else {
            Pixel(p, BinaryColor::On).draw(target).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Framebuffer;

    #[test]
    fn test_tick_degrees() {
        assert_eq!(tick_degrees(0, 60), 0);
        assert_eq!(tick_degrees(5, 60), 30);
        assert_eq!(tick_degrees(1, 20), 18);
        assert_eq!(tick_degrees(59, 60), 354);
    }

    #[test]
    fn test_block_major_and_pixel_minor() {
        let mut fb = Framebuffer::new(100, 100);
        let dial = Dial::new(Point::new(50, 50), 40);
        draw_ticks(&mut fb, &dial, 60, 5, TickStyle::Block);

        // 12 o'clock is a major block centred on (50, 10)
        for dx in -1..=1 {
            for dy in -1..=1 {
                assert!(fb.is_on(Point::new(50 + dx, 10 + dy)));
            }
        }
        // A minor mark is a lone pixel
        let minor = point_on_circle_deg(dial.center, 40, 6);
        assert!(fb.is_on(minor));
        assert!(!fb.is_on(Point::new(minor.x, minor.y + 2)));
        assert!(!fb.is_on(dial.center));
    }

    #[test]
    fn test_line_major_is_radial() {
        let mut fb = Framebuffer::new(100, 100);
        let dial = Dial::new(Point::new(50, 50), 20);
        draw_ticks(&mut fb, &dial, 60, 5, TickStyle::Line);

        // 12 o'clock spans radius 21..19 straight up
        assert!(fb.is_on(Point::new(50, 29)));
        assert!(fb.is_on(Point::new(50, 30)));
        assert!(fb.is_on(Point::new(50, 31)));
        assert!(!fb.is_on(Point::new(49, 30)));
        assert!(!fb.is_on(Point::new(51, 30)));
    }

    #[test]
    fn test_all_marks_drawn() {
        let mut fb = Framebuffer::new(100, 100);
        let dial = Dial::new(Point::new(50, 50), 30);
        draw_ticks(&mut fb, &dial, 20, 2, TickStyle::Block);
        for i in 0..20 {
            assert!(fb.is_on(dial.point_at_deg(30, tick_degrees(i, 20))));
        }
        // 10 blocks of 9 px, 10 single pixels
        assert_eq!(fb.count_on(), 10 * 9 + 10);
    }

    #[test]
    fn test_zero_count_draws_nothing() {
        let mut fb = Framebuffer::new(20, 20);
        draw_ticks(&mut fb, &Dial::new(Point::new(10, 10), 5), 0, 5, TickStyle::Block);
        assert_eq!(fb.count_on(), 0);
    }
}
