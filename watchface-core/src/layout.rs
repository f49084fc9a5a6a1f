//! Screen geometry recomputed on every window rebuild.

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use crate::dial::Dial;
use crate::settings::Settings;

pub const HEADER_HEIGHT: u32 = 14;
pub const HEADER_HEIGHT_LARGE: u32 = 18;

/// Fixed radii of the three stopwatch sub-dials.
pub const SUB_DIAL_RADII: [i32; 3] = [20, 20, 30];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Layout {
    pub watch: Rectangle,
    pub date_label: Option<Rectangle>,
    pub battery_label: Option<Rectangle>,
    pub main: Dial,
    /// 1 = stopwatch tenths, 2 = seconds, 3 = stopwatch minutes/hours
    pub sub: [Dial; 3],
    pub second_hand_length: i32,
    pub minute_hand_length: i32,
    pub hour_hand_length: i32,
}

fn round_scaled(value: i32, factor: f64) -> i32 {
    (value as f64 * factor).round() as i32
}

impl Layout {
    pub fn new(screen: Size, settings: &Settings) -> Self {
        let header = if settings.has_header() {
            if settings.use_larger_font {
                HEADER_HEIGHT_LARGE
            } else {
                HEADER_HEIGHT
            }
        } else {
            0
        }
        .min(screen.height);

        let watch = Rectangle::new(
            Point::new(0, header as i32),
            Size::new(screen.width, screen.height - header),
        );

        let date_width = screen.width * 5 / 8;
        let date_label = settings
            .show_date
            .then(|| Rectangle::new(Point::zero(), Size::new(date_width, header)));
        let battery_label = settings.show_battery.then(|| {
            Rectangle::new(
                Point::new(date_width as i32, 0),
                Size::new(screen.width - date_width, header),
            )
        });

        let radius = (watch.size.width.min(watch.size.height) / 2) as i32 - 2;
        let radius = radius.max(0);
        let center = Point::new(
            (watch.size.width / 2) as i32,
            watch.top_left.y + (watch.size.height / 2) as i32,
        );
        let main = Dial::new(center, radius);

        let sub = [
            Dial::new(main.point_at_deg(round_scaled(radius, 0.6), 0), SUB_DIAL_RADII[0]),
            Dial::new(main.point_at_deg(round_scaled(radius, 0.5), 285), SUB_DIAL_RADII[1]),
            Dial::new(main.point_at_deg(round_scaled(radius, 0.5), 180), SUB_DIAL_RADII[2]),
        ];

        Self {
            watch,
            date_label,
            battery_label,
            main,
            sub,
            second_hand_length: radius - 3,
            minute_hand_length: round_scaled(radius, 0.8),
            hour_hand_length: round_scaled(radius, 0.5),
        }
    }

    pub fn header_height(&self) -> u32 {
        self.watch.top_left.y as u32
    }
}
