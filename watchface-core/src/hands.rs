//! Hands of the wall clock and of the stopwatch complication.

use chrono::Timelike;
use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, Point, Primitive},
    primitives::{Line, PrimitiveStyle},
    Drawable,
};

use crate::geometry::{deg_to_angle, point_on_circle, turn_fraction_to_angle, TRIG_MAX_ANGLE};
use crate::layout::Layout;
use crate::settings::Settings;
use crate::Elapsed;

const THIN_STROKE: u32 = 1;
const THICK_STROKE: u32 = 3;
const SUB_DIAL_INSET: i32 = 4;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl ClockTime {
    pub fn new(hour: u32, minute: u32, second: u32) -> Self {
        Self { hour, minute, second }
    }

    pub fn from_time<T: Timelike>(t: &T) -> Self {
        // Leap seconds report as 59
        Self::new(t.hour(), t.minute(), t.second().min(59))
    }
}

/// A hand as a segment from its pivot to its tip.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Hand {
    pub pivot: Point,
    pub tip: Point,
    pub stroke: u32,
}

impl Hand {
    fn new(pivot: Point, length: i32, angle: i32, stroke: u32) -> Self {
        Self {
            pivot,
            tip: point_on_circle(pivot, length.max(0), angle),
            stroke,
        }
    }

    pub fn draw<D>(&self, target: &mut D)
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        Line::new(self.pivot, self.tip)
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, self.stroke))
            .draw(target)
            .ok();
    }
}

/// Hand angles in the full-turn unit.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ClockAngles {
    pub second: i32,
    pub minute: i32,
    pub hour: i32,
}

pub fn clock_angles(t: ClockTime) -> ClockAngles {
    ClockAngles {
        second: turn_fraction_to_angle(t.second, 60),
        minute: turn_fraction_to_angle(t.minute * 60 + t.second, 3600),
        hour: turn_fraction_to_angle((t.hour % 12) * 3600 + t.minute * 60 + t.second, 43200),
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ClockHands {
    pub second: Hand,
    pub minute: Hand,
    pub hour: Hand,
}

pub fn clock_hands(t: ClockTime, layout: &Layout, settings: &Settings) -> ClockHands {
    let angles = clock_angles(t);
    let center = layout.main.center;
    let second = if settings.stopwatch_uses_big_second_hand {
        let dial = &layout.sub[1];
        Hand::new(dial.center, dial.radius - SUB_DIAL_INSET, angles.second, THIN_STROKE)
    } else {
        Hand::new(center, layout.second_hand_length, angles.second, THIN_STROKE)
    };
    ClockHands {
        second,
        minute: Hand::new(center, layout.minute_hand_length, angles.minute, THICK_STROKE),
        hour: Hand::new(center, layout.hour_hand_length, angles.hour, THICK_STROKE),
    }
}

pub fn draw_clock_hands<D>(target: &mut D, t: ClockTime, layout: &Layout, settings: &Settings)
where
    D: DrawTarget<Color = BinaryColor>,
{
    let hands = clock_hands(t, layout, settings);
    hands.second.draw(target);
    hands.minute.draw(target);
    hands.hour.draw(target);
}

/// Stopwatch hand angles in the full-turn unit.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct StopwatchAngles {
    pub tenths: i32,
    pub second: i32,
    pub minute: i32,
    pub hour: i32,
}

pub fn stopwatch_angles(e: Elapsed) -> StopwatchAngles {
    let minutes = e.total_seconds / 60;
    StopwatchAngles {
        tenths: deg_to_angle(360 * e.msec as i32 / 1000),
        second: deg_to_angle((e.total_seconds % 60) as i32 * 6),
        minute: deg_to_angle((minutes % 60) as i32 * 6),
        // Half a degree per minute; exact in the full-turn unit
        hour: (minutes % 720) as i32 * TRIG_MAX_ANGLE / 720,
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct StopwatchHands {
    pub tenths: Hand,
    pub second: Hand,
    pub minute: Hand,
    pub hour: Hand,
}

pub fn stopwatch_hands(e: Elapsed, layout: &Layout, settings: &Settings) -> StopwatchHands {
    let angles = stopwatch_angles(e);
    let [tenths_dial, second_dial, hour_dial] = layout.sub;

    let second = if settings.stopwatch_uses_big_second_hand {
        Hand::new(
            layout.main.center,
            layout.second_hand_length - SUB_DIAL_INSET,
            angles.second,
            THIN_STROKE,
        )
    } else {
        Hand::new(
            second_dial.center,
            second_dial.radius - SUB_DIAL_INSET,
            angles.second,
            THIN_STROKE,
        )
    };

    let minute_length = hour_dial.radius - SUB_DIAL_INSET;
    let hour_length = (minute_length as f64 * 2.0 / 3.0).round() as i32;

    StopwatchHands {
        tenths: Hand::new(
            tenths_dial.center,
            tenths_dial.radius - SUB_DIAL_INSET,
            angles.tenths,
            THIN_STROKE,
        ),
        second,
        minute: Hand::new(hour_dial.center, minute_length, angles.minute, THIN_STROKE),
        hour: Hand::new(hour_dial.center, hour_length, angles.hour, THIN_STROKE),
    }
}

pub fn draw_stopwatch_hands<D>(target: &mut D, e: Elapsed, layout: &Layout, settings: &Settings)
where
    D: DrawTarget<Color = BinaryColor>,
{
    let hands = stopwatch_hands(e, layout, settings);
    hands.tenths.draw(target);
    hands.second.draw(target);
    hands.minute.draw(target);
    hands.hour.draw(target);
}
