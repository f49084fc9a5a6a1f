//! Angle to pixel conversion shared by every dial.
//!
//! Angles use a full-turn unit of `TRIG_MAX_ANGLE` steps, 0 pointing straight
//! up and increasing clockwise. Sine and cosine are evaluated in `f64`, so
//! placement can differ by a pixel from a table-driven implementation.

use core::f64::consts::TAU;

use embedded_graphics::prelude::Point;

pub const TRIG_MAX_ANGLE: i32 = 0x10000;

/// Convert whole degrees into the full-turn unit.
pub fn deg_to_angle(degrees: i32) -> i32 {
    degrees * TRIG_MAX_ANGLE / 360
}

/// Round a fraction of a turn to the full-turn unit.
pub fn turn_fraction_to_angle(numerator: u32, denominator: u32) -> i32 {
    (TRIG_MAX_ANGLE as f64 * numerator as f64 / denominator as f64).round() as i32
}

pub fn point_on_circle(center: Point, radius: i32, angle: i32) -> Point {
    let theta = TAU * angle as f64 / TRIG_MAX_ANGLE as f64;
    let r = radius as f64;
    // f64::round rounds half away from zero
    Point::new(
        center.x + (r * theta.sin()).round() as i32,
        center.y - (r * theta.cos()).round() as i32,
    )
}

pub fn point_on_circle_deg(center: Point, radius: i32, degrees: i32) -> Point {
    point_on_circle(center, radius, deg_to_angle(degrees))
}
