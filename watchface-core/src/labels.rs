//! Date and battery text shown in the header row.

use chrono::Datelike;
use embedded_graphics::{
    mono_font::{
        ascii::{FONT_7X13, FONT_7X13_BOLD, FONT_9X18, FONT_9X18_BOLD},
        MonoFont, MonoTextStyleBuilder,
    },
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, DrawTargetExt, Point},
    primitives::Rectangle,
    text::{Alignment, Baseline, Text, TextStyleBuilder},
    Drawable,
};

use crate::settings::Settings;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BatteryState {
    pub percent: u8,
    pub charging: bool,
}

pub fn battery_text(state: BatteryState) -> String {
    let mut text = format!("{}%", state.percent.min(100));
    if state.charging {
        text.push('C');
    }
    text
}

/// Weekday abbreviation and numeric month/day, e.g. "Wed 12/31".
pub fn date_text<D: Datelike>(date: &D) -> String {
    format!("{} {:02}/{:02}", date.weekday(), date.month(), date.day())
}

pub fn font_for(settings: &Settings) -> &'static MonoFont<'static> {
    match (settings.use_bold_font, settings.use_larger_font) {
        (true, true) => &FONT_9X18_BOLD,
        (true, false) => &FONT_7X13_BOLD,
        (false, true) => &FONT_9X18,
        (false, false) => &FONT_7X13,
    }
}

/// Draw `text` inside `bounds`, vertically centred, left or right aligned.
pub fn draw_label<D>(
    target: &mut D,
    bounds: &Rectangle,
    text: &str,
    font: &MonoFont<'_>,
    alignment: Alignment,
) where
    D: DrawTarget<Color = BinaryColor>,
{
    let character_style = MonoTextStyleBuilder::new()
        .font(font)
        .text_color(BinaryColor::On)
        .background_color(BinaryColor::Off)
        .build();
    let text_style = TextStyleBuilder::new()
        .alignment(alignment)
        .baseline(Baseline::Middle)
        .build();
    let y = bounds.top_left.y + (bounds.size.height / 2) as i32;
    let x = match alignment {
        Alignment::Right => bounds.top_left.x + bounds.size.width as i32 - 1,
        Alignment::Center => bounds.top_left.x + (bounds.size.width / 2) as i32,
        Alignment::Left => bounds.top_left.x,
    };
    let mut clipped = target.clipped(bounds);
    Text::with_text_style(text, Point::new(x, y), character_style, text_style)
        .draw(&mut clipped)
        .ok();
}
