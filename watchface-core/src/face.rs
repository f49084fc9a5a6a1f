//! The watch face controller.
//!
//! `WatchFace` owns every piece of face state (settings, layout, stopwatch,
//! scheduler, header labels) and is driven by the host's event loop. Event
//! handlers return a `TimerAction` whenever the host's one-shot stopwatch
//! timer has to be armed or cancelled.

use chrono::{Datelike, Timelike};
use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, Size},
    text::Alignment,
};

use crate::canvas::{Display, Framebuffer};
use crate::dial::{draw_ticks, TickStyle};
use crate::hands::{draw_clock_hands, draw_stopwatch_hands, ClockTime};
use crate::labels::{battery_text, date_text, draw_label, font_for, BatteryState};
use crate::layout::Layout;
use crate::record::RecordStore;
use crate::schedule::{Scheduler, TimerRequest};
use crate::settings::{ConfigKey, Settings};
use crate::{format_hms_tenths, Stopwatch, STOPWATCH_REDRAW_MS};

/// Current time as seen by the face.
///
/// `wall_ms` is milliseconds since the Unix epoch and anchors the persisted
/// stopwatch; `mono_ms` is a monotonic counter used for timer deadlines.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Now {
    pub wall_ms: u64,
    pub mono_ms: u64,
}

impl Now {
    pub fn new(wall_ms: u64, mono_ms: u64) -> Self {
        Self { wall_ms, mono_ms }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TimerAction {
    Arm(TimerRequest),
    Cancel,
}

/// Layers waiting to be redrawn.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Dirty {
    pub ticks: bool,
    pub wall_clock: bool,
    pub stopwatch: bool,
    pub labels: bool,
}

impl Dirty {
    fn all() -> Self {
        Self {
            ticks: true,
            wall_clock: true,
            stopwatch: true,
            labels: true,
        }
    }

    pub fn any(&self) -> bool {
        self.ticks || self.wall_clock || self.stopwatch || self.labels
    }
}

pub struct WatchFace<S: RecordStore> {
    store: S,
    screen: Size,
    settings: Settings,
    layout: Layout,
    stopwatch: Stopwatch,
    scheduler: Scheduler,
    battery: Option<BatteryState>,
    date_label: Option<String>,
    minute_when_last_updated: Option<u32>,
    dirty: Dirty,
}

impl<S: RecordStore> WatchFace<S> {
    /// Load persisted state and build the window. A stopwatch that was
    /// running when last persisted resumes, counting the time the app was
    /// away, and the returned action arms its redraw timer.
    pub fn open(store: S, screen: Size, now: Now) -> (Self, Option<TimerAction>) {
        let settings = Settings::load(&store);
        let (stopwatch, running) = Stopwatch::load_persisted(&store);
        if running {
            log::info!(
                "resuming stopwatch at {}",
                format_hms_tenths(stopwatch.elapsed_ms(now.wall_ms))
            );
        }
        let mut face = Self {
            store,
            screen,
            settings,
            layout: Layout::new(screen, &settings),
            stopwatch,
            scheduler: Scheduler::new(),
            battery: None,
            date_label: None,
            minute_when_last_updated: None,
            dirty: Dirty::all(),
        };
        let action = face.build_window(now);
        (face, action)
    }

    fn build_window(&mut self, now: Now) -> Option<TimerAction> {
        self.layout = Layout::new(self.screen, &self.settings);
        log::debug!(
            "window built: header {} px, dial radius {}",
            self.layout.header_height(),
            self.layout.main.radius
        );
        self.minute_when_last_updated = None;
        self.date_label = None;
        self.dirty = Dirty::all();
        self.scheduler.arm_wall_clock_tick();
        if self.stopwatch.is_running() {
            let req = self.scheduler.arm_stopwatch_timer(now.mono_ms, STOPWATCH_REDRAW_MS);
            return Some(TimerAction::Arm(req));
        }
        None
    }

    fn teardown_window(&mut self) {
        self.scheduler.disarm_wall_clock_tick();
        self.minute_when_last_updated = None;
        self.date_label = None;
    }

    /// Up button: start or stop the stopwatch.
    pub fn on_up_button(&mut self, now: Now) -> TimerAction {
        let started = self.stopwatch.start_stop(now.wall_ms);
        self.stopwatch.persist(&mut self.store);
        self.scheduler.cancel_stopwatch_timer();
        self.dirty.stopwatch = true;
        if started {
            log::info!("stopwatch started");
            TimerAction::Arm(self.scheduler.arm_stopwatch_timer(now.mono_ms, STOPWATCH_REDRAW_MS))
        } else {
            log::info!(
                "stopwatch stopped at {}",
                format_hms_tenths(self.stopwatch.accumulated_ms())
            );
            TimerAction::Cancel
        }
    }

    /// Down button: lap while running, reset while stopped.
    pub fn on_down_button(&mut self, now: Now) {
        if self.stopwatch.lap_reset() {
            log::info!("lap {}", format_hms_tenths(self.stopwatch.lap(now.wall_ms)));
        } else {
            self.stopwatch.persist(&mut self.store);
            log::info!("stopwatch reset");
        }
        self.dirty.stopwatch = true;
    }

    /// 1 Hz tick from the wall clock.
    pub fn on_clock_tick<T: Datelike + Timelike>(&mut self, local: &T) {
        if !self.scheduler.wall_clock_armed() {
            return;
        }
        self.dirty.wall_clock = true;
        if self.settings.show_date {
            self.update_date(local);
        }
    }

    fn update_date<T: Datelike + Timelike>(&mut self, local: &T) {
        let minute = local.minute();
        if self.minute_when_last_updated != Some(minute) {
            self.date_label = Some(date_text(local));
            self.dirty.labels = true;
        }
        self.minute_when_last_updated = Some(minute);
    }

    /// Expiry of the stopwatch timer carrying `token`.
    pub fn on_stopwatch_timer(&mut self, token: u32, now: Now) -> Option<TimerAction> {
        let req = self.scheduler.fire_stopwatch_timer(token, now.mono_ms)?;
        self.dirty.stopwatch = true;
        Some(TimerAction::Arm(req))
    }

    pub fn on_battery(&mut self, state: BatteryState) {
        self.battery = Some(state);
        if self.settings.show_battery {
            self.dirty.labels = true;
        }
    }

    /// Apply a configuration message. The settings record is always
    /// persisted; any recognised key rebuilds the window.
    pub fn on_configure(&mut self, changes: &[(ConfigKey, bool)], now: Now) -> Option<TimerAction> {
        for &(key, value) in changes {
            log::info!("config {:?} = {}", key, value);
            self.settings.apply(key, value);
        }
        self.settings.save(&mut self.store);

        if changes.is_empty() {
            return None;
        }
        self.teardown_window();
        self.build_window(now)
    }

    pub fn needs_redraw(&self) -> bool {
        self.dirty.any()
    }

    pub fn dirty(&self) -> Dirty {
        self.dirty
    }

    /// Draw the full face. Layers go back to front: ticks, wall clock hands,
    /// stopwatch hands, header labels.
    pub fn render<D>(&mut self, target: &mut D, now: Now, time: ClockTime)
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        target.clear(BinaryColor::Off).ok();

        let layout = &self.layout;
        draw_ticks(target, &layout.main, 60, 5, TickStyle::Block);
        draw_ticks(target, &layout.sub[0], 20, 2, TickStyle::Block);
        draw_ticks(target, &layout.sub[1], 60, 5, TickStyle::Line);
        draw_ticks(target, &layout.sub[2], 60, 5, TickStyle::Line);

        draw_clock_hands(target, time, layout, &self.settings);
        draw_stopwatch_hands(target, self.stopwatch.elapsed(now.wall_ms), layout, &self.settings);

        let font = font_for(&self.settings);
        if let (Some(bounds), Some(text)) = (&layout.date_label, &self.date_label) {
            draw_label(target, bounds, text, font, Alignment::Left);
        }
        if let (Some(bounds), Some(text)) = (&layout.battery_label, self.battery_label()) {
            draw_label(target, bounds, &text, font, Alignment::Right);
        }

        self.dirty = Dirty::default();
    }

    /// Render into `frame` and hand it to `display` when anything is dirty.
    /// Returns whether a frame was presented.
    pub fn redraw<D: Display>(
        &mut self,
        frame: &mut Framebuffer,
        display: &mut D,
        now: Now,
        time: ClockTime,
    ) -> bool {
        if !self.needs_redraw() {
            return false;
        }
        self.render(frame, now, time);
        match display.present(frame) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("frame not presented: {}", e);
                false
            }
        }
    }

    pub fn battery_label(&self) -> Option<String> {
        if !self.settings.show_battery {
            return None;
        }
        self.battery.map(battery_text)
    }

    pub fn date_label(&self) -> Option<&str> {
        self.date_label.as_deref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
