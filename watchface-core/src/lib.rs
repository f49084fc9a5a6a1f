//! Pure watch face logic with no platform dependencies.
//! Testable on host, usable on Xous target.

pub mod canvas;
pub mod dial;
pub mod face;
pub mod geometry;
pub mod hands;
pub mod labels;
pub mod layout;
pub mod record;
pub mod schedule;
pub mod settings;

pub use canvas::{Display, DisplayError, Framebuffer};
pub use face::{Now, TimerAction, WatchFace};
pub use hands::ClockTime;
pub use labels::BatteryState;
pub use layout::Layout;
pub use record::{FileStore, MemoryStore, RecordStore, StoreError};
pub use schedule::{OneShot, Scheduler, TimerRequest};
pub use settings::{ConfigKey, Settings};

/// Redraw cadence of the stopwatch complication while it runs.
pub const STOPWATCH_REDRAW_MS: u64 = 50;

const STOPWATCH_RECORD_VERSION: u8 = 1;
const STOPWATCH_RECORD_LEN: usize = 18;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StopwatchState {
    Stopped,
    Running,
}

/// Elapsed stopwatch time split the way the dials consume it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Elapsed {
    pub msec: u16,
    pub total_seconds: u64,
}

impl Elapsed {
    pub fn from_ms(ms: u64) -> Self {
        Self {
            msec: (ms % 1000) as u16,
            total_seconds: ms / 1000,
        }
    }
}

/// Start/stop/lap/reset state machine.
///
/// `started_at_ms` is an absolute wall-clock instant so a running stopwatch
/// keeps counting across a restart of the app.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Stopwatch {
    state: StopwatchState,
    accumulated_ms: u64,
    started_at_ms: u64,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            state: StopwatchState::Stopped,
            accumulated_ms: 0,
            started_at_ms: 0,
        }
    }

    pub fn state(&self) -> StopwatchState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == StopwatchState::Running
    }

    pub fn accumulated_ms(&self) -> u64 {
        self.accumulated_ms
    }

    /// Returns `true` when the stopwatch was started, `false` when stopped.
    pub fn start_stop(&mut self, now_ms: u64) -> bool {
        match self.state {
            StopwatchState::Stopped => {
                self.started_at_ms = now_ms;
                self.state = StopwatchState::Running;
                true
            }
            StopwatchState::Running => {
                self.accumulated_ms = self
                    .accumulated_ms
                    .saturating_add(now_ms.saturating_sub(self.started_at_ms));
                self.started_at_ms = 0;
                self.state = StopwatchState::Stopped;
                false
            }
        }
    }

    /// Returns `true` for a lap (running, nothing changes) and `false`
    /// for a reset (stopped, accumulator cleared).
    pub fn lap_reset(&mut self) -> bool {
        if self.is_running() {
            return true;
        }
        self.accumulated_ms = 0;
        false
    }

    /// Read-only snapshot of the running total.
    pub fn lap(&self, now_ms: u64) -> u64 {
        self.elapsed_ms(now_ms)
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        match self.state {
            StopwatchState::Running => self
                .accumulated_ms
                .saturating_add(now_ms.saturating_sub(self.started_at_ms)),
            StopwatchState::Stopped => self.accumulated_ms,
        }
    }

    pub fn elapsed(&self, now_ms: u64) -> Elapsed {
        Elapsed::from_ms(self.elapsed_ms(now_ms))
    }

    /// Layout: version, running flag, accumulated ms, started-at ms.
    pub fn to_record(&self) -> [u8; STOPWATCH_RECORD_LEN] {
        let mut data = [0u8; STOPWATCH_RECORD_LEN];
        data[0] = STOPWATCH_RECORD_VERSION;
        data[1] = self.is_running() as u8;
        data[2..10].copy_from_slice(&serialize_u64(self.accumulated_ms));
        data[10..18].copy_from_slice(&serialize_u64(self.started_at_ms));
        data
    }

    pub fn from_record(data: &[u8]) -> Option<Self> {
        if data.len() != STOPWATCH_RECORD_LEN || data[0] != STOPWATCH_RECORD_VERSION {
            return None;
        }
        let state = match data[1] {
            0 => StopwatchState::Stopped,
            1 => StopwatchState::Running,
            _ => return None,
        };
        let started_at_ms = match state {
            StopwatchState::Running => deserialize_u64(&data[10..18]),
            StopwatchState::Stopped => 0,
        };
        Some(Self {
            state,
            accumulated_ms: deserialize_u64(&data[2..10]),
            started_at_ms,
        })
    }

    /// Restores the persisted stopwatch, or a fresh one when the record is
    /// missing or unreadable. The flag reports whether it was running.
    pub fn load_persisted<S: RecordStore>(store: &S) -> (Self, bool) {
        let sw = store
            .load(record::KEY_STOPWATCH)
            .and_then(|data| Self::from_record(&data))
            .unwrap_or_default();
        let running = sw.is_running();
        (sw, running)
    }

    pub fn persist<S: RecordStore>(&self, store: &mut S) {
        if let Err(e) = store.save(record::KEY_STOPWATCH, &self.to_record()) {
            log::error!("Failed to save stopwatch: {}", e);
        }
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Format milliseconds as "HH:MM:SS.t" (tenths), used in log lines.
pub fn format_hms_tenths(ms: u64) -> String {
    let total_secs = ms / 1000;
    let tenths = (ms % 1000) / 100;
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;
    format!("{:02}:{:02}:{:02}.{}", h, m, s, tenths)
}

/// Serialize a u64 to 8 bytes (little-endian)
pub fn serialize_u64(val: u64) -> [u8; 8] {
    val.to_le_bytes()
}

/// Deserialize a u64 from bytes (little-endian)
pub fn deserialize_u64(bytes: &[u8]) -> u64 {
    if bytes.len() < 8 {
        return 0;
    }
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopwatch_basic() {
        let mut sw = Stopwatch::new();
        assert_eq!(sw.state, StopwatchState::Stopped);
        assert_eq!(sw.elapsed_ms(0), 0);

        assert!(sw.start_stop(1000));
        assert_eq!(sw.state, StopwatchState::Running);
        assert_eq!(sw.elapsed_ms(1500), 500);
        assert_eq!(sw.elapsed_ms(2000), 1000);

        assert!(!sw.start_stop(2000));
        assert_eq!(sw.state, StopwatchState::Stopped);
        assert_eq!(sw.elapsed_ms(5000), 1000); // Stays at 1000 when stopped

        assert!(sw.start_stop(5000));
        assert_eq!(sw.elapsed_ms(5500), 1500);
    }

    #[test]
    fn test_state_follows_operations() {
        let epoch_ms = 1_700_000_000_000;
        let mut sw = Stopwatch::new();
        // A fresh stopwatch reads zero whatever the wall clock says
        assert_eq!(sw.elapsed_ms(epoch_ms), 0);

        assert!(!sw.lap_reset());
        assert_eq!(sw.state(), StopwatchState::Stopped);

        sw.start_stop(epoch_ms);
        assert_eq!(sw.state(), StopwatchState::Running);
        assert!(sw.lap_reset());
        assert_eq!(sw.state(), StopwatchState::Running);
        assert_eq!(sw.elapsed_ms(epoch_ms + 250), 250);
    }

    #[test]
    fn test_zero_duration_run_is_noop() {
        let mut sw = Stopwatch::new();
        sw.start_stop(42_000);
        sw.start_stop(42_000);
        assert_eq!(sw.accumulated_ms(), 0);
        sw.start_stop(42_000);
        sw.start_stop(42_000);
        assert_eq!(sw.accumulated_ms(), 0);
        assert!(!sw.is_running());
    }

    #[test]
    fn test_stop_folds_segment() {
        let mut sw = Stopwatch::new();
        sw.start_stop(10_000);
        sw.start_stop(11_500);
        assert_eq!(sw.accumulated_ms(), 1500);

        // Nothing drifts across a stop/start cycle
        sw.start_stop(20_000);
        assert_eq!(sw.elapsed_ms(20_000), 1500);
        sw.start_stop(20_250);
        assert_eq!(sw.accumulated_ms(), 1750);
    }

    #[test]
    fn test_lap_reset() {
        let mut sw = Stopwatch::new();
        sw.start_stop(0);
        assert!(sw.lap_reset());
        assert!(sw.is_running());
        assert_eq!(sw.accumulated_ms(), 0);
        assert_eq!(sw.lap(5000), 5000);
        assert_eq!(sw.elapsed_ms(8000), 8000); // Lap does not pause or reset

        sw.start_stop(8000);
        assert_eq!(sw.accumulated_ms(), 8000);
        assert!(!sw.lap_reset());
        assert_eq!(sw.accumulated_ms(), 0);
        assert!(!sw.lap_reset());
        assert_eq!(sw.accumulated_ms(), 0);
    }

    #[test]
    fn test_clock_going_backwards() {
        let mut sw = Stopwatch::new();
        sw.start_stop(10_000);
        assert_eq!(sw.elapsed_ms(9_000), 0);
        sw.start_stop(9_000);
        assert_eq!(sw.accumulated_ms(), 0);
    }

    #[test]
    fn test_multi_day_session() {
        let mut sw = Stopwatch::new();
        let week_ms = 7 * 24 * 3600 * 1000u64;
        sw.start_stop(1_700_000_000_000);
        sw.start_stop(1_700_000_000_000 + week_ms);
        assert_eq!(sw.accumulated_ms(), week_ms);
        assert_eq!(sw.elapsed(0).total_seconds, week_ms / 1000);
    }

    #[test]
    fn test_elapsed_split() {
        assert_eq!(Elapsed::from_ms(0), Elapsed { msec: 0, total_seconds: 0 });
        assert_eq!(Elapsed::from_ms(500), Elapsed { msec: 500, total_seconds: 0 });
        assert_eq!(Elapsed::from_ms(61_999), Elapsed { msec: 999, total_seconds: 61 });
    }

    #[test]
    fn test_record_layout() {
        let mut sw = Stopwatch::new();
        sw.start_stop(1000);
        sw.start_stop(3000);
        sw.start_stop(7000);
        let data = sw.to_record();
        assert_eq!(data[0], 1);
        assert_eq!(data[1], 1);
        assert_eq!(deserialize_u64(&data[2..10]), 2000);
        assert_eq!(deserialize_u64(&data[10..18]), 7000);
        assert_eq!(Stopwatch::from_record(&data), Some(sw));
    }

    #[test]
    fn test_bad_records_rejected() {
        assert_eq!(Stopwatch::from_record(&[]), None);
        assert_eq!(Stopwatch::from_record(&[1, 0, 0]), None);
        let mut data = Stopwatch::new().to_record();
        data[0] = 9;
        assert_eq!(Stopwatch::from_record(&data), None);
        data[0] = 1;
        data[1] = 7;
        assert_eq!(Stopwatch::from_record(&data), None);
    }

    #[test]
    fn test_load_persisted_resumes_after_gap() {
        let mut store = MemoryStore::new();
        let mut sw = Stopwatch::new();
        sw.start_stop(100_000);
        sw.persist(&mut store);

        // Process restarts 2 s later
        let (loaded, running) = Stopwatch::load_persisted(&store);
        assert!(running);
        assert_eq!(loaded.elapsed_ms(102_000), 2000);
    }

    #[test]
    fn test_load_persisted_missing_record() {
        let store = MemoryStore::new();
        let (sw, running) = Stopwatch::load_persisted(&store);
        assert!(!running);
        assert_eq!(sw, Stopwatch::new());
    }

    #[test]
    fn test_format_hms_tenths() {
        assert_eq!(format_hms_tenths(0), "00:00:00.0");
        assert_eq!(format_hms_tenths(61_250), "00:01:01.2");
        assert_eq!(format_hms_tenths(3_661_999), "01:01:01.9");
    }

    #[test]
    fn test_serialize_deserialize() {
        let val = 123456789u64;
        let bytes = serialize_u64(val);
        assert_eq!(deserialize_u64(&bytes), val);
        assert_eq!(deserialize_u64(&bytes[..4]), 0);
    }
}
