use chrono::{DateTime, Local, Utc};
use watchface_core::Now;

/// Wall time from the system clock, monotonic time from the ticktimer.
pub struct Clock {
    tt: ticktimer_server::Ticktimer,
}

impl Clock {
    pub fn new(tt: ticktimer_server::Ticktimer) -> Self {
        Self { tt }
    }

    pub fn now(&self) -> Now {
        Now::new(Utc::now().timestamp_millis().max(0) as u64, self.tt.elapsed_ms())
    }

    pub fn local(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Milliseconds until the next whole wall-clock second.
pub fn ms_to_next_second() -> usize {
    let into_second = Local::now().timestamp_subsec_millis().min(999);
    (1000 - into_second) as usize
}
